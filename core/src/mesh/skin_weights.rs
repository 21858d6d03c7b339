//! Fixed-width skin-weight records.
//!
//! Every vertex owns `influences_per_vertex` slots holding a bone-map index
//! and an 8-bit weight. Unused slots carry [`INVALID_BONE`] with weight 0.

/// Bone index marking an unused influence slot.
pub const INVALID_BONE: u32 = u32::MAX;

/// Widest skin-weight record supported.
pub const MAX_TOTAL_INFLUENCES: usize = 12;

/// Largest bone index that still fits the narrow (16-bit) encoding.
pub const MAX_NARROW_BONE_INDEX: u32 = u16::MAX as u32;

/// Quantize a weight to a byte: `round(clamp(w, 0, 1) * 255)`.
pub fn quantize_weight(weight: f32) -> u8 {
    // NaN clamps to NaN and casts to 0.
    (weight.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Inverse of [`quantize_weight`], up to quantization error.
pub fn dequantize_weight(weight: u8) -> f32 {
    weight as f32 / 255.0
}

/// Per-vertex skin-weight records for an assembled mesh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkinWeightBuffer {
    vertex_count: usize,
    influences_per_vertex: usize,
    use_16bit_bone_index: bool,
    bone_indices: Vec<u32>,
    weights: Vec<u8>,
}

impl SkinWeightBuffer {
    /// Creates a buffer with every slot empty.
    pub fn new(vertex_count: usize, influences_per_vertex: usize, use_16bit_bone_index: bool) -> Self {
        let slots = vertex_count * influences_per_vertex;
        Self {
            vertex_count,
            influences_per_vertex,
            use_16bit_bone_index,
            bone_indices: vec![INVALID_BONE; slots],
            weights: vec![0; slots],
        }
    }

    /// Quantize and store the influences of `vertex`.
    ///
    /// `None` entries stand for influences that could not be resolved; they
    /// occupy a slot but stay empty. A weight that quantizes to 0 also leaves
    /// its slot empty. Entries past `influences_per_vertex` are ignored.
    pub fn write_record(
        &mut self,
        vertex: usize,
        influences: impl IntoIterator<Item = Option<(u32, f32)>>,
    ) {
        let start = vertex * self.influences_per_vertex;
        for (slot, influence) in influences
            .into_iter()
            .take(self.influences_per_vertex)
            .enumerate()
        {
            let (bone, weight) = match influence {
                Some((bone, weight)) => match quantize_weight(weight) {
                    0 => (INVALID_BONE, 0),
                    w => (bone, w),
                },
                None => (INVALID_BONE, 0),
            };
            self.bone_indices[start + slot] = bone;
            self.weights[start + slot] = weight;
        }
    }

    /// Number of records.
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// Slots per record.
    pub fn influences_per_vertex(&self) -> usize {
        self.influences_per_vertex
    }

    /// Whether bone indices are encoded as u16.
    pub fn use_16bit_bone_index(&self) -> bool {
        self.use_16bit_bone_index
    }

    /// `(bone-map index, weight byte)` slots of one vertex.
    pub fn record(&self, vertex: usize) -> impl Iterator<Item = (u32, u8)> + '_ {
        let start = (vertex * self.influences_per_vertex).min(self.bone_indices.len());
        let end = (start + self.influences_per_vertex).min(self.bone_indices.len());
        self.bone_indices[start..end]
            .iter()
            .copied()
            .zip(self.weights[start..end].iter().copied())
    }

    /// Bone-map indices of every slot, record after record.
    pub fn bone_indices(&self) -> &[u32] {
        &self.bone_indices
    }

    /// Weight bytes of every slot, record after record.
    pub fn weights(&self) -> &[u8] {
        &self.weights
    }

    /// Raw weight bytes, ready for upload.
    pub fn weight_bytes(&self) -> &[u8] {
        &self.weights
    }

    /// Bone indices encoded as little-endian u16 or u32, per the width flag.
    ///
    /// In the narrow encoding empty slots are written as 0; their weight is
    /// 0 so they never contribute.
    pub fn bone_index_bytes(&self) -> Vec<u8> {
        if self.use_16bit_bone_index {
            let narrow: Vec<u16> = self
                .bone_indices
                .iter()
                .map(|&bone| if bone == INVALID_BONE { 0 } else { bone as u16 })
                .collect();
            bytemuck::cast_slice(&narrow).to_vec()
        } else {
            bytemuck::cast_slice(&self.bone_indices).to_vec()
        }
    }
}
