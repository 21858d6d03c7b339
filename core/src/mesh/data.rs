//! Assembled mesh buffers.
//!
//! This module provides:
//! - [`IndexFormat`] - Index data format (u16 or u32)
//! - [`AssembledMesh`] - The merged vertex / UV / index / skin-weight buffers

use crate::math::Vec2;

use super::bounds::Bounds;
use super::section::Section;
use super::skin_weights::SkinWeightBuffer;
use super::vertex::StaticVertex;

/// Index format for indexed drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IndexFormat {
    /// 16-bit unsigned integers (max 65535 vertices).
    #[default]
    Uint16,
    /// 32-bit unsigned integers (max ~4 billion vertices).
    Uint32,
}

impl IndexFormat {
    /// Smallest format able to address `vertex_count` vertices.
    pub fn for_vertex_count(vertex_count: usize) -> Self {
        if vertex_count > u16::MAX as usize {
            Self::Uint32
        } else {
            Self::Uint16
        }
    }

    /// Get the size in bytes of each index.
    pub fn size(&self) -> usize {
        match self {
            Self::Uint16 => 2,
            Self::Uint32 => 4,
        }
    }
}

/// A skinned mesh merged from one or more surfaces.
///
/// Produced by [`compose`](super::compose()) and handed to the caller by
/// value. Section `i` describes where surface `i` lives in the buffers.
#[derive(Debug, Clone)]
pub struct AssembledMesh {
    /// Packed vertex records.
    pub vertices: Vec<StaticVertex>,
    /// UVs, `uv_channel_count` entries per vertex.
    pub uvs: Vec<Vec2>,
    /// Triangle list indices into `vertices`.
    pub indices: Vec<u32>,
    /// One section per source surface, in input order.
    pub sections: Vec<Section>,
    /// One skin-weight record per vertex.
    pub skin_weights: SkinWeightBuffer,
    /// Whether bone indices use the 16-bit encoding.
    pub use_16bit_bone_index: bool,
    /// Mesh-wide influence slot count.
    pub max_influences: usize,
    /// UV channels per vertex.
    pub uv_channel_count: usize,
    /// Bounds over every vertex position.
    pub bounds: Bounds,
    /// Skeleton bones referenced by any section bone map, ascending.
    pub active_bones: Vec<usize>,
    /// Whether any source surface carried vertex colors.
    pub has_vertex_colors: bool,
}

impl AssembledMesh {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Raw vertex bytes, [`StaticVertex::SIZE`] per vertex.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Raw UV bytes, two f32 per channel per vertex.
    pub fn uv_bytes(&self) -> Vec<u8> {
        let flat: Vec<[f32; 2]> = self.uvs.iter().map(|uv| [uv.x, uv.y]).collect();
        bytemuck::cast_slice(&flat).to_vec()
    }

    /// UVs of one vertex, one per channel.
    pub fn vertex_uvs(&self, vertex: usize) -> &[Vec2] {
        let start = vertex * self.uv_channel_count;
        self.uvs
            .get(start..start + self.uv_channel_count)
            .unwrap_or(&[])
    }

    /// Index format used by [`index_bytes`](Self::index_bytes).
    pub fn index_format(&self) -> IndexFormat {
        IndexFormat::for_vertex_count(self.vertices.len())
    }

    /// Raw index bytes in [`index_format`](Self::index_format).
    pub fn index_bytes(&self) -> Vec<u8> {
        match self.index_format() {
            IndexFormat::Uint16 => {
                let narrow: Vec<u16> = self.indices.iter().map(|&i| i as u16).collect();
                bytemuck::cast_slice(&narrow).to_vec()
            }
            IndexFormat::Uint32 => bytemuck::cast_slice(&self.indices).to_vec(),
        }
    }

    /// Section containing `vertex`, if any.
    pub fn section_of_vertex(&self, vertex: usize) -> Option<usize> {
        let vertex = vertex as u32;
        let index = self
            .sections
            .partition_point(|section| section.base_vertex + section.vertex_count <= vertex);
        self.sections
            .get(index)
            .filter(|section| section.base_vertex <= vertex)
            .map(|_| index)
    }

    /// Number of material slots referenced (highest material index + 1).
    pub fn material_count(&self) -> usize {
        self.sections
            .iter()
            .map(|section| section.material_index as usize + 1)
            .max()
            .unwrap_or(0)
    }
}
