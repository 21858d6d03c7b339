//! Caller-authored mesh surfaces.
//!
//! A [`Surface`] is one independently-authored piece of a skinned mesh with
//! its own material. Per-vertex data is stored as parallel arrays; every
//! array has one entry per vertex except `colors`, which may be empty when
//! the surface carries no vertex colors.

use crate::error::{MeshError, MeshResult};
use crate::math::{Vec2, Vec3};

/// One bone's contribution to a vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoneInfluence {
    /// Vertex index within the owning surface.
    pub vertex_index: u32,
    /// Bone index in the skeleton.
    pub bone_index: u32,
    /// Weight in `[0, 1]`.
    pub weight: f32,
}

impl BoneInfluence {
    /// Creates an influence.
    pub fn new(vertex_index: u32, bone_index: u32, weight: f32) -> Self {
        Self {
            vertex_index,
            bone_index,
            weight,
        }
    }
}

/// A single vertex, used to build surfaces one vertex at a time.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceVertex {
    /// Position.
    pub position: Vec3,
    /// Unit tangent.
    pub tangent: Vec3,
    /// Unit normal.
    pub normal: Vec3,
    /// Whether the bitangent points opposite to `cross(normal, tangent)`.
    pub flip_binormal: bool,
    /// Optional RGBA8 color.
    pub color: Option<[u8; 4]>,
    /// One UV per channel.
    pub uvs: Vec<Vec2>,
    /// `(bone index, weight)` pairs in declaration order.
    pub influences: Vec<(u32, f32)>,
}

impl SurfaceVertex {
    /// A vertex at `position` with a +Z normal and +X tangent, no UVs and
    /// no influences.
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            tangent: Vec3::x(),
            normal: Vec3::z(),
            flip_binormal: false,
            color: None,
            uvs: Vec::new(),
            influences: Vec::new(),
        }
    }

    /// Set the tangent frame.
    #[must_use]
    pub fn with_tangent_frame(mut self, tangent: Vec3, normal: Vec3, flip_binormal: bool) -> Self {
        self.tangent = tangent;
        self.normal = normal;
        self.flip_binormal = flip_binormal;
        self
    }

    /// Set the vertex color.
    #[must_use]
    pub fn with_color(mut self, color: [u8; 4]) -> Self {
        self.color = Some(color);
        self
    }

    /// Set the UV channels.
    #[must_use]
    pub fn with_uvs(mut self, uvs: Vec<Vec2>) -> Self {
        self.uvs = uvs;
        self
    }

    /// Set the bone influences as `(bone index, weight)` pairs.
    #[must_use]
    pub fn with_influences(mut self, influences: Vec<(u32, f32)>) -> Self {
        self.influences = influences;
        self
    }
}

/// One caller-authored mesh piece, prior to merging.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Surface {
    /// Vertex positions.
    pub positions: Vec<Vec3>,
    /// Unit tangents.
    pub tangents: Vec<Vec3>,
    /// Unit normals.
    pub normals: Vec<Vec3>,
    /// Per-vertex binormal flip flags.
    pub flip_binormal: Vec<bool>,
    /// RGBA8 colors; empty or one per vertex.
    pub colors: Vec<[u8; 4]>,
    /// UV channels, one list per vertex.
    pub uvs: Vec<Vec<Vec2>>,
    /// Bone influences, one list per vertex.
    pub influences: Vec<Vec<BoneInfluence>>,
    /// Triangle list indices, local to this surface.
    pub indices: Vec<u32>,
    /// Material slot.
    pub material_index: u32,
}

impl Surface {
    /// Creates an empty surface bound to `material_index`.
    pub fn new(material_index: u32) -> Self {
        Self {
            material_index,
            ..Self::default()
        }
    }

    /// Append a vertex. Influence vertex indices are filled in automatically.
    pub fn push_vertex(&mut self, vertex: SurfaceVertex) -> u32 {
        let index = self.positions.len() as u32;
        self.positions.push(vertex.position);
        self.tangents.push(vertex.tangent);
        self.normals.push(vertex.normal);
        self.flip_binormal.push(vertex.flip_binormal);
        if let Some(color) = vertex.color {
            self.colors.push(color);
        }
        self.uvs.push(vertex.uvs);
        self.influences.push(
            vertex
                .influences
                .into_iter()
                .map(|(bone, weight)| BoneInfluence::new(index, bone, weight))
                .collect(),
        );
        index
    }

    /// Set vertices from a list.
    #[must_use]
    pub fn with_vertices(mut self, vertices: impl IntoIterator<Item = SurfaceVertex>) -> Self {
        for vertex in vertices {
            self.push_vertex(vertex);
        }
        self
    }

    /// Set the triangle list indices.
    #[must_use]
    pub fn with_indices(mut self, indices: Vec<u32>) -> Self {
        self.indices = indices;
        self
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Whether the surface carries per-vertex colors.
    pub fn has_colors(&self) -> bool {
        !self.colors.is_empty()
    }

    /// UV channel count of the first vertex, `None` for an empty surface.
    pub fn uv_channel_count(&self) -> Option<usize> {
        self.uvs.first().map(Vec::len)
    }

    /// Largest influence list length.
    pub fn max_influences(&self) -> usize {
        self.influences.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Check the parallel-array and index invariants.
    ///
    /// `surface` is only used to label the error.
    pub fn validate(&self, surface: usize) -> MeshResult<()> {
        let invalid = |reason: String| MeshError::InvalidSurface { surface, reason };
        let count = self.positions.len();

        let lengths = [
            ("tangents", self.tangents.len()),
            ("normals", self.normals.len()),
            ("flip flags", self.flip_binormal.len()),
            ("UV lists", self.uvs.len()),
            ("influence lists", self.influences.len()),
        ];
        for (name, len) in lengths {
            if len != count {
                return Err(invalid(format!("{len} {name} for {count} vertices")));
            }
        }
        if !self.colors.is_empty() && self.colors.len() != count {
            return Err(invalid(format!(
                "{} colors for {count} vertices",
                self.colors.len()
            )));
        }
        if self.indices.len() % 3 != 0 {
            return Err(invalid(format!(
                "index count {} is not a multiple of 3",
                self.indices.len()
            )));
        }
        if let Some(&index) = self.indices.iter().find(|&&i| i as usize >= count) {
            return Err(invalid(format!(
                "index {index} out of range for {count} vertices"
            )));
        }
        for (vertex, influences) in self.influences.iter().enumerate() {
            if let Some(influence) = influences
                .iter()
                .find(|influence| influence.vertex_index as usize != vertex)
            {
                return Err(invalid(format!(
                    "influence on vertex {vertex} is labelled with vertex {}",
                    influence.vertex_index
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Surface {
        Surface::new(2)
            .with_vertices([
                SurfaceVertex::new(Vec3::new(0.0, 0.0, 0.0)).with_influences(vec![(0, 1.0)]),
                SurfaceVertex::new(Vec3::new(1.0, 0.0, 0.0)).with_influences(vec![(0, 0.5), (1, 0.5)]),
                SurfaceVertex::new(Vec3::new(0.0, 1.0, 0.0)),
            ])
            .with_indices(vec![0, 1, 2])
    }

    #[test]
    fn push_vertex_fills_parallel_arrays() {
        let surface = triangle();
        assert_eq!(surface.vertex_count(), 3);
        assert_eq!(surface.triangle_count(), 1);
        assert_eq!(surface.material_index, 2);
        assert_eq!(surface.max_influences(), 2);
        assert_eq!(surface.influences[1][1], BoneInfluence::new(1, 1, 0.5));
        assert!(!surface.has_colors());
        assert_eq!(surface.uv_channel_count(), Some(0));
        assert!(surface.validate(0).is_ok());
    }

    #[test]
    fn empty_surface_has_no_channel_count() {
        assert_eq!(Surface::new(0).uv_channel_count(), None);
        assert!(Surface::new(0).validate(0).is_ok());
    }

    #[test]
    fn validate_rejects_partial_indices() {
        let surface = triangle().with_indices(vec![0, 1]);
        assert!(matches!(
            surface.validate(4),
            Err(MeshError::InvalidSurface { surface: 4, .. })
        ));
    }

    #[test]
    fn validate_rejects_out_of_range_index() {
        let surface = triangle().with_indices(vec![0, 1, 3]);
        assert!(surface.validate(0).is_err());
    }

    #[test]
    fn validate_rejects_missing_normals() {
        let mut surface = triangle();
        surface.normals.pop();
        assert!(surface.validate(0).is_err());
    }

    #[test]
    fn validate_rejects_partial_colors() {
        let mut surface = triangle();
        surface.colors.push([255, 0, 0, 255]);
        assert!(surface.validate(0).is_err());
    }

    #[test]
    fn validate_rejects_mislabelled_influence() {
        let mut surface = triangle();
        surface.influences[2].push(BoneInfluence::new(0, 1, 1.0));
        assert!(surface.validate(0).is_err());
    }
}
