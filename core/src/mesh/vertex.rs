//! Packed static vertex records.
//!
//! Each merged vertex is stored as a [`StaticVertex`] with a full tangent
//! basis: `tangent_x` is the tangent, `tangent_y` the bitangent and
//! `tangent_z` the normal. UV channels live in a separate strided buffer
//! owned by [`AssembledMesh`](super::AssembledMesh).

use crate::math::{self, Vec3};

/// Cosine threshold used to recover the binormal flip flag.
///
/// A stored bitangent whose dot product with `cross(normal, tangent)` is
/// below this value is treated as flipped. Near-degenerate tangent bases can
/// therefore round-trip with a different flag.
pub const FLIP_BINORMAL_THRESHOLD: f32 = 0.99;

/// Color written for surfaces that carry no vertex colors.
pub const DEFAULT_VERTEX_COLOR: [u8; 4] = [255, 255, 255, 255];

/// Packed vertex: position, tangent basis and RGBA8 color (52 bytes).
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct StaticVertex {
    pub position: [f32; 3],
    pub tangent_x: [f32; 3],
    pub tangent_y: [f32; 3],
    pub tangent_z: [f32; 3],
    pub color: [u8; 4],
}

impl StaticVertex {
    /// Size of one record in bytes.
    pub const SIZE: usize = std::mem::size_of::<Self>();

    /// Encode one surface vertex. The bitangent is derived from the normal,
    /// tangent and flip flag.
    pub fn encode(
        position: Vec3,
        tangent: Vec3,
        normal: Vec3,
        flip_binormal: bool,
        color: [u8; 4],
    ) -> Self {
        let bitangent = math::bitangent(normal, tangent, flip_binormal);
        Self {
            position: position.into(),
            tangent_x: tangent.into(),
            tangent_y: bitangent.into(),
            tangent_z: normal.into(),
            color,
        }
    }

    pub fn position(&self) -> Vec3 {
        Vec3::from(self.position)
    }

    pub fn tangent(&self) -> Vec3 {
        Vec3::from(self.tangent_x)
    }

    pub fn bitangent(&self) -> Vec3 {
        Vec3::from(self.tangent_y)
    }

    pub fn normal(&self) -> Vec3 {
        Vec3::from(self.tangent_z)
    }

    /// Recover the binormal flip flag from the stored basis.
    pub fn flip_binormal(&self) -> bool {
        let expected = self.normal().cross(&self.tangent());
        self.bitangent().dot(&expected) < FLIP_BINORMAL_THRESHOLD
    }
}
