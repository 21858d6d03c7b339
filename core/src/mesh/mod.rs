//! Skinned mesh assembly.
//!
//! This module merges independently-authored surfaces into one set of
//! hardware-skinning buffers and splits them back apart:
//!
//! - [`Surface`] - One caller-authored mesh piece with its own material
//! - [`MeshComposer`] / [`compose()`] - Surfaces to an [`AssembledMesh`]
//! - [`decompose()`] - An [`AssembledMesh`] back to surfaces
//! - [`SkinWeightBuffer`] - Fixed-width quantized bone influences
//! - [`AuthoringRecord`] - Optional editor-style import record

mod authoring;
mod bounds;
mod compose;
mod config;
mod data;
mod decompose;
mod section;
mod skin_weights;
mod surface;
mod vertex;

pub use authoring::{AuthoringRecord, Face, PointInfluence, RefBone, Wedge};
pub use bounds::Bounds;
pub use compose::{compose, Composition, MeshComposer};
pub use config::{BoneIndexWidthPolicy, BoneMapPolicy, ComposeConfig};
pub use data::{AssembledMesh, IndexFormat};
pub use decompose::decompose;
pub use section::{validate_sections, Section};
pub use skin_weights::{
    dequantize_weight, quantize_weight, SkinWeightBuffer, INVALID_BONE, MAX_NARROW_BONE_INDEX,
    MAX_TOTAL_INFLUENCES,
};
pub use surface::{BoneInfluence, Surface, SurfaceVertex};
pub use vertex::{StaticVertex, DEFAULT_VERTEX_COLOR, FLIP_BINORMAL_THRESHOLD};
