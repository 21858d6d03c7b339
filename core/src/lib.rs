//! # skinmesh core
//!
//! Assembles independently-authored, skinned surfaces into one set of
//! hardware-skinning buffers (vertices, UVs, indices, quantized skin
//! weights, sections) and decomposes them back.
//!
//! ```ignore
//! use skinmesh_core::mesh::{compose, decompose, ComposeConfig};
//!
//! let composition = compose(&surfaces, &skeleton, &ComposeConfig::default())?;
//! let surfaces = decompose(&composition.mesh)?;
//! ```

pub mod error;
pub mod handoff;
pub mod math;
pub mod mesh;
pub mod pose;
pub mod profiling;
pub mod skeleton;

pub use error::{Diagnostic, MeshError, MeshResult};

/// Core library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
