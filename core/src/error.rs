//! Error and diagnostic types for mesh assembly.

use std::fmt;

use thiserror::Error;

/// Fatal errors raised by compose, decompose, and skeleton construction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MeshError {
    /// Surfaces disagree on the number of UV channels.
    #[error("UV channel count mismatch: surface {surface} has {found} channels, expected {expected}")]
    SchemaMismatch {
        /// Offending surface index.
        surface: usize,
        /// Channel count established by the first vertex of the first surface.
        expected: usize,
        /// Channel count found on the offending vertex.
        found: usize,
    },
    /// A hardware ceiling was exceeded.
    #[error("{what} exceeds the configured limit: {value} > {limit}")]
    LimitExceeded {
        /// Which ceiling ("bone influences" or "UV channels").
        what: &'static str,
        /// Requested value.
        value: usize,
        /// Configured ceiling.
        limit: usize,
    },
    /// A surface violates its own structural invariants.
    #[error("invalid surface {surface}: {reason}")]
    InvalidSurface {
        /// Offending surface index.
        surface: usize,
        /// What is wrong with it.
        reason: String,
    },
    /// The compose configuration cannot be honored.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// The bone hierarchy is malformed.
    #[error("invalid skeleton: {0}")]
    InvalidSkeleton(String),
    /// An assembled mesh has sections that do not fit its buffers.
    #[error("corrupt mesh: {0}")]
    CorruptMesh(String),
    /// Internal consistency check failed after assembly.
    #[error("assembly invariant violated: {0}")]
    InvariantViolation(String),
}

/// Result type for mesh operations.
pub type MeshResult<T> = Result<T, MeshError>;

/// Recoverable issues reported while composing.
///
/// The operation still produces a usable mesh; each diagnostic describes
/// data that was dropped along the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// An influence referenced a bone the skeleton does not have.
    /// The influence slot was left empty.
    UnknownBone {
        /// Surface the influence belongs to.
        surface: usize,
        /// Vertex index local to the surface.
        vertex: u32,
        /// The bone index that could not be resolved.
        bone: u32,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownBone {
                surface,
                vertex,
                bone,
            } => write!(
                f,
                "bone {bone} isn't found in the skeleton (surface {surface}, vertex {vertex}); influence dropped"
            ),
        }
    }
}
