//! Compose configuration.

use crate::error::{MeshError, MeshResult};

use super::skin_weights::MAX_TOTAL_INFLUENCES;

/// How bone indices in the skin-weight buffer are encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BoneIndexWidthPolicy {
    /// 16-bit when every referenced bone index fits, 32-bit otherwise.
    #[default]
    AutoNarrow,
    /// Always 32-bit.
    AlwaysWide,
}

/// Which bones a section's bone map lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BoneMapPolicy {
    /// Every bone of the skeleton, so partial updates never rebuild maps.
    #[default]
    FullSkeleton,
    /// Only the bones referenced by the section's influences.
    Referenced,
}

/// Options for [`MeshComposer`](super::MeshComposer).
///
/// # Example
///
/// ```ignore
/// let config = ComposeConfig::new()
///     .with_max_influences(4)
///     .with_bone_map(BoneMapPolicy::Referenced)
///     .with_authoring_record(true);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComposeConfig {
    /// Most influences allowed on one vertex.
    pub max_influences: usize,
    /// Most UV channels allowed.
    pub max_uv_channels: usize,
    pub bone_index_width: BoneIndexWidthPolicy,
    pub bone_map: BoneMapPolicy,
    /// Also produce an [`AuthoringRecord`](super::AuthoringRecord).
    pub authoring_record: bool,
}

impl ComposeConfig {
    pub const DEFAULT_MAX_INFLUENCES: usize = 8;
    pub const DEFAULT_MAX_UV_CHANNELS: usize = 4;

    pub fn new() -> Self {
        Self {
            max_influences: Self::DEFAULT_MAX_INFLUENCES,
            max_uv_channels: Self::DEFAULT_MAX_UV_CHANNELS,
            bone_index_width: BoneIndexWidthPolicy::AutoNarrow,
            bone_map: BoneMapPolicy::FullSkeleton,
            authoring_record: false,
        }
    }

    #[must_use]
    pub fn with_max_influences(mut self, max_influences: usize) -> Self {
        self.max_influences = max_influences;
        self
    }

    #[must_use]
    pub fn with_max_uv_channels(mut self, max_uv_channels: usize) -> Self {
        self.max_uv_channels = max_uv_channels;
        self
    }

    #[must_use]
    pub fn with_bone_index_width(mut self, policy: BoneIndexWidthPolicy) -> Self {
        self.bone_index_width = policy;
        self
    }

    #[must_use]
    pub fn with_bone_map(mut self, policy: BoneMapPolicy) -> Self {
        self.bone_map = policy;
        self
    }

    #[must_use]
    pub fn with_authoring_record(mut self, enabled: bool) -> Self {
        self.authoring_record = enabled;
        self
    }

    /// Check the configuration against the skin-weight record width.
    pub fn validate(&self) -> MeshResult<()> {
        if self.max_influences > MAX_TOTAL_INFLUENCES {
            return Err(MeshError::InvalidConfig(format!(
                "max_influences {} exceeds the record width {MAX_TOTAL_INFLUENCES}",
                self.max_influences
            )));
        }
        Ok(())
    }
}

impl Default for ComposeConfig {
    fn default() -> Self {
        Self::new()
    }
}
