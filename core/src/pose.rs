//! Global bone transforms for a (possibly re-posed) bind skeleton.
//!
//! [`BonePoseResolver`] accumulates each bone's local transform up the
//! hierarchy once, so callers can query component-space transforms in O(1)
//! by index. Overrides are keyed by bone name and applied in the bone's own
//! space after composing with the parent:
//!
//! ```text
//! global(b) = global(parent(b)) * local(b) * override(b)
//! ```
//!
//! Roots use the identity as their parent transform.

use crate::math::Mat4;
use crate::profile_function;
use crate::skeleton::{BoneOverrides, Skeleton};

/// Memoized global transforms for every bone of a skeleton.
#[derive(Debug, Clone)]
pub struct BonePoseResolver<'a> {
    skeleton: &'a Skeleton,
    global: Vec<Mat4>,
}

impl<'a> BonePoseResolver<'a> {
    /// Resolve every bone of `skeleton`, applying `overrides` by bone name.
    ///
    /// Override names that do not match any bone are ignored.
    pub fn new(skeleton: &'a Skeleton, overrides: &BoneOverrides) -> Self {
        profile_function!();

        let bone_count = skeleton.bone_count();
        let override_matrices: Vec<Option<Mat4>> = skeleton
            .bones()
            .iter()
            .map(|bone| overrides.get(&bone.name).map(|t| t.to_matrix()))
            .collect();

        let mut global = vec![Mat4::identity(); bone_count];
        let mut resolved = vec![false; bone_count];
        let mut pending = Vec::new();

        for start in 0..bone_count {
            // Walk up to the first resolved ancestor (or past the root), then
            // fill the chain back down. Skeleton guarantees no cycles.
            let mut current = Some(start);
            while let Some(index) = current {
                if resolved[index] {
                    break;
                }
                pending.push(index);
                current = skeleton.bones()[index].parent;
            }

            while let Some(index) = pending.pop() {
                let bone = &skeleton.bones()[index];
                let parent = bone
                    .parent
                    .map_or_else(Mat4::identity, |parent| global[parent]);
                let mut transform = parent * bone.local.to_matrix();
                if let Some(pose) = &override_matrices[index] {
                    transform *= pose;
                }
                global[index] = transform;
                resolved[index] = true;
            }
        }

        let unmatched = overrides
            .keys()
            .filter(|name| skeleton.find_bone(name).is_none())
            .count();
        if unmatched > 0 {
            log::debug!("{unmatched} bone override(s) did not match any bone");
        }

        Self { skeleton, global }
    }

    /// Number of resolved bones.
    pub fn bone_count(&self) -> usize {
        self.global.len()
    }

    /// Global transform of the bone at `index`.
    pub fn global_transform(&self, index: usize) -> Option<&Mat4> {
        self.global.get(index)
    }

    /// Global transform of the named bone, or identity if there is no such bone.
    pub fn global_transform_by_name(&self, name: &str) -> Mat4 {
        self.skeleton
            .find_bone(name)
            .and_then(|index| self.global.get(index))
            .copied()
            .unwrap_or_else(Mat4::identity)
    }

    /// All global transforms in bone index order.
    pub fn global_transforms(&self) -> &[Mat4] {
        &self.global
    }
}
