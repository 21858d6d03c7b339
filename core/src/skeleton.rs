//! Reference skeleton data types.
//!
//! The skeleton is read-only input to the assembler: it validates bone
//! indices referenced by influences, sizes the section bone maps, and feeds
//! the [`BonePoseResolver`](crate::pose::BonePoseResolver).

use std::collections::HashMap;

use crate::error::{MeshError, MeshResult};
use crate::math::{self, Mat4, Vec3};

/// Bone transform decomposed into translation, rotation, and scale.
///
/// Uses plain arrays for portability. Convert with [`BoneTransform::to_matrix`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoneTransform {
    /// Translation [x, y, z].
    pub translation: [f32; 3],
    /// Rotation quaternion [x, y, z, w].
    pub rotation: [f32; 4],
    /// Scale [x, y, z].
    pub scale: [f32; 3],
}

impl BoneTransform {
    /// Identity transform: no translation, identity rotation, unit scale.
    pub const IDENTITY: Self = Self {
        translation: [0.0, 0.0, 0.0],
        rotation: [0.0, 0.0, 0.0, 1.0],
        scale: [1.0, 1.0, 1.0],
    };

    /// Returns this transform with a different translation.
    #[must_use]
    pub const fn with_translation(mut self, translation: [f32; 3]) -> Self {
        self.translation = translation;
        self
    }

    /// Returns this transform with a different rotation.
    #[must_use]
    pub const fn with_rotation(mut self, rotation: [f32; 4]) -> Self {
        self.rotation = rotation;
        self
    }

    /// Returns this transform with a different scale.
    #[must_use]
    pub const fn with_scale(mut self, scale: [f32; 3]) -> Self {
        self.scale = scale;
        self
    }

    /// Column-major TRS matrix (scale, then rotate, then translate).
    pub fn to_matrix(&self) -> Mat4 {
        math::mat4_from_scale_rotation_translation(
            Vec3::from(self.scale),
            math::quat_from_array(self.rotation),
            Vec3::from(self.translation),
        )
    }

    /// Length of the translation, i.e. the distance from the parent joint.
    pub fn length(&self) -> f32 {
        Vec3::from(self.translation).norm()
    }
}

impl Default for BoneTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Sparse bone-name → transform map used to pose the bind skeleton.
pub type BoneOverrides = HashMap<String, BoneTransform>;

/// One bone of a reference skeleton.
#[derive(Debug, Clone, PartialEq)]
pub struct SkeletonBone {
    /// Unique bone name.
    pub name: String,
    /// Parent bone index, `None` for roots.
    pub parent: Option<usize>,
    /// Rest-pose transform relative to the parent.
    pub local: BoneTransform,
}

impl SkeletonBone {
    /// Creates a bone with an identity rest pose.
    pub fn new(name: impl Into<String>, parent: Option<usize>) -> Self {
        Self {
            name: name.into(),
            parent,
            local: BoneTransform::IDENTITY,
        }
    }

    /// Set the rest-pose local transform.
    #[must_use]
    pub fn with_local(mut self, local: BoneTransform) -> Self {
        self.local = local;
        self
    }
}

/// A validated bone hierarchy.
///
/// Parents are guaranteed to be in range and the hierarchy acyclic, but
/// parents need not precede their children.
#[derive(Debug, Clone)]
pub struct Skeleton {
    bones: Vec<SkeletonBone>,
    name_to_index: HashMap<String, usize>,
}

impl Skeleton {
    /// Validate and build a skeleton from its bones.
    pub fn new(bones: Vec<SkeletonBone>) -> MeshResult<Self> {
        let mut name_to_index = HashMap::with_capacity(bones.len());
        for (index, bone) in bones.iter().enumerate() {
            if let Some(parent) = bone.parent {
                if parent >= bones.len() {
                    return Err(MeshError::InvalidSkeleton(format!(
                        "bone {index} ('{}') has parent {parent}, but there are only {} bones",
                        bone.name,
                        bones.len()
                    )));
                }
            }
            if name_to_index.insert(bone.name.clone(), index).is_some() {
                return Err(MeshError::InvalidSkeleton(format!(
                    "duplicate bone name '{}'",
                    bone.name
                )));
            }
        }

        // 0 = unvisited, 1 = on the current parent walk, 2 = known acyclic.
        let mut state = vec![0u8; bones.len()];
        let mut walk = Vec::new();
        for start in 0..bones.len() {
            let mut current = Some(start);
            while let Some(index) = current {
                match state[index] {
                    2 => break,
                    1 => {
                        return Err(MeshError::InvalidSkeleton(format!(
                            "bone {index} ('{}') is part of a parent cycle",
                            bones[index].name
                        )));
                    }
                    _ => {
                        state[index] = 1;
                        walk.push(index);
                        current = bones[index].parent;
                    }
                }
            }
            for index in walk.drain(..) {
                state[index] = 2;
            }
        }

        Ok(Self {
            bones,
            name_to_index,
        })
    }

    /// Number of bones.
    pub fn bone_count(&self) -> usize {
        self.bones.len()
    }

    /// All bones in index order.
    pub fn bones(&self) -> &[SkeletonBone] {
        &self.bones
    }

    /// Get a bone by index.
    pub fn bone(&self, index: usize) -> Option<&SkeletonBone> {
        self.bones.get(index)
    }

    /// Look up a bone index by name.
    pub fn find_bone(&self, name: &str) -> Option<usize> {
        self.name_to_index.get(name).copied()
    }

    /// Whether `index` names a bone of this skeleton.
    pub fn is_valid_index(&self, index: u32) -> bool {
        (index as usize) < self.bones.len()
    }

    /// Number of direct children of each bone.
    pub fn child_counts(&self) -> Vec<u32> {
        let mut counts = vec![0u32; self.bones.len()];
        for bone in &self.bones {
            if let Some(parent) = bone.parent {
                counts[parent] += 1;
            }
        }
        counts
    }
}
