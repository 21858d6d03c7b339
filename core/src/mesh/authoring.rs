//! Editor-style import record built alongside an assembled mesh.
//!
//! The record mirrors what a content editor keeps for re-import: unique
//! points, one wedge per triangle corner, faces with per-corner tangent
//! frames, dequantized influences and the reference skeleton with its bind
//! pose. It is derived entirely from the [`AssembledMesh`] so both always
//! agree.

use crate::error::{MeshError, MeshResult};
use crate::math::{Vec2, Vec3};
use crate::profile_function;
use crate::skeleton::{BoneOverrides, BoneTransform, Skeleton};

use super::data::AssembledMesh;
use super::section::validate_sections;
use super::skin_weights::{dequantize_weight, INVALID_BONE};

/// One triangle corner.
#[derive(Debug, Clone, PartialEq)]
pub struct Wedge {
    /// Index into [`AuthoringRecord::points`].
    pub point: u32,
    pub uvs: Vec<Vec2>,
    pub color: [u8; 4],
    pub section: usize,
}

/// One triangle, referencing three wedges.
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    pub wedges: [u32; 3],
    pub tangent_x: [Vec3; 3],
    pub tangent_y: [Vec3; 3],
    pub tangent_z: [Vec3; 3],
    pub section: usize,
}

/// A point's skinning weight on one skeleton bone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointInfluence {
    pub point: u32,
    pub bone: u32,
    pub weight: f32,
}

/// A skeleton bone with its bind transform.
#[derive(Debug, Clone, PartialEq)]
pub struct RefBone {
    pub name: String,
    pub parent: Option<usize>,
    pub child_count: u32,
    /// Override transform if one was given, the rest local transform otherwise.
    pub bind: BoneTransform,
    /// Distance from the parent joint.
    pub length: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AuthoringRecord {
    pub points: Vec<Vec3>,
    pub wedges: Vec<Wedge>,
    pub faces: Vec<Face>,
    pub influences: Vec<PointInfluence>,
    pub ref_bones: Vec<RefBone>,
    pub uv_channel_count: usize,
    pub has_vertex_colors: bool,
    pub material_count: usize,
}

impl AuthoringRecord {
    /// Derive the record from an assembled mesh.
    ///
    /// Fails with [`MeshError::InvariantViolation`] if the sections do not
    /// tile the buffers, and with [`MeshError::CorruptMesh`] if an index
    /// points past the vertex buffer.
    pub fn build(
        mesh: &AssembledMesh,
        skeleton: &Skeleton,
        overrides: &BoneOverrides,
    ) -> MeshResult<Self> {
        profile_function!();

        validate_sections(mesh)?;
        if let Some(index) = mesh
            .indices
            .iter()
            .find(|&&index| index as usize >= mesh.vertices.len())
        {
            return Err(MeshError::CorruptMesh(format!(
                "index {index} exceeds the vertex buffer ({})",
                mesh.vertices.len()
            )));
        }

        let points = mesh.vertices.iter().map(|v| v.position()).collect();

        let mut wedges = Vec::with_capacity(mesh.indices.len());
        let mut faces = Vec::with_capacity(mesh.triangle_count());
        let mut influences = Vec::new();

        for (section_index, section) in mesh.sections.iter().enumerate() {
            for corners in mesh.indices[section.index_range()].chunks_exact(3) {
                let first_wedge = wedges.len() as u32;
                let corner_vertices =
                    [corners[0], corners[1], corners[2]].map(|i| &mesh.vertices[i as usize]);
                for &vertex in corners {
                    let v = &mesh.vertices[vertex as usize];
                    wedges.push(Wedge {
                        point: vertex,
                        uvs: mesh.vertex_uvs(vertex as usize).to_vec(),
                        color: v.color,
                        section: section_index,
                    });
                }
                faces.push(Face {
                    wedges: [first_wedge, first_wedge + 1, first_wedge + 2],
                    tangent_x: corner_vertices.map(|v| v.tangent()),
                    tangent_y: corner_vertices.map(|v| v.bitangent()),
                    tangent_z: corner_vertices.map(|v| v.normal()),
                    section: section_index,
                });
            }

            for vertex in section.vertex_range() {
                for (local, weight) in mesh
                    .skin_weights
                    .record(vertex)
                    .take(section.max_influences)
                {
                    if local == INVALID_BONE || weight == 0 {
                        continue;
                    }
                    if let Some(&bone) = section.bone_map.get(local as usize) {
                        influences.push(PointInfluence {
                            point: vertex as u32,
                            bone,
                            weight: dequantize_weight(weight),
                        });
                    }
                }
            }
        }

        let child_counts = skeleton.child_counts();
        let ref_bones = skeleton
            .bones()
            .iter()
            .zip(child_counts)
            .map(|(bone, child_count)| {
                let bind = overrides.get(&bone.name).copied().unwrap_or(bone.local);
                RefBone {
                    name: bone.name.clone(),
                    parent: bone.parent,
                    child_count,
                    bind,
                    length: bind.length(),
                }
            })
            .collect();

        Ok(Self {
            points,
            wedges,
            faces,
            influences,
            ref_bones,
            uv_channel_count: mesh.uv_channel_count,
            has_vertex_colors: mesh.has_vertex_colors,
            material_count: mesh.material_count(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::compose::compose;
    use crate::mesh::config::ComposeConfig;
    use crate::mesh::surface::{Surface, SurfaceVertex};
    use crate::skeleton::SkeletonBone;

    fn skeleton() -> Skeleton {
        Skeleton::new(vec![
            SkeletonBone::new("root", None),
            SkeletonBone::new("spine", Some(0))
                .with_local(BoneTransform::IDENTITY.with_translation([0.0, 2.0, 0.0])),
            SkeletonBone::new("head", Some(1)),
        ])
        .unwrap()
    }

    fn quad() -> Surface {
        Surface::new(1)
            .with_vertices([
                SurfaceVertex::new(Vec3::new(0.0, 0.0, 0.0))
                    .with_uvs(vec![Vec2::new(0.0, 0.0)])
                    .with_color([255, 0, 0, 255])
                    .with_influences(vec![(1, 1.0)]),
                SurfaceVertex::new(Vec3::new(1.0, 0.0, 0.0))
                    .with_uvs(vec![Vec2::new(1.0, 0.0)])
                    .with_color([0, 255, 0, 255])
                    .with_influences(vec![(1, 0.5), (2, 0.5)]),
                SurfaceVertex::new(Vec3::new(1.0, 1.0, 0.0))
                    .with_uvs(vec![Vec2::new(1.0, 1.0)])
                    .with_color([0, 0, 255, 255])
                    .with_influences(vec![(2, 0.0)]),
                SurfaceVertex::new(Vec3::new(0.0, 1.0, 0.0))
                    .with_uvs(vec![Vec2::new(0.0, 1.0)])
                    .with_color([255, 255, 255, 255]),
            ])
            .with_indices(vec![0, 1, 2, 0, 2, 3])
    }

    #[test]
    fn test_record_counts() {
        let skeleton = skeleton();
        let mesh = compose(&[quad()], &skeleton, &ComposeConfig::default())
            .unwrap()
            .mesh;
        let record = AuthoringRecord::build(&mesh, &skeleton, &BoneOverrides::new()).unwrap();

        assert_eq!(record.points.len(), 4);
        assert_eq!(record.faces.len(), 2);
        assert_eq!(record.wedges.len(), 6);
        assert_eq!(record.uv_channel_count, 1);
        assert!(record.has_vertex_colors);
        assert_eq!(record.material_count, 2);

        assert_eq!(record.faces[1].wedges, [3, 4, 5]);
        assert_eq!(record.wedges[4].point, 2);
        assert_eq!(record.wedges[4].uvs, vec![Vec2::new(1.0, 1.0)]);
        assert_eq!(record.wedges[5].color, [255, 255, 255, 255]);
        assert_eq!(record.faces[0].tangent_z[0], Vec3::z());
    }

    #[test]
    fn test_influences_skip_empty_slots() {
        let skeleton = skeleton();
        let mesh = compose(&[quad()], &skeleton, &ComposeConfig::default())
            .unwrap()
            .mesh;
        let record = AuthoringRecord::build(&mesh, &skeleton, &BoneOverrides::new()).unwrap();

        let bones: Vec<(u32, u32)> = record.influences.iter().map(|i| (i.point, i.bone)).collect();
        assert_eq!(bones, vec![(0, 1), (1, 1), (1, 2)]);
        assert!((record.influences[0].weight - 1.0).abs() < 1e-6);
        assert!((record.influences[1].weight - 0.5).abs() <= 1.0 / 255.0);
    }

    #[test]
    fn test_ref_bones_use_overrides() {
        let skeleton = skeleton();
        let mesh = compose(&[quad()], &skeleton, &ComposeConfig::default())
            .unwrap()
            .mesh;
        let mut overrides = BoneOverrides::new();
        overrides.insert(
            "head".to_string(),
            BoneTransform::IDENTITY.with_translation([0.0, 0.0, 3.0]),
        );
        let record = AuthoringRecord::build(&mesh, &skeleton, &overrides).unwrap();

        assert_eq!(record.ref_bones.len(), 3);
        assert_eq!(record.ref_bones[0].child_count, 1);
        assert_eq!(record.ref_bones[2].parent, Some(1));
        assert!((record.ref_bones[1].length - 2.0).abs() < 1e-6);
        assert_eq!(record.ref_bones[2].bind.translation, [0.0, 0.0, 3.0]);
        assert!((record.ref_bones[2].length - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_inconsistent_mesh_is_rejected() {
        let skeleton = skeleton();
        let overrides = BoneOverrides::new();
        let mesh = compose(&[quad()], &skeleton, &ComposeConfig::default())
            .unwrap()
            .mesh;

        let mut stray_index = mesh.clone();
        stray_index.indices[4] = 40;
        assert!(matches!(
            AuthoringRecord::build(&stray_index, &skeleton, &overrides),
            Err(MeshError::CorruptMesh(_))
        ));

        let mut long_section = mesh;
        long_section.sections[0].triangle_count = u32::MAX / 3 + 1;
        assert!(matches!(
            AuthoringRecord::build(&long_section, &skeleton, &overrides),
            Err(MeshError::InvariantViolation(_))
        ));
    }
}
