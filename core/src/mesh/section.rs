//! Section metadata and the post-assembly consistency check.

use std::collections::BTreeSet;
use std::ops::Range;

use crate::error::{MeshError, MeshResult};

use super::config::BoneMapPolicy;
use super::data::AssembledMesh;

/// Where one source surface lives inside the merged buffers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// First vertex of the section in the global vertex buffer.
    pub base_vertex: u32,
    pub vertex_count: u32,
    /// First index of the section in the global index buffer.
    pub base_index: u32,
    pub triangle_count: u32,
    pub material_index: u32,
    /// Influence slots to read per vertex.
    pub max_influences: usize,
    /// Local bone-map index to skeleton bone index, ascending.
    pub bone_map: Vec<u32>,
}

impl Section {
    /// Number of indices, widened so corrupt triangle counts cannot wrap.
    pub fn index_count(&self) -> usize {
        self.triangle_count as usize * 3
    }

    pub fn vertex_range(&self) -> Range<usize> {
        self.base_vertex as usize..self.base_vertex as usize + self.vertex_count as usize
    }

    pub fn index_range(&self) -> Range<usize> {
        self.base_index as usize..self.base_index as usize + self.index_count()
    }

    /// Local bone-map index of a skeleton bone.
    pub fn local_bone_index(&self, skeleton_bone: u32) -> Option<u32> {
        self.bone_map
            .binary_search(&skeleton_bone)
            .ok()
            .map(|local| local as u32)
    }
}

/// Bone map of one section.
///
/// `referenced` holds the valid skeleton bones used by the section's
/// influences.
pub(crate) fn build_bone_map(
    policy: BoneMapPolicy,
    bone_count: usize,
    referenced: &BTreeSet<u32>,
) -> Vec<u32> {
    match policy {
        BoneMapPolicy::FullSkeleton => (0..bone_count as u32).collect(),
        BoneMapPolicy::Referenced => referenced.iter().copied().collect(),
    }
}

/// Union of every section's bone map, ascending.
pub(crate) fn active_bones(sections: &[Section]) -> Vec<usize> {
    let bones: BTreeSet<u32> = sections
        .iter()
        .flat_map(|section| section.bone_map.iter().copied())
        .collect();
    bones.into_iter().map(|bone| bone as usize).collect()
}

/// Cross-check the sections of `mesh` against its buffers.
///
/// Sections must tile the vertex and index buffers contiguously, in order,
/// starting at zero. Every vertex must own one skin-weight record and
/// `uv_channel_count` UVs.
pub fn validate_sections(mesh: &AssembledMesh) -> MeshResult<()> {
    let violation = |message: String| Err(MeshError::InvariantViolation(message));

    let mut next_vertex = 0usize;
    let mut next_index = 0usize;
    for (i, section) in mesh.sections.iter().enumerate() {
        if section.base_vertex as usize != next_vertex {
            return violation(format!(
                "section {i} starts at vertex {}, expected {next_vertex}",
                section.base_vertex
            ));
        }
        if section.base_index as usize != next_index {
            return violation(format!(
                "section {i} starts at index {}, expected {next_index}",
                section.base_index
            ));
        }
        if section.max_influences > mesh.skin_weights.influences_per_vertex() {
            return violation(format!(
                "section {i} reads {} influences, records hold {}",
                section.max_influences,
                mesh.skin_weights.influences_per_vertex()
            ));
        }
        if section.bone_map.windows(2).any(|pair| pair[0] >= pair[1]) {
            return violation(format!("section {i} bone map is not strictly ascending"));
        }
        let (Some(vertex_end), Some(index_end)) = (
            next_vertex.checked_add(section.vertex_count as usize),
            next_index.checked_add(section.index_count()),
        ) else {
            return violation(format!("section {i} extends past the addressable range"));
        };
        next_vertex = vertex_end;
        next_index = index_end;
    }

    if next_vertex != mesh.vertices.len() {
        return violation(format!(
            "sections cover {next_vertex} vertices, buffer holds {}",
            mesh.vertices.len()
        ));
    }
    if next_index != mesh.indices.len() {
        return violation(format!(
            "sections cover {next_index} indices, buffer holds {}",
            mesh.indices.len()
        ));
    }
    if mesh.skin_weights.vertex_count() != mesh.vertices.len() {
        return violation(format!(
            "{} skin-weight records for {} vertices",
            mesh.skin_weights.vertex_count(),
            mesh.vertices.len()
        ));
    }
    if mesh.uvs.len() != mesh.vertices.len() * mesh.uv_channel_count {
        return violation(format!(
            "{} UVs for {} vertices with {} channels",
            mesh.uvs.len(),
            mesh.vertices.len(),
            mesh.uv_channel_count
        ));
    }
    Ok(())
}
