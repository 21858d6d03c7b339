//! Splitting an assembled mesh back into surfaces.

use crate::error::{MeshError, MeshResult};
use crate::profile_function;

use super::data::AssembledMesh;
use super::section::Section;
use super::skin_weights::{dequantize_weight, INVALID_BONE};
use super::surface::{BoneInfluence, Surface};

/// Recover one surface per section.
///
/// Attributes, UVs, colors and indices come back exactly. Weights are
/// dequantized from bytes and the binormal flip flag is recovered with
/// [`FLIP_BINORMAL_THRESHOLD`](super::FLIP_BINORMAL_THRESHOLD), so both are
/// approximate. Empty skin-weight slots are not emitted.
///
/// Any section that does not fit the buffers fails the whole call with
/// [`MeshError::CorruptMesh`].
pub fn decompose(mesh: &AssembledMesh) -> MeshResult<Vec<Surface>> {
    profile_function!();

    let surfaces = mesh
        .sections
        .iter()
        .enumerate()
        .map(|(index, section)| decompose_section(mesh, index, section))
        .collect::<MeshResult<Vec<_>>>()?;

    log::debug!(
        "Decomposed mesh into {} surfaces ({} vertices)",
        surfaces.len(),
        mesh.vertex_count()
    );
    Ok(surfaces)
}

fn decompose_section(mesh: &AssembledMesh, index: usize, section: &Section) -> MeshResult<Surface> {
    let corrupt = |message: String| MeshError::CorruptMesh(format!("section {index}: {message}"));

    let vertices = section.vertex_range();
    if vertices.end > mesh.vertices.len() {
        return Err(corrupt(format!(
            "vertices {vertices:?} exceed the vertex buffer ({})",
            mesh.vertices.len()
        )));
    }
    let index_range = section.index_range();
    if index_range.end > mesh.indices.len() {
        return Err(corrupt(format!(
            "indices {index_range:?} exceed the index buffer ({})",
            mesh.indices.len()
        )));
    }
    if vertices.end > mesh.skin_weights.vertex_count() {
        return Err(corrupt(format!(
            "vertices {vertices:?} exceed the skin-weight buffer ({})",
            mesh.skin_weights.vertex_count()
        )));
    }
    if vertices.end * mesh.uv_channel_count > mesh.uvs.len() {
        return Err(corrupt(format!(
            "vertices {vertices:?} exceed the UV buffer ({} UVs, {} channels)",
            mesh.uvs.len(),
            mesh.uv_channel_count
        )));
    }
    if section.max_influences > mesh.skin_weights.influences_per_vertex() {
        return Err(corrupt(format!(
            "reads {} influences, records hold {}",
            section.max_influences,
            mesh.skin_weights.influences_per_vertex()
        )));
    }

    let mut surface = Surface::new(section.material_index);
    let count = vertices.len();
    surface.positions.reserve(count);
    surface.tangents.reserve(count);
    surface.normals.reserve(count);
    surface.flip_binormal.reserve(count);
    surface.uvs.reserve(count);
    surface.influences.reserve(count);

    for (local, global) in vertices.clone().enumerate() {
        let vertex = &mesh.vertices[global];
        surface.positions.push(vertex.position());
        surface.tangents.push(vertex.tangent());
        surface.normals.push(vertex.normal());
        surface.flip_binormal.push(vertex.flip_binormal());
        if mesh.has_vertex_colors {
            surface.colors.push(vertex.color);
        }
        surface.uvs.push(mesh.vertex_uvs(global).to_vec());

        let mut influences = Vec::new();
        for (slot, weight) in mesh
            .skin_weights
            .record(global)
            .take(section.max_influences)
        {
            if slot == INVALID_BONE || weight == 0 {
                continue;
            }
            let bone = section.bone_map.get(slot as usize).ok_or_else(|| {
                corrupt(format!(
                    "vertex {global} references bone-map entry {slot}, map has {}",
                    section.bone_map.len()
                ))
            })?;
            influences.push(BoneInfluence::new(
                local as u32,
                *bone,
                dequantize_weight(weight),
            ));
        }
        surface.influences.push(influences);
    }

    surface.indices = mesh.indices[index_range]
        .iter()
        .map(|&global| {
            if (global as usize) < vertices.start || (global as usize) >= vertices.end {
                Err(corrupt(format!(
                    "index {global} outside the section's vertices {vertices:?}"
                )))
            } else {
                Ok(global - section.base_vertex)
            }
        })
        .collect::<MeshResult<Vec<_>>>()?;

    log::trace!(
        "section {index}: recovered {} vertices, {} triangles",
        surface.vertex_count(),
        surface.triangle_count()
    );
    Ok(surface)
}
