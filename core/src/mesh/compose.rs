//! Merging surfaces into one skinned mesh.
//!
//! [`MeshComposer`] validates the surfaces, concatenates their vertex and
//! index data into global buffers, quantizes bone influences into
//! fixed-width records and emits one [`Section`] per surface.
//!
//! # Example
//!
//! ```ignore
//! let composition = MeshComposer::new(&skeleton)
//!     .with_config(ComposeConfig::new().with_max_influences(4))
//!     .compose(&[body, head])?;
//! for diagnostic in &composition.diagnostics {
//!     println!("{diagnostic}");
//! }
//! ```

use std::collections::BTreeSet;

use crate::error::{Diagnostic, MeshError, MeshResult};
use crate::skeleton::{BoneOverrides, Skeleton};
use crate::{profile_function, profile_plot, profile_scope};

use super::authoring::AuthoringRecord;
use super::bounds::Bounds;
use super::config::{BoneIndexWidthPolicy, ComposeConfig};
use super::data::AssembledMesh;
use super::section::{self, Section};
use super::skin_weights::{quantize_weight, SkinWeightBuffer, MAX_NARROW_BONE_INDEX};
use super::surface::Surface;
use super::vertex::{StaticVertex, DEFAULT_VERTEX_COLOR};

/// Result of a successful compose.
#[derive(Debug, Clone)]
pub struct Composition {
    pub mesh: AssembledMesh,
    /// Present when requested through [`ComposeConfig::with_authoring_record`].
    pub authoring: Option<AuthoringRecord>,
    /// Recoverable issues; the mesh is usable regardless.
    pub diagnostics: Vec<Diagnostic>,
}

/// Totals gathered before any buffer is allocated.
#[derive(Debug, Default)]
struct Counts {
    vertices: usize,
    indices: usize,
    max_influences: usize,
    max_bone_index: u32,
    uv_channels: usize,
}

/// Builds [`AssembledMesh`]es against one skeleton.
#[derive(Debug, Clone)]
pub struct MeshComposer<'a> {
    skeleton: &'a Skeleton,
    config: ComposeConfig,
    overrides: BoneOverrides,
}

impl<'a> MeshComposer<'a> {
    /// Creates a composer with the default configuration and no overrides.
    pub fn new(skeleton: &'a Skeleton) -> Self {
        Self {
            skeleton,
            config: ComposeConfig::default(),
            overrides: BoneOverrides::new(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: ComposeConfig) -> Self {
        self.config = config;
        self
    }

    /// Bind-pose overrides, used only by the authoring record.
    #[must_use]
    pub fn with_bone_overrides(mut self, overrides: BoneOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn config(&self) -> &ComposeConfig {
        &self.config
    }

    /// Merge `surfaces` into one mesh.
    ///
    /// Fails before allocating any output if a surface is malformed, the
    /// surfaces disagree on their UV channel count or a configured limit is
    /// exceeded. Influences on bones the skeleton lacks are dropped and
    /// reported as [`Diagnostic::UnknownBone`].
    pub fn compose(&self, surfaces: &[Surface]) -> MeshResult<Composition> {
        profile_function!();

        self.config.validate()?;
        let counts = self.count(surfaces)?;

        let use_16bit_bone_index = match self.config.bone_index_width {
            BoneIndexWidthPolicy::AutoNarrow => counts.max_bone_index <= MAX_NARROW_BONE_INDEX,
            BoneIndexWidthPolicy::AlwaysWide => false,
        };

        let mut vertices = Vec::with_capacity(counts.vertices);
        let mut uvs = Vec::with_capacity(counts.vertices * counts.uv_channels);
        let mut indices = Vec::with_capacity(counts.indices);
        let mut skin_weights =
            SkinWeightBuffer::new(counts.vertices, counts.max_influences, use_16bit_bone_index);
        let mut sections = Vec::with_capacity(surfaces.len());
        let mut diagnostics = Vec::new();

        for (surface_index, surface) in surfaces.iter().enumerate() {
            profile_scope!("compose_surface");

            let base_vertex = vertices.len();
            let base_index = indices.len();

            for v in 0..surface.vertex_count() {
                vertices.push(StaticVertex::encode(
                    surface.positions[v],
                    surface.tangents[v],
                    surface.normals[v],
                    surface.flip_binormal[v],
                    surface.colors.get(v).copied().unwrap_or(DEFAULT_VERTEX_COLOR),
                ));
                uvs.extend_from_slice(&surface.uvs[v]);
            }
            indices.extend(surface.indices.iter().map(|&i| i + base_vertex as u32));

            let referenced: BTreeSet<u32> = surface
                .influences
                .iter()
                .flatten()
                .filter(|influence| {
                    self.skeleton.is_valid_index(influence.bone_index)
                        && quantize_weight(influence.weight) > 0
                })
                .map(|influence| influence.bone_index)
                .collect();
            let bone_map = section::build_bone_map(
                self.config.bone_map,
                self.skeleton.bone_count(),
                &referenced,
            );
            let section = Section {
                base_vertex: base_vertex as u32,
                vertex_count: surface.vertex_count() as u32,
                base_index: base_index as u32,
                triangle_count: surface.triangle_count() as u32,
                material_index: surface.material_index,
                max_influences: counts.max_influences,
                bone_map,
            };

            for (v, influences) in surface.influences.iter().enumerate() {
                let slots = influences.iter().map(|influence| {
                    if !self.skeleton.is_valid_index(influence.bone_index) {
                        let diagnostic = Diagnostic::UnknownBone {
                            surface: surface_index,
                            vertex: influence.vertex_index,
                            bone: influence.bone_index,
                        };
                        log::warn!("{diagnostic}");
                        diagnostics.push(diagnostic);
                        return None;
                    }
                    // Zero-weight influences are absent from a Referenced map
                    // and quantize to an empty slot either way.
                    section
                        .local_bone_index(influence.bone_index)
                        .map(|local| (local, influence.weight))
                });
                skin_weights.write_record(base_vertex + v, slots);
            }

            log::trace!(
                "section {surface_index}: {} vertices at {}, {} triangles at {}, {} mapped bones",
                section.vertex_count,
                section.base_vertex,
                section.triangle_count,
                section.base_index,
                section.bone_map.len()
            );
            sections.push(section);
        }

        let bounds = Bounds::from_points(surfaces.iter().flat_map(|s| s.positions.iter()));
        let active_bones = section::active_bones(&sections);
        let mesh = AssembledMesh {
            vertices,
            uvs,
            indices,
            sections,
            skin_weights,
            use_16bit_bone_index,
            max_influences: counts.max_influences,
            uv_channel_count: counts.uv_channels,
            bounds,
            active_bones,
            has_vertex_colors: surfaces.iter().any(Surface::has_colors),
        };
        section::validate_sections(&mesh)?;

        let authoring = self
            .config
            .authoring_record
            .then(|| AuthoringRecord::build(&mesh, self.skeleton, &self.overrides))
            .transpose()?;

        profile_plot!("compose vertices", mesh.vertex_count());
        log::debug!(
            "Composed {} surfaces: {} vertices, {} triangles, {} influences/vertex, {}-bit bone indices, {} diagnostics",
            surfaces.len(),
            mesh.vertex_count(),
            mesh.triangle_count(),
            mesh.max_influences,
            if mesh.use_16bit_bone_index { 16 } else { 32 },
            diagnostics.len()
        );

        Ok(Composition {
            mesh,
            authoring,
            diagnostics,
        })
    }

    /// Validate every surface and gather the totals.
    fn count(&self, surfaces: &[Surface]) -> MeshResult<Counts> {
        profile_scope!("count_surfaces");

        let mut counts = Counts::default();
        let mut expected_uvs = None;
        for (surface_index, surface) in surfaces.iter().enumerate() {
            surface.validate(surface_index)?;

            for uvs in &surface.uvs {
                let expected = *expected_uvs.get_or_insert(uvs.len());
                if uvs.len() != expected {
                    return Err(MeshError::SchemaMismatch {
                        surface: surface_index,
                        expected,
                        found: uvs.len(),
                    });
                }
            }

            counts.vertices += surface.vertex_count();
            counts.indices += surface.indices.len();
            counts.max_influences = counts.max_influences.max(surface.max_influences());
            if let Some(bone) = surface
                .influences
                .iter()
                .flatten()
                .map(|influence| influence.bone_index)
                .max()
            {
                counts.max_bone_index = counts.max_bone_index.max(bone);
            }
        }
        counts.uv_channels = expected_uvs.unwrap_or(0);

        self.check_limits(&counts)?;
        Ok(counts)
    }

    fn check_limits(&self, counts: &Counts) -> MeshResult<()> {
        if counts.max_influences > self.config.max_influences {
            return Err(MeshError::LimitExceeded {
                what: "bone influences",
                value: counts.max_influences,
                limit: self.config.max_influences,
            });
        }
        if counts.uv_channels > self.config.max_uv_channels {
            return Err(MeshError::LimitExceeded {
                what: "UV channels",
                value: counts.uv_channels,
                limit: self.config.max_uv_channels,
            });
        }
        if counts.vertices > u32::MAX as usize {
            return Err(MeshError::LimitExceeded {
                what: "vertices",
                value: counts.vertices,
                limit: u32::MAX as usize,
            });
        }
        if counts.indices > u32::MAX as usize {
            return Err(MeshError::LimitExceeded {
                what: "indices",
                value: counts.indices,
                limit: u32::MAX as usize,
            });
        }
        Ok(())
    }
}

/// Compose `surfaces` against `skeleton` with `config` and no overrides.
pub fn compose(
    surfaces: &[Surface],
    skeleton: &Skeleton,
    config: &ComposeConfig,
) -> MeshResult<Composition> {
    MeshComposer::new(skeleton).with_config(*config).compose(surfaces)
}
