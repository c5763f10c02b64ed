//! Serializable layout schema manifests.
//!
//! The shader programs are compiled in a separate build step from the host
//! renderer, and nothing in either toolchain checks the other's idea of the
//! uniform layouts. The schema closes that gap: the host exports
//! [`LayoutSchema::current`] as JSON, the shader build step does the same
//! from its own declarations, and [`LayoutSchema::verify_against`] turns
//! any divergence into a [`UniformLayoutError::LayoutMismatch`] before a
//! single frame is drawn.
//!
//! Two revisions of the layout exist in the wild. They are independent
//! contracts, not steps of a migration: fields were added, removed, and
//! renamed between them, so no automatic upgrade is offered. Revision 1 is
//! kept here as frozen data for diagnosing peers built against it.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::blocks::{Light, UniformBlock};
use crate::error::UniformLayoutError;
use crate::layout::{BlockLayout, UniformGroup};

/// The revision implemented by the host structs in [`crate::blocks`].
pub const CURRENT_REVISION: u32 = 2;

/// One field of a block: name, byte offset, byte size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSchema {
    /// Field name.
    pub name: String,
    /// Byte offset from the start of the block.
    pub offset: usize,
    /// Byte size of the field.
    pub size: usize,
}

/// The layout of one uniform block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockSchema {
    /// Block name.
    pub name: String,
    /// Total byte size.
    pub size: usize,
    /// Fields in declaration order.
    pub fields: Vec<FieldSchema>,
}

impl BlockSchema {
    fn from_layout(layout: &BlockLayout) -> Self {
        Self {
            name: layout.name.to_owned(),
            size: layout.size,
            fields: layout
                .fields
                .iter()
                .map(|f| FieldSchema {
                    name: f.name.to_owned(),
                    offset: f.offset,
                    size: f.kind.size(),
                })
                .collect(),
        }
    }

    /// Byte offset of the named field, if the block defines it.
    pub fn offset_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().find(|f| f.name == name).map(|f| f.offset)
    }
}

/// A complete, versioned description of every uniform block layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutSchema {
    /// Layout revision this schema describes.
    pub revision: u32,
    /// All blocks of the revision.
    pub blocks: Vec<BlockSchema>,
}

impl LayoutSchema {
    /// Schema of the layouts compiled into this crate (revision 2),
    /// generated from the same static tables the encoder uses.
    pub fn current() -> Self {
        let mut blocks: Vec<BlockSchema> = UniformGroup::ALL
            .iter()
            .map(|group| BlockSchema::from_layout(group.layout()))
            .collect();
        // The light element layout is a contract of its own: the shader
        // indexes into the array with it.
        blocks.push(BlockSchema::from_layout(Light::layout()));
        Self {
            revision: CURRENT_REVISION,
            blocks,
        }
    }

    /// Frozen schema of layout revision 1, for diagnosing peers built
    /// against the older contract.
    pub fn revision_1() -> Self {
        Self {
            revision: 1,
            blocks: vec![
                frozen_block("FrameUniforms", 512, FRAME_V1),
                frozen_block("ShadowUniforms", 256, SHADOW_V1),
                frozen_block("StructureUniforms", 512, STRUCTURE_V1),
                frozen_block("IsosurfaceUniforms", 256, ISOSURFACE_V1),
                frozen_block("LightUniforms", 512, LIGHT_UNIFORMS_V1),
                frozen_block("Light", 128, LIGHT_V1),
            ],
        }
    }

    /// Look up a block by name.
    pub fn block(&self, name: &str) -> Option<&BlockSchema> {
        self.blocks.iter().find(|b| b.name == name)
    }

    /// Serialize to a JSON manifest.
    ///
    /// # Errors
    ///
    /// [`UniformLayoutError::Schema`] if serialization fails.
    pub fn to_json(&self) -> Result<String, UniformLayoutError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a JSON manifest.
    ///
    /// # Errors
    ///
    /// [`UniformLayoutError::Schema`] if `json` is not a valid manifest.
    pub fn from_json(json: &str) -> Result<Self, UniformLayoutError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Check that a peer schema (typically parsed from the shader build
    /// step's manifest) describes byte-identical layouts.
    ///
    /// Every block of `self` must exist in `other` with the same size and
    /// the same fields at the same offsets. Any divergence means the two
    /// builds would disagree on where a field lives, which corrupts
    /// rendering silently; the caller must treat it as fatal.
    ///
    /// # Errors
    ///
    /// [`UniformLayoutError::LayoutMismatch`] naming the first diverging
    /// block and field.
    pub fn verify_against(
        &self,
        other: &Self,
    ) -> Result<(), UniformLayoutError> {
        let theirs: FxHashMap<&str, &BlockSchema> = other
            .blocks
            .iter()
            .map(|b| (b.name.as_str(), b))
            .collect();
        for block in &self.blocks {
            let Some(peer) = theirs.get(block.name.as_str()) else {
                log::warn!("peer schema is missing block {}", block.name);
                return Err(UniformLayoutError::LayoutMismatch {
                    block: block.name.clone(),
                    what: "presence in peer schema".to_owned(),
                    expected: block.size,
                    actual: 0,
                });
            };
            verify_block(block, peer)?;
        }
        log::debug!(
            "schema revision {} verified against peer revision {}",
            self.revision,
            other.revision
        );
        Ok(())
    }
}

fn verify_block(
    block: &BlockSchema,
    peer: &BlockSchema,
) -> Result<(), UniformLayoutError> {
    if peer.size != block.size {
        return Err(UniformLayoutError::size_mismatch(
            &block.name,
            block.size,
            peer.size,
        ));
    }
    if peer.fields.len() != block.fields.len() {
        return Err(UniformLayoutError::LayoutMismatch {
            block: block.name.clone(),
            what: "field count".to_owned(),
            expected: block.fields.len(),
            actual: peer.fields.len(),
        });
    }
    let peer_fields: FxHashMap<&str, &FieldSchema> = peer
        .fields
        .iter()
        .map(|f| (f.name.as_str(), f))
        .collect();
    for field in &block.fields {
        let Some(theirs) = peer_fields.get(field.name.as_str()) else {
            return Err(UniformLayoutError::LayoutMismatch {
                block: block.name.clone(),
                what: format!("presence of field {}", field.name),
                expected: field.offset,
                actual: 0,
            });
        };
        if theirs.offset != field.offset {
            return Err(UniformLayoutError::LayoutMismatch {
                block: block.name.clone(),
                what: format!("offset of {}", field.name),
                expected: field.offset,
                actual: theirs.offset,
            });
        }
        if theirs.size != field.size {
            return Err(UniformLayoutError::LayoutMismatch {
                block: block.name.clone(),
                what: format!("size of {}", field.name),
                expected: field.size,
                actual: theirs.size,
            });
        }
    }
    Ok(())
}

fn frozen_block(
    name: &str,
    size: usize,
    fields: &[(&str, usize, usize)],
) -> BlockSchema {
    BlockSchema {
        name: name.to_owned(),
        size,
        fields: fields
            .iter()
            .map(|&(name, offset, size)| FieldSchema {
                name: name.to_owned(),
                offset,
                size,
            })
            .collect(),
    }
}

// Revision-1 tables: (name, offset, size), frozen as shipped. Shadow and
// light blocks did not change between revisions; frame, structure, and
// isosurface did, and revision 1 had no axes overlay block.

const FRAME_V1: &[(&str, usize, usize)] = &[
    ("projection_matrix", 0, 64),
    ("view_matrix", 64, 64),
    ("mvp_matrix", 128, 64),
    ("shadow_matrix", 192, 64),
    ("projection_matrix_inverse", 256, 64),
    ("view_matrix_inverse", 320, 64),
    ("normal_matrix", 384, 64),
    ("number_of_multisample_points", 448, 4),
    ("bloom_level", 452, 4),
    ("bloom_pulse", 456, 4),
    ("pad_float3", 460, 4),
    ("pad_vector2", 464, 16),
    ("pad_vector3", 480, 16),
    ("pad_vector4", 496, 16),
];

const SHADOW_V1: &[(&str, usize, usize)] = &[
    ("projection_matrix", 0, 64),
    ("view_matrix", 64, 64),
    ("shadow_matrix", 128, 64),
    ("normal_matrix", 192, 64),
];

const STRUCTURE_V1: &[(&str, usize, usize)] = &[
    ("scene_identifier", 0, 4),
    ("movie_identifier", 4, 4),
    ("atom_scale_factor", 8, 4),
    ("number_of_multisample_points", 12, 4),
    ("ambient_occlusion", 16, 4),
    ("ambient_occlusion_patch_number", 20, 4),
    ("ambient_occlusion_patch_size", 24, 4),
    ("ambient_occlusion_inverse_texture_size", 28, 4),
    ("change_hue_saturation_value", 32, 16),
    ("atom_hdr", 48, 4),
    ("atom_hdr_exposure", 52, 4),
    ("atom_hdr_bloom_level", 56, 4),
    ("clip_atoms_at_unit_cell", 60, 4),
    ("atom_ambient_color", 64, 16),
    ("atom_diffuse_color", 80, 16),
    ("atom_specular_color", 96, 16),
    ("atom_shininess", 112, 4),
    ("bond_hue", 116, 4),
    ("bond_saturation", 120, 4),
    ("bond_value", 124, 4),
    ("bond_hdr", 128, 4),
    ("bond_hdr_exposure", 132, 4),
    ("bond_hdr_bloom_level", 136, 4),
    ("clip_bonds_at_unit_cell", 140, 4),
    ("bond_ambient_color", 144, 16),
    ("bond_diffuse_color", 160, 16),
    ("bond_specular_color", 176, 16),
    ("bond_shininess", 192, 4),
    ("bond_scaling", 196, 4),
    ("bond_color_mode", 200, 4),
    ("unit_cell_scaling", 204, 4),
    ("unit_cell_color", 208, 16),
    ("clip_plane_left", 224, 16),
    ("clip_plane_right", 240, 16),
    ("clip_plane_top", 256, 16),
    ("clip_plane_bottom", 272, 16),
    ("clip_plane_front", 288, 16),
    ("clip_plane_back", 304, 16),
    ("model_matrix", 320, 64),
    ("box_matrix", 384, 64),
    ("atom_selection_stripes_density", 448, 4),
    ("atom_selection_stripes_frequency", 452, 4),
    ("atom_selection_worley_noise_3d_frequency", 456, 4),
    ("atom_selection_worley_noise_3d_jitter", 460, 4),
    ("atom_annotation_text_displacement", 464, 16),
    ("atom_annotation_text_color", 480, 16),
    ("atom_annotation_text_scaling", 496, 4),
    ("bond_annotation_text_scaling", 500, 4),
    ("selection_scaling", 504, 4),
    ("pad", 508, 4),
];

const ISOSURFACE_V1: &[(&str, usize, usize)] = &[
    ("unit_cell_matrix", 0, 64),
    ("unit_cell_normal_matrix", 64, 64),
    ("ambient_front_side", 128, 16),
    ("diffuse_front_side", 144, 16),
    ("specular_front_side", 160, 16),
    ("front_hdr", 176, 4),
    ("front_hdr_exposure", 180, 4),
    ("pad3", 184, 4),
    ("shininess_front_side", 188, 4),
    ("ambient_back_side", 192, 16),
    ("diffuse_back_side", 208, 16),
    ("specular_back_side", 224, 16),
    ("back_hdr", 240, 4),
    ("back_hdr_exposure", 244, 4),
    ("pad6", 248, 4),
    ("shininess_back_side", 252, 4),
];

const LIGHT_UNIFORMS_V1: &[(&str, usize, usize)] = &[("lights", 0, 512)];

const LIGHT_V1: &[(&str, usize, usize)] = &[
    ("position", 0, 16),
    ("ambient", 16, 16),
    ("diffuse", 32, 16),
    ("specular", 48, 16),
    ("spot_direction", 64, 16),
    ("constant_attenuation", 80, 4),
    ("linear_attenuation", 84, 4),
    ("quadratic_attenuation", 88, 4),
    ("spot_cutoff", 92, 4),
    ("spot_exponent", 96, 4),
    ("shininess", 100, 4),
    ("pad1", 104, 4),
    ("pad2", 108, 4),
    ("pad3", 112, 4),
    ("pad4", 116, 4),
    ("pad5", 120, 4),
    ("pad6", 124, 4),
];

#[cfg(test)]
mod tests {
    use super::LayoutSchema;
    use crate::error::UniformLayoutError;

    #[test]
    fn test_manifest_round_trip() -> Result<(), UniformLayoutError> {
        let schema = LayoutSchema::current();
        let json = schema.to_json()?;
        assert_eq!(LayoutSchema::from_json(&json)?, schema);
        Ok(())
    }

    #[test]
    fn test_identical_schemas_verify() -> Result<(), UniformLayoutError> {
        LayoutSchema::current().verify_against(&LayoutSchema::current())
    }

    #[test]
    fn test_tampered_offset_is_a_mismatch() -> Result<(), UniformLayoutError> {
        let schema = LayoutSchema::current();
        let mut skewed = schema.clone();
        // Simulate a shader build that inserted a field without a pad.
        for block in &mut skewed.blocks {
            if block.name == "StructureUniforms" {
                for field in &mut block.fields {
                    if field.name == "bond_hdr" {
                        field.offset += 4;
                    }
                }
            }
        }
        assert!(matches!(
            schema.verify_against(&skewed),
            Err(UniformLayoutError::LayoutMismatch { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_missing_block_is_a_mismatch() {
        let schema = LayoutSchema::current();
        let mut partial = schema.clone();
        partial.blocks.retain(|b| b.name != "LightUniforms");
        assert!(matches!(
            schema.verify_against(&partial),
            Err(UniformLayoutError::LayoutMismatch { .. })
        ));
    }

    // Boundary-marker offsets must hold across revisions for the fields
    // both revisions share; that is what makes partial redeploys
    // diagnosable instead of silently corrupt.
    #[test]
    fn test_boundary_markers_stable_across_revisions() {
        let v1 = LayoutSchema::revision_1();
        let v2 = LayoutSchema::current();
        for (block, fields) in [
            (
                "StructureUniforms",
                &[
                    ("scene_identifier", 0),
                    ("atom_ambient_color", 64),
                    ("bond_hdr", 128),
                    ("clip_plane_top", 256),
                    ("model_matrix", 320),
                ][..],
            ),
            (
                "FrameUniforms",
                &[
                    ("projection_matrix", 0),
                    ("view_matrix", 64),
                    ("mvp_matrix", 128),
                    ("shadow_matrix", 192),
                    ("projection_matrix_inverse", 256),
                    ("view_matrix_inverse", 320),
                    ("normal_matrix", 384),
                ][..],
            ),
            ("LightUniforms", &[("lights", 0)][..]),
        ] {
            let old = v1.block(block);
            let new = v2.block(block);
            for &(field, offset) in fields {
                assert_eq!(
                    old.and_then(|b| b.offset_of(field)),
                    Some(offset),
                    "{block}.{field} in revision 1"
                );
                assert_eq!(
                    new.and_then(|b| b.offset_of(field)),
                    Some(offset),
                    "{block}.{field} in revision 2"
                );
            }
        }
    }

    // The revisions are independent contracts: fields both revisions
    // define may still live at different offsets, so cross-revision
    // verification must fail rather than pretend compatibility.
    #[test]
    fn test_revisions_are_not_interchangeable() {
        let v1 = LayoutSchema::revision_1();
        let v2 = LayoutSchema::current();
        let moved = v2
            .block("FrameUniforms")
            .and_then(|b| b.offset_of("number_of_multisample_points"));
        let old = v1
            .block("FrameUniforms")
            .and_then(|b| b.offset_of("number_of_multisample_points"));
        assert_eq!(moved, Some(736));
        assert_eq!(old, Some(448));
        assert!(v2.verify_against(&v1).is_err());
    }
}
