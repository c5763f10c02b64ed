//! Per-structure render parameter uniforms.
//!
//! The largest and most layout-sensitive block. It is organized into
//! 128-byte segments; each segment head is pinned by a `const` assertion so
//! that inserting a field without adjusting the neighboring pads fails the
//! build instead of silently shifting every later offset for a shader that
//! was compiled against the old layout.

use glam::Mat4;

use super::{mat, normal_matrix, Bool32, UniformBlock};
use crate::layout::{field, BlockLayout, FieldKind, FieldLayout};

/// Rendering parameters for one displayed structure, uploaded per structure
/// per frame.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct StructureUniforms {
    /// Identifier of the scene this structure belongs to.
    pub scene_identifier: i32,
    /// Identifier of the movie (frame sequence) within the scene.
    pub movie_identifier: i32,
    /// Global scale factor applied to atom radii.
    pub atom_scale_factor: f32,
    /// Multisample count of the target the structure renders into.
    pub number_of_multisample_points: i32,

    /// Whether baked ambient occlusion is applied to atoms.
    pub ambient_occlusion: Bool32,
    /// Number of patches along one edge of the ambient-occlusion atlas.
    pub ambient_occlusion_patch_number: i32,
    /// Edge length of one atlas patch in texels.
    pub ambient_occlusion_patch_size: f32,
    /// Reciprocal of the ambient-occlusion atlas edge length.
    pub ambient_occlusion_inverse_texture_size: f32,

    /// Hue shift applied to atom colors.
    pub atom_hue: f32,
    /// Saturation shift applied to atom colors.
    pub atom_saturation: f32,
    /// Value (brightness) shift applied to atom colors.
    pub atom_value: f32,
    /// Identifier of this structure within the scene.
    pub structure_identifier: i32,

    /// Whether atoms are tone-mapped as HDR.
    pub atom_hdr: Bool32,
    /// HDR exposure applied to atoms.
    pub atom_hdr_exposure: f32,
    /// Blend intensity of the atom selection effect.
    pub atom_selection_intensity: f32,
    /// Whether atoms are clipped against the unit cell.
    pub clip_atoms_at_unit_cell: Bool32,

    /// Atom material ambient color, premultiplied by intensity.
    pub atom_ambient_color: [f32; 4],
    /// Atom material diffuse color, premultiplied by intensity.
    pub atom_diffuse_color: [f32; 4],
    /// Atom material specular color, premultiplied by intensity.
    pub atom_specular_color: [f32; 4],
    /// Atom material specular exponent.
    pub atom_shininess: f32,

    /// Hue shift applied to bond colors.
    pub bond_hue: f32,
    /// Saturation shift applied to bond colors.
    pub bond_saturation: f32,
    /// Value (brightness) shift applied to bond colors.
    pub bond_value: f32,

    // -- 128-byte boundary
    /// Whether bonds are tone-mapped as HDR.
    pub bond_hdr: Bool32,
    /// HDR exposure applied to bonds.
    pub bond_hdr_exposure: f32,
    /// Blend intensity of the bond selection effect.
    pub bond_selection_intensity: f32,
    /// Whether bonds are clipped against the unit cell.
    pub clip_bonds_at_unit_cell: Bool32,

    /// Bond material ambient color, premultiplied by intensity.
    pub bond_ambient_color: [f32; 4],
    /// Bond material diffuse color, premultiplied by intensity.
    pub bond_diffuse_color: [f32; 4],
    /// Bond material specular color, premultiplied by intensity.
    pub bond_specular_color: [f32; 4],

    /// Bond material specular exponent.
    pub bond_shininess: f32,
    /// Scale factor applied to bond radii.
    pub bond_scaling: f32,
    /// Bond coloring mode (uniform, split by element, gradient).
    pub bond_color_mode: i32,

    /// Scale factor applied to unit-cell edge cylinders.
    pub unit_cell_scaling: f32,
    /// Unit-cell edge color.
    pub unit_cell_color: [f32; 4],

    /// Left clip plane in plane-equation form (xyz normal, w distance).
    pub clip_plane_left: [f32; 4],
    /// Right clip plane in plane-equation form.
    pub clip_plane_right: [f32; 4],

    // -- 256-byte boundary
    /// Top clip plane in plane-equation form.
    pub clip_plane_top: [f32; 4],
    /// Bottom clip plane in plane-equation form.
    pub clip_plane_bottom: [f32; 4],
    /// Front clip plane in plane-equation form.
    pub clip_plane_front: [f32; 4],
    /// Back clip plane in plane-equation form.
    pub clip_plane_back: [f32; 4],

    /// Structure orientation and origin in world space.
    pub model_matrix: [[f32; 4]; 4],

    // -- 384-byte boundary
    /// Inverse of [`model_matrix`](Self::model_matrix).
    pub inverse_model_matrix: [[f32; 4]; 4],
    /// Matrix spanning the replicated unit-cell box.
    pub box_matrix: [[f32; 4]; 4],

    // -- 512-byte boundary
    /// Inverse of [`box_matrix`](Self::box_matrix).
    pub inverse_box_matrix: [[f32; 4]; 4],

    /// Stripe pattern density of the atom selection effect.
    pub atom_selection_stripes_density: f32,
    /// Stripe pattern frequency of the atom selection effect.
    pub atom_selection_stripes_frequency: f32,
    /// Worley-noise frequency of the atom selection effect.
    pub atom_selection_worley_noise_3d_frequency: f32,
    /// Worley-noise jitter of the atom selection effect.
    pub atom_selection_worley_noise_3d_jitter: f32,

    /// Offset of atom annotation text from the atom center.
    pub atom_annotation_text_displacement: [f32; 4],
    /// Atom annotation text color.
    pub atom_annotation_text_color: [f32; 4],
    /// Atom annotation text scale.
    pub atom_annotation_text_scaling: f32,
    /// Scale factor of the atom selection overlay geometry.
    pub atom_selection_scaling: f32,
    /// Scale factor of the bond selection overlay geometry.
    pub bond_selection_scaling: f32,
    /// Whether atoms take the bond color instead of their element color.
    pub color_atoms_with_bond_color: Bool32,

    // -- 640-byte boundary
    /// Extra transformation applied to primitive geometry.
    pub transformation_matrix: [[f32; 4]; 4],
    /// Normal matrix of [`transformation_matrix`](Self::transformation_matrix).
    pub transformation_normal_matrix: [[f32; 4]; 4],

    // -- 768-byte boundary
    /// Primitive front-face ambient color.
    pub primitive_ambient_front_side: [f32; 4],
    /// Primitive front-face diffuse color.
    pub primitive_diffuse_front_side: [f32; 4],
    /// Primitive front-face specular color.
    pub primitive_specular_front_side: [f32; 4],
    /// Whether primitive front faces are tone-mapped as HDR.
    pub primitive_front_side_hdr: Bool32,
    /// HDR exposure of primitive front faces.
    pub primitive_front_side_hdr_exposure: f32,
    /// Primitive opacity (0 = opaque rendering path).
    pub primitive_opacity: f32,
    /// Primitive front-face specular exponent.
    pub primitive_shininess_front_side: f32,

    /// Primitive back-face ambient color.
    pub primitive_ambient_back_side: [f32; 4],
    /// Primitive back-face diffuse color.
    pub primitive_diffuse_back_side: [f32; 4],
    /// Primitive back-face specular color.
    pub primitive_specular_back_side: [f32; 4],
    /// Whether primitive back faces are tone-mapped as HDR.
    pub primitive_back_side_hdr: Bool32,
    /// HDR exposure of primitive back faces.
    pub primitive_back_side_hdr_exposure: f32,
    /// Padding for GPU alignment.
    pub pad6: f32,
    /// Primitive back-face specular exponent.
    pub primitive_shininess_back_side: f32,

    // -- 896-byte boundary
    /// Stripe pattern density of the bond selection effect.
    pub bond_selection_stripes_density: f32,
    /// Stripe pattern frequency of the bond selection effect.
    pub bond_selection_stripes_frequency: f32,
    /// Worley-noise frequency of the bond selection effect.
    pub bond_selection_worley_noise_3d_frequency: f32,
    /// Worley-noise jitter of the bond selection effect.
    pub bond_selection_worley_noise_3d_jitter: f32,

    /// Stripe pattern density of the primitive selection effect.
    pub primitive_selection_stripes_density: f32,
    /// Stripe pattern frequency of the primitive selection effect.
    pub primitive_selection_stripes_frequency: f32,
    /// Worley-noise frequency of the primitive selection effect.
    pub primitive_selection_worley_noise_3d_frequency: f32,
    /// Worley-noise jitter of the primitive selection effect.
    pub primitive_selection_worley_noise_3d_jitter: f32,

    /// Scale factor of the primitive selection overlay geometry.
    pub primitive_selection_scaling: f32,
    /// Blend intensity of the primitive selection effect.
    pub primitive_selection_intensity: f32,
    /// Padding for GPU alignment.
    pub pad7: f32,
    /// Padding for GPU alignment.
    pub pad8: f32,

    /// Hue shift applied to primitive colors.
    pub primitive_hue: f32,
    /// Saturation shift applied to primitive colors.
    pub primitive_saturation: f32,
    /// Value (brightness) shift applied to primitive colors.
    pub primitive_value: f32,
    /// Padding for GPU alignment.
    pub pad9: f32,

    /// Anchor position of the structure's local axes overlay.
    pub local_axes_position: [f32; 4],
    /// Unit-cell replica counts along a, b, c (w unused).
    pub number_of_replicas: [f32; 4],
    /// Padding to the 1024-byte boundary.
    pub pad11: [f32; 4],
    /// Padding to the 1024-byte boundary.
    pub pad12: [f32; 4],
}

impl StructureUniforms {
    /// Build the block for one structure from its identifier, orientation,
    /// and unit-cell box, keeping every other parameter at its default.
    pub fn new(
        structure_identifier: i32,
        model: Mat4,
        box_matrix: Mat4,
    ) -> Self {
        let mut uniforms = Self {
            structure_identifier,
            ..Self::default()
        };
        uniforms.set_model(model);
        uniforms.set_box(box_matrix);
        uniforms
    }

    /// Set the model matrix together with its inverse.
    pub fn set_model(&mut self, model: Mat4) {
        self.model_matrix = mat(model);
        self.inverse_model_matrix = mat(model.inverse());
    }

    /// Set the unit-cell box matrix together with its inverse.
    pub fn set_box(&mut self, box_matrix: Mat4) {
        self.box_matrix = mat(box_matrix);
        self.inverse_box_matrix = mat(box_matrix.inverse());
    }

    /// Set the primitive transformation together with its normal matrix.
    pub fn set_transformation(&mut self, transformation: Mat4) {
        self.transformation_matrix = mat(transformation);
        self.transformation_normal_matrix = normal_matrix(transformation);
    }

    /// Set the unit-cell replica counts along the three cell axes.
    pub fn set_replicas(&mut self, a: u32, b: u32, c: u32) {
        self.number_of_replicas = [a as f32, b as f32, c as f32, 0.0];
    }
}

impl Default for StructureUniforms {
    fn default() -> Self {
        Self {
            scene_identifier: 0,
            movie_identifier: 0,
            atom_scale_factor: 1.0,
            number_of_multisample_points: 8,
            ambient_occlusion: Bool32::TRUE,
            ambient_occlusion_patch_number: 64,
            ambient_occlusion_patch_size: 16.0,
            ambient_occlusion_inverse_texture_size: 1.0 / 1024.0,
            atom_hue: 1.0,
            atom_saturation: 1.0,
            atom_value: 1.0,
            structure_identifier: 0,
            atom_hdr: Bool32::FALSE,
            atom_hdr_exposure: 1.5,
            atom_selection_intensity: 0.5,
            clip_atoms_at_unit_cell: Bool32::FALSE,
            atom_ambient_color: [1.0; 4],
            atom_diffuse_color: [1.0; 4],
            atom_specular_color: [1.0; 4],
            atom_shininess: 4.0,
            bond_hue: 0.0,
            bond_saturation: 0.0,
            bond_value: 0.0,
            bond_hdr: Bool32::FALSE,
            bond_hdr_exposure: 1.5,
            bond_selection_intensity: 0.5,
            clip_bonds_at_unit_cell: Bool32::FALSE,
            bond_ambient_color: [1.0; 4],
            bond_diffuse_color: [1.0; 4],
            bond_specular_color: [1.0; 4],
            bond_shininess: 4.0,
            bond_scaling: 1.0,
            bond_color_mode: 0,
            unit_cell_scaling: 1.0,
            unit_cell_color: [1.0; 4],
            clip_plane_left: [1.0; 4],
            clip_plane_right: [1.0; 4],
            clip_plane_top: [1.0; 4],
            clip_plane_bottom: [1.0; 4],
            clip_plane_front: [1.0; 4],
            clip_plane_back: [1.0; 4],
            model_matrix: mat(Mat4::IDENTITY),
            inverse_model_matrix: mat(Mat4::IDENTITY),
            box_matrix: mat(Mat4::IDENTITY),
            inverse_box_matrix: mat(Mat4::IDENTITY),
            atom_selection_stripes_density: 0.25,
            atom_selection_stripes_frequency: 12.0,
            atom_selection_worley_noise_3d_frequency: 2.0,
            atom_selection_worley_noise_3d_jitter: 0.0,
            atom_annotation_text_displacement: [0.0; 4],
            atom_annotation_text_color: [0.0, 0.0, 0.0, 1.0],
            atom_annotation_text_scaling: 1.0,
            atom_selection_scaling: 1.0,
            bond_selection_scaling: 1.25,
            color_atoms_with_bond_color: Bool32::FALSE,
            transformation_matrix: mat(Mat4::IDENTITY),
            transformation_normal_matrix: mat(Mat4::IDENTITY),
            primitive_ambient_front_side: [0.0, 0.0, 0.0, 1.0],
            primitive_diffuse_front_side: [1.0, 1.0, 0.0, 1.0],
            primitive_specular_front_side: [1.0; 4],
            primitive_front_side_hdr: Bool32::TRUE,
            primitive_front_side_hdr_exposure: 1.5,
            primitive_opacity: 0.0,
            primitive_shininess_front_side: 4.0,
            primitive_ambient_back_side: [0.0, 0.0, 0.0, 1.0],
            primitive_diffuse_back_side: [1.0, 1.0, 0.0, 1.0],
            primitive_specular_back_side: [0.9, 0.9, 0.9, 1.0],
            primitive_back_side_hdr: Bool32::TRUE,
            primitive_back_side_hdr_exposure: 1.5,
            pad6: 0.0,
            primitive_shininess_back_side: 4.0,
            bond_selection_stripes_density: 0.25,
            bond_selection_stripes_frequency: 12.0,
            bond_selection_worley_noise_3d_frequency: 2.0,
            bond_selection_worley_noise_3d_jitter: 1.0,
            primitive_selection_stripes_density: 0.25,
            primitive_selection_stripes_frequency: 12.0,
            primitive_selection_worley_noise_3d_frequency: 2.0,
            primitive_selection_worley_noise_3d_jitter: 1.0,
            primitive_selection_scaling: 1.01,
            primitive_selection_intensity: 0.8,
            pad7: 0.0,
            pad8: 0.0,
            primitive_hue: 1.0,
            primitive_saturation: 1.0,
            primitive_value: 1.0,
            pad9: 0.0,
            local_axes_position: [0.0, 0.0, 0.0, 1.0],
            number_of_replicas: [0.0, 0.0, 0.0, 1.0],
            pad11: [0.0; 4],
            pad12: [0.0; 4],
        }
    }
}

impl UniformBlock for StructureUniforms {
    const NAME: &'static str = "StructureUniforms";
    const SIZE: usize = 1024;

    fn layout() -> &'static BlockLayout {
        &LAYOUT
    }
}

static LAYOUT: BlockLayout = BlockLayout {
    name: StructureUniforms::NAME,
    size: StructureUniforms::SIZE,
    boundaries: &[128, 256, 384, 512, 640, 768, 896, 1024],
    fields: &FIELDS,
};

static FIELDS: [FieldLayout; 91] = [
    field!(StructureUniforms, scene_identifier, FieldKind::Int),
    field!(StructureUniforms, movie_identifier, FieldKind::Int),
    field!(StructureUniforms, atom_scale_factor, FieldKind::Float),
    field!(StructureUniforms, number_of_multisample_points, FieldKind::Int),
    field!(StructureUniforms, ambient_occlusion, FieldKind::Bool),
    field!(StructureUniforms, ambient_occlusion_patch_number, FieldKind::Int),
    field!(StructureUniforms, ambient_occlusion_patch_size, FieldKind::Float),
    field!(
        StructureUniforms,
        ambient_occlusion_inverse_texture_size,
        FieldKind::Float
    ),
    field!(StructureUniforms, atom_hue, FieldKind::Float),
    field!(StructureUniforms, atom_saturation, FieldKind::Float),
    field!(StructureUniforms, atom_value, FieldKind::Float),
    field!(StructureUniforms, structure_identifier, FieldKind::Int),
    field!(StructureUniforms, atom_hdr, FieldKind::Bool),
    field!(StructureUniforms, atom_hdr_exposure, FieldKind::Float),
    field!(StructureUniforms, atom_selection_intensity, FieldKind::Float),
    field!(StructureUniforms, clip_atoms_at_unit_cell, FieldKind::Bool),
    field!(StructureUniforms, atom_ambient_color, FieldKind::Float4),
    field!(StructureUniforms, atom_diffuse_color, FieldKind::Float4),
    field!(StructureUniforms, atom_specular_color, FieldKind::Float4),
    field!(StructureUniforms, atom_shininess, FieldKind::Float),
    field!(StructureUniforms, bond_hue, FieldKind::Float),
    field!(StructureUniforms, bond_saturation, FieldKind::Float),
    field!(StructureUniforms, bond_value, FieldKind::Float),
    field!(StructureUniforms, bond_hdr, FieldKind::Bool),
    field!(StructureUniforms, bond_hdr_exposure, FieldKind::Float),
    field!(StructureUniforms, bond_selection_intensity, FieldKind::Float),
    field!(StructureUniforms, clip_bonds_at_unit_cell, FieldKind::Bool),
    field!(StructureUniforms, bond_ambient_color, FieldKind::Float4),
    field!(StructureUniforms, bond_diffuse_color, FieldKind::Float4),
    field!(StructureUniforms, bond_specular_color, FieldKind::Float4),
    field!(StructureUniforms, bond_shininess, FieldKind::Float),
    field!(StructureUniforms, bond_scaling, FieldKind::Float),
    field!(StructureUniforms, bond_color_mode, FieldKind::Int),
    field!(StructureUniforms, unit_cell_scaling, FieldKind::Float),
    field!(StructureUniforms, unit_cell_color, FieldKind::Float4),
    field!(StructureUniforms, clip_plane_left, FieldKind::Float4),
    field!(StructureUniforms, clip_plane_right, FieldKind::Float4),
    field!(StructureUniforms, clip_plane_top, FieldKind::Float4),
    field!(StructureUniforms, clip_plane_bottom, FieldKind::Float4),
    field!(StructureUniforms, clip_plane_front, FieldKind::Float4),
    field!(StructureUniforms, clip_plane_back, FieldKind::Float4),
    field!(StructureUniforms, model_matrix, FieldKind::Float4x4),
    field!(StructureUniforms, inverse_model_matrix, FieldKind::Float4x4),
    field!(StructureUniforms, box_matrix, FieldKind::Float4x4),
    field!(StructureUniforms, inverse_box_matrix, FieldKind::Float4x4),
    field!(
        StructureUniforms,
        atom_selection_stripes_density,
        FieldKind::Float
    ),
    field!(
        StructureUniforms,
        atom_selection_stripes_frequency,
        FieldKind::Float
    ),
    field!(
        StructureUniforms,
        atom_selection_worley_noise_3d_frequency,
        FieldKind::Float
    ),
    field!(
        StructureUniforms,
        atom_selection_worley_noise_3d_jitter,
        FieldKind::Float
    ),
    field!(
        StructureUniforms,
        atom_annotation_text_displacement,
        FieldKind::Float4
    ),
    field!(StructureUniforms, atom_annotation_text_color, FieldKind::Float4),
    field!(
        StructureUniforms,
        atom_annotation_text_scaling,
        FieldKind::Float
    ),
    field!(StructureUniforms, atom_selection_scaling, FieldKind::Float),
    field!(StructureUniforms, bond_selection_scaling, FieldKind::Float),
    field!(StructureUniforms, color_atoms_with_bond_color, FieldKind::Bool),
    field!(StructureUniforms, transformation_matrix, FieldKind::Float4x4),
    field!(
        StructureUniforms,
        transformation_normal_matrix,
        FieldKind::Float4x4
    ),
    field!(
        StructureUniforms,
        primitive_ambient_front_side,
        FieldKind::Float4
    ),
    field!(
        StructureUniforms,
        primitive_diffuse_front_side,
        FieldKind::Float4
    ),
    field!(
        StructureUniforms,
        primitive_specular_front_side,
        FieldKind::Float4
    ),
    field!(StructureUniforms, primitive_front_side_hdr, FieldKind::Bool),
    field!(
        StructureUniforms,
        primitive_front_side_hdr_exposure,
        FieldKind::Float
    ),
    field!(StructureUniforms, primitive_opacity, FieldKind::Float),
    field!(
        StructureUniforms,
        primitive_shininess_front_side,
        FieldKind::Float
    ),
    field!(
        StructureUniforms,
        primitive_ambient_back_side,
        FieldKind::Float4
    ),
    field!(
        StructureUniforms,
        primitive_diffuse_back_side,
        FieldKind::Float4
    ),
    field!(
        StructureUniforms,
        primitive_specular_back_side,
        FieldKind::Float4
    ),
    field!(StructureUniforms, primitive_back_side_hdr, FieldKind::Bool),
    field!(
        StructureUniforms,
        primitive_back_side_hdr_exposure,
        FieldKind::Float
    ),
    field!(StructureUniforms, pad6, FieldKind::Float),
    field!(
        StructureUniforms,
        primitive_shininess_back_side,
        FieldKind::Float
    ),
    field!(
        StructureUniforms,
        bond_selection_stripes_density,
        FieldKind::Float
    ),
    field!(
        StructureUniforms,
        bond_selection_stripes_frequency,
        FieldKind::Float
    ),
    field!(
        StructureUniforms,
        bond_selection_worley_noise_3d_frequency,
        FieldKind::Float
    ),
    field!(
        StructureUniforms,
        bond_selection_worley_noise_3d_jitter,
        FieldKind::Float
    ),
    field!(
        StructureUniforms,
        primitive_selection_stripes_density,
        FieldKind::Float
    ),
    field!(
        StructureUniforms,
        primitive_selection_stripes_frequency,
        FieldKind::Float
    ),
    field!(
        StructureUniforms,
        primitive_selection_worley_noise_3d_frequency,
        FieldKind::Float
    ),
    field!(
        StructureUniforms,
        primitive_selection_worley_noise_3d_jitter,
        FieldKind::Float
    ),
    field!(StructureUniforms, primitive_selection_scaling, FieldKind::Float),
    field!(
        StructureUniforms,
        primitive_selection_intensity,
        FieldKind::Float
    ),
    field!(StructureUniforms, pad7, FieldKind::Float),
    field!(StructureUniforms, pad8, FieldKind::Float),
    field!(StructureUniforms, primitive_hue, FieldKind::Float),
    field!(StructureUniforms, primitive_saturation, FieldKind::Float),
    field!(StructureUniforms, primitive_value, FieldKind::Float),
    field!(StructureUniforms, pad9, FieldKind::Float),
    field!(StructureUniforms, local_axes_position, FieldKind::Float4),
    field!(StructureUniforms, number_of_replicas, FieldKind::Float4),
    field!(StructureUniforms, pad11, FieldKind::Float4),
    field!(StructureUniforms, pad12, FieldKind::Float4),
];

const _: () = {
    assert!(size_of::<StructureUniforms>() == StructureUniforms::SIZE);
    assert!(core::mem::offset_of!(StructureUniforms, bond_hdr) == 128);
    assert!(core::mem::offset_of!(StructureUniforms, clip_plane_top) == 256);
    assert!(
        core::mem::offset_of!(StructureUniforms, inverse_model_matrix) == 384
    );
    assert!(core::mem::offset_of!(StructureUniforms, inverse_box_matrix) == 512);
    assert!(
        core::mem::offset_of!(StructureUniforms, transformation_matrix) == 640
    );
    assert!(
        core::mem::offset_of!(StructureUniforms, primitive_ambient_front_side)
            == 768
    );
    assert!(
        core::mem::offset_of!(StructureUniforms, bond_selection_stripes_density)
            == 896
    );
};

#[cfg(test)]
mod tests {
    use glam::{Mat4, Vec3};

    use super::StructureUniforms;
    use crate::blocks::{Bool32, UniformBlock};
    use crate::error::UniformLayoutError;

    #[test]
    fn test_encode_decode_round_trip() -> Result<(), UniformLayoutError> {
        let model = Mat4::from_rotation_y(0.7)
            * Mat4::from_translation(Vec3::new(1.0, -2.0, 3.0));
        let cell = Mat4::from_scale(Vec3::new(24.3, 24.3, 24.3));
        let mut uniforms = StructureUniforms::new(3, model, cell);
        uniforms.atom_hdr = Bool32::TRUE;
        uniforms.set_replicas(2, 2, 1);
        let bytes = uniforms.encode();
        assert_eq!(bytes.len(), StructureUniforms::SIZE);
        assert_eq!(StructureUniforms::decode(&bytes)?, uniforms);
        Ok(())
    }

    #[test]
    fn test_defaults_apply_to_unset_fields() {
        // A caller setting only what it cares about must still encode the
        // documented default for everything else.
        let sparse = StructureUniforms {
            structure_identifier: 7,
            ..StructureUniforms::default()
        };
        let explicit = StructureUniforms {
            structure_identifier: 7,
            primitive_selection_stripes_density: 0.25,
            primitive_selection_stripes_frequency: 12.0,
            primitive_selection_worley_noise_3d_frequency: 2.0,
            primitive_selection_worley_noise_3d_jitter: 1.0,
            primitive_selection_scaling: 1.01,
            primitive_selection_intensity: 0.8,
            ..StructureUniforms::default()
        };
        assert_eq!(sparse.encode(), explicit.encode());
    }

    #[test]
    fn test_paired_inverse_stays_consistent() {
        let model = Mat4::from_rotation_z(1.2);
        let mut uniforms = StructureUniforms::default();
        uniforms.set_model(model);
        let inverse = Mat4::from_cols_array_2d(&uniforms.inverse_model_matrix);
        let product = model * inverse;
        assert!(product.abs_diff_eq(Mat4::IDENTITY, 1e-5));
    }

    #[test]
    fn test_decode_rejects_wrong_length() {
        let long = vec![0u8; StructureUniforms::SIZE + 1];
        assert!(matches!(
            StructureUniforms::decode(&long),
            Err(UniformLayoutError::LayoutMismatch { .. })
        ));
    }
}
