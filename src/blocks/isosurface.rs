//! Isosurface shading uniforms.

use glam::Mat4;

use super::{mat, normal_matrix, Bool32, UniformBlock};
use crate::layout::{field, BlockLayout, FieldKind, FieldLayout};

/// Shading parameters for a structure's adsorption isosurface, uploaded
/// whenever the surface settings change.
///
/// The surface is two-sided; front and back faces carry independent
/// materials because the camera routinely ends up inside the pore network.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct IsosurfaceUniforms {
    /// Unit-cell basis as a 4×4 matrix.
    pub unit_cell_matrix: [[f32; 4]; 4],
    /// Inverse of [`unit_cell_matrix`](Self::unit_cell_matrix).
    pub inverse_unit_cell_matrix: [[f32; 4]; 4],
    /// Normal matrix of the unit-cell basis.
    pub unit_cell_normal_matrix: [[f32; 4]; 4],
    /// Matrix spanning the replicated unit-cell box.
    pub box_matrix: [[f32; 4]; 4],
    /// Inverse of [`box_matrix`](Self::box_matrix).
    pub inverse_box_matrix: [[f32; 4]; 4],

    /// Front-face ambient color, premultiplied by intensity.
    pub ambient_front_side: [f32; 4],
    /// Front-face diffuse color, premultiplied by intensity.
    pub diffuse_front_side: [f32; 4],
    /// Front-face specular color, premultiplied by intensity.
    pub specular_front_side: [f32; 4],
    /// Whether front faces are tone-mapped as HDR.
    pub front_hdr: Bool32,
    /// HDR exposure of front faces.
    pub front_hdr_exposure: f32,
    /// Padding for GPU alignment.
    pub pad1: f32,
    /// Front-face specular exponent.
    pub shininess_front_side: f32,

    /// Back-face ambient color, premultiplied by intensity.
    pub ambient_back_side: [f32; 4],
    /// Back-face diffuse color, premultiplied by intensity.
    pub diffuse_back_side: [f32; 4],
    /// Back-face specular color, premultiplied by intensity.
    pub specular_back_side: [f32; 4],
    /// Whether back faces are tone-mapped as HDR.
    pub back_hdr: Bool32,
    /// HDR exposure of back faces.
    pub back_hdr_exposure: f32,
    /// Padding for GPU alignment.
    pub pad2: f32,
    /// Back-face specular exponent.
    pub shininess_back_side: f32,

    /// Hue shift applied to the surface color.
    pub hue: f32,
    /// Saturation shift applied to the surface color.
    pub saturation: f32,
    /// Value (brightness) shift applied to the surface color.
    pub value: f32,
    /// Ray-march step length through the density volume.
    pub step_length: f32,
    /// Padding to the 512-byte boundary.
    pub pad4: [f32; 4],
    /// Padding to the 512-byte boundary.
    pub pad5: [f32; 4],
    /// Padding to the 512-byte boundary.
    pub pad6: [f32; 4],
}

impl IsosurfaceUniforms {
    /// Set the unit-cell basis together with its inverse and normal matrix.
    pub fn set_unit_cell(&mut self, unit_cell: Mat4) {
        self.unit_cell_matrix = mat(unit_cell);
        self.inverse_unit_cell_matrix = mat(unit_cell.inverse());
        self.unit_cell_normal_matrix = normal_matrix(unit_cell);
    }

    /// Set the replicated box matrix together with its inverse.
    pub fn set_box(&mut self, box_matrix: Mat4) {
        self.box_matrix = mat(box_matrix);
        self.inverse_box_matrix = mat(box_matrix.inverse());
    }
}

impl Default for IsosurfaceUniforms {
    fn default() -> Self {
        Self {
            unit_cell_matrix: mat(Mat4::IDENTITY),
            inverse_unit_cell_matrix: mat(Mat4::IDENTITY),
            unit_cell_normal_matrix: mat(Mat4::IDENTITY),
            box_matrix: mat(Mat4::IDENTITY),
            inverse_box_matrix: mat(Mat4::IDENTITY),
            ambient_front_side: [0.0, 0.0, 0.0, 1.0],
            diffuse_front_side: [0.588235, 0.670588, 0.729412, 1.0],
            specular_front_side: [1.0; 4],
            front_hdr: Bool32::TRUE,
            front_hdr_exposure: 1.5,
            pad1: 0.0,
            shininess_front_side: 4.0,
            ambient_back_side: [0.0, 0.0, 0.0, 1.0],
            diffuse_back_side: [0.588235, 0.670588, 0.729412, 1.0],
            specular_back_side: [0.9, 0.9, 0.9, 1.0],
            back_hdr: Bool32::TRUE,
            back_hdr_exposure: 1.5,
            pad2: 0.0,
            shininess_back_side: 4.0,
            hue: 1.0,
            saturation: 1.0,
            value: 1.0,
            step_length: 0.001,
            pad4: [0.0; 4],
            pad5: [0.0; 4],
            pad6: [0.0; 4],
        }
    }
}

impl UniformBlock for IsosurfaceUniforms {
    const NAME: &'static str = "IsosurfaceUniforms";
    const SIZE: usize = 512;

    fn layout() -> &'static BlockLayout {
        &LAYOUT
    }
}

static LAYOUT: BlockLayout = BlockLayout {
    name: IsosurfaceUniforms::NAME,
    size: IsosurfaceUniforms::SIZE,
    boundaries: &[],
    fields: &FIELDS,
};

static FIELDS: [FieldLayout; 26] = [
    field!(IsosurfaceUniforms, unit_cell_matrix, FieldKind::Float4x4),
    field!(IsosurfaceUniforms, inverse_unit_cell_matrix, FieldKind::Float4x4),
    field!(IsosurfaceUniforms, unit_cell_normal_matrix, FieldKind::Float4x4),
    field!(IsosurfaceUniforms, box_matrix, FieldKind::Float4x4),
    field!(IsosurfaceUniforms, inverse_box_matrix, FieldKind::Float4x4),
    field!(IsosurfaceUniforms, ambient_front_side, FieldKind::Float4),
    field!(IsosurfaceUniforms, diffuse_front_side, FieldKind::Float4),
    field!(IsosurfaceUniforms, specular_front_side, FieldKind::Float4),
    field!(IsosurfaceUniforms, front_hdr, FieldKind::Bool),
    field!(IsosurfaceUniforms, front_hdr_exposure, FieldKind::Float),
    field!(IsosurfaceUniforms, pad1, FieldKind::Float),
    field!(IsosurfaceUniforms, shininess_front_side, FieldKind::Float),
    field!(IsosurfaceUniforms, ambient_back_side, FieldKind::Float4),
    field!(IsosurfaceUniforms, diffuse_back_side, FieldKind::Float4),
    field!(IsosurfaceUniforms, specular_back_side, FieldKind::Float4),
    field!(IsosurfaceUniforms, back_hdr, FieldKind::Bool),
    field!(IsosurfaceUniforms, back_hdr_exposure, FieldKind::Float),
    field!(IsosurfaceUniforms, pad2, FieldKind::Float),
    field!(IsosurfaceUniforms, shininess_back_side, FieldKind::Float),
    field!(IsosurfaceUniforms, hue, FieldKind::Float),
    field!(IsosurfaceUniforms, saturation, FieldKind::Float),
    field!(IsosurfaceUniforms, value, FieldKind::Float),
    field!(IsosurfaceUniforms, step_length, FieldKind::Float),
    field!(IsosurfaceUniforms, pad4, FieldKind::Float4),
    field!(IsosurfaceUniforms, pad5, FieldKind::Float4),
    field!(IsosurfaceUniforms, pad6, FieldKind::Float4),
];

const _: () = {
    assert!(
        size_of::<IsosurfaceUniforms>() == IsosurfaceUniforms::SIZE
    );
    assert!(
        core::mem::offset_of!(IsosurfaceUniforms, ambient_front_side) == 320
    );
    assert!(core::mem::offset_of!(IsosurfaceUniforms, hue) == 448);
};

#[cfg(test)]
mod tests {
    use glam::{Mat4, Vec3};

    use super::IsosurfaceUniforms;
    use crate::blocks::UniformBlock;
    use crate::error::UniformLayoutError;

    #[test]
    fn test_encode_decode_round_trip() -> Result<(), UniformLayoutError> {
        let mut uniforms = IsosurfaceUniforms::default();
        // Triclinic-ish cell: non-orthogonal basis exercises the inverse.
        uniforms.set_unit_cell(Mat4::from_cols_array_2d(&[
            [20.0, 0.0, 0.0, 0.0],
            [3.0, 18.0, 0.0, 0.0],
            [1.5, 2.0, 22.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ]));
        uniforms.set_box(Mat4::from_scale(Vec3::new(40.0, 36.0, 44.0)));
        uniforms.step_length = 0.0005;
        assert_eq!(IsosurfaceUniforms::decode(&uniforms.encode())?, uniforms);
        Ok(())
    }

    #[test]
    fn test_default_step_length() {
        assert_eq!(IsosurfaceUniforms::default().step_length, 0.001);
    }
}
