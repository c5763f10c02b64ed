//! Shadow-map pass uniforms.

use glam::Mat4;

use super::{mat, normal_matrix, UniformBlock};
use crate::layout::{field, BlockLayout, FieldKind, FieldLayout};

/// Matrices for rendering a structure into the shadow map and for sampling
/// that map during the main pass.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ShadowUniforms {
    /// Light-space projection matrix.
    pub projection_matrix: [[f32; 4]; 4],
    /// Combined view × model matrix of the structure being rendered.
    pub view_matrix: [[f32; 4]; 4],
    /// Matrix mapping world space into shadow-map texture space.
    pub shadow_matrix: [[f32; 4]; 4],
    /// Normal matrix for the combined view × model transform.
    pub normal_matrix: [[f32; 4]; 4],
}

/// Maps clip space onto shadow-map texture coordinates: x/y remapped from
/// [-1, 1] to [0, 1] with y flipped, z kept in the [0, 1] depth range.
fn texture_space() -> Mat4 {
    Mat4::from_cols_array_2d(&[
        [0.5, 0.0, 0.0, 0.0],
        [0.0, -0.5, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.5, 0.5, 0.0, 1.0],
    ])
}

impl ShadowUniforms {
    /// Build the shadow pass block for one structure.
    pub fn new(projection: Mat4, view: Mat4, model: Mat4) -> Self {
        let view_model = view * model;
        let mvp = projection * view_model;
        Self {
            projection_matrix: mat(projection),
            view_matrix: mat(view_model),
            shadow_matrix: mat(texture_space() * mvp),
            normal_matrix: normal_matrix(view_model),
        }
    }
}

impl Default for ShadowUniforms {
    fn default() -> Self {
        Self {
            projection_matrix: mat(Mat4::IDENTITY),
            view_matrix: mat(Mat4::IDENTITY),
            shadow_matrix: mat(Mat4::IDENTITY),
            normal_matrix: mat(Mat4::IDENTITY),
        }
    }
}

impl UniformBlock for ShadowUniforms {
    const NAME: &'static str = "ShadowUniforms";
    const SIZE: usize = 256;

    fn layout() -> &'static BlockLayout {
        &LAYOUT
    }
}

static LAYOUT: BlockLayout = BlockLayout {
    name: ShadowUniforms::NAME,
    size: ShadowUniforms::SIZE,
    boundaries: &[],
    fields: &FIELDS,
};

static FIELDS: [FieldLayout; 4] = [
    field!(ShadowUniforms, projection_matrix, FieldKind::Float4x4),
    field!(ShadowUniforms, view_matrix, FieldKind::Float4x4),
    field!(ShadowUniforms, shadow_matrix, FieldKind::Float4x4),
    field!(ShadowUniforms, normal_matrix, FieldKind::Float4x4),
];

const _: () = {
    assert!(size_of::<ShadowUniforms>() == ShadowUniforms::SIZE);
    assert!(core::mem::offset_of!(ShadowUniforms, shadow_matrix) == 128);
};

#[cfg(test)]
mod tests {
    use glam::{Mat4, Vec3, Vec4};

    use super::ShadowUniforms;
    use crate::blocks::UniformBlock;
    use crate::error::UniformLayoutError;

    #[test]
    fn test_encode_decode_round_trip() -> Result<(), UniformLayoutError> {
        let projection = Mat4::orthographic_rh(-10.0, 10.0, -10.0, 10.0, 0.1, 100.0);
        let view = Mat4::look_at_rh(Vec3::new(0.0, 50.0, 0.0), Vec3::ZERO, Vec3::Z);
        let model = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        let shadow = ShadowUniforms::new(projection, view, model);
        assert_eq!(ShadowUniforms::decode(&shadow.encode())?, shadow);
        Ok(())
    }

    #[test]
    fn test_shadow_matrix_lands_in_texture_space() {
        // Clip-space center must map to the middle of the shadow map.
        let shadow =
            ShadowUniforms::new(Mat4::IDENTITY, Mat4::IDENTITY, Mat4::IDENTITY);
        let m = Mat4::from_cols_array_2d(&shadow.shadow_matrix);
        let center = m * Vec4::new(0.0, 0.0, 0.5, 1.0);
        assert_eq!(center, Vec4::new(0.5, 0.5, 0.5, 1.0));
    }
}
