//! Per-frame camera and post-processing uniforms.

use glam::Mat4;

use super::{mat, normal_matrix, UniformBlock};
use crate::layout::{field, BlockLayout, FieldKind, FieldLayout};

/// Camera, projection, and post-processing state uploaded once per frame.
///
/// Written by the host at the start of frame preparation and read by every
/// draw of that frame; the shader stage reads it by offset, so the field
/// order here is the contract. Matrices are expected in wgpu clip-space
/// conventions (right-handed, zero-to-one depth).
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FrameUniforms {
    /// Camera projection matrix.
    pub projection_matrix: [[f32; 4]; 4],
    /// World-to-camera view matrix.
    pub view_matrix: [[f32; 4]; 4],
    /// Combined projection × view matrix.
    pub mvp_matrix: [[f32; 4]; 4],
    /// Matrix mapping world space into the shadow map.
    pub shadow_matrix: [[f32; 4]; 4],
    /// Inverse of the projection matrix, for depth reconstruction.
    pub projection_matrix_inverse: [[f32; 4]; 4],
    /// Inverse of the view matrix.
    pub view_matrix_inverse: [[f32; 4]; 4],
    /// Normal matrix for the view transform (inverse-transpose upper 3×3).
    pub normal_matrix: [[f32; 4]; 4],
    /// Projection matrix for the axes overlay viewport.
    pub axes_projection_matrix: [[f32; 4]; 4],
    /// View matrix for the axes overlay viewport.
    pub axes_view_matrix: [[f32; 4]; 4],
    /// Combined projection × view matrix for the axes overlay.
    pub axes_mvp_matrix: [[f32; 4]; 4],
    /// Padding to the next vector boundary.
    pub pad_matrix: [[f32; 4]; 4],
    /// Camera position in world space (w = 1).
    pub camera_position: [f32; 4],
    /// Padding to the next vector boundary.
    pub pad1: [f32; 4],
    /// Multisample count used when resolving the frame.
    pub number_of_multisample_points: i32,
    /// Padding for GPU alignment.
    pub pad2: f32,
    /// Padding for GPU alignment.
    pub pad3: f32,
    /// Padding for GPU alignment.
    pub pad4: f32,
    /// Bloom blend strength applied in the tone-mapping pass.
    pub bloom_level: f32,
    /// Bloom pulse multiplier (animated highlight emphasis).
    pub bloom_pulse: f32,
    /// Maximum extended-dynamic-range component value of the target display.
    pub maximum_edr_value: f32,
    /// Padding for GPU alignment.
    pub pad5: f32,
}

impl FrameUniforms {
    /// Build the per-frame block from camera matrices and bloom settings.
    ///
    /// Derives the combined, inverse, and normal matrices, and the camera
    /// world position, from `projection` and `view`; the shadow matrix
    /// starts as the combined matrix and can be overwritten by the shadow
    /// pass. Axes overlay matrices keep their defaults until
    /// [`set_axes_viewport`](Self::set_axes_viewport) is called.
    pub fn new(
        projection: Mat4,
        view: Mat4,
        bloom_level: f32,
        bloom_pulse: f32,
        maximum_edr_value: f32,
    ) -> Self {
        let view_inverse = view.inverse();
        let mvp = projection * view;
        Self {
            projection_matrix: mat(projection),
            view_matrix: mat(view),
            mvp_matrix: mat(mvp),
            shadow_matrix: mat(mvp),
            projection_matrix_inverse: mat(projection.inverse()),
            view_matrix_inverse: mat(view_inverse),
            normal_matrix: normal_matrix(view),
            camera_position: view_inverse.col(3).to_array(),
            bloom_level,
            bloom_pulse,
            maximum_edr_value,
            ..Self::default()
        }
    }

    /// Set the matrices for the axes overlay viewport.
    pub fn set_axes_viewport(&mut self, projection: Mat4, view: Mat4) {
        self.axes_projection_matrix = mat(projection);
        self.axes_view_matrix = mat(view);
        self.axes_mvp_matrix = mat(projection * view);
    }
}

impl Default for FrameUniforms {
    fn default() -> Self {
        Self {
            projection_matrix: mat(Mat4::IDENTITY),
            view_matrix: mat(Mat4::IDENTITY),
            mvp_matrix: mat(Mat4::IDENTITY),
            shadow_matrix: mat(Mat4::IDENTITY),
            projection_matrix_inverse: mat(Mat4::IDENTITY),
            view_matrix_inverse: mat(Mat4::IDENTITY),
            normal_matrix: mat(Mat4::IDENTITY),
            axes_projection_matrix: mat(Mat4::IDENTITY),
            axes_view_matrix: mat(Mat4::IDENTITY),
            axes_mvp_matrix: mat(Mat4::IDENTITY),
            pad_matrix: mat(Mat4::ZERO),
            camera_position: [0.0, 0.0, 0.0, 1.0],
            pad1: [0.0; 4],
            number_of_multisample_points: 8,
            pad2: 0.0,
            pad3: 0.0,
            pad4: 0.0,
            bloom_level: 1.0,
            bloom_pulse: 1.0,
            maximum_edr_value: 1.0,
            pad5: 0.0,
        }
    }
}

impl UniformBlock for FrameUniforms {
    const NAME: &'static str = "FrameUniforms";
    const SIZE: usize = 768;

    fn layout() -> &'static BlockLayout {
        &LAYOUT
    }
}

static LAYOUT: BlockLayout = BlockLayout {
    name: FrameUniforms::NAME,
    size: FrameUniforms::SIZE,
    boundaries: &[],
    fields: &FIELDS,
};

static FIELDS: [FieldLayout; 21] = [
    field!(FrameUniforms, projection_matrix, FieldKind::Float4x4),
    field!(FrameUniforms, view_matrix, FieldKind::Float4x4),
    field!(FrameUniforms, mvp_matrix, FieldKind::Float4x4),
    field!(FrameUniforms, shadow_matrix, FieldKind::Float4x4),
    field!(FrameUniforms, projection_matrix_inverse, FieldKind::Float4x4),
    field!(FrameUniforms, view_matrix_inverse, FieldKind::Float4x4),
    field!(FrameUniforms, normal_matrix, FieldKind::Float4x4),
    field!(FrameUniforms, axes_projection_matrix, FieldKind::Float4x4),
    field!(FrameUniforms, axes_view_matrix, FieldKind::Float4x4),
    field!(FrameUniforms, axes_mvp_matrix, FieldKind::Float4x4),
    field!(FrameUniforms, pad_matrix, FieldKind::Float4x4),
    field!(FrameUniforms, camera_position, FieldKind::Float4),
    field!(FrameUniforms, pad1, FieldKind::Float4),
    field!(FrameUniforms, number_of_multisample_points, FieldKind::Int),
    field!(FrameUniforms, pad2, FieldKind::Float),
    field!(FrameUniforms, pad3, FieldKind::Float),
    field!(FrameUniforms, pad4, FieldKind::Float),
    field!(FrameUniforms, bloom_level, FieldKind::Float),
    field!(FrameUniforms, bloom_pulse, FieldKind::Float),
    field!(FrameUniforms, maximum_edr_value, FieldKind::Float),
    field!(FrameUniforms, pad5, FieldKind::Float),
];

const _: () = {
    assert!(size_of::<FrameUniforms>() == FrameUniforms::SIZE);
    assert!(core::mem::offset_of!(FrameUniforms, normal_matrix) == 384);
    assert!(core::mem::offset_of!(FrameUniforms, axes_projection_matrix) == 448);
    assert!(core::mem::offset_of!(FrameUniforms, camera_position) == 704);
    assert!(
        core::mem::offset_of!(FrameUniforms, number_of_multisample_points)
            == 736
    );
    assert!(core::mem::offset_of!(FrameUniforms, bloom_level) == 752);
};

#[cfg(test)]
mod tests {
    use glam::{Mat4, Vec3};

    use super::FrameUniforms;
    use crate::blocks::UniformBlock;
    use crate::error::UniformLayoutError;

    fn test_camera() -> (Mat4, Mat4) {
        let projection = Mat4::perspective_rh(
            60.0_f32.to_radians(),
            16.0 / 9.0,
            0.1,
            1000.0,
        );
        let view = Mat4::look_at_rh(
            Vec3::new(0.0, 5.0, 20.0),
            Vec3::ZERO,
            Vec3::Y,
        );
        (projection, view)
    }

    #[test]
    fn test_encode_decode_round_trip() -> Result<(), UniformLayoutError> {
        let (projection, view) = test_camera();
        let mut frame = FrameUniforms::new(projection, view, 0.5, 1.0, 2.0);
        frame.set_axes_viewport(Mat4::IDENTITY, view);
        let bytes = frame.encode();
        assert_eq!(bytes.len(), FrameUniforms::SIZE);
        assert_eq!(FrameUniforms::decode(&bytes)?, frame);
        Ok(())
    }

    #[test]
    fn test_camera_position_comes_from_view_inverse() {
        let (projection, view) = test_camera();
        let frame = FrameUniforms::new(projection, view, 1.0, 1.0, 1.0);
        let [x, y, z, w] = frame.camera_position;
        assert!((x - 0.0).abs() < 1e-4);
        assert!((y - 5.0).abs() < 1e-4);
        assert!((z - 20.0).abs() < 1e-4);
        assert_eq!(w, 1.0);
    }

    #[test]
    fn test_decode_rejects_wrong_length() {
        let short = vec![0u8; FrameUniforms::SIZE - 16];
        assert!(matches!(
            FrameUniforms::decode(&short),
            Err(UniformLayoutError::LayoutMismatch { .. })
        ));
    }
}
