//! Axes overlay uniforms.

use super::UniformBlock;
use crate::layout::{field, BlockLayout, FieldKind, FieldLayout};

/// Parameters of the global coordinate-axes overlay drawn in a corner of
/// the viewport.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalAxesUniforms {
    /// Backdrop color behind the axes gizmo.
    pub axes_background_color: [f32; 4],
    /// Label colors for the a, b, c axes.
    pub text_color: [[f32; 4]; 3],
    /// Label offsets from the a, b, c axis tips.
    pub text_displacement: [[f32; 4]; 3],
    /// Backdrop shape selector (none, filled circle, filled square, ...).
    pub axes_background_style: i32,
    /// Scale of the axis arrows.
    pub axes_scale: f32,
    /// Scale of the center sphere.
    pub center_scale: f32,
    /// Distance of labels from their axis tips.
    pub text_offset: f32,
    /// Per-axis label scale (w unused).
    pub text_scale: [f32; 4],
}

impl Default for GlobalAxesUniforms {
    fn default() -> Self {
        Self {
            axes_background_color: [0.8, 0.8, 0.8, 0.25],
            text_color: [[0.0, 0.0, 0.0, 1.0]; 3],
            text_displacement: [[0.0; 4]; 3],
            axes_background_style: 1,
            axes_scale: 5.0,
            center_scale: 0.0,
            text_offset: 0.0,
            text_scale: [2.0, 2.0, 2.0, 1.0],
        }
    }
}

impl UniformBlock for GlobalAxesUniforms {
    const NAME: &'static str = "GlobalAxesUniforms";
    const SIZE: usize = 144;

    fn layout() -> &'static BlockLayout {
        &LAYOUT
    }
}

static LAYOUT: BlockLayout = BlockLayout {
    name: GlobalAxesUniforms::NAME,
    size: GlobalAxesUniforms::SIZE,
    boundaries: &[],
    fields: &FIELDS,
};

static FIELDS: [FieldLayout; 8] = [
    field!(GlobalAxesUniforms, axes_background_color, FieldKind::Float4),
    field!(GlobalAxesUniforms, text_color, FieldKind::Float4Array(3)),
    field!(GlobalAxesUniforms, text_displacement, FieldKind::Float4Array(3)),
    field!(GlobalAxesUniforms, axes_background_style, FieldKind::Int),
    field!(GlobalAxesUniforms, axes_scale, FieldKind::Float),
    field!(GlobalAxesUniforms, center_scale, FieldKind::Float),
    field!(GlobalAxesUniforms, text_offset, FieldKind::Float),
    field!(GlobalAxesUniforms, text_scale, FieldKind::Float4),
];

const _: () = {
    assert!(
        size_of::<GlobalAxesUniforms>() == GlobalAxesUniforms::SIZE
    );
    assert!(
        core::mem::offset_of!(GlobalAxesUniforms, axes_background_style) == 112
    );
    assert!(core::mem::offset_of!(GlobalAxesUniforms, text_scale) == 128);
};

#[cfg(test)]
mod tests {
    use super::GlobalAxesUniforms;
    use crate::blocks::UniformBlock;
    use crate::error::UniformLayoutError;

    #[test]
    fn test_encode_decode_round_trip() -> Result<(), UniformLayoutError> {
        let uniforms = GlobalAxesUniforms {
            axes_scale: 7.5,
            text_color: [
                [1.0, 0.0, 0.0, 1.0],
                [0.0, 1.0, 0.0, 1.0],
                [0.0, 0.0, 1.0, 1.0],
            ],
            ..GlobalAxesUniforms::default()
        };
        let bytes = uniforms.encode();
        assert_eq!(bytes.len(), GlobalAxesUniforms::SIZE);
        assert_eq!(GlobalAxesUniforms::decode(&bytes)?, uniforms);
        Ok(())
    }

    #[test]
    fn test_encode_into_rejects_wrong_length() {
        let uniforms = GlobalAxesUniforms::default();
        let mut out = vec![0u8; GlobalAxesUniforms::SIZE * 2];
        assert!(matches!(
            uniforms.encode_into(&mut out),
            Err(UniformLayoutError::LayoutMismatch { .. })
        ));
    }
}
