//! Scene light uniforms.

use super::UniformBlock;
use crate::layout::{field, BlockLayout, FieldKind, FieldLayout};

/// Number of scene lights; the shader unrolls over exactly this many.
pub const MAX_LIGHTS: usize = 4;

/// One scene light in the classic position/ambient/diffuse/specular form.
///
/// A `w` of 0 in [`position`](Self::position) marks a directional light, 1 a
/// positional one. Also usable standalone as the element layout of
/// [`LightUniforms`].
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Light {
    /// Light position (w = 0 directional, w = 1 positional).
    pub position: [f32; 4],
    /// Ambient color, premultiplied by intensity.
    pub ambient: [f32; 4],
    /// Diffuse color, premultiplied by intensity.
    pub diffuse: [f32; 4],
    /// Specular color, premultiplied by intensity.
    pub specular: [f32; 4],

    /// Spotlight direction (w unused).
    pub spot_direction: [f32; 4],
    /// Constant attenuation coefficient.
    pub constant_attenuation: f32,
    /// Linear attenuation coefficient.
    pub linear_attenuation: f32,
    /// Quadratic attenuation coefficient.
    pub quadratic_attenuation: f32,
    /// Spotlight cutoff angle in degrees (180 disables the cone).
    pub spot_cutoff: f32,

    /// Spotlight falloff exponent.
    pub spot_exponent: f32,
    /// Specular exponent used when the material provides none.
    pub shininess: f32,
    /// Padding for GPU alignment.
    pub pad1: f32,
    /// Padding for GPU alignment.
    pub pad2: f32,

    /// Padding for GPU alignment.
    pub pad3: f32,
    /// Padding for GPU alignment.
    pub pad4: f32,
    /// Padding for GPU alignment.
    pub pad5: f32,
    /// Padding for GPU alignment.
    pub pad6: f32,
}

impl Default for Light {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 100.0, 0.0],
            ambient: [1.0; 4],
            diffuse: [1.0; 4],
            specular: [1.0; 4],
            spot_direction: [1.0, 1.0, 1.0, 0.0],
            constant_attenuation: 1.0,
            linear_attenuation: 1.0,
            quadratic_attenuation: 1.0,
            spot_cutoff: 1.0,
            spot_exponent: 1.0,
            shininess: 4.0,
            pad1: 0.0,
            pad2: 0.0,
            pad3: 0.0,
            pad4: 0.0,
            pad5: 0.0,
            pad6: 0.0,
        }
    }
}

impl UniformBlock for Light {
    const NAME: &'static str = "Light";
    const SIZE: usize = 128;

    fn layout() -> &'static BlockLayout {
        &LIGHT_LAYOUT
    }
}

static LIGHT_LAYOUT: BlockLayout = BlockLayout {
    name: Light::NAME,
    size: Light::SIZE,
    boundaries: &[],
    fields: &LIGHT_FIELDS,
};

static LIGHT_FIELDS: [FieldLayout; 17] = [
    field!(Light, position, FieldKind::Float4),
    field!(Light, ambient, FieldKind::Float4),
    field!(Light, diffuse, FieldKind::Float4),
    field!(Light, specular, FieldKind::Float4),
    field!(Light, spot_direction, FieldKind::Float4),
    field!(Light, constant_attenuation, FieldKind::Float),
    field!(Light, linear_attenuation, FieldKind::Float),
    field!(Light, quadratic_attenuation, FieldKind::Float),
    field!(Light, spot_cutoff, FieldKind::Float),
    field!(Light, spot_exponent, FieldKind::Float),
    field!(Light, shininess, FieldKind::Float),
    field!(Light, pad1, FieldKind::Float),
    field!(Light, pad2, FieldKind::Float),
    field!(Light, pad3, FieldKind::Float),
    field!(Light, pad4, FieldKind::Float),
    field!(Light, pad5, FieldKind::Float),
    field!(Light, pad6, FieldKind::Float),
];

/// The four scene lights, packed contiguously with no inter-element
/// padding beyond each light's own trailing pads.
#[repr(C)]
#[derive(
    Debug, Default, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable,
)]
pub struct LightUniforms {
    /// The scene lights, all slots always present.
    pub lights: [Light; MAX_LIGHTS],
}

impl UniformBlock for LightUniforms {
    const NAME: &'static str = "LightUniforms";
    const SIZE: usize = Light::SIZE * MAX_LIGHTS;

    fn layout() -> &'static BlockLayout {
        &LAYOUT
    }
}

static LAYOUT: BlockLayout = BlockLayout {
    name: LightUniforms::NAME,
    size: LightUniforms::SIZE,
    boundaries: &[],
    fields: &FIELDS,
};

static FIELDS: [FieldLayout; 1] = [field!(
    LightUniforms,
    lights,
    FieldKind::Nested {
        layout: &LIGHT_LAYOUT,
        count: MAX_LIGHTS,
    }
)];

const _: () = {
    assert!(size_of::<Light>() == Light::SIZE);
    assert!(size_of::<LightUniforms>() == LightUniforms::SIZE);
    assert!(core::mem::offset_of!(Light, spot_direction) == 64);
};

#[cfg(test)]
mod tests {
    use super::{Light, LightUniforms, MAX_LIGHTS};
    use crate::blocks::UniformBlock;
    use crate::error::UniformLayoutError;

    fn headlamp() -> Light {
        Light {
            position: [1.0, 0.0, 0.0, 1.0],
            ambient: [0.0, 0.0, 0.0, 1.0],
            diffuse: [1.0; 4],
            specular: [1.0; 4],
            spot_cutoff: 180.0,
            spot_exponent: 0.0,
            constant_attenuation: 1.0,
            linear_attenuation: 1.0,
            quadratic_attenuation: 1.0,
            ..Light::default()
        }
    }

    #[test]
    fn test_single_light_round_trip() -> Result<(), UniformLayoutError> {
        let light = headlamp();
        let bytes = light.encode();
        assert_eq!(bytes.len(), Light::SIZE);
        let decoded = Light::decode(&bytes)?;
        assert_eq!(decoded, light);
        assert_eq!(decoded.position, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(decoded.ambient, [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(decoded.spot_cutoff, 180.0);
        assert_eq!(decoded.spot_exponent, 0.0);
        Ok(())
    }

    #[test]
    fn test_four_lights_pack_contiguously() -> Result<(), UniformLayoutError> {
        let mut uniforms = LightUniforms::default();
        uniforms.lights[0] = headlamp();
        uniforms.lights[2].position = [0.0, -1.0, 0.0, 0.0];
        let bytes = uniforms.encode();
        assert_eq!(bytes.len(), MAX_LIGHTS * Light::SIZE);

        // Each element must sit at exactly i × Light::SIZE: slicing there
        // decodes the same values that went in.
        for (i, light) in uniforms.lights.iter().enumerate() {
            let slot = &bytes[i * Light::SIZE..(i + 1) * Light::SIZE];
            assert_eq!(Light::decode(slot)?, *light);
        }
        Ok(())
    }

    #[test]
    fn test_default_light_is_directional() {
        let light = Light::default();
        assert_eq!(light.position[3], 0.0);
        assert_eq!(light.shininess, 4.0);
    }
}
