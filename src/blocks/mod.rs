//! The uniform block structs shared with the shader stage.
//!
//! Each block is `#[repr(C)]` with explicit pad fields, so the Rust
//! compiler lays it out exactly as declared and `bytemuck` can expose it as
//! raw bytes. Matrices are stored as four contiguous `[f32; 4]` columns and
//! booleans as [`Bool32`], matching how the shader stage reads the buffer.
//!
//! Every block implements [`UniformBlock`] for encode/decode plus `Default`
//! carrying the documented default values, so a caller that sets only the
//! fields it cares about still encodes a fully defined buffer.

mod axes;
mod frame;
mod isosurface;
mod light;
mod shadow;
mod structure;

pub use axes::GlobalAxesUniforms;
pub use frame::FrameUniforms;
pub use isosurface::IsosurfaceUniforms;
pub use light::{Light, LightUniforms, MAX_LIGHTS};
pub use shadow::ShadowUniforms;
pub use structure::StructureUniforms;

use glam::{Mat3, Mat4};

use crate::error::UniformLayoutError;
use crate::layout::BlockLayout;

/// A boolean widened to a full 32-bit uniform slot.
///
/// Shader stages read uniform booleans as whole scalars; packing them
/// tighter on the host would shift every later offset.
#[repr(transparent)]
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    bytemuck::Pod,
    bytemuck::Zeroable,
)]
pub struct Bool32(u32);

impl Bool32 {
    /// The false value (all bits zero).
    pub const FALSE: Self = Self(0);
    /// The true value.
    pub const TRUE: Self = Self(1);

    /// Widen a host boolean.
    pub const fn new(value: bool) -> Self {
        if value {
            Self::TRUE
        } else {
            Self::FALSE
        }
    }

    /// Narrow back to a host boolean. Any nonzero bit pattern reads true,
    /// mirroring the shader-side interpretation.
    pub const fn get(self) -> bool {
        self.0 != 0
    }
}

impl From<bool> for Bool32 {
    fn from(value: bool) -> Self {
        Self::new(value)
    }
}

impl From<Bool32> for bool {
    fn from(value: Bool32) -> Self {
        value.get()
    }
}

/// A fixed-layout uniform block that can be moved across the host/GPU
/// boundary as raw bytes.
///
/// Encoding uses the host's native byte order. Uniform buffers are consumed
/// little-endian on every supported GPU; the crate assumes a little-endian
/// host and makes no attempt to byte-swap.
///
/// The `Default` bound is part of the contract: a block constructed with
/// struct-update syntax (`Block { field, ..Block::default() }`) encodes the
/// documented default for every field the caller left unset, never
/// indeterminate memory.
pub trait UniformBlock: bytemuck::Pod + Default {
    /// Block name as it appears in diagnostics and the schema manifest.
    const NAME: &'static str;

    /// Documented total byte size. Stated as a literal in each impl so the
    /// `const` assertions compare the compiler's layout against the
    /// contract rather than against itself.
    const SIZE: usize;

    /// The static field descriptor table for this block.
    fn layout() -> &'static BlockLayout;

    /// Serialize into a freshly allocated buffer of exactly
    /// [`Self::SIZE`](UniformBlock::SIZE) bytes.
    fn encode(&self) -> Vec<u8> {
        bytemuck::bytes_of(self).to_vec()
    }

    /// Serialize into a caller-provided buffer.
    ///
    /// # Errors
    ///
    /// [`UniformLayoutError::LayoutMismatch`] if `out` is not exactly
    /// [`Self::SIZE`](UniformBlock::SIZE) bytes long.
    fn encode_into(&self, out: &mut [u8]) -> Result<(), UniformLayoutError> {
        if out.len() != Self::SIZE {
            return Err(UniformLayoutError::size_mismatch(
                Self::NAME,
                Self::SIZE,
                out.len(),
            ));
        }
        out.copy_from_slice(bytemuck::bytes_of(self));
        Ok(())
    }

    /// Inverse of [`encode`](UniformBlock::encode).
    ///
    /// # Errors
    ///
    /// [`UniformLayoutError::LayoutMismatch`] if `bytes` is not exactly
    /// [`Self::SIZE`](UniformBlock::SIZE) bytes long; the buffer is never
    /// read out of bounds.
    fn decode(bytes: &[u8]) -> Result<Self, UniformLayoutError> {
        if bytes.len() != Self::SIZE {
            return Err(UniformLayoutError::size_mismatch(
                Self::NAME,
                Self::SIZE,
                bytes.len(),
            ));
        }
        bytemuck::try_pod_read_unaligned(bytes).map_err(|_| {
            UniformLayoutError::size_mismatch(Self::NAME, Self::SIZE, bytes.len())
        })
    }
}

/// Column-major storage for a matrix field.
pub(crate) fn mat(m: Mat4) -> [[f32; 4]; 4] {
    m.to_cols_array_2d()
}

/// Normal matrix for the given model-view transform: inverse-transpose of
/// the upper 3×3, promoted back to 4×4 for uniform-slot alignment.
pub(crate) fn normal_matrix(model_view: Mat4) -> [[f32; 4]; 4] {
    let n = Mat3::from_mat4(model_view).inverse().transpose();
    Mat4::from_mat3(n).to_cols_array_2d()
}

#[cfg(test)]
mod tests {
    use super::Bool32;

    #[test]
    fn test_bool32_round_trip() {
        assert!(Bool32::from(true).get());
        assert!(!Bool32::from(false).get());
        assert_eq!(Bool32::TRUE, Bool32::new(true));
        assert_eq!(Bool32::FALSE, Bool32::default());
    }

    #[test]
    fn test_bool32_is_one_scalar_slot() {
        assert_eq!(size_of::<Bool32>(), 4);
        assert_eq!(align_of::<Bool32>(), 4);
    }
}
