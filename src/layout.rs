//! Field descriptor tables, offset lookup, and layout verification.
//!
//! Every uniform block declares a static [`BlockLayout`]: an ordered list
//! of named fields with their byte offsets, plus the documented total size
//! and segment boundaries. The tables are built with `core::mem::offset_of!`
//! so they can never drift from the actual struct layout; what they *can*
//! catch is drift between the struct and the documented contract, which is
//! exactly the failure mode [`verify`] exists for.

use crate::blocks::{
    FrameUniforms, GlobalAxesUniforms, IsosurfaceUniforms, Light,
    LightUniforms, ShadowUniforms, StructureUniforms, UniformBlock,
};
use crate::error::UniformLayoutError;

/// Required alignment of every uniform block: one four-float GPU vector.
pub const VECTOR_ALIGNMENT: usize = 16;

/// Shape of a field as the consuming shader reads it.
///
/// Booleans are widened to a full 4-byte slot; the shader stage has no
/// packed-bit representation for uniform booleans.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    /// 32-bit float scalar.
    Float,
    /// 32-bit signed integer scalar.
    Int,
    /// Boolean occupying a full 32-bit slot.
    Bool,
    /// Four-float vector, 16-byte aligned.
    Float4,
    /// Column-major 4×4 float matrix (four contiguous vectors).
    Float4x4,
    /// Contiguous array of four-float vectors.
    Float4Array(usize),
    /// Contiguous array of nested blocks with the given layout.
    Nested {
        /// Layout of one array element.
        layout: &'static BlockLayout,
        /// Number of elements.
        count: usize,
    },
}

impl FieldKind {
    /// Byte size of a field of this kind.
    pub const fn size(self) -> usize {
        match self {
            Self::Float | Self::Int | Self::Bool => 4,
            Self::Float4 => 16,
            Self::Float4x4 => 64,
            Self::Float4Array(n) => 16 * n,
            Self::Nested { layout, count } => layout.size * count,
        }
    }
}

/// One named field at a fixed byte offset within a block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldLayout {
    /// Field name, matching the host struct and the shader declaration.
    pub name: &'static str,
    /// Byte offset from the start of the block.
    pub offset: usize,
    /// Field shape.
    pub kind: FieldKind,
}

impl FieldLayout {
    /// Byte offset one past the end of this field.
    pub const fn end(&self) -> usize {
        self.offset + self.kind.size()
    }
}

/// Builds a [`FieldLayout`] whose offset is taken from the host struct
/// itself, so the table cannot disagree with what the compiler laid out.
macro_rules! field {
    ($owner:ty, $name:ident, $kind:expr) => {
        $crate::layout::FieldLayout {
            name: stringify!($name),
            offset: core::mem::offset_of!($owner, $name),
            kind: $kind,
        }
    };
}
pub(crate) use field;

/// The complete layout of one uniform block.
#[derive(Debug, PartialEq)]
pub struct BlockLayout {
    /// Block name as it appears in diagnostics and the schema manifest.
    pub name: &'static str,
    /// Documented total byte size.
    pub size: usize,
    /// Documented segment boundaries (byte offsets a field must start at).
    pub boundaries: &'static [usize],
    /// Fields in declaration order, tiling the block exactly.
    pub fields: &'static [FieldLayout],
}

impl BlockLayout {
    /// Look up a field by name.
    ///
    /// # Errors
    ///
    /// [`UniformLayoutError::FieldOutOfRange`] if no field with that name
    /// is defined for this block.
    pub fn field(&self, name: &str) -> Result<&FieldLayout, UniformLayoutError> {
        self.fields.iter().find(|f| f.name == name).ok_or_else(|| {
            UniformLayoutError::FieldOutOfRange {
                block: self.name.to_owned(),
                field: name.to_owned(),
            }
        })
    }

    /// Byte offset of the named field.
    ///
    /// # Errors
    ///
    /// [`UniformLayoutError::FieldOutOfRange`] if no field with that name
    /// is defined for this block.
    pub fn offset_of(&self, name: &str) -> Result<usize, UniformLayoutError> {
        self.field(name).map(|f| f.offset)
    }

    /// Check that the fields tile the block exactly, that the size is a
    /// whole number of GPU vectors, and that a field starts at every
    /// documented boundary.
    fn check(&self) -> Result<(), UniformLayoutError> {
        if self.size % VECTOR_ALIGNMENT != 0 {
            return Err(UniformLayoutError::LayoutMismatch {
                block: self.name.to_owned(),
                what: "size modulo vector alignment".to_owned(),
                expected: 0,
                actual: self.size % VECTOR_ALIGNMENT,
            });
        }
        let mut cursor = 0;
        for f in self.fields {
            if f.offset != cursor {
                return Err(UniformLayoutError::LayoutMismatch {
                    block: self.name.to_owned(),
                    what: format!("offset of {}", f.name),
                    expected: cursor,
                    actual: f.offset,
                });
            }
            cursor = f.end();
        }
        if cursor != self.size {
            return Err(UniformLayoutError::size_mismatch(
                self.name, self.size, cursor,
            ));
        }
        for &boundary in self.boundaries {
            if boundary == self.size {
                continue;
            }
            if !self.fields.iter().any(|f| f.offset == boundary) {
                return Err(UniformLayoutError::LayoutMismatch {
                    block: self.name.to_owned(),
                    what: format!("field at {boundary}-byte boundary"),
                    expected: boundary,
                    actual: self.size,
                });
            }
        }
        Ok(())
    }
}

/// The uniform groups the renderer uploads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UniformGroup {
    /// Per-frame camera/projection state ([`FrameUniforms`]).
    Frame,
    /// Shadow-map pass matrices ([`ShadowUniforms`]).
    Shadow,
    /// Per-structure render parameters ([`StructureUniforms`]).
    Structure,
    /// Isosurface shading parameters ([`IsosurfaceUniforms`]).
    Isosurface,
    /// The four scene lights ([`LightUniforms`]).
    Lights,
    /// Axes overlay parameters ([`GlobalAxesUniforms`]).
    GlobalAxes,
}

impl UniformGroup {
    /// Every group, in upload order.
    pub const ALL: [Self; 6] = [
        Self::Frame,
        Self::Shadow,
        Self::Structure,
        Self::Isosurface,
        Self::Lights,
        Self::GlobalAxes,
    ];

    /// The static layout table for this group.
    pub fn layout(self) -> &'static BlockLayout {
        match self {
            Self::Frame => FrameUniforms::layout(),
            Self::Shadow => ShadowUniforms::layout(),
            Self::Structure => StructureUniforms::layout(),
            Self::Isosurface => IsosurfaceUniforms::layout(),
            Self::Lights => LightUniforms::layout(),
            Self::GlobalAxes => GlobalAxesUniforms::layout(),
        }
    }
}

/// Fixed total byte size of a group's block.
pub fn layout_size(group: UniformGroup) -> usize {
    group.layout().size
}

/// Fixed byte offset of a named field within a group's block.
///
/// # Errors
///
/// [`UniformLayoutError::FieldOutOfRange`] if the group defines no field
/// with that name.
pub fn offset_of(
    group: UniformGroup,
    field: &str,
) -> Result<usize, UniformLayoutError> {
    group.layout().offset_of(field)
}

fn verify_block<T: UniformBlock>() -> Result<(), UniformLayoutError> {
    let actual = size_of::<T>();
    if actual != T::SIZE {
        return Err(UniformLayoutError::size_mismatch(T::NAME, T::SIZE, actual));
    }
    let layout = T::layout();
    if layout.size != T::SIZE {
        return Err(UniformLayoutError::size_mismatch(
            T::NAME,
            T::SIZE,
            layout.size,
        ));
    }
    layout.check()?;
    log::debug!("verified uniform layout {} ({} bytes)", T::NAME, T::SIZE);
    Ok(())
}

/// Verify every shipped block layout against its documented contract.
///
/// Intended to run once during renderer initialization; a failure means the
/// host was built against a different layout revision than it declares, and
/// rendering must not proceed (the GPU would read the blocks by offset and
/// silently produce corrupt output).
///
/// # Errors
///
/// The first [`UniformLayoutError::LayoutMismatch`] found, naming the block
/// and the disagreeing size or offset.
pub fn verify() -> Result<(), UniformLayoutError> {
    verify_block::<FrameUniforms>()?;
    verify_block::<ShadowUniforms>()?;
    verify_block::<StructureUniforms>()?;
    verify_block::<IsosurfaceUniforms>()?;
    verify_block::<Light>()?;
    verify_block::<LightUniforms>()?;
    verify_block::<GlobalAxesUniforms>()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{layout_size, offset_of, verify, UniformGroup};
    use crate::error::UniformLayoutError;

    #[test]
    fn test_documented_sizes() {
        assert_eq!(layout_size(UniformGroup::Frame), 768);
        assert_eq!(layout_size(UniformGroup::Shadow), 256);
        assert_eq!(layout_size(UniformGroup::Structure), 1024);
        assert_eq!(layout_size(UniformGroup::Isosurface), 512);
        assert_eq!(layout_size(UniformGroup::Lights), 512);
        assert_eq!(layout_size(UniformGroup::GlobalAxes), 144);
    }

    #[test]
    fn test_verify_shipped_layouts() -> Result<(), UniformLayoutError> {
        verify()
    }

    #[test]
    fn test_every_group_is_vector_aligned() {
        for group in UniformGroup::ALL {
            assert_eq!(
                layout_size(group) % super::VECTOR_ALIGNMENT,
                0,
                "{} size not vector aligned",
                group.layout().name
            );
        }
    }

    #[test]
    fn test_offset_lookup() -> Result<(), UniformLayoutError> {
        assert_eq!(offset_of(UniformGroup::Structure, "bond_hdr")?, 128);
        assert_eq!(offset_of(UniformGroup::Structure, "clip_plane_top")?, 256);
        assert_eq!(offset_of(UniformGroup::Frame, "bloom_level")?, 752);
        Ok(())
    }

    #[test]
    fn test_unknown_field_is_out_of_range() {
        let err = offset_of(UniformGroup::Lights, "bond_hdr");
        assert!(matches!(
            err,
            Err(UniformLayoutError::FieldOutOfRange { .. })
        ));
    }
}
