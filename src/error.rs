//! Crate-level error types.

use std::fmt;

/// Errors produced when validating or transcoding uniform block layouts.
#[derive(Debug)]
pub enum UniformLayoutError {
    /// A computed size or offset disagrees with the documented layout.
    ///
    /// This indicates a build-time skew between the host and the shader
    /// compilation units. It is fatal: rendering initialization must abort
    /// rather than hand the GPU a block it will misread.
    LayoutMismatch {
        /// Name of the uniform block involved.
        block: String,
        /// What disagreed, e.g. `"size"` or `"offset of bond_hdr"`.
        what: String,
        /// The documented value.
        expected: usize,
        /// The value actually observed.
        actual: usize,
    },
    /// A field name that is not defined for the given block.
    FieldOutOfRange {
        /// Name of the uniform block involved.
        block: String,
        /// The unknown field name.
        field: String,
    },
    /// Layout schema manifest parsing/serialization failure.
    Schema(serde_json::Error),
}

impl fmt::Display for UniformLayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LayoutMismatch {
                block,
                what,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "layout mismatch in {block}: {what} is {actual}, \
                     expected {expected}"
                )
            }
            Self::FieldOutOfRange { block, field } => {
                write!(f, "no field named `{field}` in {block}")
            }
            Self::Schema(e) => write!(f, "layout schema error: {e}"),
        }
    }
}

impl std::error::Error for UniformLayoutError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Schema(e) => Some(e),
            Self::LayoutMismatch { .. } | Self::FieldOutOfRange { .. } => None,
        }
    }
}

impl From<serde_json::Error> for UniformLayoutError {
    fn from(e: serde_json::Error) -> Self {
        Self::Schema(e)
    }
}

impl UniformLayoutError {
    /// Shorthand for a [`UniformLayoutError::LayoutMismatch`] over a block's
    /// total byte size.
    pub(crate) fn size_mismatch(
        block: &str,
        expected: usize,
        actual: usize,
    ) -> Self {
        Self::LayoutMismatch {
            block: block.to_owned(),
            what: "size".to_owned(),
            expected,
            actual,
        }
    }
}
