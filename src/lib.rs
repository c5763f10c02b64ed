// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Unused / redundant code
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]
// GPU layout code compares and stores exact float constants
#![allow(clippy::float_cmp)]
#![allow(clippy::unreadable_literal)]
// GPU / graphics allowances: casts are intentional and safe
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_lossless)]
// Uniform blocks legitimately carry many fields and long default impls
#![allow(clippy::too_many_lines)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! Fixed-layout GPU uniform blocks for a crystal-structure renderer.
//!
//! The host render loop and the GPU shader programs are compiled
//! independently, yet both read the same uniform buffers byte-for-byte.
//! This crate owns that contract: every uniform group (frame, shadow,
//! structure, isosurface, lights, global axes) is declared here as a
//! `#[repr(C)]` block with explicit padding, a documented total size, and
//! documented offsets for the fields that act as segment boundaries.
//!
//! # Key entry points
//!
//! - [`blocks`] - the uniform block structs and the [`blocks::UniformBlock`]
//!   encode/decode trait
//! - [`layout`] - per-block field descriptor tables, offset lookup, and
//!   startup verification
//! - [`schema`] - the serializable layout manifest shared with the shader
//!   build step
//! - [`gpu`] - optional wgpu buffer helpers (behind the `gpu` feature)
//!
//! # Layout rules
//!
//! Blocks follow the GPU uniform-buffer conventions of the consuming
//! shaders: 16-byte vector alignment, matrices as four contiguous columns,
//! booleans widened to a full 4-byte slot, and explicit pad fields so the
//! Rust compiler never inserts padding of its own. Encoding uses the host's
//! native byte order; uniform buffers are consumed little-endian on every
//! supported GPU, and the crate assumes a little-endian host.
//!
//! Layout drift between independently built consumers is caught by
//! executable checks rather than comments: `const` assertions on sizes and
//! boundary offsets, [`layout::verify`] at renderer initialization, and
//! [`schema::LayoutSchema`] manifests diffed across build steps.

pub mod blocks;
pub mod error;
#[cfg(feature = "gpu")]
pub mod gpu;
pub mod layout;
pub mod schema;

pub use blocks::{
    Bool32, FrameUniforms, GlobalAxesUniforms, IsosurfaceUniforms, Light,
    LightUniforms, ShadowUniforms, StructureUniforms, UniformBlock,
};
pub use error::UniformLayoutError;
pub use layout::UniformGroup;
