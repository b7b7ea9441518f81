//! Grayscale transform module
//!
//! Seven selectable colorimetric mappings from canonical RGB to a
//! single-channel grayscale field in [0, 1].

mod modes;
mod srgb;
mod transform;
pub mod types;

pub use modes::TransformMode;
pub use transform::transform;
pub use types::GrayscaleField;
