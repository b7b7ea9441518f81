//! Source raster loading module
//!
//! This module provides format-agnostic source image reading and channel
//! decomposition into canonical normalized color.

mod reader;
mod image_reader;
mod decompose;
pub mod types;

pub use reader::SourceReader;
pub use image_reader::ImageCrateReader;
pub use decompose::decompose;
pub use types::{SourceRaster, SourceMetadata, SampleBitWidth, CanonicalColor, AlphaMask};
