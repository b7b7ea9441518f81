//! Format encoding module
//!
//! Serializes a quantized grayscale raster (plus optional alpha) into one of
//! the supported container formats, with capability-driven configuration
//! resolution and format-native metadata embedding.

mod bmp;
mod capabilities;
mod heic;
mod jpeg;
mod png;
mod resample;
mod resolver;
mod tiff;
mod webp;
mod writer;
pub mod types;

pub use capabilities::{FormatCapabilities, capabilities};
pub use resolver::resolve_config;
pub use types::{ChromaSubsampling, ColorRange, ExportConfig, ExportConfigBuilder, OutputFormat};
pub use writer::{FormatWriter, encode};
