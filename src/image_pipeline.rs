//! Image processing pipeline module
//!
//! This module provides a structured approach to grayscale conversion,
//! with separate modules for source decoding, colorimetric transforms,
//! bit-depth quantization, format encoding, and conversion orchestration.

pub mod common;
pub mod source;
pub mod grayscale;
pub mod quantize;
pub mod encode;
pub mod conversions;
pub mod preset;

pub use common::{
    ConversionError,
    Result,
};

pub use source::{
    SourceRaster,
    SourceMetadata,
    SampleBitWidth,
    CanonicalColor,
    AlphaMask,
    SourceReader,
    ImageCrateReader,
    decompose,
};

pub use grayscale::{
    TransformMode,
    GrayscaleField,
    transform,
};

pub use quantize::{
    BitDepth,
    QuantizedRaster,
    quantize,
};

pub use encode::{
    OutputFormat,
    ExportConfig,
    ExportConfigBuilder,
    ChromaSubsampling,
    ColorRange,
    FormatCapabilities,
    capabilities,
    resolve_config,
    FormatWriter,
    encode,
};

pub use conversions::{
    GrayscalePipeline,
    ConversionSession,
    BatchItem,
    convert_batch,
};

pub use preset::ExportPreset;
