//! Export configuration types

use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::image_pipeline::common::error::ConversionError;
use crate::image_pipeline::quantize::BitDepth;

/// Target container format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Png,
    Tiff,
    Jpeg,
    Webp,
    Bmp,
    Heic,
}

impl OutputFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Tiff => "tiff",
            OutputFormat::Jpeg => "jpeg",
            OutputFormat::Webp => "webp",
            OutputFormat::Bmp => "bmp",
            OutputFormat::Heic => "heic",
        }
    }

    /// File extension including the leading dot
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Png => ".png",
            OutputFormat::Tiff => ".tiff",
            OutputFormat::Jpeg => ".jpeg",
            OutputFormat::Webp => ".webp",
            OutputFormat::Bmp => ".bmp",
            OutputFormat::Heic => ".heic",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = ConversionError;

    /// Accepts either a bare name or a file extension (".png").
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.trim().trim_start_matches('.').to_lowercase().as_str() {
            "png" => Ok(OutputFormat::Png),
            "tiff" | "tif" => Ok(OutputFormat::Tiff),
            "jpeg" | "jpg" => Ok(OutputFormat::Jpeg),
            "webp" => Ok(OutputFormat::Webp),
            "bmp" => Ok(OutputFormat::Bmp),
            "heic" | "heif" => Ok(OutputFormat::Heic),
            other => Err(ConversionError::UnsupportedFormatFeature {
                format: other.to_string(),
                feature: "output container".to_string(),
            }),
        }
    }
}

/// Chroma subsampling selector for lossy formats.
///
/// Semantically inert for single-channel output; carried for interface
/// symmetry with color export paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChromaSubsampling {
    #[serde(rename = "4:4:4")]
    Cs444,
    #[serde(rename = "4:2:2")]
    Cs422,
    #[serde(rename = "4:2:0")]
    Cs420,
}

/// Output color range selector, passed through to encoders that expose one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorRange {
    Preserve,
    Full,
    Limited,
}

/// Immutable description of one export.
///
/// Created by the caller, passed through [`resolve_config`](super::resolve_config)
/// before reaching the encoder; the encoder assumes the configuration it
/// receives is already valid for its format.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportConfig {
    /// Target container format
    pub format: OutputFormat,
    /// Target bit depth
    pub bit_depth: BitDepth,
    /// Target dimensions; `None` keeps the native size
    pub size: Option<(usize, usize)>,
    /// Target resolution in dots per inch
    pub dpi: Option<u32>,
    /// Explicit ICC profile to embed; takes priority over the source profile
    pub icc_profile_path: Option<PathBuf>,
    /// Carry the alpha channel through when the format can hold it
    pub preserve_alpha: bool,
    /// Write no profile, DPI, or descriptive metadata at all
    pub strip_metadata: bool,
    /// Quality 0..=100 for lossy formats
    pub quality: Option<u8>,
    /// Chroma subsampling selector for formats that accept one
    pub subsampling: Option<ChromaSubsampling>,
    /// Color range selector for formats that accept one
    pub color_range: Option<ColorRange>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Png,
            bit_depth: BitDepth::Eight,
            size: None,
            dpi: None,
            icc_profile_path: None,
            preserve_alpha: true,
            strip_metadata: false,
            quality: None,
            subsampling: None,
            color_range: None,
        }
    }
}

impl ExportConfig {
    pub fn builder() -> ExportConfigBuilder {
        ExportConfigBuilder::default()
    }
}

/// Builder for ExportConfig
#[derive(Default)]
pub struct ExportConfigBuilder {
    format: Option<OutputFormat>,
    bit_depth: Option<BitDepth>,
    size: Option<Option<(usize, usize)>>,
    dpi: Option<Option<u32>>,
    icc_profile_path: Option<Option<PathBuf>>,
    preserve_alpha: Option<bool>,
    strip_metadata: Option<bool>,
    quality: Option<Option<u8>>,
    subsampling: Option<Option<ChromaSubsampling>>,
    color_range: Option<Option<ColorRange>>,
}

impl ExportConfigBuilder {
    pub fn format(mut self, format: OutputFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn bit_depth(mut self, bit_depth: BitDepth) -> Self {
        self.bit_depth = Some(bit_depth);
        self
    }

    pub fn size(mut self, size: Option<(usize, usize)>) -> Self {
        self.size = Some(size);
        self
    }

    pub fn dpi(mut self, dpi: Option<u32>) -> Self {
        self.dpi = Some(dpi);
        self
    }

    pub fn icc_profile_path(mut self, path: Option<PathBuf>) -> Self {
        self.icc_profile_path = Some(path);
        self
    }

    pub fn preserve_alpha(mut self, preserve: bool) -> Self {
        self.preserve_alpha = Some(preserve);
        self
    }

    pub fn strip_metadata(mut self, strip: bool) -> Self {
        self.strip_metadata = Some(strip);
        self
    }

    pub fn quality(mut self, quality: Option<u8>) -> Self {
        self.quality = Some(quality);
        self
    }

    pub fn subsampling(mut self, subsampling: Option<ChromaSubsampling>) -> Self {
        self.subsampling = Some(subsampling);
        self
    }

    pub fn color_range(mut self, color_range: Option<ColorRange>) -> Self {
        self.color_range = Some(color_range);
        self
    }

    pub fn build(self) -> ExportConfig {
        let default = ExportConfig::default();
        ExportConfig {
            format: self.format.unwrap_or(default.format),
            bit_depth: self.bit_depth.unwrap_or(default.bit_depth),
            size: self.size.unwrap_or(default.size),
            dpi: self.dpi.unwrap_or(default.dpi),
            icc_profile_path: self.icc_profile_path.unwrap_or(default.icc_profile_path),
            preserve_alpha: self.preserve_alpha.unwrap_or(default.preserve_alpha),
            strip_metadata: self.strip_metadata.unwrap_or(default.strip_metadata),
            quality: self.quality.unwrap_or(default.quality),
            subsampling: self.subsampling.unwrap_or(default.subsampling),
            color_range: self.color_range.unwrap_or(default.color_range),
        }
    }
}
