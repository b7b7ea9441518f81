//! Source raster data types

use std::path::PathBuf;

/// Bits per sample of a decoded source image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleBitWidth {
    Eight,
    Sixteen,
}

impl SampleBitWidth {
    /// Maximum representable sample value (255 or 65535)
    pub fn max_value(self) -> u16 {
        match self {
            SampleBitWidth::Eight => u8::MAX as u16,
            SampleBitWidth::Sixteen => u16::MAX,
        }
    }

    pub fn bits(self) -> u32 {
        match self {
            SampleBitWidth::Eight => 8,
            SampleBitWidth::Sixteen => 16,
        }
    }
}

/// Provenance metadata carried alongside a decoded source image.
///
/// The pipeline never reinterprets these blobs; they are copied into the
/// output when the export configuration asks for them.
#[derive(Debug, Clone, Default)]
pub struct SourceMetadata {
    /// Embedded ICC profile bytes, if the container carried one
    pub icc_profile: Option<Vec<u8>>,
    /// Raw EXIF payload, if the container carried one
    pub exif: Option<Vec<u8>>,
    /// Resolution in dots per inch, if the container declared one
    pub dpi: Option<u32>,
    /// Originating file path; `None` for in-memory sources
    pub origin: Option<PathBuf>,
}

/// Represents a decoded source image
#[derive(Debug, Clone)]
pub struct SourceRaster {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
    /// Interleaved samples, `channels` per pixel. 8-bit sources occupy
    /// 0..=255 within the u16 container.
    pub data: Vec<u16>,
    /// Samples per pixel (1 gray, 2 gray+alpha, 3 color, 4 color+alpha)
    pub channels: usize,
    /// Bit width every sample was decoded at
    pub bit_width: SampleBitWidth,
    /// Provenance carried through to the encoder
    pub metadata: SourceMetadata,
}

impl SourceRaster {
    pub fn has_alpha(&self) -> bool {
        self.channels == 2 || self.channels == 4
    }

    /// One-line summary for logs and status displays.
    pub fn describe(&self) -> String {
        let origin = self
            .metadata
            .origin
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "in-memory".to_string());
        format!(
            "{}x{} | {} channel(s) | {}-bit | {} | {}",
            self.width,
            self.height,
            self.channels,
            self.bit_width.bits(),
            if self.metadata.icc_profile.is_some() {
                "ICC"
            } else {
                "No ICC"
            },
            origin,
        )
    }
}

/// Three normalized floating-point channels per pixel, each in [0, 1].
///
/// Produced by [`decompose`](super::decompose); every transform mode relies
/// on both 8- and 16-bit sources arriving on this same scale.
#[derive(Debug, Clone)]
pub struct CanonicalColor {
    pub width: usize,
    pub height: usize,
    /// Interleaved [R, G, B, R, G, B, ...] in [0, 1]
    pub data: Vec<f32>,
}

/// Alpha channel split out of a source raster, kept at the source bit width.
///
/// Carried through the pipeline unmodified; encoders re-quantize it to the
/// target bit depth only at write time.
#[derive(Debug, Clone)]
pub struct AlphaMask {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u16>,
    pub bit_width: SampleBitWidth,
}
