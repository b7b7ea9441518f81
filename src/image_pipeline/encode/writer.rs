//! Encoder dispatch and shared raster plumbing.

use std::io::Write;

use tracing::debug;

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::encode::capabilities::capabilities;
use crate::image_pipeline::encode::resample::{resample_alpha, resample_gray};
use crate::image_pipeline::encode::types::{ExportConfig, OutputFormat};
use crate::image_pipeline::encode::{bmp, heic, jpeg, png, tiff, webp};
use crate::image_pipeline::quantize::QuantizedRaster;
use crate::image_pipeline::source::types::{AlphaMask, SampleBitWidth, SourceMetadata};

/// One serializer per container format.
///
/// Implementations buffer the whole file in memory and hand it to `output`
/// in a single write, so a failing encode never leaves a truncated file
/// behind.
pub trait FormatWriter {
    fn write_gray(
        &self,
        image: &QuantizedRaster,
        alpha: Option<&AlphaMask>,
        config: &ExportConfig,
        metadata: &SourceMetadata,
        output: &mut dyn Write,
    ) -> Result<()>;
}

/// Serialize a quantized raster into the configured container.
///
/// `config` must already have passed through
/// [`resolve_config`](super::resolve_config); an alpha raster arriving for a
/// format/depth that cannot carry one indicates a resolver bypass and is
/// reported as an error, never downgraded a second time.
pub fn encode(
    image: &QuantizedRaster,
    alpha: Option<&AlphaMask>,
    config: &ExportConfig,
    metadata: &SourceMetadata,
    output: &mut dyn Write,
) -> Result<()> {
    let caps = capabilities(config.format);
    if alpha.is_some() && (!config.preserve_alpha || !caps.supports_alpha_at(image.depth)) {
        return Err(ConversionError::UnsupportedFormatFeature {
            format: config.format.as_str().to_string(),
            feature: format!("alpha channel at {}-bit", image.depth.bits()),
        });
    }

    let resized_gray;
    let resized_alpha;
    let (image, alpha) = match config.size {
        Some((w, h)) if (w, h) != (image.width, image.height) => {
            resized_gray = resample_gray(image, w, h)?;
            resized_alpha = match alpha {
                Some(mask) => Some(resample_alpha(mask, w, h)?),
                None => None,
            };
            (&resized_gray, resized_alpha.as_ref())
        }
        _ => (image, alpha),
    };

    debug!(
        "Encoding {} image: {}x{} at {}-bit{}",
        config.format.as_str(),
        image.width,
        image.height,
        image.depth.bits(),
        if alpha.is_some() { " + alpha" } else { "" }
    );

    match config.format {
        OutputFormat::Png => png::PngWriter.write_gray(image, alpha, config, metadata, output),
        OutputFormat::Tiff => tiff::TiffWriter.write_gray(image, alpha, config, metadata, output),
        OutputFormat::Jpeg => jpeg::JpegWriter.write_gray(image, alpha, config, metadata, output),
        OutputFormat::Webp => webp::WebpWriter.write_gray(image, alpha, config, metadata, output),
        OutputFormat::Bmp => bmp::BmpWriter.write_gray(image, alpha, config, metadata, output),
        OutputFormat::Heic => heic::HeicWriter.write_gray(image, alpha, config, metadata, output),
    }
}

/// ICC profile to embed: explicitly configured path first, then the source's
/// embedded profile, else none. The strip flag wins over both.
pub(crate) fn select_icc_profile(
    config: &ExportConfig,
    metadata: &SourceMetadata,
) -> Result<Option<Vec<u8>>> {
    if config.strip_metadata {
        return Ok(None);
    }
    if let Some(path) = &config.icc_profile_path {
        let bytes = std::fs::read(path)
            .map_err(|e| ConversionError::InputReadError(format!("{}: {}", path.display(), e)))?;
        return Ok(Some(bytes));
    }
    Ok(metadata.icc_profile.clone())
}

/// Alpha samples as 8-bit, narrowing 16-bit sources with rounding.
pub(crate) fn alpha_to_u8(mask: &AlphaMask) -> Vec<u8> {
    match mask.bit_width {
        SampleBitWidth::Eight => mask.data.iter().map(|&v| v as u8).collect(),
        SampleBitWidth::Sixteen => mask
            .data
            .iter()
            .map(|&v| ((v as u32 + 128) / 257) as u8)
            .collect(),
    }
}

/// Alpha samples as 16-bit, widening 8-bit sources by replication (v * 257).
pub(crate) fn alpha_to_u16(mask: &AlphaMask) -> Vec<u16> {
    match mask.bit_width {
        SampleBitWidth::Eight => mask.data.iter().map(|&v| v * 257).collect(),
        SampleBitWidth::Sixteen => mask.data.clone(),
    }
}

/// Grayscale samples as a tightly-packed u8 plane (8-bit rasters only).
pub(crate) fn gray_to_u8(image: &QuantizedRaster) -> Vec<u8> {
    image.data.iter().map(|&v| v as u8).collect()
}
