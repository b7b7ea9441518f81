//! HEIC serialization: monochrome HEVC at 8 or 10 bits.
//!
//! Requires a HEIF codec backend; built only with the `heic` cargo feature.
//! Without it the writer exists but reports the missing backend, so format
//! resolution and presets keep working either way.

use std::io::Write;

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::encode::types::ExportConfig;
use crate::image_pipeline::encode::writer::FormatWriter;
use crate::image_pipeline::quantize::QuantizedRaster;
use crate::image_pipeline::source::types::{AlphaMask, SourceMetadata};

pub struct HeicWriter;

#[cfg(not(feature = "heic"))]
impl FormatWriter for HeicWriter {
    fn write_gray(
        &self,
        _image: &QuantizedRaster,
        _alpha: Option<&AlphaMask>,
        _config: &ExportConfig,
        _metadata: &SourceMetadata,
        _output: &mut dyn Write,
    ) -> Result<()> {
        Err(ConversionError::UnsupportedFormatFeature {
            format: "heic".to_string(),
            feature: "HEIF codec backend (build with the `heic` feature)".to_string(),
        })
    }
}

#[cfg(feature = "heic")]
impl FormatWriter for HeicWriter {
    fn write_gray(
        &self,
        image: &QuantizedRaster,
        alpha: Option<&AlphaMask>,
        config: &ExportConfig,
        metadata: &SourceMetadata,
        output: &mut dyn Write,
    ) -> Result<()> {
        backend::write_gray(image, alpha, config, metadata, output)
    }
}

#[cfg(feature = "heic")]
mod backend {
    use libheif_rs::{
        Channel, ColorSpace, CompressionFormat, EncoderQuality, HeifContext, Image, LibHeif,
    };
    use tracing::{debug, warn};

    use super::*;
    use crate::image_pipeline::encode::writer::alpha_to_u8;
    use crate::image_pipeline::quantize::BitDepth;

    const DEFAULT_QUALITY: u8 = 95;

    fn enc_err(e: libheif_rs::HeifError) -> ConversionError {
        ConversionError::EncodeIoError(e.to_string())
    }

    pub(super) fn write_gray(
        image: &QuantizedRaster,
        alpha: Option<&AlphaMask>,
        config: &ExportConfig,
        metadata: &SourceMetadata,
        output: &mut dyn Write,
    ) -> Result<()> {
        if image.depth == BitDepth::Sixteen {
            return Err(ConversionError::UnsupportedFormatFeature {
                format: "heic".to_string(),
                feature: "16-bit samples".to_string(),
            });
        }

        let width = image.width as u32;
        let height = image.height as u32;
        let bits = image.depth.bits() as u8;

        let mut heif_image =
            Image::new(width, height, ColorSpace::Monochrome).map_err(enc_err)?;
        heif_image
            .create_plane(Channel::Y, width, height, bits)
            .map_err(enc_err)?;
        if alpha.is_some() {
            heif_image
                .create_plane(Channel::Alpha, width, height, 8)
                .map_err(enc_err)?;
        }

        fill_planes(&mut heif_image, image, alpha)?;

        if let Some(subsampling) = config.subsampling {
            debug!("Chroma subsampling {:?} has no effect on monochrome HEVC", subsampling);
        }
        if !config.strip_metadata && metadata.icc_profile.is_some() {
            warn!("HEIC backend profile embedding is not wired up; writing without ICC");
        }

        let lib_heif = LibHeif::new();
        let mut context = HeifContext::new().map_err(enc_err)?;
        let mut encoder = lib_heif
            .encoder_for_format(CompressionFormat::Hevc)
            .map_err(enc_err)?;
        let quality = config.quality.unwrap_or(DEFAULT_QUALITY).min(100);
        encoder
            .set_quality(EncoderQuality::Lossy(quality))
            .map_err(enc_err)?;
        context
            .encode_image(&heif_image, &mut encoder, None)
            .map_err(enc_err)?;

        let bytes = context.write_to_bytes().map_err(enc_err)?;
        output.write_all(&bytes)?;
        Ok(())
    }

    fn fill_planes(
        heif_image: &mut Image,
        image: &QuantizedRaster,
        alpha: Option<&AlphaMask>,
    ) -> Result<()> {
        let width = image.width;
        let mut planes = heif_image.planes_mut();

        {
            let y = planes
                .y
                .as_mut()
                .ok_or_else(|| ConversionError::EncodeIoError("missing Y plane".to_string()))?;
            let stride = y.stride;
            match image.depth {
                BitDepth::Eight => {
                    for (row_index, row) in image.data.chunks_exact(width).enumerate() {
                        let offset = row_index * stride;
                        for (x, &sample) in row.iter().enumerate() {
                            y.data[offset + x] = sample as u8;
                        }
                    }
                }
                _ => {
                    // 10-bit samples arrive left-justified; the plane stores
                    // them right-justified little-endian in two bytes
                    let shift = image.depth.container_shift();
                    for (row_index, row) in image.data.chunks_exact(width).enumerate() {
                        let offset = row_index * stride;
                        for (x, &sample) in row.iter().enumerate() {
                            let value = (sample >> shift).to_le_bytes();
                            y.data[offset + x * 2] = value[0];
                            y.data[offset + x * 2 + 1] = value[1];
                        }
                    }
                }
            }
        }

        if let Some(mask) = alpha {
            let samples = alpha_to_u8(mask);
            let a = planes
                .a
                .as_mut()
                .ok_or_else(|| ConversionError::EncodeIoError("missing alpha plane".to_string()))?;
            let stride = a.stride;
            for (row_index, row) in samples.chunks_exact(width).enumerate() {
                let offset = row_index * stride;
                a.data[offset..offset + width].copy_from_slice(row);
            }
        }

        Ok(())
    }
}
