//! JPEG serialization: 8-bit single-channel, lossy quality.

use std::io::{Cursor, Write};

use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder};
use tracing::{debug, warn};

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::encode::types::ExportConfig;
use crate::image_pipeline::encode::writer::{FormatWriter, gray_to_u8, select_icc_profile};
use crate::image_pipeline::quantize::{BitDepth, QuantizedRaster};
use crate::image_pipeline::source::types::{AlphaMask, SourceMetadata};

const DEFAULT_QUALITY: u8 = 95;

pub struct JpegWriter;

impl FormatWriter for JpegWriter {
    fn write_gray(
        &self,
        image: &QuantizedRaster,
        _alpha: Option<&AlphaMask>,
        config: &ExportConfig,
        metadata: &SourceMetadata,
        output: &mut dyn Write,
    ) -> Result<()> {
        if image.depth != BitDepth::Eight {
            return Err(ConversionError::UnsupportedFormatFeature {
                format: "jpeg".to_string(),
                feature: format!("{}-bit samples", image.depth.bits()),
            });
        }

        if let Some(subsampling) = config.subsampling {
            // Single-channel output has no chroma planes to subsample; the
            // selector is accepted and carried without effect.
            debug!("Chroma subsampling {:?} has no effect on grayscale JPEG", subsampling);
        }

        let quality = config.quality.unwrap_or(DEFAULT_QUALITY).min(100);

        let mut buffer = Vec::new();
        let mut encoder = JpegEncoder::new_with_quality(Cursor::new(&mut buffer), quality);
        if let Some(icc) = select_icc_profile(config, metadata)? {
            if encoder.set_icc_profile(icc).is_err() {
                warn!("JPEG backend refused the ICC profile; writing without it");
            }
        }

        encoder
            .write_image(
                &gray_to_u8(image),
                image.width as u32,
                image.height as u32,
                ExtendedColorType::L8,
            )
            .map_err(|e| ConversionError::EncodeIoError(e.to_string()))?;

        output.write_all(&buffer)?;
        Ok(())
    }
}
