//! BMP serialization: 8-bit grayscale, no alpha.

use std::io::{Cursor, Write};

use image::ExtendedColorType;
use image::codecs::bmp::BmpEncoder;
use tracing::warn;

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::encode::types::ExportConfig;
use crate::image_pipeline::encode::writer::{FormatWriter, gray_to_u8, select_icc_profile};
use crate::image_pipeline::quantize::{BitDepth, QuantizedRaster};
use crate::image_pipeline::source::types::{AlphaMask, SourceMetadata};

pub struct BmpWriter;

impl FormatWriter for BmpWriter {
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
                format: "bmp".to_string(),
                feature: format!("{}-bit samples", image.depth.bits()),
            });
        }

        if select_icc_profile(config, metadata)?.is_some() {
            warn!("BMP backend cannot embed an ICC profile; writing without it");
        }

        let mut buffer = Vec::new();
        let mut cursor = Cursor::new(&mut buffer);
        let mut encoder = BmpEncoder::new(&mut cursor);
        encoder
            .encode(
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
