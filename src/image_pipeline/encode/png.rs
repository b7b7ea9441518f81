//! PNG serialization: 8- or 16-bit grayscale, with or without alpha.

use std::io::{Cursor, Write};

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};
use tracing::warn;

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::encode::types::ExportConfig;
use crate::image_pipeline::encode::writer::{
    FormatWriter, alpha_to_u8, alpha_to_u16, gray_to_u8, select_icc_profile,
};
use crate::image_pipeline::quantize::{BitDepth, QuantizedRaster};
use crate::image_pipeline::source::types::{AlphaMask, SourceMetadata};

pub struct PngWriter;

impl FormatWriter for PngWriter {
    fn write_gray(
        &self,
        image: &QuantizedRaster,
        alpha: Option<&AlphaMask>,
        config: &ExportConfig,
        metadata: &SourceMetadata,
        output: &mut dyn Write,
    ) -> Result<()> {
        let (bytes, color) = match (image.depth, alpha) {
            (BitDepth::Eight, None) => (gray_to_u8(image), ExtendedColorType::L8),
            (BitDepth::Eight, Some(mask)) => {
                let alpha = alpha_to_u8(mask);
                let mut bytes = Vec::with_capacity(image.data.len() * 2);
                for (&g, &a) in image.data.iter().zip(&alpha) {
                    bytes.push(g as u8);
                    bytes.push(a);
                }
                (bytes, ExtendedColorType::La8)
            }
            (BitDepth::Sixteen, None) => {
                let bytes = image.data.iter().flat_map(|v| v.to_ne_bytes()).collect();
                (bytes, ExtendedColorType::L16)
            }
            (BitDepth::Sixteen, Some(mask)) => {
                let alpha = alpha_to_u16(mask);
                let mut bytes = Vec::with_capacity(image.data.len() * 4);
                for (&g, &a) in image.data.iter().zip(&alpha) {
                    bytes.extend_from_slice(&g.to_ne_bytes());
                    bytes.extend_from_slice(&a.to_ne_bytes());
                }
                (bytes, ExtendedColorType::La16)
            }
            (BitDepth::Ten, _) => {
                return Err(ConversionError::UnsupportedFormatFeature {
                    format: "png".to_string(),
                    feature: "10-bit samples".to_string(),
                });
            }
        };

        let mut buffer = Vec::new();
        let mut encoder = PngEncoder::new(Cursor::new(&mut buffer));
        if let Some(icc) = select_icc_profile(config, metadata)? {
            if encoder.set_icc_profile(icc).is_err() {
                warn!("PNG backend refused the ICC profile; writing without it");
            }
        }

        encoder
            .write_image(&bytes, image.width as u32, image.height as u32, color)
            .map_err(|e| ConversionError::EncodeIoError(e.to_string()))?;

        output.write_all(&buffer)?;
        Ok(())
    }
}
