//! WEBP serialization: 8-bit, optional alpha.
//!
//! WebP has no native grayscale layout, so samples are expanded to RGB(A)
//! before the backend runs. The backend encodes losslessly; the quality
//! field is accepted and carried for interface symmetry with the other
//! lossy formats.

use std::io::{Cursor, Write};

use image::codecs::webp::WebPEncoder;
use image::{ExtendedColorType, ImageEncoder};
use tracing::{debug, warn};

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::encode::types::ExportConfig;
use crate::image_pipeline::encode::writer::{FormatWriter, alpha_to_u8, select_icc_profile};
use crate::image_pipeline::quantize::{BitDepth, QuantizedRaster};
use crate::image_pipeline::source::types::{AlphaMask, SourceMetadata};

pub struct WebpWriter;

impl FormatWriter for WebpWriter {
    fn write_gray(
        &self,
        image: &QuantizedRaster,
        alpha: Option<&AlphaMask>,
        config: &ExportConfig,
        metadata: &SourceMetadata,
        output: &mut dyn Write,
    ) -> Result<()> {
        if image.depth != BitDepth::Eight {
            return Err(ConversionError::UnsupportedFormatFeature {
                format: "webp".to_string(),
                feature: format!("{}-bit samples", image.depth.bits()),
            });
        }

        if let Some(quality) = config.quality {
            debug!("WEBP backend is lossless; quality {} carried without effect", quality);
        }
        if select_icc_profile(config, metadata)?.is_some() {
            warn!("WEBP backend cannot embed an ICC profile; writing without it");
        }

        let (bytes, color) = match alpha {
            None => {
                let mut bytes = Vec::with_capacity(image.data.len() * 3);
                for &g in &image.data {
                    bytes.extend_from_slice(&[g as u8; 3]);
                }
                (bytes, ExtendedColorType::Rgb8)
            }
            Some(mask) => {
                let alpha = alpha_to_u8(mask);
                let mut bytes = Vec::with_capacity(image.data.len() * 4);
                for (&g, &a) in image.data.iter().zip(&alpha) {
                    bytes.extend_from_slice(&[g as u8, g as u8, g as u8, a]);
                }
                (bytes, ExtendedColorType::Rgba8)
            }
        };

        let mut buffer = Vec::new();
        let encoder = WebPEncoder::new_lossless(Cursor::new(&mut buffer));
        encoder
            .write_image(&bytes, image.width as u32, image.height as u32, color)
            .map_err(|e| ConversionError::EncodeIoError(e.to_string()))?;

        output.write_all(&buffer)?;
        Ok(())
    }
}
