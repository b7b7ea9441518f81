//! Source image reader implementation backed by the image crate.
//!
//! Decodes the common raster containers (PNG, JPEG, TIFF, WEBP, BMP, GIF)
//! into a [`SourceRaster`], preserving the decoded bit width and splitting
//! out embedded ICC/EXIF blobs so the encoder can copy them through.

use std::io::Cursor;

use image::{DynamicImage, ImageDecoder};
use tracing::debug;

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::source::reader::SourceReader;
use crate::image_pipeline::source::types::{SampleBitWidth, SourceMetadata, SourceRaster};

/// Source reader that uses the image crate for decoding.
///
/// Any container the image crate can decode is accepted. 8-bit and 16-bit
/// variants map directly; exotic decoded layouts (e.g. 32-bit float) are
/// converted to 16-bit color before entering the pipeline.
pub struct ImageCrateReader;

impl SourceReader for ImageCrateReader {
    fn read_source(&self, data: &[u8]) -> Result<SourceRaster> {
        debug!("Decoding source image, {} bytes", data.len());

        let reader = image::ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(|e| ConversionError::DecodeError(e.to_string()))?;

        let mut decoder = reader
            .into_decoder()
            .map_err(|e| ConversionError::DecodeError(e.to_string()))?;

        // Metadata extraction must not fail the decode; containers without
        // these blobs simply yield None.
        let icc_profile = decoder.icc_profile().unwrap_or(None);
        let exif = decoder.exif_metadata().unwrap_or(None);

        let decoded = DynamicImage::from_decoder(decoder)
            .map_err(|e| ConversionError::DecodeError(e.to_string()))?;

        let metadata = SourceMetadata {
            icc_profile,
            exif,
            dpi: None,
            origin: None,
        };

        let raster = from_dynamic(decoded, metadata);
        debug!("Decoded source: {}", raster.describe());
        Ok(raster)
    }
}

impl ImageCrateReader {
    /// Read and decode a file from disk, recording its path as the origin.
    pub fn read_source_file(&self, path: &std::path::Path) -> Result<SourceRaster> {
        let data = std::fs::read(path)
            .map_err(|e| ConversionError::InputReadError(format!("{}: {}", path.display(), e)))?;
        let mut raster = self.read_source(&data)?;
        raster.metadata.origin = Some(path.to_path_buf());
        Ok(raster)
    }
}

fn from_dynamic(decoded: DynamicImage, metadata: SourceMetadata) -> SourceRaster {
    let width = decoded.width() as usize;
    let height = decoded.height() as usize;

    let (data, channels, bit_width) = match decoded {
        DynamicImage::ImageLuma8(buf) => (widen(buf.into_raw()), 1, SampleBitWidth::Eight),
        DynamicImage::ImageLumaA8(buf) => (widen(buf.into_raw()), 2, SampleBitWidth::Eight),
        DynamicImage::ImageRgb8(buf) => (widen(buf.into_raw()), 3, SampleBitWidth::Eight),
        DynamicImage::ImageRgba8(buf) => (widen(buf.into_raw()), 4, SampleBitWidth::Eight),
        DynamicImage::ImageLuma16(buf) => (buf.into_raw(), 1, SampleBitWidth::Sixteen),
        DynamicImage::ImageLumaA16(buf) => (buf.into_raw(), 2, SampleBitWidth::Sixteen),
        DynamicImage::ImageRgb16(buf) => (buf.into_raw(), 3, SampleBitWidth::Sixteen),
        DynamicImage::ImageRgba16(buf) => (buf.into_raw(), 4, SampleBitWidth::Sixteen),
        other => {
            // Float and future layouts: re-render at 16-bit color+alpha
            let buf = other.to_rgba16();
            (buf.into_raw(), 4, SampleBitWidth::Sixteen)
        }
    };

    SourceRaster {
        width,
        height,
        data,
        channels,
        bit_width,
        metadata,
    }
}

fn widen(bytes: Vec<u8>) -> Vec<u16> {
    bytes.into_iter().map(u16::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes(img: DynamicImage) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, image::ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    #[test]
    fn decodes_rgb8_png() {
        let img = DynamicImage::ImageRgb8(image::RgbImage::from_fn(3, 2, |x, _| {
            image::Rgb([x as u8 * 10, 0, 255])
        }));
        let raster = ImageCrateReader.read_source(&png_bytes(img)).unwrap();
        assert_eq!((raster.width, raster.height), (3, 2));
        assert_eq!(raster.channels, 3);
        assert_eq!(raster.bit_width, SampleBitWidth::Eight);
        assert_eq!(raster.data[2], 255);
        assert!(!raster.has_alpha());
    }

    #[test]
    fn decodes_luma16_png_at_sixteen_bits() {
        let img = DynamicImage::ImageLuma16(image::ImageBuffer::from_fn(2, 2, |x, y| {
            image::Luma([(x + y * 2) as u16 * 1000])
        }));
        let raster = ImageCrateReader.read_source(&png_bytes(img)).unwrap();
        assert_eq!(raster.channels, 1);
        assert_eq!(raster.bit_width, SampleBitWidth::Sixteen);
        assert_eq!(raster.data, vec![0, 1000, 2000, 3000]);
    }

    #[test]
    fn decodes_rgba8_with_alpha() {
        let img = DynamicImage::ImageRgba8(image::RgbaImage::from_pixel(
            2,
            2,
            image::Rgba([10, 20, 30, 40]),
        ));
        let raster = ImageCrateReader.read_source(&png_bytes(img)).unwrap();
        assert_eq!(raster.channels, 4);
        assert!(raster.has_alpha());
        assert_eq!(&raster.data[..4], &[10, 20, 30, 40]);
    }

    #[test]
    fn rejects_garbage_bytes() {
        let result = ImageCrateReader.read_source(&[0xde, 0xad, 0xbe, 0xef]);
        assert!(matches!(result, Err(ConversionError::DecodeError(_))));
    }

    #[test]
    fn missing_file_is_input_read_error() {
        let result =
            ImageCrateReader.read_source_file(std::path::Path::new("/no/such/file.png"));
        assert!(matches!(result, Err(ConversionError::InputReadError(_))));
    }
}
