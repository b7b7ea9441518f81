#[cfg(test)]
mod tests {
    use std::io::{Cursor, Write};

    use crate::image_pipeline::common::error::{ConversionError, Result};
    use crate::image_pipeline::conversions::pipeline::GrayscalePipeline;
    use crate::image_pipeline::encode::types::{ExportConfig, OutputFormat};
    use crate::image_pipeline::grayscale::TransformMode;
    use crate::image_pipeline::quantize::BitDepth;
    use crate::image_pipeline::source::SourceReader;
    use crate::image_pipeline::source::types::{SampleBitWidth, SourceMetadata, SourceRaster};

    struct MockReader {
        should_fail: bool,
        mock_data: Option<SourceRaster>,
    }

    impl SourceReader for MockReader {
        fn read_source(&self, _data: &[u8]) -> Result<SourceRaster> {
            if self.should_fail {
                return Err(ConversionError::DecodeError("Mock decode error".to_string()));
            }
            Ok(self.mock_data.clone().unwrap_or(SourceRaster {
                width: 8,
                height: 8,
                data: vec![100u16; 8 * 8 * 3],
                channels: 3,
                bit_width: SampleBitWidth::Eight,
                metadata: SourceMetadata::default(),
            }))
        }
    }

    struct FailingOutput;

    impl Write for FailingOutput {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("Mock write error"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn alpha_raster(width: usize, height: usize) -> SourceRaster {
        SourceRaster {
            width,
            height,
            data: (0..width * height)
                .flat_map(|i| [200, 100, 50, (i % 256) as u16])
                .collect(),
            channels: 4,
            bit_width: SampleBitWidth::Eight,
            metadata: SourceMetadata::default(),
        }
    }

    #[test]
    fn test_successful_conversion() {
        let reader = MockReader { should_fail: false, mock_data: None };
        let pipeline = GrayscalePipeline::with_custom(
            reader,
            TransformMode::Bt709,
            ExportConfig::default(),
        );

        let mut output = Cursor::new(Vec::new());
        let result = pipeline.convert(b"fake image data", &mut output);

        assert!(result.is_ok());
        assert_eq!(&output.get_ref()[1..4], b"PNG");
    }

    #[test]
    fn test_reader_failure() {
        let reader = MockReader { should_fail: true, mock_data: None };
        let pipeline = GrayscalePipeline::with_custom(
            reader,
            TransformMode::Bt709,
            ExportConfig::default(),
        );

        let mut output = Cursor::new(Vec::new());
        let result = pipeline.convert(b"fake image data", &mut output);

        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), ConversionError::DecodeError(_)));
        assert!(output.get_ref().is_empty());
    }

    #[test]
    fn test_output_write_failure() {
        let reader = MockReader { should_fail: false, mock_data: None };
        let pipeline = GrayscalePipeline::with_custom(
            reader,
            TransformMode::Bt709,
            ExportConfig::default(),
        );

        let result = pipeline.convert(b"fake image data", &mut FailingOutput);

        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), ConversionError::IoError(_)));
    }

    #[test]
    fn test_zero_dimension_raster_is_rejected() {
        let reader = MockReader {
            should_fail: false,
            mock_data: Some(SourceRaster {
                width: 0,
                height: 8,
                data: Vec::new(),
                channels: 3,
                bit_width: SampleBitWidth::Eight,
                metadata: SourceMetadata::default(),
            }),
        };
        let pipeline = GrayscalePipeline::with_custom(
            reader,
            TransformMode::Bt709,
            ExportConfig::default(),
        );

        let mut output = Cursor::new(Vec::new());
        let result = pipeline.convert(b"fake image data", &mut output);

        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), ConversionError::InvalidDimensions(0, 8)));
    }

    #[test]
    fn test_jpeg_sixteen_bit_request_is_clamped_before_quantization() {
        let reader = MockReader { should_fail: false, mock_data: None };
        let config = ExportConfig::builder()
            .format(OutputFormat::Jpeg)
            .bit_depth(BitDepth::Sixteen)
            .build();
        let pipeline = GrayscalePipeline::with_custom(reader, TransformMode::Bt709, config);

        let mut output = Cursor::new(Vec::new());
        pipeline.convert(b"fake image data", &mut output).unwrap();

        // An 8-bit JPEG came out despite the 16-bit request
        let decoded = image::load_from_memory(output.get_ref()).unwrap();
        assert!(matches!(decoded, image::DynamicImage::ImageLuma8(_)));
    }

    #[test]
    fn test_resolver_drops_alpha_the_format_cannot_carry() {
        // BMP carries no alpha; the resolver strips it before the encoder
        // runs, so the conversion succeeds instead of erroring
        let reader = MockReader {
            should_fail: false,
            mock_data: Some(alpha_raster(4, 4)),
        };
        let config = ExportConfig::builder()
            .format(OutputFormat::Bmp)
            .preserve_alpha(true)
            .build();
        let pipeline = GrayscalePipeline::with_custom(reader, TransformMode::Bt601, config);

        let mut output = Cursor::new(Vec::new());
        let result = pipeline.convert(b"fake image data", &mut output);

        assert!(result.is_ok());
        assert_eq!(&output.get_ref()[..2], b"BM");
    }

    #[test]
    fn test_alpha_survives_where_the_format_carries_it() {
        let reader = MockReader {
            should_fail: false,
            mock_data: Some(alpha_raster(4, 4)),
        };
        let config = ExportConfig::builder()
            .format(OutputFormat::Png)
            .preserve_alpha(true)
            .build();
        let pipeline = GrayscalePipeline::with_custom(reader, TransformMode::Bt601, config);

        let mut output = Cursor::new(Vec::new());
        pipeline.convert(b"fake image data", &mut output).unwrap();

        let decoded = image::load_from_memory(output.get_ref()).unwrap();
        assert!(matches!(decoded, image::DynamicImage::ImageLumaA8(_)));
    }

    #[test]
    fn test_resize_applies_before_encoding() {
        let reader = MockReader { should_fail: false, mock_data: None };
        let config = ExportConfig::builder().size(Some((4, 2))).build();
        let pipeline = GrayscalePipeline::with_custom(reader, TransformMode::Bt709, config);

        let mut output = Cursor::new(Vec::new());
        pipeline.convert(b"fake image data", &mut output).unwrap();

        let decoded = image::load_from_memory(output.get_ref()).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (4, 2));
    }

    #[test]
    fn test_convert_file_leaves_no_partial_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("input.png");
        std::fs::write(&input, b"not a real image").unwrap();
        let output = dir.path().join("output.png");

        let pipeline = GrayscalePipeline::new(TransformMode::Bt709, ExportConfig::default());
        let result = pipeline.convert_file(&input, &output);

        assert!(result.is_err());
        assert!(!output.exists());
        assert!(!dir.path().join("output.png.tmp").exists());
    }

    #[test]
    fn test_convert_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("input.png");
        let img = image::DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
            4,
            4,
            image::Rgb([255, 0, 0]),
        ));
        img.save(&input).unwrap();
        let output = dir.path().join("output.png");

        let pipeline = GrayscalePipeline::new(TransformMode::Bt709, ExportConfig::default());
        pipeline.convert_file(&input, &output).unwrap();

        // Pure red under BT.709 quantizes to round(0.2126 * 255) = 54
        let decoded = image::open(&output).unwrap().to_luma8();
        assert!(decoded.pixels().all(|p| p.0 == [54]));
    }
}
