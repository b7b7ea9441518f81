use tracing::{info, instrument};
use std::io::Write;
use std::path::Path;

use crate::image_pipeline::{
    common::error::{ConversionError, Result},
    encode::{ExportConfig, encode, resolve_config},
    grayscale::{TransformMode, transform},
    quantize::quantize,
    source::{ImageCrateReader, SourceRaster, SourceReader, decompose},
};

/// Decode, convert, quantize, and encode one image as a single unit of work.
///
/// Every stage is a pure function of its inputs; the pipeline holds no
/// mutable state between invocations and is safe to run concurrently for
/// independent images.
pub struct GrayscalePipeline<R: SourceReader> {
    reader: R,
    mode: TransformMode,
    config: ExportConfig,
}

impl GrayscalePipeline<ImageCrateReader> {
    pub fn new(mode: TransformMode, config: ExportConfig) -> Self {
        Self {
            reader: ImageCrateReader,
            mode,
            config,
        }
    }
}

impl<R: SourceReader> GrayscalePipeline<R> {
    pub fn with_custom(reader: R, mode: TransformMode, config: ExportConfig) -> Self {
        Self {
            reader,
            mode,
            config,
        }
    }

    fn validate_dimensions(&self, width: usize, height: usize) -> Result<()> {
        if width == 0 || height == 0 {
            return Err(ConversionError::InvalidDimensions(width, height));
        }

        Ok(())
    }

    #[instrument(skip(self, input_data, output), fields(input_size = input_data.len()))]
    pub fn convert(&self, input_data: &[u8], output: &mut dyn Write) -> Result<()> {
        info!("Starting grayscale conversion");

        let raster = {
            let _span = tracing::info_span!("decode_source").entered();
            self.reader.read_source(input_data)?
        };

        self.convert_raster(&raster, output)
    }

    /// Run the conversion stages over an already-decoded source raster.
    ///
    /// The configuration is resolved before quantization so the raster is
    /// quantized at the depth the format will actually carry, and alpha is
    /// dropped here when the resolver disabled it, so the encoder never sees
    /// an alpha mask its format cannot hold.
    #[instrument(skip(self, raster, output), fields(width = raster.width, height = raster.height))]
    pub fn convert_raster(&self, raster: &SourceRaster, output: &mut dyn Write) -> Result<()> {
        {
            let _span = tracing::info_span!("validate_dimensions",
                width = raster.width,
                height = raster.height
            ).entered();
            self.validate_dimensions(raster.width, raster.height)?;
        }

        let resolved = resolve_config(&self.config, self.config.format);

        let (color, alpha) = {
            let _span = tracing::info_span!("decompose").entered();
            decompose(raster)?
        };

        let field = {
            let _span = tracing::info_span!("transform", mode = self.mode.as_str()).entered();
            transform(&color, self.mode)
        };

        let quantized = {
            let _span = tracing::info_span!("quantize", bits = resolved.bit_depth.bits()).entered();
            quantize(&field, resolved.bit_depth)
        };

        let alpha = if resolved.preserve_alpha { alpha } else { None };

        {
            let _span = tracing::info_span!("encode", format = resolved.format.as_str()).entered();
            encode(&quantized, alpha.as_ref(), &resolved, &raster.metadata, output)?;
        }

        info!(
            width = raster.width,
            height = raster.height,
            "Conversion complete"
        );
        Ok(())
    }

    /// Convert a file on disk into a new file.
    ///
    /// The output is fully encoded in memory, written to a sibling temporary
    /// path, and renamed into place, so a failed conversion never leaves a
    /// truncated file at the destination.
    #[instrument(skip(self, input_path, output_path))]
    pub fn convert_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input_path: P,
        output_path: Q,
    ) -> Result<()> {
        let input_path = input_path.as_ref();
        let output_path = output_path.as_ref();

        info!(
            input = %input_path.display(),
            output = %output_path.display(),
            "Converting file"
        );

        let input_data = {
            let _span = tracing::info_span!("read_input_file").entered();
            std::fs::read(input_path).map_err(|e| {
                ConversionError::InputReadError(format!("{}: {}", input_path.display(), e))
            })?
        };

        let mut buffer = Vec::new();
        self.convert(&input_data, &mut buffer)?;

        {
            let _span = tracing::info_span!("write_output_file").entered();
            let mut tmp_path = output_path.as_os_str().to_os_string();
            tmp_path.push(".tmp");
            let tmp_path = std::path::PathBuf::from(tmp_path);

            std::fs::write(&tmp_path, &buffer).map_err(|e| {
                let _ = std::fs::remove_file(&tmp_path);
                ConversionError::OutputWriteError(format!("{}: {}", output_path.display(), e))
            })?;
            std::fs::rename(&tmp_path, output_path).map_err(|e| {
                let _ = std::fs::remove_file(&tmp_path);
                ConversionError::OutputWriteError(format!("{}: {}", output_path.display(), e))
            })?;
        }

        Ok(())
    }

    pub fn mode(&self) -> TransformMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: TransformMode) {
        self.mode = mode;
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: ExportConfig) {
        self.config = config;
    }
}
