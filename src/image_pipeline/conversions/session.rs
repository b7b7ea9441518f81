//! One logical conversion session.
//!
//! A session holds one loaded image, one conversion mode, and one export
//! configuration at a time, passed explicitly into the pipeline rather than
//! living in ambient global state. Callers that need responsiveness dispatch
//! `export` onto their own worker; the session itself is synchronous.

use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::conversions::pipeline::GrayscalePipeline;
use crate::image_pipeline::encode::ExportConfig;
use crate::image_pipeline::grayscale::TransformMode;
use crate::image_pipeline::preset::ExportPreset;
use crate::image_pipeline::source::{ImageCrateReader, SourceRaster, SourceReader};

pub struct ConversionSession {
    image: Option<SourceRaster>,
    mode: TransformMode,
    config: ExportConfig,
}

impl Default for ConversionSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversionSession {
    pub fn new() -> Self {
        Self {
            image: None,
            mode: TransformMode::default(),
            config: ExportConfig::default(),
        }
    }

    /// Load a source image from disk, replacing any previously loaded one.
    pub fn load_file<P: AsRef<Path>>(&mut self, path: P) -> Result<&SourceRaster> {
        let raster = ImageCrateReader.read_source_file(path.as_ref())?;
        info!("Loaded image: {}", raster.describe());
        Ok(self.image.insert(raster))
    }

    /// Load a source image from an in-memory buffer.
    pub fn load_bytes(&mut self, data: &[u8]) -> Result<&SourceRaster> {
        let raster = ImageCrateReader.read_source(data)?;
        Ok(self.image.insert(raster))
    }

    pub fn image(&self) -> Option<&SourceRaster> {
        self.image.as_ref()
    }

    /// One-line summary of the loaded image, for status displays.
    pub fn describe_image(&self) -> Option<String> {
        self.image.as_ref().map(|raster| raster.describe())
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

    /// Adopt the configuration and mode a preset describes.
    pub fn apply_preset(&mut self, preset: &ExportPreset) -> Result<()> {
        let (config, mode) = preset.into_parts()?;
        self.config = config;
        self.mode = mode;
        Ok(())
    }

    pub fn to_preset(&self) -> ExportPreset {
        ExportPreset::from_parts(&self.config, self.mode)
    }

    /// Output path suggested for the loaded image: the source name with a
    /// `_grayscale` suffix and the configured format's extension.
    pub fn suggested_output_path(&self) -> Option<PathBuf> {
        let origin = self.image.as_ref()?.metadata.origin.as_deref()?;
        Some(grayscale_output_path(origin, &self.config))
    }

    /// Export the loaded image with the session's mode and configuration.
    pub fn export(&self, output: &mut dyn Write) -> Result<()> {
        let image = self.image.as_ref().ok_or_else(|| {
            ConversionError::InputReadError("no image loaded in session".to_string())
        })?;
        let pipeline = GrayscalePipeline::new(self.mode, self.config.clone());
        pipeline.convert_raster(image, output)
    }

    pub fn export_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let mut buffer = Vec::new();
        self.export(&mut buffer)?;
        std::fs::write(path, &buffer)
            .map_err(|e| ConversionError::OutputWriteError(format!("{}: {}", path.display(), e)))?;
        Ok(())
    }
}

/// Outcome of one input in a batch run.
pub struct BatchItem {
    pub input: PathBuf,
    pub output: PathBuf,
    pub result: Result<()>,
}

/// Convert every input into `output_dir`, one pipeline invocation per file.
///
/// A failing item is recorded and the run continues; cancellation between
/// images is the caller simply not iterating further.
pub fn convert_batch<P: AsRef<Path>>(
    inputs: &[P],
    output_dir: &Path,
    mode: TransformMode,
    config: &ExportConfig,
) -> Vec<BatchItem> {
    let pipeline = GrayscalePipeline::new(mode, config.clone());

    inputs
        .iter()
        .map(|input| {
            let input = input.as_ref().to_path_buf();
            let output = output_dir.join(
                grayscale_output_path(&input, config)
                    .file_name()
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from("output_grayscale")),
            );
            let result = pipeline.convert_file(&input, &output);
            if let Err(e) = &result {
                warn!(input = %input.display(), "Batch item failed: {}", e);
            }
            BatchItem {
                input,
                output,
                result,
            }
        })
        .collect()
}

fn grayscale_output_path(input: &Path, config: &ExportConfig) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    input.with_file_name(format!(
        "{}_grayscale{}",
        stem,
        config.format.extension()
    ))
}
