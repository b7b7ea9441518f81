//! Export preset persistence.
//!
//! A preset is a flat, human-editable JSON document holding one export
//! configuration plus the conversion mode. The document is versionless;
//! fields missing from an older file fall back to the defaults instead of
//! failing the load.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::encode::types::{ChromaSubsampling, ExportConfig, OutputFormat};
use crate::image_pipeline::grayscale::TransformMode;
use crate::image_pipeline::quantize::BitDepth;

/// On-disk form of an export configuration.
///
/// Bit depth is stored as the plain number of bits and the conversion mode
/// as its stable name, keeping the file editable by hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportPreset {
    pub format: OutputFormat,
    pub bit_depth: u8,
    pub size: Option<(usize, usize)>,
    pub dpi: Option<u32>,
    pub icc_profile_path: Option<PathBuf>,
    pub preserve_alpha: bool,
    pub strip_metadata: bool,
    pub quality: Option<u8>,
    pub subsampling: Option<ChromaSubsampling>,
    pub conversion_mode: String,
}

impl Default for ExportPreset {
    fn default() -> Self {
        Self::from_parts(&ExportConfig::default(), TransformMode::default())
    }
}

impl ExportPreset {
    pub fn from_parts(config: &ExportConfig, mode: TransformMode) -> Self {
        Self {
            format: config.format,
            bit_depth: config.bit_depth.bits() as u8,
            size: config.size,
            dpi: config.dpi,
            icc_profile_path: config.icc_profile_path.clone(),
            preserve_alpha: config.preserve_alpha,
            strip_metadata: config.strip_metadata,
            quality: config.quality,
            subsampling: config.subsampling,
            conversion_mode: mode.as_str().to_string(),
        }
    }

    /// Rebuild the runtime configuration and mode this preset describes.
    ///
    /// An unknown mode name or bit depth is rejected rather than silently
    /// replaced; a preset with those fields absent parses to the defaults
    /// before this runs, so only a corrupted value can fail here.
    pub fn into_parts(&self) -> Result<(ExportConfig, TransformMode)> {
        let bit_depth = match self.bit_depth {
            8 => BitDepth::Eight,
            10 => BitDepth::Ten,
            16 => BitDepth::Sixteen,
            other => {
                return Err(ConversionError::InvalidPreset(format!(
                    "unsupported bit depth: {}",
                    other
                )));
            }
        };
        let mode: TransformMode = self.conversion_mode.parse()?;

        let config = ExportConfig::builder()
            .format(self.format)
            .bit_depth(bit_depth)
            .size(self.size)
            .dpi(self.dpi)
            .icc_profile_path(self.icc_profile_path.clone())
            .preserve_alpha(self.preserve_alpha)
            .strip_metadata(self.strip_metadata)
            .quality(self.quality)
            .subsampling(self.subsampling)
            .build();

        Ok((config, mode))
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConversionError::InputReadError(format!("{}: {}", path.display(), e)))?;
        let preset: ExportPreset = serde_json::from_str(&content)
            .map_err(|e| ConversionError::InvalidPreset(format!("{}: {}", path.display(), e)))?;
        info!(preset = %path.display(), "Loaded export preset");
        Ok(preset)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ConversionError::InvalidPreset(e.to_string()))?;
        std::fs::write(path, content)
            .map_err(|e| ConversionError::OutputWriteError(format!("{}: {}", path.display(), e)))?;
        info!(preset = %path.display(), "Saved export preset");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_its_parts() {
        let config = ExportConfig::builder()
            .format(OutputFormat::Heic)
            .bit_depth(BitDepth::Ten)
            .size(Some((800, 600)))
            .dpi(Some(300))
            .quality(Some(85))
            .preserve_alpha(false)
            .build();
        let preset = ExportPreset::from_parts(&config, TransformMode::Bt2100);
        let (rebuilt, mode) = preset.into_parts().unwrap();
        assert_eq!(rebuilt, config);
        assert_eq!(mode, TransformMode::Bt2100);
    }

    #[test]
    fn older_preset_missing_fields_falls_back_to_defaults() {
        let preset: ExportPreset =
            serde_json::from_str(r#"{"format": "jpeg", "quality": 70}"#).unwrap();
        assert_eq!(preset.format, OutputFormat::Jpeg);
        assert_eq!(preset.quality, Some(70));
        assert_eq!(preset.bit_depth, 8);
        assert!(preset.preserve_alpha);
        assert!(!preset.strip_metadata);
        assert_eq!(preset.conversion_mode, TransformMode::default().as_str());
    }

    #[test]
    fn subsampling_uses_the_colon_notation() {
        let preset = ExportPreset {
            format: OutputFormat::Jpeg,
            subsampling: Some(ChromaSubsampling::Cs420),
            ..Default::default()
        };
        let json = serde_json::to_string(&preset).unwrap();
        assert!(json.contains("\"4:2:0\""));
    }

    #[test]
    fn corrupted_mode_name_is_rejected() {
        let preset = ExportPreset {
            conversion_mode: "negative".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            preset.into_parts(),
            Err(ConversionError::UnknownTransformMode(_))
        ));
    }

    #[test]
    fn corrupted_bit_depth_is_rejected() {
        let preset = ExportPreset {
            bit_depth: 12,
            ..Default::default()
        };
        assert!(matches!(
            preset.into_parts(),
            Err(ConversionError::InvalidPreset(_))
        ));
    }

    #[test]
    fn save_and_load_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preset.json");
        let preset = ExportPreset::from_parts(
            &ExportConfig::builder().format(OutputFormat::Tiff).build(),
            TransformMode::HslLightness,
        );
        preset.save(&path).unwrap();
        assert_eq!(ExportPreset::load(&path).unwrap(), preset);
    }

    #[test]
    fn unreadable_file_is_an_input_error() {
        assert!(matches!(
            ExportPreset::load("/no/such/preset.json"),
            Err(ConversionError::InputReadError(_))
        ));
    }

    #[test]
    fn malformed_json_is_an_invalid_preset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            ExportPreset::load(&path),
            Err(ConversionError::InvalidPreset(_))
        ));
    }
}
