//! Conversion mode selection

use std::str::FromStr;

use crate::image_pipeline::common::error::ConversionError;

/// Colorimetric mapping applied per pixel.
///
/// Every mode is a pure function of the three canonical channels; none may
/// read alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransformMode {
    /// BT.601 luma (0.299, 0.587, 0.114)
    Bt601,
    /// BT.709 luma (0.2126, 0.7152, 0.0722)
    Bt709,
    /// BT.2100 luma (0.2627, 0.6780, 0.0593)
    Bt2100,
    /// BT.709 weighted sum computed in linear light, re-encoded with the
    /// sRGB transfer function
    Gamma,
    /// HSL lightness: (max + min) / 2
    HslLightness,
    /// HSV value: max(R, G, B)
    HsvValue,
    /// CIE L* lightness (sRGB -> XYZ -> Lab, D65), scaled to [0, 1]
    #[default]
    CieLightness,
}

impl TransformMode {
    pub const ALL: [TransformMode; 7] = [
        TransformMode::Bt601,
        TransformMode::Bt709,
        TransformMode::Bt2100,
        TransformMode::Gamma,
        TransformMode::HslLightness,
        TransformMode::HsvValue,
        TransformMode::CieLightness,
    ];

    /// Stable name used in presets and on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            TransformMode::Bt601 => "bt601",
            TransformMode::Bt709 => "bt709",
            TransformMode::Bt2100 => "bt2100",
            TransformMode::Gamma => "gamma",
            TransformMode::HslLightness => "hsl-lightness",
            TransformMode::HsvValue => "hsv-value",
            TransformMode::CieLightness => "lab-lightness",
        }
    }
}

impl FromStr for TransformMode {
    type Err = ConversionError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.trim().to_lowercase().as_str() {
            "bt601" => Ok(TransformMode::Bt601),
            "bt709" => Ok(TransformMode::Bt709),
            "bt2100" => Ok(TransformMode::Bt2100),
            "gamma" => Ok(TransformMode::Gamma),
            "hsl-lightness" => Ok(TransformMode::HslLightness),
            "hsv-value" => Ok(TransformMode::HsvValue),
            "lab-lightness" => Ok(TransformMode::CieLightness),
            other => Err(ConversionError::UnknownTransformMode(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_mode_round_trips_through_its_name() {
        for mode in TransformMode::ALL {
            assert_eq!(mode.as_str().parse::<TransformMode>().unwrap(), mode);
        }
    }

    #[test]
    fn parse_trims_and_lowercases() {
        assert_eq!(" BT709 ".parse::<TransformMode>().unwrap(), TransformMode::Bt709);
    }

    #[test]
    fn unknown_name_is_rejected_not_defaulted() {
        let err = "sepia".parse::<TransformMode>().unwrap_err();
        assert!(matches!(
            err,
            ConversionError::UnknownTransformMode(name) if name == "sepia"
        ));
    }
}
