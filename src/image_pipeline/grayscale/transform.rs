//! Per-pixel grayscale mappings.

use tracing::debug;

use crate::image_pipeline::grayscale::modes::TransformMode;
use crate::image_pipeline::grayscale::srgb;
use crate::image_pipeline::grayscale::types::GrayscaleField;
use crate::image_pipeline::source::types::CanonicalColor;

/// Apply one conversion mode to every pixel of a canonical color buffer.
///
/// Output values are clipped to [0, 1]; gamut-edge inputs can overshoot by
/// rounding error in the gamma and Lab paths.
pub fn transform(color: &CanonicalColor, mode: TransformMode) -> GrayscaleField {
    debug!(
        "Applying {} to {}x{} pixels",
        mode.as_str(),
        color.width,
        color.height
    );

    let data = color
        .data
        .chunks_exact(3)
        .map(|px| pixel_gray(px[0], px[1], px[2], mode).clamp(0.0, 1.0))
        .collect();

    GrayscaleField {
        width: color.width,
        height: color.height,
        data,
    }
}

fn pixel_gray(r: f32, g: f32, b: f32, mode: TransformMode) -> f32 {
    match mode {
        TransformMode::Bt601 => 0.299 * r + 0.587 * g + 0.114 * b,
        TransformMode::Bt709 => 0.2126 * r + 0.7152 * g + 0.0722 * b,
        TransformMode::Bt2100 => 0.2627 * r + 0.6780 * g + 0.0593 * b,
        TransformMode::Gamma => {
            let y = srgb::linear_luminance(
                srgb::srgb_to_linear(r),
                srgb::srgb_to_linear(g),
                srgb::srgb_to_linear(b),
            );
            srgb::linear_to_srgb(y)
        }
        TransformMode::HslLightness => {
            let max = r.max(g).max(b);
            let min = r.min(g).min(b);
            (max + min) / 2.0
        }
        TransformMode::HsvValue => r.max(g).max(b),
        TransformMode::CieLightness => srgb::cie_lightness(r, g, b),
    }
}
