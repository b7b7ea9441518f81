//! Channel decomposition into canonical normalized color.

use tracing::debug;

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::source::types::{AlphaMask, CanonicalColor, SourceRaster};

/// Split a source raster into canonical [0, 1] RGB and an optional alpha mask.
///
/// Single-channel sources are promoted to three identical channels. Alpha is
/// split out unchanged at the source bit width. Both 8- and 16-bit color
/// samples are divided by their maximum representable value so every
/// downstream transform sees the same scale; out-of-range values clamp.
pub fn decompose(raster: &SourceRaster) -> Result<(CanonicalColor, Option<AlphaMask>)> {
    let pixels = raster.width * raster.height;
    let scale = 1.0 / raster.bit_width.max_value() as f32;

    let normalize = |sample: u16| (sample as f32 * scale).clamp(0.0, 1.0);

    let (color, alpha) = match raster.channels {
        1 => {
            let mut data = Vec::with_capacity(pixels * 3);
            for &g in &raster.data {
                let v = normalize(g);
                data.extend_from_slice(&[v, v, v]);
            }
            (data, None)
        }
        2 => {
            let mut data = Vec::with_capacity(pixels * 3);
            let mut alpha = Vec::with_capacity(pixels);
            for pair in raster.data.chunks_exact(2) {
                let v = normalize(pair[0]);
                data.extend_from_slice(&[v, v, v]);
                alpha.push(pair[1]);
            }
            (data, Some(alpha))
        }
        3 => (raster.data.iter().map(|&s| normalize(s)).collect(), None),
        4 => {
            let mut data = Vec::with_capacity(pixels * 3);
            let mut alpha = Vec::with_capacity(pixels);
            for quad in raster.data.chunks_exact(4) {
                data.push(normalize(quad[0]));
                data.push(normalize(quad[1]));
                data.push(normalize(quad[2]));
                alpha.push(quad[3]);
            }
            (data, Some(alpha))
        }
        n => return Err(ConversionError::UnsupportedColorModel(n)),
    };

    debug!(
        "Decomposed {}x{} raster: {} channels -> canonical color{}",
        raster.width,
        raster.height,
        raster.channels,
        if alpha.is_some() { " + alpha" } else { "" }
    );

    Ok((
        CanonicalColor {
            width: raster.width,
            height: raster.height,
            data: color,
        },
        alpha.map(|data| AlphaMask {
            width: raster.width,
            height: raster.height,
            data,
            bit_width: raster.bit_width,
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_pipeline::source::types::{SampleBitWidth, SourceMetadata};

    fn raster(channels: usize, bit_width: SampleBitWidth, data: Vec<u16>) -> SourceRaster {
        let pixels = data.len() / channels;
        SourceRaster {
            width: pixels,
            height: 1,
            data,
            channels,
            bit_width,
            metadata: SourceMetadata::default(),
        }
    }

    #[test]
    fn bounded_for_all_width_and_alpha_combinations() {
        let cases = [
            raster(1, SampleBitWidth::Eight, vec![0, 128, 255]),
            raster(2, SampleBitWidth::Eight, vec![0, 255, 255, 0]),
            raster(3, SampleBitWidth::Eight, vec![255, 0, 128, 1, 2, 3]),
            raster(4, SampleBitWidth::Eight, vec![255, 0, 128, 10, 1, 2, 3, 4]),
            raster(1, SampleBitWidth::Sixteen, vec![0, 32768, 65535]),
            raster(2, SampleBitWidth::Sixteen, vec![0, 65535, 65535, 0]),
            raster(3, SampleBitWidth::Sixteen, vec![65535, 0, 32768, 1, 2, 3]),
            raster(4, SampleBitWidth::Sixteen, vec![65535, 0, 1, 2, 3, 4, 5, 6]),
        ];
        for raster in cases {
            let (color, alpha) = decompose(&raster).unwrap();
            assert_eq!(color.data.len(), raster.width * raster.height * 3);
            assert!(color.data.iter().all(|&v| (0.0..=1.0).contains(&v)));
            assert_eq!(alpha.is_some(), raster.has_alpha());
        }
    }

    #[test]
    fn gray_promotes_to_three_identical_channels() {
        let (color, _) = decompose(&raster(1, SampleBitWidth::Eight, vec![51])).unwrap();
        assert_eq!(color.data, vec![0.2, 0.2, 0.2]);
    }

    #[test]
    fn alpha_is_split_out_unchanged() {
        let (_, alpha) =
            decompose(&raster(4, SampleBitWidth::Eight, vec![10, 20, 30, 77])).unwrap();
        let alpha = alpha.unwrap();
        assert_eq!(alpha.data, vec![77]);
        assert_eq!(alpha.bit_width, SampleBitWidth::Eight);
    }

    #[test]
    fn sixteen_bit_scale_converges_with_eight_bit() {
        let (a, _) = decompose(&raster(3, SampleBitWidth::Eight, vec![255, 0, 255])).unwrap();
        let (b, _) = decompose(&raster(3, SampleBitWidth::Sixteen, vec![65535, 0, 65535])).unwrap();
        assert_eq!(a.data, b.data);
    }

    #[test]
    fn rejects_unsupported_channel_counts() {
        let result = decompose(&raster(5, SampleBitWidth::Eight, vec![0; 5]));
        assert!(matches!(
            result,
            Err(ConversionError::UnsupportedColorModel(5))
        ));
    }
}
