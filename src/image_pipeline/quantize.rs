//! Bit-depth quantization of the grayscale field.

use crate::image_pipeline::grayscale::types::GrayscaleField;

/// Target bit depth of the quantized raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum BitDepth {
    /// 8 bits per sample, 0..=255
    Eight,
    /// 10 bits per sample. Samples are stored left-justified in the 16-bit
    /// container: `round(v * 1023) << 6`. Encoders that need right-justified
    /// 10-bit values shift back down at the codec boundary.
    Ten,
    /// 16 bits per sample, 0..=65535
    Sixteen,
}

impl BitDepth {
    /// Maximum quantized code value before container justification.
    pub fn max_value(self) -> u16 {
        match self {
            BitDepth::Eight => 255,
            BitDepth::Ten => 1023,
            BitDepth::Sixteen => 65535,
        }
    }

    /// Left-shift applied to store a sample in its 16-bit container.
    pub fn container_shift(self) -> u16 {
        match self {
            BitDepth::Ten => 6,
            _ => 0,
        }
    }

    pub fn bits(self) -> u32 {
        match self {
            BitDepth::Eight => 8,
            BitDepth::Ten => 10,
            BitDepth::Sixteen => 16,
        }
    }
}

/// Grayscale samples quantized to a target bit depth.
///
/// All depths share the u16 container; 8-bit samples occupy 0..=255 and
/// 10-bit samples are left-justified (see [`BitDepth::Ten`]).
#[derive(Debug, Clone)]
pub struct QuantizedRaster {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
    /// One sample per pixel, row-major
    pub data: Vec<u16>,
    /// Bit depth the samples were quantized at
    pub depth: BitDepth,
}

/// Map a [0, 1] grayscale field onto integer samples at the target depth.
///
/// Quantization is `round(v * max)`, not truncation; truncation would bias
/// every value toward black.
pub fn quantize(field: &GrayscaleField, depth: BitDepth) -> QuantizedRaster {
    let max = depth.max_value() as f32;
    let shift = depth.container_shift();

    let data = field
        .data
        .iter()
        .map(|&v| ((v.clamp(0.0, 1.0) * max).round() as u16) << shift)
        .collect();

    QuantizedRaster {
        width: field.width,
        height: field.height,
        data,
        depth,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(data: Vec<f32>) -> GrayscaleField {
        GrayscaleField {
            width: data.len(),
            height: 1,
            data,
        }
    }

    #[test]
    fn endpoints_hit_zero_and_full_scale() {
        let q = quantize(&field(vec![0.0, 1.0]), BitDepth::Eight);
        assert_eq!(q.data, vec![0, 255]);
        let q = quantize(&field(vec![0.0, 1.0]), BitDepth::Sixteen);
        assert_eq!(q.data, vec![0, 65535]);
        let q = quantize(&field(vec![0.0, 1.0]), BitDepth::Ten);
        assert_eq!(q.data, vec![0, 1023 << 6]);
    }

    #[test]
    fn rounds_instead_of_truncating() {
        // 0.5 / 255 would truncate to 0; rounding must lift it to 1
        let q = quantize(&field(vec![0.5 / 255.0]), BitDepth::Eight);
        assert_eq!(q.data, vec![1]);
        // Just below the halfway point stays at 0
        let q = quantize(&field(vec![0.49 / 255.0]), BitDepth::Eight);
        assert_eq!(q.data, vec![0]);
    }

    #[test]
    fn monotonic_at_every_depth() {
        let values: Vec<f32> = (0..=1000).map(|i| i as f32 / 1000.0).collect();
        for depth in [BitDepth::Eight, BitDepth::Ten, BitDepth::Sixteen] {
            let q = quantize(&field(values.clone()), depth);
            for pair in q.data.windows(2) {
                assert!(pair[1] >= pair[0], "{:?}", depth);
            }
        }
    }

    #[test]
    fn ten_bit_samples_are_left_justified() {
        let q = quantize(&field(vec![0.5]), BitDepth::Ten);
        let sample = q.data[0];
        assert_eq!(sample >> 6, 512);
        assert_eq!(sample & 0x3f, 0);
    }

    #[test]
    fn out_of_range_input_clamps() {
        let q = quantize(&field(vec![-0.5, 1.5]), BitDepth::Eight);
        assert_eq!(q.data, vec![0, 255]);
    }
}
