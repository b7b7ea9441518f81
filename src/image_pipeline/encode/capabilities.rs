//! Per-format capability descriptors.
//!
//! One static table entry per output format, consulted by the configuration
//! resolver. Keeping the rules declarative here (instead of branching inside
//! each encoder) keeps the resolver and the encoders in agreement, and makes
//! adding a format a one-entry change.

use crate::image_pipeline::encode::types::OutputFormat;
use crate::image_pipeline::quantize::BitDepth;

/// Describes what an output format can carry.
pub struct FormatCapabilities {
    bit_depths: &'static [BitDepth],
    alpha_up_to: Option<BitDepth>,
    quality: bool,
    subsampling: bool,
    color_range: bool,
}

impl FormatCapabilities {
    const fn new(bit_depths: &'static [BitDepth]) -> Self {
        Self {
            bit_depths,
            alpha_up_to: None,
            quality: false,
            subsampling: false,
            color_range: false,
        }
    }

    const fn with_alpha_up_to(mut self, depth: BitDepth) -> Self {
        self.alpha_up_to = Some(depth);
        self
    }

    const fn with_quality(mut self) -> Self {
        self.quality = true;
        self
    }

    const fn with_subsampling(mut self) -> Self {
        self.subsampling = true;
        self
    }

    const fn with_color_range(mut self) -> Self {
        self.color_range = true;
        self
    }

    /// Supported bit depths, ascending.
    pub fn bit_depths(&self) -> &'static [BitDepth] {
        self.bit_depths
    }

    pub fn supports_bit_depth(&self, depth: BitDepth) -> bool {
        self.bit_depths.contains(&depth)
    }

    /// Supported depth closest (in bits) to the requested one; ties pick the
    /// lower depth.
    pub fn nearest_bit_depth(&self, requested: BitDepth) -> BitDepth {
        let mut best = self.bit_depths[0];
        let mut best_distance = u32::MAX;
        for &candidate in self.bit_depths {
            let distance = candidate.bits().abs_diff(requested.bits());
            if distance < best_distance {
                best = candidate;
                best_distance = distance;
            }
        }
        best
    }

    /// Whether the format can carry alpha at the given bit depth.
    pub fn supports_alpha_at(&self, depth: BitDepth) -> bool {
        match self.alpha_up_to {
            Some(max) => depth <= max,
            None => false,
        }
    }

    /// Whether a lossy quality parameter applies.
    pub fn has_quality(&self) -> bool {
        self.quality
    }

    /// Whether a chroma subsampling selector applies.
    pub fn has_subsampling(&self) -> bool {
        self.subsampling
    }

    /// Whether a color range selector applies.
    pub fn has_color_range(&self) -> bool {
        self.color_range
    }
}

static PNG: FormatCapabilities = FormatCapabilities::new(&[BitDepth::Eight, BitDepth::Sixteen])
    .with_alpha_up_to(BitDepth::Sixteen)
    .with_color_range();

static TIFF: FormatCapabilities = FormatCapabilities::new(&[BitDepth::Eight, BitDepth::Sixteen])
    .with_alpha_up_to(BitDepth::Sixteen);

static JPEG: FormatCapabilities = FormatCapabilities::new(&[BitDepth::Eight])
    .with_quality()
    .with_subsampling()
    .with_color_range();

static WEBP: FormatCapabilities =
    FormatCapabilities::new(&[BitDepth::Eight]).with_alpha_up_to(BitDepth::Eight).with_quality();

static BMP: FormatCapabilities = FormatCapabilities::new(&[BitDepth::Eight]);

static HEIC: FormatCapabilities = FormatCapabilities::new(&[BitDepth::Eight, BitDepth::Ten])
    .with_alpha_up_to(BitDepth::Eight)
    .with_quality()
    .with_subsampling();

/// Capability table lookup. Static data; never mutated at runtime.
pub fn capabilities(format: OutputFormat) -> &'static FormatCapabilities {
    match format {
        OutputFormat::Png => &PNG,
        OutputFormat::Tiff => &TIFF,
        OutputFormat::Jpeg => &JPEG,
        OutputFormat::Webp => &WEBP,
        OutputFormat::Bmp => &BMP,
        OutputFormat::Heic => &HEIC,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn png_and_tiff_carry_deep_alpha() {
        for format in [OutputFormat::Png, OutputFormat::Tiff] {
            let caps = capabilities(format);
            assert!(caps.supports_bit_depth(BitDepth::Sixteen));
            assert!(caps.supports_alpha_at(BitDepth::Eight));
            assert!(caps.supports_alpha_at(BitDepth::Sixteen));
            assert!(!caps.has_quality());
        }
    }

    #[test]
    fn jpeg_and_bmp_are_eight_bit_opaque() {
        for format in [OutputFormat::Jpeg, OutputFormat::Bmp] {
            let caps = capabilities(format);
            assert_eq!(caps.bit_depths(), &[BitDepth::Eight]);
            assert!(!caps.supports_alpha_at(BitDepth::Eight));
        }
        assert!(capabilities(OutputFormat::Jpeg).has_subsampling());
        assert!(!capabilities(OutputFormat::Bmp).has_quality());
    }

    #[test]
    fn heic_alpha_is_conditioned_on_bit_depth() {
        let caps = capabilities(OutputFormat::Heic);
        assert!(caps.supports_alpha_at(BitDepth::Eight));
        assert!(!caps.supports_alpha_at(BitDepth::Ten));
    }

    #[test]
    fn nearest_depth_clamps_toward_the_closest_supported_value() {
        assert_eq!(
            capabilities(OutputFormat::Jpeg).nearest_bit_depth(BitDepth::Sixteen),
            BitDepth::Eight
        );
        assert_eq!(
            capabilities(OutputFormat::Heic).nearest_bit_depth(BitDepth::Sixteen),
            BitDepth::Ten
        );
        assert_eq!(
            capabilities(OutputFormat::Png).nearest_bit_depth(BitDepth::Ten),
            BitDepth::Eight
        );
        assert_eq!(
            capabilities(OutputFormat::Png).nearest_bit_depth(BitDepth::Sixteen),
            BitDepth::Sixteen
        );
    }
}
