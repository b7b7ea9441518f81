//! Grayscale field type

/// Single floating-point channel per pixel, each value in [0, 1].
///
/// The result of applying exactly one [`TransformMode`](super::TransformMode)
/// to canonical color; clipped before quantization.
#[derive(Debug, Clone)]
pub struct GrayscaleField {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
    /// One value per pixel, row-major
    pub data: Vec<f32>,
}
