//! sRGB transfer functions and CIE lightness (IEC 61966-2-1, D65).

/// CIE Lab junction point, 216/24389
const EPSILON: f32 = 0.008856452;
/// CIE Lab linear-segment slope, 24389/27
const KAPPA: f32 = 903.2963;

/// Decode an sRGB gamma-encoded value to linear light.
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Encode a linear-light value with the sRGB transfer function.
pub fn linear_to_srgb(c: f32) -> f32 {
    if c <= 0.003_130_8 {
        12.92 * c
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

/// Relative luminance Y of a linearized sRGB triple (the Y row of the
/// sRGB -> XYZ matrix; D65 white gives Yn = 1).
pub fn linear_luminance(r: f32, g: f32, b: f32) -> f32 {
    0.212_672_9 * r + 0.715_152_2 * g + 0.072_175_0 * b
}

/// CIE L* of an sRGB triple, scaled to [0, 1] by dividing by 100.
pub fn cie_lightness(r: f32, g: f32, b: f32) -> f32 {
    let y = linear_luminance(srgb_to_linear(r), srgb_to_linear(g), srgb_to_linear(b));
    let fy = if y > EPSILON {
        y.cbrt()
    } else {
        (KAPPA * y + 16.0) / 116.0
    };
    (116.0 * fy - 16.0) / 100.0
}
