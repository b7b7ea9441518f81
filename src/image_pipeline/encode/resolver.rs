//! Export configuration resolution against the capability table.

use tracing::debug;

use crate::image_pipeline::encode::capabilities::capabilities;
use crate::image_pipeline::encode::types::{ExportConfig, OutputFormat};

/// Validate and clamp a requested configuration for the chosen format.
///
/// Applies, in order: clamp the bit depth to the nearest supported value,
/// force alpha preservation off when the format + depth combination cannot
/// carry it, and drop lossy parameters the format does not accept. The
/// result is stable: resolving an already-resolved configuration changes
/// nothing. Must run before [`encode`](super::encode), which assumes its
/// input is valid and does not re-validate.
pub fn resolve_config(requested: &ExportConfig, format: OutputFormat) -> ExportConfig {
    let caps = capabilities(format);
    let mut resolved = requested.clone();
    resolved.format = format;

    if !caps.supports_bit_depth(resolved.bit_depth) {
        let clamped = caps.nearest_bit_depth(resolved.bit_depth);
        debug!(
            "{}: clamping bit depth {} -> {}",
            format.as_str(),
            resolved.bit_depth.bits(),
            clamped.bits()
        );
        resolved.bit_depth = clamped;
    }

    if resolved.preserve_alpha && !caps.supports_alpha_at(resolved.bit_depth) {
        debug!(
            "{}: disabling alpha at {}-bit",
            format.as_str(),
            resolved.bit_depth.bits()
        );
        resolved.preserve_alpha = false;
    }

    if !caps.has_quality() {
        resolved.quality = None;
    }
    if !caps.has_subsampling() {
        resolved.subsampling = None;
    }
    if !caps.has_color_range() {
        resolved.color_range = None;
    }

    resolved
}
