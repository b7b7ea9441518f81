//! Single-channel Lanczos resampling.
//!
//! The grayscale raster and its alpha mask are resized independently with
//! the same kernel so the two stay pixel-aligned.

use fast_image_resize as fr;
use tracing::debug;

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::quantize::QuantizedRaster;
use crate::image_pipeline::source::types::{AlphaMask, SampleBitWidth};

/// Resize a quantized grayscale raster to the target dimensions.
pub fn resample_gray(
    raster: &QuantizedRaster,
    width: usize,
    height: usize,
) -> Result<QuantizedRaster> {
    let data = match raster.depth.bits() {
        8 => resize_u8(&raster.data, raster.width, raster.height, width, height)?,
        _ => resize_u16(&raster.data, raster.width, raster.height, width, height)?,
    };
    Ok(QuantizedRaster {
        width,
        height,
        data,
        depth: raster.depth,
    })
}

/// Resize an alpha mask to the target dimensions with the same kernel.
pub fn resample_alpha(mask: &AlphaMask, width: usize, height: usize) -> Result<AlphaMask> {
    let data = match mask.bit_width {
        SampleBitWidth::Eight => resize_u8(&mask.data, mask.width, mask.height, width, height)?,
        SampleBitWidth::Sixteen => resize_u16(&mask.data, mask.width, mask.height, width, height)?,
    };
    Ok(AlphaMask {
        width,
        height,
        data,
        bit_width: mask.bit_width,
    })
}

fn resize_u8(
    samples: &[u16],
    src_w: usize,
    src_h: usize,
    dst_w: usize,
    dst_h: usize,
) -> Result<Vec<u16>> {
    let bytes: Vec<u8> = samples.iter().map(|&v| v as u8).collect();
    let resized = resize_plane(bytes, src_w, src_h, dst_w, dst_h, fr::PixelType::U8)?;
    Ok(resized.into_iter().map(u16::from).collect())
}

fn resize_u16(
    samples: &[u16],
    src_w: usize,
    src_h: usize,
    dst_w: usize,
    dst_h: usize,
) -> Result<Vec<u16>> {
    let bytes: Vec<u8> = samples.iter().flat_map(|v| v.to_ne_bytes()).collect();
    let resized = resize_plane(bytes, src_w, src_h, dst_w, dst_h, fr::PixelType::U16)?;
    Ok(resized
        .chunks_exact(2)
        .map(|pair| u16::from_ne_bytes([pair[0], pair[1]]))
        .collect())
}

fn resize_plane(
    bytes: Vec<u8>,
    src_w: usize,
    src_h: usize,
    dst_w: usize,
    dst_h: usize,
    pixel_type: fr::PixelType,
) -> Result<Vec<u8>> {
    if dst_w == 0 || dst_h == 0 {
        return Err(ConversionError::InvalidDimensions(dst_w, dst_h));
    }

    debug!("Resampling {}x{} -> {}x{} (Lanczos3)", src_w, src_h, dst_w, dst_h);

    let src = fr::images::Image::from_vec_u8(src_w as u32, src_h as u32, bytes, pixel_type)
        .map_err(|e| ConversionError::EncodeIoError(format!("resample source buffer: {}", e)))?;
    let mut dst = fr::images::Image::new(dst_w as u32, dst_h as u32, pixel_type);

    let mut resizer = fr::Resizer::new();
    let options = fr::ResizeOptions::new()
        .resize_alg(fr::ResizeAlg::Convolution(fr::FilterType::Lanczos3));
    resizer
        .resize(&src, &mut dst, Some(&options))
        .map_err(|e| ConversionError::EncodeIoError(format!("resample: {}", e)))?;

    Ok(dst.into_vec())
}
