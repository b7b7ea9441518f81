//! TIFF serialization via the tiff crate.
//!
//! Grayscale is written as BlackIsZero strips; alpha rides along as a second
//! sample tagged `ExtraSamples = 2` (unassociated). DPI becomes explicit
//! X/YResolution rationals in inches, and ICC bytes go into tag 34675.

use std::io::{Cursor, Seek, Write};

use tiff::encoder::colortype::{self, ColorType};
use tiff::encoder::{Rational, TiffEncoder, TiffValue};
use tiff::tags::{PhotometricInterpretation, SampleFormat, Tag};
use tracing::debug;

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::encode::types::ExportConfig;
use crate::image_pipeline::encode::writer::{
    FormatWriter, alpha_to_u8, alpha_to_u16, gray_to_u8, select_icc_profile,
};
use crate::image_pipeline::quantize::{BitDepth, QuantizedRaster};
use crate::image_pipeline::source::types::{AlphaMask, SourceMetadata};

/// TIFF tag holding an embedded ICC profile
const TAG_ICC_PROFILE: u16 = 34675;
/// ExtraSamples value for unassociated alpha
const EXTRA_SAMPLE_UNASSOCIATED: u16 = 2;
/// ResolutionUnit value for inches
const RESOLUTION_UNIT_INCH: u16 = 2;

/// Two-sample grayscale layouts the stock colortype table does not provide.
struct GrayAlpha8;

impl ColorType for GrayAlpha8 {
    type Inner = u8;
    const TIFF_VALUE: PhotometricInterpretation = PhotometricInterpretation::BlackIsZero;
    const BITS_PER_SAMPLE: &'static [u16] = &[8, 8];
    const SAMPLE_FORMAT: &'static [SampleFormat] = &[SampleFormat::Uint, SampleFormat::Uint];

    fn horizontal_predict(row: &[Self::Inner], result: &mut Vec<Self::Inner>) {
        horizontal_predict_u8(row, result);
    }
}

struct GrayAlpha16;

impl ColorType for GrayAlpha16 {
    type Inner = u16;
    const TIFF_VALUE: PhotometricInterpretation = PhotometricInterpretation::BlackIsZero;
    const BITS_PER_SAMPLE: &'static [u16] = &[16, 16];
    const SAMPLE_FORMAT: &'static [SampleFormat] = &[SampleFormat::Uint, SampleFormat::Uint];

    fn horizontal_predict(row: &[Self::Inner], result: &mut Vec<Self::Inner>) {
        horizontal_predict_u16(row, result);
    }
}

/// Mirrors the `integer_horizontal_predict!` macro used by the stock
/// integer colortypes in the `tiff` crate, which is not exported for reuse.
fn horizontal_predict_u8(row: &[u8], result: &mut Vec<u8>) {
    let sample_size = GrayAlpha8::SAMPLE_FORMAT.len();
    if row.len() < sample_size {
        debug_assert!(false);
        return;
    }
    let (start, rest) = row.split_at(sample_size);
    result.extend_from_slice(start);
    if result.capacity() - result.len() < rest.len() {
        return;
    }
    result.extend(row.iter().zip(rest).map(|(prev, current)| current.wrapping_sub(*prev)));
}

fn horizontal_predict_u16(row: &[u16], result: &mut Vec<u16>) {
    let sample_size = GrayAlpha16::SAMPLE_FORMAT.len();
    if row.len() < sample_size {
        debug_assert!(false);
        return;
    }
    let (start, rest) = row.split_at(sample_size);
    result.extend_from_slice(start);
    if result.capacity() - result.len() < rest.len() {
        return;
    }
    result.extend(row.iter().zip(rest).map(|(prev, current)| current.wrapping_sub(*prev)));
}

pub struct TiffWriter;

impl FormatWriter for TiffWriter {
    fn write_gray(
        &self,
        image: &QuantizedRaster,
        alpha: Option<&AlphaMask>,
        config: &ExportConfig,
        metadata: &SourceMetadata,
        output: &mut dyn Write,
    ) -> Result<()> {
        debug!("Encoding TIFF image: {}x{}", image.width, image.height);

        let icc = select_icc_profile(config, metadata)?;
        let dpi = if config.strip_metadata { None } else { config.dpi };
        let tags = ExtraTags {
            icc: icc.as_deref(),
            dpi,
        };

        let mut buffer = Vec::new();
        {
            let mut encoder = TiffEncoder::new(Cursor::new(&mut buffer))
                .map_err(|e| ConversionError::EncodeIoError(e.to_string()))?;

            match (image.depth, alpha) {
                (BitDepth::Eight, None) => write_strips::<colortype::Gray8, _>(
                    &mut encoder,
                    image,
                    &gray_to_u8(image),
                    false,
                    &tags,
                )?,
                (BitDepth::Eight, Some(mask)) => {
                    let alpha = alpha_to_u8(mask);
                    let mut samples = Vec::with_capacity(image.data.len() * 2);
                    for (&g, &a) in image.data.iter().zip(&alpha) {
                        samples.push(g as u8);
                        samples.push(a);
                    }
                    write_strips::<GrayAlpha8, _>(&mut encoder, image, &samples, true, &tags)?
                }
                (BitDepth::Sixteen, None) => write_strips::<colortype::Gray16, _>(
                    &mut encoder,
                    image,
                    &image.data,
                    false,
                    &tags,
                )?,
                (BitDepth::Sixteen, Some(mask)) => {
                    let alpha = alpha_to_u16(mask);
                    let mut samples = Vec::with_capacity(image.data.len() * 2);
                    for (&g, &a) in image.data.iter().zip(&alpha) {
                        samples.push(g);
                        samples.push(a);
                    }
                    write_strips::<GrayAlpha16, _>(&mut encoder, image, &samples, true, &tags)?
                }
                (BitDepth::Ten, _) => {
                    return Err(ConversionError::UnsupportedFormatFeature {
                        format: "tiff".to_string(),
                        feature: "10-bit samples".to_string(),
                    });
                }
            }
        }

        output.write_all(&buffer)?;
        Ok(())
    }
}

struct ExtraTags<'a> {
    icc: Option<&'a [u8]>,
    dpi: Option<u32>,
}

fn write_strips<C, W>(
    encoder: &mut TiffEncoder<W>,
    image: &QuantizedRaster,
    samples: &[C::Inner],
    alpha: bool,
    tags: &ExtraTags<'_>,
) -> Result<()>
where
    C: ColorType,
    W: Write + Seek,
    [C::Inner]: TiffValue,
{
    let enc_err = |e: tiff::TiffError| ConversionError::EncodeIoError(e.to_string());

    let mut ifd = encoder
        .new_image::<C>(image.width as u32, image.height as u32)
        .map_err(enc_err)?;

    if alpha {
        ifd.encoder()
            .write_tag(Tag::ExtraSamples, &[EXTRA_SAMPLE_UNASSOCIATED][..])
            .map_err(enc_err)?;
    }
    if let Some(dpi) = tags.dpi {
        ifd.encoder()
            .write_tag(Tag::ResolutionUnit, RESOLUTION_UNIT_INCH)
            .map_err(enc_err)?;
        ifd.encoder()
            .write_tag(Tag::XResolution, Rational { n: dpi, d: 1 })
            .map_err(enc_err)?;
        ifd.encoder()
            .write_tag(Tag::YResolution, Rational { n: dpi, d: 1 })
            .map_err(enc_err)?;
    }
    if let Some(icc) = tags.icc {
        ifd.encoder()
            .write_tag(Tag::Unknown(TAG_ICC_PROFILE), icc)
            .map_err(enc_err)?;
    }

    ifd.write_data(samples).map_err(enc_err)?;
    Ok(())
}
