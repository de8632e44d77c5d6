//! JPEG codec adapter.

use image::codecs::jpeg::JpegEncoder;

use crate::{CodecError, ImageFormat, Limits, PixelData};

/// Decode JPEG to pixels.
pub(crate) fn decode(data: &[u8], limits: Option<&Limits>) -> Result<PixelData, CodecError> {
    super::decode_with(data, ImageFormat::Jpeg, image::ImageFormat::Jpeg, limits)
}

/// Encode pixels to JPEG at the given quality (1-100).
///
/// JPEG has no alpha channel; alpha is discarded.
pub(crate) fn encode(pixels: &PixelData, quality: u8) -> Result<Vec<u8>, CodecError> {
    let opaque = match pixels {
        PixelData::Rgb8(_) => None,
        PixelData::Rgba8(_) => Some(PixelData::Rgb8(pixels.to_rgb8())),
    };
    let pixels = opaque.as_ref().unwrap_or(pixels);

    let mut out = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut out, quality.clamp(1, 100));
    super::write_image(ImageFormat::Jpeg, encoder, pixels)?;
    Ok(out)
}
