//! BMP codec adapter.

use image::codecs::bmp::BmpEncoder;

use crate::{CodecError, ImageFormat, Limits, PixelData};

pub(crate) fn decode(data: &[u8], limits: Option<&Limits>) -> Result<PixelData, CodecError> {
    super::decode_with(data, ImageFormat::Bmp, image::ImageFormat::Bmp, limits)
}

/// Encode pixels to an uncompressed BMP (32-bit when alpha is present).
pub(crate) fn encode(pixels: &PixelData) -> Result<Vec<u8>, CodecError> {
    let mut out = Vec::new();
    super::write_image(ImageFormat::Bmp, BmpEncoder::new(&mut out), pixels)?;
    Ok(out)
}
