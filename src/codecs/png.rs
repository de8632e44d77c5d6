//! PNG codec adapter.

use image::codecs::png::PngEncoder;

use crate::{CodecError, ImageFormat, Limits, PixelData};

/// Decode PNG to pixels.
pub(crate) fn decode(data: &[u8], limits: Option<&Limits>) -> Result<PixelData, CodecError> {
    super::decode_with(data, ImageFormat::Png, image::ImageFormat::Png, limits)
}

/// Encode pixels to PNG. Always lossless; alpha is kept.
pub(crate) fn encode(pixels: &PixelData) -> Result<Vec<u8>, CodecError> {
    let mut out = Vec::new();
    super::write_image(ImageFormat::Png, PngEncoder::new(&mut out), pixels)?;
    Ok(out)
}
