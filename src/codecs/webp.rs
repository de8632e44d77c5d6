//! WebP codec adapter.

use image::codecs::webp::WebPEncoder;

use crate::{CodecError, ImageFormat, Limits, PixelData};

/// Decode WebP (lossy or lossless) to pixels.
pub(crate) fn decode(data: &[u8], limits: Option<&Limits>) -> Result<PixelData, CodecError> {
    super::decode_with(data, ImageFormat::WebP, image::ImageFormat::WebP, limits)
}

/// Encode pixels to WebP.
///
/// The encoder only produces VP8L (lossless) bitstreams, so quality has no effect.
pub(crate) fn encode(pixels: &PixelData) -> Result<Vec<u8>, CodecError> {
    let mut out = Vec::new();
    super::write_image(ImageFormat::WebP, WebPEncoder::new_lossless(&mut out), pixels)?;
    Ok(out)
}
