//! GIF codec adapter.

use image::codecs::gif::GifEncoder;

use crate::{CodecError, ImageFormat, Limits, PixelData};

/// Palette quantizer speed (1 = slowest/best, 30 = fastest).
const QUANTIZE_SPEED: i32 = 10;

/// Decode GIF to pixels.
///
/// For animated GIFs, this returns only the first frame.
pub(crate) fn decode(data: &[u8], limits: Option<&Limits>) -> Result<PixelData, CodecError> {
    super::decode_with(data, ImageFormat::Gif, image::ImageFormat::Gif, limits)
}

/// Encode pixels to a single-frame GIF, quantized to a 256-color palette.
pub(crate) fn encode(pixels: &PixelData) -> Result<Vec<u8>, CodecError> {
    let mut out = Vec::new();
    {
        // The trailer is written when the encoder drops.
        let mut encoder = GifEncoder::new_with_speed(&mut out, QUANTIZE_SPEED);
        encoder
            .encode(
                &pixels.as_bytes(),
                pixels.width(),
                pixels.height(),
                super::color_type(pixels),
            )
            .map_err(|e| CodecError::from_codec(ImageFormat::Gif, e))?;
    }
    Ok(out)
}
