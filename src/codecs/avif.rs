//! AVIF codec adapter.
//!
//! Encoding goes through rav1e (`avif-encode`), decoding through dav1d
//! (`avif-decode`). The two are independent features since dav1d needs a
//! system library.

#[cfg(feature = "avif-encode")]
use image::codecs::avif::AvifEncoder;

#[allow(unused_imports)]
use crate::{CodecError, ImageFormat, Limits, PixelData};

/// Default encoder speed (1 = slowest/smallest, 10 = fastest).
pub(crate) const DEFAULT_SPEED: u8 = 6;

/// Decode AVIF to pixels.
#[cfg(feature = "avif-decode")]
pub(crate) fn decode(data: &[u8], limits: Option<&Limits>) -> Result<PixelData, CodecError> {
    super::decode_with(data, ImageFormat::Avif, image::ImageFormat::Avif, limits)
}

/// Encode pixels to AVIF.
#[cfg(feature = "avif-encode")]
pub(crate) fn encode(pixels: &PixelData, quality: u8, speed: u8) -> Result<Vec<u8>, CodecError> {
    let mut out = Vec::new();
    let encoder =
        AvifEncoder::new_with_speed_quality(&mut out, speed.clamp(1, 10), quality.clamp(1, 100));
    super::write_image(ImageFormat::Avif, encoder, pixels)?;
    Ok(out)
}
