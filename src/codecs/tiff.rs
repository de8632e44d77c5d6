//! TIFF codec adapter.

use image::codecs::tiff::TiffEncoder;

use crate::{CodecError, ImageFormat, Limits, PixelData};

pub(crate) fn decode(data: &[u8], limits: Option<&Limits>) -> Result<PixelData, CodecError> {
    super::decode_with(data, ImageFormat::Tiff, image::ImageFormat::Tiff, limits)
}

/// Encode pixels to TIFF.
pub(crate) fn encode(pixels: &PixelData) -> Result<Vec<u8>, CodecError> {
    // The TIFF writer seeks back to patch IFD offsets.
    let mut out = super::seekable_buffer();
    super::write_image(ImageFormat::Tiff, TiffEncoder::new(&mut out), pixels)?;
    Ok(out.into_inner())
}
