//! Codec adapters for format-specific implementations.
//!
//! Each module provides a thin adapter between photon's unified API and the
//! codec library that does the actual work. Most formats go through the
//! `image` crate; HEIC goes through libheif.

#[cfg(any(
    feature = "png",
    feature = "jpeg",
    feature = "gif",
    feature = "webp",
    feature = "bmp",
    feature = "tiff",
    feature = "avif-decode"
))]
use std::io::Cursor;

#[cfg(feature = "png")]
pub(crate) mod png;

#[cfg(feature = "jpeg")]
pub(crate) mod jpeg;

#[cfg(feature = "gif")]
pub(crate) mod gif;

#[cfg(feature = "webp")]
pub(crate) mod webp;

#[cfg(feature = "bmp")]
pub(crate) mod bmp;

#[cfg(feature = "tiff")]
pub(crate) mod tiff;

#[cfg(any(feature = "avif-encode", feature = "avif-decode"))]
pub(crate) mod avif;

#[cfg(feature = "heic-decode")]
pub(crate) mod heic;

#[allow(unused_imports)]
use crate::pixel::ImgVec;
#[allow(unused_imports)]
use crate::{CodecError, ImageFormat, Limits, PixelData};

/// Decode through the `image` crate with the given container format.
#[cfg(any(
    feature = "png",
    feature = "jpeg",
    feature = "gif",
    feature = "webp",
    feature = "bmp",
    feature = "tiff",
    feature = "avif-decode"
))]
pub(crate) fn decode_with(
    data: &[u8],
    format: ImageFormat,
    codec_format: image::ImageFormat,
    limits: Option<&Limits>,
) -> Result<PixelData, CodecError> {
    use image::ImageDecoder;

    let mut reader = image::ImageReader::with_format(Cursor::new(data), codec_format);
    if let Some(lim) = limits {
        reader.limits(lim.to_image_limits());
    }

    let decoder = reader
        .into_decoder()
        .map_err(|e| CodecError::from_codec(format, e))?;

    // Header dimensions are checked before any pixel buffer is allocated.
    if let Some(lim) = limits {
        let (width, height) = decoder.dimensions();
        lim.check_dimensions(width, height)?;
    }

    let decoded = image::DynamicImage::from_decoder(decoder)
        .map_err(|e| CodecError::from_codec(format, e))?;

    if let Some(lim) = limits {
        lim.check_dimensions(decoded.width(), decoded.height())?;
    }

    Ok(from_dynamic(decoded))
}

/// Normalize a decoded image to 8-bit RGB or RGBA.
#[cfg(any(
    feature = "png",
    feature = "jpeg",
    feature = "gif",
    feature = "webp",
    feature = "bmp",
    feature = "tiff",
    feature = "avif-decode"
))]
fn from_dynamic(decoded: image::DynamicImage) -> PixelData {
    let width = decoded.width() as usize;
    let height = decoded.height() as usize;

    if decoded.color().has_alpha() {
        let raw = decoded.into_rgba8().into_raw();
        PixelData::Rgba8(ImgVec::new(
            bytemuck::cast_slice(&raw).to_vec(),
            width,
            height,
        ))
    } else {
        let raw = decoded.into_rgb8().into_raw();
        PixelData::Rgb8(ImgVec::new(
            bytemuck::cast_slice(&raw).to_vec(),
            width,
            height,
        ))
    }
}

/// Hand pixels to an `image` crate encoder in their native layout.
#[cfg(any(
    feature = "png",
    feature = "jpeg",
    feature = "webp",
    feature = "bmp",
    feature = "tiff",
    feature = "avif-encode"
))]
pub(crate) fn write_image<E: image::ImageEncoder>(
    format: ImageFormat,
    encoder: E,
    pixels: &PixelData,
) -> Result<(), CodecError> {
    encoder
        .write_image(
            &pixels.as_bytes(),
            pixels.width(),
            pixels.height(),
            color_type(pixels),
        )
        .map_err(|e| CodecError::from_codec(format, e))
}

#[cfg(any(
    feature = "png",
    feature = "jpeg",
    feature = "gif",
    feature = "webp",
    feature = "bmp",
    feature = "tiff",
    feature = "avif-encode"
))]
pub(crate) fn color_type(pixels: &PixelData) -> image::ExtendedColorType {
    if pixels.has_alpha() {
        image::ExtendedColorType::Rgba8
    } else {
        image::ExtendedColorType::Rgb8
    }
}

/// Seekable in-memory sink for encoders that need `Seek`.
#[cfg(feature = "tiff")]
pub(crate) fn seekable_buffer() -> Cursor<Vec<u8>> {
    Cursor::new(Vec::new())
}
