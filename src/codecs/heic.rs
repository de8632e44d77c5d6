//! HEIC decode adapter using libheif.
//!
//! Decode only. There is no encoder.

use libheif_rs::{ColorSpace, HeifContext, LibHeif, RgbChroma};

use crate::pixel::ImgVec;
use crate::{CodecError, ImageFormat, Limits, PixelData};

/// Decode the primary image of a HEIF container to pixels.
pub(crate) fn decode(data: &[u8], limits: Option<&Limits>) -> Result<PixelData, CodecError> {
    let codec_err = |e: libheif_rs::HeifError| CodecError::from_codec(ImageFormat::Heic, e);

    let ctx = HeifContext::read_from_bytes(data).map_err(codec_err)?;
    let handle = ctx.primary_image_handle().map_err(codec_err)?;

    let width = handle.width();
    let height = handle.height();
    if let Some(lim) = limits {
        lim.check_dimensions(width, height)?;
    }

    let has_alpha = handle.has_alpha_channel();
    let chroma = if has_alpha {
        RgbChroma::Rgba
    } else {
        RgbChroma::Rgb
    };

    let lib = LibHeif::new();
    let image = lib
        .decode(&handle, ColorSpace::Rgb(chroma), None)
        .map_err(codec_err)?;

    let planes = image.planes();
    let plane = planes
        .interleaved
        .ok_or_else(|| CodecError::InvalidInput("HEIC image has no interleaved plane".into()))?;

    let channels = if has_alpha { 4 } else { 3 };
    let row_len = width as usize * channels;
    if plane.stride < row_len {
        return Err(CodecError::InvalidInput(format!(
            "HEIC stride {} shorter than row length {row_len}",
            plane.stride
        )));
    }

    // Rows may be padded past the visible width.
    let mut packed = Vec::with_capacity(row_len * height as usize);
    for row in plane.data.chunks(plane.stride).take(height as usize) {
        packed.extend_from_slice(&row[..row_len]);
    }

    let (w, h) = (width as usize, height as usize);
    if packed.len() != row_len * h {
        return Err(CodecError::InvalidInput("HEIC pixel data truncated".into()));
    }

    Ok(if has_alpha {
        PixelData::Rgba8(ImgVec::new(bytemuck::cast_slice(&packed).to_vec(), w, h))
    } else {
        PixelData::Rgb8(ImgVec::new(bytemuck::cast_slice(&packed).to_vec(), w, h))
    })
}
