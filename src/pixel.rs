//! Typed pixel buffers.
//!
//! Uses `imgref::ImgVec` for 2D pixel data with typed pixels from the `rgb` crate.

use alloc::vec::Vec;

pub use imgref::{Img, ImgRef, ImgVec};
pub use rgb::{Rgb, Rgba};

/// Decoded pixels, always 8 bits per channel.
#[derive(Clone, Debug)]
pub enum PixelData {
    Rgb8(ImgVec<Rgb<u8>>),
    Rgba8(ImgVec<Rgba<u8>>),
}

impl PixelData {
    /// Wrap interleaved RGB bytes. Returns None when the length doesn't match.
    pub fn from_rgb_bytes(bytes: &[u8], width: u32, height: u32) -> Option<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)?
            .checked_mul(3)?;
        if bytes.len() != expected {
            return None;
        }
        let pixels: &[Rgb<u8>] = bytemuck::cast_slice(bytes);
        Some(PixelData::Rgb8(ImgVec::new(
            pixels.to_vec(),
            width as usize,
            height as usize,
        )))
    }

    /// Wrap interleaved RGBA bytes. Returns None when the length doesn't match.
    pub fn from_rgba_bytes(bytes: &[u8], width: u32, height: u32) -> Option<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)?
            .checked_mul(4)?;
        if bytes.len() != expected {
            return None;
        }
        let pixels: &[Rgba<u8>] = bytemuck::cast_slice(bytes);
        Some(PixelData::Rgba8(ImgVec::new(
            pixels.to_vec(),
            width as usize,
            height as usize,
        )))
    }

    pub fn width(&self) -> u32 {
        match self {
            PixelData::Rgb8(img) => img.width() as u32,
            PixelData::Rgba8(img) => img.width() as u32,
        }
    }

    pub fn height(&self) -> u32 {
        match self {
            PixelData::Rgb8(img) => img.height() as u32,
            PixelData::Rgba8(img) => img.height() as u32,
        }
    }

    /// Whether the buffer carries an alpha channel.
    pub fn has_alpha(&self) -> bool {
        matches!(self, PixelData::Rgba8(_))
    }

    /// Whether every pixel is fully opaque.
    pub fn is_opaque(&self) -> bool {
        match self {
            PixelData::Rgb8(_) => true,
            PixelData::Rgba8(img) => img.as_ref().pixels().all(|p| p.a == 255),
        }
    }

    /// Drop the alpha channel, if any.
    pub fn to_rgb8(&self) -> ImgVec<Rgb<u8>> {
        match self {
            PixelData::Rgb8(img) => img.clone(),
            PixelData::Rgba8(img) => {
                let pixels: Vec<Rgb<u8>> = img.as_ref().pixels().map(|p| p.rgb()).collect();
                ImgVec::new(pixels, img.width(), img.height())
            }
        }
    }

    /// Contiguous interleaved bytes, row-major, no padding.
    pub fn as_bytes(&self) -> Vec<u8> {
        match self {
            PixelData::Rgb8(img) => {
                let (buf, _, _) = img.as_ref().to_contiguous_buf();
                bytemuck::cast_slice(buf.as_ref()).to_vec()
            }
            PixelData::Rgba8(img) => {
                let (buf, _, _) = img.as_ref().to_contiguous_buf();
                bytemuck::cast_slice(buf.as_ref()).to_vec()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_bytes_roundtrip_layout() {
        let bytes = [1u8, 2, 3, 4, 5, 6];
        let pixels = PixelData::from_rgb_bytes(&bytes, 2, 1).unwrap();
        assert_eq!(pixels.width(), 2);
        assert_eq!(pixels.height(), 1);
        assert!(!pixels.has_alpha());
        assert_eq!(pixels.as_bytes(), bytes);
    }

    #[test]
    fn length_mismatch_rejected() {
        assert!(PixelData::from_rgb_bytes(&[0; 5], 2, 1).is_none());
        assert!(PixelData::from_rgba_bytes(&[0; 7], 2, 1).is_none());
    }

    #[test]
    fn opacity_and_alpha_drop() {
        let bytes = [10u8, 20, 30, 255, 40, 50, 60, 0];
        let pixels = PixelData::from_rgba_bytes(&bytes, 1, 2).unwrap();
        assert!(pixels.has_alpha());
        assert!(!pixels.is_opaque());

        let rgb = pixels.to_rgb8();
        let flat: Vec<Rgb<u8>> = rgb.as_ref().pixels().collect();
        assert_eq!(flat, vec![Rgb::new(10, 20, 30), Rgb::new(40, 50, 60)]);
    }
}
