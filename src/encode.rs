//! Image encoding.

use crate::{CodecError, CodecRegistry, ImageFormat, PixelData};

/// Quality used when none is requested.
pub const DEFAULT_QUALITY: u8 = 95;

/// Encoded image output.
#[derive(Clone, Debug)]
pub struct EncodeOutput {
    /// Encoded image data.
    pub data: Vec<u8>,
    /// Format used for encoding.
    pub format: ImageFormat,
}

/// Image encode request builder.
///
/// # Example
///
/// ```no_run
/// use photon::{EncodeRequest, ImageFormat, PixelData};
///
/// let pixels = PixelData::from_rgb_bytes(&[0u8; 100 * 100 * 3], 100, 100).unwrap();
/// let output = EncodeRequest::new(ImageFormat::Jpeg)
///     .with_quality(85)
///     .encode(&pixels)?;
/// # Ok::<(), photon::CodecError>(())
/// ```
pub struct EncodeRequest<'a> {
    format: ImageFormat,
    quality: u8,
    speed: Option<u8>,
    lossless: bool,
    registry: Option<&'a CodecRegistry>,
}

impl<'a> EncodeRequest<'a> {
    /// Encode to a specific format.
    pub fn new(format: ImageFormat) -> Self {
        Self {
            format,
            quality: DEFAULT_QUALITY,
            speed: None,
            lossless: false,
            registry: None,
        }
    }

    /// Set quality (1-100, clamped). Only lossy encoders look at it.
    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = quality.clamp(1, 100);
        self
    }

    /// Set AVIF encoder speed (1 = slowest, 10 = fastest).
    pub fn with_speed(mut self, speed: u8) -> Self {
        self.speed = Some(speed.clamp(1, 10));
        self
    }

    /// Request lossless encoding.
    ///
    /// Formats that can't encode losslessly get their highest quality instead.
    pub fn with_lossless(mut self, lossless: bool) -> Self {
        self.lossless = lossless;
        self
    }

    /// Set a codec registry to control which formats are enabled.
    pub fn with_registry(mut self, registry: &'a CodecRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Encode pixels. The whole file is produced in memory.
    pub fn encode(self, pixels: &PixelData) -> Result<EncodeOutput, CodecError> {
        let format = self.format;

        if let Some(reason) = format.encode_blocked() {
            return Err(CodecError::EncodeBlocked { format, reason });
        }

        let default_registry = CodecRegistry::all();
        let registry = self.registry.unwrap_or(&default_registry);
        if !registry.encode_enabled(format) {
            return Err(CodecError::DisabledFormat(format));
        }

        if pixels.width() == 0 || pixels.height() == 0 {
            return Err(CodecError::InvalidInput(format!(
                "cannot encode {}x{} image",
                pixels.width(),
                pixels.height()
            )));
        }

        // Lossless-only writers ignore quality; lossy ones get their best setting.
        let quality = if self.lossless { 100 } else { self.quality };

        tracing::debug!(
            %format,
            quality,
            lossless = self.lossless,
            width = pixels.width(),
            height = pixels.height(),
            "encoding"
        );

        let data = self.encode_format(format, pixels, quality)?;
        Ok(EncodeOutput { data, format })
    }

    /// Dispatch to format-specific encoder.
    #[allow(unused_variables)]
    fn encode_format(
        &self,
        format: ImageFormat,
        pixels: &PixelData,
        quality: u8,
    ) -> Result<Vec<u8>, CodecError> {
        match format {
            #[cfg(feature = "png")]
            ImageFormat::Png => crate::codecs::png::encode(pixels),
            #[cfg(not(feature = "png"))]
            ImageFormat::Png => Err(CodecError::UnsupportedFormat(format)),

            #[cfg(feature = "jpeg")]
            ImageFormat::Jpeg => crate::codecs::jpeg::encode(pixels, quality),
            #[cfg(not(feature = "jpeg"))]
            ImageFormat::Jpeg => Err(CodecError::UnsupportedFormat(format)),

            #[cfg(feature = "gif")]
            ImageFormat::Gif => crate::codecs::gif::encode(pixels),
            #[cfg(not(feature = "gif"))]
            ImageFormat::Gif => Err(CodecError::UnsupportedFormat(format)),

            #[cfg(feature = "webp")]
            ImageFormat::WebP => crate::codecs::webp::encode(pixels),
            #[cfg(not(feature = "webp"))]
            ImageFormat::WebP => Err(CodecError::UnsupportedFormat(format)),

            #[cfg(feature = "bmp")]
            ImageFormat::Bmp => crate::codecs::bmp::encode(pixels),
            #[cfg(not(feature = "bmp"))]
            ImageFormat::Bmp => Err(CodecError::UnsupportedFormat(format)),

            #[cfg(feature = "tiff")]
            ImageFormat::Tiff => crate::codecs::tiff::encode(pixels),
            #[cfg(not(feature = "tiff"))]
            ImageFormat::Tiff => Err(CodecError::UnsupportedFormat(format)),

            #[cfg(feature = "avif-encode")]
            ImageFormat::Avif => crate::codecs::avif::encode(
                pixels,
                quality,
                self.speed.unwrap_or(crate::codecs::avif::DEFAULT_SPEED),
            ),
            #[cfg(not(feature = "avif-encode"))]
            ImageFormat::Avif => Err(CodecError::UnsupportedFormat(format)),

            // Blocked in encode() before dispatch.
            ImageFormat::Heic => Err(CodecError::UnsupportedFormat(format)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: u32, height: u32) -> PixelData {
        let mut bytes = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                bytes.extend_from_slice(&[(x * 7) as u8, (y * 5) as u8, ((x + y) * 3) as u8]);
            }
        }
        PixelData::from_rgb_bytes(&bytes, width, height).unwrap()
    }

    #[test]
    fn quality_is_clamped() {
        assert_eq!(EncodeRequest::new(ImageFormat::Jpeg).with_quality(0).quality, 1);
        assert_eq!(EncodeRequest::new(ImageFormat::Jpeg).with_quality(200).quality, 100);
        assert_eq!(EncodeRequest::new(ImageFormat::Jpeg).quality, DEFAULT_QUALITY);
    }

    #[test]
    fn speed_is_clamped() {
        assert_eq!(EncodeRequest::new(ImageFormat::Avif).with_speed(0).speed, Some(1));
        assert_eq!(EncodeRequest::new(ImageFormat::Avif).with_speed(42).speed, Some(10));
        assert_eq!(EncodeRequest::new(ImageFormat::Avif).with_speed(6).speed, Some(6));
        assert_eq!(EncodeRequest::new(ImageFormat::Avif).speed, None);
    }

    #[test]
    fn heic_is_blocked_before_registry() {
        let registry = CodecRegistry::none();
        let err = EncodeRequest::new(ImageFormat::Heic)
            .with_registry(&registry)
            .encode(&gradient(4, 4))
            .unwrap_err();
        assert!(matches!(err, CodecError::EncodeBlocked { .. }));
        assert_eq!(
            err.to_string(),
            "HEIC encoding not supported (Apple license restriction)"
        );
    }

    #[test]
    fn disabled_format_error() {
        let registry = CodecRegistry::none();
        let result = EncodeRequest::new(ImageFormat::Png)
            .with_registry(&registry)
            .encode(&gradient(4, 4));
        assert!(matches!(result, Err(CodecError::DisabledFormat(ImageFormat::Png))));
    }

    #[cfg(feature = "png")]
    #[test]
    fn png_output_is_sniffed_as_png() {
        let out = EncodeRequest::new(ImageFormat::Png)
            .encode(&gradient(16, 16))
            .unwrap();
        assert_eq!(out.format, ImageFormat::Png);
        assert_eq!(ImageFormat::detect(&out.data), Some(ImageFormat::Png));
    }

    #[cfg(feature = "jpeg")]
    #[test]
    fn jpeg_quality_changes_size() {
        let pixels = gradient(64, 64);
        let high = EncodeRequest::new(ImageFormat::Jpeg)
            .with_quality(95)
            .encode(&pixels)
            .unwrap();
        let low = EncodeRequest::new(ImageFormat::Jpeg)
            .with_quality(10)
            .encode(&pixels)
            .unwrap();
        assert!(low.data.len() < high.data.len());
    }

    #[cfg(feature = "jpeg")]
    #[test]
    fn jpeg_drops_alpha() {
        let bytes: Vec<u8> = [255, 0, 0, 100].repeat(8 * 8);
        let pixels = PixelData::from_rgba_bytes(&bytes, 8, 8).unwrap();
        let out = EncodeRequest::new(ImageFormat::Jpeg).encode(&pixels).unwrap();
        assert_eq!(ImageFormat::detect(&out.data), Some(ImageFormat::Jpeg));
    }

    #[cfg(all(feature = "gif", feature = "webp", feature = "bmp", feature = "tiff"))]
    #[test]
    fn every_lossless_writer_produces_its_format() {
        let pixels = gradient(16, 16);
        for format in [
            ImageFormat::Gif,
            ImageFormat::WebP,
            ImageFormat::Bmp,
            ImageFormat::Tiff,
        ] {
            let out = EncodeRequest::new(format).encode(&pixels).unwrap();
            assert_eq!(ImageFormat::detect(&out.data), Some(format), "{format}");
        }
    }

    #[cfg(feature = "avif-encode")]
    #[test]
    fn avif_output_is_sniffed_as_avif() {
        let out = EncodeRequest::new(ImageFormat::Avif)
            .with_speed(10)
            .with_quality(50)
            .encode(&gradient(16, 16))
            .unwrap();
        assert_eq!(ImageFormat::detect(&out.data), Some(ImageFormat::Avif));
    }
}
