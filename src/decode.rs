//! Image decoding.

use crate::{CodecError, CodecRegistry, ImageFormat, Limits, PixelData};

/// Decoded image output.
#[derive(Clone, Debug)]
pub struct DecodeOutput {
    /// Decoded pixel data in a typed buffer.
    pub pixels: PixelData,
    /// Format the data was decoded as.
    pub format: ImageFormat,
}

impl DecodeOutput {
    /// Image width in pixels (convenience accessor).
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Image height in pixels (convenience accessor).
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }
}

/// Image decode request builder.
///
/// # Example
///
/// ```no_run
/// use photon::DecodeRequest;
///
/// let data: &[u8] = &[]; // your image bytes
/// let output = DecodeRequest::new(data).decode()?;
/// println!("{}x{}", output.width(), output.height());
/// # Ok::<(), photon::CodecError>(())
/// ```
pub struct DecodeRequest<'a> {
    data: &'a [u8],
    format: Option<ImageFormat>,
    limits: Option<&'a Limits>,
    registry: Option<&'a CodecRegistry>,
}

impl<'a> DecodeRequest<'a> {
    /// Create a new decode request.
    ///
    /// Format will be auto-detected from magic bytes.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            format: None,
            limits: None,
            registry: None,
        }
    }

    /// Override format auto-detection.
    pub fn with_format(mut self, format: ImageFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Set resource limits.
    pub fn with_limits(mut self, limits: &'a Limits) -> Self {
        self.limits = Some(limits);
        self
    }

    /// Set a codec registry to control which formats are enabled.
    pub fn with_registry(mut self, registry: &'a CodecRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Decode the image to pixels.
    pub fn decode(self) -> Result<DecodeOutput, CodecError> {
        let default_registry = CodecRegistry::all();
        let registry = self.registry.unwrap_or(&default_registry);

        let format = match self.format {
            Some(f) => f,
            None => ImageFormat::detect(self.data).ok_or(CodecError::UnrecognizedFormat)?,
        };

        if !registry.decode_enabled(format) {
            return Err(CodecError::DisabledFormat(format));
        }

        tracing::debug!(%format, bytes = self.data.len(), "decoding");
        let pixels = self.decode_format(format)?;
        Ok(DecodeOutput { pixels, format })
    }

    /// Dispatch to format-specific decoder.
    fn decode_format(&self, format: ImageFormat) -> Result<PixelData, CodecError> {
        match format {
            #[cfg(feature = "png")]
            ImageFormat::Png => crate::codecs::png::decode(self.data, self.limits),
            #[cfg(not(feature = "png"))]
            ImageFormat::Png => Err(CodecError::UnsupportedFormat(format)),

            #[cfg(feature = "jpeg")]
            ImageFormat::Jpeg => crate::codecs::jpeg::decode(self.data, self.limits),
            #[cfg(not(feature = "jpeg"))]
            ImageFormat::Jpeg => Err(CodecError::UnsupportedFormat(format)),

            #[cfg(feature = "gif")]
            ImageFormat::Gif => crate::codecs::gif::decode(self.data, self.limits),
            #[cfg(not(feature = "gif"))]
            ImageFormat::Gif => Err(CodecError::UnsupportedFormat(format)),

            #[cfg(feature = "webp")]
            ImageFormat::WebP => crate::codecs::webp::decode(self.data, self.limits),
            #[cfg(not(feature = "webp"))]
            ImageFormat::WebP => Err(CodecError::UnsupportedFormat(format)),

            #[cfg(feature = "bmp")]
            ImageFormat::Bmp => crate::codecs::bmp::decode(self.data, self.limits),
            #[cfg(not(feature = "bmp"))]
            ImageFormat::Bmp => Err(CodecError::UnsupportedFormat(format)),

            #[cfg(feature = "tiff")]
            ImageFormat::Tiff => crate::codecs::tiff::decode(self.data, self.limits),
            #[cfg(not(feature = "tiff"))]
            ImageFormat::Tiff => Err(CodecError::UnsupportedFormat(format)),

            #[cfg(feature = "avif-decode")]
            ImageFormat::Avif => crate::codecs::avif::decode(self.data, self.limits),
            #[cfg(not(feature = "avif-decode"))]
            ImageFormat::Avif => Err(CodecError::UnsupportedFormat(format)),

            #[cfg(feature = "heic-decode")]
            ImageFormat::Heic => crate::codecs::heic::decode(self.data, self.limits),
            #[cfg(not(feature = "heic-decode"))]
            ImageFormat::Heic => Err(CodecError::UnsupportedFormat(format)),
        }
    }
}
