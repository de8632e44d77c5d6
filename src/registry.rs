//! Runtime codec registry for enabling/disabling formats.

use crate::ImageFormat;

/// Set of image formats represented as bitflags.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct FormatSet(u8);

impl FormatSet {
    const EMPTY: Self = FormatSet(0);
    const FULL: Self = FormatSet(u8::MAX);

    fn bit(format: ImageFormat) -> u8 {
        match format {
            ImageFormat::Png => 1 << 0,
            ImageFormat::Jpeg => 1 << 1,
            ImageFormat::Gif => 1 << 2,
            ImageFormat::WebP => 1 << 3,
            ImageFormat::Bmp => 1 << 4,
            ImageFormat::Tiff => 1 << 5,
            ImageFormat::Avif => 1 << 6,
            ImageFormat::Heic => 1 << 7,
        }
    }

    fn contains(self, format: ImageFormat) -> bool {
        (self.0 & Self::bit(format)) != 0
    }

    fn insert(&mut self, format: ImageFormat) {
        self.0 |= Self::bit(format);
    }

    fn remove(&mut self, format: ImageFormat) {
        self.0 &= !Self::bit(format);
    }

    fn iter(self) -> impl Iterator<Item = ImageFormat> {
        ImageFormat::ALL.into_iter().filter(move |&f| self.contains(f))
    }
}

/// Whether a decoder for `format` is compiled in.
pub(crate) fn decoder_compiled(format: ImageFormat) -> bool {
    match format {
        ImageFormat::Png => cfg!(feature = "png"),
        ImageFormat::Jpeg => cfg!(feature = "jpeg"),
        ImageFormat::Gif => cfg!(feature = "gif"),
        ImageFormat::WebP => cfg!(feature = "webp"),
        ImageFormat::Bmp => cfg!(feature = "bmp"),
        ImageFormat::Tiff => cfg!(feature = "tiff"),
        ImageFormat::Avif => cfg!(feature = "avif-decode"),
        ImageFormat::Heic => cfg!(feature = "heic-decode"),
    }
}

/// Whether an encoder for `format` is compiled in.
pub(crate) fn encoder_compiled(format: ImageFormat) -> bool {
    match format {
        ImageFormat::Png => cfg!(feature = "png"),
        ImageFormat::Jpeg => cfg!(feature = "jpeg"),
        ImageFormat::Gif => cfg!(feature = "gif"),
        ImageFormat::WebP => cfg!(feature = "webp"),
        ImageFormat::Bmp => cfg!(feature = "bmp"),
        ImageFormat::Tiff => cfg!(feature = "tiff"),
        ImageFormat::Avif => cfg!(feature = "avif-encode"),
        ImageFormat::Heic => false,
    }
}

/// Runtime codec registry.
///
/// Compile-time features determine which codecs are *available*, while the
/// registry controls which are *enabled* for a given operation.
#[derive(Clone, Debug)]
pub struct CodecRegistry {
    decode_enabled: FormatSet,
    encode_enabled: FormatSet,
}

impl CodecRegistry {
    /// All compiled-in codecs enabled.
    pub fn all() -> Self {
        Self {
            decode_enabled: FormatSet::FULL,
            encode_enabled: FormatSet::FULL,
        }
    }

    /// Nothing enabled; caller must opt in.
    pub fn none() -> Self {
        Self {
            decode_enabled: FormatSet::EMPTY,
            encode_enabled: FormatSet::EMPTY,
        }
    }

    /// Enable or disable decoding for a format.
    pub fn with_decode(mut self, format: ImageFormat, enabled: bool) -> Self {
        if enabled {
            self.decode_enabled.insert(format);
        } else {
            self.decode_enabled.remove(format);
        }
        self
    }

    /// Enable or disable encoding for a format.
    pub fn with_encode(mut self, format: ImageFormat, enabled: bool) -> Self {
        if enabled {
            self.encode_enabled.insert(format);
        } else {
            self.encode_enabled.remove(format);
        }
        self
    }

    /// Is this format enabled for decoding? Says nothing about compile-time availability.
    pub fn decode_enabled(&self, format: ImageFormat) -> bool {
        self.decode_enabled.contains(format)
    }

    /// Is this format enabled for encoding? Says nothing about compile-time availability.
    pub fn encode_enabled(&self, format: ImageFormat) -> bool {
        self.encode_enabled.contains(format)
    }

    /// Is this format available (compiled in) AND enabled for decoding?
    pub fn can_decode(&self, format: ImageFormat) -> bool {
        self.decode_enabled(format) && decoder_compiled(format)
    }

    /// Is this format available (compiled in) AND enabled for encoding?
    pub fn can_encode(&self, format: ImageFormat) -> bool {
        self.encode_enabled(format) && encoder_compiled(format)
    }

    /// Formats that are both compiled in and enabled for decoding.
    pub fn decodable_formats(&self) -> impl Iterator<Item = ImageFormat> + '_ {
        self.decode_enabled.iter().filter(|&f| self.can_decode(f))
    }

    /// Formats that are both compiled in and enabled for encoding.
    pub fn encodable_formats(&self) -> impl Iterator<Item = ImageFormat> + '_ {
        self.encode_enabled.iter().filter(|&f| self.can_encode(f))
    }
}

impl Default for CodecRegistry {
    fn default() -> Self {
        Self::all()
    }
}
