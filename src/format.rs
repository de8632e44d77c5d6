//! Image format detection and capabilities.

use core::fmt;
use core::str::FromStr;
use std::path::Path;

use crate::CodecError;

/// Supported image formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    WebP,
    Bmp,
    Tiff,
    Avif,
    Heic,
}

/// ISO-BMFF brands that identify an AVIF still image or sequence.
const AVIF_BRANDS: [&[u8; 4]; 2] = [b"avif", b"avis"];

/// ISO-BMFF brands that identify a HEIF/HEIC file.
const HEIF_BRANDS: [&[u8; 4]; 8] = [
    b"heic", b"heix", b"hevc", b"hevx", b"heim", b"heis", b"mif1", b"msf1",
];

impl ImageFormat {
    /// Every format, in lookup-table order.
    pub const ALL: [ImageFormat; 8] = [
        ImageFormat::Png,
        ImageFormat::Jpeg,
        ImageFormat::Gif,
        ImageFormat::WebP,
        ImageFormat::Bmp,
        ImageFormat::Tiff,
        ImageFormat::Avif,
        ImageFormat::Heic,
    ];

    /// Detect format from magic bytes. Returns None if unrecognized.
    pub fn detect(data: &[u8]) -> Option<Self> {
        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(ImageFormat::Jpeg);
        }

        // PNG: 89 50 4E 47 0D 0A 1A 0A
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
            return Some(ImageFormat::Png);
        }

        // GIF: "GIF87a" or "GIF89a"
        if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
            return Some(ImageFormat::Gif);
        }

        // WebP: "RIFF....WEBP"
        if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            return Some(ImageFormat::WebP);
        }

        // TIFF: little-endian "II*\0" or big-endian "MM\0*"
        if data.starts_with(b"II*\0") || data.starts_with(b"MM\0*") {
            return Some(ImageFormat::Tiff);
        }

        if let Some(format) = Self::detect_isobmff(data) {
            return Some(format);
        }

        // BMP: "BM". Checked last since two bytes is a weak signature.
        if data.len() >= 14 && data.starts_with(b"BM") {
            return Some(ImageFormat::Bmp);
        }

        None
    }

    /// Whether the data starts with an ISO-BMFF `ftyp` box naming a HEIF-family brand
    /// (HEIC or AVIF).
    pub fn is_isobmff_image(data: &[u8]) -> bool {
        Self::detect_isobmff(data).is_some()
    }

    /// Classify an ISO-BMFF file by its `ftyp` box.
    ///
    /// Layout: 4-byte box size, `ftyp`, 4-byte major brand, 4-byte minor version,
    /// then compatible brands until the end of the box.
    fn detect_isobmff(data: &[u8]) -> Option<Self> {
        if data.len() < 12 || &data[4..8] != b"ftyp" {
            return None;
        }

        let major = &data[8..12];
        if AVIF_BRANDS.iter().any(|b| major == *b) {
            return Some(ImageFormat::Avif);
        }
        if !HEIF_BRANDS.iter().any(|b| major == *b) {
            return None;
        }

        // Generic image brands say nothing about the codec; the compatible
        // brand list tells AVIF apart from HEIC.
        if major == b"mif1" || major == b"msf1" {
            let box_size = u32::from_be_bytes([data[0], data[1], data[2], data[3]]) as usize;
            // A size of 0 means the box runs to the end of the data.
            let end = match box_size {
                0 => data.len(),
                n => n.min(data.len()),
            };
            if end > 16 {
                let has_avif = data[16..end]
                    .chunks_exact(4)
                    .any(|brand| AVIF_BRANDS.iter().any(|b| brand == *b));
                if has_avif {
                    return Some(ImageFormat::Avif);
                }
            }
        }

        Some(ImageFormat::Heic)
    }

    /// Detect format from file extension (case-insensitive, leading dot allowed).
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.strip_prefix('.').unwrap_or(ext);
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(ImageFormat::Png),
            "jpg" | "jpeg" | "jpe" | "jfif" => Some(ImageFormat::Jpeg),
            "gif" => Some(ImageFormat::Gif),
            "webp" => Some(ImageFormat::WebP),
            "bmp" => Some(ImageFormat::Bmp),
            "tif" | "tiff" => Some(ImageFormat::Tiff),
            "avif" => Some(ImageFormat::Avif),
            "heic" | "heif" => Some(ImageFormat::Heic),
            _ => None,
        }
    }

    /// Look up the format for a path's extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CodecError> {
        let ext = path
            .as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("");
        Self::from_extension(ext).ok_or_else(|| CodecError::UnknownExtension(ext.to_string()))
    }

    /// Canonical lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpeg",
            ImageFormat::Gif => "gif",
            ImageFormat::WebP => "webp",
            ImageFormat::Bmp => "bmp",
            ImageFormat::Tiff => "tiff",
            ImageFormat::Avif => "avif",
            ImageFormat::Heic => "heic",
        }
    }

    /// MIME type string.
    pub fn mime_type(self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Gif => "image/gif",
            ImageFormat::WebP => "image/webp",
            ImageFormat::Bmp => "image/bmp",
            ImageFormat::Tiff => "image/tiff",
            ImageFormat::Avif => "image/avif",
            ImageFormat::Heic => "image/heic",
        }
    }

    /// Common file extensions. The first one is used for output files.
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            ImageFormat::Png => &["png"],
            ImageFormat::Jpeg => &["jpg", "jpeg", "jpe", "jfif"],
            ImageFormat::Gif => &["gif"],
            ImageFormat::WebP => &["webp"],
            ImageFormat::Bmp => &["bmp"],
            ImageFormat::Tiff => &["tiff", "tif"],
            ImageFormat::Avif => &["avif"],
            ImageFormat::Heic => &["heic", "heif"],
        }
    }

    /// Extension written for output files.
    pub fn primary_extension(self) -> &'static str {
        self.extensions()[0]
    }

    /// Whether the quality setting changes the encoded output.
    pub fn supports_lossy(self) -> bool {
        matches!(
            self,
            ImageFormat::Jpeg | ImageFormat::Avif | ImageFormat::Heic
        )
    }

    /// Whether this format can be written without loss.
    pub fn supports_lossless(self) -> bool {
        !matches!(self, ImageFormat::Jpeg)
    }

    /// Whether this format supports an alpha channel.
    pub fn supports_alpha(self) -> bool {
        !matches!(self, ImageFormat::Jpeg)
    }

    /// Encoding refused regardless of which codecs are compiled in.
    ///
    /// Returns the reason when refused.
    pub fn encode_blocked(self) -> Option<&'static str> {
        match self {
            ImageFormat::Heic => Some("HEIC encoding not supported (Apple license restriction)"),
            _ => None,
        }
    }

    /// Short human-readable description.
    pub fn description(self) -> &'static str {
        match self {
            ImageFormat::Png => "Lossless, supports transparency",
            ImageFormat::Jpeg => "Lossy, best for photos",
            ImageFormat::Gif => "Lossless, 256 colors, animation",
            ImageFormat::WebP => "Modern, excellent compression",
            ImageFormat::Bmp => "Uncompressed, large files",
            ImageFormat::Tiff => "Lossless, professional use",
            ImageFormat::Avif => "Modern, best compression",
            ImageFormat::Heic => "Apple photo format, read-only",
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ImageFormat {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_extension(s).ok_or_else(|| CodecError::UnknownExtension(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ftyp(major: &[u8; 4], compatible: &[&[u8; 4]]) -> Vec<u8> {
        let size = 16 + 4 * compatible.len();
        let mut data = Vec::with_capacity(size);
        data.extend_from_slice(&(size as u32).to_be_bytes());
        data.extend_from_slice(b"ftyp");
        data.extend_from_slice(major);
        data.extend_from_slice(&[0, 0, 0, 0]);
        for brand in compatible {
            data.extend_from_slice(*brand);
        }
        data
    }

    #[test]
    fn detect_jpeg() {
        let data = [0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10];
        assert_eq!(ImageFormat::detect(&data), Some(ImageFormat::Jpeg));
    }

    #[test]
    fn detect_png() {
        let data = [
            0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D,
        ];
        assert_eq!(ImageFormat::detect(&data), Some(ImageFormat::Png));
    }

    #[test]
    fn detect_gif() {
        assert_eq!(ImageFormat::detect(b"GIF89a\x00\x00"), Some(ImageFormat::Gif));
        assert_eq!(ImageFormat::detect(b"GIF87a\x00\x00"), Some(ImageFormat::Gif));
    }

    #[test]
    fn detect_webp() {
        let data = b"RIFF\x00\x00\x00\x00WEBP";
        assert_eq!(ImageFormat::detect(data), Some(ImageFormat::WebP));
    }

    #[test]
    fn riff_without_webp_is_unknown() {
        let data = b"RIFF\x24\x00\x00\x00WAVEfmt ";
        assert_eq!(ImageFormat::detect(data), None);
    }

    #[test]
    fn detect_tiff_both_byte_orders() {
        assert_eq!(ImageFormat::detect(b"II*\0\x08\0\0\0"), Some(ImageFormat::Tiff));
        assert_eq!(ImageFormat::detect(b"MM\0*\0\0\0\x08"), Some(ImageFormat::Tiff));
    }

    #[test]
    fn detect_bmp() {
        let mut data = b"BM".to_vec();
        data.resize(54, 0);
        assert_eq!(ImageFormat::detect(&data), Some(ImageFormat::Bmp));
    }

    #[test]
    fn detect_avif() {
        let data = b"\x00\x00\x00\x18ftypavif";
        assert_eq!(ImageFormat::detect(data), Some(ImageFormat::Avif));
        assert_eq!(ImageFormat::detect(&ftyp(b"avis", &[])), Some(ImageFormat::Avif));
    }

    #[test]
    fn detect_heic_brands() {
        for brand in [b"heic", b"heix", b"hevc", b"mif1"] {
            let data = ftyp(brand, &[b"mif1"]);
            assert_eq!(ImageFormat::detect(&data), Some(ImageFormat::Heic), "{brand:?}");
        }
    }

    #[test]
    fn mif1_with_avif_compatible_brand_is_avif() {
        let data = ftyp(b"mif1", &[b"mif1", b"avif", b"miaf"]);
        assert_eq!(ImageFormat::detect(&data), Some(ImageFormat::Avif));
    }

    #[test]
    fn zero_sized_ftyp_runs_to_end() {
        let mut data = ftyp(b"mif1", &[b"mif1", b"avif"]);
        data[..4].copy_from_slice(&[0, 0, 0, 0]);
        assert_eq!(ImageFormat::detect(&data), Some(ImageFormat::Avif));

        let mut data = ftyp(b"mif1", &[b"mif1", b"heic"]);
        data[..4].copy_from_slice(&[0, 0, 0, 0]);
        assert_eq!(ImageFormat::detect(&data), Some(ImageFormat::Heic));
    }

    #[test]
    fn unknown_ftyp_brand() {
        let data = ftyp(b"isom", &[b"mp41"]);
        assert_eq!(ImageFormat::detect(&data), None);
        assert!(!ImageFormat::is_isobmff_image(&data));
    }

    #[test]
    fn detect_too_short() {
        assert_eq!(ImageFormat::detect(&[0xFF, 0xD8]), None);
        assert_eq!(ImageFormat::detect(b"\x00\x00\x00\x18ftyp"), None);
        assert_eq!(ImageFormat::detect(&[]), None);
    }

    #[test]
    fn from_extension_table() {
        let cases = [
            ("png", Some(ImageFormat::Png)),
            ("PNG", Some(ImageFormat::Png)),
            ("jpg", Some(ImageFormat::Jpeg)),
            ("JPEG", Some(ImageFormat::Jpeg)),
            (".webp", Some(ImageFormat::WebP)),
            ("tif", Some(ImageFormat::Tiff)),
            ("tiff", Some(ImageFormat::Tiff)),
            ("heif", Some(ImageFormat::Heic)),
            ("avif", Some(ImageFormat::Avif)),
            ("xyz", None),
            ("", None),
        ];
        for (ext, expected) in cases {
            assert_eq!(ImageFormat::from_extension(ext), expected, "{ext}");
        }
    }

    #[test]
    fn from_path_without_extension() {
        assert!(matches!(
            ImageFormat::from_path("image"),
            Err(CodecError::UnknownExtension(_))
        ));
        assert_eq!(ImageFormat::from_path("a/b/photo.HEIC").ok(), Some(ImageFormat::Heic));
    }

    #[test]
    fn parse_and_display() {
        let format: ImageFormat = "jpg".parse().unwrap();
        assert_eq!(format, ImageFormat::Jpeg);
        assert_eq!(format.to_string(), "jpeg");
        assert_eq!(format.primary_extension(), "jpg");
        assert!("bogus".parse::<ImageFormat>().is_err());
    }

    #[test]
    fn only_heic_is_blocked() {
        for format in ImageFormat::ALL {
            assert_eq!(format.encode_blocked().is_some(), format == ImageFormat::Heic);
        }
    }
}
