//! Header probing.
//!
//! Extracts format, dimensions and alpha from the leading bytes of an image
//! without decoding pixels. The parsers are plain byte parsing with no codec
//! crate behind them, so probing works for formats whose codec isn't compiled
//! in (HEIC in particular).

use std::path::Path;

use crate::{CodecError, ImageFormat};

/// What a header says about an image.
///
/// Fields other than `format` are `None` when the header is truncated or the
/// format doesn't carry the information up front.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub struct ProbeInfo {
    /// Detected image format.
    pub format: ImageFormat,
    /// Image width in pixels.
    pub width: Option<u32>,
    /// Image height in pixels.
    pub height: Option<u32>,
    /// Whether the image has an alpha channel.
    pub has_alpha: Option<bool>,
}

impl ProbeInfo {
    fn unknown(format: ImageFormat) -> Self {
        Self {
            format,
            width: None,
            height: None,
            has_alpha: None,
        }
    }

    fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    fn with_alpha(mut self, has_alpha: bool) -> Self {
        self.has_alpha = Some(has_alpha);
        self
    }

    /// Width and height when both are known.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        Some((self.width?, self.height?))
    }
}

/// Probe image bytes. Fails only when the format isn't recognized.
pub fn probe(data: &[u8]) -> Result<ProbeInfo, CodecError> {
    let format = ImageFormat::detect(data).ok_or(CodecError::UnrecognizedFormat)?;
    Ok(probe_format(data, format))
}

/// Read a file and probe it.
pub fn probe_file(path: impl AsRef<Path>) -> Result<ProbeInfo, CodecError> {
    let path = path.as_ref();
    let data = std::fs::read(path).map_err(|e| CodecError::io("failed to read", path, e))?;
    probe(&data)
}

/// Dispatch to the format's header parser. Magic bytes are not re-checked.
pub(crate) fn probe_format(data: &[u8], format: ImageFormat) -> ProbeInfo {
    match format {
        ImageFormat::Png => probe_png(data),
        ImageFormat::Jpeg => probe_jpeg(data),
        ImageFormat::Gif => probe_gif(data),
        ImageFormat::WebP => probe_webp(data),
        ImageFormat::Bmp => probe_bmp(data),
        ImageFormat::Tiff => probe_tiff(data),
        ImageFormat::Avif | ImageFormat::Heic => probe_heif(data, format),
    }
}

fn be_u16(data: &[u8], at: usize) -> Option<u16> {
    Some(u16::from_be_bytes(data.get(at..at + 2)?.try_into().ok()?))
}

fn be_u32(data: &[u8], at: usize) -> Option<u32> {
    Some(u32::from_be_bytes(data.get(at..at + 4)?.try_into().ok()?))
}

fn le_u16(data: &[u8], at: usize) -> Option<u16> {
    Some(u16::from_le_bytes(data.get(at..at + 2)?.try_into().ok()?))
}

fn le_u32(data: &[u8], at: usize) -> Option<u32> {
    Some(u32::from_le_bytes(data.get(at..at + 4)?.try_into().ok()?))
}

// PNG: 8-byte signature, then IHDR (len, type, width, height, depth, color type).
fn probe_png(data: &[u8]) -> ProbeInfo {
    let info = ProbeInfo::unknown(ImageFormat::Png);
    if data.get(12..16) != Some(b"IHDR".as_slice()) {
        return info;
    }
    let (Some(width), Some(height), Some(&color_type)) =
        (be_u32(data, 16), be_u32(data, 20), data.get(25))
    else {
        return info;
    };
    // 4 = gray+alpha, 6 = RGBA. A tRNS chunk can add alpha later; not scanned.
    info.with_size(width, height)
        .with_alpha(color_type == 4 || color_type == 6)
}

// GIF: logical screen width/height follow the 6-byte header.
fn probe_gif(data: &[u8]) -> ProbeInfo {
    let info = ProbeInfo::unknown(ImageFormat::Gif);
    match (le_u16(data, 6), le_u16(data, 8)) {
        (Some(w), Some(h)) => info.with_size(w.into(), h.into()),
        _ => info,
    }
}

// WebP: the first chunk after the RIFF header decides the layout.
fn probe_webp(data: &[u8]) -> ProbeInfo {
    let info = ProbeInfo::unknown(ImageFormat::WebP);
    let Some(chunk) = data.get(12..16) else {
        return info;
    };

    match chunk {
        b"VP8X" => {
            let Some(fields) = data.get(20..30) else {
                return info;
            };
            let flags = fields[0];
            // Canvas size is 24-bit LE, stored minus one.
            let w = u32::from_le_bytes([fields[4], fields[5], fields[6], 0]) + 1;
            let h = u32::from_le_bytes([fields[7], fields[8], fields[9], 0]) + 1;
            info.with_size(w, h).with_alpha(flags & 0x10 != 0)
        }
        b"VP8 " => {
            // Keyframe start code, then 14-bit width and height.
            if data.get(23..26) != Some([0x9D, 0x01, 0x2A].as_slice()) {
                return info;
            }
            match (le_u16(data, 26), le_u16(data, 28)) {
                (Some(w), Some(h)) => info
                    .with_size((w & 0x3FFF).into(), (h & 0x3FFF).into())
                    .with_alpha(false),
                _ => info,
            }
        }
        b"VP8L" => {
            if data.get(20) != Some(&0x2F) {
                return info;
            }
            let Some(bits) = le_u32(data, 21) else {
                return info;
            };
            let w = (bits & 0x3FFF) + 1;
            let h = ((bits >> 14) & 0x3FFF) + 1;
            info.with_size(w, h).with_alpha((bits >> 28) & 1 == 1)
        }
        _ => info,
    }
}

// JPEG: walk marker segments until a start-of-frame.
fn probe_jpeg(data: &[u8]) -> ProbeInfo {
    let info = ProbeInfo::unknown(ImageFormat::Jpeg).with_alpha(false);
    let mut pos = 2;

    while pos + 1 < data.len() {
        if data[pos] != 0xFF {
            break;
        }
        // Fill bytes.
        if data[pos + 1] == 0xFF {
            pos += 1;
            continue;
        }

        let marker = data[pos + 1];
        pos += 2;

        match marker {
            0x01 | 0xD0..=0xD7 => continue,
            0xD9 | 0xDA => break,
            0xC0..=0xC3 | 0xC5..=0xC7 | 0xC9..=0xCB | 0xCD..=0xCF => {
                // length, precision, height, width
                return match (be_u16(data, pos + 3), be_u16(data, pos + 5)) {
                    (Some(h), Some(w)) => info.with_size(w.into(), h.into()),
                    _ => info,
                };
            }
            _ => {}
        }

        match be_u16(data, pos) {
            Some(len) if len >= 2 => pos += usize::from(len),
            _ => break,
        }
    }

    info
}

// BMP: BITMAPINFOHEADER width/height are signed; negative height means top-down.
fn probe_bmp(data: &[u8]) -> ProbeInfo {
    let info = ProbeInfo::unknown(ImageFormat::Bmp);
    let Some(header_size) = le_u32(data, 14) else {
        return info;
    };

    if header_size == 12 {
        // OS/2 BITMAPCOREHEADER: 16-bit dimensions.
        return match (le_u16(data, 18), le_u16(data, 20)) {
            (Some(w), Some(h)) => info.with_size(w.into(), h.into()).with_alpha(false),
            _ => info,
        };
    }

    let (Some(w), Some(h), Some(bpp)) = (le_u32(data, 18), le_u32(data, 22), le_u16(data, 28))
    else {
        return info;
    };
    let w = (w as i32).unsigned_abs();
    let h = (h as i32).unsigned_abs();
    info.with_size(w, h).with_alpha(bpp == 32)
}

// TIFF: follow the first IFD and read ImageWidth, ImageLength and ExtraSamples.
fn probe_tiff(data: &[u8]) -> ProbeInfo {
    let info = ProbeInfo::unknown(ImageFormat::Tiff);
    let little = match data.get(0..2) {
        Some(b"II") => true,
        Some(b"MM") => false,
        _ => return info,
    };
    let u16_at = |at| if little { le_u16(data, at) } else { be_u16(data, at) };
    let u32_at = |at| if little { le_u32(data, at) } else { be_u32(data, at) };

    let Some(ifd) = u32_at(4).map(|o| o as usize) else {
        return info;
    };
    let Some(count) = u16_at(ifd) else {
        return info;
    };

    let mut width = None;
    let mut height = None;
    let mut extra_samples = false;

    for i in 0..usize::from(count) {
        let entry = ifd + 2 + i * 12;
        let (Some(tag), Some(kind)) = (u16_at(entry), u16_at(entry + 2)) else {
            break;
        };
        // SHORT values sit left-justified in the 4-byte value field.
        let value = match kind {
            3 => u16_at(entry + 8).map(u32::from),
            4 => u32_at(entry + 8),
            _ => None,
        };
        match tag {
            256 => width = value,
            257 => height = value,
            338 => extra_samples = true,
            _ => {}
        }
    }

    match (width, height) {
        (Some(w), Some(h)) => info.with_size(w, h).with_alpha(extra_samples),
        _ => info,
    }
}

/// URN marking an auxiliary image as the alpha plane.
const ALPHA_URNS: [&[u8]; 2] = [
    b"urn:mpeg:mpegB:cicp:systems:auxiliary:alpha",
    b"urn:mpeg:hevc:2015:auxid:1",
];

// AVIF / HEIC: meta -> iprp -> ipco holds ispe (size) and auxC (alpha) properties.
fn probe_heif(data: &[u8], format: ImageFormat) -> ProbeInfo {
    let info = ProbeInfo::unknown(format);
    let Some(ipco) = find_box(data, b"meta")
        .and_then(|meta| meta.get(4..)) // FullBox version/flags
        .and_then(|meta| find_box(meta, b"iprp"))
        .and_then(|iprp| find_box(iprp, b"ipco"))
    else {
        return info;
    };

    // Grid images carry one ispe per tile plus one for the canvas; the canvas is
    // the largest.
    let mut size: Option<(u32, u32)> = None;
    let mut has_alpha = false;
    for (box_type, body) in Boxes::new(ipco) {
        match &box_type {
            b"ispe" => {
                let area = |(w, h): (u32, u32)| u64::from(w) * u64::from(h);
                if let (Some(w), Some(h)) = (be_u32(body, 4), be_u32(body, 8))
                    && size.is_none_or(|best| area((w, h)) > area(best))
                {
                    size = Some((w, h));
                }
            }
            b"auxC" => {
                let urn = body.get(4..).unwrap_or_default();
                if ALPHA_URNS.iter().any(|u| urn.starts_with(u)) {
                    has_alpha = true;
                }
            }
            _ => {}
        }
    }

    match size {
        Some((w, h)) => info.with_size(w, h).with_alpha(has_alpha),
        None => info,
    }
}

/// Body of the first box of this type at this level.
fn find_box<'a>(data: &'a [u8], box_type: &[u8; 4]) -> Option<&'a [u8]> {
    Boxes::new(data).find(|(t, _)| t == box_type).map(|(_, body)| body)
}

/// Iterator over sibling ISO-BMFF boxes, yielding (type, body).
///
/// A size of 1 means a 64-bit size follows the type; 0 means the box runs to
/// the end of the data. Bodies are cut short rather than rejected when the
/// data is truncated.
struct Boxes<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Boxes<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }
}

impl<'a> Iterator for Boxes<'a> {
    type Item = ([u8; 4], &'a [u8]);

    fn next(&mut self) -> Option<Self::Item> {
        let pos = self.pos;
        let size = be_u32(self.data, pos)?;
        let box_type: [u8; 4] = self.data.get(pos + 4..pos + 8)?.try_into().ok()?;

        let (header, total) = match size {
            0 => (8, self.data.len() - pos),
            1 => {
                let hi = be_u32(self.data, pos + 8)?;
                let lo = be_u32(self.data, pos + 12)?;
                let total = (u64::from(hi) << 32) | u64::from(lo);
                (16, usize::try_from(total).ok()?)
            }
            n => (8, n as usize),
        };
        if total < header {
            return None;
        }

        let end = pos.checked_add(total)?;
        let body = self.data.get(pos + header..end.min(self.data.len()))?;
        self.pos = end;
        Some((box_type, body))
    }
}
