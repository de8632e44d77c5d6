//! File-to-file conversion.

use std::path::{Path, PathBuf};

use crate::{CodecError, DecodeRequest, EncodeRequest, ImageFormat};

/// Options for a single conversion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Encoder quality, 1-100. Ignored by lossless formats.
    pub quality: u8,
    /// Ask for lossless output where the format allows it.
    pub lossless: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            quality: crate::encode::DEFAULT_QUALITY,
            lossless: false,
        }
    }
}

/// Outcome of a successful conversion.
#[derive(Clone, Debug)]
pub struct ConvertReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub source_format: ImageFormat,
    pub target_format: ImageFormat,
    pub input_size: u64,
    pub output_size: u64,
}

/// Convert `input` to the format named by `output`'s extension.
///
/// The input format is sniffed from content, not taken from its extension.
/// The output is encoded in memory before the file is created, so a failed
/// encode leaves nothing behind. The output directory must already exist.
pub fn convert(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    options: &ConvertOptions,
) -> Result<ConvertReport, CodecError> {
    let input = input.as_ref();
    let output = output.as_ref();

    let data = std::fs::read(input).map_err(|e| CodecError::io("failed to read", input, e))?;
    let decoded = DecodeRequest::new(&data).decode()?;

    let target_format = ImageFormat::from_path(output)?;
    let encoded = EncodeRequest::new(target_format)
        .with_quality(options.quality)
        .with_lossless(options.lossless)
        .encode(&decoded.pixels)?;

    std::fs::write(output, &encoded.data)
        .map_err(|e| CodecError::io("failed to write", output, e))?;

    let report = ConvertReport {
        input: input.to_path_buf(),
        output: output.to_path_buf(),
        source_format: decoded.format,
        target_format,
        input_size: data.len() as u64,
        output_size: encoded.data.len() as u64,
    };

    tracing::info!(
        input = %input.display(),
        output = %output.display(),
        from = %report.source_format,
        to = %report.target_format,
        input_size = report.input_size,
        output_size = report.output_size,
        "converted"
    );

    Ok(report)
}

/// `dir/<stem of input>.<format's primary extension>`.
pub fn output_path_for(
    input: impl AsRef<Path>,
    dir: impl AsRef<Path>,
    format: ImageFormat,
) -> PathBuf {
    let stem = input
        .as_ref()
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    dir.as_ref()
        .join(format!("{stem}.{}", format.primary_extension()))
}

#[cfg(all(test, feature = "png", feature = "jpeg"))]
mod tests {
    use super::*;
    use crate::PixelData;
    use tempfile::TempDir;

    fn write_png(path: &Path, width: u32, height: u32) {
        let mut bytes = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                bytes.extend_from_slice(&[(x % 256) as u8, (y % 256) as u8, 128, 255]);
            }
        }
        let pixels = PixelData::from_rgba_bytes(&bytes, width, height).unwrap();
        let png = EncodeRequest::new(ImageFormat::Png).encode(&pixels).unwrap();
        std::fs::write(path, png.data).unwrap();
    }

    #[test]
    fn default_options() {
        let opts = ConvertOptions::default();
        assert_eq!(opts.quality, 95);
        assert!(!opts.lossless);
    }

    #[test]
    fn png_to_jpeg() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("input.png");
        let dst = dir.path().join("output.jpg");
        write_png(&src, 100, 100);

        let report = convert(&src, &dst, &ConvertOptions::default()).unwrap();
        assert_eq!(report.source_format, ImageFormat::Png);
        assert_eq!(report.target_format, ImageFormat::Jpeg);
        assert!(report.output_size > 0);
        assert_eq!(std::fs::metadata(&dst).unwrap().len(), report.output_size);
    }

    #[cfg(feature = "bmp")]
    #[test]
    fn input_format_comes_from_content() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("mislabeled.jpg");
        let dst = dir.path().join("out.bmp");
        write_png(&src, 8, 8);

        let report = convert(&src, &dst, &ConvertOptions::default()).unwrap();
        assert_eq!(report.source_format, ImageFormat::Png);
    }

    #[test]
    fn missing_input_names_path() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("nonexistent.png");
        let err = convert(&src, dir.path().join("output.jpg"), &ConvertOptions::default())
            .unwrap_err();
        assert!(matches!(err, CodecError::Io { .. }));
        assert!(err.to_string().contains("nonexistent.png"));
    }

    #[test]
    fn missing_output_dir_is_error() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("input.png");
        write_png(&src, 10, 10);

        let dst = dir.path().join("missing").join("output.jpg");
        let err = convert(&src, &dst, &ConvertOptions::default()).unwrap_err();
        assert!(matches!(err, CodecError::Io { .. }));
        assert!(!dst.exists());
    }

    #[test]
    fn unknown_output_extension() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("input.png");
        write_png(&src, 10, 10);

        let dst = dir.path().join("output.xyz");
        let err = convert(&src, &dst, &ConvertOptions::default()).unwrap_err();
        assert_eq!(err.to_string(), "unsupported format: xyz");
        assert!(!dst.exists());
    }

    #[test]
    fn heic_output_is_refused() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("input.png");
        write_png(&src, 10, 10);

        let dst = dir.path().join("output.heic");
        let err = convert(&src, &dst, &ConvertOptions::default()).unwrap_err();
        assert!(matches!(err, CodecError::EncodeBlocked { .. }));
        assert!(!dst.exists());
    }

    #[test]
    fn empty_input_is_error() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("empty.png");
        std::fs::write(&src, b"").unwrap();

        let err = convert(&src, dir.path().join("out.jpg"), &ConvertOptions::default())
            .unwrap_err();
        assert!(matches!(err, CodecError::UnrecognizedFormat));
    }

    #[test]
    fn lower_quality_gives_smaller_jpeg() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("input.png");
        write_png(&src, 200, 200);

        let low = convert(
            &src,
            dir.path().join("low.jpg"),
            &ConvertOptions {
                quality: 10,
                lossless: false,
            },
        )
        .unwrap();
        let high = convert(
            &src,
            dir.path().join("high.jpg"),
            &ConvertOptions {
                quality: 95,
                lossless: false,
            },
        )
        .unwrap();
        assert!(low.output_size < high.output_size);
    }

    #[cfg(all(
        feature = "gif",
        feature = "webp",
        feature = "bmp",
        feature = "tiff",
        feature = "avif-encode"
    ))]
    #[test]
    fn every_writable_format() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("source.png");
        write_png(&src, 100, 100);

        for ext in ["jpg", "gif", "webp", "bmp", "tiff", "avif"] {
            let dst = dir.path().join(format!("output.{ext}"));
            let report = convert(&src, &dst, &ConvertOptions::default())
                .unwrap_or_else(|e| panic!("convert to {ext}: {e}"));
            let written = std::fs::read(&dst).unwrap();
            assert_eq!(ImageFormat::detect(&written), Some(report.target_format));
        }
    }

    #[test]
    fn output_path_uses_primary_extension() {
        let path = output_path_for("/photos/IMG_001.HEIC", "/out", ImageFormat::Jpeg);
        assert_eq!(path, PathBuf::from("/out/IMG_001.jpg"));

        let path = output_path_for("/photos/archive.tar.png", "/out", ImageFormat::WebP);
        assert_eq!(path, PathBuf::from("/out/archive.tar.webp"));
    }
}
