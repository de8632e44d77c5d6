//! Unified error types for codec operations.

use std::path::PathBuf;

use crate::format::ImageFormat;

/// Unified error type for codec operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum CodecError {
    /// Format not recognized from magic bytes.
    #[error("unrecognized image format")]
    UnrecognizedFormat,
    /// File extension not in the format table.
    #[error("unsupported format: {0}")]
    UnknownExtension(String),
    /// Format recognized but codec not compiled in.
    #[error("format {0} not supported (codec not compiled in)")]
    UnsupportedFormat(ImageFormat),
    /// Encoding refused for this format whatever the build.
    #[error("{reason}")]
    EncodeBlocked {
        format: ImageFormat,
        reason: &'static str,
    },
    /// Codec not enabled in the provided registry.
    #[error("format {0} is disabled in the codec registry")]
    DisabledFormat(ImageFormat),
    /// Input validation failed.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Resource limit exceeded.
    #[error("limit exceeded: {0}")]
    LimitExceeded(String),
    /// Reading or writing a file failed.
    #[error("{action} {}: {source}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Underlying codec error.
    #[error("codec error ({format}): {source}")]
    Codec {
        format: ImageFormat,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

// Conversion helpers for codec-specific errors
impl CodecError {
    /// Wrap a codec-specific error.
    pub fn from_codec<E>(format: ImageFormat, error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        CodecError::Codec {
            format,
            source: Box::new(error),
        }
    }

    /// Wrap an I/O error with the path it concerns.
    pub(crate) fn io(
        action: &'static str,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        CodecError::Io {
            action,
            path: path.into(),
            source,
        }
    }
}
