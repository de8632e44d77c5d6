//! # photon
//!
//! Image format conversion between PNG, JPEG, GIF, WebP, BMP, TIFF, AVIF and
//! HEIC (decode only).
//!
//! Each codec is feature-gated. The defaults cover everything that builds
//! without system libraries; `avif-decode` and `heic-decode` link dav1d and
//! libheif respectively.
//!
//! ```toml
//! [dependencies]
//! photon = { version = "0.1", features = ["heic-decode"] }
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use photon::{ConvertOptions, DecodeRequest, EncodeRequest, ImageFormat};
//!
//! // One call for file-to-file work
//! photon::convert("photo.heic", "photo.webp", &ConvertOptions::default())?;
//!
//! // Or decode and encode separately
//! let data = std::fs::read("photo.png").unwrap();
//! let decoded = DecodeRequest::new(&data).decode()?;
//! let jpeg = EncodeRequest::new(ImageFormat::Jpeg)
//!     .with_quality(85)
//!     .encode(&decoded.pixels)?;
//! # Ok::<(), photon::CodecError>(())
//! ```

#![forbid(unsafe_code)]

extern crate alloc;

mod codecs;
mod convert;
mod decode;
mod encode;
mod error;
mod format;
mod limits;
pub mod pixel;
mod probe;
mod registry;

pub use convert::{ConvertOptions, ConvertReport, convert, output_path_for};
pub use decode::{DecodeOutput, DecodeRequest};
pub use encode::{DEFAULT_QUALITY, EncodeOutput, EncodeRequest};
pub use error::CodecError;
pub use format::ImageFormat;
pub use limits::Limits;
pub use pixel::PixelData;
pub use probe::{ProbeInfo, probe, probe_file};
pub use registry::CodecRegistry;
