//! Resource limits for decoding.

use crate::CodecError;

/// Resource limits for decode operations.
///
/// All limits are optional.
#[derive(Clone, Debug, Default)]
pub struct Limits {
    /// Maximum image width in pixels.
    pub max_width: Option<u32>,
    /// Maximum image height in pixels.
    pub max_height: Option<u32>,
    /// Maximum total pixels (width x height).
    pub max_pixels: Option<u64>,
}

impl Limits {
    /// Create a new Limits with no restrictions.
    pub fn none() -> Self {
        Self::default()
    }

    /// Check if dimensions are within limits.
    pub fn check_dimensions(&self, width: u32, height: u32) -> Result<(), CodecError> {
        if let Some(max_width) = self.max_width
            && width > max_width
        {
            return Err(CodecError::LimitExceeded(format!(
                "width {width} exceeds {max_width}"
            )));
        }

        if let Some(max_height) = self.max_height
            && height > max_height
        {
            return Err(CodecError::LimitExceeded(format!(
                "height {height} exceeds {max_height}"
            )));
        }

        if let Some(max_pixels) = self.max_pixels {
            let pixels = u64::from(width).saturating_mul(u64::from(height));
            if pixels > max_pixels {
                return Err(CodecError::LimitExceeded(format!(
                    "pixel count {pixels} exceeds {max_pixels}"
                )));
            }
        }

        Ok(())
    }

    /// Translate into the codec library's own limits. Only the dimension caps
    /// carry over; the pixel count is checked against the header.
    pub(crate) fn to_image_limits(&self) -> image::Limits {
        let mut limits = image::Limits::default();
        limits.max_image_width = self.max_width;
        limits.max_image_height = self.max_height;
        limits
    }
}
