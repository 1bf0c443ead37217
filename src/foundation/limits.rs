use serde::{Deserialize, Serialize};

use crate::foundation::error::{RasterError, RasterResult};

/// Caps applied when a buffer is allocated or decoded from untrusted bytes.
///
/// `None` means no limit for that dimension.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BufferLimits {
    /// Maximum width in pixels.
    pub max_width: Option<u32>,
    /// Maximum height in pixels.
    pub max_height: Option<u32>,
    /// Maximum total pixels (width × height).
    pub max_pixels: Option<u64>,
}

impl Default for BufferLimits {
    fn default() -> Self {
        Self {
            max_width: Some(16_384),
            max_height: Some(16_384),
            max_pixels: Some(64 * 1024 * 1024),
        }
    }
}

impl BufferLimits {
    /// No limits at all.
    pub fn none() -> Self {
        Self {
            max_width: None,
            max_height: None,
            max_pixels: None,
        }
    }

    /// Set the maximum total pixel count.
    pub fn with_max_pixels(mut self, max: u64) -> Self {
        self.max_pixels = Some(max);
        self
    }

    /// Reject zero-sized rasters and anything above the configured caps.
    pub fn check(&self, width: u32, height: u32) -> RasterResult<()> {
        if width == 0 || height == 0 {
            return Err(RasterError::validation(format!(
                "texture dimensions must be non-zero, got {width}x{height}"
            )));
        }
        if let Some(max) = self.max_width
            && width > max
        {
            return Err(RasterError::limit(format!("width {width} exceeds {max}")));
        }
        if let Some(max) = self.max_height
            && height > max
        {
            return Err(RasterError::limit(format!("height {height} exceeds {max}")));
        }
        let pixels = u64::from(width) * u64::from(height);
        if let Some(max) = self.max_pixels
            && pixels > max
        {
            return Err(RasterError::limit(format!(
                "{width}x{height} ({pixels} pixels) exceeds {max} pixels"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/limits.rs"]
mod tests;
