use std::io::Cursor;
use std::path::Path;

use anyhow::Context;
use base64::Engine as _;

use crate::foundation::error::{RasterError, RasterResult};
use crate::foundation::limits::BufferLimits;

/// Decoded straight-alpha RGBA8 raster.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct DecodedRaster {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) rgba8: Vec<u8>,
}

/// Decode encoded image bytes (any format the `image` crate was built with) to RGBA8.
pub(crate) fn decode_rgba8(bytes: &[u8], limits: &BufferLimits) -> RasterResult<DecodedRaster> {
    let mut reader = image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .context("sniff image format")?;
    let mut decode_limits = image::Limits::default();
    decode_limits.max_image_width = limits.max_width;
    decode_limits.max_image_height = limits.max_height;
    reader.limits(decode_limits);

    let decoded = reader
        .decode()
        .map_err(|e| RasterError::codec(format!("decode image from memory: {e}")))?;
    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();
    limits.check(width, height)?;

    Ok(DecodedRaster {
        width,
        height,
        rgba8: rgba.into_raw(),
    })
}

/// Encode a straight-alpha RGBA8 raster as PNG.
pub(crate) fn encode_png(width: u32, height: u32, rgba8: &[u8]) -> RasterResult<Vec<u8>> {
    let img = image::RgbaImage::from_raw(width, height, rgba8.to_vec())
        .ok_or_else(|| RasterError::codec("raster length does not match dimensions"))?;
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .context("encode png")?;
    Ok(buf)
}

/// Write a raster to `path`, choosing the format from the extension.
pub(crate) fn write_file(path: &Path, width: u32, height: u32, rgba8: &[u8]) -> RasterResult<()> {
    let img = image::RgbaImage::from_raw(width, height, rgba8.to_vec())
        .ok_or_else(|| RasterError::codec("raster length does not match dimensions"))?;
    img.save(path)
        .with_context(|| format!("write image to {}", path.display()))?;
    Ok(())
}

pub(crate) fn to_base64(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

pub(crate) fn from_base64(s: &str) -> RasterResult<Vec<u8>> {
    base64::engine::general_purpose::STANDARD
        .decode(s.trim())
        .map_err(|e| RasterError::codec(format!("invalid base64 image data: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/raster/codec.rs"]
mod tests;
