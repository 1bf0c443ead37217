use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::foundation::core::Rgba;
use crate::foundation::error::{RasterError, RasterResult};
use crate::foundation::limits::BufferLimits;
use crate::policy::mapper::{Mapped, map_coordinate};
use crate::policy::overflow::OverflowPolicy;
use crate::raster::backup::BackupStore;
use crate::raster::codec;
use crate::raster::present::{DirtyFlag, PresentationHandle, TextureSink, TextureUpload};

/// Construction-time options for a [`PixelBuffer`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BufferOpts {
    /// Initial overflow policy.
    pub overflow: OverflowPolicy,
    /// Allocation and decode caps.
    pub limits: BufferLimits,
}

/// Named, fixed-size RGBA raster with overflow-mapped access and a single-level backup.
///
/// Channels are exposed as `f64` in `[0, 1]` and stored as straight-alpha RGBA8. Mutation requires
/// `&mut self`; the dirty flag is the only state shared with other threads (see
/// [`PixelBuffer::presentation_handle`]).
pub struct PixelBuffer {
    name: String,
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    backup: BackupStore,
    dirty: DirtyFlag,
    overflow: OverflowPolicy,
}

impl PixelBuffer {
    /// Create a fully transparent buffer.
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> RasterResult<Self> {
        Self::with_opts(name, width, height, BufferOpts::default())
    }

    /// Create a fully transparent buffer with explicit options.
    pub fn with_opts(
        name: impl Into<String>,
        width: u32,
        height: u32,
        opts: BufferOpts,
    ) -> RasterResult<Self> {
        opts.limits.check(width, height)?;
        let len = pixel_len(width, height)?;
        Ok(Self::from_parts(name.into(), width, height, vec![0; len], opts))
    }

    /// Wrap existing row-major straight-alpha RGBA8 data.
    pub fn from_rgba8(
        name: impl Into<String>,
        width: u32,
        height: u32,
        rgba8: Vec<u8>,
    ) -> RasterResult<Self> {
        let opts = BufferOpts::default();
        opts.limits.check(width, height)?;
        let len = pixel_len(width, height)?;
        if rgba8.len() != len {
            return Err(RasterError::validation(format!(
                "expected {len} bytes for {width}x{height} rgba8, got {}",
                rgba8.len()
            )));
        }
        Ok(Self::from_parts(name.into(), width, height, rgba8, opts))
    }

    /// Decode an encoded image (PNG, JPEG, ...).
    pub fn from_encoded(name: impl Into<String>, bytes: &[u8]) -> RasterResult<Self> {
        Self::from_encoded_with_opts(name, bytes, BufferOpts::default())
    }

    /// Decode an encoded image with explicit options.
    pub fn from_encoded_with_opts(
        name: impl Into<String>,
        bytes: &[u8],
        opts: BufferOpts,
    ) -> RasterResult<Self> {
        let decoded = codec::decode_rgba8(bytes, &opts.limits)?;
        Ok(Self::from_parts(
            name.into(),
            decoded.width,
            decoded.height,
            decoded.rgba8,
            opts,
        ))
    }

    /// Decode an encoded image, falling back to a 1x1 transparent buffer on failure.
    pub fn from_encoded_or_placeholder(name: impl Into<String>, bytes: &[u8]) -> Self {
        let name = name.into();
        match Self::from_encoded(name.clone(), bytes) {
            Ok(buf) => buf,
            Err(err) => {
                tracing::error!(
                    texture = %name,
                    error = %err,
                    "failed to decode texture, using placeholder"
                );
                Self::from_parts(name, 1, 1, vec![0; 4], BufferOpts::default())
            }
        }
    }

    /// Decode base64-encoded image bytes, as produced by [`PixelBuffer::save`].
    pub fn from_base64(name: impl Into<String>, data: &str) -> RasterResult<Self> {
        let bytes = codec::from_base64(data)?;
        Self::from_encoded(name, &bytes)
    }

    fn from_parts(
        name: String,
        width: u32,
        height: u32,
        pixels: Vec<u8>,
        opts: BufferOpts,
    ) -> Self {
        Self {
            name,
            width,
            height,
            pixels,
            backup: BackupStore::default(),
            // A fresh buffer has never been uploaded.
            dirty: DirtyFlag::new(true),
            overflow: opts.overflow,
        }
    }

    /// Buffer name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)` in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Raw row-major RGBA8 bytes.
    pub fn as_rgba8(&self) -> &[u8] {
        &self.pixels
    }

    /// `true` while a backup exists, i.e. since the first mutation after the last restore.
    pub fn is_modified(&self) -> bool {
        self.backup.is_active()
    }

    /// Raster bytes captured at the start of the current epoch, if any.
    pub fn backup_rgba8(&self) -> Option<&[u8]> {
        self.backup.pixels()
    }

    /// `true` when the presentation side still has to upload this buffer.
    pub fn is_dirty(&self) -> bool {
        self.dirty.is_set()
    }

    /// Active overflow policy.
    pub fn overflow_policy(&self) -> OverflowPolicy {
        self.overflow
    }

    /// Replace the active overflow policy.
    pub fn set_overflow_policy(&mut self, policy: OverflowPolicy) {
        self.overflow = policy;
    }

    /// Set the overflow policy by name (`error`, `ignore`/`discard`, `wrap`, `mirror`).
    pub fn set_overflow_mode(&mut self, name: &str) -> RasterResult<()> {
        self.overflow = OverflowPolicy::from_name(name)?;
        Ok(())
    }

    /// Canonical name of the active overflow policy.
    pub fn overflow_mode(&self) -> &'static str {
        self.overflow.name()
    }

    /// Resolve a virtual coordinate through the active policy.
    pub fn map(&self, x: i64, y: i64) -> RasterResult<Mapped> {
        map_coordinate(x, y, self.width, self.height, self.overflow)
    }

    /// Read an in-range pixel without policy mapping.
    pub fn get(&self, x: u32, y: u32) -> RasterResult<Rgba> {
        let i = self.checked_index(x, y)?;
        Ok(Rgba::from_rgba8(self.read_at(i)))
    }

    /// Write an in-range pixel without policy mapping.
    ///
    /// With `make_backup`, a snapshot is taken first if the current epoch has none. Never marks
    /// the buffer dirty.
    pub fn set(&mut self, x: u32, y: u32, color: Rgba, make_backup: bool) -> RasterResult<()> {
        let i = self.checked_index(x, y)?;
        if make_backup {
            self.ensure_backup();
        }
        self.write_at(i, color.to_rgba8());
        Ok(())
    }

    /// Read a pixel at a virtual coordinate.
    ///
    /// Fails with [`RasterError::OutOfBounds`] when the coordinate does not resolve to a pixel,
    /// which includes discarded coordinates.
    pub fn get_pixel(&self, x: i64, y: i64) -> RasterResult<Rgba> {
        match self.map(x, y)? {
            Mapped::At(mx, my) => self.get(mx, my),
            Mapped::Discard => Err(self.out_of_bounds(x, y)),
        }
    }

    /// Write a pixel at a virtual coordinate. Discarded coordinates are a silent no-op.
    ///
    /// `color` may be `[r, g, b]` (alpha 1), `[r, g, b, a]` or an `(r, g, b, a)` tuple.
    pub fn set_pixel(&mut self, x: i64, y: i64, color: impl Into<Rgba>) -> RasterResult<()> {
        let color = color.into();
        match self.map(x, y)? {
            Mapped::At(mx, my) => self.set(mx, my, color, true),
            Mapped::Discard => Ok(()),
        }
    }

    /// Alias of [`PixelBuffer::set_pixel`].
    pub fn pixel(&mut self, x: i64, y: i64, color: impl Into<Rgba>) -> RasterResult<()> {
        self.set_pixel(x, y, color)
    }

    /// Request a re-upload on the next presentation pass. Idempotent.
    pub fn mark_updated(&self) {
        self.dirty.mark();
    }

    /// Alias of [`PixelBuffer::mark_updated`].
    pub fn update(&self) {
        self.mark_updated();
    }

    /// Revert to the backup taken at the start of the current epoch. No-op when unmodified.
    pub fn restore(&mut self) {
        if self.backup.restore_into(&mut self.pixels) {
            tracing::debug!(texture = %self.name, "restored texture from backup");
        }
    }

    /// Encode the current raster as PNG.
    pub fn snapshot_encode(&self) -> RasterResult<Vec<u8>> {
        codec::encode_png(self.width, self.height, &self.pixels)
    }

    /// Base64-encoded PNG of the current raster.
    pub fn save(&self) -> RasterResult<String> {
        Ok(codec::to_base64(&self.snapshot_encode()?))
    }

    /// Write the raster to `path`; the format follows the file extension.
    pub fn write_to_path(&self, path: impl AsRef<Path>) -> RasterResult<()> {
        codec::write_file(path.as_ref(), self.width, self.height, &self.pixels)
    }

    /// Copy the raster out as an `image` buffer.
    pub fn to_rgba_image(&self) -> image::RgbaImage {
        image::RgbaImage::from_fn(self.width, self.height, |x, y| {
            image::Rgba(self.read_at(self.index(x, y)))
        })
    }

    /// Consumer-side handle observing this buffer's dirty flag.
    pub fn presentation_handle(&self) -> PresentationHandle {
        PresentationHandle::new(self.dirty.clone())
    }

    /// Push the raster to `sink` if the buffer is dirty, clearing the flag.
    ///
    /// Returns whether an upload happened. The flag is restored when the sink fails.
    pub fn upload_if_dirty(&self, sink: &mut dyn TextureSink) -> RasterResult<bool> {
        if !self.dirty.take() {
            return Ok(false);
        }
        let upload = TextureUpload {
            width: self.width,
            height: self.height,
            rgba8: self.pixels.clone(),
        };
        if let Err(err) = sink.upload(upload) {
            self.dirty.mark();
            return Err(err);
        }
        Ok(true)
    }

    pub(crate) fn ensure_backup(&mut self) -> bool {
        let created = self.backup.ensure(&self.pixels);
        if created {
            tracing::debug!(texture = %self.name, "took texture backup");
        }
        created
    }

    pub(crate) fn discard_backup(&mut self) {
        self.backup.discard();
    }

    pub(crate) fn index(&self, x: u32, y: u32) -> usize {
        ((y as usize) * (self.width as usize) + (x as usize)) * 4
    }

    pub(crate) fn read_at(&self, i: usize) -> [u8; 4] {
        [
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ]
    }

    pub(crate) fn write_at(&mut self, i: usize, px: [u8; 4]) {
        self.pixels[i..i + 4].copy_from_slice(&px);
    }

    fn checked_index(&self, x: u32, y: u32) -> RasterResult<usize> {
        if x >= self.width || y >= self.height {
            return Err(self.out_of_bounds(i64::from(x), i64::from(y)));
        }
        Ok(self.index(x, y))
    }

    fn out_of_bounds(&self, x: i64, y: i64) -> RasterError {
        RasterError::OutOfBounds {
            x,
            y,
            width: self.width,
            height: self.height,
        }
    }
}

impl Clone for PixelBuffer {
    /// Deep copy of the raster, backup and policy. The clone gets its own dirty flag.
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            width: self.width,
            height: self.height,
            pixels: self.pixels.clone(),
            backup: self.backup.clone(),
            dirty: DirtyFlag::new(self.dirty.is_set()),
            overflow: self.overflow,
        }
    }
}

impl fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("name", &self.name)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("modified", &self.is_modified())
            .field("dirty", &self.is_dirty())
            .field("overflow", &self.overflow)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for PixelBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}x{}) (Texture)", self.name, self.width, self.height)
    }
}

fn pixel_len(width: u32, height: u32) -> RasterResult<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| RasterError::limit(format!("{width}x{height} raster size overflows")))
}

#[cfg(test)]
#[path = "../../tests/unit/raster/buffer.rs"]
mod tests;
