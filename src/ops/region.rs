//! Bulk edits over rectangular regions of virtual coordinates.
//!
//! Every region operation takes the buffer's backup before its first write, resolves each
//! coordinate through the active overflow policy in row-major order, and rolls back every write it
//! made if any coordinate fails. A reported failure never leaves the buffer half-edited.

use crate::foundation::core::{ColorMatrix, Region, Rgba};
use crate::foundation::error::{RasterError, RasterResult};
use crate::ops::elementwise::ElementwiseOp;
use crate::policy::mapper::Mapped;
use crate::raster::buffer::PixelBuffer;

/// One resolved pixel visited by a region operation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Texel {
    /// Virtual x coordinate.
    pub x: i64,
    /// Virtual y coordinate.
    pub y: i64,
    /// Resolved x coordinate.
    pub mapped_x: u32,
    /// Resolved y coordinate.
    pub mapped_y: u32,
    /// Current color at the resolved coordinate.
    pub color: Rgba,
}

/// Pre-call bytes of every pixel one region operation wrote, at most one entry per pixel.
struct Journal {
    writes: Vec<(usize, [u8; 4])>,
    seen: Vec<u64>,
    took_backup: bool,
}

impl Journal {
    fn new(pixel_count: usize, took_backup: bool) -> Self {
        Self {
            writes: Vec::new(),
            seen: vec![0; pixel_count.div_ceil(64)],
            took_backup,
        }
    }

    /// Remember `old` as the pre-call value of byte offset `i` unless it is already recorded.
    fn record(&mut self, i: usize, old: [u8; 4]) {
        let px = i / 4;
        let (word, bit) = (px / 64, 1u64 << (px % 64));
        if self.seen[word] & bit == 0 {
            self.seen[word] |= bit;
            self.writes.push((i, old));
        }
    }

    /// Distinct pixels written so far.
    fn written(&self) -> u64 {
        self.writes.len() as u64
    }

    fn rollback(self, buf: &mut PixelBuffer) {
        tracing::warn!(
            texture = %buf.name(),
            pixels = self.writes.len(),
            "region operation failed, rolling back"
        );
        for (i, old) in self.writes {
            buf.write_at(i, old);
        }
        if self.took_backup {
            buf.discard_backup();
        }
    }
}

/// Drives region operations over one exclusively borrowed buffer.
pub struct RegionEditor<'a> {
    buffer: &'a mut PixelBuffer,
}

impl<'a> RegionEditor<'a> {
    /// Borrow `buffer` for editing.
    pub fn new(buffer: &'a mut PixelBuffer) -> Self {
        Self { buffer }
    }

    /// Set every resolved pixel of `region` to `color`.
    #[tracing::instrument(level = "debug", skip_all, fields(texture = %self.buffer.name(), region = ?region))]
    pub fn fill(&mut self, region: Region, color: Rgba) -> RasterResult<u64> {
        let px = color.clamped();
        self.run(region, |_| Ok(Some(px)))
    }

    /// Replace each resolved pixel with `transform(color, x, y)`.
    ///
    /// `x` and `y` are the virtual coordinates. Returning `Ok(None)` leaves the pixel as is;
    /// an error aborts the operation and rolls it back. Calls happen in row-major order.
    #[tracing::instrument(level = "debug", skip_all, fields(texture = %self.buffer.name(), region = ?region))]
    pub fn apply_fn<F>(&mut self, region: Region, mut transform: F) -> RasterResult<u64>
    where
        F: FnMut(Rgba, i64, i64) -> RasterResult<Option<Rgba>>,
    {
        self.run(region, |t| transform(t.color, t.x, t.y))
    }

    /// Multiply each resolved pixel by `matrix` and clamp every channel.
    #[tracing::instrument(level = "debug", skip_all, fields(texture = %self.buffer.name(), region = ?region))]
    pub fn apply_matrix(&mut self, region: Region, matrix: &ColorMatrix) -> RasterResult<u64> {
        self.run(region, |t| Ok(Some(matrix.transform(t.color).clamped())))
    }

    /// Combine each resolved pixel with the same pixel of `other` using `op`, then clamp.
    #[tracing::instrument(level = "debug", skip_all, fields(texture = %self.buffer.name(), region = ?region, op = op.name()))]
    pub fn combine(
        &mut self,
        other: &PixelBuffer,
        region: Region,
        op: ElementwiseOp,
    ) -> RasterResult<u64> {
        self.combine_with(other, region, |a, b| Ok(op.apply(a, b)))
    }

    /// Like [`RegionEditor::combine`] with a caller-supplied, fallible operator.
    ///
    /// Fails with [`RasterError::DimensionMismatch`] before touching anything when the buffers
    /// differ in size.
    pub fn combine_with<F>(
        &mut self,
        other: &PixelBuffer,
        region: Region,
        mut op: F,
    ) -> RasterResult<u64>
    where
        F: FnMut(Rgba, Rgba) -> RasterResult<Rgba>,
    {
        let (this_w, this_h) = self.buffer.dimensions();
        let (other_w, other_h) = other.dimensions();
        if (this_w, this_h) != (other_w, other_h) {
            return Err(RasterError::DimensionMismatch {
                this_w,
                this_h,
                other_w,
                other_h,
            });
        }
        self.run(region, |t| {
            let b = other.get(t.mapped_x, t.mapped_y)?;
            Ok(Some(op(t.color, b)?.clamped()))
        })
    }

    /// Visit every resolved pixel of `region`, writing whatever `step` returns.
    ///
    /// Returns the number of distinct pixels written. A region whose far edge overflows `i64`
    /// is rejected before the backup is taken.
    fn run<F>(&mut self, region: Region, mut step: F) -> RasterResult<u64>
    where
        F: FnMut(Texel) -> RasterResult<Option<Rgba>>,
    {
        if !region.is_representable() {
            return Err(RasterError::validation(format!(
                "region {}x{} at ({}, {}) extends past the coordinate range",
                region.w, region.h, region.x, region.y
            )));
        }

        let buf = &mut *self.buffer;
        let (w, h) = buf.dimensions();
        let took_backup = buf.ensure_backup();
        let mut journal = Journal::new(w as usize * h as usize, took_backup);

        for (x, y) in region.coords() {
            let (mx, my) = match buf.map(x, y) {
                Ok(Mapped::At(mx, my)) => (mx, my),
                Ok(Mapped::Discard) => continue,
                Err(err) => {
                    journal.rollback(buf);
                    return Err(err);
                }
            };
            let i = buf.index(mx, my);
            let old = buf.read_at(i);
            let texel = Texel {
                x,
                y,
                mapped_x: mx,
                mapped_y: my,
                color: Rgba::from_rgba8(old),
            };
            match step(texel) {
                Ok(Some(color)) => {
                    journal.record(i, old);
                    buf.write_at(i, color.to_rgba8());
                }
                Ok(None) => {}
                Err(cause) => {
                    journal.rollback(buf);
                    return Err(RasterError::region_failed(x, y, mx, my, cause));
                }
            }
        }

        Ok(journal.written())
    }
}

impl PixelBuffer {
    /// Borrow this buffer in a [`RegionEditor`].
    pub fn editor(&mut self) -> RegionEditor<'_> {
        RegionEditor::new(self)
    }

    /// Fill `[x, x + w) × [y, y + h)` with `color`.
    pub fn fill(
        &mut self,
        x: i64,
        y: i64,
        w: u32,
        h: u32,
        color: impl Into<Rgba>,
    ) -> RasterResult<()> {
        self.editor().fill(Region::new(x, y, w, h), color.into())?;
        Ok(())
    }

    /// Apply a per-pixel transform; see [`RegionEditor::apply_fn`].
    pub fn apply_fn<F>(&mut self, x: i64, y: i64, w: u32, h: u32, transform: F) -> RasterResult<()>
    where
        F: FnMut(Rgba, i64, i64) -> RasterResult<Option<Rgba>>,
    {
        self.editor().apply_fn(Region::new(x, y, w, h), transform)?;
        Ok(())
    }

    /// Apply a 4x4 color matrix with clamping.
    pub fn apply_matrix(
        &mut self,
        x: i64,
        y: i64,
        w: u32,
        h: u32,
        matrix: &ColorMatrix,
    ) -> RasterResult<()> {
        self.editor().apply_matrix(Region::new(x, y, w, h), matrix)?;
        Ok(())
    }

    /// Combine with `other` over a region using `op`.
    pub fn combine(
        &mut self,
        other: &PixelBuffer,
        x: i64,
        y: i64,
        w: u32,
        h: u32,
        op: ElementwiseOp,
    ) -> RasterResult<()> {
        self.editor().combine(other, Region::new(x, y, w, h), op)?;
        Ok(())
    }

    /// `self * other` over a region, clamped.
    pub fn multiply(
        &mut self,
        other: &PixelBuffer,
        x: i64,
        y: i64,
        w: u32,
        h: u32,
    ) -> RasterResult<()> {
        self.combine(other, x, y, w, h, ElementwiseOp::Multiply)
    }

    /// `self / other` over a region, clamped.
    pub fn divide(
        &mut self,
        other: &PixelBuffer,
        x: i64,
        y: i64,
        w: u32,
        h: u32,
    ) -> RasterResult<()> {
        self.combine(other, x, y, w, h, ElementwiseOp::Divide)
    }

    /// `self + other` over a region, clamped.
    pub fn add(&mut self, other: &PixelBuffer, x: i64, y: i64, w: u32, h: u32) -> RasterResult<()> {
        self.combine(other, x, y, w, h, ElementwiseOp::Add)
    }

    /// `self - other` over a region, clamped.
    pub fn subtract(
        &mut self,
        other: &PixelBuffer,
        x: i64,
        y: i64,
        w: u32,
        h: u32,
    ) -> RasterResult<()> {
        self.combine(other, x, y, w, h, ElementwiseOp::Subtract)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/ops/region.rs"]
mod tests;
