use crate::foundation::error::{RasterError, RasterResult};
use crate::foundation::math::{floor_div, floor_mod};
use crate::policy::overflow::OverflowPolicy;

/// Result of resolving a virtual coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mapped {
    /// In-range coordinate to read or write.
    At(u32, u32),
    /// The coordinate is skipped.
    Discard,
}

/// Resolve `(x, y)` against a `width × height` raster under `policy`.
///
/// In-range coordinates are returned unchanged under every policy. Only
/// [`OverflowPolicy::Error`] fails.
pub fn map_coordinate(
    x: i64,
    y: i64,
    width: u32,
    height: u32,
    policy: OverflowPolicy,
) -> RasterResult<Mapped> {
    let (w, h) = (i64::from(width), i64::from(height));
    if (0..w).contains(&x) && (0..h).contains(&y) {
        return Ok(Mapped::At(x as u32, y as u32));
    }
    if width == 0 || height == 0 {
        return Err(RasterError::OutOfBounds {
            x,
            y,
            width,
            height,
        });
    }

    match policy {
        OverflowPolicy::Error => Err(RasterError::OutOfBounds {
            x,
            y,
            width,
            height,
        }),
        OverflowPolicy::Discard => Ok(Mapped::Discard),
        OverflowPolicy::Wrap => Ok(Mapped::At(floor_mod(x, w) as u32, floor_mod(y, h) as u32)),
        OverflowPolicy::Mirror => Ok(Mapped::At(mirror_axis(x, w), mirror_axis(y, h))),
    }
}

// Odd replicas along an axis are flipped; replica 0 is the raster itself.
fn mirror_axis(v: i64, dim: i64) -> u32 {
    let replica = floor_div(v, dim);
    let local = floor_mod(v, dim);
    let local = if floor_mod(replica, 2) == 1 {
        (dim - 1) - local
    } else {
        local
    };
    local as u32
}

#[cfg(test)]
#[path = "../../tests/unit/policy/mapper.rs"]
mod tests;
