//! rastertex is a bounds-safe RGBA pixel-buffer engine for hosts that let untrusted code edit
//! shared image memory.
//!
//! # Model
//!
//! - A [`PixelBuffer`] owns a fixed-size straight-alpha RGBA8 raster. Channels are exposed as
//!   `f64` in `[0, 1]`; quantization happens only at the storage boundary.
//! - Every caller coordinate is *virtual* and is resolved through the buffer's
//!   [`OverflowPolicy`]: `error`, `ignore`/`discard`, `wrap`, or `mirror` (tiled, alternately
//!   flipped replicas).
//! - The first mutation of a modification epoch snapshots the raster; [`PixelBuffer::restore`]
//!   reverts to it and ends the epoch.
//! - Region operations ([`RegionEditor`]) are atomic: on failure every write they made is
//!   rolled back before the error is returned.
//! - The dirty flag is the only cross-thread state. Presentation consumers observe it through a
//!   [`PresentationHandle`] or pull uploads with [`PixelBuffer::upload_if_dirty`].
//!
//! The engine performs no GPU or network IO.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;
mod ops;
mod plan;
mod policy;
mod raster;

pub use foundation::core::{ColorMatrix, Region, Rgba};
pub use foundation::error::{RasterError, RasterResult};
pub use foundation::limits::BufferLimits;
pub use ops::elementwise::ElementwiseOp;
pub use ops::region::{RegionEditor, Texel};
pub use plan::edit::{EditPlan, EditStep, PlanReport};
pub use policy::mapper::{Mapped, map_coordinate};
pub use policy::overflow::{OverflowPolicy, known_names};
pub use raster::buffer::{BufferOpts, PixelBuffer};
pub use raster::present::{InMemoryTextureSink, PresentationHandle, TextureSink, TextureUpload};
