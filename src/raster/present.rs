use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
    mpsc::Sender,
};

use crate::foundation::error::{RasterError, RasterResult};

/// Dirty flag shared between a buffer and its presentation consumer.
///
/// The owner publishes with `Release` after its raster writes; the consumer observes with
/// `Acquire`, so everything written before [`DirtyFlag::mark`] is visible once the flag is seen.
#[derive(Clone, Debug)]
pub(crate) struct DirtyFlag(Arc<AtomicBool>);

impl DirtyFlag {
    pub(crate) fn new(dirty: bool) -> Self {
        Self(Arc::new(AtomicBool::new(dirty)))
    }

    pub(crate) fn mark(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub(crate) fn is_set(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub(crate) fn take(&self) -> bool {
        self.0.swap(false, Ordering::AcqRel)
    }
}

/// Consumer-side view of a buffer's dirty flag.
///
/// Handed to a render/presentation collaborator running on its own schedule. It never blocks the
/// buffer owner.
#[derive(Clone, Debug)]
pub struct PresentationHandle {
    dirty: DirtyFlag,
}

impl PresentationHandle {
    pub(crate) fn new(dirty: DirtyFlag) -> Self {
        Self { dirty }
    }

    /// Return `true` when the owner has requested a re-upload.
    pub fn is_dirty(&self) -> bool {
        self.dirty.is_set()
    }

    /// Clear the flag, returning whether it was set.
    pub fn take_dirty(&self) -> bool {
        self.dirty.take()
    }
}

/// One raster upload handed to a presentation collaborator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextureUpload {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major straight-alpha RGBA8.
    pub rgba8: Vec<u8>,
}

/// Receiver of raster uploads, e.g. a GPU texture uploader.
pub trait TextureSink {
    /// Take ownership of one upload.
    fn upload(&mut self, upload: TextureUpload) -> RasterResult<()>;
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemoryTextureSink {
    uploads: Vec<TextureUpload>,
}

impl InMemoryTextureSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Uploads received so far, oldest first.
    pub fn uploads(&self) -> &[TextureUpload] {
        &self.uploads
    }
}

impl TextureSink for InMemoryTextureSink {
    fn upload(&mut self, upload: TextureUpload) -> RasterResult<()> {
        self.uploads.push(upload);
        Ok(())
    }
}

// Hands uploads to a render thread.
impl TextureSink for Sender<TextureUpload> {
    fn upload(&mut self, upload: TextureUpload) -> RasterResult<()> {
        self.send(upload)
            .map_err(|_| RasterError::other("presentation channel closed"))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/raster/present.rs"]
mod tests;
