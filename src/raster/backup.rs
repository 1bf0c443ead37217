/// Copy-on-first-mutate snapshot of a raster.
///
/// At most one snapshot exists per modification epoch. It is taken by the first mutating call and
/// consumed by [`BackupStore::restore_into`].
#[derive(Clone, Debug, Default)]
pub(crate) struct BackupStore {
    snapshot: Option<Vec<u8>>,
}

impl BackupStore {
    pub(crate) fn is_active(&self) -> bool {
        self.snapshot.is_some()
    }

    /// Take a snapshot of `pixels` unless one already exists. Returns `true` when a new one was
    /// taken.
    pub(crate) fn ensure(&mut self, pixels: &[u8]) -> bool {
        if self.snapshot.is_some() {
            return false;
        }
        self.snapshot = Some(pixels.to_vec());
        true
    }

    /// Copy the snapshot over `pixels` and end the epoch. No-op without a snapshot.
    pub(crate) fn restore_into(&mut self, pixels: &mut [u8]) -> bool {
        match self.snapshot.take() {
            Some(snapshot) => {
                debug_assert_eq!(snapshot.len(), pixels.len());
                pixels.copy_from_slice(&snapshot);
                true
            }
            None => false,
        }
    }

    /// Drop the snapshot without touching the raster.
    pub(crate) fn discard(&mut self) {
        self.snapshot = None;
    }

    pub(crate) fn pixels(&self) -> Option<&[u8]> {
        self.snapshot.as_deref()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/raster/backup.rs"]
mod tests;
