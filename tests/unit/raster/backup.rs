use super::*;

#[test]
fn ensure_snapshots_only_once_per_epoch() {
    let mut store = BackupStore::default();
    assert!(!store.is_active());
    assert!(store.ensure(&[1, 2, 3, 4]));
    assert!(!store.ensure(&[9, 9, 9, 9]));
    assert_eq!(store.pixels(), Some(&[1u8, 2, 3, 4][..]));
}

#[test]
fn restore_copies_and_ends_epoch() {
    let mut store = BackupStore::default();
    store.ensure(&[1, 2, 3, 4]);
    let mut live = [0u8; 4];
    assert!(store.restore_into(&mut live));
    assert_eq!(live, [1, 2, 3, 4]);
    assert!(!store.is_active());

    live = [5, 5, 5, 5];
    assert!(!store.restore_into(&mut live));
    assert_eq!(live, [5, 5, 5, 5]);
}

#[test]
fn discard_leaves_raster_untouched() {
    let mut store = BackupStore::default();
    store.ensure(&[1, 1, 1, 1]);
    store.discard();
    assert!(!store.is_active());
    assert!(store.ensure(&[2, 2, 2, 2]));
    assert_eq!(store.pixels(), Some(&[2u8, 2, 2, 2][..]));
}
