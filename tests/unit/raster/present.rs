use super::*;

#[test]
fn take_clears_and_reports_previous_state() {
    let flag = DirtyFlag::new(false);
    let handle = PresentationHandle::new(flag.clone());
    assert!(!handle.take_dirty());

    flag.mark();
    flag.mark();
    assert!(handle.is_dirty());
    assert!(handle.take_dirty());
    assert!(!handle.is_dirty());
}

#[test]
fn flag_is_visible_across_threads() {
    let flag = DirtyFlag::new(false);
    let handle = PresentationHandle::new(flag.clone());
    let t = std::thread::spawn(move || flag.mark());
    t.join().unwrap();
    assert!(handle.take_dirty());
}

#[test]
fn channel_sink_forwards_and_reports_closed_receiver() {
    let (mut tx, rx) = std::sync::mpsc::channel::<TextureUpload>();
    let up = TextureUpload {
        width: 1,
        height: 1,
        rgba8: vec![1, 2, 3, 4],
    };
    tx.upload(up.clone()).unwrap();
    assert_eq!(rx.recv().unwrap(), up);

    drop(rx);
    assert!(tx.upload(up).is_err());
}
