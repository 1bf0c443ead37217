use super::*;

fn red() -> Rgba {
    Rgba::rgb(1.0, 0.0, 0.0)
}

#[test]
fn new_buffer_is_transparent_dirty_and_unmodified() {
    let buf = PixelBuffer::new("t", 3, 2).unwrap();
    assert_eq!(buf.dimensions(), (3, 2));
    assert_eq!(buf.as_rgba8().len(), 3 * 2 * 4);
    assert!(buf.as_rgba8().iter().all(|&b| b == 0));
    assert!(buf.is_dirty());
    assert!(!buf.is_modified());
    assert_eq!(buf.overflow_mode(), "error");
    assert_eq!(buf.to_string(), "t (3x2) (Texture)");
}

#[test]
fn zero_sized_buffers_are_rejected() {
    assert!(PixelBuffer::new("t", 0, 1).is_err());
    assert!(PixelBuffer::from_rgba8("t", 2, 2, vec![0; 15]).is_err());
}

#[test]
fn set_pixel_accepts_rgb_rgba_and_tuples() {
    let mut buf = PixelBuffer::new("t", 2, 1).unwrap();
    buf.set_pixel(0, 0, [1.0, 0.0, 0.0]).unwrap();
    buf.set_pixel(1, 0, (0.0, 1.0, 0.0, 0.5)).unwrap();
    assert_eq!(buf.get_pixel(0, 0).unwrap(), red());
    let g = buf.get_pixel(1, 0).unwrap();
    assert_eq!(g.g, 1.0);
    assert!((g.a - 128.0 / 255.0).abs() < 1e-9);
}

#[test]
fn first_write_takes_backup_and_restore_reverts() {
    let mut buf = PixelBuffer::new("t", 2, 2).unwrap();
    buf.set_pixel(1, 1, red()).unwrap();
    assert!(buf.is_modified());

    buf.set_pixel(0, 0, red()).unwrap();
    buf.restore();
    assert!(!buf.is_modified());
    assert!(buf.as_rgba8().iter().all(|&b| b == 0));
}

#[test]
fn restore_is_idempotent() {
    let mut buf = PixelBuffer::new("t", 2, 2).unwrap();
    buf.set_pixel(0, 0, red()).unwrap();
    buf.restore();
    let once = buf.as_rgba8().to_vec();
    buf.restore();
    assert_eq!(buf.as_rgba8(), once.as_slice());

    let mut fresh = PixelBuffer::new("t", 1, 1).unwrap();
    fresh.restore();
    assert!(!fresh.is_modified());
}

#[test]
fn restore_starts_a_new_epoch() {
    let mut buf = PixelBuffer::new("t", 1, 1).unwrap();
    buf.set_pixel(0, 0, red()).unwrap();
    buf.restore();

    buf.set_pixel(0, 0, Rgba::rgb(0.0, 0.0, 1.0)).unwrap();
    buf.restore();
    assert_eq!(buf.get(0, 0).unwrap(), Rgba::TRANSPARENT);
}

#[test]
fn set_without_backup_leaves_buffer_unmodified() {
    let mut buf = PixelBuffer::new("t", 1, 1).unwrap();
    buf.set(0, 0, red(), false).unwrap();
    assert!(!buf.is_modified());
    buf.restore();
    assert_eq!(buf.get(0, 0).unwrap(), red());
}

#[test]
fn writes_do_not_mark_dirty() {
    let mut buf = PixelBuffer::new("t", 1, 1).unwrap();
    let handle = buf.presentation_handle();
    assert!(handle.take_dirty());

    buf.set_pixel(0, 0, red()).unwrap();
    assert!(!buf.is_dirty());
    buf.update();
    buf.update();
    assert!(handle.take_dirty());
    assert!(!handle.take_dirty());
}

#[test]
fn get_pixel_respects_policy() {
    let mut buf = PixelBuffer::new("t", 4, 4).unwrap();
    buf.set_pixel(3, 0, red()).unwrap();

    assert!(matches!(
        buf.get_pixel(-1, 0),
        Err(RasterError::OutOfBounds { x: -1, y: 0, .. })
    ));

    buf.set_overflow_mode("wrap").unwrap();
    assert_eq!(buf.get_pixel(-1, 0).unwrap(), red());

    buf.set_overflow_mode("mirror").unwrap();
    assert_eq!(buf.get_pixel(4, 0).unwrap(), red());

    buf.set_overflow_mode("discard").unwrap();
    assert_eq!(buf.overflow_mode(), "ignore");
    assert!(buf.get_pixel(-1, 0).is_err());
}

#[test]
fn set_pixel_discard_is_silent_and_takes_no_backup() {
    let mut buf = PixelBuffer::new("t", 2, 2).unwrap();
    buf.set_overflow_policy(OverflowPolicy::Discard);
    buf.set_pixel(5, 5, red()).unwrap();
    assert!(!buf.is_modified());
    assert!(buf.as_rgba8().iter().all(|&b| b == 0));
}

#[test]
fn unknown_overflow_mode_keeps_previous_policy() {
    let mut buf = PixelBuffer::new("t", 1, 1).unwrap();
    buf.set_overflow_mode("wrap").unwrap();
    assert!(matches!(
        buf.set_overflow_mode("bogus"),
        Err(RasterError::UnknownPolicy { .. })
    ));
    assert_eq!(buf.overflow_mode(), "wrap");
}

#[test]
fn direct_access_is_bounds_checked() {
    let mut buf = PixelBuffer::new("t", 2, 2).unwrap();
    assert!(buf.get(2, 0).is_err());
    assert!(buf.set(0, 2, red(), true).is_err());
    assert!(!buf.is_modified());
}

#[test]
fn save_round_trips_through_decoder() {
    let mut buf = PixelBuffer::new("t", 3, 2).unwrap();
    buf.set_pixel(0, 0, red()).unwrap();
    buf.set_pixel(2, 1, (0.2, 0.4, 0.6, 0.8)).unwrap();

    let encoded = buf.save().unwrap();
    let back = PixelBuffer::from_base64("copy", &encoded).unwrap();
    assert_eq!(back.dimensions(), buf.dimensions());
    assert_eq!(back.as_rgba8(), buf.as_rgba8());
}

#[test]
fn placeholder_is_used_for_undecodable_bytes() {
    let buf = PixelBuffer::from_encoded_or_placeholder("broken", b"nope");
    assert_eq!(buf.dimensions(), (1, 1));
    assert_eq!(buf.name(), "broken");
}

#[test]
fn upload_if_dirty_pushes_once() {
    let buf = PixelBuffer::new("t", 1, 1).unwrap();
    let mut sink = InMemorySink::default();
    assert!(buf.upload_if_dirty(&mut sink).unwrap());
    assert!(!buf.upload_if_dirty(&mut sink).unwrap());
    buf.mark_updated();
    assert!(buf.upload_if_dirty(&mut sink).unwrap());
    assert_eq!(sink.0.len(), 2);
    assert_eq!(sink.0[0].rgba8, vec![0, 0, 0, 0]);
}

#[test]
fn failed_upload_keeps_buffer_dirty() {
    struct Refuse;
    impl TextureSink for Refuse {
        fn upload(&mut self, _upload: TextureUpload) -> RasterResult<()> {
            Err(RasterError::other("gpu lost"))
        }
    }

    let buf = PixelBuffer::new("t", 1, 1).unwrap();
    assert!(buf.upload_if_dirty(&mut Refuse).is_err());
    assert!(buf.is_dirty());
}

#[test]
fn to_rgba_image_matches_raster() {
    let mut buf = PixelBuffer::new("t", 2, 1).unwrap();
    buf.set_pixel(1, 0, red()).unwrap();
    let img = buf.to_rgba_image();
    assert_eq!(img.get_pixel(1, 0).0, [255, 0, 0, 255]);
    assert_eq!(img.get_pixel(0, 0).0, [0, 0, 0, 0]);
}

#[derive(Default)]
struct InMemorySink(Vec<TextureUpload>);

impl TextureSink for InMemorySink {
    fn upload(&mut self, upload: TextureUpload) -> RasterResult<()> {
        self.0.push(upload);
        Ok(())
    }
}
