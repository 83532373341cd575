use super::*;

#[test]
fn frame_range_contains_boundaries() {
    let r = FrameRange::new(2, 5).unwrap();
    assert!(!r.contains(1));
    assert!(r.contains(2));
    assert!(r.contains(4));
    assert!(!r.contains(5));
    assert_eq!(r.last(), Some(4));
    assert!(FrameRange::new(3, 1).is_err());
}

#[test]
fn frame_range_clips_to_movie_length() {
    let r = FrameRange::with_len(10, 20).clip_to(15);
    assert_eq!(r, FrameRange { start: 10, end: 15 });
    let r = FrameRange::with_len(30, 5).clip_to(15);
    assert!(r.is_empty());
    assert_eq!(r.last(), None);
}

#[test]
fn rgba_clamps_channels() {
    let c = Rgba::new(2.0, -1.0, f32::NAN, 0.5);
    assert_eq!(c, Rgba::new(1.0, 0.0, 0.0, 0.5));
    assert_eq!(Rgba::TRANSPARENT.a, 0.0);
}
