use super::*;

#[test]
fn manual_clock_tracks_attachment() {
    let mut clock = ManualClock::default();
    assert!(!clock.is_attached());
    clock.attach(0);
    assert_eq!(clock.fps(), Some(1));
    clock.attach(30);
    assert_eq!(clock.fps(), Some(30));
    clock.detach();
    assert!(!clock.is_attached());
}

#[test]
fn pacer_counts_elapsed_periods() {
    let mut pacer = FramePacer::default();
    assert_eq!(pacer.due_ticks(Instant::now()), 0);

    pacer.attach(10);
    assert_eq!(pacer.period(), Some(Duration::from_millis(100)));
    let start = Instant::now();
    assert_eq!(pacer.due_ticks(start), 0);
    assert_eq!(pacer.due_ticks(start + Duration::from_millis(350)), 3);
    assert!(pacer.until_next(start + Duration::from_millis(350)).unwrap() <= Duration::from_millis(100));

    pacer.detach();
    assert_eq!(pacer.due_ticks(start + Duration::from_secs(5)), 0);
    assert!(pacer.until_next(start).is_none());
}
