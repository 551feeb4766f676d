use super::*;

fn base() -> Instant {
    Instant::now()
}

// =============================================================
// Throttle
// =============================================================

#[test]
fn first_value_passes_immediately() {
    let mut throttle = Throttle::new(Duration::from_millis(100));
    assert_eq!(throttle.admit(1, base()), Some(1));
}

#[test]
fn values_inside_window_are_suppressed() {
    let t0 = base();
    let mut throttle = Throttle::new(Duration::from_millis(100));
    assert_eq!(throttle.admit(1, t0), Some(1));
    assert_eq!(throttle.admit(2, t0 + Duration::from_millis(10)), None);
    assert_eq!(throttle.admit(3, t0 + Duration::from_millis(99)), None);
}

#[test]
fn value_after_window_passes_again() {
    let t0 = base();
    let mut throttle = Throttle::new(Duration::from_millis(100));
    assert_eq!(throttle.admit(1, t0), Some(1));
    assert_eq!(throttle.admit(2, t0 + Duration::from_millis(100)), Some(2));
}

#[test]
fn trailing_releases_last_suppressed_value_once() {
    let t0 = base();
    let mut throttle = Throttle::new(Duration::from_millis(100));
    assert_eq!(throttle.admit(1, t0), Some(1));
    assert_eq!(throttle.admit(2, t0 + Duration::from_millis(10)), None);
    assert_eq!(throttle.admit(3, t0 + Duration::from_millis(20)), None);

    assert_eq!(throttle.poll_trailing(t0 + Duration::from_millis(99)), None);
    assert_eq!(throttle.poll_trailing(t0 + Duration::from_millis(100)), Some(3));
    assert_eq!(throttle.poll_trailing(t0 + Duration::from_millis(300)), None);
}

#[test]
fn reset_discards_trailing_value() {
    let t0 = base();
    let mut throttle = Throttle::new(Duration::from_millis(100));
    throttle.admit(1, t0);
    throttle.admit(2, t0 + Duration::from_millis(10));
    throttle.reset();
    assert_eq!(throttle.poll_trailing(t0 + Duration::from_millis(500)), None);
    // And the leading edge is open again.
    assert_eq!(throttle.admit(9, t0 + Duration::from_millis(11)), Some(9));
}

// =============================================================
// DebounceMap
// =============================================================

#[test]
fn nothing_fires_before_the_window() {
    let t0 = base();
    let mut map = DebounceMap::new(Duration::from_millis(750));
    map.push(1, "a", t0);
    assert!(map.poll_due(t0 + Duration::from_millis(749)).is_empty());
}

#[test]
fn key_fires_exactly_at_the_deadline_with_last_value() {
    let t0 = base();
    let mut map = DebounceMap::new(Duration::from_millis(750));
    map.push(1, "a", t0);
    map.push(1, "b", t0 + Duration::from_millis(100));
    map.push(1, "c", t0 + Duration::from_millis(200));

    // The last push re-armed the window to 200 + 750 = 950.
    assert!(map.poll_due(t0 + Duration::from_millis(949)).is_empty());
    let fired = map.poll_due(t0 + Duration::from_millis(950));
    assert_eq!(fired, vec![(1, "c")]);
    assert!(map.is_empty());
}

#[test]
fn keys_debounce_independently() {
    let t0 = base();
    let mut map = DebounceMap::new(Duration::from_millis(750));
    map.push(1, "a", t0);
    map.push(2, "b", t0 + Duration::from_millis(500));

    let first = map.poll_due(t0 + Duration::from_millis(750));
    assert_eq!(first, vec![(1, "a")]);

    let second = map.poll_due(t0 + Duration::from_millis(1250));
    assert_eq!(second, vec![(2, "b")]);
}

#[test]
fn cancel_removes_a_pending_key() {
    let t0 = base();
    let mut map = DebounceMap::new(Duration::from_millis(750));
    map.push(1, "a", t0);
    assert_eq!(map.cancel(&1), Some("a"));
    assert!(map.poll_due(t0 + Duration::from_secs(10)).is_empty());
}

#[test]
fn clear_discards_without_flushing() {
    let t0 = base();
    let mut map = DebounceMap::new(Duration::from_millis(750));
    map.push(1, "a", t0);
    map.push(2, "b", t0);
    map.clear();
    assert!(map.is_empty());
    assert!(map.poll_due(t0 + Duration::from_secs(10)).is_empty());
}

#[test]
fn next_deadline_tracks_the_earliest_key() {
    let t0 = base();
    let mut map = DebounceMap::new(Duration::from_millis(750));
    assert!(map.next_deadline().is_none());
    map.push(1, "a", t0 + Duration::from_millis(100));
    map.push(2, "b", t0);
    assert_eq!(map.next_deadline(), Some(t0 + Duration::from_millis(750)));
}
