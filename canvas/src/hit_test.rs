use super::*;
use crate::consts::NODE_SIZE;

fn node_at_center(cx: f64, cy: f64) -> Rect {
    Rect::new(cx - NODE_SIZE / 2.0, cy - NODE_SIZE / 2.0, NODE_SIZE, NODE_SIZE)
}

// =============================================================
// Rect
// =============================================================

#[test]
fn center_of_rect() {
    let rect = Rect::new(10.0, 20.0, 40.0, 60.0);
    assert_eq!(rect.center(), Point::new(30.0, 50.0));
}

#[test]
fn inflation_grows_every_side() {
    let rect = Rect::new(100.0, 100.0, 50.0, 50.0).inflated(70.0);
    assert_eq!(rect, Rect::new(30.0, 30.0, 190.0, 190.0));
}

#[test]
fn contains_is_edge_inclusive() {
    let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
    assert!(rect.contains(Point::new(0.0, 0.0)));
    assert!(rect.contains(Point::new(10.0, 10.0)));
    assert!(!rect.contains(Point::new(10.1, 10.0)));
}

// =============================================================
// is_over_bin
// =============================================================

#[test]
fn node_center_inside_inflated_region_hits() {
    let bin = Rect::new(500.0, 500.0, 40.0, 40.0);
    // Node center at the bin's own edge, well inside the inflated region.
    assert!(is_over_bin(&node_at_center(500.0, 520.0), &bin));
    // Node center in the inflation margin only.
    assert!(is_over_bin(&node_at_center(450.0, 520.0), &bin));
}

#[test]
fn node_center_exactly_on_inflated_edge_hits() {
    let bin = Rect::new(500.0, 500.0, 40.0, 40.0);
    // Inflated left edge sits at x = 430.
    assert!(is_over_bin(&node_at_center(430.0, 520.0), &bin));
}

#[test]
fn node_center_one_unit_outside_inflated_edge_misses() {
    let bin = Rect::new(500.0, 500.0, 40.0, 40.0);
    assert!(!is_over_bin(&node_at_center(429.0, 520.0), &bin));
}

#[test]
fn node_overlapping_but_center_outside_misses() {
    let bin = Rect::new(500.0, 500.0, 40.0, 40.0);
    // The node's bounding box reaches the inflated region, its center does not.
    let node = node_at_center(430.0 - NODE_SIZE / 2.0, 520.0);
    assert!(!is_over_bin(&node, &bin));
}

// =============================================================
// BinLayout
// =============================================================

#[test]
fn delete_bin_wins_over_complete_when_both_hit() {
    let bins = BinLayout {
        delete: Rect::new(0.0, 0.0, 40.0, 40.0),
        complete: Rect::new(60.0, 0.0, 40.0, 40.0),
    };
    // Inside both inflated regions.
    assert_eq!(bins.hit(&node_at_center(50.0, 20.0)), Some(BinKind::Delete));
}

#[test]
fn bin_layout_reports_complete_and_none() {
    let bins = BinLayout {
        delete: Rect::new(0.0, 0.0, 40.0, 40.0),
        complete: Rect::new(1000.0, 0.0, 40.0, 40.0),
    };
    assert_eq!(bins.hit(&node_at_center(1020.0, 20.0)), Some(BinKind::Complete));
    assert_eq!(bins.hit(&node_at_center(500.0, 500.0)), None);
}
