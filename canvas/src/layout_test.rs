use super::*;
use crate::consts::DEFAULT_CATEGORY_COLOR;
use crate::scene::{CategoryStyle, Scene, SceneNode};

fn style(id: i64, name: &str, color: Option<&str>) -> CategoryStyle {
    CategoryStyle { id, name: name.to_owned(), color: color.map(str::to_owned) }
}

fn node(id: i64, category_id: i64, x: f64, y: f64, completed: bool) -> SceneNode {
    SceneNode { id, category_id, center: Point::new(x, y), completed }
}

// =============================================================
// Label anchors
// =============================================================

#[test]
fn active_anchor_sits_above_topmost_node_at_mean_x() {
    let scene = Scene::new(
        [node(1, 7, 100.0, 300.0, false), node(2, 7, 300.0, 100.0, false)],
        [style(7, "infra", Some("#a855f7"))],
    );
    let anchors = label_anchors(&scene);
    assert_eq!(anchors.len(), 1);

    let anchor = &anchors[0];
    assert_eq!(anchor.category_id, 7);
    assert!(!anchor.completed);
    assert_eq!(anchor.text, "infra");
    assert_eq!(anchor.color, "#a855f7");
    // Mean x = 200, offset by NODE_SIZE * 0.8 - 80.
    assert!((anchor.position.x - (200.0 + ACTIVE_LABEL_X_OFFSET)).abs() < 1e-9);
    // Topmost center y = 100, risen by half a node + gap + rise.
    let expected_y = 100.0 - NODE_SIZE / 2.0 - CATEGORY_LABEL_GAP - LABEL_RISE;
    assert!((anchor.position.y - expected_y).abs() < 1e-9);
}

#[test]
fn completed_subset_gets_its_own_anchor() {
    let scene = Scene::new(
        [
            node(1, 7, 100.0, 100.0, false),
            node(2, 7, 500.0, 400.0, true),
            node(3, 7, 700.0, 600.0, true),
        ],
        [style(7, "infra", None)],
    );
    let anchors = label_anchors(&scene);
    assert_eq!(anchors.len(), 2);

    let done = anchors.iter().find(|a| a.completed).unwrap();
    assert_eq!(done.text, "Completed");
    assert_eq!(done.color, DEFAULT_CATEGORY_COLOR);
    assert!((done.position.x - (600.0 + COMPLETED_LABEL_X_OFFSET)).abs() < 1e-9);
    let expected_y = 400.0 - NODE_SIZE / 2.0 - CATEGORY_LABEL_GAP - LABEL_RISE;
    assert!((done.position.y - expected_y).abs() < 1e-9);
}

#[test]
fn category_with_no_members_produces_no_label() {
    let scene = Scene::new([node(1, 7, 0.0, 0.0, false)], [style(7, "infra", None), style(8, "empty", None)]);
    let anchors = label_anchors(&scene);
    assert_eq!(anchors.len(), 1);
    assert_eq!(anchors[0].category_id, 7);
}

#[test]
fn nodes_of_unknown_categories_are_skipped() {
    let scene = Scene::new([node(1, 99, 0.0, 0.0, false)], [style(7, "infra", None)]);
    assert!(label_anchors(&scene).is_empty());
    assert!(constellation(&scene).is_empty());
}

#[test]
fn drag_override_moves_the_anchor_mid_gesture() {
    let base = Scene::new(
        [node(1, 7, 100.0, 100.0, false), node(2, 7, 300.0, 300.0, false)],
        [style(7, "infra", None)],
    );
    let before = label_anchors(&base)[0].position;

    // Drag node 1 far upward: top-left (100, -300) puts its center at (124, -276).
    let dragged = base.with_drag_override(1, Point::new(100.0, -300.0));
    let after = label_anchors(&dragged)[0].position;

    assert!(after.y < before.y);
    let expected_y = -276.0 - NODE_SIZE / 2.0 - CATEGORY_LABEL_GAP - LABEL_RISE;
    assert!((after.y - expected_y).abs() < 1e-9);
}

// =============================================================
// Constellation segments
// =============================================================

#[test]
fn nodes_at_298_units_connect_and_at_300_do_not() {
    let near = Scene::new(
        [node(1, 7, 0.0, 0.0, false), node(2, 7, 298.0, 0.0, false)],
        [style(7, "infra", None)],
    );
    assert_eq!(constellation(&near).len(), 1);

    let far = Scene::new(
        [node(1, 7, 0.0, 0.0, false), node(2, 7, 300.0, 0.0, false)],
        [style(7, "infra", None)],
    );
    assert!(constellation(&far).is_empty());
}

#[test]
fn active_and_completed_nodes_never_connect() {
    let scene = Scene::new(
        [node(1, 7, 0.0, 0.0, false), node(2, 7, 10.0, 0.0, true)],
        [style(7, "infra", None)],
    );
    assert!(constellation(&scene).is_empty());
}

#[test]
fn completed_segments_are_dashed() {
    let scene = Scene::new(
        [node(1, 7, 0.0, 0.0, true), node(2, 7, 10.0, 0.0, true)],
        [style(7, "infra", None)],
    );
    let segments = constellation(&scene);
    assert_eq!(segments.len(), 1);
    assert!(segments[0].dashed);
}

#[test]
fn segments_do_not_cross_categories() {
    let scene = Scene::new(
        [node(1, 7, 0.0, 0.0, false), node(2, 8, 10.0, 0.0, false)],
        [style(7, "infra", None), style(8, "web", None)],
    );
    assert!(constellation(&scene).is_empty());
}

#[test]
fn every_close_pair_in_a_subset_connects() {
    let scene = Scene::new(
        [
            node(1, 7, 0.0, 0.0, false),
            node(2, 7, 100.0, 0.0, false),
            node(3, 7, 0.0, 100.0, false),
        ],
        [style(7, "infra", None)],
    );
    // Three nodes, all pairwise within range: 3 segments.
    assert_eq!(constellation(&scene).len(), 3);
}

#[test]
fn drag_override_breaks_and_forms_segments() {
    let scene = Scene::new(
        [node(1, 7, 0.0, 0.0, false), node(2, 7, 100.0, 0.0, false)],
        [style(7, "infra", None)],
    );
    assert_eq!(constellation(&scene).len(), 1);

    // Drag node 2 out of range: top-left x 1000 puts its center at 1024.
    let dragged = scene.with_drag_override(2, Point::new(1000.0, -NODE_SIZE / 2.0));
    assert!(constellation(&dragged).is_empty());
}

// =============================================================
// Label links
// =============================================================

#[test]
fn link_joins_active_and_completed_anchor_pair() {
    let scene = Scene::new(
        [node(1, 7, 100.0, 100.0, false), node(2, 7, 500.0, 500.0, true)],
        [style(7, "infra", Some("#10b981"))],
    );
    let anchors = label_anchors(&scene);
    let links = label_links(&anchors);
    assert_eq!(links.len(), 1);

    let link = &links[0];
    let active = anchors.iter().find(|a| !a.completed).unwrap();
    let done = anchors.iter().find(|a| a.completed).unwrap();
    assert_eq!(link.start.x, active.position.x + LABEL_LINK_ATTACH_DX);
    assert_eq!(link.start.y, active.position.y + LABEL_LINK_ATTACH_DY);
    assert_eq!(link.end.x, done.position.x + LABEL_LINK_ATTACH_DX);
    assert_eq!(link.control_start.y, link.start.y + LABEL_LINK_CONTROL_DY);
    assert_eq!(link.control_end.x, link.end.x - LABEL_LINK_CONTROL_DX);
    assert_eq!(link.color, "#10b981");
}

#[test]
fn no_link_without_both_subsets() {
    let scene = Scene::new(
        [node(1, 7, 100.0, 100.0, false), node(2, 8, 0.0, 0.0, true)],
        [style(7, "infra", None), style(8, "web", None)],
    );
    assert!(label_links(&label_anchors(&scene)).is_empty());
}
