use super::*;

fn todo_at(id: i64, x: f64, y: f64) -> Todo {
    Todo {
        id,
        name: "node".to_owned(),
        description: None,
        position_x: x,
        position_y: y,
        is_completed: false,
        completed_at: None,
        created_at: None,
        updated_at: None,
        category_id: None,
        board_id: 7,
    }
}

fn far_bins() -> BinLayout {
    BinLayout {
        delete: Rect::new(10_000.0, 10_000.0, 40.0, 40.0),
        complete: Rect::new(10_000.0, 11_000.0, 40.0, 40.0),
    }
}

fn top_left_for_center(x: f64, y: f64) -> Point {
    Point::new(x - NODE_SIZE / 2.0, y - NODE_SIZE / 2.0)
}

fn at(base: Instant, ms: u64) -> Instant {
    base + Duration::from_millis(ms)
}

// =============================================================
// Gesture outcomes
// =============================================================

#[test]
fn drop_on_open_canvas_moves_and_schedules_one_broadcast() {
    let base = Instant::now();
    let camera = Camera::default();
    let mut controller = DragController::new();

    controller.start(&todo_at(5, 100.0, 100.0));
    controller.moved(top_left_for_center(250.0, 100.0), &camera, &far_bins());
    controller.moved(top_left_for_center(400.0, 100.0), &camera, &far_bins());

    let outcome = controller.stop(base);
    assert_eq!(outcome, DragOutcome::Moved { id: 5, x: 400.0, y: 100.0 });

    // Nothing fires before 750 ms of quiescence.
    assert!(controller.poll_due(at(base, 749)).is_empty());
    let due = controller.poll_due(at(base, 750));
    assert_eq!(
        due,
        vec![ClientAction::UpdateTodo(TodoPatch::position(5, 400.0, 100.0))]
    );
    // And only once.
    assert!(controller.poll_due(at(base, 2000)).is_empty());
}

#[test]
fn repeated_drags_within_the_window_coalesce_to_the_last_position() {
    let base = Instant::now();
    let camera = Camera::default();
    let mut controller = DragController::new();

    controller.start(&todo_at(5, 0.0, 0.0));
    controller.moved(top_left_for_center(50.0, 0.0), &camera, &far_bins());
    controller.stop(base);

    controller.start(&todo_at(5, 50.0, 0.0));
    controller.moved(top_left_for_center(90.0, 0.0), &camera, &far_bins());
    controller.stop(at(base, 400));

    // First stop's deadline (base + 750) has passed, but the second stop
    // re-armed the node's timer: one broadcast, last position.
    assert!(controller.poll_due(at(base, 800)).is_empty());
    let due = controller.poll_due(at(base, 1150));
    assert_eq!(due, vec![ClientAction::UpdateTodo(TodoPatch::position(5, 90.0, 0.0))]);
}

#[test]
fn unmoved_release_produces_no_broadcast() {
    let base = Instant::now();
    let camera = Camera::default();
    let mut controller = DragController::new();

    controller.start(&todo_at(5, 100.0, 100.0));
    controller.moved(top_left_for_center(100.0, 100.0), &camera, &far_bins());
    assert_eq!(controller.stop(base), DragOutcome::Unmoved);
    assert!(controller.poll_due(at(base, 10_000)).is_empty());
}

#[test]
fn stop_without_start_reports_not_dragging() {
    let mut controller = DragController::new();
    assert_eq!(controller.stop(Instant::now()), DragOutcome::NotDragging);
}

// =============================================================
// Bin interaction
// =============================================================

#[test]
fn drop_on_delete_bin_initiates_delete_flow_and_no_position_update() {
    let base = Instant::now();
    let camera = Camera::default();
    let bins = BinLayout {
        delete: Rect::new(500.0, 500.0, 40.0, 40.0),
        complete: Rect::new(900.0, 500.0, 40.0, 40.0),
    };
    let mut controller = DragController::new();

    controller.start(&todo_at(5, 100.0, 100.0));
    // Node center lands inside the delete bin's inflated region.
    let hovered = controller.moved(top_left_for_center(510.0, 510.0), &camera, &bins);
    assert_eq!(hovered, Some(BinKind::Delete));

    let outcome = controller.stop(base);
    assert_eq!(outcome, DragOutcome::DroppedOnBin { id: 5, bin: BinKind::Delete });
    assert!(controller.poll_due(at(base, 10_000)).is_empty());
}

#[test]
fn leaving_the_bin_before_release_clears_the_hover() {
    let camera = Camera::default();
    let bins = BinLayout {
        delete: Rect::new(500.0, 500.0, 40.0, 40.0),
        complete: Rect::new(900.0, 500.0, 40.0, 40.0),
    };
    let mut controller = DragController::new();

    controller.start(&todo_at(5, 100.0, 100.0));
    assert!(controller.moved(top_left_for_center(510.0, 510.0), &camera, &bins).is_some());
    assert!(controller.moved(top_left_for_center(100.0, 100.0), &camera, &bins).is_none());
    let outcome = controller.stop(Instant::now());
    assert_eq!(outcome, DragOutcome::Unmoved);
}

#[test]
fn bin_hit_test_runs_in_screen_space_under_zoom() {
    let camera = Camera { pan_x: 0.0, pan_y: 0.0, zoom: 0.5 };
    // Bin fixed at screen (500, 500); the node must reach canvas (1000, 1000)
    // for its screen center to land there.
    let bins = BinLayout {
        delete: Rect::new(480.0, 480.0, 40.0, 40.0),
        complete: Rect::new(9_000.0, 9_000.0, 40.0, 40.0),
    };
    let mut controller = DragController::new();

    controller.start(&todo_at(5, 0.0, 0.0));
    // Canvas (510, 510) is screen (255, 255): too far from the bin even inflated.
    assert!(controller.moved(top_left_for_center(510.0, 510.0), &camera, &bins).is_none());
    // Canvas (1000, 1000) is screen (500, 500): inside the inflated region.
    assert_eq!(
        controller.moved(top_left_for_center(1000.0, 1000.0), &camera, &bins),
        Some(BinKind::Delete)
    );
}

// =============================================================
// Layout substitution and teardown
// =============================================================

#[test]
fn dragged_exposes_live_top_left_for_scene_substitution() {
    let camera = Camera::default();
    let mut controller = DragController::new();
    assert!(controller.dragged().is_none());

    controller.start(&todo_at(5, 100.0, 100.0));
    let (id, top_left) = controller.dragged().unwrap();
    assert_eq!(id, 5);
    assert_eq!(top_left, top_left_for_center(100.0, 100.0));

    controller.moved(Point::new(300.0, 300.0), &camera, &far_bins());
    let (_, live) = controller.dragged().unwrap();
    assert_eq!(live, Point::new(300.0, 300.0));
}

#[test]
fn discard_pending_drops_scheduled_broadcasts() {
    let base = Instant::now();
    let camera = Camera::default();
    let mut controller = DragController::new();

    controller.start(&todo_at(5, 0.0, 0.0));
    controller.moved(top_left_for_center(50.0, 0.0), &camera, &far_bins());
    controller.stop(base);

    controller.discard_pending();
    assert!(controller.poll_due(at(base, 10_000)).is_empty());
    assert!(controller.dragged().is_none());
}
