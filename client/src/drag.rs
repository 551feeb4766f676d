//! Drag reconciliation: one pointer gesture, one eventual broadcast.
//!
//! A drag mutates only transient controller state while in flight. On
//! release the node either lands on a bin (delete/complete flow, no position
//! persisted) or on open canvas, where the caller applies the optimistic
//! position mutation immediately and this controller schedules a single
//! debounced `update_todo` broadcast at 750 ms quiescence — one message per
//! pause, not one per pixel of movement.

#[cfg(test)]
#[path = "drag_test.rs"]
mod drag_test;

use std::time::{Duration, Instant};

use canvas::consts::NODE_SIZE;
use canvas::{BinKind, BinLayout, Camera, Point, Rect};
use wire::ClientAction;
use wire::types::{Todo, TodoPatch};

/// Quiescence window before a settled position is broadcast.
pub const POSITION_DEBOUNCE_WINDOW: Duration = Duration::from_millis(750);

/// What a completed drag gesture asks the caller to do.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DragOutcome {
    /// The node was released over a bin. No position change is persisted;
    /// the caller runs the bin's flow (confirmation + `delete_todo`, or an
    /// optimistic complete + `update_todo`).
    DroppedOnBin {
        /// The released node.
        id: i64,
        /// Which bin swallowed it.
        bin: BinKind,
    },
    /// The node settled at a new center position. The caller applies the
    /// optimistic mutation now; the broadcast is already scheduled here.
    Moved {
        /// The released node.
        id: i64,
        /// New center x.
        x: f64,
        /// New center y.
        y: f64,
    },
    /// Released where it started; nothing to do.
    Unmoved,
    /// `stop` without a matching `start`.
    NotDragging,
}

#[derive(Clone, Copy, Debug)]
struct ActiveDrag {
    id: i64,
    origin: Point,
    top_left: Point,
    hovered: Option<BinKind>,
}

/// Per-connection drag state machine: `Idle -> Dragging -> Idle`.
#[derive(Debug)]
pub struct DragController {
    active: Option<ActiveDrag>,
    pending: crate::timing::DebounceMap<i64, Point>,
}

impl DragController {
    #[must_use]
    pub fn new() -> Self {
        Self {
            active: None,
            pending: crate::timing::DebounceMap::new(POSITION_DEBOUNCE_WINDOW),
        }
    }

    /// Begin dragging `todo`, capturing its current center as the origin.
    pub fn start(&mut self, todo: &Todo) {
        let origin = Point::new(todo.position_x, todo.position_y);
        self.active = Some(ActiveDrag {
            id: todo.id,
            origin,
            top_left: Point::new(origin.x - NODE_SIZE / 2.0, origin.y - NODE_SIZE / 2.0),
            hovered: None,
        });
    }

    /// The in-flight node and its live top-left anchor, for substituting the
    /// drag position into the layout engine's scene.
    #[must_use]
    pub fn dragged(&self) -> Option<(i64, Point)> {
        self.active.map(|drag| (drag.id, drag.top_left))
    }

    /// Track a drag movement to `top_left` (canvas coordinates) and re-run
    /// the bin hit test against the node's screen-space rect.
    pub fn moved(&mut self, top_left: Point, camera: &Camera, bins: &BinLayout) -> Option<BinKind> {
        let drag = self.active.as_mut()?;
        drag.top_left = top_left;

        let screen_top_left = camera.canvas_to_screen(top_left);
        let screen_size = NODE_SIZE * camera.zoom;
        let screen_rect = Rect::new(screen_top_left.x, screen_top_left.y, screen_size, screen_size);
        drag.hovered = bins.hit(&screen_rect);
        drag.hovered
    }

    /// End the gesture and decide its outcome. Positions settle back to the
    /// center convention by adding half the node diameter.
    pub fn stop(&mut self, now: Instant) -> DragOutcome {
        let Some(drag) = self.active.take() else {
            return DragOutcome::NotDragging;
        };

        if let Some(bin) = drag.hovered {
            return DragOutcome::DroppedOnBin { id: drag.id, bin };
        }

        let center = Point::new(
            drag.top_left.x + NODE_SIZE / 2.0,
            drag.top_left.y + NODE_SIZE / 2.0,
        );
        if center == drag.origin {
            return DragOutcome::Unmoved;
        }

        self.pending.push(drag.id, center, now);
        DragOutcome::Moved { id: drag.id, x: center.x, y: center.y }
    }

    /// Debounced position broadcasts whose quiescence window has elapsed.
    pub fn poll_due(&mut self, now: Instant) -> Vec<ClientAction> {
        self.pending
            .poll_due(now)
            .into_iter()
            .map(|(id, center)| ClientAction::UpdateTodo(TodoPatch::position(id, center.x, center.y)))
            .collect()
    }

    /// Earliest pending broadcast deadline, for event loops sleeping on it.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.next_deadline()
    }

    /// Teardown: pending broadcasts are discarded, never flushed, and any
    /// in-flight gesture is abandoned.
    pub fn discard_pending(&mut self) {
        self.pending.clear();
        self.active = None;
    }
}

impl Default for DragController {
    fn default() -> Self {
        Self::new()
    }
}
