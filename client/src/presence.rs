//! Outbound cursor presence.
//!
//! Pointer movement over the canvas arrives at device polling rate; the
//! publisher converts each sample through the inverse pan/zoom transform and
//! bounds the outbound `update_cursor` rate to one message per 100 ms,
//! regardless of input frequency.

#[cfg(test)]
#[path = "presence_test.rs"]
mod presence_test;

use std::time::{Duration, Instant};

use canvas::{Camera, Point};
use wire::ClientAction;

use crate::timing::Throttle;

/// Minimum interval between outbound cursor broadcasts.
pub const CURSOR_THROTTLE_WINDOW: Duration = Duration::from_millis(100);

/// Throttled publisher of the local cursor position.
#[derive(Debug)]
pub struct CursorPublisher {
    throttle: Throttle<Point>,
}

impl CursorPublisher {
    #[must_use]
    pub fn new() -> Self {
        Self { throttle: Throttle::new(CURSOR_THROTTLE_WINDOW) }
    }

    /// Offer a pointer sample in screen coordinates.
    ///
    /// Returns the `update_cursor` action to send when the throttle window
    /// is open; inside the window the sample is retained as the trailing
    /// candidate instead.
    pub fn pointer_moved(&mut self, screen: Point, camera: &Camera, now: Instant) -> Option<ClientAction> {
        let canvas_point = camera.screen_to_canvas(screen);
        self.throttle.admit(canvas_point, now).map(cursor_action)
    }

    /// Release the most recent suppressed sample once the window elapses.
    pub fn poll_trailing(&mut self, now: Instant) -> Option<ClientAction> {
        self.throttle.poll_trailing(now).map(cursor_action)
    }

    /// Teardown: drop any trailing sample instead of flushing it.
    pub fn discard_pending(&mut self) {
        self.throttle.reset();
    }
}

impl Default for CursorPublisher {
    fn default() -> Self {
        Self::new()
    }
}

fn cursor_action(point: Point) -> ClientAction {
    ClientAction::UpdateCursor { x: point.x, y: point.y }
}
