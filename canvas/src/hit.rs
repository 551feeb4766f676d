//! Drop-target hit testing for the delete and complete bins.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::camera::Point;
use crate::consts::BIN_HITBOX_INFLATION;

/// Axis-aligned rectangle in screen coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width; non-negative.
    pub width: f64,
    /// Height; non-negative.
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Center point of the rectangle.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// The rectangle grown by `margin` on all four sides.
    #[must_use]
    pub fn inflated(&self, margin: f64) -> Self {
        Self {
            x: self.x - margin,
            y: self.y - margin,
            width: self.width + margin * 2.0,
            height: self.height + margin * 2.0,
        }
    }

    /// Whether `point` lies inside the rectangle. Edges count as inside.
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }
}

/// Which drop target a dragged node is over.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinKind {
    /// Dropping requests deletion (behind a confirmation step).
    Delete,
    /// Dropping marks the node completed.
    Complete,
}

/// Screen rectangles of the two fixed bins.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BinLayout {
    /// The delete bin.
    pub delete: Rect,
    /// The complete bin.
    pub complete: Rect,
}

impl BinLayout {
    /// Which bin, if any, the dragged node's center is over.
    ///
    /// The delete bin wins when the inflated regions overlap.
    #[must_use]
    pub fn hit(&self, node: &Rect) -> Option<BinKind> {
        if is_over_bin(node, &self.delete) {
            Some(BinKind::Delete)
        } else if is_over_bin(node, &self.complete) {
            Some(BinKind::Complete)
        } else {
            None
        }
    }
}

/// Whether the dragged node's *center point* falls within the bin rect
/// inflated by [`BIN_HITBOX_INFLATION`] on every side. The boundary of the
/// inflated rect counts as inside.
#[must_use]
pub fn is_over_bin(node: &Rect, bin: &Rect) -> bool {
    bin.inflated(BIN_HITBOX_INFLATION).contains(node.center())
}
