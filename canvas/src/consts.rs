//! Shared numeric constants for canvas geometry.

// ── Nodes ───────────────────────────────────────────────────────

/// Visual diameter of a task node, in canvas units. Drag gestures operate on
/// a top-left anchor; half this size converts to/from the center convention
/// used by the data model.
pub const NODE_SIZE: f64 = 48.0;

// ── Category labels ─────────────────────────────────────────────

/// Vertical gap between the topmost node of a cluster and its label.
pub const CATEGORY_LABEL_GAP: f64 = 10.0;

/// Extra rise above the gap so labels float clear of expanded node cards.
pub const LABEL_RISE: f64 = 100.0;

/// Horizontal label offset from the mean center-x of an active subset.
pub const ACTIVE_LABEL_X_OFFSET: f64 = NODE_SIZE * 0.8 - 80.0;

/// Horizontal label offset from the mean center-x of a completed subset.
pub const COMPLETED_LABEL_X_OFFSET: f64 = NODE_SIZE * 0.8 - 120.0;

/// Rendered when a category carries no explicit color.
pub const DEFAULT_CATEGORY_COLOR: &str = "#9ca3af";

// ── Constellation ───────────────────────────────────────────────

/// Center-to-center distance below which two same-subset nodes are joined.
pub const CONNECTION_DISTANCE: f64 = 299.0;

// ── Label links ─────────────────────────────────────────────────

/// Offset from a label anchor to the visual midpoint the link attaches to.
pub const LABEL_LINK_ATTACH_DX: f64 = 80.0;
/// Vertical component of the link attach offset.
pub const LABEL_LINK_ATTACH_DY: f64 = 20.0;
/// Horizontal bow of the cubic control points.
pub const LABEL_LINK_CONTROL_DX: f64 = 50.0;
/// Vertical bow of the cubic control points.
pub const LABEL_LINK_CONTROL_DY: f64 = 100.0;

// ── Bins ────────────────────────────────────────────────────────

/// Margin added to every side of a bin rect before hit-testing. The visual
/// bin icon is far smaller than the drop target users expect.
pub const BIN_HITBOX_INFLATION: f64 = 70.0;
