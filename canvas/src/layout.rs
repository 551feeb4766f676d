//! Derived board geometry: cluster labels, constellations, label links.
//!
//! All three computations share the same grouping: nodes are bucketed by
//! category, each bucket split into its active and completed subsets, and
//! every output is derived per subset. A category absent from the scene's
//! style map contributes nothing — labels and connections are never inferred
//! for unknown categories.

#[cfg(test)]
#[path = "layout_test.rs"]
mod layout_test;

use std::collections::BTreeMap;

use crate::camera::Point;
use crate::consts::{
    ACTIVE_LABEL_X_OFFSET, CATEGORY_LABEL_GAP, COMPLETED_LABEL_X_OFFSET, CONNECTION_DISTANCE,
    LABEL_LINK_ATTACH_DX, LABEL_LINK_ATTACH_DY, LABEL_LINK_CONTROL_DX, LABEL_LINK_CONTROL_DY,
    LABEL_RISE, NODE_SIZE,
};
use crate::scene::{Scene, SceneNode};

/// Placement of one floating category label.
#[derive(Clone, Debug, PartialEq)]
pub struct LabelAnchor {
    /// Category the label belongs to.
    pub category_id: i64,
    /// Whether this is the completed-subset label.
    pub completed: bool,
    /// Label position in canvas coordinates.
    pub position: Point,
    /// Label text: the category name, or `"Completed"`.
    pub text: String,
    /// Effective category color.
    pub color: String,
}

/// One constellation segment between two nearby same-subset nodes.
#[derive(Clone, Debug, PartialEq)]
pub struct Segment {
    /// Id of the first endpoint's node.
    pub a: i64,
    /// Id of the second endpoint's node.
    pub b: i64,
    /// First endpoint (node center).
    pub from: Point,
    /// Second endpoint (node center).
    pub to: Point,
    /// Effective category color.
    pub color: String,
    /// Completed-subset segments render dashed.
    pub dashed: bool,
}

/// A curved connector between a category's active and completed labels.
#[derive(Clone, Debug, PartialEq)]
pub struct LabelLink {
    /// Category whose label pair is joined.
    pub category_id: i64,
    /// Attach point on the active label.
    pub start: Point,
    /// Attach point on the completed label.
    pub end: Point,
    /// Cubic control point near `start`.
    pub control_start: Point,
    /// Cubic control point near `end`.
    pub control_end: Point,
    /// Effective category color.
    pub color: String,
}

/// Compute label anchors for every non-empty category subset.
///
/// Each anchor sits above the subset's topmost node (minimum center-y),
/// horizontally centered on the subset's mean center-x plus a fixed offset.
/// Active and completed subsets of one category get independent anchors.
#[must_use]
pub fn label_anchors(scene: &Scene) -> Vec<LabelAnchor> {
    let mut anchors = Vec::new();

    for (category_id, nodes) in nodes_by_category(scene) {
        let Some(style) = scene.category(category_id) else {
            continue;
        };
        let color = scene.category_color(category_id).to_owned();

        for completed in [false, true] {
            let subset: Vec<&SceneNode> = nodes.iter().filter(|n| n.completed == completed).copied().collect();
            let Some(position) = subset_anchor(&subset, completed) else {
                continue;
            };
            anchors.push(LabelAnchor {
                category_id,
                completed,
                position,
                text: if completed { "Completed".to_owned() } else { style.name.clone() },
                color: color.clone(),
            });
        }
    }

    anchors
}

/// Compute constellation segments within every category subset.
///
/// A segment joins each pair of nodes whose center distance is under
/// [`CONNECTION_DISTANCE`]. Active and completed subsets are independent;
/// no segment ever crosses the completion boundary.
#[must_use]
pub fn constellation(scene: &Scene) -> Vec<Segment> {
    let mut segments = Vec::new();

    for (category_id, nodes) in nodes_by_category(scene) {
        if scene.category(category_id).is_none() {
            continue;
        }
        let color = scene.category_color(category_id);

        for completed in [false, true] {
            let subset: Vec<&SceneNode> = nodes.iter().filter(|n| n.completed == completed).copied().collect();
            for (i, a) in subset.iter().enumerate() {
                for b in &subset[i + 1..] {
                    if a.center.distance_to(b.center) < CONNECTION_DISTANCE {
                        segments.push(Segment {
                            a: a.id,
                            b: b.id,
                            from: a.center,
                            to: b.center,
                            color: color.to_owned(),
                            dashed: completed,
                        });
                    }
                }
            }
        }
    }

    segments
}

/// Compute the curved connector for every category owning both label kinds.
#[must_use]
pub fn label_links(anchors: &[LabelAnchor]) -> Vec<LabelLink> {
    let mut links = Vec::new();

    for active in anchors.iter().filter(|a| !a.completed) {
        let Some(done) = anchors
            .iter()
            .find(|a| a.completed && a.category_id == active.category_id)
        else {
            continue;
        };

        let start = attach_point(active.position);
        let end = attach_point(done.position);
        links.push(LabelLink {
            category_id: active.category_id,
            start,
            end,
            control_start: Point::new(start.x + LABEL_LINK_CONTROL_DX, start.y + LABEL_LINK_CONTROL_DY),
            control_end: Point::new(end.x - LABEL_LINK_CONTROL_DX, end.y - LABEL_LINK_CONTROL_DY),
            color: active.color.clone(),
        });
    }

    links
}

/// Bucket scene nodes by category, in stable category order.
fn nodes_by_category(scene: &Scene) -> BTreeMap<i64, Vec<&SceneNode>> {
    let mut buckets: BTreeMap<i64, Vec<&SceneNode>> = BTreeMap::new();
    for node in scene.nodes() {
        buckets.entry(node.category_id).or_default().push(node);
    }
    buckets
}

fn subset_anchor(subset: &[&SceneNode], completed: bool) -> Option<Point> {
    let topmost_y = subset
        .iter()
        .map(|n| n.center.y)
        .min_by(f64::total_cmp)?;

    #[allow(clippy::cast_precision_loss)]
    let mean_x = subset.iter().map(|n| n.center.x).sum::<f64>() / subset.len() as f64;

    let x_offset = if completed { COMPLETED_LABEL_X_OFFSET } else { ACTIVE_LABEL_X_OFFSET };
    Some(Point::new(
        mean_x + x_offset,
        topmost_y - NODE_SIZE / 2.0 - CATEGORY_LABEL_GAP - LABEL_RISE,
    ))
}

fn attach_point(label: Point) -> Point {
    Point::new(label.x + LABEL_LINK_ATTACH_DX, label.y + LABEL_LINK_ATTACH_DY)
}
