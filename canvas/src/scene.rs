//! Scene model: the positioned, categorized nodes the layout engine reads.
//!
//! A `Scene` is rebuilt from the synchronized board state on every relevant
//! change. When a drag is in flight, the host substitutes the dragged node's
//! live position via [`Scene::with_drag_override`] so clustering and
//! connections react mid-gesture, before any state-store commit.

#[cfg(test)]
#[path = "scene_test.rs"]
mod scene_test;

use std::collections::HashMap;

use crate::camera::Point;
use crate::consts::{DEFAULT_CATEGORY_COLOR, NODE_SIZE};

/// One categorized node with a defined canvas position.
///
/// Nodes without a category do not participate in layout; the host filters
/// them out when building the scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneNode {
    /// Node id.
    pub id: i64,
    /// Owning category.
    pub category_id: i64,
    /// Node center in canvas coordinates.
    pub center: Point,
    /// Whether the node sits in the completed subset of its category.
    pub completed: bool,
}

/// Name and color of one category, as used for labels and connections.
#[derive(Clone, Debug, PartialEq)]
pub struct CategoryStyle {
    /// Category id.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Explicit hex color, if the category has one.
    pub color: Option<String>,
}

/// Immutable snapshot of everything the layout functions need.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    nodes: Vec<SceneNode>,
    categories: HashMap<i64, CategoryStyle>,
}

impl Scene {
    /// Build a scene from positioned nodes and the categories they reference.
    #[must_use]
    pub fn new(
        nodes: impl IntoIterator<Item = SceneNode>,
        categories: impl IntoIterator<Item = CategoryStyle>,
    ) -> Self {
        Self {
            nodes: nodes.into_iter().collect(),
            categories: categories.into_iter().map(|c| (c.id, c)).collect(),
        }
    }

    /// Substitute the live position of an in-flight drag.
    ///
    /// `top_left` is the drag gesture's anchor; the node center is recovered
    /// by adding half the node diameter. Unknown ids leave the scene
    /// unchanged — a drag can only perturb a node that is actually present.
    #[must_use]
    pub fn with_drag_override(mut self, id: i64, top_left: Point) -> Self {
        if let Some(node) = self.nodes.iter_mut().find(|n| n.id == id) {
            node.center = Point::new(top_left.x + NODE_SIZE / 2.0, top_left.y + NODE_SIZE / 2.0);
        }
        self
    }

    /// All nodes in the scene.
    #[must_use]
    pub fn nodes(&self) -> &[SceneNode] {
        &self.nodes
    }

    /// The style record for a category, if the scene knows it.
    #[must_use]
    pub fn category(&self, id: i64) -> Option<&CategoryStyle> {
        self.categories.get(&id)
    }

    /// Effective color for a category: its own color, or the default gray.
    #[must_use]
    pub fn category_color(&self, id: i64) -> &str {
        self.categories
            .get(&id)
            .and_then(|c| c.color.as_deref())
            .unwrap_or(DEFAULT_CATEGORY_COLOR)
    }
}
