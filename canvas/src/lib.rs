//! Spatial layout engine for the board canvas.
//!
//! Everything in this crate is a pure function of the current node positions
//! and categories: category label anchors, constellation connection segments,
//! active↔completed label links, and the bin drop-target hit test. The host
//! rebuilds a [`Scene`] (with the in-flight drag position substituted in) on
//! every relevant state change and recomputes whatever geometry it renders.

pub mod camera;
pub mod consts;
pub mod hit;
pub mod layout;
pub mod scene;

pub use camera::{Camera, Point};
pub use hit::{BinKind, BinLayout, Rect, is_over_bin};
pub use layout::{LabelAnchor, LabelLink, Segment, constellation, label_anchors, label_links};
pub use scene::{CategoryStyle, Scene, SceneNode};
