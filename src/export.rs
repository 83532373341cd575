//! Per-frame snapshots of the render tree, for inspection and golden tests.

use std::sync::Arc;

use crate::model::movie::Movie;
use crate::scene::dynamic::DynamicOverrides;
use crate::scene::node::SpriteNode;
use crate::scene::tree::SceneTree;

/// State of every node at one frame.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FrameSnapshot {
    /// Frame index.
    pub frame: usize,
    /// One entry per sprite, in movie order.
    pub nodes: Vec<NodeSnapshot>,
}

/// State of one node at one frame.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct NodeSnapshot {
    /// Sprite index.
    pub sprite: usize,
    /// Sprite image key.
    pub image_key: Option<String>,
    /// Whether the node draws at this frame.
    pub visible: bool,
    /// Opacity, zero when hidden.
    pub opacity: f64,
    /// Local-to-canvas transform coefficients `[a, b, c, d, e, f]`.
    pub world_transform: [f64; 6],
    /// Materialized shape nodes.
    pub shapes: usize,
    /// Whether a mask clips the node.
    pub masked: bool,
    /// Whether raster content is attached.
    pub raster: bool,
}

impl NodeSnapshot {
    /// Capture `node`.
    pub fn capture(node: &SpriteNode) -> Self {
        let visible = !node.is_hidden();
        Self {
            sprite: node.sprite_index(),
            image_key: node.image_key().map(str::to_string),
            visible,
            opacity: if visible { node.opacity() } else { 0.0 },
            world_transform: node.world_transform().as_coeffs(),
            shapes: if visible { node.shapes().len() } else { 0 },
            masked: visible && node.mask().is_some(),
            raster: node.raster().is_some(),
        }
    }
}

/// Capture the tree as it stands.
pub fn snapshot_tree(tree: &SceneTree) -> FrameSnapshot {
    FrameSnapshot {
        frame: tree.current_frame().unwrap_or(0),
        nodes: tree.nodes().iter().map(NodeSnapshot::capture).collect(),
    }
}

/// Build a private tree for `movie` and capture it at every frame in order.
#[tracing::instrument(skip_all, fields(frames = movie.frames))]
pub fn snapshot_frames(movie: Arc<Movie>, overrides: &mut DynamicOverrides) -> Vec<FrameSnapshot> {
    let frames = movie.frames;
    let mut tree = SceneTree::build(movie, overrides);
    (0..frames)
        .map(|frame| {
            tree.step_to_frame(frame, overrides);
            snapshot_tree(&tree)
        })
        .collect()
}

#[cfg(test)]
#[path = "../tests/unit/export.rs"]
mod tests;
