//! Render tree built from a movie: one node per sprite, grouped under matte hosts.

use std::collections::HashMap;
use std::sync::Arc;

use crate::model::movie::Movie;
use crate::scene::dynamic::DynamicOverrides;
use crate::scene::node::SpriteNode;

/// Entry in the root paint list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TreeItem {
    /// Sprite node attached directly to the root.
    Sprite(usize),
    /// Matte host, indexing [`SceneTree::groups`].
    Matte(usize),
}

/// Host grouping sprites clipped by one matte sprite.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatteGroup {
    /// Matte key shared by the members.
    pub key: String,
    /// Node whose content masks the group.
    pub mask: Option<usize>,
    /// Member nodes in paint order.
    pub members: Vec<usize>,
}

/// Render tree for one playback session.
#[derive(Debug)]
pub struct SceneTree {
    movie: Arc<Movie>,
    nodes: Vec<SpriteNode>,
    groups: Vec<MatteGroup>,
    root: Vec<TreeItem>,
    current: Option<usize>,
}

impl SceneTree {
    /// Build nodes for every sprite of `movie` and apply `overrides`.
    pub fn build(movie: Arc<Movie>, overrides: &DynamicOverrides) -> Self {
        let nodes: Vec<SpriteNode> = movie
            .sprites
            .iter()
            .enumerate()
            .map(|(idx, sprite)| SpriteNode::new(idx, sprite))
            .collect();

        let mut groups: Vec<MatteGroup> = Vec::new();
        let mut by_key: HashMap<String, usize> = HashMap::new();
        let mut root = Vec::new();
        let mut group_for = |key: &str, groups: &mut Vec<MatteGroup>| -> usize {
            *by_key.entry(key.to_string()).or_insert_with(|| {
                groups.push(MatteGroup {
                    key: key.to_string(),
                    mask: None,
                    members: Vec::new(),
                });
                groups.len() - 1
            })
        };

        let mut previous_matte: Option<&str> = None;
        for (idx, sprite) in movie.sprites.iter().enumerate() {
            if sprite.is_matte()
                && let Some(key) = sprite.image_key.as_deref()
            {
                let g = group_for(key, &mut groups);
                groups[g].mask = Some(idx);
            } else if let Some(matte) = sprite.matte_key.as_deref() {
                let g = group_for(matte, &mut groups);
                groups[g].members.push(idx);
                if idx == 0 || previous_matte != Some(matte) {
                    root.retain(|item| *item != TreeItem::Matte(g));
                    root.push(TreeItem::Matte(g));
                }
            } else {
                root.push(TreeItem::Sprite(idx));
            }
            previous_matte = sprite.matte_key.as_deref();
        }

        let mut tree = Self {
            movie,
            nodes,
            groups,
            root,
            current: None,
        };
        tree.apply_overrides(overrides);
        tracing::debug!(
            nodes = tree.nodes.len(),
            groups = tree.groups.len(),
            "built scene tree"
        );
        tree
    }

    /// Push raster, text and visibility overrides into the nodes.
    ///
    /// Sprites without a raster override draw the movie's own image for their key.
    pub fn apply_overrides(&mut self, overrides: &DynamicOverrides) {
        for node in &mut self.nodes {
            let Some(key) = node.image_key().map(str::to_string) else {
                continue;
            };
            let raster = overrides
                .image(&key)
                .or_else(|| self.movie.image_for(&key))
                .cloned();
            node.set_raster(raster);
            node.set_text(overrides.text(&key).cloned());
            node.set_dynamic_hidden(overrides.is_hidden(&key));
        }
    }

    /// Step every node to `frame`, then run the draw hook of each visible keyed node.
    pub fn step_to_frame(&mut self, frame: usize, overrides: &mut DynamicOverrides) {
        for node in &mut self.nodes {
            let sprite = &self.movie.sprites[node.sprite_index()];
            node.step_to_frame(sprite, frame);
            if node.is_dynamically_hidden() {
                continue;
            }
            if let Some(key) = node.image_key()
                && let Some(hook) = overrides.hook_mut(key)
            {
                hook(node, frame);
            }
        }
        self.current = Some(frame);
    }

    /// Hide every node and forget materialized shapes.
    pub fn clear(&mut self) {
        for node in &mut self.nodes {
            node.reset();
        }
        self.current = None;
    }

    /// Movie the tree was built from.
    pub fn movie(&self) -> &Arc<Movie> {
        &self.movie
    }

    /// All nodes, indexed like the movie's sprites.
    pub fn nodes(&self) -> &[SpriteNode] {
        &self.nodes
    }

    /// Node for sprite `index`.
    pub fn node(&self, index: usize) -> Option<&SpriteNode> {
        self.nodes.get(index)
    }

    /// Matte hosts.
    pub fn groups(&self) -> &[MatteGroup] {
        &self.groups
    }

    /// Root paint list.
    pub fn root(&self) -> &[TreeItem] {
        &self.root
    }

    /// Frame the tree was last stepped to.
    pub fn current_frame(&self) -> Option<usize> {
        self.current
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/tree.rs"]
mod tests;
