//! Host-supplied per-sprite overrides.
//!
//! Overrides are keyed by sprite image key. A lookup matches the key exactly first, then with its
//! extension stripped, so `"banner"` also covers a sprite keyed `"banner.png"`.

use std::collections::HashMap;
use std::sync::Arc;

use crate::decode::raster::RasterImage;
use crate::foundation::core::Rgba;
use crate::model::movie::strip_extension;
use crate::scene::node::SpriteNode;

#[derive(Clone, Debug, PartialEq)]
/// Text drawn over a sprite's content, laid out by the host.
pub struct StyledText {
    /// Text content.
    pub text: String,
    /// Font size in canvas units.
    pub font_size: f64,
    /// Text color.
    pub color: Rgba,
}

impl StyledText {
    /// Text with the given size and color.
    pub fn new(text: impl Into<String>, font_size: f64, color: Rgba) -> Self {
        Self {
            text: text.into(),
            font_size,
            color,
        }
    }
}

/// Hook invoked with a node and frame index every time the node is stepped.
pub type DrawHook = Box<dyn FnMut(&SpriteNode, usize)>;

/// Overrides applied to sprites when a tree is built and on every later change.
#[derive(Default)]
pub struct DynamicOverrides {
    images: HashMap<String, Arc<RasterImage>>,
    texts: HashMap<String, StyledText>,
    hooks: HashMap<String, DrawHook>,
    hidden: HashMap<String, bool>,
}

impl std::fmt::Debug for DynamicOverrides {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynamicOverrides")
            .field("images", &self.images.keys().collect::<Vec<_>>())
            .field("texts", &self.texts)
            .field("hooks", &self.hooks.keys().collect::<Vec<_>>())
            .field("hidden", &self.hidden)
            .finish()
    }
}

fn lookup_key<V>(map: &HashMap<String, V>, key: &str) -> Option<String> {
    if map.contains_key(key) {
        return Some(key.to_string());
    }
    let plain = strip_extension(key);
    map.contains_key(plain).then(|| plain.to_string())
}

impl DynamicOverrides {
    /// Replace the raster drawn by sprites keyed `key`.
    pub fn set_image(&mut self, key: impl Into<String>, image: Arc<RasterImage>) {
        self.images.insert(key.into(), image);
    }

    /// Draw `text` over sprites keyed `key`.
    pub fn set_text(&mut self, key: impl Into<String>, text: StyledText) {
        self.texts.insert(key.into(), text);
    }

    /// Install or remove the draw hook for `key`.
    pub fn set_draw_hook(&mut self, key: impl Into<String>, hook: Option<DrawHook>) {
        let key = key.into();
        match hook {
            Some(hook) => {
                self.hooks.insert(key, hook);
            }
            None => {
                self.hooks.remove(&key);
            }
        }
    }

    /// Force sprites keyed `key` hidden or release them.
    pub fn set_hidden(&mut self, key: impl Into<String>, hidden: bool) {
        self.hidden.insert(key.into(), hidden);
    }

    /// Raster override for `key`.
    pub fn image(&self, key: &str) -> Option<&Arc<RasterImage>> {
        lookup_key(&self.images, key).and_then(|k| self.images.get(&k))
    }

    /// Text override for `key`.
    pub fn text(&self, key: &str) -> Option<&StyledText> {
        lookup_key(&self.texts, key).and_then(|k| self.texts.get(&k))
    }

    /// Whether `key` is forced hidden.
    pub fn is_hidden(&self, key: &str) -> bool {
        lookup_key(&self.hidden, key)
            .and_then(|k| self.hidden.get(&k).copied())
            .unwrap_or(false)
    }

    /// Draw hook for `key`.
    pub fn hook_mut(&mut self, key: &str) -> Option<&mut DrawHook> {
        let k = lookup_key(&self.hooks, key)?;
        self.hooks.get_mut(&k)
    }

    /// Whether no override is set.
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
            && self.texts.is_empty()
            && self.hooks.is_empty()
            && self.hidden.is_empty()
    }

    /// Remove every override.
    pub fn clear(&mut self) {
        self.images.clear();
        self.texts.clear();
        self.hooks.clear();
        self.hidden.clear();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/dynamic.rs"]
mod tests;
