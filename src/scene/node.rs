//! Per-sprite render node and its frame stepping.

use std::rc::Rc;
use std::sync::Arc;

use crate::decode::raster::RasterImage;
use crate::foundation::core::{Affine, BezPath, Point, Rect, Vec2};
use crate::model::movie::Sprite;
use crate::scene::dynamic::StyledText;
use crate::scene::shape::ShapeNode;

/// Render node for one sprite.
///
/// Holds the state a host rasterizer needs for the current frame: visibility, opacity, placement,
/// the optional raster and text content, the frame's mask and its shape nodes.
#[derive(Clone, Debug)]
pub struct SpriteNode {
    sprite: usize,
    image_key: Option<String>,
    hidden: bool,
    dynamic_hidden: bool,
    opacity: f64,
    bounds: Rect,
    position: Point,
    transform: Affine,
    mask: Option<Arc<BezPath>>,
    raster: Option<Arc<RasterImage>>,
    text: Option<StyledText>,
    shapes: Vec<Rc<ShapeNode>>,
    // (frame, frame whose shapes are materialized)
    drawn: Option<(usize, usize)>,
    rebuilds: usize,
}

impl SpriteNode {
    /// Empty node for sprite `index`.
    pub fn new(index: usize, sprite: &Sprite) -> Self {
        Self {
            sprite: index,
            image_key: sprite.image_key.clone(),
            hidden: true,
            dynamic_hidden: false,
            opacity: 0.0,
            bounds: Rect::ZERO,
            position: Point::ZERO,
            transform: Affine::IDENTITY,
            mask: None,
            raster: None,
            text: None,
            shapes: Vec::new(),
            drawn: None,
            rebuilds: 0,
        }
    }

    /// Step to `frame`.
    ///
    /// Frames past the timeline hide the node. A zero-alpha frame hides it without touching
    /// placement. Keep-frames reuse the shapes already materialized when the node was last
    /// stepped to the immediately preceding frame of the same keep run.
    pub fn step_to_frame(&mut self, sprite: &Sprite, frame: usize) {
        if self.dynamic_hidden {
            return;
        }
        let Some(item) = sprite.frames.get(frame) else {
            self.hidden = true;
            return;
        };
        if item.alpha <= 0.0 {
            self.hidden = true;
            return;
        }

        self.hidden = false;
        self.opacity = item.alpha;
        self.bounds = Rect::from_origin_size(Point::ZERO, item.layout.size());
        self.transform = item.transform;
        self.position = corrected_position(item.layout, item.transform, item.bound_origin);
        self.mask = item.mask();
        self.update_shapes(sprite, frame);
    }

    fn update_shapes(&mut self, sprite: &Sprite, frame: usize) {
        let is_keep = sprite.frames[frame].is_keep();
        let source = if is_keep {
            match sprite.keep_base(frame) {
                Some(base) => base,
                None => {
                    self.shapes.clear();
                    self.drawn = Some((frame, frame));
                    return;
                }
            }
        } else {
            frame
        };

        let continues_run =
            is_keep && frame > 0 && self.drawn == Some((frame - 1, source));
        if !continues_run {
            self.shapes = sprite.frames[source]
                .shapes
                .iter()
                .filter_map(ShapeNode::build)
                .map(Rc::new)
                .collect();
            self.rebuilds += 1;
        }
        self.drawn = Some((frame, source));
    }

    /// Drop materialized state so the next step rebuilds from scratch.
    pub fn reset(&mut self) {
        self.hidden = true;
        self.shapes.clear();
        self.drawn = None;
        self.mask = None;
    }

    /// Index of the sprite in its movie.
    pub fn sprite_index(&self) -> usize {
        self.sprite
    }

    /// Image key of the sprite.
    pub fn image_key(&self) -> Option<&str> {
        self.image_key.as_deref()
    }

    /// Whether the node is hidden, by its frame or by an override.
    pub fn is_hidden(&self) -> bool {
        self.hidden || self.dynamic_hidden
    }

    /// Whether an override forces the node hidden.
    pub fn is_dynamically_hidden(&self) -> bool {
        self.dynamic_hidden
    }

    /// Opacity of the last visible frame.
    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    /// Local bounds: the layout size at the origin.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Center of the bounds in parent space, after bound correction.
    pub fn position(&self) -> Point {
        self.position
    }

    /// Frame transform applied about the bounds center.
    pub fn transform(&self) -> Affine {
        self.transform
    }

    /// Map from local bounds space to canvas space.
    pub fn world_transform(&self) -> Affine {
        let half = Vec2::new(self.bounds.width() / 2.0, self.bounds.height() / 2.0);
        Affine::translate(self.position.to_vec2()) * self.transform * Affine::translate(-half)
    }

    /// Mask geometry of the current frame.
    pub fn mask(&self) -> Option<&Arc<BezPath>> {
        self.mask.as_ref()
    }

    /// Raster content.
    pub fn raster(&self) -> Option<&Arc<RasterImage>> {
        self.raster.as_ref()
    }

    /// Text drawn over the content.
    pub fn text(&self) -> Option<&StyledText> {
        self.text.as_ref()
    }

    /// Shape nodes of the current frame.
    pub fn shapes(&self) -> &[Rc<ShapeNode>] {
        &self.shapes
    }

    /// Last stepped frame that produced shapes.
    pub fn drawn_frame(&self) -> Option<usize> {
        self.drawn.map(|(frame, _)| frame)
    }

    /// How many times the shape list has been rebuilt.
    pub fn rebuild_count(&self) -> usize {
        self.rebuilds
    }

    pub(crate) fn set_raster(&mut self, raster: Option<Arc<RasterImage>>) {
        self.raster = raster;
    }

    pub(crate) fn set_text(&mut self, text: Option<StyledText>) {
        self.text = text;
    }

    pub(crate) fn set_dynamic_hidden(&mut self, hidden: bool) {
        self.dynamic_hidden = hidden;
    }
}

/// Position of the layout center after placing the transformed layout and correcting by the
/// derived bound origin. Matches the layer model where the transform applies about the center.
pub fn corrected_position(layout: Rect, transform: Affine, bound_origin: Point) -> Point {
    let center = layout.center();
    let [a, b, c, d, tx, ty] = transform.as_coeffs();
    let corners = [
        Point::new(layout.x0, layout.y0),
        Point::new(layout.x1, layout.y0),
        Point::new(layout.x0, layout.y1),
        Point::new(layout.x1, layout.y1),
    ];
    let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
    for p in corners {
        let (dx, dy) = (p.x - center.x, p.y - center.y);
        min_x = min_x.min(a * dx + c * dy);
        min_y = min_y.min(b * dx + d * dy);
    }
    let frame_origin = Point::new(center.x + min_x + tx, center.y + min_y + ty);
    let finite_or_zero = |v: f64| if v.is_finite() { v } else { 0.0 };
    let offset_x = finite_or_zero(frame_origin.x - bound_origin.x);
    let offset_y = finite_or_zero(frame_origin.y - bound_origin.y);
    Point::new(center.x - offset_x, center.y - offset_y)
}

#[cfg(test)]
#[path = "../../tests/unit/scene/node.rs"]
mod tests;
