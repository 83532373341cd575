use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use crate::decode::raster::RasterImage;
use crate::foundation::core::{Affine, BezPath, Canvas, Point, Rect, Rgba};
use crate::path::interpreter::DeferredPath;

/// Frame rate used when a bundle omits or zeroes its own.
pub const DEFAULT_FPS: u32 = 20;

/// Asset-key suffix marking a sprite whose content masks a group of later sprites.
pub const MATTE_SUFFIX: &str = ".matte";

#[derive(Clone, Debug)]
/// Decoded animation bundle.
///
/// A movie is immutable once built and is shared between playback sessions through `Arc`.
pub struct Movie {
    /// Format version string as declared by the bundle.
    pub version: String,
    /// Canvas size.
    pub canvas: Canvas,
    /// Frames per second, always > 0.
    pub fps: u32,
    /// Total frame count, never shorter than the longest sprite timeline.
    pub frames: usize,
    /// Decoded raster assets by key.
    pub images: HashMap<String, Arc<RasterImage>>,
    /// Raw audio payloads by key.
    pub audios: HashMap<String, Arc<[u8]>>,
    /// Sprites in paint order.
    pub sprites: Vec<Sprite>,
    /// Audio cues in declaration order.
    pub audio_cues: Vec<AudioCue>,
    /// Cache directory the movie was decoded from, if any.
    pub cache_dir: Option<PathBuf>,
}

impl Default for Movie {
    fn default() -> Self {
        Self {
            version: String::new(),
            canvas: Canvas::default(),
            fps: DEFAULT_FPS,
            frames: 0,
            images: HashMap::new(),
            audios: HashMap::new(),
            sprites: Vec::new(),
            audio_cues: Vec::new(),
            cache_dir: None,
        }
    }
}

impl Movie {
    /// Enforce the model invariants after decoding.
    pub fn normalized(mut self) -> Self {
        if self.fps == 0 {
            self.fps = DEFAULT_FPS;
        }
        let longest = self
            .sprites
            .iter()
            .map(|s| s.frames.len())
            .max()
            .unwrap_or(0);
        self.frames = self.frames.max(longest);
        self
    }

    /// Raster for a sprite key, ignoring any file extension on the key.
    pub fn image_for(&self, key: &str) -> Option<&Arc<RasterImage>> {
        self.images.get(strip_extension(key))
    }
}

#[derive(Clone, Debug, Default)]
/// One animated element with its own per-frame timeline.
pub struct Sprite {
    /// Asset key of the content this sprite draws.
    pub image_key: Option<String>,
    /// Key of the matte sprite masking this one.
    pub matte_key: Option<String>,
    /// Per-frame state.
    pub frames: Vec<SpriteFrame>,
    keep_bases: HashMap<usize, usize>,
}

impl Sprite {
    /// Build a sprite and precompute its keep-frame mapping.
    pub fn new(
        image_key: Option<String>,
        matte_key: Option<String>,
        frames: Vec<SpriteFrame>,
    ) -> Self {
        let keep_bases = keep_bases(&frames);
        Self {
            image_key: image_key.filter(|k| !k.is_empty()),
            matte_key: matte_key.filter(|k| !k.is_empty()),
            frames,
            keep_bases,
        }
    }

    /// Whether this sprite's content is a matte for later sprites.
    pub fn is_matte(&self) -> bool {
        self.image_key
            .as_deref()
            .is_some_and(|k| k.ends_with(MATTE_SUFFIX))
    }

    /// Image key with its extension removed, used for raster and override lookups.
    pub fn bitmap_key(&self) -> Option<&str> {
        self.image_key.as_deref().map(strip_extension)
    }

    /// Most recent non-keep frame preceding keep-frame `frame`.
    ///
    /// Returns `None` for non-keep frames and for keep frames without a predecessor.
    pub fn keep_base(&self, frame: usize) -> Option<usize> {
        self.keep_bases.get(&frame).copied()
    }
}

fn keep_bases(frames: &[SpriteFrame]) -> HashMap<usize, usize> {
    let mut out = HashMap::new();
    let mut last_drawn = None;
    for (idx, frame) in frames.iter().enumerate() {
        if frame.is_keep() {
            if let Some(base) = last_drawn {
                out.insert(idx, base);
            }
        } else {
            last_drawn = Some(idx);
        }
    }
    out
}

#[derive(Clone, Debug)]
/// Sprite state for a single frame.
pub struct SpriteFrame {
    /// Opacity in `[0, 1]`.
    pub alpha: f64,
    /// Affine transform applied to the layout rectangle.
    pub transform: Affine,
    /// Layout rectangle in local space, before the transform.
    pub layout: Rect,
    /// Top-left corner of the transformed layout's bounding box.
    pub bound_origin: Point,
    /// Clip-path command string.
    pub clip_path: Option<String>,
    /// Shapes drawn by this frame.
    pub shapes: Vec<Shape>,
    mask: OnceLock<Option<Arc<BezPath>>>,
}

impl Default for SpriteFrame {
    fn default() -> Self {
        Self::new(0.0, Rect::ZERO, Affine::IDENTITY, None, Vec::new())
    }
}

impl SpriteFrame {
    /// Build a frame and derive its bound origin.
    pub fn new(
        alpha: f64,
        layout: Rect,
        transform: Affine,
        clip_path: Option<String>,
        shapes: Vec<Shape>,
    ) -> Self {
        let alpha = if alpha.is_nan() {
            0.0
        } else {
            alpha.clamp(0.0, 1.0)
        };
        Self {
            alpha,
            transform,
            layout,
            bound_origin: derive_bound_origin(layout, transform),
            clip_path: clip_path.filter(|p| !p.is_empty()),
            shapes,
            mask: OnceLock::new(),
        }
    }

    /// Whether this frame reuses the previous frame's shapes.
    pub fn is_keep(&self) -> bool {
        matches!(self.shapes.first(), Some(s) if s.kind == ShapeKind::Keep)
    }

    /// Mask geometry compiled from the clip path on first request.
    pub fn mask(&self) -> Option<Arc<BezPath>> {
        self.mask
            .get_or_init(|| {
                self.clip_path
                    .as_deref()
                    .map(|d| Arc::new(DeferredPath::with_values(d).into_geometry()))
            })
            .clone()
    }
}

/// Minimum X and Y over the four transformed corners of `layout`.
///
/// A NaN coordinate (degenerate transform) reads as zero.
pub fn derive_bound_origin(layout: Rect, transform: Affine) -> Point {
    let corners = [
        Point::new(layout.x0, layout.y0),
        Point::new(layout.x1, layout.y0),
        Point::new(layout.x0, layout.y1),
        Point::new(layout.x1, layout.y1),
    ];
    let (mut nx, mut ny) = (f64::INFINITY, f64::INFINITY);
    for corner in corners {
        let p = transform * corner;
        nx = nx.min(p.x);
        ny = ny.min(p.y);
    }
    let finite = |v: f64| if v.is_nan() || v.is_infinite() { 0.0 } else { v };
    Point::new(finite(nx), finite(ny))
}

#[derive(Clone, Debug, PartialEq)]
/// One shape drawn in a sprite frame.
pub struct Shape {
    /// Geometry variant.
    pub kind: ShapeKind,
    /// Paint style; `None` draws with the defaults.
    pub style: Option<ShapeStyle>,
    /// Local transform applied to the geometry.
    pub transform: Affine,
}

impl Shape {
    /// Shape telling the builder to reuse the previous frame's shapes.
    pub fn keep() -> Self {
        Self {
            kind: ShapeKind::Keep,
            style: None,
            transform: Affine::IDENTITY,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
/// Geometry variants a shape can carry.
pub enum ShapeKind {
    /// Path command string.
    Path {
        /// Commands for the path interpreter.
        d: String,
    },
    /// Rounded rectangle.
    Rect {
        /// Left edge.
        x: f64,
        /// Top edge.
        y: f64,
        /// Width.
        width: f64,
        /// Height.
        height: f64,
        /// Corner radius.
        corner_radius: f64,
    },
    /// Ellipse from center and radii.
    Ellipse {
        /// Center X.
        x: f64,
        /// Center Y.
        y: f64,
        /// Horizontal radius.
        radius_x: f64,
        /// Vertical radius.
        radius_y: f64,
    },
    /// Reuse the previous non-keep frame's shapes verbatim.
    Keep,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// Stroke end cap.
pub enum LineCap {
    /// Flat cap at the endpoint.
    #[default]
    Butt,
    /// Semicircular cap.
    Round,
    /// Square cap extending past the endpoint.
    Square,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// Stroke corner join.
pub enum LineJoin {
    /// Sharp join limited by the miter limit.
    #[default]
    Miter,
    /// Rounded join.
    Round,
    /// Beveled join.
    Bevel,
}

#[derive(Clone, Debug, PartialEq)]
/// Fill and stroke styling for a shape.
pub struct ShapeStyle {
    /// Fill color; `None` fills transparent.
    pub fill: Option<Rgba>,
    /// Stroke color; `None` omits the stroke.
    pub stroke: Option<Rgba>,
    /// Stroke width.
    pub stroke_width: f64,
    /// Stroke cap.
    pub line_cap: LineCap,
    /// Stroke join.
    pub line_join: LineJoin,
    /// Miter limit.
    pub miter_limit: f64,
    /// Dash lengths and phase: `[dash, gap, phase]`.
    pub line_dash: Option<[f64; 3]>,
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            fill: None,
            stroke: None,
            stroke_width: 0.0,
            line_cap: LineCap::Butt,
            line_join: LineJoin::Miter,
            miter_limit: 0.0,
            line_dash: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Audio segment triggered by playback frames.
pub struct AudioCue {
    /// Key into [`Movie::audios`].
    pub key: String,
    /// Frame at which playback begins.
    pub start_frame: usize,
    /// Frame at or after which playback stops.
    pub end_frame: usize,
    /// Offset into the audio asset, in milliseconds.
    pub start_time_ms: u64,
    /// Declared duration of the asset, in milliseconds.
    pub total_time_ms: u64,
}

/// Remove the final `.ext` component of an asset key.
pub fn strip_extension(key: &str) -> &str {
    match key.rfind('.') {
        Some(idx) if idx > 0 => &key[..idx],
        _ => key,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/movie.rs"]
mod tests;
