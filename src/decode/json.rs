//! JSON (`movie.spec`) movie form.
//!
//! The envelope must be a JSON object. Everything below it is read permissively: malformed
//! sprites, frames and shapes are skipped with a warning and missing numbers default to zero.

use serde::Deserialize;
use serde_json::Value;

use crate::foundation::core::{Affine, Canvas, Rect, Rgba};
use crate::foundation::error::{DecodeKind, SvgaError, SvgaResult};
use crate::model::movie::{LineCap, LineJoin, Shape, ShapeKind, ShapeStyle, Sprite, SpriteFrame};

/// Movie fields parsed from a JSON specification, before assets are resolved.
#[derive(Clone, Debug, Default)]
pub struct JsonMovie {
    /// Canvas from `movie.viewBox`, when present.
    pub canvas: Option<Canvas>,
    /// Frame rate from `movie.fps`.
    pub fps: Option<u32>,
    /// Frame count from `movie.frames`.
    pub frames: Option<usize>,
    /// Image entries as `(key, file stem)` pairs, in key order.
    pub images: Vec<(String, String)>,
    /// Sprites that parsed.
    pub sprites: Vec<Sprite>,
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(default)]
    movie: Value,
    #[serde(default)]
    images: Value,
    #[serde(default)]
    sprites: Value,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MovieHeader {
    #[serde(default)]
    view_box: Option<ViewBox>,
    #[serde(default)]
    fps: Option<f64>,
    #[serde(default)]
    frames: Option<f64>,
}

#[derive(Deserialize)]
struct ViewBox {
    #[serde(default)]
    width: f64,
    #[serde(default)]
    height: f64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SpriteEntry {
    #[serde(default)]
    image_key: Option<String>,
    #[serde(default)]
    matte_key: Option<String>,
    #[serde(default)]
    frames: Vec<Value>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FrameEntry {
    #[serde(default)]
    alpha: f64,
    #[serde(default)]
    layout: Option<LayoutEntry>,
    #[serde(default)]
    transform: Option<TransformEntry>,
    #[serde(default)]
    clip_path: Option<String>,
    #[serde(default)]
    shapes: Vec<Value>,
}

#[derive(Deserialize, Default)]
struct LayoutEntry {
    #[serde(default)]
    x: f64,
    #[serde(default)]
    y: f64,
    #[serde(default)]
    width: f64,
    #[serde(default)]
    height: f64,
}

impl LayoutEntry {
    fn to_rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }
}

fn one() -> f64 {
    1.0
}

#[derive(Deserialize)]
struct TransformEntry {
    #[serde(default = "one")]
    a: f64,
    #[serde(default)]
    b: f64,
    #[serde(default)]
    c: f64,
    #[serde(default = "one")]
    d: f64,
    #[serde(default)]
    tx: f64,
    #[serde(default)]
    ty: f64,
}

impl TransformEntry {
    fn to_affine(&self) -> Affine {
        Affine::new([self.a, self.b, self.c, self.d, self.tx, self.ty])
    }
}

fn affine_or_identity(t: Option<&TransformEntry>) -> Affine {
    t.map_or(Affine::IDENTITY, TransformEntry::to_affine)
}

#[derive(Deserialize)]
struct ShapeEntry {
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    args: Option<ShapeArgs>,
    #[serde(default)]
    styles: Option<StyleEntry>,
    #[serde(default)]
    transform: Option<TransformEntry>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ShapeArgs {
    #[serde(default)]
    d: Option<String>,
    #[serde(default)]
    x: f64,
    #[serde(default)]
    y: f64,
    #[serde(default)]
    width: f64,
    #[serde(default)]
    height: f64,
    #[serde(default)]
    corner_radius: f64,
    #[serde(default)]
    radius_x: f64,
    #[serde(default)]
    radius_y: f64,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct StyleEntry {
    #[serde(default)]
    fill: Option<Vec<f32>>,
    #[serde(default)]
    stroke: Option<Vec<f32>>,
    #[serde(default)]
    stroke_width: f64,
    #[serde(default)]
    line_cap: Option<String>,
    #[serde(default)]
    line_join: Option<String>,
    #[serde(default)]
    miter_limit: f64,
    #[serde(default)]
    line_dash: Option<Vec<f64>>,
}

fn color(values: Option<&[f32]>) -> Option<Rgba> {
    match values? {
        [r, g, b, a, ..] => Some(Rgba::new(*r, *g, *b, *a)),
        _ => None,
    }
}

/// Map a cap name; unknown names read as butt.
pub fn line_cap_from_name(name: &str) -> LineCap {
    match name {
        "round" => LineCap::Round,
        "square" => LineCap::Square,
        _ => LineCap::Butt,
    }
}

/// Map a join name; unknown names read as miter.
pub fn line_join_from_name(name: &str) -> LineJoin {
    match name {
        "round" => LineJoin::Round,
        "bevel" => LineJoin::Bevel,
        _ => LineJoin::Miter,
    }
}

impl StyleEntry {
    fn into_style(self) -> ShapeStyle {
        let line_dash = self.line_dash.filter(|d| !d.is_empty()).map(|d| {
            let at = |i: usize| d.get(i).copied().unwrap_or(0.0);
            [at(0), at(1), at(2)]
        });
        ShapeStyle {
            fill: color(self.fill.as_deref()),
            stroke: color(self.stroke.as_deref()),
            stroke_width: self.stroke_width,
            line_cap: self
                .line_cap
                .as_deref()
                .map_or(LineCap::Butt, line_cap_from_name),
            line_join: self
                .line_join
                .as_deref()
                .map_or(LineJoin::Miter, line_join_from_name),
            miter_limit: self.miter_limit,
            line_dash,
        }
    }
}

impl ShapeEntry {
    fn into_shape(self) -> Option<Shape> {
        let args = self.args.unwrap_or_default();
        let kind = match self.kind.as_deref().unwrap_or("shape") {
            "keep" => return Some(Shape::keep()),
            "shape" => ShapeKind::Path {
                d: args.d.unwrap_or_default(),
            },
            "rect" => ShapeKind::Rect {
                x: args.x,
                y: args.y,
                width: args.width,
                height: args.height,
                corner_radius: args.corner_radius,
            },
            "ellipse" => ShapeKind::Ellipse {
                x: args.x,
                y: args.y,
                radius_x: args.radius_x,
                radius_y: args.radius_y,
            },
            other => {
                tracing::warn!(kind = other, "skipping shape of unknown type");
                return None;
            }
        };
        Some(Shape {
            kind,
            style: self.styles.map(StyleEntry::into_style),
            transform: affine_or_identity(self.transform.as_ref()),
        })
    }
}

fn parse_frame(value: Value) -> Option<SpriteFrame> {
    let entry: FrameEntry = match serde_json::from_value(value) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(error = %e, "skipping malformed frame");
            return None;
        }
    };
    let shapes = entry
        .shapes
        .into_iter()
        .filter_map(|v| match serde_json::from_value::<ShapeEntry>(v) {
            Ok(s) => s.into_shape(),
            Err(e) => {
                tracing::warn!(error = %e, "skipping malformed shape");
                None
            }
        })
        .collect();
    Some(SpriteFrame::new(
        entry.alpha,
        entry.layout.unwrap_or_default().to_rect(),
        affine_or_identity(entry.transform.as_ref()),
        entry.clip_path,
        shapes,
    ))
}

fn parse_sprite(value: Value) -> Option<Sprite> {
    let entry: SpriteEntry = match serde_json::from_value(value) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(error = %e, "skipping malformed sprite");
            return None;
        }
    };
    let frames = entry.frames.into_iter().filter_map(parse_frame).collect();
    Some(Sprite::new(entry.image_key, entry.matte_key, frames))
}

fn non_negative(v: f64) -> Option<f64> {
    v.is_finite().then_some(v.max(0.0))
}

/// Parse a JSON movie specification.
///
/// Fails only when the bytes are not JSON or the top level is not an object.
pub fn parse_json(bytes: &[u8]) -> SvgaResult<JsonMovie> {
    let root: Value = serde_json::from_slice(bytes)
        .map_err(|e| SvgaError::decode(DecodeKind::Json, e.to_string()))?;
    if !root.is_object() {
        return Err(SvgaError::decode(
            DecodeKind::Json,
            "top level is not an object",
        ));
    }
    let envelope: Envelope = serde_json::from_value(root)
        .map_err(|e| SvgaError::decode(DecodeKind::Json, e.to_string()))?;

    let mut out = JsonMovie::default();
    let header = match envelope.movie {
        Value::Null => None,
        movie => serde_json::from_value::<MovieHeader>(movie)
            .map_err(|e| tracing::warn!(error = %e, "ignoring malformed movie header"))
            .ok(),
    };
    if let Some(header) = header {
        out.canvas = header.view_box.map(|vb| Canvas {
            width: vb.width,
            height: vb.height,
        });
        out.fps = header.fps.and_then(non_negative).map(|v| v as u32);
        out.frames = header.frames.and_then(non_negative).map(|v| v as usize);
    }

    if let Value::Object(images) = envelope.images {
        for (key, value) in images {
            match value {
                Value::String(stem) => out.images.push((key, stem)),
                _ => tracing::warn!(key = %key, "skipping non-string image entry"),
            }
        }
    }

    if let Value::Array(sprites) = envelope.sprites {
        out.sprites = sprites.into_iter().filter_map(parse_sprite).collect();
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/decode/json.rs"]
mod tests;
