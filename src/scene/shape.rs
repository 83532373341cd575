//! Drawable shape nodes synthesized from [`Shape`] descriptions.

use kurbo::{Cap, Ellipse, Join, RoundedRect, Stroke};
use kurbo::Shape as _;

use crate::foundation::core::{Affine, BezPath, Point, Rect, Rgba};
use crate::model::movie::{LineCap, LineJoin, Shape, ShapeKind, ShapeStyle};
use crate::path::interpreter::interpret;

/// Flattening tolerance used when converting analytic shapes to paths.
pub const PATH_TOLERANCE: f64 = 0.1;

/// Smallest first dash length.
pub const MIN_DASH: f64 = 1.0;

/// Smallest second dash length.
pub const MIN_GAP: f64 = 0.1;

#[derive(Clone, Debug, PartialEq)]
/// Stroke paint for a shape node.
pub struct StrokePaint {
    /// Stroke color.
    pub color: Rgba,
    /// Width, caps, join, miter limit and dashes.
    pub style: Stroke,
}

#[derive(Clone, Debug, PartialEq)]
/// Geometry plus paint, ready for a host rasterizer.
pub struct ShapeNode {
    /// Geometry in sprite-local space, before [`transform`](Self::transform).
    pub geometry: BezPath,
    /// Fill color; transparent when unspecified.
    pub fill: Rgba,
    /// Stroke, omitted when the shape specifies no stroke color.
    pub stroke: Option<StrokePaint>,
    /// Local transform.
    pub transform: Affine,
}

impl ShapeNode {
    /// Synthesize a node; keep sentinels produce nothing.
    pub fn build(shape: &Shape) -> Option<Self> {
        let geometry = match &shape.kind {
            ShapeKind::Keep => return None,
            ShapeKind::Path { d } => interpret(d),
            ShapeKind::Rect {
                x,
                y,
                width,
                height,
                corner_radius,
            } => RoundedRect::from_rect(
                Rect::new(*x, *y, x + width, y + height),
                *corner_radius,
            )
            .to_path(PATH_TOLERANCE),
            ShapeKind::Ellipse {
                x,
                y,
                radius_x,
                radius_y,
            } => Ellipse::new(Point::new(*x, *y), (*radius_x, *radius_y), 0.0)
                .to_path(PATH_TOLERANCE),
        };

        let (fill, stroke) = match &shape.style {
            Some(style) => (style.fill.unwrap_or(Rgba::TRANSPARENT), stroke_paint(style)),
            None => (Rgba::TRANSPARENT, None),
        };

        Some(Self {
            geometry,
            fill,
            stroke,
            transform: shape.transform,
        })
    }
}

fn stroke_paint(style: &ShapeStyle) -> Option<StrokePaint> {
    let color = style.stroke?;
    let mut stroke = Stroke::new(style.stroke_width)
        .with_caps(match style.line_cap {
            LineCap::Butt => Cap::Butt,
            LineCap::Round => Cap::Round,
            LineCap::Square => Cap::Square,
        })
        .with_join(match style.line_join {
            LineJoin::Miter => Join::Miter,
            LineJoin::Round => Join::Round,
            LineJoin::Bevel => Join::Bevel,
        })
        .with_miter_limit(style.miter_limit);
    if let Some(dash) = style.line_dash {
        let (pattern, phase) = dash_pattern(dash);
        stroke = stroke.with_dashes(phase, pattern);
    }
    Some(StrokePaint {
        color,
        style: stroke,
    })
}

/// Clamp `[dash, gap, phase]` to a non-degenerate dash pattern and its phase.
pub fn dash_pattern(dash: [f64; 3]) -> ([f64; 2], f64) {
    ([dash[0].max(MIN_DASH), dash[1].max(MIN_GAP)], dash[2])
}

#[cfg(test)]
#[path = "../../tests/unit/scene/shape.rs"]
mod tests;
