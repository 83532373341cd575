//! Mapping the movie canvas into a host viewport.

use crate::foundation::core::{Affine, Canvas, Size};

/// How the canvas is fitted into the viewport.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ContentMode {
    /// Stretch both axes independently.
    #[default]
    ScaleToFill,
    /// Uniform scale showing the whole canvas, centered.
    AspectFit,
    /// Uniform scale covering the viewport, centered and cropped.
    AspectFill,
    /// Match widths, pin to the top edge.
    Top,
    /// Match widths, pin to the bottom edge.
    Bottom,
    /// Match heights, pin to the left edge.
    Left,
    /// Match heights, pin to the right edge.
    Right,
}

/// Root transform from canvas coordinates to viewport coordinates.
///
/// An empty or non-finite canvas yields the identity.
pub fn fit_transform(canvas: Canvas, viewport: Size, mode: ContentMode) -> Affine {
    let (vw, vh) = (canvas.width, canvas.height);
    if !(vw > 0.0 && vh > 0.0 && vw.is_finite() && vh.is_finite()) {
        return Affine::IDENTITY;
    }
    let (w, h) = (viewport.width, viewport.height);
    let canvas_ratio = vw / vh;
    let viewport_ratio = w / h;

    let match_width = |s: f64| Affine::new([s, 0.0, 0.0, s, 0.0, (h - vh * s) / 2.0]);
    let match_height = |s: f64| Affine::new([s, 0.0, 0.0, s, (w - vw * s) / 2.0, 0.0]);

    match mode {
        ContentMode::AspectFit => {
            if canvas_ratio > viewport_ratio {
                match_width(w / vw)
            } else {
                match_height(h / vh)
            }
        }
        ContentMode::AspectFill => {
            if canvas_ratio < viewport_ratio {
                match_width(w / vw)
            } else {
                match_height(h / vh)
            }
        }
        ContentMode::Top => Affine::scale(w / vw),
        ContentMode::Bottom => {
            let s = w / vw;
            Affine::new([s, 0.0, 0.0, s, 0.0, h - vh * s])
        }
        ContentMode::Left => Affine::scale(h / vh),
        ContentMode::Right => {
            let s = h / vh;
            Affine::new([s, 0.0, 0.0, s, w - vw * s, 0.0])
        }
        ContentMode::ScaleToFill => Affine::scale_non_uniform(w / vw, h / vh),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/layout.rs"]
mod tests;
