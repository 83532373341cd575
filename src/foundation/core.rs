use crate::foundation::error::{SvgaError, SvgaResult};

pub use kurbo::{Affine, BezPath, Point, Rect, Size, Vec2};

/// Half-open frame range `[start, end)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct FrameRange {
    /// First frame in the range.
    pub start: usize,
    /// One past the last frame.
    pub end: usize, // exclusive
}

impl FrameRange {
    /// Build a range from explicit bounds.
    pub fn new(start: usize, end: usize) -> SvgaResult<Self> {
        if start > end {
            return Err(SvgaError::validation("FrameRange start must be <= end"));
        }
        Ok(Self { start, end })
    }

    /// Build a range from a start frame and a length.
    pub fn with_len(start: usize, len: usize) -> Self {
        Self {
            start,
            end: start.saturating_add(len),
        }
    }

    /// Number of frames covered.
    pub fn len_frames(self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Whether the range covers no frames.
    pub fn is_empty(self) -> bool {
        self.start >= self.end
    }

    /// Whether `f` lies inside the range.
    pub fn contains(self, f: usize) -> bool {
        self.start <= f && f < self.end
    }

    /// Intersect with `[0, total)`.
    pub fn clip_to(self, total: usize) -> Self {
        let end = self.end.min(total);
        Self {
            start: self.start.min(end),
            end,
        }
    }

    /// Last frame covered, if any.
    pub fn last(self) -> Option<usize> {
        if self.is_empty() {
            None
        } else {
            Some(self.end - 1)
        }
    }
}

/// Movie canvas size in points.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Canvas width.
    pub width: f64,
    /// Canvas height.
    pub height: f64,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 100.0,
            height: 100.0,
        }
    }
}

/// Straight-alpha RGBA color with channels in `[0, 1]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Rgba {
    /// Red channel.
    pub r: f32,
    /// Green channel.
    pub g: f32,
    /// Blue channel.
    pub b: f32,
    /// Alpha channel.
    pub a: f32,
}

impl Rgba {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 0.0,
    };

    /// Build a color, clamping every channel into `[0, 1]`.
    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        fn unit(v: f32) -> f32 {
            if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
        }
        Self {
            r: unit(r),
            g: unit(g),
            b: unit(b),
            a: unit(a),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
