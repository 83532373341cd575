//! Structured binary movie schema.
//!
//! Field numbers follow the published SVGA 2.x protobuf description. Enumerations are carried as
//! raw `int32` values and mapped by the scene decoder so unknown values degrade to defaults.

use std::collections::HashMap;

/// Root message of `movie.binary`.
#[derive(Clone, PartialEq, prost::Message)]
pub struct MovieEntity {
    /// Format version.
    #[prost(string, tag = "1")]
    pub version: String,
    /// Canvas and timing parameters.
    #[prost(message, optional, tag = "2")]
    pub params: Option<MovieParams>,
    /// Embedded assets: either a filename or the asset payload itself.
    #[prost(map = "string, bytes", tag = "3")]
    pub images: HashMap<String, Vec<u8>>,
    /// Sprites in paint order.
    #[prost(message, repeated, tag = "4")]
    pub sprites: Vec<SpriteEntity>,
    /// Audio cues.
    #[prost(message, repeated, tag = "5")]
    pub audios: Vec<AudioEntity>,
}

/// Canvas and timing parameters.
#[derive(Clone, PartialEq, prost::Message)]
pub struct MovieParams {
    /// Canvas width.
    #[prost(float, tag = "1")]
    pub view_box_width: f32,
    /// Canvas height.
    #[prost(float, tag = "2")]
    pub view_box_height: f32,
    /// Frames per second.
    #[prost(int32, tag = "3")]
    pub fps: i32,
    /// Total frame count.
    #[prost(int32, tag = "4")]
    pub frames: i32,
}

/// One sprite timeline.
#[derive(Clone, PartialEq, prost::Message)]
pub struct SpriteEntity {
    /// Asset key.
    #[prost(string, tag = "1")]
    pub image_key: String,
    /// Per-frame state.
    #[prost(message, repeated, tag = "2")]
    pub frames: Vec<FrameEntity>,
    /// Matte key.
    #[prost(string, tag = "3")]
    pub matte_key: String,
}

/// Audio cue.
#[derive(Clone, PartialEq, prost::Message)]
pub struct AudioEntity {
    /// Asset key of the audio payload.
    #[prost(string, tag = "1")]
    pub audio_key: String,
    /// First frame.
    #[prost(int32, tag = "2")]
    pub start_frame: i32,
    /// Stop frame.
    #[prost(int32, tag = "3")]
    pub end_frame: i32,
    /// Offset into the audio asset in milliseconds.
    #[prost(int32, tag = "4")]
    pub start_time: i32,
    /// Asset duration in milliseconds.
    #[prost(int32, tag = "5")]
    pub total_time: i32,
}

/// Layout rectangle.
#[derive(Clone, PartialEq, prost::Message)]
pub struct Layout {
    /// Left edge.
    #[prost(float, tag = "1")]
    pub x: f32,
    /// Top edge.
    #[prost(float, tag = "2")]
    pub y: f32,
    /// Width.
    #[prost(float, tag = "3")]
    pub width: f32,
    /// Height.
    #[prost(float, tag = "4")]
    pub height: f32,
}

/// 2-D affine matrix `[a b c d tx ty]`.
#[derive(Clone, PartialEq, prost::Message)]
pub struct Transform {
    /// Scale X.
    #[prost(float, tag = "1")]
    pub a: f32,
    /// Shear Y.
    #[prost(float, tag = "2")]
    pub b: f32,
    /// Shear X.
    #[prost(float, tag = "3")]
    pub c: f32,
    /// Scale Y.
    #[prost(float, tag = "4")]
    pub d: f32,
    /// Translation X.
    #[prost(float, tag = "5")]
    pub tx: f32,
    /// Translation Y.
    #[prost(float, tag = "6")]
    pub ty: f32,
}

/// Sprite state for one frame.
#[derive(Clone, PartialEq, prost::Message)]
pub struct FrameEntity {
    /// Opacity.
    #[prost(float, tag = "1")]
    pub alpha: f32,
    /// Layout rectangle.
    #[prost(message, optional, tag = "2")]
    pub layout: Option<Layout>,
    /// Frame transform.
    #[prost(message, optional, tag = "3")]
    pub transform: Option<Transform>,
    /// Clip-path commands.
    #[prost(string, tag = "4")]
    pub clip_path: String,
    /// Shapes.
    #[prost(message, repeated, tag = "5")]
    pub shapes: Vec<ShapeEntity>,
}

/// Shape variant tags.
pub mod shape_type {
    /// Path command string.
    pub const SHAPE: i32 = 0;
    /// Rounded rectangle.
    pub const RECT: i32 = 1;
    /// Ellipse.
    pub const ELLIPSE: i32 = 2;
    /// Keep-frame sentinel.
    pub const KEEP: i32 = 3;
}

/// One shape.
#[derive(Clone, PartialEq, prost::Message)]
pub struct ShapeEntity {
    /// Variant tag, see [`shape_type`].
    #[prost(int32, tag = "1")]
    pub r#type: i32,
    /// Geometry arguments.
    #[prost(oneof = "shape_entity::Args", tags = "2, 3, 4")]
    pub args: Option<shape_entity::Args>,
    /// Paint style.
    #[prost(message, optional, tag = "10")]
    pub styles: Option<ShapeStyle>,
    /// Local transform.
    #[prost(message, optional, tag = "11")]
    pub transform: Option<Transform>,
}

/// Nested types of [`ShapeEntity`].
pub mod shape_entity {
    /// Geometry arguments for each shape variant.
    #[derive(Clone, PartialEq, prost::Oneof)]
    pub enum Args {
        /// Path arguments.
        #[prost(message, tag = "2")]
        Shape(super::ShapeArgs),
        /// Rectangle arguments.
        #[prost(message, tag = "3")]
        Rect(super::RectArgs),
        /// Ellipse arguments.
        #[prost(message, tag = "4")]
        Ellipse(super::EllipseArgs),
    }
}

/// Path arguments.
#[derive(Clone, PartialEq, prost::Message)]
pub struct ShapeArgs {
    /// Path commands.
    #[prost(string, tag = "1")]
    pub d: String,
}

/// Rounded-rectangle arguments.
#[derive(Clone, PartialEq, prost::Message)]
pub struct RectArgs {
    /// Left edge.
    #[prost(float, tag = "1")]
    pub x: f32,
    /// Top edge.
    #[prost(float, tag = "2")]
    pub y: f32,
    /// Width.
    #[prost(float, tag = "3")]
    pub width: f32,
    /// Height.
    #[prost(float, tag = "4")]
    pub height: f32,
    /// Corner radius.
    #[prost(float, tag = "5")]
    pub corner_radius: f32,
}

/// Ellipse arguments.
#[derive(Clone, PartialEq, prost::Message)]
pub struct EllipseArgs {
    /// Center X.
    #[prost(float, tag = "1")]
    pub x: f32,
    /// Center Y.
    #[prost(float, tag = "2")]
    pub y: f32,
    /// Horizontal radius.
    #[prost(float, tag = "3")]
    pub radius_x: f32,
    /// Vertical radius.
    #[prost(float, tag = "4")]
    pub radius_y: f32,
}

/// Straight RGBA color with components in `[0, 1]`.
#[derive(Clone, PartialEq, prost::Message)]
pub struct RgbaColor {
    /// Red.
    #[prost(float, tag = "1")]
    pub r: f32,
    /// Green.
    #[prost(float, tag = "2")]
    pub g: f32,
    /// Blue.
    #[prost(float, tag = "3")]
    pub b: f32,
    /// Alpha.
    #[prost(float, tag = "4")]
    pub a: f32,
}

/// Stroke cap values.
pub mod line_cap {
    /// Butt cap.
    pub const BUTT: i32 = 0;
    /// Round cap.
    pub const ROUND: i32 = 1;
    /// Square cap.
    pub const SQUARE: i32 = 2;
}

/// Stroke join values.
pub mod line_join {
    /// Miter join.
    pub const MITER: i32 = 0;
    /// Round join.
    pub const ROUND: i32 = 1;
    /// Bevel join.
    pub const BEVEL: i32 = 2;
}

/// Shape paint style.
#[derive(Clone, PartialEq, prost::Message)]
pub struct ShapeStyle {
    /// Fill color.
    #[prost(message, optional, tag = "1")]
    pub fill: Option<RgbaColor>,
    /// Stroke color.
    #[prost(message, optional, tag = "2")]
    pub stroke: Option<RgbaColor>,
    /// Stroke width.
    #[prost(float, tag = "3")]
    pub stroke_width: f32,
    /// Cap, see [`line_cap`].
    #[prost(int32, tag = "4")]
    pub line_cap: i32,
    /// Join, see [`line_join`].
    #[prost(int32, tag = "5")]
    pub line_join: i32,
    /// Miter limit.
    #[prost(float, tag = "6")]
    pub miter_limit: f32,
    /// First dash length.
    #[prost(float, tag = "7")]
    pub line_dash_i: f32,
    /// Second dash length.
    #[prost(float, tag = "8")]
    pub line_dash_ii: f32,
    /// Dash phase.
    #[prost(float, tag = "9")]
    pub line_dash_iii: f32,
}
