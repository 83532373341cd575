//! Scene decoding: structured binary or JSON bytes plus assets into a [`Movie`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use prost::Message;

use crate::decode::container::{self, MovieDocument};
use crate::decode::json::{self, JsonMovie};
use crate::decode::proto;
use crate::decode::raster::{RasterDecoder, RasterImage};
use crate::foundation::core::{Affine, Canvas, Rect, Rgba};
use crate::foundation::error::{DecodeKind, SvgaError, SvgaResult};
use crate::model::movie::{
    AudioCue, DEFAULT_FPS, LineCap, LineJoin, Movie, Shape, ShapeKind, ShapeStyle, Sprite,
    SpriteFrame, strip_extension,
};

/// Leading bytes of an ID3-tagged audio payload.
pub const AUDIO_TAG: &[u8; 3] = b"ID3";

const MAX_FILENAME_LEN: usize = 255;

/// Decode whatever movie document `dir` holds.
pub fn decode_dir(dir: &Path, raster: &dyn RasterDecoder) -> SvgaResult<Movie> {
    let doc = container::read_document(dir)?;
    decode_document(doc, dir, raster)
}

/// Decode a document read from `dir`.
pub fn decode_document(
    doc: MovieDocument,
    dir: &Path,
    raster: &dyn RasterDecoder,
) -> SvgaResult<Movie> {
    match doc {
        MovieDocument::Binary(bytes) => decode_binary(&bytes, Some(dir), raster),
        MovieDocument::Json(bytes) => decode_json(&bytes, Some(dir), raster),
    }
}

/// Decode `movie.binary` contents, inflating first when they carry a zlib header.
///
/// Extracted archives hold the message uncompressed; downloaded files hold it compressed.
#[tracing::instrument(skip_all, fields(bytes = bytes.len()))]
pub fn decode_binary(
    bytes: &[u8],
    dir: Option<&Path>,
    raster: &dyn RasterDecoder,
) -> SvgaResult<Movie> {
    if container::is_zlib_stream(bytes) {
        decode_stream(bytes, dir, raster)
    } else {
        decode_message(bytes, dir, raster)
    }
}

/// Inflate a compressed stream and decode the structured message inside it.
#[tracing::instrument(skip_all, fields(bytes = bytes.len()))]
pub fn decode_stream(
    bytes: &[u8],
    dir: Option<&Path>,
    raster: &dyn RasterDecoder,
) -> SvgaResult<Movie> {
    let inflated = container::inflate(bytes)?;
    decode_message(&inflated, dir, raster)
}

fn decode_message(bytes: &[u8], dir: Option<&Path>, raster: &dyn RasterDecoder) -> SvgaResult<Movie> {
    let entity = proto::MovieEntity::decode(bytes)
        .map_err(|e| SvgaError::decode(DecodeKind::Structured, e.to_string()))?;
    Ok(movie_from_entity(entity, dir, raster))
}

/// Decode a JSON specification, resolving its images against `dir`.
#[tracing::instrument(skip_all, fields(bytes = bytes.len()))]
pub fn decode_json(
    bytes: &[u8],
    dir: Option<&Path>,
    raster: &dyn RasterDecoder,
) -> SvgaResult<Movie> {
    let parsed = json::parse_json(bytes)?;
    Ok(movie_from_json(parsed, dir, raster))
}

fn movie_from_json(parsed: JsonMovie, dir: Option<&Path>, raster: &dyn RasterDecoder) -> Movie {
    let mut images = HashMap::new();
    if let Some(dir) = dir {
        for (key, stem) in parsed.images {
            let path = dir.join(format!("{stem}.png"));
            if let Some(img) = load_raster_file(&path, raster) {
                images.insert(strip_extension(&key).to_string(), Arc::new(img));
            } else {
                tracing::warn!(key = %key, path = %path.display(), "dropping unresolved image");
            }
        }
    }

    Movie {
        version: String::new(),
        canvas: parsed.canvas.unwrap_or_default(),
        fps: parsed.fps.unwrap_or(DEFAULT_FPS),
        frames: parsed.frames.unwrap_or(0),
        images,
        audios: HashMap::new(),
        sprites: parsed.sprites,
        audio_cues: Vec::new(),
        cache_dir: dir.map(Path::to_path_buf),
    }
    .normalized()
}

fn movie_from_entity(
    entity: proto::MovieEntity,
    dir: Option<&Path>,
    raster: &dyn RasterDecoder,
) -> Movie {
    let (canvas, fps, frames) = match &entity.params {
        Some(p) => (
            Canvas {
                width: f64::from(p.view_box_width),
                height: f64::from(p.view_box_height),
            },
            u32::try_from(p.fps).unwrap_or(0),
            usize::try_from(p.frames).unwrap_or(0),
        ),
        None => (Canvas::default(), DEFAULT_FPS, 0),
    };

    let mut images = HashMap::new();
    let mut audios = HashMap::new();
    for (key, payload) in entity.images {
        match classify_asset(&payload, dir, raster) {
            Some(Asset::Image(img)) => {
                images.insert(key, Arc::new(img));
            }
            Some(Asset::Audio) => {
                audios.insert(key, Arc::from(payload));
            }
            None => tracing::warn!(key = %key, "dropping unresolved asset"),
        }
    }

    let sprites = entity.sprites.into_iter().map(sprite_from_entity).collect();
    let audio_cues = entity
        .audios
        .into_iter()
        .map(|a| AudioCue {
            key: a.audio_key,
            start_frame: usize::try_from(a.start_frame).unwrap_or(0),
            end_frame: usize::try_from(a.end_frame).unwrap_or(0),
            start_time_ms: u64::try_from(a.start_time).unwrap_or(0),
            total_time_ms: u64::try_from(a.total_time).unwrap_or(0),
        })
        .collect();

    Movie {
        version: entity.version,
        canvas,
        fps,
        frames,
        images,
        audios,
        sprites,
        audio_cues,
        cache_dir: dir.map(Path::to_path_buf),
    }
    .normalized()
}

enum Asset {
    Image(RasterImage),
    Audio,
}

fn classify_asset(payload: &[u8], dir: Option<&Path>, raster: &dyn RasterDecoder) -> Option<Asset> {
    if let Some(name) = filename_payload(payload) {
        let dir = dir?;
        return resolve_named_asset(dir, name)
            .and_then(|path| load_raster_file(&path, raster))
            .map(Asset::Image);
    }
    if payload.starts_with(AUDIO_TAG) {
        return Some(Asset::Audio);
    }
    match raster.decode(payload) {
        Ok(img) => Some(Asset::Image(img)),
        Err(e) => {
            tracing::warn!(error = %e, "embedded asset failed to decode");
            None
        }
    }
}

/// Payloads that read as a short printable UTF-8 string name a file next to the movie.
fn filename_payload(payload: &[u8]) -> Option<&str> {
    if payload.is_empty() || payload.len() > MAX_FILENAME_LEN || payload.starts_with(AUDIO_TAG) {
        return None;
    }
    let name = std::str::from_utf8(payload).ok()?;
    name.chars().all(|c| !c.is_control()).then_some(name)
}

/// `<dir>/<name>.png` first, then `<dir>/<name>`.
pub fn resolve_named_asset(dir: &Path, name: &str) -> Option<PathBuf> {
    [dir.join(format!("{name}.png")), dir.join(name)]
        .into_iter()
        .find(|p| p.is_file())
}

fn load_raster_file(path: &Path, raster: &dyn RasterDecoder) -> Option<RasterImage> {
    let bytes = std::fs::read(path).ok()?;
    match raster.decode(&bytes) {
        Ok(img) => Some(img),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "image file failed to decode");
            None
        }
    }
}

fn sprite_from_entity(entity: proto::SpriteEntity) -> Sprite {
    let frames = entity.frames.into_iter().map(frame_from_entity).collect();
    Sprite::new(Some(entity.image_key), Some(entity.matte_key), frames)
}

fn affine(t: Option<&proto::Transform>) -> Affine {
    t.map_or(Affine::IDENTITY, |t| {
        Affine::new([
            f64::from(t.a),
            f64::from(t.b),
            f64::from(t.c),
            f64::from(t.d),
            f64::from(t.tx),
            f64::from(t.ty),
        ])
    })
}

fn frame_from_entity(entity: proto::FrameEntity) -> SpriteFrame {
    let layout = entity.layout.map_or(Rect::ZERO, |l| {
        let (x, y) = (f64::from(l.x), f64::from(l.y));
        Rect::new(x, y, x + f64::from(l.width), y + f64::from(l.height))
    });
    let shapes = entity.shapes.into_iter().map(shape_from_entity).collect();
    SpriteFrame::new(
        f64::from(entity.alpha),
        layout,
        affine(entity.transform.as_ref()),
        Some(entity.clip_path),
        shapes,
    )
}

fn shape_from_entity(entity: proto::ShapeEntity) -> Shape {
    use proto::shape_entity::Args;

    let kind = match (entity.r#type, entity.args) {
        (proto::shape_type::KEEP, _) => return Shape::keep(),
        (proto::shape_type::RECT, args) => {
            let r = match args {
                Some(Args::Rect(r)) => r,
                _ => proto::RectArgs::default(),
            };
            ShapeKind::Rect {
                x: f64::from(r.x),
                y: f64::from(r.y),
                width: f64::from(r.width),
                height: f64::from(r.height),
                corner_radius: f64::from(r.corner_radius),
            }
        }
        (proto::shape_type::ELLIPSE, args) => {
            let e = match args {
                Some(Args::Ellipse(e)) => e,
                _ => proto::EllipseArgs::default(),
            };
            ShapeKind::Ellipse {
                x: f64::from(e.x),
                y: f64::from(e.y),
                radius_x: f64::from(e.radius_x),
                radius_y: f64::from(e.radius_y),
            }
        }
        (_, Some(Args::Shape(s))) => ShapeKind::Path { d: s.d },
        _ => ShapeKind::Path { d: String::new() },
    };

    Shape {
        kind,
        style: entity.styles.map(style_from_entity),
        transform: affine(entity.transform.as_ref()),
    }
}

fn rgba(c: proto::RgbaColor) -> Rgba {
    Rgba::new(c.r, c.g, c.b, c.a)
}

fn style_from_entity(s: proto::ShapeStyle) -> ShapeStyle {
    let line_dash = (s.line_dash_i > 0.0 || s.line_dash_ii > 0.0).then(|| {
        [
            f64::from(s.line_dash_i),
            f64::from(s.line_dash_ii),
            f64::from(s.line_dash_iii),
        ]
    });
    ShapeStyle {
        fill: s.fill.map(rgba),
        stroke: s.stroke.map(rgba),
        stroke_width: f64::from(s.stroke_width),
        line_cap: match s.line_cap {
            proto::line_cap::ROUND => LineCap::Round,
            proto::line_cap::SQUARE => LineCap::Square,
            _ => LineCap::Butt,
        },
        line_join: match s.line_join {
            proto::line_join::ROUND => LineJoin::Round,
            proto::line_join::BEVEL => LineJoin::Bevel,
            _ => LineJoin::Miter,
        },
        miter_limit: f64::from(s.miter_limit),
        line_dash,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/decode/scene.rs"]
mod tests;
