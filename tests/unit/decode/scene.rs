use std::io::Write;

use super::*;
use crate::decode::raster::ImageCrateDecoder;

fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "svga_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn png_bytes() -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(2, 3, image::Rgba([255, 0, 0, 128]));
    let mut buf = Vec::new();
    img.write_to(&mut std::io::Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn zlib(bytes: &[u8]) -> Vec<u8> {
    let mut enc = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
    enc.write_all(bytes).unwrap();
    enc.finish().unwrap()
}

fn sample_entity() -> proto::MovieEntity {
    let frame = proto::FrameEntity {
        alpha: 1.0,
        layout: Some(proto::Layout {
            x: 0.0,
            y: 0.0,
            width: 10.0,
            height: 10.0,
        }),
        transform: Some(proto::Transform {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            tx: 4.0,
            ty: 8.0,
        }),
        clip_path: String::new(),
        shapes: vec![proto::ShapeEntity {
            r#type: proto::shape_type::ELLIPSE,
            args: Some(proto::shape_entity::Args::Ellipse(proto::EllipseArgs {
                x: 5.0,
                y: 5.0,
                radius_x: 2.0,
                radius_y: 3.0,
            })),
            styles: Some(proto::ShapeStyle {
                fill: Some(proto::RgbaColor {
                    r: 0.0,
                    g: 1.0,
                    b: 0.0,
                    a: 1.0,
                }),
                stroke_width: 2.0,
                line_cap: proto::line_cap::SQUARE,
                line_join: proto::line_join::ROUND,
                line_dash_i: 0.5,
                ..Default::default()
            }),
            transform: None,
        }],
    };
    let keep = proto::FrameEntity {
        alpha: 1.0,
        shapes: vec![proto::ShapeEntity {
            r#type: proto::shape_type::KEEP,
            ..Default::default()
        }],
        ..Default::default()
    };

    let mut images = HashMap::new();
    images.insert("embedded".to_string(), png_bytes());
    images.insert("named".to_string(), b"named_file".to_vec());
    images.insert("voice".to_string(), b"ID3\x04\x00rest-of-mp3".to_vec());
    images.insert("missing".to_string(), b"nowhere".to_vec());
    images.insert("garbage".to_string(), vec![0xFF, 0x00, 0x13, 0x37]);

    proto::MovieEntity {
        version: "2.0.0".to_string(),
        params: Some(proto::MovieParams {
            view_box_width: 300.0,
            view_box_height: 200.0,
            fps: 0,
            frames: 1,
        }),
        images,
        sprites: vec![proto::SpriteEntity {
            image_key: "embedded".to_string(),
            frames: vec![frame, keep],
            matte_key: String::new(),
        }],
        audios: vec![proto::AudioEntity {
            audio_key: "voice".to_string(),
            start_frame: 5,
            end_frame: 20,
            start_time: 1500,
            total_time: 4000,
        }],
    }
}

#[test]
fn compressed_binary_decodes_with_assets() {
    let dir = temp_dir("scene_binary");
    std::fs::write(dir.join("named_file.png"), png_bytes()).unwrap();

    let bytes = zlib(&sample_entity().encode_to_vec());
    let movie = decode_binary(&bytes, Some(dir.as_path()), &ImageCrateDecoder).unwrap();

    assert_eq!(movie.version, "2.0.0");
    assert_eq!(movie.canvas.width, 300.0);
    assert_eq!(movie.fps, DEFAULT_FPS);
    assert_eq!(movie.frames, 2);
    assert_eq!(movie.cache_dir.as_deref(), Some(dir.as_path()));

    let mut image_keys: Vec<_> = movie.images.keys().cloned().collect();
    image_keys.sort();
    assert_eq!(image_keys, vec!["embedded".to_string(), "named".to_string()]);
    assert_eq!(movie.images["embedded"].width, 2);
    assert_eq!(movie.images["embedded"].height, 3);
    assert_eq!(movie.audios.len(), 1);
    assert_eq!(&movie.audios["voice"][..3], b"ID3");

    assert_eq!(
        movie.audio_cues,
        vec![AudioCue {
            key: "voice".to_string(),
            start_frame: 5,
            end_frame: 20,
            start_time_ms: 1500,
            total_time_ms: 4000,
        }]
    );

    let sprite = &movie.sprites[0];
    assert_eq!(sprite.matte_key, None);
    assert_eq!(sprite.keep_base(1), Some(0));
    let frame = &sprite.frames[0];
    assert_eq!(frame.clip_path, None);
    assert_eq!(frame.bound_origin, crate::foundation::core::Point::new(4.0, 8.0));
    let style = frame.shapes[0].style.as_ref().unwrap();
    assert_eq!(style.fill, Some(Rgba::new(0.0, 1.0, 0.0, 1.0)));
    assert_eq!(style.line_cap, LineCap::Square);
    assert_eq!(style.line_join, LineJoin::Round);
    assert_eq!(style.line_dash, Some([0.5, 0.0, 0.0]));

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn raw_message_decodes_without_inflating() {
    let bytes = sample_entity().encode_to_vec();
    assert!(!container::is_zlib_stream(&bytes));
    let movie = decode_binary(&bytes, None, &ImageCrateDecoder).unwrap();
    assert_eq!(movie.sprites.len(), 1);
    // Named assets need a directory.
    assert!(!movie.images.contains_key("named"));
}

#[test]
fn stream_failures_and_structured_failures_are_distinguished() {
    let err = decode_stream(b"\x78\x9c\x01\x02", None, &ImageCrateDecoder).unwrap_err();
    assert_eq!(err.decode_kind(), Some(DecodeKind::Stream));

    let err = decode_binary(&zlib(b"\xff\xff\xff\xff"), None, &ImageCrateDecoder).unwrap_err();
    assert_eq!(err.decode_kind(), Some(DecodeKind::Structured));
}

#[test]
fn missing_params_use_defaults() {
    let entity = proto::MovieEntity::default();
    let movie = decode_binary(&zlib(&entity.encode_to_vec()), None, &ImageCrateDecoder).unwrap();
    assert_eq!(movie.canvas, Canvas::default());
    assert_eq!(movie.fps, DEFAULT_FPS);
    assert_eq!(movie.frames, 0);
}

#[test]
fn json_images_resolve_with_png_suffix_and_plain_keys() {
    let dir = temp_dir("scene_json");
    std::fs::write(dir.join("abc123.png"), png_bytes()).unwrap();
    std::fs::write(
        dir.join(container::SPEC_FILE),
        br#"{
            "movie": { "viewBox": { "width": 50, "height": 60 }, "fps": 24, "frames": 3 },
            "images": { "hero.png": "abc123", "lost": "zzz" },
            "sprites": [ { "imageKey": "hero.png", "frames": [ { "alpha": 1 } ] } ]
        }"#,
    )
    .unwrap();

    let movie = decode_dir(&dir, &ImageCrateDecoder).unwrap();
    assert_eq!(movie.fps, 24);
    assert_eq!(movie.frames, 3);
    assert_eq!(movie.canvas.height, 60.0);
    assert!(movie.images.contains_key("hero"));
    assert!(!movie.images.contains_key("lost"));
    assert!(movie.image_for("hero.png").is_some());
    assert_eq!(movie.sprites[0].bitmap_key(), Some("hero"));

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn named_asset_falls_back_to_bare_name() {
    let dir = temp_dir("scene_named");
    std::fs::write(dir.join("plain"), b"x").unwrap();
    assert_eq!(resolve_named_asset(&dir, "plain"), Some(dir.join("plain")));
    std::fs::write(dir.join("plain.png"), b"x").unwrap();
    assert_eq!(resolve_named_asset(&dir, "plain"), Some(dir.join("plain.png")));
    assert_eq!(resolve_named_asset(&dir, "absent"), None);
    std::fs::remove_dir_all(&dir).ok();
}
