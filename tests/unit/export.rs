use super::*;
use crate::foundation::core::{Affine, Rect};
use crate::model::movie::{Shape, ShapeKind, Sprite, SpriteFrame};

fn movie() -> Arc<Movie> {
    let rect = Shape {
        kind: ShapeKind::Rect {
            x: 0.0,
            y: 0.0,
            width: 2.0,
            height: 2.0,
            corner_radius: 0.0,
        },
        style: None,
        transform: Affine::IDENTITY,
    };
    let layout = Rect::new(0.0, 0.0, 10.0, 10.0);
    let frames = vec![
        SpriteFrame::new(1.0, layout, Affine::translate((5.0, 0.0)), None, vec![rect]),
        SpriteFrame::new(
            0.5,
            layout,
            Affine::IDENTITY,
            Some("M0 0 L10 0 L10 10 Z".to_string()),
            vec![Shape::keep()],
        ),
        SpriteFrame::new(0.0, layout, Affine::IDENTITY, None, Vec::new()),
    ];
    Arc::new(
        Movie {
            sprites: vec![Sprite::new(Some("box".to_string()), None, frames)],
            ..Movie::default()
        }
        .normalized(),
    )
}

#[test]
fn snapshots_cover_every_frame() {
    let mut overrides = DynamicOverrides::default();
    let shots = snapshot_frames(movie(), &mut overrides);
    assert_eq!(shots.len(), 3);

    let first = &shots[0].nodes[0];
    assert!(first.visible);
    assert_eq!(first.world_transform, [1.0, 0.0, 0.0, 1.0, 5.0, 0.0]);
    assert_eq!(first.shapes, 1);
    assert!(!first.masked);

    let second = &shots[1].nodes[0];
    assert_eq!(second.opacity, 0.5);
    assert_eq!(second.shapes, 1);
    assert!(second.masked);

    let third = &shots[2].nodes[0];
    assert_eq!(shots[2].frame, 2);
    assert!(!third.visible);
    assert_eq!(third.opacity, 0.0);
}

#[test]
fn snapshots_serialize_to_json() {
    let mut overrides = DynamicOverrides::default();
    overrides.set_hidden("box", true);
    let shots = snapshot_frames(movie(), &mut overrides);
    assert!(shots.iter().all(|s| !s.nodes[0].visible));

    let json = serde_json::to_string(&shots[0]).unwrap();
    let back: FrameSnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(back, shots[0]);
    assert!(json.contains("\"image_key\":\"box\""));
}
