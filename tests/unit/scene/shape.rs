use kurbo::Shape as _;

use super::*;

fn styled(kind: ShapeKind, style: Option<ShapeStyle>) -> Shape {
    Shape {
        kind,
        style,
        transform: Affine::IDENTITY,
    }
}

fn bbox(node: &ShapeNode) -> Rect {
    node.geometry.bounding_box()
}

#[test]
fn keep_builds_nothing() {
    assert!(ShapeNode::build(&Shape::keep()).is_none());
}

#[test]
fn rect_and_ellipse_geometry() {
    let rect = ShapeNode::build(&styled(
        ShapeKind::Rect {
            x: 1.0,
            y: 2.0,
            width: 10.0,
            height: 4.0,
            corner_radius: 1.0,
        },
        None,
    ))
    .unwrap();
    let b = bbox(&rect);
    assert!((b.x0 - 1.0).abs() < 1e-6 && (b.x1 - 11.0).abs() < 1e-6);
    assert!((b.y0 - 2.0).abs() < 1e-6 && (b.y1 - 6.0).abs() < 1e-6);

    let ellipse = ShapeNode::build(&styled(
        ShapeKind::Ellipse {
            x: 5.0,
            y: 5.0,
            radius_x: 3.0,
            radius_y: 2.0,
        },
        None,
    ))
    .unwrap();
    let b = bbox(&ellipse);
    assert!((b.x0 - 2.0).abs() < 1e-6 && (b.x1 - 8.0).abs() < 1e-6);
    assert!((b.y0 - 3.0).abs() < 1e-6 && (b.y1 - 7.0).abs() < 1e-6);
}

#[test]
fn path_shapes_use_the_interpreter() {
    let node = ShapeNode::build(&styled(
        ShapeKind::Path {
            d: "M0 0 L10 0 L10 5 Z".to_string(),
        },
        None,
    ))
    .unwrap();
    assert_eq!(node.geometry, interpret("M0 0 L10 0 L10 5 Z"));
}

#[test]
fn unstyled_shapes_fill_transparent_without_stroke() {
    let node = ShapeNode::build(&styled(
        ShapeKind::Path {
            d: "M0 0 L1 1".to_string(),
        },
        Some(ShapeStyle {
            stroke_width: 3.0,
            ..ShapeStyle::default()
        }),
    ))
    .unwrap();
    assert_eq!(node.fill, Rgba::TRANSPARENT);
    assert!(node.stroke.is_none());
}

#[test]
fn stroke_carries_caps_join_and_clamped_dashes() {
    let red = Rgba::new(1.0, 0.0, 0.0, 1.0);
    let node = ShapeNode::build(&styled(
        ShapeKind::Path {
            d: "M0 0 L1 1".to_string(),
        },
        Some(ShapeStyle {
            fill: Some(red),
            stroke: Some(red),
            stroke_width: 2.0,
            line_cap: LineCap::Round,
            line_join: LineJoin::Bevel,
            miter_limit: 4.0,
            line_dash: Some([0.0, 0.0, 3.0]),
        }),
    ))
    .unwrap();
    assert_eq!(node.fill, red);
    let stroke = node.stroke.unwrap();
    assert_eq!(stroke.color, red);
    assert_eq!(stroke.style.width, 2.0);
    assert_eq!(stroke.style.start_cap, Cap::Round);
    assert_eq!(stroke.style.end_cap, Cap::Round);
    assert_eq!(stroke.style.join, Join::Bevel);
    assert_eq!(stroke.style.miter_limit, 4.0);
    assert_eq!(stroke.style.dash_pattern.as_slice(), &[MIN_DASH, MIN_GAP]);
    assert_eq!(stroke.style.dash_offset, 3.0);
}

#[test]
fn dash_pattern_keeps_long_dashes() {
    assert_eq!(dash_pattern([4.0, 2.0, 1.0]), ([4.0, 2.0], 1.0));
    assert_eq!(dash_pattern([0.5, 0.05, 0.0]), ([1.0, 0.1], 0.0));
}
