use super::*;
use crate::model::movie::{Shape, ShapeKind, SpriteFrame};

fn rect_shape() -> Shape {
    Shape {
        kind: ShapeKind::Rect {
            x: 0.0,
            y: 0.0,
            width: 5.0,
            height: 5.0,
            corner_radius: 0.0,
        },
        style: None,
        transform: Affine::IDENTITY,
    }
}

fn frame(alpha: f64, transform: Affine, shapes: Vec<Shape>) -> SpriteFrame {
    SpriteFrame::new(
        alpha,
        Rect::new(10.0, 20.0, 50.0, 40.0),
        transform,
        None,
        shapes,
    )
}

fn keep_sprite(keeps: usize) -> Sprite {
    let mut frames = vec![frame(1.0, Affine::IDENTITY, vec![rect_shape()])];
    for _ in 0..keeps {
        frames.push(frame(1.0, Affine::IDENTITY, vec![Shape::keep()]));
    }
    Sprite::new(Some("s".to_string()), None, frames)
}

#[test]
fn sequential_keep_frames_reuse_shape_nodes() {
    let sprite = keep_sprite(3);
    let mut node = SpriteNode::new(0, &sprite);
    node.step_to_frame(&sprite, 0);
    let first = Rc::clone(&node.shapes()[0]);
    assert_eq!(node.rebuild_count(), 1);

    for f in 1..=3 {
        node.step_to_frame(&sprite, f);
        assert!(Rc::ptr_eq(&first, &node.shapes()[0]));
        assert_eq!(node.drawn_frame(), Some(f));
    }
    assert_eq!(node.rebuild_count(), 1);
}

#[test]
fn jumping_into_a_keep_run_rebuilds() {
    let sprite = keep_sprite(3);
    let mut node = SpriteNode::new(0, &sprite);
    node.step_to_frame(&sprite, 0);
    let first = Rc::clone(&node.shapes()[0]);

    node.step_to_frame(&sprite, 3);
    assert_eq!(node.rebuild_count(), 2);
    assert!(!Rc::ptr_eq(&first, &node.shapes()[0]));
    assert_eq!(*node.shapes()[0], *first);
}

#[test]
fn keep_without_base_draws_nothing() {
    let sprite = Sprite::new(
        None,
        None,
        vec![frame(1.0, Affine::IDENTITY, vec![Shape::keep()])],
    );
    let mut node = SpriteNode::new(0, &sprite);
    node.step_to_frame(&sprite, 0);
    assert!(node.shapes().is_empty());
    assert!(!node.is_hidden());
}

#[test]
fn out_of_range_and_zero_alpha_hide() {
    let sprite = Sprite::new(
        None,
        None,
        vec![
            frame(0.5, Affine::translate((3.0, 4.0)), vec![rect_shape()]),
            frame(0.0, Affine::translate((100.0, 100.0)), vec![]),
        ],
    );
    let mut node = SpriteNode::new(0, &sprite);
    assert!(node.is_hidden());

    node.step_to_frame(&sprite, 0);
    assert!(!node.is_hidden());
    assert_eq!(node.opacity(), 0.5);
    let placed = node.world_transform();

    node.step_to_frame(&sprite, 1);
    assert!(node.is_hidden());
    assert_eq!(node.world_transform(), placed);

    node.step_to_frame(&sprite, 0);
    node.step_to_frame(&sprite, 7);
    assert!(node.is_hidden());
}

#[test]
fn world_transform_places_the_transformed_layout() {
    let transforms = [
        Affine::IDENTITY,
        Affine::translate((7.0, -3.0)),
        Affine::rotate(0.7).then_translate(Vec2::new(12.0, 5.0)),
        Affine::new([2.0, 0.5, -0.25, 1.5, 3.0, 9.0]),
    ];
    for t in transforms {
        let sprite = Sprite::new(None, None, vec![frame(1.0, t, vec![])]);
        let mut node = SpriteNode::new(0, &sprite);
        node.step_to_frame(&sprite, 0);

        let expected = t * Affine::translate((10.0, 20.0));
        let got = node.world_transform();
        for (g, e) in got.as_coeffs().iter().zip(expected.as_coeffs()) {
            assert!((g - e).abs() < 1e-9, "{got:?} vs {expected:?}");
        }
        assert_eq!(node.bounds(), Rect::new(0.0, 0.0, 40.0, 20.0));
    }
}

#[test]
fn degenerate_transform_does_not_poison_position() {
    let t = Affine::new([f64::NAN, 0.0, 0.0, 1.0, 0.0, 0.0]);
    let layout = Rect::new(0.0, 0.0, 10.0, 10.0);
    let p = corrected_position(layout, t, Point::ZERO);
    assert!(p.x.is_finite());
    assert!(p.y.is_finite());
}

#[test]
fn dynamic_hidden_freezes_the_node() {
    let sprite = keep_sprite(1);
    let mut node = SpriteNode::new(0, &sprite);
    node.set_dynamic_hidden(true);
    node.step_to_frame(&sprite, 0);
    assert!(node.is_hidden());
    assert_eq!(node.drawn_frame(), None);

    node.set_dynamic_hidden(false);
    node.step_to_frame(&sprite, 0);
    assert!(!node.is_hidden());
    node.reset();
    assert!(node.is_hidden());
    assert!(node.shapes().is_empty());
}
