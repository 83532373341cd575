use super::*;
use crate::foundation::core::Point;

fn canvas(width: f64, height: f64) -> Canvas {
    Canvas { width, height }
}

fn map(t: Affine, x: f64, y: f64) -> (f64, f64) {
    let p = t * Point::new(x, y);
    (p.x, p.y)
}

#[test]
fn aspect_fit_letterboxes_wide_canvas() {
    let t = fit_transform(canvas(200.0, 100.0), Size::new(100.0, 100.0), ContentMode::AspectFit);
    assert_eq!(map(t, 0.0, 0.0), (0.0, 25.0));
    assert_eq!(map(t, 200.0, 100.0), (100.0, 75.0));
}

#[test]
fn aspect_fit_pillarboxes_tall_canvas() {
    let t = fit_transform(canvas(100.0, 200.0), Size::new(100.0, 100.0), ContentMode::AspectFit);
    assert_eq!(map(t, 0.0, 0.0), (25.0, 0.0));
    assert_eq!(map(t, 100.0, 200.0), (75.0, 100.0));
}

#[test]
fn aspect_fill_covers_and_crops() {
    let t = fit_transform(canvas(200.0, 100.0), Size::new(100.0, 100.0), ContentMode::AspectFill);
    assert_eq!(map(t, 0.0, 0.0), (-50.0, 0.0));
    assert_eq!(map(t, 200.0, 100.0), (150.0, 100.0));
}

#[test]
fn edge_modes_pin_to_their_side() {
    let c = canvas(100.0, 100.0);
    let v = Size::new(50.0, 200.0);
    assert_eq!(map(fit_transform(c, v, ContentMode::Top), 100.0, 100.0), (50.0, 50.0));
    assert_eq!(map(fit_transform(c, v, ContentMode::Bottom), 0.0, 0.0), (0.0, 150.0));

    let v = Size::new(200.0, 50.0);
    assert_eq!(map(fit_transform(c, v, ContentMode::Left), 100.0, 100.0), (50.0, 50.0));
    assert_eq!(map(fit_transform(c, v, ContentMode::Right), 0.0, 0.0), (150.0, 0.0));
}

#[test]
fn scale_to_fill_stretches_and_is_default() {
    assert_eq!(ContentMode::default(), ContentMode::ScaleToFill);
    let t = fit_transform(canvas(100.0, 50.0), Size::new(300.0, 200.0), ContentMode::default());
    assert_eq!(map(t, 100.0, 50.0), (300.0, 200.0));
}

#[test]
fn empty_canvas_is_identity() {
    let t = fit_transform(canvas(0.0, 10.0), Size::new(10.0, 10.0), ContentMode::AspectFit);
    assert_eq!(t, Affine::IDENTITY);
}
