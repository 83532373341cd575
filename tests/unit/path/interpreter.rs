use kurbo::PathEl;

use super::*;

fn points(path: &BezPath) -> Vec<Point> {
    path.elements()
        .iter()
        .flat_map(|el| match *el {
            PathEl::MoveTo(p) | PathEl::LineTo(p) => vec![p],
            PathEl::QuadTo(a, b) => vec![a, b],
            PathEl::CurveTo(a, b, c) => vec![a, b, c],
            PathEl::ClosePath => vec![],
        })
        .collect()
}

fn assert_points_close(a: &[Point], b: &[Point]) {
    assert_eq!(a.len(), b.len(), "{a:?} vs {b:?}");
    for (p, q) in a.iter().zip(b) {
        assert!((p.x - q.x).abs() < 1e-9 && (p.y - q.y).abs() < 1e-9, "{p:?} vs {q:?}");
    }
}

#[test]
fn absolute_and_relative_forms_reach_same_points() {
    let abs = interpret("M10 10 L20 10 C20 20 30 20 30 10 Q40 0 50 10 H60 V30 Z L10 20");
    let rel = interpret("m10,10 l10,0 c0,10 10,10 10,0 q10,-10 20,0 h10 v20 z l0,10");
    assert_points_close(&points(&abs), &points(&rel));
}

#[test]
fn close_returns_current_point_to_subpath_start() {
    let path = interpret("M5 5 L15 5 L15 15 Z h10");
    let pts = points(&path);
    assert_eq!(pts.last().copied(), Some(Point::new(15.0, 5.0)));
}

#[test]
fn ignored_opcodes_and_bad_arity_are_skipped() {
    let path = interpret("M0 0 S1 1 2 2 A1 1 0 0 1 5 5 L3 L4 4 T9 9 Q1");
    assert_eq!(
        path.elements(),
        &[
            PathEl::MoveTo(Point::new(0.0, 0.0)),
            PathEl::LineTo(Point::new(4.0, 4.0))
        ]
    );
}

#[test]
fn unknown_letters_discard_their_segment() {
    let path = interpret("M1 1 X 7 7 L2 2");
    assert_eq!(points(&path), vec![Point::new(1.0, 1.0), Point::new(2.0, 2.0)]);
}

#[test]
fn exponents_and_commas_parse() {
    let path = interpret("M1e1,2.5E-1L-3,4");
    assert_eq!(
        points(&path),
        vec![Point::new(10.0, 0.25), Point::new(-3.0, 4.0)]
    );
}

#[test]
fn drawing_without_move_starts_at_origin() {
    let path = interpret("L5 5");
    assert_eq!(
        path.elements(),
        &[
            PathEl::MoveTo(Point::ORIGIN),
            PathEl::LineTo(Point::new(5.0, 5.0))
        ]
    );
}

#[test]
fn empty_string_yields_empty_path() {
    assert!(interpret("").elements().is_empty());
    assert!(interpret("   ,, ").elements().is_empty());
}

#[test]
fn deferred_path_buffers_until_geometry_is_requested() {
    let mut path = DeferredPath::new();
    path.set_values("M0 0 L1 1");
    assert!(!path.is_materialized());
    path.set_values("M2 2 L3 3");
    assert_eq!(points(path.geometry()), vec![Point::new(2.0, 2.0), Point::new(3.0, 3.0)]);
    assert!(path.is_materialized());

    path.set_values("M4 4");
    assert_eq!(points(path.geometry()).len(), 3);
}

#[test]
fn deferred_path_with_values_materializes_once() {
    let path = DeferredPath::with_values("M1 2 h3");
    assert_eq!(
        points(&path.into_geometry()),
        vec![Point::new(1.0, 2.0), Point::new(4.0, 2.0)]
    );
}
