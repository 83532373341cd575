use std::cell::RefCell;
use std::rc::Rc;

use super::*;
use crate::decode::raster::RasterImage;
use crate::foundation::core::{Affine, Rect};
use crate::model::movie::{Sprite, SpriteFrame};

fn visible_frame() -> SpriteFrame {
    SpriteFrame::new(
        1.0,
        Rect::new(0.0, 0.0, 10.0, 10.0),
        Affine::IDENTITY,
        None,
        Vec::new(),
    )
}

fn sprite(image: Option<&str>, matte: Option<&str>, frames: usize) -> Sprite {
    Sprite::new(
        image.map(str::to_string),
        matte.map(str::to_string),
        (0..frames).map(|_| visible_frame()).collect(),
    )
}

fn raster(width: u32) -> Arc<RasterImage> {
    Arc::new(RasterImage {
        width,
        height: 1,
        rgba8_premul: Arc::new(vec![0; width as usize * 4]),
    })
}

fn movie(sprites: Vec<Sprite>) -> Arc<Movie> {
    Arc::new(
        Movie {
            sprites,
            ..Movie::default()
        }
        .normalized(),
    )
}

#[test]
fn mattes_group_their_members_under_one_host() {
    let m = movie(vec![
        sprite(Some("bg"), None, 1),
        sprite(Some("circle.matte"), None, 1),
        sprite(Some("a"), Some("circle.matte"), 1),
        sprite(Some("b"), Some("circle.matte"), 1),
        sprite(Some("top"), None, 1),
    ]);
    let tree = SceneTree::build(m, &DynamicOverrides::default());

    assert_eq!(
        tree.root(),
        &[TreeItem::Sprite(0), TreeItem::Matte(0), TreeItem::Sprite(4)]
    );
    assert_eq!(
        tree.groups(),
        &[MatteGroup {
            key: "circle.matte".to_string(),
            mask: Some(1),
            members: vec![2, 3],
        }]
    );
    assert_eq!(tree.nodes().len(), 5);
}

#[test]
fn returning_to_a_matte_moves_its_host_to_the_end() {
    let m = movie(vec![
        sprite(Some("m.matte"), None, 1),
        sprite(Some("a"), Some("m.matte"), 1),
        sprite(Some("mid"), None, 1),
        sprite(Some("b"), Some("m.matte"), 1),
    ]);
    let tree = SceneTree::build(m, &DynamicOverrides::default());

    assert_eq!(tree.root(), &[TreeItem::Sprite(2), TreeItem::Matte(0)]);
    assert_eq!(tree.groups()[0].members, vec![1, 3]);
}

#[test]
fn member_before_its_matte_still_gets_a_host() {
    let m = movie(vec![
        sprite(Some("a"), Some("late.matte"), 1),
        sprite(Some("late.matte"), None, 1),
    ]);
    let tree = SceneTree::build(m, &DynamicOverrides::default());

    assert_eq!(tree.root(), &[TreeItem::Matte(0)]);
    assert_eq!(tree.groups()[0].mask, Some(1));
    assert_eq!(tree.groups()[0].members, vec![0]);
}

#[test]
fn overrides_replace_movie_content() {
    let mut base = Movie {
        sprites: vec![
            sprite(Some("avatar.png"), None, 2),
            sprite(Some("plain"), None, 2),
        ],
        ..Movie::default()
    };
    base.images.insert("avatar".to_string(), raster(1));
    base.images.insert("plain".to_string(), raster(2));
    let m = Arc::new(base.normalized());

    let mut overrides = DynamicOverrides::default();
    overrides.set_image("avatar", raster(7));
    let mut tree = SceneTree::build(Arc::clone(&m), &overrides);
    assert_eq!(tree.node(0).unwrap().raster().unwrap().width, 7);
    assert_eq!(tree.node(1).unwrap().raster().unwrap().width, 2);

    overrides.set_hidden("plain", true);
    overrides.set_text(
        "avatar.png",
        crate::scene::dynamic::StyledText::new("hey", 10.0, Default::default()),
    );
    tree.apply_overrides(&overrides);
    tree.step_to_frame(0, &mut overrides);
    assert!(tree.node(1).unwrap().is_hidden());
    assert!(!tree.node(0).unwrap().is_hidden());
    assert_eq!(tree.node(0).unwrap().text().unwrap().text, "hey");

    overrides.clear();
    tree.apply_overrides(&overrides);
    assert_eq!(tree.node(0).unwrap().raster().unwrap().width, 1);
    assert!(tree.node(0).unwrap().text().is_none());
}

#[test]
fn draw_hooks_run_on_every_step_unless_hidden() {
    let m = movie(vec![sprite(Some("a.png"), None, 3), sprite(Some("b"), None, 3)]);
    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut overrides = DynamicOverrides::default();
    let log = Rc::clone(&seen);
    overrides.set_draw_hook(
        "a",
        Some(Box::new(move |node: &SpriteNode, frame: usize| {
            log.borrow_mut().push((node.sprite_index(), frame));
        })),
    );
    let log = Rc::clone(&seen);
    overrides.set_draw_hook(
        "b",
        Some(Box::new(move |node: &SpriteNode, frame: usize| {
            log.borrow_mut().push((node.sprite_index(), frame));
        })),
    );
    overrides.set_hidden("b", true);

    let mut tree = SceneTree::build(m, &overrides);
    tree.step_to_frame(0, &mut overrides);
    tree.step_to_frame(2, &mut overrides);
    tree.step_to_frame(2, &mut overrides);

    assert_eq!(*seen.borrow(), vec![(0, 0), (0, 2), (0, 2)]);
    assert_eq!(tree.current_frame(), Some(2));
}

#[test]
fn clear_hides_everything() {
    let m = movie(vec![sprite(Some("a"), None, 2)]);
    let mut overrides = DynamicOverrides::default();
    let mut tree = SceneTree::build(m, &overrides);
    tree.step_to_frame(1, &mut overrides);
    assert!(!tree.node(0).unwrap().is_hidden());

    tree.clear();
    assert!(tree.node(0).unwrap().is_hidden());
    assert_eq!(tree.current_frame(), None);
    assert_eq!(tree.movie().frames, 2);
}
