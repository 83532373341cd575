use super::*;

fn raster() -> Arc<RasterImage> {
    Arc::new(RasterImage {
        width: 1,
        height: 1,
        rgba8_premul: Arc::new(vec![0, 0, 0, 0]),
    })
}

#[test]
fn lookups_fall_back_to_stripped_key() {
    let mut o = DynamicOverrides::default();
    assert!(o.is_empty());
    o.set_image("banner", raster());
    o.set_text("title.png", StyledText::new("hi", 12.0, Rgba::TRANSPARENT));
    o.set_hidden("ghost", true);

    assert!(o.image("banner").is_some());
    assert!(o.image("banner.png").is_some());
    assert!(o.image("other").is_none());
    assert_eq!(o.text("title.png").unwrap().text, "hi");
    assert!(o.text("title").is_none());
    assert!(o.is_hidden("ghost.png"));
    assert!(!o.is_hidden("banner"));
}

#[test]
fn hooks_install_remove_and_clear() {
    let mut o = DynamicOverrides::default();
    o.set_draw_hook("a", Some(Box::new(|_: &SpriteNode, _: usize| {})));
    assert!(o.hook_mut("a.png").is_some());
    o.set_draw_hook("a", None);
    assert!(o.hook_mut("a").is_none());

    o.set_draw_hook("b", Some(Box::new(|_: &SpriteNode, _: usize| {})));
    o.set_hidden("b", false);
    o.clear();
    assert!(o.is_empty());
    assert!(format!("{o:?}").starts_with("DynamicOverrides"));
}
