//! Draw sink output for a small bound board

use flexbind::{render_listing, render_outline, OutlineConfig, Scene, SessionConfig};

const BOARD: &str = r#"
<board width="200px" height="60px" flex-direction="row" padding="5px">
    <card for="c in cards" width="50px" bind:id="c.name">{{ c.name }}</card>
</board>
"#;

const CARDS: &str = r#"
[data]
cards = [{ name = "a" }, { name = "b" }]
"#;

#[test]
fn test_listing_snapshot() {
    let scene = Scene::from_str(CARDS).expect("Should parse scene");
    let listing = render_listing(BOARD, scene.data).expect("Should render");
    insta::assert_snapshot!(listing.trim_end(), @r###"
    board [0,0 200x60] width="200px" height="60px" flex-direction="row" padding="5px"
      card [5,5 50x50] "a" for="c in cards" width="50px" bind:id="c.name" id="a"
      card [55,5 50x50] "b" for="c in cards" width="50px" bind:id="c.name" id="b"
    "###);
}

#[test]
fn test_outline_svg() {
    let scene = Scene::from_str(CARDS).expect("Should parse scene");
    let svg = render_outline(
        BOARD,
        scene.data,
        SessionConfig::default(),
        OutlineConfig::default().with_standalone(false),
    )
    .expect("Should render");

    assert!(svg.starts_with(r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="-10 -10 220 80""#));
    assert!(svg.contains(r#"<rect class="fb-node fb-board" x="0" y="0" width="200" height="60"/>"#));
    assert!(svg.contains(r#"<rect id="b" class="fb-node fb-card" x="55" y="5" width="50" height="50"/>"#));
    assert!(svg.contains(r#"<text class="fb-text" x="80" y="17" text-anchor="middle""#));
    assert!(svg.contains(r#"<text class="fb-id" x="55" y="53" fill="black" stroke="none">b</text>"#));
    assert!(svg.trim_end().ends_with("</svg>"));
}

#[test]
fn test_empty_data_draws_only_the_board() {
    let listing = render_listing(BOARD, Default::default()).expect("Should render");
    assert_eq!(listing.lines().count(), 1);
}
