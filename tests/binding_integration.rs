//! End-to-end tests: markup and data in, concrete tree and draw calls out

use indexmap::IndexMap;
use pretty_assertions::assert_eq;

use flexbind::{
    compile, parse_markup, ConcreteTree, DrawCommand, Scene, Session, TemplateTree, Value,
};

fn tags(templates: &TemplateTree, tree: &ConcreteTree) -> Vec<String> {
    tree.iter()
        .map(|(_, node)| templates[node.template].tag.clone())
        .collect()
}

fn draw_all(session: &Session) -> Vec<DrawCommand> {
    let mut commands = Vec::new();
    session
        .draw(&mut |command: &mut DrawCommand| commands.push(command.clone()))
        .expect("Should draw");
    commands
}

#[test]
fn test_loop_with_guard_keeps_iteration_order() {
    let session = Session::load(
        r#"<root><r for="i in [1, 2, 2, 3]"><c if="i != 2" bind:n="i"/></r></root>"#,
        IndexMap::new(),
    )
    .expect("Should load");

    let tree = session.tree();
    assert_eq!(
        tags(session.templates(), tree),
        vec!["root", "r", "c", "r", "r", "r", "c"]
    );
    let bound: Vec<Value> = tree
        .iter()
        .filter(|(_, node)| node.attributes.contains_key("n"))
        .map(|(_, node)| node.attributes["n"].clone())
        .collect();
    assert_eq!(bound, vec![Value::from(1), Value::from(3)]);
}

#[test]
fn test_empty_and_null_loops_produce_no_nodes() {
    let mut data = IndexMap::new();
    data.insert("empty".to_string(), Value::List(Vec::new()));
    data.insert("nothing".to_string(), Value::Null);
    let session = Session::load(
        r#"<root><a for="x in empty"/><b for="x in nothing"/><c/></root>"#,
        data,
    )
    .expect("Should load");
    assert_eq!(tags(session.templates(), session.tree()), vec!["root", "c"]);
}

#[test]
fn test_failed_bind_is_an_explicit_null() {
    let mut session = Session::load(
        r#"<root><box bind:w="missing.prop" bind:h="2 * 3" label="static"/></root>"#,
        IndexMap::new(),
    )
    .expect("Should load");
    session.compute_layout().expect("Should lay out");

    let commands = draw_all(&session);
    let attributes = &commands[1].attributes;
    assert_eq!(attributes.get("w"), Some(&Value::Null));
    assert_eq!(attributes.get("h"), Some(&Value::from(6)));
    assert_eq!(attributes.get("label"), Some(&Value::from("static")));
}

#[test]
fn test_bound_attribute_overrides_static_one() {
    let mut data = IndexMap::new();
    data.insert("name".to_string(), Value::from("dynamic"));
    let mut session = Session::load(
        r#"<root><box title="static" bind:title="name"/></root>"#,
        data,
    )
    .expect("Should load");
    session.compute_layout().expect("Should lay out");
    let commands = draw_all(&session);
    assert_eq!(commands[1].attributes["title"], Value::from("dynamic"));
}

#[test]
fn test_compilation_is_deterministic() {
    let source = r#"<root padding="1px 2px"><a for="x in xs" if="x > 1" bind:width="x + 'px'">{{ x }}</a></root>"#;
    let first = compile(&parse_markup(source, 64).unwrap(), 64).unwrap();
    let second = compile(&parse_markup(source, 64).unwrap(), 64).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_bound_styles_drive_layout() {
    let scene = Scene::from_str(
        r#"
[layout]
width = 300

[data]
sizes = ["50px", "100px"]
gap = "10px"
"#,
    )
    .expect("Should parse scene");
    let config = scene.apply_to(Default::default());
    let mut session = Session::load_with_config(
        r#"<root width="100%" height="40px" flex-direction="row">
            <cell for="s in sizes" bind:width="s" bind:margin-left="gap"/>
        </root>"#,
        scene.data,
        config,
    )
    .expect("Should load");
    session.compute_layout().expect("Should lay out");

    let boxes: Vec<(f32, f32)> = draw_all(&session)
        .iter()
        .map(|c| (c.left, c.width))
        .collect();
    assert_eq!(boxes, vec![(0.0, 300.0), (10.0, 50.0), (70.0, 100.0)]);
}

#[test]
fn test_rerender_after_data_change() {
    let mut data = IndexMap::new();
    data.insert("show".to_string(), Value::Bool(true));
    let mut session = Session::load(r#"<root><a if="show"/><b/></root>"#, data)
        .expect("Should load");
    assert_eq!(session.tree().len(), 3);

    session.set_data("show", Value::Bool(false));
    session.rerender().expect("Should rerender");
    assert_eq!(tags(session.templates(), session.tree()), vec!["root", "b"]);
}

#[test]
fn test_non_boolean_guard_does_not_suppress() {
    let session = Session::load(
        r#"<root><a if="missing"/><b if="'text'"/><c if="false"/></root>"#,
        IndexMap::new(),
    )
    .expect("Should load");
    assert_eq!(tags(session.templates(), session.tree()), vec!["root", "a", "b"]);
}
