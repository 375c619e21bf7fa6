//! Load, lay out and draw a bound document

use indexmap::IndexMap;

use crate::config::SessionConfig;
use crate::draw::{self, DrawSink, UserContext};
use crate::expr::Value;
use crate::layout::{compute_layout, LayoutEngine, LayoutMap, TaffyEngine};
use crate::markup::parse_markup;
use crate::materialize::{materialize, ConcreteId, ConcreteTree};
use crate::template::{compile, Diagnostic, TemplateTree};
use crate::Error;

/// Misuse of a [`Session`]
#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum SessionError {
    #[error("layout has not been computed since the last (re)render")]
    LayoutNotComputed,

    #[error("no concrete node {0}")]
    UnknownNode(usize),
}

/// A compiled document bound to a mutable set of initial data.
///
/// The template tree is compiled once; every [`rerender`](Session::rerender)
/// rebuilds the concrete tree from scratch.
pub struct Session<E: LayoutEngine = TaffyEngine> {
    config: SessionConfig,
    templates: TemplateTree,
    diagnostics: Vec<Diagnostic>,
    data: IndexMap<String, Value>,
    tree: ConcreteTree,
    layout: Option<LayoutMap>,
    engine: E,
}

impl Session<TaffyEngine> {
    pub fn load(markup: &str, data: IndexMap<String, Value>) -> Result<Self, Error> {
        Self::load_with_config(markup, data, SessionConfig::default())
    }

    pub fn load_with_config(
        markup: &str,
        data: IndexMap<String, Value>,
        config: SessionConfig,
    ) -> Result<Self, Error> {
        Self::load_with_engine(markup, data, config, TaffyEngine::new())
    }
}

impl<E: LayoutEngine> Session<E> {
    /// Parse and compile `markup`, then materialize it once against `data`
    pub fn load_with_engine(
        markup: &str,
        data: IndexMap<String, Value>,
        config: SessionConfig,
        engine: E,
    ) -> Result<Self, Error> {
        let root = parse_markup(markup, config.max_depth)?;
        let compiled = compile(&root, config.max_depth)?;
        let tree = materialize(&compiled.tree, &data, config.max_depth)?;
        log::debug!(
            "loaded <{}>: {} template nodes, {} concrete nodes, {} diagnostics",
            root.name,
            compiled.tree.len(),
            tree.len(),
            compiled.diagnostics.len()
        );

        Ok(Self {
            config,
            templates: compiled.tree,
            diagnostics: compiled.diagnostics,
            data,
            tree,
            layout: None,
            engine,
        })
    }

    pub fn templates(&self) -> &TemplateTree {
        &self.templates
    }

    pub fn tree(&self) -> &ConcreteTree {
        &self.tree
    }

    /// Directives left inert at compile time
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn data(&self) -> &IndexMap<String, Value> {
        &self.data
    }

    /// Geometry from the last [`compute_layout`](Session::compute_layout)
    pub fn layout(&self) -> Option<&LayoutMap> {
        self.layout.as_ref()
    }

    /// Replace one initial context value. Takes effect on the next rerender.
    pub fn set_data(&mut self, key: impl Into<String>, value: Value) {
        self.data.insert(key.into(), value);
    }

    /// Rebuild the concrete tree from the current data.
    ///
    /// On failure the previous tree stays in place.
    pub fn rerender(&mut self) -> Result<(), Error> {
        let tree = materialize(&self.templates, &self.data, self.config.max_depth)?;
        log::debug!("rerendered {} concrete nodes", tree.len());
        self.tree = tree;
        self.layout = None;
        Ok(())
    }

    pub fn compute_layout(&mut self) -> Result<&LayoutMap, Error> {
        let layout = compute_layout(
            &mut self.engine,
            &self.tree,
            self.config.max_width,
            self.config.max_height,
            self.config.direction,
        )?;
        Ok(self.layout.insert(layout))
    }

    /// Associate a host handle with a concrete node
    pub fn attach_context(&mut self, node: ConcreteId, context: UserContext) -> Result<(), Error> {
        let target = self
            .tree
            .get_mut(node)
            .ok_or(SessionError::UnknownNode(node.0))?;
        target.user_context = Some(context);
        Ok(())
    }

    /// Hand every node to `sink` in breadth-first order
    pub fn draw<S: DrawSink + ?Sized>(&self, sink: &mut S) -> Result<usize, Error> {
        let layout = self.layout.as_ref().ok_or(SessionError::LayoutNotComputed)?;
        Ok(draw::draw(&self.templates, &self.tree, layout, sink)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::{DrawCommand, DrawError};
    use crate::error::{ExprErrorCode, MarkupStructureError};
    use pretty_assertions::assert_eq;

    const ROW: &str = r#"<root width="300px" height="100px" flex-direction="row">
        <item for="i in list" width="100px" bind:id="'item' + i">{{ i }}</item>
    </root>"#;

    fn list(items: &[i32]) -> IndexMap<String, Value> {
        let mut data = IndexMap::new();
        data.insert("list".to_string(), Value::from(items.to_vec()));
        data
    }

    fn collect(session: &Session) -> Vec<DrawCommand> {
        let mut commands = Vec::new();
        session
            .draw(&mut |command: &mut DrawCommand| commands.push(command.clone()))
            .unwrap();
        commands
    }

    #[test]
    fn test_load_layout_draw() {
        let mut session = Session::load(ROW, list(&[1, 2])).unwrap();
        session.compute_layout().unwrap();
        let commands = collect(&session);

        assert_eq!(commands.len(), 3);
        assert_eq!(commands[0].tag, "root");
        assert_eq!(commands[0].parent, None);
        let items: Vec<_> = commands[1..]
            .iter()
            .map(|c| (c.left, c.width, c.text.clone(), c.attributes["id"].clone()))
            .collect();
        assert_eq!(
            items,
            vec![
                (0.0, 100.0, Some("1".to_string()), Value::from("item1")),
                (100.0, 100.0, Some("2".to_string()), Value::from("item2")),
            ]
        );
    }

    #[test]
    fn test_draw_requires_layout() {
        let session = Session::load(ROW, list(&[1])).unwrap();
        let result = session.draw(&mut |_: &mut DrawCommand| {});
        assert!(matches!(
            result,
            Err(Error::Session(SessionError::LayoutNotComputed))
        ));
    }

    #[test]
    fn test_rerender_rebuilds_and_invalidates_layout() {
        let mut session = Session::load(ROW, list(&[1])).unwrap();
        session.compute_layout().unwrap();
        assert_eq!(session.tree().len(), 2);

        session.set_data("list", Value::from(vec![1, 2, 3]));
        assert_eq!(session.data()["list"], Value::from(vec![1, 2, 3]));
        assert_eq!(session.tree().len(), 2);
        session.rerender().unwrap();
        assert_eq!(session.tree().len(), 4);
        assert!(session.layout().is_none());

        session.compute_layout().unwrap();
        assert_eq!(collect(&session).len(), 4);
    }

    #[test]
    fn test_sink_replacing_user_context_fails() {
        let mut session = Session::load(ROW, list(&[1, 2])).unwrap();
        let second = session.tree()[session.tree().root()].children[1];
        session.attach_context(second, UserContext(7)).unwrap();
        session.compute_layout().unwrap();

        let mut seen = Vec::new();
        let result = session.draw(&mut |command: &mut DrawCommand| {
            seen.push(command.user_context);
            if command.user_context.is_some() {
                command.user_context = Some(UserContext(8));
            }
        });
        assert_eq!(seen, vec![None, None, Some(UserContext(7))]);
        assert!(matches!(
            result,
            Err(Error::Draw(DrawError::UserContextReplaced { node, .. })) if node == second.0
        ));
    }

    #[test]
    fn test_unchanged_user_context_is_accepted() {
        let mut session = Session::load(ROW, list(&[1])).unwrap();
        let root = session.tree().root();
        session.attach_context(root, UserContext(1)).unwrap();
        session.compute_layout().unwrap();
        assert_eq!(collect(&session)[0].user_context, Some(UserContext(1)));
    }

    #[test]
    fn test_attach_to_unknown_node() {
        let mut session = Session::load(ROW, list(&[])).unwrap();
        let result = session.attach_context(ConcreteId(9), UserContext(1));
        assert!(matches!(
            result,
            Err(Error::Session(SessionError::UnknownNode(9)))
        ));
    }

    #[test]
    fn test_root_directive_aborts_load() {
        let result = Session::load(r#"<root for="x in list"/>"#, list(&[1]));
        assert!(matches!(
            result,
            Err(Error::Structure(MarkupStructureError::DirectiveOnRoot { directive: "for", .. }))
        ));
    }

    #[test]
    fn test_diagnostics_are_kept() {
        let session = Session::load(r#"<root><a if="1 +"/><b bind:w="("/></root>"#, IndexMap::new())
            .unwrap();
        let attributes: Vec<_> = session
            .diagnostics()
            .iter()
            .map(|d| (d.tag.as_str(), d.attribute.as_str()))
            .collect();
        assert_eq!(attributes, vec![("a", "if"), ("b", "bind:w")]);
        assert_eq!(session.tree().len(), 3);
    }

    #[test]
    fn test_oversized_expression_is_an_inert_directive() {
        let chain = vec!["1"; 3000].join("+");
        let markup = format!(r#"<root><a bind:w="{}" bind:h="1+1"/></root>"#, chain);
        let session = Session::load(&markup, IndexMap::new()).unwrap();

        let codes: Vec<_> = session.diagnostics().iter().map(|d| d.error.code).collect();
        assert_eq!(codes, vec![ExprErrorCode::NestingTooDeep]);
        let a = &session.tree()[session.tree()[session.tree().root()].children[0]];
        assert!(!a.attributes.contains_key("w"));
        assert_eq!(a.attributes.get("h"), Some(&Value::from(2)));
    }

    #[test]
    fn test_config_bounds_layout() {
        let config = SessionConfig::new().with_max_width(250.0);
        let mut session = Session::load_with_config(
            r#"<root width="100%" flex-direction="row"><a flex-grow="1"/></root>"#,
            IndexMap::new(),
            config,
        )
        .unwrap();
        assert_eq!(session.compute_layout().unwrap().len(), 2);
        let widths: Vec<f32> = session
            .tree()
            .iter()
            .map(|(id, _)| session.layout().unwrap().get(id).unwrap().width)
            .collect();
        assert_eq!(widths, vec![250.0, 250.0]);
    }
}
