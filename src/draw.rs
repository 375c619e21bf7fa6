//! Breadth-first hand-off of laid-out nodes to a drawing sink

use std::collections::VecDeque;

use indexmap::IndexMap;
use thiserror::Error;

use crate::expr::Value;
use crate::layout::LayoutMap;
use crate::materialize::{ConcreteId, ConcreteTree};
use crate::template::TemplateTree;

/// Opaque host handle attached to a concrete node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserContext(pub u64);

#[derive(Debug, Error, Clone, PartialEq)]
pub enum DrawError {
    /// The sink replaced the user context of the node it was drawing
    #[error("draw sink replaced the user context of node {node} ({before:?} -> {after:?})")]
    UserContextReplaced {
        node: usize,
        before: Option<UserContext>,
        after: Option<UserContext>,
    },

    #[error("node {node} has no computed layout")]
    MissingGeometry { node: usize },
}

/// Everything a sink receives for one node
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCommand {
    pub node: ConcreteId,
    /// Drawn earlier in the same pass
    pub parent: Option<ConcreteId>,
    pub tag: String,
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
    pub text: Option<String>,
    /// Static attributes overlaid with bound ones
    pub attributes: IndexMap<String, Value>,
    pub user_context: Option<UserContext>,
}

/// Receiver of draw commands
pub trait DrawSink {
    fn draw(&mut self, command: &mut DrawCommand);
}

impl<F> DrawSink for F
where
    F: FnMut(&mut DrawCommand),
{
    fn draw(&mut self, command: &mut DrawCommand) {
        self(command)
    }
}

/// Walk `tree` level by level and hand every node to `sink`.
///
/// Returns the number of nodes drawn.
pub fn draw<S: DrawSink + ?Sized>(
    templates: &TemplateTree,
    tree: &ConcreteTree,
    layout: &LayoutMap,
    sink: &mut S,
) -> Result<usize, DrawError> {
    let mut queue = VecDeque::from([tree.root()]);
    let mut drawn = 0;

    while let Some(id) = queue.pop_front() {
        let node = &tree[id];
        let template = &templates[node.template];
        let geometry = layout
            .get(id)
            .ok_or(DrawError::MissingGeometry { node: id.0 })?;

        let mut attributes: IndexMap<String, Value> = template
            .attributes
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect();
        for (key, value) in &node.attributes {
            attributes.insert(key.clone(), value.clone());
        }

        let before = node.user_context;
        let mut command = DrawCommand {
            node: id,
            parent: node.parent,
            tag: template.tag.clone(),
            left: geometry.left,
            top: geometry.top,
            width: geometry.width,
            height: geometry.height,
            text: node.text.clone(),
            attributes,
            user_context: before,
        };
        sink.draw(&mut command);
        if command.user_context != before {
            return Err(DrawError::UserContextReplaced {
                node: id.0,
                before,
                after: command.user_context,
            });
        }

        drawn += 1;
        queue.extend(node.children.iter().copied());
    }

    log::debug!("drew {} nodes", drawn);
    Ok(drawn)
}
