//! Expansion of a template tree against data into a concrete node tree

use std::ops::Index;

use indexmap::IndexMap;

use crate::context::ContextStack;
use crate::draw::UserContext;
use crate::error::MarkupStructureError;
use crate::expr::{evaluate, evaluate_iterable, try_evaluate, try_evaluate_bool, LoopPattern, Value};
use crate::style::{apply_style_property, Style};
use crate::template::{TemplateId, TemplateTree, TextTemplate};

/// Index of a node in its [`ConcreteTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConcreteId(pub usize);

/// One data-bound instance of a template node
#[derive(Debug, Clone, PartialEq)]
pub struct ConcreteNode {
    /// Originating template node
    pub template: TemplateId,
    pub parent: Option<ConcreteId>,
    pub children: Vec<ConcreteId>,
    pub style: Style,
    /// Bound attributes; `Value::Null` marks a binding that failed to resolve
    pub attributes: IndexMap<String, Value>,
    pub text: Option<String>,
    /// Iteration value when produced inside a `for`
    pub loop_value: Option<Value>,
    pub user_context: Option<UserContext>,
}

/// Single-rooted arena of concrete nodes, parents before children
#[derive(Debug, Clone, PartialEq)]
pub struct ConcreteTree {
    nodes: Vec<ConcreteNode>,
    root: ConcreteId,
}

impl ConcreteTree {
    pub fn root(&self) -> ConcreteId {
        self.root
    }

    pub fn get(&self, id: ConcreteId) -> Option<&ConcreteNode> {
        self.nodes.get(id.0)
    }

    pub(crate) fn get_mut(&mut self, id: ConcreteId) -> Option<&mut ConcreteNode> {
        self.nodes.get_mut(id.0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ConcreteId, &ConcreteNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (ConcreteId(i), n))
    }

    /// Nodes produced from one template node, in tree order
    pub fn instances_of(&self, template: TemplateId) -> impl Iterator<Item = ConcreteId> + '_ {
        self.iter()
            .filter(move |(_, node)| node.template == template)
            .map(|(id, _)| id)
    }
}

impl Index<ConcreteId> for ConcreteTree {
    type Output = ConcreteNode;

    fn index(&self, id: ConcreteId) -> &ConcreteNode {
        &self.nodes[id.0]
    }
}

/// Materialize the whole template tree against fresh initial data
pub fn materialize(
    templates: &TemplateTree,
    data: &IndexMap<String, Value>,
    max_depth: usize,
) -> Result<ConcreteTree, MarkupStructureError> {
    let mut stack = ContextStack::with_values(data);
    let mut materializer = Materializer::new(templates, max_depth);

    // The root never carries `for` or `if`, so it yields exactly one node
    let root = stack.scoped(|stack| materializer.build_node(templates.root(), stack, None, None))?;

    log::debug!("materialized {} concrete nodes", materializer.nodes.len());
    Ok(ConcreteTree {
        nodes: materializer.nodes,
        root,
    })
}

/// Walks template nodes and appends their concrete instances to an arena
pub struct Materializer<'t> {
    templates: &'t TemplateTree,
    nodes: Vec<ConcreteNode>,
    depth: usize,
    max_depth: usize,
}

impl<'t> Materializer<'t> {
    pub fn new(templates: &'t TemplateTree, max_depth: usize) -> Self {
        Self {
            templates,
            nodes: Vec::new(),
            depth: 0,
            max_depth,
        }
    }

    /// Nodes produced so far, in creation order
    pub fn nodes(&self) -> &[ConcreteNode] {
        &self.nodes
    }

    /// Expand one template node into zero or more concrete nodes.
    ///
    /// Each iteration runs in its own scope frame, including the single pass
    /// of a node without `for`, and the frame is left before the next
    /// iteration starts whether or not the node survives its `if`.
    pub fn materialize_node(
        &mut self,
        id: TemplateId,
        stack: &mut ContextStack,
        parent: Option<ConcreteId>,
    ) -> Result<Vec<ConcreteId>, MarkupStructureError> {
        let templates = self.templates;
        let template = &templates[id];

        let iterations: Vec<Option<Value>> = match &template.for_directive {
            Some(directive) => evaluate_iterable(&directive.source, stack)
                .into_iter()
                .map(Some)
                .collect(),
            None => vec![None],
        };

        let mut produced = Vec::with_capacity(iterations.len());
        for item in iterations {
            let made = stack.scoped(|stack| {
                if let (Some(directive), Some(value)) = (&template.for_directive, &item) {
                    bind_loop_value(stack, &directive.pattern, value);
                }
                if let Some(directive) = &template.if_directive {
                    if try_evaluate_bool(&directive.condition, stack) == Some(false) {
                        log::trace!("<{}> suppressed by if=\"{}\"", template.tag, directive.source_text);
                        return Ok(None);
                    }
                }
                self.build_node(id, stack, parent, item).map(Some)
            })?;
            produced.extend(made);
        }
        Ok(produced)
    }

    fn build_node(
        &mut self,
        id: TemplateId,
        stack: &mut ContextStack,
        parent: Option<ConcreteId>,
        loop_value: Option<Value>,
    ) -> Result<ConcreteId, MarkupStructureError> {
        if self.depth >= self.max_depth {
            return Err(MarkupStructureError::TooDeep {
                max_depth: self.max_depth,
            });
        }

        let templates = self.templates;
        let template = &templates[id];
        let mut style = template.style.clone();
        let mut attributes = IndexMap::with_capacity(template.binds.len());

        for bind in &template.binds {
            match evaluate(&bind.expr, stack) {
                Ok(value) => {
                    apply_style_property(&mut style, &bind.style_name, &value.style_text());
                    log::trace!("<{}> bind:{} = {}", template.tag, bind.key, value);
                    attributes.insert(bind.key.clone(), value);
                }
                Err(err) => {
                    log::trace!("<{}> bind:{} unresolved: {}", template.tag, bind.key, err);
                    attributes.insert(bind.key.clone(), Value::Null);
                }
            }
        }

        let text = template
            .text
            .as_ref()
            .and_then(|text| render_text(text, stack));

        let node_id = ConcreteId(self.nodes.len());
        self.nodes.push(ConcreteNode {
            template: id,
            parent,
            children: Vec::new(),
            style,
            attributes,
            text,
            loop_value,
            user_context: None,
        });

        self.depth += 1;
        for child in &template.children {
            let ids = match self.materialize_node(*child, stack, Some(node_id)) {
                Ok(ids) => ids,
                Err(err) => {
                    self.depth -= 1;
                    return Err(err);
                }
            };
            self.nodes[node_id.0].children.extend(ids);
        }
        self.depth -= 1;

        Ok(node_id)
    }
}

fn bind_loop_value(stack: &mut ContextStack, pattern: &LoopPattern, value: &Value) {
    match pattern {
        LoopPattern::Name(name) => stack.set(name.clone(), value.clone()),
        LoopPattern::Destructure(names) => {
            let items: &[Value] = match value {
                Value::List(items) => items,
                _ => &[],
            };
            for (i, name) in names.iter().enumerate() {
                stack.set(name.clone(), items.get(i).cloned().unwrap_or_default());
            }
        }
    }
}

fn render_text(text: &TextTemplate, stack: &ContextStack) -> Option<String> {
    match &text.expr {
        None => Some(text.prefix.clone()),
        Some(expr) => try_evaluate(expr, stack)
            .map(|value| format!("{}{}{}", text.prefix, value.style_text(), text.suffix)),
    }
}
