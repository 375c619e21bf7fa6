//! Compiled, data-independent template tree

use std::ops::Index;

use indexmap::IndexMap;

use crate::expr::ast::{Expr, LoopPattern, Spanned};
use crate::style::Style;

/// Index of a node in its [`TemplateTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TemplateId(pub usize);

/// `for="<pattern> in <source>"`
#[derive(Debug, Clone, PartialEq)]
pub struct ForDirective {
    pub source_text: String,
    pub pattern: LoopPattern,
    pub source: Spanned<Expr>,
}

/// `if="<condition>"`
#[derive(Debug, Clone, PartialEq)]
pub struct IfDirective {
    pub source_text: String,
    pub condition: Spanned<Expr>,
}

/// `bind:<key>="<expr>"`
#[derive(Debug, Clone, PartialEq)]
pub struct BindDirective {
    /// Local name as written; key in the resolved attribute map
    pub key: String,
    /// Lowercased key, looked up in the style property table
    pub style_name: String,
    pub source_text: String,
    pub expr: Spanned<Expr>,
}

/// Text content with at most one `{{ expr }}` interpolation
#[derive(Debug, Clone, PartialEq)]
pub struct TextTemplate {
    pub prefix: String,
    pub expr: Option<Spanned<Expr>>,
    pub suffix: String,
}

impl TextTemplate {
    pub fn literal(text: impl Into<String>) -> Self {
        Self {
            prefix: text.into(),
            expr: None,
            suffix: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TemplateNode {
    pub tag: String,
    /// Style set by literal attributes
    pub style: Style,
    /// Every attribute as written, directives included
    pub attributes: IndexMap<String, String>,
    pub for_directive: Option<ForDirective>,
    pub if_directive: Option<IfDirective>,
    pub binds: Vec<BindDirective>,
    pub text: Option<TextTemplate>,
    pub children: Vec<TemplateId>,
}

impl TemplateNode {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            style: Style::default(),
            attributes: IndexMap::new(),
            for_directive: None,
            if_directive: None,
            binds: Vec::new(),
            text: None,
            children: Vec::new(),
        }
    }
}

/// Arena of template nodes; the root is always the first node
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateTree {
    nodes: Vec<TemplateNode>,
}

impl TemplateTree {
    pub(crate) fn from_nodes(nodes: Vec<TemplateNode>) -> Self {
        Self { nodes }
    }

    pub fn root(&self) -> TemplateId {
        TemplateId(0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl Index<TemplateId> for TemplateTree {
    type Output = TemplateNode;

    fn index(&self, id: TemplateId) -> &TemplateNode {
        &self.nodes[id.0]
    }
}
