//! Element tree to template tree compilation

use std::fmt;

use crate::error::{ExpressionParseError, MarkupStructureError};
use crate::expr::{parse_expression, parse_loop};
use crate::markup::{Element, MarkupNode};
use crate::style::apply_style_property;

use super::node::{
    BindDirective, ForDirective, IfDirective, TemplateId, TemplateNode, TemplateTree,
};
use super::text::compile_text;

pub const FOR_DIRECTIVE: &str = "for";
pub const IF_DIRECTIVE: &str = "if";
pub const BIND_PREFIX: &str = "bind";

/// A directive that failed to parse and was left inert
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub tag: String,
    /// Attribute name, or `#text` for interpolated text
    pub attribute: String,
    pub error: ExpressionParseError,
}

impl Diagnostic {
    /// Annotated report of the offending source
    pub fn format(&self) -> String {
        self.format_report(false)
    }

    /// Annotated report, with ANSI colors when `color` is set
    pub fn format_report(&self, color: bool) -> String {
        self.error
            .format_report(&format!("<{}> {}", self.tag, self.attribute), color)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<{}> {}: {} ({})",
            self.tag, self.attribute, self.error, self.error.message
        )
    }
}

/// Output of [`compile`]
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledTemplate {
    pub tree: TemplateTree,
    pub diagnostics: Vec<Diagnostic>,
}

/// Compile an element tree into a template tree.
///
/// Malformed directives are reported as diagnostics and dropped from their
/// node; only structural problems abort.
pub fn compile(root: &Element, max_depth: usize) -> Result<CompiledTemplate, MarkupStructureError> {
    for directive in [FOR_DIRECTIVE, IF_DIRECTIVE] {
        if root.attribute(directive).is_some() {
            return Err(MarkupStructureError::DirectiveOnRoot {
                tag: root.name.clone(),
                directive,
            });
        }
    }

    let mut nodes: Vec<TemplateNode> = Vec::new();
    let mut diagnostics = Vec::new();
    let mut work: Vec<(&Element, Option<TemplateId>, usize)> = vec![(root, None, 1)];

    while let Some((element, parent, depth)) = work.pop() {
        if depth > max_depth {
            return Err(MarkupStructureError::TooDeep { max_depth });
        }

        let id = TemplateId(nodes.len());
        nodes.push(compile_element(element, &mut diagnostics));
        if let Some(parent) = parent {
            nodes[parent.0].children.push(id);
        }

        // Reversed so the first child is popped, and numbered, first
        let children: Vec<&Element> = element.child_elements().collect();
        for child in children.into_iter().rev() {
            work.push((child, Some(id), depth + 1));
        }
    }

    for diagnostic in &diagnostics {
        log::warn!("inert directive: {}", diagnostic);
    }
    log::debug!(
        "compiled {} template nodes ({} diagnostics)",
        nodes.len(),
        diagnostics.len()
    );

    Ok(CompiledTemplate {
        tree: TemplateTree::from_nodes(nodes),
        diagnostics,
    })
}

fn compile_element(element: &Element, diagnostics: &mut Vec<Diagnostic>) -> TemplateNode {
    let mut node = TemplateNode::new(element.name.clone());
    let mut report = |attribute: &str, error: ExpressionParseError| {
        diagnostics.push(Diagnostic {
            tag: element.name.clone(),
            attribute: attribute.to_string(),
            error,
        })
    };

    for attr in &element.attributes {
        if attr.name == FOR_DIRECTIVE {
            match parse_loop(&attr.value) {
                Ok(parsed) => {
                    node.for_directive = Some(ForDirective {
                        source_text: attr.value.clone(),
                        pattern: parsed.pattern,
                        source: parsed.source,
                    })
                }
                Err(err) => report(&attr.name, err),
            }
        } else if attr.name == IF_DIRECTIVE {
            match parse_expression(&attr.value) {
                Ok(condition) => {
                    node.if_directive = Some(IfDirective {
                        source_text: attr.value.clone(),
                        condition,
                    })
                }
                Err(err) => report(&attr.name, err),
            }
        } else if attr.prefix() == Some(BIND_PREFIX) {
            let key = attr.local_name();
            if key.is_empty() {
                log::warn!("<{}> bind directive without a target ignored", element.name);
            } else {
                match parse_expression(&attr.value) {
                    Ok(expr) => node.binds.push(BindDirective {
                        key: key.to_string(),
                        style_name: key.to_lowercase(),
                        source_text: attr.value.clone(),
                        expr,
                    }),
                    Err(err) => report(&attr.name, err),
                }
            }
        } else {
            apply_style_property(&mut node.style, &attr.name, &attr.value);
        }

        node.attributes.insert(attr.name.clone(), attr.value.clone());
    }

    // The last text run of an element wins
    let text = element
        .children
        .iter()
        .filter_map(|child| match child {
            MarkupNode::Text(text) => Some(text.as_str()),
            MarkupNode::Element(_) => None,
        })
        .last();
    if let Some(text) = text {
        match compile_text(text) {
            Ok(template) => node.text = Some(template),
            Err(err) => report("#text", err),
        }
    }

    node
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExprErrorCode;
    use crate::expr::LoopPattern;
    use crate::markup::parse_markup;
    use crate::style::{Dimension, FlexDirection};
    use pretty_assertions::assert_eq;

    fn compile_str(source: &str) -> CompiledTemplate {
        let root = parse_markup(source, 64).expect("markup should parse");
        compile(&root, 64).expect("should compile")
    }

    #[test]
    fn test_directives_are_classified() {
        let compiled = compile_str(
            r#"<root flex-direction="row">
                <item for="i in list" if="i != '2'" bind:Width="w" id="x" width="10px">{{ i }}</item>
            </root>"#,
        );
        assert!(compiled.diagnostics.is_empty());
        let tree = &compiled.tree;
        let root = &tree[tree.root()];
        assert_eq!(root.style.flex_direction, FlexDirection::Row);
        assert_eq!(root.children, vec![TemplateId(1)]);

        let item = &tree[TemplateId(1)];
        let for_directive = item.for_directive.as_ref().unwrap();
        assert_eq!(for_directive.pattern, LoopPattern::Name("i".to_string()));
        assert!(item.if_directive.is_some());
        assert_eq!(item.binds.len(), 1);
        assert_eq!(item.binds[0].key, "Width");
        assert_eq!(item.binds[0].style_name, "width");
        assert_eq!(item.style.width, Dimension::points(10.0));
        assert!(item.text.as_ref().unwrap().expr.is_some());

        let keys: Vec<_> = item.attributes.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["for", "if", "bind:Width", "id", "width"]);
    }

    #[test]
    fn test_children_in_document_order() {
        let compiled = compile_str("<r><a><a1/><a2/></a><b/><c><c1/></c></r>");
        let tree = &compiled.tree;
        let tags = |id: TemplateId| -> Vec<String> {
            tree[id]
                .children
                .iter()
                .map(|c| tree[*c].tag.clone())
                .collect()
        };
        assert_eq!(tags(tree.root()), vec!["a", "b", "c"]);
        let a = tree[tree.root()].children[0];
        assert_eq!(tags(a), vec!["a1", "a2"]);
        assert_eq!(tree.len(), 7);
    }

    #[test]
    fn test_root_directives_are_fatal() {
        let root = parse_markup(r#"<r for="i in list"/>"#, 8).unwrap();
        assert_eq!(
            compile(&root, 8),
            Err(MarkupStructureError::DirectiveOnRoot {
                tag: "r".to_string(),
                directive: "for",
            })
        );
        let root = parse_markup(r#"<r if="true"/>"#, 8).unwrap();
        assert!(matches!(
            compile(&root, 8),
            Err(MarkupStructureError::DirectiveOnRoot { directive: "if", .. })
        ));
    }

    #[test]
    fn test_malformed_directives_are_inert() {
        let compiled = compile_str(
            r#"<r><c for="i list" if="(a" bind:w="1 +" id="keep">{{ a }} {{ b }}</c></r>"#,
        );
        let c = &compiled.tree[TemplateId(1)];
        assert!(c.for_directive.is_none());
        assert!(c.if_directive.is_none());
        assert!(c.binds.is_empty());
        assert!(c.text.is_none());
        assert_eq!(c.attributes.get("id").map(String::as_str), Some("keep"));

        let codes: Vec<_> = compiled
            .diagnostics
            .iter()
            .map(|d| (d.attribute.as_str(), d.error.code))
            .collect();
        assert_eq!(
            codes,
            vec![
                ("for", ExprErrorCode::UnexpectedToken),
                ("if", ExprErrorCode::UnexpectedEnd),
                ("bind:w", ExprErrorCode::UnexpectedEnd),
                ("#text", ExprErrorCode::MultipleInterpolations),
            ]
        );
    }

    #[test]
    fn test_depth_bound() {
        let root = parse_markup("<a><b><c/></b></a>", 8).unwrap();
        assert!(compile(&root, 3).is_ok());
        assert_eq!(
            compile(&root, 2),
            Err(MarkupStructureError::TooDeep { max_depth: 2 })
        );
    }

    #[test]
    fn test_compile_is_deterministic() {
        let source = r#"<r><c for="[k, v] in data" bind:height="v">{{ k }}</c></r>"#;
        let first = compile_str(source);
        assert!(!first.tree.is_empty());
        assert_eq!(first, compile_str(source));
    }
}
