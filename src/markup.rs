//! Attributed element tree read from XML markup with quick-xml

use quick_xml::escape::resolve_xml_entity;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use thiserror::Error;

use crate::error::MarkupStructureError;

/// Errors raised while reading markup text
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MarkupError {
    #[error("XML error at byte {position}: {message}")]
    Xml { position: u64, message: String },

    #[error("markup has no root element")]
    NoRoot,

    #[error("markup has more than one root element (second root is <{second}>)")]
    MultipleRoots { second: String },

    #[error("text outside the root element")]
    TextOutsideRoot,

    #[error("element <{tag}> is never closed")]
    Unclosed { tag: String },

    #[error(transparent)]
    Structure(#[from] MarkupStructureError),
}

/// One attribute as written, e.g. `bind:width="w"`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Part before the first `:`, if any
    pub fn prefix(&self) -> Option<&str> {
        self.name.split_once(':').map(|(prefix, _)| prefix)
    }

    /// Part after the first `:`, or the whole name
    pub fn local_name(&self) -> &str {
        self.name
            .split_once(':')
            .map_or(self.name.as_str(), |(_, local)| local)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MarkupNode {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    pub name: String,
    /// Document order
    pub attributes: Vec<Attribute>,
    pub children: Vec<MarkupNode>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|child| match child {
            MarkupNode::Element(e) => Some(e),
            MarkupNode::Text(_) => None,
        })
    }
}

/// Element under construction plus the text gathered since its last child
struct OpenElement {
    element: Element,
    text: String,
}

impl OpenElement {
    fn flush_text(&mut self) {
        let trimmed = self.text.trim();
        if !trimmed.is_empty() {
            self.element
                .children
                .push(MarkupNode::Text(trimmed.to_string()));
        }
        self.text.clear();
    }
}

/// Parse a markup document into its single root element.
///
/// Adjacent text fragments and entity references are merged, trimmed, and
/// dropped when only whitespace remains. Comments, declarations and
/// processing instructions are skipped.
pub fn parse_markup(source: &str, max_depth: usize) -> Result<Element, MarkupError> {
    let mut reader = Reader::from_str(source);
    let mut stack: Vec<OpenElement> = Vec::new();
    let mut root: Option<Element> = None;

    let xml_error = |reader: &Reader<&[u8]>, message: String| MarkupError::Xml {
        position: reader.error_position(),
        message,
    };

    loop {
        let event = reader
            .read_event()
            .map_err(|e| xml_error(&reader, e.to_string()))?;

        match event {
            Event::Start(ref start) | Event::Empty(ref start) => {
                let element = read_element(start).map_err(|m| xml_error(&reader, m))?;
                if stack.is_empty() {
                    if let Some(existing) = &root {
                        log::debug!("second root after <{}>", existing.name);
                        return Err(MarkupError::MultipleRoots {
                            second: element.name,
                        });
                    }
                }
                if stack.len() >= max_depth {
                    return Err(MarkupStructureError::TooDeep { max_depth }.into());
                }
                if let Some(parent) = stack.last_mut() {
                    parent.flush_text();
                }

                let open = OpenElement {
                    element,
                    text: String::new(),
                };
                if matches!(event, Event::Empty(_)) {
                    close(open, &mut stack, &mut root);
                } else {
                    stack.push(open);
                }
            }
            Event::End(_) => {
                if let Some(mut open) = stack.pop() {
                    open.flush_text();
                    close(open, &mut stack, &mut root);
                }
            }
            Event::Text(text) => {
                let decoded = text
                    .decode()
                    .map_err(|e| xml_error(&reader, e.to_string()))?;
                push_text(&mut stack, &decoded)?;
            }
            Event::CData(data) => {
                let decoded = data
                    .decode()
                    .map_err(|e| xml_error(&reader, e.to_string()))?;
                push_text(&mut stack, &decoded)?;
            }
            Event::GeneralRef(entity) => {
                let raw = entity
                    .decode()
                    .map_err(|e| xml_error(&reader, e.to_string()))?;
                let resolved = resolve_entity(&raw).map_err(|m| xml_error(&reader, m))?;
                push_text(&mut stack, &resolved)?;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.pop() {
        return Err(MarkupError::Unclosed {
            tag: open.element.name,
        });
    }
    root.ok_or(MarkupError::NoRoot)
}

fn close(open: OpenElement, stack: &mut [OpenElement], root: &mut Option<Element>) {
    match stack.last_mut() {
        Some(parent) => parent
            .element
            .children
            .push(MarkupNode::Element(open.element)),
        None => *root = Some(open.element),
    }
}

fn push_text(stack: &mut [OpenElement], text: &str) -> Result<(), MarkupError> {
    match stack.last_mut() {
        Some(open) => {
            open.text.push_str(text);
            Ok(())
        }
        None if text.trim().is_empty() => Ok(()),
        None => Err(MarkupError::TextOutsideRoot),
    }
}

fn read_element(start: &BytesStart<'_>) -> Result<Element, String> {
    let name = std::str::from_utf8(start.name().as_ref())
        .map_err(|e| e.to_string())?
        .to_string();

    let mut element = Element::new(name);
    for attr in start.attributes() {
        let attr = attr.map_err(|e| e.to_string())?;
        let key = std::str::from_utf8(attr.key.as_ref()).map_err(|e| e.to_string())?;
        let value = attr.unescape_value().map_err(|e| e.to_string())?;
        element
            .attributes
            .push(Attribute::new(key, value.into_owned()));
    }
    Ok(element)
}

fn resolve_entity(raw: &str) -> Result<String, String> {
    if let Some(resolved) = resolve_xml_entity(raw) {
        return Ok(resolved.to_string());
    }

    if let Some(rest) = raw.strip_prefix('#') {
        let code = if let Some(hex) = rest.strip_prefix('x').or_else(|| rest.strip_prefix('X')) {
            u32::from_str_radix(hex, 16).map_err(|_| format!("invalid hex entity: #{}", rest))?
        } else {
            rest.parse::<u32>()
                .map_err(|_| format!("invalid decimal entity: #{}", rest))?
        };
        let ch = char::from_u32(code).ok_or_else(|| format!("invalid code point: {}", code))?;
        return Ok(ch.to_string());
    }

    Ok(format!("&{};", raw))
}
