//! Outline SVG and plain listing sinks

use std::collections::HashMap;
use std::fmt::Write as _;

use quick_xml::escape::escape;

use crate::draw::{DrawCommand, DrawSink};
use crate::expr::Value;
use crate::materialize::ConcreteId;

use super::OutlineConfig;

/// Draw sink emitting one rectangle outline per node.
///
/// Commands carry parent-relative positions; parents are always drawn before
/// their children, so absolute origins are accumulated as commands arrive.
pub struct OutlineSvg {
    config: OutlineConfig,
    origins: HashMap<ConcreteId, (f32, f32)>,
    elements: Vec<String>,
    extent: (f32, f32),
}

impl OutlineSvg {
    pub fn new(config: OutlineConfig) -> Self {
        Self {
            config,
            origins: HashMap::new(),
            elements: Vec::new(),
            extent: (0.0, 0.0),
        }
    }

    /// Assemble the SVG document
    pub fn finish(self) -> String {
        let pad = self.config.padding;
        let origin = 0.0 - pad;
        let mut svg = String::new();
        if self.config.standalone {
            svg.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
            svg.push('\n');
        }
        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="{} {} {} {}" fill="none" stroke="black" font-size="{}">"#,
            origin,
            origin,
            self.extent.0 + 2.0 * pad,
            self.extent.1 + 2.0 * pad,
            self.config.font_size
        );
        for element in &self.elements {
            svg.push_str("  ");
            svg.push_str(element);
            svg.push('\n');
        }
        svg.push_str("</svg>\n");
        svg
    }
}

impl DrawSink for OutlineSvg {
    fn draw(&mut self, command: &mut DrawCommand) {
        let (px, py) = command
            .parent
            .and_then(|parent| self.origins.get(&parent).copied())
            .unwrap_or((0.0, 0.0));
        let x = px + command.left;
        let y = py + command.top;
        self.origins.insert(command.node, (x, y));
        self.extent.0 = self.extent.0.max(x + command.width);
        self.extent.1 = self.extent.1.max(y + command.height);

        let prefix = &self.config.class_prefix;
        let id = command.attributes.get("id").filter(|v| !v.is_null());
        let id_attr = id
            .map(|v| format!(r#" id="{}""#, escape(v.to_string().as_str())))
            .unwrap_or_default();
        self.elements.push(format!(
            r#"<rect{} class="{}node {}{}" x="{}" y="{}" width="{}" height="{}"/>"#,
            id_attr,
            prefix,
            prefix,
            escape(command.tag.as_str()),
            x,
            y,
            command.width,
            command.height
        ));

        if let Some(text) = &command.text {
            self.elements.push(format!(
                r#"<text class="{}text" x="{}" y="{}" text-anchor="middle" fill="black" stroke="none">{}</text>"#,
                prefix,
                x + command.width / 2.0,
                y + self.config.font_size,
                escape(text.as_str())
            ));
        }
        if let Some(id) = id {
            self.elements.push(format!(
                r#"<text class="{}id" x="{}" y="{}" fill="black" stroke="none">{}</text>"#,
                prefix,
                x,
                y + command.height - 2.0,
                escape(id.to_string().as_str())
            ));
        }
    }
}

/// Draw sink writing one line per draw call, indented by depth
#[derive(Debug, Default)]
pub struct Listing {
    depths: HashMap<ConcreteId, usize>,
    lines: Vec<String>,
}

impl Listing {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn finish(self) -> String {
        let mut out = self.lines.join("\n");
        out.push('\n');
        out
    }
}

fn format_attribute(value: &Value) -> String {
    match value {
        Value::String(s) => format!("{:?}", s),
        other => other.to_string(),
    }
}

impl DrawSink for Listing {
    fn draw(&mut self, command: &mut DrawCommand) {
        let depth = command
            .parent
            .and_then(|parent| self.depths.get(&parent))
            .map_or(0, |d| d + 1);
        self.depths.insert(command.node, depth);

        let mut line = format!(
            "{}{} [{},{} {}x{}]",
            "  ".repeat(depth),
            command.tag,
            command.left,
            command.top,
            command.width,
            command.height
        );
        if let Some(text) = &command.text {
            let _ = write!(line, " {:?}", text);
        }
        for (key, value) in &command.attributes {
            let _ = write!(line, " {}={}", key, format_attribute(value));
        }
        self.lines.push(line);
    }
}
