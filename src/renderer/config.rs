//! Configuration for outline SVG output

/// Options for [`OutlineSvg`](super::OutlineSvg)
#[derive(Debug, Clone, PartialEq)]
pub struct OutlineConfig {
    /// Space around the drawing inside the viewBox
    pub padding: f32,

    /// Whether to emit the XML declaration
    pub standalone: bool,

    /// Prefix for CSS class names (e.g. "fb-" gives "fb-node")
    pub class_prefix: String,

    /// Font size used for text and id labels
    pub font_size: f32,
}

impl Default for OutlineConfig {
    fn default() -> Self {
        Self {
            padding: 10.0,
            standalone: true,
            class_prefix: "fb-".to_string(),
            font_size: 12.0,
        }
    }
}

impl OutlineConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the padding around the drawing
    pub fn with_padding(mut self, padding: f32) -> Self {
        self.padding = padding;
        self
    }

    /// Set whether to emit the XML declaration
    pub fn with_standalone(mut self, standalone: bool) -> Self {
        self.standalone = standalone;
        self
    }

    /// Set the CSS class prefix
    pub fn with_class_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.class_prefix = prefix.into();
        self
    }

    /// Set the font size for text and id labels
    pub fn with_font_size(mut self, size: f32) -> Self {
        self.font_size = size;
        self
    }
}
