//! flexbind - data-bound markup templates laid out with flexbox
//!
//! Markup elements become flex boxes; attributes are style properties, and
//! the `for`, `if`, `bind:*` and `{{ }}` directives bind them to data.
//!
//! # Example
//!
//! ```rust
//! use flexbind::{render_listing, Value};
//! use indexmap::IndexMap;
//!
//! let mut data = IndexMap::new();
//! data.insert("names".to_string(), Value::from(vec!["a", "b"]));
//!
//! let listing = render_listing(
//!     r#"<row width="200px" height="50px" flex-direction="row">
//!         <cell for="name in names" flex-grow="1">{{ name }}</cell>
//!     </row>"#,
//!     data,
//! )
//! .unwrap();
//! assert!(listing.contains(r#"cell [100,0 100x50] "b""#));
//! ```

pub mod config;
pub mod context;
pub mod draw;
pub mod error;
pub mod expr;
pub mod layout;
pub mod markup;
pub mod materialize;
pub mod renderer;
pub mod scene;
pub mod session;
pub mod style;
pub mod template;

pub use config::SessionConfig;
pub use draw::{DrawCommand, DrawError, DrawSink, UserContext};
pub use error::{ExpressionParseError, MarkupStructureError};
pub use expr::Value;
pub use layout::{Geometry, LayoutEngine, LayoutError, LayoutMap, TaffyEngine};
pub use markup::{parse_markup, Element, MarkupError};
pub use materialize::{ConcreteId, ConcreteNode, ConcreteTree};
pub use renderer::{Listing, OutlineConfig, OutlineSvg};
pub use scene::{Scene, SceneError};
pub use session::{Session, SessionError};
pub use template::{compile, Diagnostic, TemplateId, TemplateTree};

use indexmap::IndexMap;
use thiserror::Error;

/// Errors that abort loading, layout or drawing
#[derive(Debug, Error)]
pub enum Error {
    #[error("markup error: {0}")]
    Markup(#[from] MarkupError),

    #[error("structure error: {0}")]
    Structure(#[from] MarkupStructureError),

    #[error("layout error: {0}")]
    Layout(#[from] LayoutError),

    #[error("draw error: {0}")]
    Draw(#[from] DrawError),

    #[error("{0}")]
    Session(#[from] SessionError),
}

/// Load, lay out and draw `markup` into a [`Listing`] with default settings
pub fn render_listing(markup: &str, data: IndexMap<String, Value>) -> Result<String, Error> {
    let mut session = Session::load(markup, data)?;
    session.compute_layout()?;
    let mut listing = Listing::new();
    session.draw(&mut listing)?;
    Ok(listing.finish())
}

/// Load, lay out and draw `markup` as an outline SVG
///
/// # Example
///
/// ```rust
/// use flexbind::{render_outline, OutlineConfig, SessionConfig};
///
/// let svg = render_outline(
///     r#"<box id="main" width="40px" height="20px">hi</box>"#,
///     Default::default(),
///     SessionConfig::default(),
///     OutlineConfig::default(),
/// )
/// .unwrap();
/// assert!(svg.contains(r#"<rect id="main""#));
/// ```
pub fn render_outline(
    markup: &str,
    data: IndexMap<String, Value>,
    config: SessionConfig,
    outline: OutlineConfig,
) -> Result<String, Error> {
    let mut session = Session::load_with_config(markup, data, config)?;
    session.compute_layout()?;
    let mut svg = OutlineSvg::new(outline);
    session.draw(&mut svg)?;
    Ok(svg.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_listing_reports_structure_errors() {
        let result = render_listing(r#"<root if="true"/>"#, IndexMap::new());
        assert!(matches!(result, Err(Error::Structure(_))));
    }

    #[test]
    fn test_render_listing_reports_markup_errors() {
        let result = render_listing("<a/><b/>", IndexMap::new());
        assert!(matches!(result, Err(Error::Markup(MarkupError::MultipleRoots { .. }))));
    }

    #[test]
    fn test_error_display() {
        let err = Error::from(SessionError::LayoutNotComputed);
        assert_eq!(
            err.to_string(),
            "layout has not been computed since the last (re)render"
        );
    }
}
