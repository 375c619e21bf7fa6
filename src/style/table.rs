//! Property name to style setter dispatch

use super::value::{parse_shorthand, parse_value, split_property_name};
use super::{
    Align, Dimension, Direction, Display, Edge, FlexDirection, FlexWrap, Justify, Overflow,
    Position, Style, Unit,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EdgeKind {
    Margin,
    Padding,
    Border,
}

impl EdgeKind {
    fn from_head(head: &str) -> Option<Self> {
        match head {
            "margin" => Some(EdgeKind::Margin),
            "padding" => Some(EdgeKind::Padding),
            "border" => Some(EdgeKind::Border),
            _ => None,
        }
    }

    fn accepts(self, unit: Unit) -> bool {
        match self {
            EdgeKind::Margin => matches!(unit, Unit::Auto | Unit::Percent | Unit::Point),
            EdgeKind::Padding => matches!(unit, Unit::Percent | Unit::Point),
            EdgeKind::Border => unit == Unit::Point,
        }
    }

    fn edges<'s>(self, style: &'s mut Style) -> &'s mut [Dimension; 4] {
        match self {
            EdgeKind::Margin => &mut style.margin,
            EdgeKind::Padding => &mut style.padding,
            EdgeKind::Border => &mut style.border,
        }
    }
}

/// Apply one style property given as text.
///
/// Returns `false` when `name` is not a style property; the caller keeps such
/// attributes in the generic bag only. Malformed values are ignored.
pub fn apply_style_property(style: &mut Style, name: &str, text: &str) -> bool {
    match name {
        "display" => set_keyword(&mut style.display, Display::from_keyword(text)),
        "position" => set_keyword(&mut style.position, Position::from_keyword(text)),
        "overflow" => set_keyword(&mut style.overflow, Overflow::from_keyword(text)),
        "direction" => set_keyword(&mut style.direction, Direction::from_keyword(text)),
        "align-content" => set_keyword(&mut style.align_content, Align::from_keyword(text)),
        "align-items" => set_keyword(&mut style.align_items, Align::from_keyword(text)),
        "align-self" => set_keyword(&mut style.align_self, Align::from_keyword(text)),
        "justify-content" => set_keyword(&mut style.justify_content, Justify::from_keyword(text)),
        "flex-direction" => {
            set_keyword(&mut style.flex_direction, FlexDirection::from_keyword(text))
        }
        "flex-wrap" => set_keyword(&mut style.flex_wrap, FlexWrap::from_keyword(text)),
        "flex" => set_float(&mut style.flex, text),
        "flex-grow" => set_float(&mut style.flex_grow, text),
        "flex-shrink" => set_float(&mut style.flex_shrink, text),
        "flex-basis" => set_sized(&mut style.flex_basis, parse_value(text)),
        "width" => set_sized(&mut style.width, parse_value(text)),
        "height" => set_sized(&mut style.height, parse_value(text)),
        "min-width" => set_bound(&mut style.min_width, parse_value(text)),
        "min-height" => set_bound(&mut style.min_height, parse_value(text)),
        "max-width" => set_bound(&mut style.max_width, parse_value(text)),
        "max-height" => set_bound(&mut style.max_height, parse_value(text)),
        _ => return apply_edge_property(style, name, text),
    }
    true
}

fn set_keyword<T>(slot: &mut T, parsed: Option<T>) {
    match parsed {
        Some(value) => *slot = value,
        None => log::warn!("unrecognized style keyword ignored"),
    }
}

fn set_float(slot: &mut Option<f32>, text: &str) {
    match text.trim().parse::<f32>() {
        Ok(value) if value.is_finite() => *slot = Some(value),
        _ => log::warn!("invalid flex factor '{}' ignored", text),
    }
}

/// width, height and flex-basis take auto, percent or points
fn set_sized(slot: &mut Dimension, value: Dimension) {
    if !value.is_undefined() {
        *slot = value;
    }
}

/// min/max bounds take percent or points; auto clears the bound
fn set_bound(slot: &mut Dimension, value: Dimension) {
    match value.unit {
        Unit::Point | Unit::Percent => *slot = value,
        Unit::Auto => *slot = Dimension::UNDEFINED,
        Unit::Undefined => {}
    }
}

fn set_edge(kind: EdgeKind, style: &mut Style, edge: usize, value: Dimension) {
    if value.is_undefined() {
        return;
    }
    let slot = &mut kind.edges(style)[edge];
    *slot = if kind.accepts(value.unit) {
        value
    } else {
        Dimension::UNDEFINED
    };
}

fn apply_edge_property(style: &mut Style, name: &str, text: &str) -> bool {
    let Some((head, tail)) = split_property_name(name) else {
        return false;
    };
    let Some(kind) = EdgeKind::from_head(head) else {
        return false;
    };

    if tail.is_empty() {
        match parse_shorthand(text) {
            Some(values) => {
                for (edge, value) in values.into_iter().enumerate() {
                    set_edge(kind, style, edge, value);
                }
            }
            None => log::warn!("{} shorthand '{}' needs 1 to 4 values", name, text),
        }
        return true;
    }

    match Edge::from_keyword(tail) {
        Some(edge) => {
            set_edge(kind, style, edge.index(), parse_value(text));
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn styled(props: &[(&str, &str)]) -> Style {
        let mut style = Style::default();
        for (name, text) in props {
            apply_style_property(&mut style, name, text);
        }
        style
    }

    #[test]
    fn test_keyword_properties() {
        let style = styled(&[
            ("flex-direction", "row"),
            ("justify-content", "space-between"),
            ("align-items", "center"),
            ("position", "absolute"),
            ("display", "none"),
        ]);
        assert_eq!(style.flex_direction, FlexDirection::Row);
        assert_eq!(style.justify_content, Justify::SpaceBetween);
        assert_eq!(style.align_items, Align::Center);
        assert_eq!(style.position, Position::Absolute);
        assert_eq!(style.display, Display::None);
    }

    #[test]
    fn test_bad_keyword_keeps_previous() {
        let style = styled(&[("flex-direction", "row"), ("flex-direction", "diagonal")]);
        assert_eq!(style.flex_direction, FlexDirection::Row);
    }

    #[test]
    fn test_dimensions() {
        let style = styled(&[
            ("width", "620px"),
            ("height", "50%"),
            ("min-width", "10px"),
            ("flex-basis", "auto"),
        ]);
        assert_eq!(style.width, Dimension::points(620.0));
        assert_eq!(style.height, Dimension::percent(50.0));
        assert_eq!(style.min_width, Dimension::points(10.0));
        assert_eq!(style.flex_basis, Dimension::AUTO);
    }

    #[test]
    fn test_unitless_width_is_ignored() {
        let style = styled(&[("width", "100px"), ("width", "100")]);
        assert_eq!(style.width, Dimension::points(100.0));
    }

    #[test]
    fn test_margin_shorthand_and_edges() {
        let style = styled(&[("margin", "1px 2px 3px"), ("margin-bottom", "auto")]);
        assert_eq!(
            style.margin,
            [
                Dimension::points(2.0),
                Dimension::points(1.0),
                Dimension::points(2.0),
                Dimension::AUTO
            ]
        );
    }

    #[test]
    fn test_edge_kinds_reject_unsupported_units() {
        let style = styled(&[
            ("padding", "5px"),
            ("padding-left", "auto"),
            ("border", "10%"),
        ]);
        assert_eq!(style.padding[Edge::Left.index()], Dimension::UNDEFINED);
        assert_eq!(style.padding[Edge::Top.index()], Dimension::points(5.0));
        assert_eq!(style.border, [Dimension::UNDEFINED; 4]);
    }

    #[test]
    fn test_oversized_shorthand_applies_nothing() {
        let style = styled(&[("margin", "1px 2px 3px 4px 5px")]);
        assert_eq!(style.margin, [Dimension::UNDEFINED; 4]);
    }

    #[test]
    fn test_flex_factors() {
        let style = styled(&[("flex-grow", "2"), ("flex-shrink", "x")]);
        assert_eq!(style.flex_grow, Some(2.0));
        assert_eq!(style.flex_shrink, None);
    }

    #[test]
    fn test_recognition() {
        let mut style = Style::default();
        assert!(apply_style_property(&mut style, "margin-left", "1px"));
        assert!(apply_style_property(&mut style, "width", "garbage"));
        assert!(!apply_style_property(&mut style, "id", "box"));
        assert!(!apply_style_property(&mut style, "margin-middle", "1px"));
        assert!(!apply_style_property(&mut style, "border-top-width", "1px"));
        assert!(!apply_style_property(&mut style, "background-color", "red"));
    }
}
