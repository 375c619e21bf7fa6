//! Flex style model and the attribute property table
//!
//! A [`Style`] is a plain snapshot of flexbox properties. Template nodes hold
//! the static snapshot built from literal attributes; concrete nodes copy it
//! and apply bound values on top through [`apply_style_property`].

mod table;
mod value;

pub use table::apply_style_property;
pub use value::{parse_shorthand, parse_value, split_property_name};

/// Unit attached to a dimension value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Unit {
    /// Not set; distinct from zero
    #[default]
    Undefined,
    Point,
    Percent,
    Auto,
}

/// A magnitude with its unit
#[derive(Debug, Clone, Copy)]
pub struct Dimension {
    pub value: f32,
    pub unit: Unit,
}

impl Dimension {
    pub const UNDEFINED: Dimension = Dimension {
        value: f32::NAN,
        unit: Unit::Undefined,
    };

    pub const AUTO: Dimension = Dimension {
        value: 0.0,
        unit: Unit::Auto,
    };

    pub fn points(value: f32) -> Self {
        Self {
            value,
            unit: Unit::Point,
        }
    }

    pub fn percent(value: f32) -> Self {
        Self {
            value,
            unit: Unit::Percent,
        }
    }

    pub fn is_undefined(&self) -> bool {
        self.unit == Unit::Undefined
    }
}

impl Default for Dimension {
    fn default() -> Self {
        Self::UNDEFINED
    }
}

// Magnitudes only matter for point and percent values; undefined carries NaN.
impl PartialEq for Dimension {
    fn eq(&self, other: &Self) -> bool {
        match (self.unit, other.unit) {
            (Unit::Point, Unit::Point) | (Unit::Percent, Unit::Percent) => self.value == other.value,
            (a, b) => a == b && matches!(a, Unit::Undefined | Unit::Auto),
        }
    }
}

/// Box edges in shorthand order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    Left = 0,
    Top = 1,
    Right = 2,
    Bottom = 3,
}

impl Edge {
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_keyword(name: &str) -> Option<Self> {
        match name {
            "left" => Some(Edge::Left),
            "top" => Some(Edge::Top),
            "right" => Some(Edge::Right),
            "bottom" => Some(Edge::Bottom),
            _ => None,
        }
    }
}

/// Declares a keyword-valued style enum with its accepted spellings.
/// The first spelling of each variant is the canonical one.
macro_rules! keyword_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => [$first:literal $(, $alias:literal)*] ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            pub fn from_keyword(text: &str) -> Option<Self> {
                match text {
                    $( $first $(| $alias)* => Some($name::$variant), )+
                    _ => None,
                }
            }

            pub fn keyword(self) -> &'static str {
                match self {
                    $( $name::$variant => $first, )+
                }
            }
        }
    };
}

keyword_enum! {
    pub enum Position {
        #[default]
        Relative => ["relative"],
        Absolute => ["absolute"],
    }
}

keyword_enum! {
    /// Used by `align-content`, `align-items` and `align-self`
    pub enum Align {
        #[default]
        Auto => ["auto"],
        FlexStart => ["flex-start"],
        Center => ["center"],
        FlexEnd => ["flex-end"],
        Stretch => ["stretch"],
        Baseline => ["baseline"],
        SpaceBetween => ["space-between"],
        SpaceAround => ["space-around"],
    }
}

keyword_enum! {
    pub enum Justify {
        #[default]
        FlexStart => ["flex-start"],
        Center => ["center"],
        FlexEnd => ["flex-end"],
        SpaceBetween => ["space-between"],
        SpaceAround => ["space-around"],
        SpaceEvenly => ["space-evenly"],
    }
}

keyword_enum! {
    pub enum FlexDirection {
        #[default]
        Column => ["column"],
        ColumnReverse => ["column-reverse"],
        Row => ["row"],
        RowReverse => ["row-reverse"],
    }
}

keyword_enum! {
    pub enum FlexWrap {
        #[default]
        NoWrap => ["no-wrap", "nowrap"],
        Wrap => ["wrap"],
        WrapReverse => ["wrap-reverse"],
    }
}

keyword_enum! {
    pub enum Direction {
        #[default]
        Inherit => ["inherit"],
        Ltr => ["ltr"],
        Rtl => ["rtl"],
    }
}

keyword_enum! {
    pub enum Display {
        #[default]
        Flex => ["flex"],
        None => ["none"],
    }
}

keyword_enum! {
    pub enum Overflow {
        #[default]
        Visible => ["visible"],
        Hidden => ["hidden"],
        Scroll => ["scroll"],
    }
}

/// Flexbox properties of one node
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    pub display: Display,
    pub position: Position,
    pub direction: Direction,
    pub flex_direction: FlexDirection,
    pub flex_wrap: FlexWrap,
    pub overflow: Overflow,
    pub align_content: Align,
    pub align_items: Align,
    pub align_self: Align,
    pub justify_content: Justify,
    /// `flex` shorthand; explicit grow/shrink take precedence
    pub flex: Option<f32>,
    pub flex_grow: Option<f32>,
    pub flex_shrink: Option<f32>,
    pub flex_basis: Dimension,
    pub width: Dimension,
    pub height: Dimension,
    pub min_width: Dimension,
    pub min_height: Dimension,
    pub max_width: Dimension,
    pub max_height: Dimension,
    /// Indexed by [`Edge::index`]
    pub margin: [Dimension; 4],
    pub padding: [Dimension; 4],
    pub border: [Dimension; 4],
}

impl Default for Style {
    fn default() -> Self {
        Self {
            display: Display::Flex,
            position: Position::Relative,
            direction: Direction::Inherit,
            flex_direction: FlexDirection::Column,
            flex_wrap: FlexWrap::NoWrap,
            overflow: Overflow::Visible,
            align_content: Align::FlexStart,
            align_items: Align::Stretch,
            align_self: Align::Auto,
            justify_content: Justify::FlexStart,
            flex: None,
            flex_grow: None,
            flex_shrink: None,
            flex_basis: Dimension::AUTO,
            width: Dimension::AUTO,
            height: Dimension::AUTO,
            min_width: Dimension::UNDEFINED,
            min_height: Dimension::UNDEFINED,
            max_width: Dimension::UNDEFINED,
            max_height: Dimension::UNDEFINED,
            margin: [Dimension::UNDEFINED; 4],
            padding: [Dimension::UNDEFINED; 4],
            border: [Dimension::UNDEFINED; 4],
        }
    }
}

impl Style {
    pub fn resolved_flex_grow(&self) -> f32 {
        match (self.flex_grow, self.flex) {
            (Some(grow), _) => grow,
            (None, Some(flex)) if flex > 0.0 => flex,
            _ => 0.0,
        }
    }

    pub fn resolved_flex_shrink(&self) -> f32 {
        match (self.flex_shrink, self.flex) {
            (Some(shrink), _) => shrink,
            (None, Some(flex)) if flex < 0.0 => -flex,
            _ => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_aliases() {
        assert_eq!(FlexWrap::from_keyword("nowrap"), Some(FlexWrap::NoWrap));
        assert_eq!(FlexWrap::from_keyword("no-wrap"), Some(FlexWrap::NoWrap));
        assert_eq!(FlexWrap::NoWrap.keyword(), "no-wrap");
        assert_eq!(Align::from_keyword("space-around"), Some(Align::SpaceAround));
        assert_eq!(Justify::from_keyword("stretch"), None);
    }

    #[test]
    fn test_undefined_dimensions_compare_equal() {
        assert_eq!(Dimension::UNDEFINED, Dimension::default());
        assert_ne!(Dimension::UNDEFINED, Dimension::points(0.0));
        assert_ne!(Dimension::points(5.0), Dimension::percent(5.0));
    }

    #[test]
    fn test_flex_shorthand_resolution() {
        let mut style = Style {
            flex: Some(2.0),
            ..Style::default()
        };
        assert_eq!(style.resolved_flex_grow(), 2.0);
        assert_eq!(style.resolved_flex_shrink(), 0.0);

        style.flex_grow = Some(1.0);
        style.flex = Some(-3.0);
        assert_eq!(style.resolved_flex_grow(), 1.0);
        assert_eq!(style.resolved_flex_shrink(), 3.0);
    }
}
