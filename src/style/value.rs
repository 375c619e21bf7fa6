//! Textual dimension values and CSS-style shorthands

use super::{Dimension, Unit};

/// Parse `auto`, `<number>px` or `<number>%`.
///
/// Anything else, including a bare number, is undefined.
pub fn parse_value(text: &str) -> Dimension {
    if text == "auto" {
        return Dimension::AUTO;
    }

    let (digits, unit) = if let Some(d) = text.strip_suffix('%') {
        (d, Unit::Percent)
    } else if let Some(d) = text.strip_suffix("px") {
        (d, Unit::Point)
    } else {
        return Dimension::UNDEFINED;
    };

    if !is_plain_number(digits) {
        return Dimension::UNDEFINED;
    }
    match digits.parse::<f32>() {
        Ok(value) => Dimension { value, unit },
        Err(_) => Dimension::UNDEFINED,
    }
}

/// `-?(digits.)?digits`, also accepting `.5`
fn is_plain_number(text: &str) -> bool {
    let unsigned = text.strip_prefix('-').unwrap_or(text);
    let (int, frac) = match unsigned.split_once('.') {
        Some((int, frac)) => (int, frac),
        None => ("", unsigned),
    };
    !frac.is_empty()
        && frac.bytes().all(|b| b.is_ascii_digit())
        && int.bytes().all(|b| b.is_ascii_digit())
}

/// Expand a 1 to 4 token shorthand into `[left, top, right, bottom]`.
///
/// Zero tokens or more than four is a failure.
pub fn parse_shorthand(text: &str) -> Option<[Dimension; 4]> {
    let values: Vec<Dimension> = text.split_whitespace().map(parse_value).collect();
    match values.as_slice() {
        [a] => Some([*a, *a, *a, *a]),
        [a, b] => Some([*b, *a, *b, *a]),
        [a, b, c] => Some([*b, *a, *b, *c]),
        [a, b, c, d] => Some([*d, *a, *b, *c]),
        _ => None,
    }
}

/// Split `margin-left` into `("margin", "left")` and `margin` into `("margin", "")`.
///
/// Names with more than one hyphen do not split.
pub fn split_property_name(name: &str) -> Option<(&str, &str)> {
    let mut parts = name.split('-');
    let head = parts.next().unwrap_or_default();
    match (parts.next(), parts.next()) {
        (None, _) => Some((head, "")),
        (Some(tail), None) => Some((head, tail)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn px(v: f32) -> Dimension {
        Dimension::points(v)
    }

    #[test]
    fn test_parse_value_units() {
        assert_eq!(parse_value("auto"), Dimension::AUTO);
        assert_eq!(parse_value("12px"), px(12.0));
        assert_eq!(parse_value("-1.5px"), px(-1.5));
        assert_eq!(parse_value(".5px"), px(0.5));
        assert_eq!(parse_value("50%"), Dimension::percent(50.0));
    }

    #[test]
    fn test_bare_number_is_undefined() {
        assert!(parse_value("100").is_undefined());
        assert!(parse_value("").is_undefined());
        assert!(parse_value("px").is_undefined());
        assert!(parse_value("abcpx").is_undefined());
        assert!(parse_value("1e3px").is_undefined());
        assert!(parse_value("12 px").is_undefined());
    }

    #[test]
    fn test_shorthand_expansion() {
        assert_eq!(parse_shorthand("2px"), Some([px(2.0); 4]));
        assert_eq!(
            parse_shorthand("1px 2px"),
            Some([px(2.0), px(1.0), px(2.0), px(1.0)])
        );
        assert_eq!(
            parse_shorthand("1px 2px 3px"),
            Some([px(2.0), px(1.0), px(2.0), px(3.0)])
        );
        assert_eq!(
            parse_shorthand("1px  2px 3px 4px"),
            Some([px(4.0), px(1.0), px(2.0), px(3.0)])
        );
    }

    #[test]
    fn test_shorthand_token_count_failures() {
        assert_eq!(parse_shorthand("1px 2px 3px 4px 5px"), None);
        assert_eq!(parse_shorthand(""), None);
        assert_eq!(parse_shorthand("   "), None);
    }

    #[test]
    fn test_split_property_name() {
        assert_eq!(split_property_name("margin"), Some(("margin", "")));
        assert_eq!(split_property_name("padding-top"), Some(("padding", "top")));
        assert_eq!(split_property_name("border-top-width"), None);
    }
}
