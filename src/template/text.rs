//! `{{ expr }}` text interpolation

use crate::error::{char_position, ExprErrorCode, ExpressionParseError};
use crate::expr::parse_expression;

use super::node::TextTemplate;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// Compile element text into a literal or single-interpolation template
pub fn compile_text(text: &str) -> Result<TextTemplate, ExpressionParseError> {
    let Some(open) = text.find(OPEN) else {
        return Ok(TextTemplate::literal(text));
    };
    let inner_start = open + OPEN.len();
    let Some(close_rel) = text[inner_start..].find(CLOSE) else {
        return Err(ExpressionParseError::new(
            text,
            open,
            ExprErrorCode::UnclosedInterpolation,
            "'{{' is never closed",
        ));
    };
    let inner_end = inner_start + close_rel;
    let rest_start = inner_end + CLOSE.len();

    if let Some(second) = text[rest_start..].find(OPEN) {
        return Err(ExpressionParseError::new(
            text,
            rest_start + second,
            ExprErrorCode::MultipleInterpolations,
            "only one interpolation is allowed per text",
        ));
    }

    // Report positions against the whole text rather than the fragment
    let expr = parse_expression(&text[inner_start..inner_end]).map_err(|mut err| {
        err.position += char_position(text, inner_start);
        err.source_text = text.to_string();
        err
    })?;

    Ok(TextTemplate {
        prefix: text[..open].to_string(),
        expr: Some(expr),
        suffix: text[rest_start..].to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_text() {
        let template = compile_text("hello").unwrap();
        assert_eq!(template, TextTemplate::literal("hello"));
    }

    #[test]
    fn test_single_interpolation() {
        let template = compile_text("item {{ i + 1 }} of 3").unwrap();
        assert_eq!(template.prefix, "item ");
        assert_eq!(template.suffix, " of 3");
        // spans stay relative to the expression fragment
        let expr = template.expr.unwrap();
        assert_eq!(expr.span, 1..6);
    }

    #[test]
    fn test_unclosed() {
        let err = compile_text("a {{ b").unwrap_err();
        assert_eq!(err.code, ExprErrorCode::UnclosedInterpolation);
        assert_eq!(err.position, 2);
    }

    #[test]
    fn test_multiple() {
        let err = compile_text("{{a}}-{{b}}").unwrap_err();
        assert_eq!(err.code, ExprErrorCode::MultipleInterpolations);
        assert_eq!(err.position, 6);
    }

    #[test]
    fn test_inner_error_offset() {
        let err = compile_text("x {{ }}").unwrap_err();
        assert_eq!(err.code, ExprErrorCode::EmptyExpression);
        assert_eq!(err.position, 4);
        assert_eq!(err.source_text, "x {{ }}");
    }

    #[test]
    fn test_inner_error_position_in_characters() {
        let err = compile_text("é {{ 1 + }}").unwrap_err();
        assert_eq!(err.code, ExprErrorCode::UnexpectedEnd);
        assert_eq!(err.position, 9);
    }
}
