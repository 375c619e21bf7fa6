//! Error types for directive compilation

use ariadne::{Color, Config, Label, Report, ReportKind, Source};
use chumsky::error::{Rich, RichPattern, RichReason};
use thiserror::Error;

use crate::expr::lexer::Token;

/// Numeric codes carried by expression parse errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ExprErrorCode {
    UnexpectedToken = 1,
    UnexpectedEnd = 2,
    InvalidToken = 3,
    UnclosedInterpolation = 4,
    MultipleInterpolations = 5,
    EmptyExpression = 6,
    NestingTooDeep = 7,
}

impl ExprErrorCode {
    pub fn name(self) -> &'static str {
        match self {
            ExprErrorCode::UnexpectedToken => "UnexpectedToken",
            ExprErrorCode::UnexpectedEnd => "UnexpectedEnd",
            ExprErrorCode::InvalidToken => "InvalidToken",
            ExprErrorCode::UnclosedInterpolation => "UnclosedInterpolation",
            ExprErrorCode::MultipleInterpolations => "MultipleInterpolations",
            ExprErrorCode::EmptyExpression => "EmptyExpression",
            ExprErrorCode::NestingTooDeep => "NestingTooDeep",
        }
    }

    pub fn number(self) -> u16 {
        self as u16
    }
}

/// A malformed directive or interpolation source
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{} at {} (code {})", .code.name(), .position, .code.number())]
pub struct ExpressionParseError {
    /// The expression text that failed to parse
    pub source_text: String,
    /// Character (not byte) position of the failure within `source_text`
    pub position: usize,
    pub code: ExprErrorCode,
    pub message: String,
    pub expected: Vec<String>,
}

/// Number of characters of `text` that start before byte `offset`
pub(crate) fn char_position(text: &str, offset: usize) -> usize {
    text.char_indices().take_while(|(i, _)| *i < offset).count()
}

impl ExpressionParseError {
    /// Build an error located at byte `offset` of `source_text`
    pub fn new(
        source_text: &str,
        offset: usize,
        code: ExprErrorCode,
        message: impl Into<String>,
    ) -> Self {
        Self {
            source_text: source_text.to_string(),
            position: char_position(source_text, offset),
            code,
            message: message.into(),
            expected: Vec::new(),
        }
    }

    /// Convert a chumsky error raised while parsing `source_text`
    pub fn from_rich(err: Rich<'_, Token>, source_text: &str) -> Self {
        let code = match err.found() {
            Some(_) => ExprErrorCode::UnexpectedToken,
            None => ExprErrorCode::UnexpectedEnd,
        };

        let message = match err.reason() {
            RichReason::ExpectedFound { found, .. } => match found {
                Some(tok) => format!("Unexpected {}", format_token(tok)),
                None => "Unexpected end of expression".to_string(),
            },
            RichReason::Custom(msg) => msg.to_string(),
        };

        let expected = err
            .expected()
            .filter_map(|e| match e {
                RichPattern::Token(tok) => Some(format_token(tok)),
                RichPattern::Label(label) => Some(label.to_string()),
                RichPattern::EndOfInput => Some("end of expression".to_string()),
                RichPattern::Identifier(s) => Some(format!("identifier '{}'", s)),
                RichPattern::Any => Some("any token".to_string()),
                RichPattern::SomethingElse => None,
            })
            .collect();

        Self {
            source_text: source_text.to_string(),
            position: char_position(source_text, err.span().into_range().start),
            code,
            message,
            expected,
        }
    }

    /// Render the error against its source text using ariadne, without colors
    pub fn format(&self, filename: &str) -> String {
        self.format_report(filename, false)
    }

    /// Like [`format`](Self::format), with ANSI colors when `color` is set
    pub fn format_report(&self, filename: &str, color: bool) -> String {
        let expected_str = if self.expected.is_empty() {
            String::new()
        } else {
            format!("\nExpected: {}", self.expected.join(", "))
        };
        let len = self.source_text.chars().count();
        let end = (self.position + 1).min(len.max(self.position));

        let mut buf = Vec::new();
        let written = Report::build(ReportKind::Error, filename, self.position)
            .with_config(Config::default().with_color(color))
            .with_code(self.code.number())
            .with_message(self.to_string())
            .with_label(
                Label::new((filename, self.position..end))
                    .with_message(format!("{}{}", self.message, expected_str))
                    .with_color(Color::Red),
            )
            .finish()
            .write((filename, Source::from(self.source_text.as_str())), &mut buf);

        match written {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => format!("{}: {}", filename, self),
        }
    }
}

/// Format a token for human-readable error messages
fn format_token(tok: &Token) -> String {
    match tok {
        Token::Ident(s) => format!("identifier '{}'", s),
        Token::String(s) => format!("string \"{}\"", s),
        Token::Number(n) => format!("number {}", n),
        Token::In => "keyword 'in'".to_string(),
        Token::True => "'true'".to_string(),
        Token::False => "'false'".to_string(),
        Token::Null => "'null'".to_string(),
        Token::EqEq => "'=='".to_string(),
        Token::NotEq => "'!='".to_string(),
        Token::LessOrEqual => "'<='".to_string(),
        Token::GreaterOrEqual => "'>='".to_string(),
        Token::Less => "'<'".to_string(),
        Token::Greater => "'>'".to_string(),
        Token::AndAnd => "'&&'".to_string(),
        Token::OrOr => "'||'".to_string(),
        Token::Bang => "'!'".to_string(),
        Token::Plus => "'+'".to_string(),
        Token::Minus => "'-'".to_string(),
        Token::Star => "'*'".to_string(),
        Token::Slash => "'/'".to_string(),
        Token::Percent => "'%'".to_string(),
        Token::ParenOpen => "'('".to_string(),
        Token::ParenClose => "')'".to_string(),
        Token::BracketOpen => "'['".to_string(),
        Token::BracketClose => "']'".to_string(),
        Token::Comma => "','".to_string(),
        Token::Dot => "'.'".to_string(),
    }
}

/// Fatal problems with the shape of the markup document
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MarkupStructureError {
    /// The document root carries a `for` or `if` directive
    #[error("root element <{tag}> must not carry a '{directive}' directive")]
    DirectiveOnRoot { tag: String, directive: &'static str },

    /// Element nesting deeper than the configured bound
    #[error("markup nesting exceeds the maximum depth of {max_depth}")]
    TooDeep { max_depth: usize },
}
