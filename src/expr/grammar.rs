//! Expression parser implementation using chumsky

use chumsky::input::{Stream, ValueInput};
use chumsky::prelude::*;

use crate::error::{ExprErrorCode, ExpressionParseError};
use crate::expr::ast::*;
use crate::expr::lexer::{lex, Token};

/// Most operators and opening brackets one expression may contain.
///
/// Every one of them can add a level to the syntax tree, which is parsed,
/// evaluated and dropped recursively.
pub const MAX_EXPRESSION_NESTING: usize = 128;

/// Postfix operations applied left to right after an atom
#[derive(Debug, Clone)]
enum Postfix {
    Member(String),
    Index(Spanned<Expr>),
}

/// Parse a value expression such as `item.width * 2`
pub fn parse_expression(input: &str) -> Result<Spanned<Expr>, ExpressionParseError> {
    let tokens = lex_checked(input)?;
    let len = input.len();
    let token_stream = Stream::from_iter(
        tokens
            .into_iter()
            .map(|(tok, span)| (tok, SimpleSpan::from(span))),
    )
    .map((len..len).into(), |(t, s): (_, _)| (t, s));

    expr_parser()
        .then_ignore(end())
        .parse(token_stream)
        .into_result()
        .map_err(|errs| first_error(errs, input))
}

/// Parse the `<pattern> in <expression>` form used by `for` directives
pub fn parse_loop(input: &str) -> Result<LoopExpr, ExpressionParseError> {
    let tokens = lex_checked(input)?;
    let len = input.len();
    let token_stream = Stream::from_iter(
        tokens
            .into_iter()
            .map(|(tok, span)| (tok, SimpleSpan::from(span))),
    )
    .map((len..len).into(), |(t, s): (_, _)| (t, s));

    loop_parser()
        .parse(token_stream)
        .into_result()
        .map_err(|errs| first_error(errs, input))
}

fn lex_checked(input: &str) -> Result<Vec<(Token, Span)>, ExpressionParseError> {
    let tokens = lex(input).map_err(|position| {
        ExpressionParseError::new(
            input,
            position,
            ExprErrorCode::InvalidToken,
            "unrecognised character",
        )
    })?;
    if tokens.is_empty() {
        return Err(ExpressionParseError::new(
            input,
            0,
            ExprErrorCode::EmptyExpression,
            "expression is empty",
        ));
    }

    let mut nesting = 0;
    for (token, span) in &tokens {
        if adds_nesting(token) {
            nesting += 1;
            if nesting > MAX_EXPRESSION_NESTING {
                return Err(ExpressionParseError::new(
                    input,
                    span.start,
                    ExprErrorCode::NestingTooDeep,
                    format!(
                        "more than {} operators and brackets in one expression",
                        MAX_EXPRESSION_NESTING
                    ),
                ));
            }
        }
    }
    Ok(tokens)
}

fn adds_nesting(token: &Token) -> bool {
    !matches!(
        token,
        Token::In
            | Token::True
            | Token::False
            | Token::Null
            | Token::ParenClose
            | Token::BracketClose
            | Token::Comma
            | Token::Ident(_)
            | Token::String(_)
            | Token::Number(_)
    )
}

fn first_error(errs: Vec<Rich<'_, Token>>, input: &str) -> ExpressionParseError {
    errs.into_iter()
        .next()
        .map(|err| ExpressionParseError::from_rich(err, input))
        .unwrap_or_else(|| {
            ExpressionParseError::new(input, 0, ExprErrorCode::UnexpectedToken, "invalid expression")
        })
}

/// Helper to extract span range from chumsky's MapExtra
fn span_range(e: &impl chumsky::span::Span<Offset = usize>) -> Span {
    e.start()..e.end()
}

fn binary(op: BinaryOp, lhs: Spanned<Expr>, rhs: Spanned<Expr>) -> Spanned<Expr> {
    let span = lhs.span.start..rhs.span.end;
    Spanned::new(
        Expr::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        },
        span,
    )
}

fn loop_parser<'a, I>() -> impl Parser<'a, I, LoopExpr, extra::Err<Rich<'a, Token>>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    let identifier = select! {
        Token::Ident(name) => name,
    };

    let pattern = choice((
        identifier.clone().map(LoopPattern::Name),
        identifier
            .separated_by(just(Token::Comma))
            .at_least(1)
            .collect::<Vec<_>>()
            .delimited_by(just(Token::BracketOpen), just(Token::BracketClose))
            .map(LoopPattern::Destructure),
    ))
    .labelled("loop variable");

    pattern
        .then_ignore(just(Token::In))
        .then(expr_parser())
        .then_ignore(end())
        .map(|(pattern, source)| LoopExpr { pattern, source })
}

fn expr_parser<'a, I>() -> impl Parser<'a, I, Spanned<Expr>, extra::Err<Rich<'a, Token>>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    recursive(|expr| {
        let literal = select! {
            Token::Number(n) => Expr::Number(n),
            Token::String(s) => Expr::String(s),
            Token::True => Expr::Bool(true),
            Token::False => Expr::Bool(false),
            Token::Null => Expr::Null,
            Token::Ident(name) => Expr::Ident(name),
        }
        .map_with(|node, e| Spanned::new(node, span_range(&e.span())));

        let list = expr
            .clone()
            .separated_by(just(Token::Comma))
            .allow_trailing()
            .collect::<Vec<_>>()
            .delimited_by(just(Token::BracketOpen), just(Token::BracketClose))
            .map_with(|items, e| Spanned::new(Expr::List(items), span_range(&e.span())));

        // Parenthesised expressions widen their span to include the parens
        let parens = expr
            .clone()
            .delimited_by(just(Token::ParenOpen), just(Token::ParenClose))
            .map_with(|inner: Spanned<Expr>, e| Spanned::new(inner.node, span_range(&e.span())));

        let atom = choice((literal, list, parens)).labelled("value");

        let postfix_op = choice((
            just(Token::Dot)
                .ignore_then(select! { Token::Ident(name) => name })
                .map(Postfix::Member),
            expr.clone()
                .delimited_by(just(Token::BracketOpen), just(Token::BracketClose))
                .map(Postfix::Index),
        ))
        .map_with(|op, e| (op, span_range(&e.span()).end));

        let postfix = atom.foldl(postfix_op.repeated(), |target, (op, end)| {
            let span = target.span.start..end;
            let node = match op {
                Postfix::Member(name) => Expr::Member {
                    target: Box::new(target),
                    name,
                },
                Postfix::Index(index) => Expr::Index {
                    target: Box::new(target),
                    index: Box::new(index),
                },
            };
            Spanned::new(node, span)
        });

        let unary = choice((
            just(Token::Minus).to(UnaryOp::Neg),
            just(Token::Bang).to(UnaryOp::Not),
        ))
        .map_with(|op, e| (op, span_range(&e.span()).start))
        .repeated()
        .foldr(postfix, |(op, start), operand| {
            let span = start..operand.span.end;
            Spanned::new(
                Expr::Unary {
                    op,
                    operand: Box::new(operand),
                },
                span,
            )
        })
        .boxed();

        let product = unary
            .clone()
            .foldl(
                choice((
                    just(Token::Star).to(BinaryOp::Mul),
                    just(Token::Slash).to(BinaryOp::Div),
                    just(Token::Percent).to(BinaryOp::Rem),
                ))
                .then(unary)
                .repeated(),
                |lhs, (op, rhs)| binary(op, lhs, rhs),
            )
            .boxed();

        let sum = product
            .clone()
            .foldl(
                choice((
                    just(Token::Plus).to(BinaryOp::Add),
                    just(Token::Minus).to(BinaryOp::Sub),
                ))
                .then(product)
                .repeated(),
                |lhs, (op, rhs)| binary(op, lhs, rhs),
            )
            .boxed();

        // Comparisons do not chain: `a < b < c` is a parse error
        let comparison = sum
            .clone()
            .then(
                choice((
                    just(Token::EqEq).to(BinaryOp::Eq),
                    just(Token::NotEq).to(BinaryOp::NotEq),
                    just(Token::LessOrEqual).to(BinaryOp::LessOrEqual),
                    just(Token::GreaterOrEqual).to(BinaryOp::GreaterOrEqual),
                    just(Token::Less).to(BinaryOp::Less),
                    just(Token::Greater).to(BinaryOp::Greater),
                ))
                .then(sum)
                .or_not(),
            )
            .map(|(lhs, rest)| match rest {
                Some((op, rhs)) => binary(op, lhs, rhs),
                None => lhs,
            })
            .boxed();

        let conjunction = comparison
            .clone()
            .foldl(
                just(Token::AndAnd)
                    .to(BinaryOp::And)
                    .then(comparison)
                    .repeated(),
                |lhs, (op, rhs)| binary(op, lhs, rhs),
            )
            .boxed();

        conjunction
            .clone()
            .foldl(
                just(Token::OrOr)
                    .to(BinaryOp::Or)
                    .then(conjunction)
                    .repeated(),
                |lhs, (op, rhs)| binary(op, lhs, rhs),
            )
            .boxed()
    })
}
