//! Evaluation of directive expressions against a context stack

use thiserror::Error;

use crate::context::ContextStack;
use crate::expr::ast::{BinaryOp, Expr, Span, Spanned, UnaryOp};
use crate::expr::Value;

/// Reasons an expression failed to produce a value at runtime
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("unresolved identifier '{name}'")]
    UnresolvedIdentifier { name: String, span: Span },

    #[error("no member '{member}' on {found}")]
    InvalidMember {
        member: String,
        found: &'static str,
        span: Span,
    },

    #[error("index {index} is out of range for list of length {len}")]
    IndexOutOfRange { index: String, len: usize, span: Span },

    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
        span: Span,
    },

    #[error("division by zero")]
    DivisionByZero { span: Span },
}

impl EvalError {
    fn mismatch(expected: &'static str, found: &Value, span: &Span) -> Self {
        EvalError::TypeMismatch {
            expected,
            found: found.type_name(),
            span: span.clone(),
        }
    }

    /// Source span of the failing sub-expression
    pub fn span(&self) -> &Span {
        match self {
            EvalError::UnresolvedIdentifier { span, .. }
            | EvalError::InvalidMember { span, .. }
            | EvalError::IndexOutOfRange { span, .. }
            | EvalError::TypeMismatch { span, .. }
            | EvalError::DivisionByZero { span } => span,
        }
    }
}

/// Strictly evaluate an expression
pub fn evaluate(expr: &Spanned<Expr>, ctx: &ContextStack) -> Result<Value, EvalError> {
    match &expr.node {
        Expr::Null => Ok(Value::Null),
        Expr::Bool(b) => Ok(Value::Bool(*b)),
        Expr::Number(n) => Ok(Value::Number(*n)),
        Expr::String(s) => Ok(Value::String(s.clone())),
        Expr::List(items) => items
            .iter()
            .map(|item| evaluate(item, ctx))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::List),
        Expr::Ident(name) => ctx
            .get(name)
            .cloned()
            .ok_or_else(|| EvalError::UnresolvedIdentifier {
                name: name.clone(),
                span: expr.span.clone(),
            }),
        Expr::Member { target, name } => {
            let base = evaluate(target, ctx)?;
            member(&base, name, &expr.span)
        }
        Expr::Index { target, index } => {
            let base = evaluate(target, ctx)?;
            let key = evaluate(index, ctx)?;
            index_into(&base, &key, &expr.span)
        }
        Expr::Unary { op, operand } => {
            let value = evaluate(operand, ctx)?;
            match op {
                UnaryOp::Neg => match value {
                    Value::Number(n) => Ok(Value::Number(-n)),
                    other => Err(EvalError::mismatch("number", &other, &operand.span)),
                },
                UnaryOp::Not => match value {
                    Value::Bool(b) => Ok(Value::Bool(!b)),
                    other => Err(EvalError::mismatch("boolean", &other, &operand.span)),
                },
            }
        }
        Expr::Binary { op, lhs, rhs } => binary(*op, lhs, rhs, ctx),
    }
}

fn member(base: &Value, name: &str, span: &Span) -> Result<Value, EvalError> {
    match (base, name) {
        (Value::Map(entries), _) if entries.contains_key(name) => Ok(entries[name].clone()),
        (Value::List(items), "length") => Ok(Value::Number(items.len() as f64)),
        (Value::String(s), "length") => Ok(Value::Number(s.chars().count() as f64)),
        _ => Err(EvalError::InvalidMember {
            member: name.to_string(),
            found: base.type_name(),
            span: span.clone(),
        }),
    }
}

fn index_into(base: &Value, key: &Value, span: &Span) -> Result<Value, EvalError> {
    match (base, key) {
        (Value::List(items), Value::Number(n)) => {
            if n.fract() != 0.0 || *n < 0.0 || *n as usize >= items.len() {
                return Err(EvalError::IndexOutOfRange {
                    index: key.to_string(),
                    len: items.len(),
                    span: span.clone(),
                });
            }
            Ok(items[*n as usize].clone())
        }
        (Value::Map(_), Value::String(name)) => member(base, name, span),
        (Value::List(_), other) => Err(EvalError::mismatch("number", other, span)),
        (Value::Map(_), other) => Err(EvalError::mismatch("string", other, span)),
        (other, _) => Err(EvalError::mismatch("list or map", other, span)),
    }
}

fn binary(
    op: BinaryOp,
    lhs: &Spanned<Expr>,
    rhs: &Spanned<Expr>,
    ctx: &ContextStack,
) -> Result<Value, EvalError> {
    // Logical operators short-circuit before the right side is touched
    if matches!(op, BinaryOp::And | BinaryOp::Or) {
        let left = expect_bool(evaluate(lhs, ctx)?, &lhs.span)?;
        return match (op, left) {
            (BinaryOp::And, false) => Ok(Value::Bool(false)),
            (BinaryOp::Or, true) => Ok(Value::Bool(true)),
            _ => Ok(Value::Bool(expect_bool(evaluate(rhs, ctx)?, &rhs.span)?)),
        };
    }

    let left = evaluate(lhs, ctx)?;
    let right = evaluate(rhs, ctx)?;
    let span = lhs.span.start..rhs.span.end;

    match op {
        BinaryOp::Eq => Ok(Value::Bool(left == right)),
        BinaryOp::NotEq => Ok(Value::Bool(left != right)),
        BinaryOp::Less | BinaryOp::LessOrEqual | BinaryOp::Greater | BinaryOp::GreaterOrEqual => {
            let ordering = match (&left, &right) {
                (Value::Number(a), Value::Number(b)) => a.partial_cmp(b),
                (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
                (Value::Number(_), other) | (Value::String(_), other) => {
                    return Err(EvalError::mismatch(left.type_name(), other, &rhs.span))
                }
                (other, _) => return Err(EvalError::mismatch("number or string", other, &lhs.span)),
            };
            let result = match ordering {
                Some(ord) => match op {
                    BinaryOp::Less => ord.is_lt(),
                    BinaryOp::LessOrEqual => ord.is_le(),
                    BinaryOp::Greater => ord.is_gt(),
                    _ => ord.is_ge(),
                },
                // NaN compares false against everything
                None => false,
            };
            Ok(Value::Bool(result))
        }
        BinaryOp::Add => match (&left, &right) {
            (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
            (Value::String(_), _) | (_, Value::String(_)) => {
                Ok(Value::String(format!("{}{}", left, right)))
            }
            (Value::Number(_), other) => Err(EvalError::mismatch("number", other, &rhs.span)),
            (other, _) => Err(EvalError::mismatch("number", other, &lhs.span)),
        },
        BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => {
            let a = expect_number(&left, &lhs.span)?;
            let b = expect_number(&right, &rhs.span)?;
            match op {
                BinaryOp::Sub => Ok(Value::Number(a - b)),
                BinaryOp::Mul => Ok(Value::Number(a * b)),
                _ if b == 0.0 => Err(EvalError::DivisionByZero { span }),
                BinaryOp::Div => Ok(Value::Number(a / b)),
                _ => Ok(Value::Number(a % b)),
            }
        }
        BinaryOp::And | BinaryOp::Or => unreachable!("handled above"),
    }
}

fn expect_bool(value: Value, span: &Span) -> Result<bool, EvalError> {
    match value {
        Value::Bool(b) => Ok(b),
        other => Err(EvalError::mismatch("boolean", &other, span)),
    }
}

fn expect_number(value: &Value, span: &Span) -> Result<f64, EvalError> {
    match value {
        Value::Number(n) => Ok(*n),
        other => Err(EvalError::mismatch("number", other, span)),
    }
}

/// Evaluate without failing; `None` when the expression could not resolve
pub fn try_evaluate(expr: &Spanned<Expr>, ctx: &ContextStack) -> Option<Value> {
    evaluate(expr, ctx).ok()
}

/// Strictly evaluate an expression that must produce a boolean
pub fn evaluate_bool(expr: &Spanned<Expr>, ctx: &ContextStack) -> Result<bool, EvalError> {
    expect_bool(evaluate(expr, ctx)?, &expr.span)
}

/// Boolean view that never fails; `None` for errors and non-boolean results
pub fn try_evaluate_bool(expr: &Spanned<Expr>, ctx: &ContextStack) -> Option<bool> {
    evaluate_bool(expr, ctx).ok()
}

/// Evaluate a loop source into its iteration values.
///
/// A failed evaluation, `null` or a non-iterable result yields zero
/// iterations rather than an error.
pub fn evaluate_iterable(expr: &Spanned<Expr>, ctx: &ContextStack) -> Vec<Value> {
    match evaluate(expr, ctx) {
        Ok(value) => value.iteration_items(),
        Err(err) => {
            log::debug!("loop source resolved to nothing: {}", err);
            Vec::new()
        }
    }
}
