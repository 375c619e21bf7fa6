//! Directive expression language
//!
//! Source text is lexed with logos, parsed with chumsky into a spanned AST,
//! and evaluated against a [`ContextStack`](crate::context::ContextStack).

pub mod ast;
pub mod eval;
pub mod grammar;
pub mod lexer;
pub mod value;

pub use ast::{Expr, LoopExpr, LoopPattern, Spanned};
pub use eval::{evaluate, evaluate_bool, evaluate_iterable, try_evaluate, try_evaluate_bool, EvalError};
pub use grammar::{parse_expression, parse_loop};
pub use value::Value;
