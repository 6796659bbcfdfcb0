//! Parsing for the interpreter
//!
//! Lowers read syntax trees into evaluable expression trees. Lowering takes
//! the current environment so that bindings in scope shadow built-in
//! operators and special forms.

mod ast;
mod lower;

pub use ast::{BinaryOp, Expr, UnaryOp, VariadicOp};
pub use lower::{lower, primitive, Primitive};
