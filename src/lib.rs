//! # Schemer - a small Scheme interpreter
//!
//! An interactive interpreter for a Scheme-family language: integers,
//! arbitrary-denominator rationals (kept unreduced), booleans, strings,
//! symbols, mutable pairs, first-class procedures with lexical closures,
//! and a fixed table of built-in operations and special forms. Expressions
//! read from the input stream are parsed against the live environment (so
//! user bindings shadow built-ins), evaluated, and printed one line per
//! form until `(exit)` or end of input.
//!
//! ## Quick Start
//!
//! ```rust
//! use schemer::{eval, lower, Env, Reader};
//! use std::io::Cursor;
//!
//! # fn main() -> schemer::Result<()> {
//! let mut reader = Reader::new(Cursor::new("(let ((x 3) (y 4)) (+ x y))"));
//! let form = reader.read_syntax()?.expect("one form");
//!
//! let mut env = Env::empty();
//! let expr = lower(&form, &env)?;
//! let value = eval(&expr, &mut env)?;
//!
//! assert_eq!(value.to_string(), "7");
//! # Ok(())
//! # }
//! ```
//!
//! Or drive the full loop the way the binary does:
//!
//! ```rust
//! use schemer::{Repl, ReplConfig};
//! use std::io::Cursor;
//!
//! let mut out = Vec::new();
//! let config = ReplConfig { interactive: false };
//! Repl::new(Cursor::new("(define x 21) (* x 2)"), &mut out, config)
//!     .run()
//!     .unwrap();
//! assert_eq!(String::from_utf8(out).unwrap(), "\n42\n");
//! ```
//!
//! ## Architecture
//!
//! A classic interpreter pipeline:
//!
//! ```text
//! characters → Reader → Syntax → lower(+ Env) → Expr → eval(+ Env) → Value
//! ```
//!
//! - [`Reader`] - streaming reader, one complete form per call
//! - [`lower`] - syntax-to-expression lowering; resolves primitive vs.
//!   special form vs. shadowed user binding against the environment
//! - [`eval`] - structural-recursion evaluator
//! - [`Env`] - persistent frame chain with shared mutable cells
//! - [`Value`] - runtime values, including mutable pairs and closures
//! - [`Repl`] - the read–parse–evaluate–print driver
//!
//! ## Language notes
//!
//! - Rationals are never reduced: `(/ 4 2)` is `4/2`. A rational with
//!   denominator 1 prints as a plain integer.
//! - Only `#f` is false; `()`, `0` and `""` are all truthy.
//! - `eq?` compares numbers across the integer/rational split and
//!   everything heap-allocated by identity.
//! - Arithmetic is checked 64-bit; overflow is reported as an error.
//! - Adjacent top-level definitions share a scope, so mutually recursive
//!   procedures need no `letrec` at the top level.

pub mod error;
pub mod lexer;
pub mod parser;
pub mod repl;
pub mod runtime;

pub use error::{Error, Result};
pub use lexer::{Reader, Syntax};
pub use parser::{lower, Expr};
pub use repl::{Repl, ReplConfig};
pub use runtime::{eval, DefineBatch, Env, Value};

/// Version of the interpreter
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
