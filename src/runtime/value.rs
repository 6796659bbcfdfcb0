//! Runtime value representation and rendering.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::parser::Expr;
use crate::runtime::Env;

/// A cons cell. Both slots are mutable in place (`set-car!` / `set-cdr!`)
/// and the cell is shared through every alias of the pair.
#[derive(Debug)]
pub struct PairCell {
    /// First slot
    pub car: RefCell<Value>,
    /// Second slot
    pub cdr: RefCell<Value>,
}

/// A user procedure: parameter names and a body closed over the
/// environment that was current when the lambda evaluated. Later `set!`s
/// on captured cells are visible inside the closure.
#[derive(Debug)]
pub struct Procedure {
    /// Parameter names
    pub params: Vec<String>,
    /// Body expression
    pub body: Rc<Expr>,
    /// Captured environment
    pub env: Env,
}

/// Runtime value representation
#[derive(Debug, Clone)]
pub enum Value {
    /// Result of side-effecting operations
    Void,
    /// Host integer
    Integer(i64),
    /// Numerator and strictly positive denominator; never reduced,
    /// `4/2` stays `4/2`
    Rational(i64, i64),
    /// Boolean
    Boolean(bool),
    /// Symbol, compared by name
    Symbol(String),
    /// String; reference-counted so aliases are `eq?` by identity
    Str(Rc<String>),
    /// The unique empty list
    Null,
    /// Heap pair, shared and mutable through all aliases
    Pair(Rc<PairCell>),
    /// Closure
    Procedure(Rc<Procedure>),
    /// Sentinel produced only by `exit`; flows upward until the driver
    /// observes it and never lands in a binding or pair
    Terminate,
}

impl Value {
    /// Allocates a fresh pair
    pub fn cons(car: Value, cdr: Value) -> Value {
        Value::Pair(Rc::new(PairCell {
            car: RefCell::new(car),
            cdr: RefCell::new(cdr),
        }))
    }

    /// Allocates a string value
    pub fn string(s: impl Into<String>) -> Value {
        Value::Str(Rc::new(s.into()))
    }

    /// Type name for diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Void => "void",
            Value::Integer(_) => "integer",
            Value::Rational(..) => "rational",
            Value::Boolean(_) => "boolean",
            Value::Symbol(_) => "symbol",
            Value::Str(_) => "string",
            Value::Null => "null",
            Value::Pair(_) => "pair",
            Value::Procedure(_) => "procedure",
            Value::Terminate => "terminate",
        }
    }

    /// Only the literal false is falsy; every other value, including `()`,
    /// `0` and `""`, is truthy
    pub fn is_false(&self) -> bool {
        matches!(self, Value::Boolean(false))
    }
}

// Atoms compare structurally; pairs and procedures compare by heap
// identity. Language-level `eq?` (numeric equality across the
// integer/rational split) lives in the evaluator.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Void, Value::Void)
            | (Value::Null, Value::Null)
            | (Value::Terminate, Value::Terminate) => true,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Rational(an, ad), Value::Rational(bn, bd)) => an == bn && ad == bd,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Pair(a), Value::Pair(b)) => Rc::ptr_eq(a, b),
            (Value::Procedure(a), Value::Procedure(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Void => write!(f, "#<void>"),
            Value::Integer(n) => write!(f, "{n}"),
            // an integer-valued rational renders as a plain integer
            Value::Rational(n, 1) => write!(f, "{n}"),
            Value::Rational(n, d) => write!(f, "{n}/{d}"),
            Value::Boolean(true) => write!(f, "#t"),
            Value::Boolean(false) => write!(f, "#f"),
            Value::Symbol(s) => write!(f, "{s}"),
            Value::Str(s) => write!(f, "\"{s}\""),
            Value::Null => write!(f, "()"),
            Value::Pair(pair) => {
                write!(f, "({}", pair.car.borrow())?;
                fmt_cdr(&pair.cdr.borrow(), f)
            }
            Value::Procedure(_) => write!(f, "#<procedure>"),
            Value::Terminate => write!(f, "#<terminate>"),
        }
    }
}

/// Continues a pair rendering: `(a b c)` for proper lists,
/// `(a b . c)` for improper tails
fn fmt_cdr(value: &Value, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match value {
        Value::Null => write!(f, ")"),
        Value::Pair(pair) => {
            write!(f, " {}", pair.car.borrow())?;
            fmt_cdr(&pair.cdr.borrow(), f)
        }
        other => write!(f, " . {other})"),
    }
}
