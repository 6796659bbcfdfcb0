//! Expression trees produced by the parser.
//!
//! The parser lowers read syntax into this tagged union. Built-in operator
//! calls are resolved at parse time: a call site with exactly two arguments
//! becomes a [`Expr::Binary`] node (the direct path), any other arity goes
//! through the [`Expr::Variadic`] node, and fixed-arity operators get their
//! own unary/binary nodes with the count checked up front.

use std::rc::Rc;

use crate::lexer::Syntax;

/// Built-in operators of exactly one argument
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// `car`
    Car,
    /// `cdr`
    Cdr,
    /// `not`
    Not,
    /// `boolean?`
    IsBoolean,
    /// `number?` (integer or rational)
    IsNumber,
    /// `null?`
    IsNull,
    /// `pair?`
    IsPair,
    /// `procedure?`
    IsProcedure,
    /// `symbol?`
    IsSymbol,
    /// `string?`
    IsString,
    /// `list?` (proper lists only)
    IsList,
    /// `display`
    Display,
}

/// Built-in operators of exactly two arguments.
///
/// For `+`, `-` and friends this is the fused fast path a two-argument call
/// site lowers to; `modulo`, `expt`, `cons`, the mutators and `eq?` only
/// exist in this arity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `modulo`
    Modulo,
    /// `expt`
    Expt,
    /// `<`
    Less,
    /// `<=`
    LessEq,
    /// `=`
    NumEq,
    /// `>=`
    GreaterEq,
    /// `>`
    Greater,
    /// `cons`
    Cons,
    /// `set-car!`
    SetCar,
    /// `set-cdr!`
    SetCdr,
    /// `eq?`
    IsEq,
}

/// Built-in operators over an argument vector of any length.
///
/// Arithmetic and comparison call sites with an arity other than two lower
/// to these; `list` always does. `And` and `Or` appear here only as the
/// body of auto-lifted closures, where the operands are already values --
/// the source-level forms lower to [`Expr::And`] / [`Expr::Or`], which must
/// not pre-evaluate their operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariadicOp {
    /// `+` (empty sum is 0)
    Add,
    /// `-` (one argument negates; zero arguments is a parse error)
    Sub,
    /// `*` (empty product is 1)
    Mul,
    /// `/` (one argument takes the reciprocal; zero arguments is a parse error)
    Div,
    /// `<` chained over adjacent pairs
    Less,
    /// `<=`
    LessEq,
    /// `=`
    NumEq,
    /// `>=`
    GreaterEq,
    /// `>`
    Greater,
    /// `list`
    List,
    /// `and` over already-evaluated values
    And,
    /// `or` over already-evaluated values
    Or,
}

impl VariadicOp {
    /// Source-level spelling, for diagnostics
    pub fn name(self) -> &'static str {
        match self {
            VariadicOp::Add => "+",
            VariadicOp::Sub => "-",
            VariadicOp::Mul => "*",
            VariadicOp::Div => "/",
            VariadicOp::Less => "<",
            VariadicOp::LessEq => "<=",
            VariadicOp::NumEq => "=",
            VariadicOp::GreaterEq => ">=",
            VariadicOp::Greater => ">",
            VariadicOp::List => "list",
            VariadicOp::And => "and",
            VariadicOp::Or => "or",
        }
    }
}

/// An evaluable expression
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Integer literal
    Integer(i64),
    /// Rational literal (numerator, positive denominator)
    Rational(i64, i64),
    /// Boolean literal
    Boolean(bool),
    /// String literal
    Str(String),
    /// Variable reference
    Var(String),
    /// Quotation holding the raw syntax tree
    Quote(Syntax),
    /// `(void)`
    Void,
    /// `(exit)` -- produces the terminate sentinel
    Exit,
    /// Fixed-arity built-in, one operand
    Unary(UnaryOp, Rc<Expr>),
    /// Two-operand built-in (fused fast path or fixed arity)
    Binary(BinaryOp, Rc<Expr>, Rc<Expr>),
    /// Built-in over an operand vector
    Variadic(VariadicOp, Vec<Expr>),
    /// Short-circuiting `and`
    And(Vec<Expr>),
    /// Short-circuiting `or`
    Or(Vec<Expr>),
    /// Two-armed conditional
    If {
        /// Condition; only the literal false selects the alternative
        cond: Rc<Expr>,
        /// Taken on any non-false condition
        conseq: Rc<Expr>,
        /// Taken on `#f`
        alter: Rc<Expr>,
    },
    /// Clause list; each clause is test followed by body expressions.
    /// An `else` clause keeps its leading `Var("else")` reference.
    Cond(Vec<Vec<Expr>>),
    /// Expression sequence (possibly empty); adjacent `define`s inside it
    /// evaluate as one batch
    Begin(Vec<Expr>),
    /// Lambda abstraction
    Lambda {
        /// Parameter names, distinct
        params: Vec<String>,
        /// Body (multi-expression bodies are pre-wrapped in `Begin`)
        body: Rc<Expr>,
    },
    /// Application of an arbitrary operator expression
    Apply {
        /// Operator position
        rator: Rc<Expr>,
        /// Operands, evaluated left to right
        rands: Vec<Expr>,
    },
    /// Definition; at the top level and inside `begin` these batch together
    Define {
        /// Name being bound
        name: String,
        /// Initialiser
        rhs: Rc<Expr>,
    },
    /// Assignment to an existing binding
    Set {
        /// Name being assigned
        name: String,
        /// New value expression
        rhs: Rc<Expr>,
    },
    /// `let`: right-hand sides evaluate in the outer scope
    Let {
        /// Ordered binding pairs
        bindings: Vec<(String, Expr)>,
        /// Body
        body: Rc<Expr>,
    },
    /// `letrec`: bound names are visible to every right-hand side
    Letrec {
        /// Ordered binding pairs
        bindings: Vec<(String, Expr)>,
        /// Body
        body: Rc<Expr>,
    },
}
