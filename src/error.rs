//! Error types for the interpreter.

use thiserror::Error;

/// Interpreter errors.
///
/// Every failure in the pipeline is one of these variants. The REPL driver
/// collapses all of them into a single `RuntimeError` diagnostic line; the
/// variants exist so that library callers, logs and tests can tell failure
/// modes apart.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // Reader errors
    /// Malformed input at the character level
    ///
    /// **Triggered by:** unterminated strings, stray closing delimiters,
    /// integer tokens that exceed the host integer range
    #[error("Syntax error: {0}")]
    SyntaxError(String),

    /// Input ended in the middle of a form
    #[error("Unexpected end of input")]
    UnexpectedEof,

    // Parse errors
    /// Wrong number of operands for a built-in or special form
    ///
    /// **Triggered by:** `(-)`, `(car a b)`, `(if c t)`
    #[error("Wrong number of arguments for {form}")]
    ParseArity {
        /// Name of the operator or special form
        form: &'static str,
    },

    /// Structurally malformed special form
    ///
    /// **Triggered by:** a non-symbol parameter, a bad binding list,
    /// a `cond` clause that is not a non-empty list
    #[error("Malformed {form}: {message}")]
    ParseShape {
        /// Name of the special form
        form: &'static str,
        /// What was wrong with it
        message: String,
    },

    // Runtime errors
    /// Reference to a name with no binding and no primitive of that name
    #[error("Undefined variable: {0}")]
    UndefinedVariable(String),

    /// Operator position evaluated to something that is not a procedure
    #[error("Attempt to apply a non-procedure: {0}")]
    NotCallable(&'static str),

    /// Argument count did not match the procedure's parameter list
    #[error("Wrong number of arguments: expected {expected}, got {got}")]
    WrongArgumentCount {
        /// Parameter count of the procedure
        expected: usize,
        /// Arguments supplied at the call site
        got: usize,
    },

    /// Operation applied to a value of the wrong type
    ///
    /// **Triggered by:** `(car 1)`, `(+ 'a 1)`, `(modulo 1/2 2)`
    #[error("Type error: expected {expected}, got {got}")]
    TypeError {
        /// Expected type description
        expected: &'static str,
        /// Actual type name
        got: &'static str,
    },

    /// Division or modulo by zero
    #[error("Division by zero")]
    DivisionByZero,

    /// Arithmetically ill-defined input: negative exponent, `0^0`
    #[error("Domain error: {0}")]
    DomainError(&'static str),

    /// Fixed-width integer arithmetic overflowed
    #[error("Integer overflow in {0}")]
    Overflow(&'static str),

    /// Quoted form that does not denote a value (bad dotted list)
    #[error("Bad quoted form: {0}")]
    BadQuotedForm(&'static str),
}

impl Error {
    /// Create a syntax error with a message
    pub fn syntax(msg: impl Into<String>) -> Self {
        Error::SyntaxError(msg.into())
    }

    /// Create a parse-shape error for a named form
    pub fn shape(form: &'static str, msg: impl Into<String>) -> Self {
        Error::ParseShape {
            form,
            message: msg.into(),
        }
    }
}

/// Result type for interpreter operations
pub type Result<T> = std::result::Result<T, Error>;
