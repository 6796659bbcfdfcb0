//! Read syntax trees.
//!
//! The reader produces `Syntax` nodes: atoms and lists. Nothing here knows
//! about special forms or built-ins; turning a syntax tree into an evaluable
//! expression is the parser's job, because that step needs the environment.

use crate::error::{Error, Result};

/// A node of the read syntax tree
#[derive(Debug, Clone, PartialEq)]
pub enum Syntax {
    /// Integer literal
    Integer(i64),
    /// Rational literal: numerator and strictly positive denominator
    Rational(i64, i64),
    /// Boolean literal (`#t` / `#f`)
    Boolean(bool),
    /// String literal (escapes already resolved)
    Str(String),
    /// Symbol (identifier)
    Symbol(String),
    /// Parenthesised sequence of forms
    List(Vec<Syntax>),
}

impl Syntax {
    /// True when this node is the symbol `name`
    pub fn is_symbol(&self, name: &str) -> bool {
        matches!(self, Syntax::Symbol(s) if s == name)
    }
}

/// Classifies a bare atom token.
///
/// `num/den` with integer `num` and positive integer `den` is a rational;
/// a signed digit sequence (but not `+` or `-` alone) is an integer;
/// `#t` / `#f` are booleans; everything else is a symbol. Tokens like `1/0`
/// or `1/-2` fall through to symbols.
///
/// The only failure is an integer-shaped token that exceeds the host
/// integer range.
pub(crate) fn classify_atom(token: &str) -> Result<Syntax> {
    match token {
        "#t" => return Ok(Syntax::Boolean(true)),
        "#f" => return Ok(Syntax::Boolean(false)),
        _ => {}
    }

    if let Some((num, den)) = token.split_once('/') {
        if is_integer_shaped(num) && is_integer_shaped(den) {
            let den = parse_integer(den)?;
            if den > 0 {
                return Ok(Syntax::Rational(parse_integer(num)?, den));
            }
        }
    }

    if is_integer_shaped(token) {
        return Ok(Syntax::Integer(parse_integer(token)?));
    }

    Ok(Syntax::Symbol(token.to_string()))
}

/// Optional sign followed by at least one digit
fn is_integer_shaped(s: &str) -> bool {
    let digits = s.strip_prefix(['+', '-']).unwrap_or(s);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

fn parse_integer(s: &str) -> Result<i64> {
    s.parse::<i64>()
        .map_err(|_| Error::syntax(format!("integer literal out of range: {s}")))
}
