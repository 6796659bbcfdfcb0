//! The read–parse–evaluate–print driver loop.
//!
//! Reads one form at a time, lowers it against the global environment,
//! batches adjacent top-level definitions so they can be mutually
//! recursive, evaluates, and prints one line per form. Every failure
//! surfaces as the single diagnostic line `RuntimeError` and the loop
//! continues; the terminate sentinel (from `exit`) or end of input ends
//! the session.

use std::io::{self, BufRead, Write};

use tracing::debug;

use crate::error::Error;
use crate::lexer::{Reader, Syntax};
use crate::parser::{lower, Expr};
use crate::runtime::{eval, DefineBatch, Env, Value};

/// The prompt shown before each read on interactive input
const PROMPT: &str = "scm> ";

/// Driver configuration, resolved from the process environment
#[derive(Debug, Clone)]
pub struct ReplConfig {
    /// Print the prompt before each read
    pub interactive: bool,
}

impl ReplConfig {
    /// Reads configuration from the process environment. The prompt is
    /// suppressed when `ONLINE_JUDGE` is set, for batch input.
    pub fn from_env() -> Self {
        ReplConfig {
            interactive: std::env::var_os("ONLINE_JUDGE").is_none(),
        }
    }
}

/// The top-level driver loop, generic over its streams so tests can run it
/// against in-memory input and capture the output.
pub struct Repl<R, W> {
    reader: Reader<R>,
    out: W,
    config: ReplConfig,
    env: Env,
    pending: DefineBatch,
}

impl<R: BufRead, W: Write> Repl<R, W> {
    /// Creates a driver over an input and output stream
    pub fn new(input: R, out: W, config: ReplConfig) -> Self {
        Repl {
            reader: Reader::new(input),
            out,
            config,
            env: Env::empty(),
            pending: DefineBatch::default(),
        }
    }

    /// Runs the loop until `(exit)` or end of input
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            if self.config.interactive {
                write!(self.out, "{PROMPT}")?;
                self.out.flush()?;
            }
            match self.reader.read_syntax() {
                Ok(Some(form)) => {
                    if self.step(&form)? {
                        break;
                    }
                }
                Ok(None) => break,
                Err(err) => self.report(&err)?,
            }
        }
        Ok(())
    }

    /// Handles one top-level form. Returns `true` when the session should
    /// end (the terminate sentinel was observed).
    fn step(&mut self, form: &Syntax) -> io::Result<bool> {
        let expr = match lower(form, &self.env) {
            Ok(expr) => expr,
            Err(err) => {
                self.report(&err)?;
                return Ok(false);
            }
        };

        // Adjacent definitions evaluate together once a non-define form
        // arrives; the define's own implicit-void line prints right away.
        if let Expr::Define { name, rhs } = &expr {
            self.pending.push(name.clone(), rhs.clone());
            writeln!(self.out)?;
            return Ok(false);
        }

        match self.pending.flush(&mut self.env) {
            Ok(Value::Terminate) => return Ok(true),
            Ok(_) => {}
            Err(err) => {
                self.report(&err)?;
                return Ok(false);
            }
        }

        match eval(&expr, &mut self.env) {
            Ok(Value::Terminate) => Ok(true),
            Ok(value) => {
                self.print_value(&expr, &value)?;
                Ok(false)
            }
            Err(err) => {
                self.report(&err)?;
                Ok(false)
            }
        }
    }

    /// One line per form: the value's rendering, or an empty line for an
    /// implicit void result
    fn print_value(&mut self, expr: &Expr, value: &Value) -> io::Result<()> {
        if matches!(value, Value::Void) && !is_explicit_void_call(expr) {
            writeln!(self.out)
        } else {
            writeln!(self.out, "{value}")
        }
    }

    /// Single-line diagnostic; pending definitions are discarded with the
    /// rest of the failed form's state
    fn report(&mut self, err: &Error) -> io::Result<()> {
        debug!(%err, "surfacing RuntimeError");
        self.pending.clear();
        writeln!(self.out, "RuntimeError")
    }
}

/// Whether a void result came from a deliberate void producer: a direct
/// `void` call, or a `begin` / `if` / `cond` whose final position is one.
/// Those print `#<void>`; any other void prints an empty line.
fn is_explicit_void_call(expr: &Expr) -> bool {
    match expr {
        Expr::Void => true,
        Expr::Apply { rator, .. } => {
            matches!(rator.as_ref(), Expr::Var(name) if name == "void")
        }
        Expr::Begin(exprs) => exprs.last().is_some_and(is_explicit_void_call),
        Expr::If { conseq, alter, .. } => {
            is_explicit_void_call(conseq) || is_explicit_void_call(alter)
        }
        Expr::Cond(clauses) => clauses
            .iter()
            .any(|clause| clause.last().is_some_and(is_explicit_void_call)),
        _ => false,
    }
}
