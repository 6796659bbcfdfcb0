//! Expression evaluation.
//!
//! A structural recursion over [`Expr`]: literals return the corresponding
//! value, variables look up the environment (falling back to auto-lifted
//! primitive closures), applications evaluate operator and operands and
//! dispatch, and each special form implements its own rule. The numeric
//! tower lifts integers to rationals, operates on cross-multiplied
//! components with checked 64-bit arithmetic, and never reduces results.

use std::cmp::Ordering;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::lexer::Syntax;
use crate::parser::{primitive, BinaryOp, Expr, Primitive, UnaryOp, VariadicOp};
use crate::runtime::{Env, Procedure, Value};

/// Unwraps an evaluation result, returning early when it is the terminate
/// sentinel. `exit` works at any depth because every operand position
/// re-raises the sentinel instead of operating on it.
macro_rules! propagate {
    ($e:expr) => {{
        let value = $e?;
        if matches!(value, Value::Terminate) {
            return Ok(value);
        }
        value
    }};
}

/// Evaluates an expression in an environment.
///
/// The environment is taken by mutable reference because `define` extends
/// the caller's scope chain in place: a definition evaluated inside a
/// `begin` (or at the top level) is visible to every following expression
/// in the same sequence.
pub fn eval(expr: &Expr, env: &mut Env) -> Result<Value> {
    match expr {
        Expr::Integer(n) => Ok(Value::Integer(*n)),
        Expr::Rational(num, den) => Ok(Value::Rational(*num, *den)),
        Expr::Boolean(b) => Ok(Value::Boolean(*b)),
        Expr::Str(s) => Ok(Value::string(s.clone())),
        Expr::Var(name) => eval_var(name, env),
        Expr::Quote(stx) => quote_value(stx),
        Expr::Void => Ok(Value::Void),
        Expr::Exit => Ok(Value::Terminate),

        Expr::Unary(op, rand) => {
            let v = propagate!(eval(rand, env));
            apply_unary(*op, v)
        }
        Expr::Binary(op, a, b) => {
            let va = propagate!(eval(a, env));
            let vb = propagate!(eval(b, env));
            apply_binary(*op, va, vb)
        }
        Expr::Variadic(op, rands) => {
            let mut args = Vec::with_capacity(rands.len());
            for rand in rands {
                args.push(propagate!(eval(rand, env)));
            }
            apply_variadic(*op, &args)
        }

        Expr::And(rands) => eval_and(rands, env),
        Expr::Or(rands) => eval_or(rands, env),

        Expr::If {
            cond,
            conseq,
            alter,
        } => {
            if propagate!(eval(cond, env)).is_false() {
                eval(alter, env)
            } else {
                eval(conseq, env)
            }
        }
        Expr::Cond(clauses) => eval_cond(clauses, env),
        Expr::Begin(exprs) => eval_begin(exprs, env),

        Expr::Lambda { params, body } => Ok(Value::Procedure(Rc::new(Procedure {
            params: params.clone(),
            body: Rc::clone(body),
            env: env.clone(),
        }))),
        Expr::Apply { rator, rands } => eval_apply(rator, rands, env),

        Expr::Define { name, rhs } => {
            if env.find(name).is_none() {
                *env = env.extend(name.as_str(), Value::Void);
            }
            let value = propagate!(eval(rhs, env));
            env.modify(name, value);
            Ok(Value::Void)
        }
        Expr::Set { name, rhs } => {
            if env.find(name).is_none() {
                return Err(Error::UndefinedVariable(name.clone()));
            }
            let value = propagate!(eval(rhs, env));
            env.modify(name, value);
            Ok(Value::Void)
        }

        Expr::Let { bindings, body } => {
            // right-hand sides evaluate in the outer environment
            let mut values = Vec::with_capacity(bindings.len());
            for (_, rhs) in bindings {
                values.push(propagate!(eval(rhs, env)));
            }
            let mut inner = env.clone();
            for ((name, _), value) in bindings.iter().zip(values) {
                inner = inner.extend(name.as_str(), value);
            }
            eval(body, &mut inner)
        }
        Expr::Letrec { bindings, body } => {
            // bind every name to void first so the right-hand sides can
            // refer to each other
            let mut inner = env.clone();
            for (name, _) in bindings {
                inner = inner.extend(name.as_str(), Value::Void);
            }
            for (name, rhs) in bindings {
                let value = propagate!(eval(rhs, &mut inner));
                inner.modify(name, value);
            }
            eval(body, &mut inner)
        }
    }
}

/// Batches adjacent definitions so their right-hand sides share one scope.
///
/// Both the `begin` evaluator and the driver defer a run of adjacent
/// `define`s, pre-bind each name to void, then evaluate the right-hand
/// sides in order and assign them back — that shared scope is what makes
/// adjacent definitions mutually recursive. The batching lives here so the
/// two callers cannot drift apart.
#[derive(Default)]
pub struct DefineBatch {
    pending: Vec<(String, Rc<Expr>)>,
}

impl DefineBatch {
    /// Defers a definition
    pub fn push(&mut self, name: String, rhs: Rc<Expr>) {
        self.pending.push((name, rhs));
    }

    /// Discards deferred definitions (driver error recovery)
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// Evaluates the deferred definitions in `env`.
    ///
    /// Names without an existing binding are pre-bound to void; an existing
    /// binding keeps its cell, so redefinition stays visible to closures
    /// that captured it. Returns void, or the terminate sentinel if a
    /// right-hand side produced it (the sentinel is never bound). The batch
    /// is consumed even on error; a failed definition is not retried.
    pub fn flush(&mut self, env: &mut Env) -> Result<Value> {
        let pending = std::mem::take(&mut self.pending);
        if pending.is_empty() {
            return Ok(Value::Void);
        }
        debug!(count = pending.len(), "evaluating definition batch");
        for (name, _) in &pending {
            if env.find(name).is_none() {
                *env = env.extend(name.as_str(), Value::Void);
            }
        }
        for (name, rhs) in &pending {
            let value = propagate!(eval(rhs, env));
            env.modify(name, value);
        }
        Ok(Value::Void)
    }
}

fn eval_begin(exprs: &[Expr], env: &mut Env) -> Result<Value> {
    let mut batch = DefineBatch::default();
    let mut last = Value::Void;
    for expr in exprs {
        if let Expr::Define { name, rhs } = expr {
            batch.push(name.clone(), Rc::clone(rhs));
            continue;
        }
        propagate!(batch.flush(env));
        last = propagate!(eval(expr, env));
    }
    propagate!(batch.flush(env));
    Ok(last)
}

fn eval_var(name: &str, env: &mut Env) -> Result<Value> {
    if let Some(value) = env.find(name) {
        return Ok(value);
    }
    match primitive(name) {
        Some(prim) => Ok(lift_primitive(prim, env)),
        None => Err(Error::UndefinedVariable(name.to_string())),
    }
}

/// Materialises a closure for a bare primitive reference (`(map + ...)`
/// style usage). Fixed-arity primitives get matching parameters applied to
/// their operator node; variadic-capable primitives get the bare variadic
/// node, which the application path dispatches to directly.
fn lift_primitive(prim: Primitive, env: &Env) -> Value {
    use Primitive as P;

    fn unary(op: UnaryOp) -> (Vec<String>, Expr) {
        (
            vec!["x".into()],
            Expr::Unary(op, Rc::new(Expr::Var("x".into()))),
        )
    }
    fn binary(op: BinaryOp) -> (Vec<String>, Expr) {
        (
            vec!["a".into(), "b".into()],
            Expr::Binary(
                op,
                Rc::new(Expr::Var("a".into())),
                Rc::new(Expr::Var("b".into())),
            ),
        )
    }
    fn variadic(op: VariadicOp) -> (Vec<String>, Expr) {
        (Vec::new(), Expr::Variadic(op, Vec::new()))
    }

    let (params, body) = match prim {
        P::Void => (Vec::new(), Expr::Void),
        P::Exit => (Vec::new(), Expr::Exit),

        P::Car => unary(UnaryOp::Car),
        P::Cdr => unary(UnaryOp::Cdr),
        P::Not => unary(UnaryOp::Not),
        P::IsBoolean => unary(UnaryOp::IsBoolean),
        P::IsNumber => unary(UnaryOp::IsNumber),
        P::IsNull => unary(UnaryOp::IsNull),
        P::IsPair => unary(UnaryOp::IsPair),
        P::IsProcedure => unary(UnaryOp::IsProcedure),
        P::IsSymbol => unary(UnaryOp::IsSymbol),
        P::IsList => unary(UnaryOp::IsList),
        P::IsString => unary(UnaryOp::IsString),
        P::Display => unary(UnaryOp::Display),

        P::Modulo => binary(BinaryOp::Modulo),
        P::Expt => binary(BinaryOp::Expt),
        P::Cons => binary(BinaryOp::Cons),
        P::SetCar => binary(BinaryOp::SetCar),
        P::SetCdr => binary(BinaryOp::SetCdr),
        P::IsEq => binary(BinaryOp::IsEq),

        P::Add => variadic(VariadicOp::Add),
        P::Sub => variadic(VariadicOp::Sub),
        P::Mul => variadic(VariadicOp::Mul),
        P::Div => variadic(VariadicOp::Div),
        P::Less => variadic(VariadicOp::Less),
        P::LessEq => variadic(VariadicOp::LessEq),
        P::NumEq => variadic(VariadicOp::NumEq),
        P::GreaterEq => variadic(VariadicOp::GreaterEq),
        P::Greater => variadic(VariadicOp::Greater),
        P::List => variadic(VariadicOp::List),
        P::And => variadic(VariadicOp::And),
        P::Or => variadic(VariadicOp::Or),
    };

    Value::Procedure(Rc::new(Procedure {
        params,
        body: Rc::new(body),
        env: env.clone(),
    }))
}

fn eval_apply(rator: &Expr, rands: &[Expr], env: &mut Env) -> Result<Value> {
    let callee = propagate!(eval(rator, env));
    let Value::Procedure(proc) = &callee else {
        return Err(Error::NotCallable(callee.type_name()));
    };

    let mut args = Vec::with_capacity(rands.len());
    for rand in rands {
        args.push(propagate!(eval(rand, env)));
    }

    // A variadic operator body takes the argument values directly; this is
    // the calling convention of auto-lifted `+`, `list` and friends.
    if let Expr::Variadic(op, _) = proc.body.as_ref() {
        trace!(op = op.name(), argc = args.len(), "variadic dispatch");
        return apply_variadic(*op, &args);
    }

    if args.len() != proc.params.len() {
        return Err(Error::WrongArgumentCount {
            expected: proc.params.len(),
            got: args.len(),
        });
    }
    trace!(argc = args.len(), "applying procedure");
    let mut call_env = proc.env.clone();
    for (param, arg) in proc.params.iter().zip(args) {
        call_env = call_env.extend(param.as_str(), arg);
    }
    eval(&proc.body, &mut call_env)
}

fn eval_and(rands: &[Expr], env: &mut Env) -> Result<Value> {
    let mut last = Value::Boolean(true);
    for rand in rands {
        last = propagate!(eval(rand, env));
        if last.is_false() {
            return Ok(Value::Boolean(false));
        }
    }
    Ok(last)
}

fn eval_or(rands: &[Expr], env: &mut Env) -> Result<Value> {
    for rand in rands {
        let value = propagate!(eval(rand, env));
        if !value.is_false() {
            return Ok(value);
        }
    }
    Ok(Value::Boolean(false))
}

fn eval_cond(clauses: &[Vec<Expr>], env: &mut Env) -> Result<Value> {
    for clause in clauses {
        let Some((test, body)) = clause.split_first() else {
            continue;
        };
        // an else clause fires unconditionally; a test-only else yields void
        if matches!(test, Expr::Var(name) if name == "else") {
            return eval_clause_body(body, env, Value::Void);
        }
        let pred = propagate!(eval(test, env));
        if !pred.is_false() {
            // a test-only clause yields the test value itself
            return eval_clause_body(body, env, pred);
        }
    }
    Ok(Value::Void)
}

fn eval_clause_body(body: &[Expr], env: &mut Env, when_empty: Value) -> Result<Value> {
    let mut last = when_empty;
    for expr in body {
        last = propagate!(eval(expr, env));
    }
    Ok(last)
}

// ----------------------------------------------------------------------
// quotation
// ----------------------------------------------------------------------

/// Converts a quoted syntax tree back into a value. Lists become freshly
/// allocated proper lists unless a `.` symbol sits in the penultimate
/// position, in which case the final element is spliced in as the tail.
pub fn quote_value(stx: &Syntax) -> Result<Value> {
    match stx {
        Syntax::Integer(n) => Ok(Value::Integer(*n)),
        Syntax::Rational(num, den) => Ok(Value::Rational(*num, *den)),
        Syntax::Boolean(b) => Ok(Value::Boolean(*b)),
        Syntax::Str(s) => Ok(Value::string(s.clone())),
        Syntax::Symbol(s) => Ok(Value::Symbol(s.clone())),
        Syntax::List(items) => quote_list(items),
    }
}

fn quote_list(items: &[Syntax]) -> Result<Value> {
    let Some(dot) = items.iter().position(|item| item.is_symbol(".")) else {
        return items.iter().rev().try_fold(Value::Null, |tail, item| {
            Ok(Value::cons(quote_value(item)?, tail))
        });
    };
    if dot + 2 != items.len() || items[dot + 1].is_symbol(".") {
        return Err(Error::BadQuotedForm("misplaced dot"));
    }
    let tail = quote_value(&items[dot + 1])?;
    items[..dot].iter().rev().try_fold(tail, |cdr, item| {
        Ok(Value::cons(quote_value(item)?, cdr))
    })
}

// ----------------------------------------------------------------------
// the numeric tower
// ----------------------------------------------------------------------

/// Numerator/denominator view of a numeric value; integers lift to `n/1`
fn as_ratio(value: &Value) -> Result<(i64, i64)> {
    match value {
        Value::Integer(n) => Ok((*n, 1)),
        Value::Rational(num, den) => Ok((*num, *den)),
        other => Err(Error::TypeError {
            expected: "number",
            got: other.type_name(),
        }),
    }
}

/// A numeric operand that must be integer-valued: an integer, or a rational
/// whose denominator is 1
fn integer_operand(value: &Value) -> Result<i64> {
    match value {
        Value::Integer(n) => Ok(*n),
        Value::Rational(n, 1) => Ok(*n),
        other => Err(Error::TypeError {
            expected: "integer",
            got: other.type_name(),
        }),
    }
}

fn ck(value: Option<i64>, op: &'static str) -> Result<i64> {
    value.ok_or(Error::Overflow(op))
}

/// Builds a rational, normalising the denominator sign so the stored
/// denominator stays strictly positive
fn make_rational(num: i64, den: i64, op: &'static str) -> Result<Value> {
    if den < 0 {
        Ok(Value::Rational(
            ck(num.checked_neg(), op)?,
            ck(den.checked_neg(), op)?,
        ))
    } else {
        Ok(Value::Rational(num, den))
    }
}

fn num_add(a: &Value, b: &Value) -> Result<Value> {
    let (an, ad) = as_ratio(a)?;
    let (bn, bd) = as_ratio(b)?;
    let num = ck(
        ck(an.checked_mul(bd), "+")?.checked_add(ck(bn.checked_mul(ad), "+")?),
        "+",
    )?;
    make_rational(num, ck(ad.checked_mul(bd), "+")?, "+")
}

fn num_sub(a: &Value, b: &Value) -> Result<Value> {
    let (an, ad) = as_ratio(a)?;
    let (bn, bd) = as_ratio(b)?;
    let num = ck(
        ck(an.checked_mul(bd), "-")?.checked_sub(ck(bn.checked_mul(ad), "-")?),
        "-",
    )?;
    make_rational(num, ck(ad.checked_mul(bd), "-")?, "-")
}

fn num_mul(a: &Value, b: &Value) -> Result<Value> {
    let (an, ad) = as_ratio(a)?;
    let (bn, bd) = as_ratio(b)?;
    make_rational(
        ck(an.checked_mul(bn), "*")?,
        ck(ad.checked_mul(bd), "*")?,
        "*",
    )
}

fn num_div(a: &Value, b: &Value) -> Result<Value> {
    let (an, ad) = as_ratio(a)?;
    let (bn, bd) = as_ratio(b)?;
    if bn == 0 {
        return Err(Error::DivisionByZero);
    }
    make_rational(
        ck(an.checked_mul(bd), "/")?,
        ck(ad.checked_mul(bn), "/")?,
        "/",
    )
}

/// Cross-multiplied comparison; denominators are positive so the order is
/// preserved
fn compare_numeric(a: &Value, b: &Value) -> Result<Ordering> {
    let (an, ad) = as_ratio(a)?;
    let (bn, bd) = as_ratio(b)?;
    let left = ck(an.checked_mul(bd), "comparison")?;
    let right = ck(bn.checked_mul(ad), "comparison")?;
    Ok(left.cmp(&right))
}

fn modulo(a: &Value, b: &Value) -> Result<Value> {
    let lhs = integer_operand(a)?;
    let rhs = integer_operand(b)?;
    if rhs == 0 {
        return Err(Error::DivisionByZero);
    }
    Ok(Value::Integer(ck(lhs.checked_rem(rhs), "modulo")?))
}

fn expt(a: &Value, b: &Value) -> Result<Value> {
    let base = integer_operand(a)?;
    let exponent = integer_operand(b)?;
    if exponent < 0 {
        return Err(Error::DomainError("negative exponent"));
    }
    if base == 0 && exponent == 0 {
        return Err(Error::DomainError("0^0 is undefined"));
    }

    // exponentiation by squaring; the square is only computed while more
    // bits remain, so the final step cannot overflow spuriously
    let mut result: i64 = 1;
    let mut square = base;
    let mut exp = exponent;
    while exp > 0 {
        if exp % 2 == 1 {
            result = ck(result.checked_mul(square), "expt")?;
        }
        exp /= 2;
        if exp > 0 {
            square = ck(square.checked_mul(square), "expt")?;
        }
    }
    Ok(Value::Integer(result))
}

// ----------------------------------------------------------------------
// operator dispatch
// ----------------------------------------------------------------------

fn apply_unary(op: UnaryOp, v: Value) -> Result<Value> {
    match op {
        UnaryOp::Car => match &v {
            Value::Pair(pair) => Ok(pair.car.borrow().clone()),
            other => Err(Error::TypeError {
                expected: "pair",
                got: other.type_name(),
            }),
        },
        UnaryOp::Cdr => match &v {
            Value::Pair(pair) => Ok(pair.cdr.borrow().clone()),
            other => Err(Error::TypeError {
                expected: "pair",
                got: other.type_name(),
            }),
        },
        UnaryOp::Not => Ok(Value::Boolean(v.is_false())),
        UnaryOp::IsBoolean => Ok(Value::Boolean(matches!(v, Value::Boolean(_)))),
        UnaryOp::IsNumber => Ok(Value::Boolean(matches!(
            v,
            Value::Integer(_) | Value::Rational(..)
        ))),
        UnaryOp::IsNull => Ok(Value::Boolean(matches!(v, Value::Null))),
        UnaryOp::IsPair => Ok(Value::Boolean(matches!(v, Value::Pair(_)))),
        UnaryOp::IsProcedure => Ok(Value::Boolean(matches!(v, Value::Procedure(_)))),
        UnaryOp::IsSymbol => Ok(Value::Boolean(matches!(v, Value::Symbol(_)))),
        UnaryOp::IsString => Ok(Value::Boolean(matches!(v, Value::Str(_)))),
        UnaryOp::IsList => Ok(Value::Boolean(is_proper_list(&v))),
        UnaryOp::Display => {
            print!("{v}");
            Ok(Value::Void)
        }
    }
}

fn apply_binary(op: BinaryOp, a: Value, b: Value) -> Result<Value> {
    match op {
        BinaryOp::Add => num_add(&a, &b),
        BinaryOp::Sub => num_sub(&a, &b),
        BinaryOp::Mul => num_mul(&a, &b),
        BinaryOp::Div => num_div(&a, &b),
        BinaryOp::Modulo => modulo(&a, &b),
        BinaryOp::Expt => expt(&a, &b),

        BinaryOp::Less => Ok(Value::Boolean(compare_numeric(&a, &b)?.is_lt())),
        BinaryOp::LessEq => Ok(Value::Boolean(compare_numeric(&a, &b)?.is_le())),
        BinaryOp::NumEq => Ok(Value::Boolean(compare_numeric(&a, &b)?.is_eq())),
        BinaryOp::GreaterEq => Ok(Value::Boolean(compare_numeric(&a, &b)?.is_ge())),
        BinaryOp::Greater => Ok(Value::Boolean(compare_numeric(&a, &b)?.is_gt())),

        BinaryOp::Cons => Ok(Value::cons(a, b)),
        BinaryOp::SetCar => match &a {
            Value::Pair(pair) => {
                *pair.car.borrow_mut() = b;
                Ok(Value::Void)
            }
            other => Err(Error::TypeError {
                expected: "pair",
                got: other.type_name(),
            }),
        },
        BinaryOp::SetCdr => match &a {
            Value::Pair(pair) => {
                *pair.cdr.borrow_mut() = b;
                Ok(Value::Void)
            }
            other => Err(Error::TypeError {
                expected: "pair",
                got: other.type_name(),
            }),
        },

        BinaryOp::IsEq => Ok(Value::Boolean(values_eq(&a, &b)?)),
    }
}

/// Applies a variadic operator to an already-evaluated argument vector.
/// Reached from `Expr::Variadic` nodes and from applying auto-lifted
/// closures whose body is one.
pub(crate) fn apply_variadic(op: VariadicOp, args: &[Value]) -> Result<Value> {
    match op {
        VariadicOp::Add => {
            let Some((first, rest)) = args.split_first() else {
                return Ok(Value::Integer(0));
            };
            let (num, den) = as_ratio(first)?;
            let mut acc = Value::Rational(num, den);
            for v in rest {
                acc = num_add(&acc, v)?;
            }
            Ok(acc)
        }
        VariadicOp::Sub => {
            let Some((first, rest)) = args.split_first() else {
                return Err(Error::ParseArity { form: "-" });
            };
            let (num, den) = as_ratio(first)?;
            if rest.is_empty() {
                return Ok(Value::Rational(ck(num.checked_neg(), "-")?, den));
            }
            let mut acc = Value::Rational(num, den);
            for v in rest {
                acc = num_sub(&acc, v)?;
            }
            Ok(acc)
        }
        VariadicOp::Mul => {
            if args.is_empty() {
                return Ok(Value::Integer(1));
            }
            let mut acc = Value::Rational(1, 1);
            for v in args {
                acc = num_mul(&acc, v)?;
            }
            Ok(acc)
        }
        VariadicOp::Div => {
            let Some((first, rest)) = args.split_first() else {
                return Err(Error::ParseArity { form: "/" });
            };
            let (num, den) = as_ratio(first)?;
            if rest.is_empty() {
                if num == 0 {
                    return Err(Error::DivisionByZero);
                }
                return make_rational(den, num, "/");
            }
            let mut acc = Value::Rational(num, den);
            for v in rest {
                acc = num_div(&acc, v)?;
            }
            Ok(acc)
        }

        VariadicOp::Less => chain_compare(args, Ordering::is_lt),
        VariadicOp::LessEq => chain_compare(args, Ordering::is_le),
        VariadicOp::NumEq => chain_compare(args, Ordering::is_eq),
        VariadicOp::GreaterEq => chain_compare(args, Ordering::is_ge),
        VariadicOp::Greater => chain_compare(args, Ordering::is_gt),

        VariadicOp::List => Ok(args
            .iter()
            .rev()
            .fold(Value::Null, |tail, v| Value::cons(v.clone(), tail))),

        // operands are already values here, so folding loses nothing:
        // the short-circuiting forms are Expr::And / Expr::Or
        VariadicOp::And => {
            let mut last = Value::Boolean(true);
            for v in args {
                if v.is_false() {
                    return Ok(Value::Boolean(false));
                }
                last = v.clone();
            }
            Ok(last)
        }
        VariadicOp::Or => {
            for v in args {
                if !v.is_false() {
                    return Ok(v.clone());
                }
            }
            Ok(Value::Boolean(false))
        }
    }
}

/// Chained comparison over adjacent pairs; fewer than two arguments is
/// vacuously true
fn chain_compare(args: &[Value], pred: fn(Ordering) -> bool) -> Result<Value> {
    for pair in args.windows(2) {
        if !pred(compare_numeric(&pair[0], &pair[1])?) {
            return Ok(Value::Boolean(false));
        }
    }
    Ok(Value::Boolean(true))
}

/// `eq?`: numeric equality across the integer/rational split, booleans and
/// symbols by payload, null and void by kind, everything else by heap
/// identity — two independently constructed pairs are never `eq?`
fn values_eq(a: &Value, b: &Value) -> Result<bool> {
    use Value::*;
    Ok(match (a, b) {
        (Integer(_) | Rational(..), Integer(_) | Rational(..)) => {
            compare_numeric(a, b)?.is_eq()
        }
        (Boolean(x), Boolean(y)) => x == y,
        (Symbol(x), Symbol(y)) => x == y,
        (Null, Null) | (Void, Void) => true,
        (Str(x), Str(y)) => Rc::ptr_eq(x, y),
        (Pair(x), Pair(y)) => Rc::ptr_eq(x, y),
        (Procedure(x), Procedure(y)) => Rc::ptr_eq(x, y),
        _ => false,
    })
}

/// Proper lists end in null; anything else on the cdr spine disqualifies
fn is_proper_list(value: &Value) -> bool {
    let mut cur = value.clone();
    loop {
        match cur {
            Value::Null => return true,
            Value::Pair(pair) => {
                let next = pair.cdr.borrow().clone();
                cur = next;
            }
            _ => return false,
        }
    }
}
