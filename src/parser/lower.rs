//! Lowering: read syntax plus environment in, expression tree out.
//!
//! The decision "is this head a user binding, a primitive, or a special
//! form?" is made here, against the environment at parse time. A name bound
//! in the environment always wins, which is what makes user bindings shadow
//! built-ins. Names introduced by a surrounding `lambda`, `define`, `let` or
//! `letrec` take part in that check through placeholder bindings that exist
//! only while the enclosed forms are parsed.

use std::rc::Rc;

use phf::phf_map;

use super::ast::{BinaryOp, Expr, UnaryOp, VariadicOp};
use crate::error::{Error, Result};
use crate::lexer::Syntax;
use crate::runtime::{Env, Value};

/// A name in the fixed built-in operator table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
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
    /// `car`
    Car,
    /// `cdr`
    Cdr,
    /// `list`
    List,
    /// `set-car!`
    SetCar,
    /// `set-cdr!`
    SetCdr,
    /// `not`
    Not,
    /// `and`
    And,
    /// `or`
    Or,
    /// `eq?`
    IsEq,
    /// `boolean?`
    IsBoolean,
    /// `number?`
    IsNumber,
    /// `null?`
    IsNull,
    /// `pair?`
    IsPair,
    /// `procedure?`
    IsProcedure,
    /// `symbol?`
    IsSymbol,
    /// `list?`
    IsList,
    /// `string?`
    IsString,
    /// `display`
    Display,
    /// `void`
    Void,
    /// `exit`
    Exit,
}

/// Built-in operator names
static PRIMITIVES: phf::Map<&'static str, Primitive> = phf_map! {
    // arithmetic
    "+" => Primitive::Add,
    "-" => Primitive::Sub,
    "*" => Primitive::Mul,
    "/" => Primitive::Div,
    "modulo" => Primitive::Modulo,
    "expt" => Primitive::Expt,
    // comparisons
    "<" => Primitive::Less,
    "<=" => Primitive::LessEq,
    "=" => Primitive::NumEq,
    ">=" => Primitive::GreaterEq,
    ">" => Primitive::Greater,
    // lists
    "cons" => Primitive::Cons,
    "car" => Primitive::Car,
    "cdr" => Primitive::Cdr,
    "list" => Primitive::List,
    "set-car!" => Primitive::SetCar,
    "set-cdr!" => Primitive::SetCdr,
    // logic
    "not" => Primitive::Not,
    "and" => Primitive::And,
    "or" => Primitive::Or,
    // predicates
    "eq?" => Primitive::IsEq,
    "boolean?" => Primitive::IsBoolean,
    "number?" => Primitive::IsNumber,
    "null?" => Primitive::IsNull,
    "pair?" => Primitive::IsPair,
    "procedure?" => Primitive::IsProcedure,
    "symbol?" => Primitive::IsSymbol,
    "list?" => Primitive::IsList,
    "string?" => Primitive::IsString,
    // i/o
    "display" => Primitive::Display,
    // special values and control
    "void" => Primitive::Void,
    "exit" => Primitive::Exit,
};

#[derive(Debug, Clone, Copy)]
enum SpecialForm {
    Begin,
    Quote,
    If,
    Cond,
    Lambda,
    Define,
    Let,
    Letrec,
    Set,
}

/// Special form (reserved word) names
static SPECIAL_FORMS: phf::Map<&'static str, SpecialForm> = phf_map! {
    "begin" => SpecialForm::Begin,
    "quote" => SpecialForm::Quote,
    "if" => SpecialForm::If,
    "cond" => SpecialForm::Cond,
    "lambda" => SpecialForm::Lambda,
    "define" => SpecialForm::Define,
    "let" => SpecialForm::Let,
    "letrec" => SpecialForm::Letrec,
    "set!" => SpecialForm::Set,
};

/// Looks up a name in the built-in operator table.
/// The evaluator uses this to lift bare primitive references into closures.
pub fn primitive(name: &str) -> Option<Primitive> {
    PRIMITIVES.get(name).copied()
}

/// Lowers a syntax tree to an expression against the current environment
pub fn lower(stx: &Syntax, env: &Env) -> Result<Expr> {
    match stx {
        Syntax::Integer(n) => Ok(Expr::Integer(*n)),
        Syntax::Rational(num, den) => Ok(Expr::Rational(*num, *den)),
        Syntax::Boolean(b) => Ok(Expr::Boolean(*b)),
        Syntax::Str(s) => Ok(Expr::Str(s.clone())),
        // a lone symbol is always a variable reference; primitives resolve
        // in operator position only (or at evaluation time when unbound)
        Syntax::Symbol(s) => Ok(Expr::Var(s.clone())),
        Syntax::List(items) => lower_list(items, env),
    }
}

fn lower_each(items: &[Syntax], env: &Env) -> Result<Vec<Expr>> {
    items.iter().map(|item| lower(item, env)).collect()
}

fn lower_list(items: &[Syntax], env: &Env) -> Result<Expr> {
    let Some((head, rands)) = items.split_first() else {
        // () is sugar for (quote ())
        return Ok(Expr::Quote(Syntax::List(Vec::new())));
    };

    let Syntax::Symbol(op) = head else {
        return Ok(Expr::Apply {
            rator: Rc::new(lower(head, env)?),
            rands: lower_each(rands, env)?,
        });
    };

    // A binding in scope shadows primitives and special forms alike
    if env.find(op).is_some() {
        return Ok(Expr::Apply {
            rator: Rc::new(Expr::Var(op.clone())),
            rands: lower_each(rands, env)?,
        });
    }

    if let Some(prim) = primitive(op) {
        return lower_primitive(prim, rands, env);
    }

    if let Some(form) = SPECIAL_FORMS.get(op) {
        return lower_special(*form, items, env);
    }

    // unbound and unknown: an application of the variable, so the
    // unbound-variable error surfaces at evaluation time
    Ok(Expr::Apply {
        rator: Rc::new(Expr::Var(op.clone())),
        rands: lower_each(rands, env)?,
    })
}

/// Two arguments fuse to the binary node; any other count goes variadic
fn pair_arity(bin: BinaryOp, var: VariadicOp, args: Vec<Expr>) -> Expr {
    match <[Expr; 2]>::try_from(args) {
        Ok([a, b]) => Expr::Binary(bin, Rc::new(a), Rc::new(b)),
        Err(args) => Expr::Variadic(var, args),
    }
}

fn fixed1(op: UnaryOp, args: Vec<Expr>, form: &'static str) -> Result<Expr> {
    match <[Expr; 1]>::try_from(args) {
        Ok([a]) => Ok(Expr::Unary(op, Rc::new(a))),
        Err(_) => Err(Error::ParseArity { form }),
    }
}

fn fixed2(op: BinaryOp, args: Vec<Expr>, form: &'static str) -> Result<Expr> {
    match <[Expr; 2]>::try_from(args) {
        Ok([a, b]) => Ok(Expr::Binary(op, Rc::new(a), Rc::new(b))),
        Err(_) => Err(Error::ParseArity { form }),
    }
}

fn lower_primitive(prim: Primitive, rands: &[Syntax], env: &Env) -> Result<Expr> {
    use Primitive as P;

    let args = lower_each(rands, env)?;
    match prim {
        P::Add => Ok(pair_arity(BinaryOp::Add, VariadicOp::Add, args)),
        P::Mul => Ok(pair_arity(BinaryOp::Mul, VariadicOp::Mul, args)),
        P::Sub => {
            if args.is_empty() {
                return Err(Error::ParseArity { form: "-" });
            }
            Ok(pair_arity(BinaryOp::Sub, VariadicOp::Sub, args))
        }
        P::Div => {
            if args.is_empty() {
                return Err(Error::ParseArity { form: "/" });
            }
            Ok(pair_arity(BinaryOp::Div, VariadicOp::Div, args))
        }
        P::Modulo => fixed2(BinaryOp::Modulo, args, "modulo"),
        P::Expt => fixed2(BinaryOp::Expt, args, "expt"),

        P::Less => comparison(BinaryOp::Less, VariadicOp::Less, args, "<"),
        P::LessEq => comparison(BinaryOp::LessEq, VariadicOp::LessEq, args, "<="),
        P::NumEq => comparison(BinaryOp::NumEq, VariadicOp::NumEq, args, "="),
        P::GreaterEq => comparison(BinaryOp::GreaterEq, VariadicOp::GreaterEq, args, ">="),
        P::Greater => comparison(BinaryOp::Greater, VariadicOp::Greater, args, ">"),

        P::List => Ok(Expr::Variadic(VariadicOp::List, args)),
        P::Cons => fixed2(BinaryOp::Cons, args, "cons"),
        P::Car => fixed1(UnaryOp::Car, args, "car"),
        P::Cdr => fixed1(UnaryOp::Cdr, args, "cdr"),
        P::SetCar => fixed2(BinaryOp::SetCar, args, "set-car!"),
        P::SetCdr => fixed2(BinaryOp::SetCdr, args, "set-cdr!"),

        P::And => Ok(Expr::And(args)),
        P::Or => Ok(Expr::Or(args)),
        P::Not => fixed1(UnaryOp::Not, args, "not"),

        P::IsEq => fixed2(BinaryOp::IsEq, args, "eq?"),
        P::IsBoolean => fixed1(UnaryOp::IsBoolean, args, "boolean?"),
        P::IsNumber => fixed1(UnaryOp::IsNumber, args, "number?"),
        P::IsNull => fixed1(UnaryOp::IsNull, args, "null?"),
        P::IsPair => fixed1(UnaryOp::IsPair, args, "pair?"),
        P::IsProcedure => fixed1(UnaryOp::IsProcedure, args, "procedure?"),
        P::IsSymbol => fixed1(UnaryOp::IsSymbol, args, "symbol?"),
        P::IsList => fixed1(UnaryOp::IsList, args, "list?"),
        P::IsString => fixed1(UnaryOp::IsString, args, "string?"),

        P::Display => fixed1(UnaryOp::Display, args, "display"),

        P::Void => {
            if !args.is_empty() {
                return Err(Error::ParseArity { form: "void" });
            }
            Ok(Expr::Void)
        }
        P::Exit => {
            if !args.is_empty() {
                return Err(Error::ParseArity { form: "exit" });
            }
            Ok(Expr::Exit)
        }
    }
}

/// Comparisons need at least two operands
fn comparison(
    bin: BinaryOp,
    var: VariadicOp,
    args: Vec<Expr>,
    form: &'static str,
) -> Result<Expr> {
    if args.len() < 2 {
        return Err(Error::ParseArity { form });
    }
    Ok(pair_arity(bin, var, args))
}

/// Wraps a multi-expression body in `begin`. `body` is non-empty.
fn lower_body(body: &[Syntax], env: &Env) -> Result<Expr> {
    let exprs = lower_each(body, env)?;
    match <[Expr; 1]>::try_from(exprs) {
        Ok([expr]) => Ok(expr),
        Err(exprs) => Ok(Expr::Begin(exprs)),
    }
}

fn symbol_name(stx: &Syntax, form: &'static str, what: &str) -> Result<String> {
    match stx {
        Syntax::Symbol(s) => Ok(s.clone()),
        _ => Err(Error::shape(form, format!("{what} must be a symbol"))),
    }
}

fn check_distinct(params: &[String], form: &'static str) -> Result<()> {
    for (i, param) in params.iter().enumerate() {
        if params[..i].contains(param) {
            return Err(Error::shape(form, format!("duplicate parameter {param}")));
        }
    }
    Ok(())
}

/// Extends the parse scope with placeholder bindings for `names`.
/// The value is irrelevant; the binding exists so the shadowing check
/// answers "bound" while the enclosed forms are parsed.
fn placeholder_scope<'a>(env: &Env, names: impl IntoIterator<Item = &'a String>) -> Env {
    let mut scope = env.clone();
    for name in names {
        scope = scope.extend(name.clone(), Value::Void);
    }
    scope
}

/// Parses a `let`/`letrec` binding list into name/initialiser syntax pairs
fn binding_pairs<'a>(stx: &'a Syntax, form: &'static str) -> Result<Vec<(String, &'a Syntax)>> {
    let Syntax::List(binds) = stx else {
        return Err(Error::shape(form, "expected a binding list"));
    };
    let mut pairs = Vec::with_capacity(binds.len());
    for bind in binds {
        let Syntax::List(kv) = bind else {
            return Err(Error::shape(form, "binding must be a (name value) pair"));
        };
        let [name, init] = kv.as_slice() else {
            return Err(Error::shape(form, "binding must be a (name value) pair"));
        };
        pairs.push((symbol_name(name, form, "bound name")?, init));
    }
    Ok(pairs)
}

fn lower_special(form: SpecialForm, items: &[Syntax], env: &Env) -> Result<Expr> {
    match form {
        SpecialForm::Begin => Ok(Expr::Begin(lower_each(&items[1..], env)?)),

        SpecialForm::Quote => {
            let [_, quoted] = items else {
                return Err(Error::ParseArity { form: "quote" });
            };
            Ok(Expr::Quote(quoted.clone()))
        }

        SpecialForm::If => {
            let [_, cond, conseq, alter] = items else {
                return Err(Error::ParseArity { form: "if" });
            };
            Ok(Expr::If {
                cond: Rc::new(lower(cond, env)?),
                conseq: Rc::new(lower(conseq, env)?),
                alter: Rc::new(lower(alter, env)?),
            })
        }

        SpecialForm::Cond => {
            let clauses = &items[1..];
            if clauses.is_empty() {
                return Err(Error::ParseArity { form: "cond" });
            }
            let mut lowered = Vec::with_capacity(clauses.len());
            for clause in clauses {
                let Syntax::List(exprs) = clause else {
                    return Err(Error::shape("cond", "clause must be a non-empty list"));
                };
                if exprs.is_empty() {
                    return Err(Error::shape("cond", "clause must be a non-empty list"));
                }
                lowered.push(lower_each(exprs, env)?);
            }
            Ok(Expr::Cond(lowered))
        }

        SpecialForm::Lambda => {
            if items.len() < 3 {
                return Err(Error::ParseArity { form: "lambda" });
            }
            let Syntax::List(param_stx) = &items[1] else {
                return Err(Error::shape("lambda", "expected a parameter list"));
            };
            let params = param_stx
                .iter()
                .map(|p| symbol_name(p, "lambda", "parameter"))
                .collect::<Result<Vec<_>>>()?;
            check_distinct(&params, "lambda")?;
            let scope = placeholder_scope(env, &params);
            let body = lower_body(&items[2..], &scope)?;
            Ok(Expr::Lambda {
                params,
                body: Rc::new(body),
            })
        }

        SpecialForm::Define => {
            if items.len() < 3 {
                return Err(Error::ParseArity { form: "define" });
            }
            match &items[1] {
                // function sugar: (define (name p...) body...)
                Syntax::List(sig) => {
                    let Some((name_stx, param_stx)) = sig.split_first() else {
                        return Err(Error::shape("define", "empty function signature"));
                    };
                    let name = symbol_name(name_stx, "define", "function name")?;
                    let params = param_stx
                        .iter()
                        .map(|p| symbol_name(p, "define", "parameter"))
                        .collect::<Result<Vec<_>>>()?;
                    check_distinct(&params, "define")?;
                    // the function name itself is visible in the body
                    let scope =
                        placeholder_scope(env, std::iter::once(&name).chain(&params));
                    let body = lower_body(&items[2..], &scope)?;
                    Ok(Expr::Define {
                        name,
                        rhs: Rc::new(Expr::Lambda {
                            params,
                            body: Rc::new(body),
                        }),
                    })
                }
                _ => {
                    let name = symbol_name(&items[1], "define", "variable name")?;
                    // extra right-hand expressions wrap in begin
                    let rhs = lower_body(&items[2..], env)?;
                    Ok(Expr::Define {
                        name,
                        rhs: Rc::new(rhs),
                    })
                }
            }
        }

        SpecialForm::Let => {
            if items.len() < 3 {
                return Err(Error::ParseArity { form: "let" });
            }
            let pairs = binding_pairs(&items[1], "let")?;
            // right-hand sides see the outer scope only
            let mut bindings = Vec::with_capacity(pairs.len());
            for (name, init) in &pairs {
                bindings.push((name.clone(), lower(init, env)?));
            }
            let scope = placeholder_scope(env, pairs.iter().map(|(name, _)| name));
            let body = lower_body(&items[2..], &scope)?;
            Ok(Expr::Let {
                bindings,
                body: Rc::new(body),
            })
        }

        SpecialForm::Letrec => {
            if items.len() < 3 {
                return Err(Error::ParseArity { form: "letrec" });
            }
            let pairs = binding_pairs(&items[1], "letrec")?;
            // every bound name is visible to every right-hand side
            let scope = placeholder_scope(env, pairs.iter().map(|(name, _)| name));
            let mut bindings = Vec::with_capacity(pairs.len());
            for (name, init) in &pairs {
                bindings.push((name.clone(), lower(init, &scope)?));
            }
            let body = lower_body(&items[2..], &scope)?;
            Ok(Expr::Letrec {
                bindings,
                body: Rc::new(body),
            })
        }

        SpecialForm::Set => {
            let [_, name, rhs] = items else {
                return Err(Error::ParseArity { form: "set!" });
            };
            Ok(Expr::Set {
                name: symbol_name(name, "set!", "variable name")?,
                rhs: Rc::new(lower(rhs, env)?),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    use crate::lexer::Reader;

    fn parse(source: &str) -> Result<Expr> {
        parse_in(source, &Env::empty())
    }

    fn parse_in(source: &str, env: &Env) -> Result<Expr> {
        let mut reader = Reader::new(Cursor::new(source));
        let form = reader.read_syntax().unwrap().unwrap();
        lower(&form, env)
    }

    #[test]
    fn test_two_argument_calls_fuse_to_binary() {
        assert!(matches!(
            parse("(+ 1 2)").unwrap(),
            Expr::Binary(BinaryOp::Add, _, _)
        ));
        assert!(matches!(
            parse("(< 1 2)").unwrap(),
            Expr::Binary(BinaryOp::Less, _, _)
        ));
    }

    #[test]
    fn test_other_arities_go_variadic() {
        assert!(matches!(
            parse("(+ 1 2 3)").unwrap(),
            Expr::Variadic(VariadicOp::Add, _)
        ));
        assert!(matches!(
            parse("(+)").unwrap(),
            Expr::Variadic(VariadicOp::Add, args) if args.is_empty()
        ));
        assert!(matches!(
            parse("(- 5)").unwrap(),
            Expr::Variadic(VariadicOp::Sub, _)
        ));
    }

    #[test]
    fn test_arity_errors_at_parse_time() {
        assert_eq!(parse("(-)"), Err(Error::ParseArity { form: "-" }));
        assert_eq!(parse("(/)"), Err(Error::ParseArity { form: "/" }));
        assert_eq!(parse("(< 1)"), Err(Error::ParseArity { form: "<" }));
        assert_eq!(parse("(car 1 2)"), Err(Error::ParseArity { form: "car" }));
        assert_eq!(parse("(cons 1)"), Err(Error::ParseArity { form: "cons" }));
        assert_eq!(parse("(if 1 2)"), Err(Error::ParseArity { form: "if" }));
        assert_eq!(parse("(void 1)"), Err(Error::ParseArity { form: "void" }));
        assert_eq!(
            parse("(modulo 1 2 3)"),
            Err(Error::ParseArity { form: "modulo" })
        );
    }

    #[test]
    fn test_bound_name_shadows_primitive() {
        let env = Env::empty().extend("+", Value::Integer(1));
        assert!(matches!(parse_in("(+ 1 2)", &env).unwrap(), Expr::Apply { .. }));
        // and shadows special forms too
        let env = Env::empty().extend("if", Value::Integer(1));
        assert!(matches!(
            parse_in("(if 1 2)", &env).unwrap(),
            Expr::Apply { .. }
        ));
    }

    #[test]
    fn test_lambda_parameters_shadow_in_body() {
        // the parameter + makes the body (+ 1 2) an application, not the
        // built-in addition
        let Expr::Lambda { body, .. } = parse("(lambda (+) (+ 1 2))").unwrap() else {
            panic!("expected lambda");
        };
        assert!(matches!(body.as_ref(), Expr::Apply { .. }));
    }

    #[test]
    fn test_letrec_names_visible_in_right_hand_sides() {
        let Expr::Letrec { bindings, .. } =
            parse("(letrec ((f (lambda (n) (g n))) (g (lambda (n) (f n)))) (f 1))").unwrap()
        else {
            panic!("expected letrec");
        };
        assert_eq!(bindings.len(), 2);
    }

    #[test]
    fn test_let_bound_name_shadows_primitive_in_body_only() {
        // `car` is rebound by the let, so the body call is an application;
        // the right-hand side still lowers to the built-in car
        let Expr::Let { bindings, body } =
            parse("(let ((car (car '(1 2)))) (car 9))").unwrap()
        else {
            panic!("expected let");
        };
        assert!(matches!(&bindings[0].1, Expr::Unary(UnaryOp::Car, _)));
        assert!(matches!(body.as_ref(), Expr::Apply { .. }));
    }

    #[test]
    fn test_define_sugar() {
        let Expr::Define { name, rhs } = parse("(define (id x) x)").unwrap() else {
            panic!("expected define");
        };
        assert_eq!(name, "id");
        assert!(matches!(rhs.as_ref(), Expr::Lambda { .. }));
    }

    #[test]
    fn test_define_recursive_sugar_sees_own_name() {
        // fact is placeholder-bound while the body parses, so the recursive
        // call is an application of the variable fact
        assert!(parse("(define (fact n) (if (= n 0) 1 (* n (fact (- n 1)))))").is_ok());
    }

    #[test]
    fn test_define_extra_expressions_wrap_in_begin() {
        let Expr::Define { rhs, .. } = parse("(define x 1 2 3)").unwrap() else {
            panic!("expected define");
        };
        assert!(matches!(rhs.as_ref(), Expr::Begin(es) if es.len() == 3));
    }

    #[test]
    fn test_duplicate_parameters_rejected() {
        assert!(matches!(
            parse("(lambda (x x) x)"),
            Err(Error::ParseShape { form: "lambda", .. })
        ));
        assert!(matches!(
            parse("(define (f a a) a)"),
            Err(Error::ParseShape { form: "define", .. })
        ));
    }

    #[test]
    fn test_bad_shapes_rejected() {
        assert!(parse("(lambda (1) 1)").is_err());
        assert!(parse("(let ((1 2)) 1)").is_err());
        assert!(parse("(let (x 1) x)").is_err());
        assert!(parse("(set! 1 2)").is_err());
        assert!(parse("(cond)").is_err());
        assert!(parse("(cond ())").is_err());
        assert!(parse("(cond else)").is_err());
    }

    #[test]
    fn test_empty_list_is_quoted_null() {
        assert!(matches!(
            parse("()").unwrap(),
            Expr::Quote(Syntax::List(items)) if items.is_empty()
        ));
    }

    #[test]
    fn test_unknown_head_is_an_application() {
        assert!(matches!(parse("(frob 1 2)").unwrap(), Expr::Apply { .. }));
    }

    #[test]
    fn test_non_symbol_head_is_an_application() {
        assert!(matches!(
            parse("((lambda (x) x) 1)").unwrap(),
            Expr::Apply { .. }
        ));
    }

    #[test]
    fn test_multi_body_wraps_in_begin() {
        let Expr::Lambda { body, .. } = parse("(lambda (x) 1 x)").unwrap() else {
            panic!("expected lambda");
        };
        assert!(matches!(body.as_ref(), Expr::Begin(es) if es.len() == 2));
    }

    #[test]
    fn test_and_or_lower_to_short_circuit_forms() {
        assert!(matches!(parse("(and 1 2)").unwrap(), Expr::And(_)));
        assert!(matches!(parse("(or)").unwrap(), Expr::Or(args) if args.is_empty()));
    }

    #[test]
    fn test_cond_else_clause_keeps_variable() {
        let Expr::Cond(clauses) = parse("(cond ((= 1 2) 'a) (else 'b))").unwrap() else {
            panic!("expected cond");
        };
        assert!(matches!(&clauses[1][0], Expr::Var(name) if name == "else"));
    }
}
