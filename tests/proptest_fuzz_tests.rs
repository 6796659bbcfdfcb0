//! Property-based tests for the reader, parser and evaluator.
//!
//! These verify that:
//! 1. The reader never panics on arbitrary input
//! 2. The whole pipeline handles token soup gracefully (errors, not panics)
//! 3. Interpreted arithmetic agrees with host arithmetic on safe ranges

use std::io::Cursor;

use proptest::prelude::*;
use schemer::{eval, lower, Env, Reader, Result, Value};

/// Reads and evaluates every form; any error is fine, panics are not
fn run_pipeline(source: &str) -> Result<Value> {
    let mut reader = Reader::new(Cursor::new(source));
    let mut env = Env::empty();
    let mut last = Value::Void;
    while let Some(form) = reader.read_syntax()? {
        let expr = lower(&form, &env)?;
        last = eval(&expr, &mut env)?;
        if matches!(last, Value::Terminate) {
            break;
        }
    }
    Ok(last)
}

fn eval_to_string(source: &str) -> String {
    run_pipeline(source)
        .unwrap_or_else(|e| panic!("evaluation failed for {source}: {e}"))
        .to_string()
}

/// Tokens that look like S-expression elements
fn sexp_token() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("(".to_string()),
        Just(")".to_string()),
        Just("[".to_string()),
        Just("]".to_string()),
        Just("'".to_string()),
        Just(".".to_string()),
        // special forms
        Just("define".to_string()),
        Just("lambda".to_string()),
        Just("let".to_string()),
        Just("letrec".to_string()),
        Just("if".to_string()),
        Just("cond".to_string()),
        Just("else".to_string()),
        Just("begin".to_string()),
        Just("quote".to_string()),
        Just("set!".to_string()),
        // operators
        Just("+".to_string()),
        Just("-".to_string()),
        Just("*".to_string()),
        Just("/".to_string()),
        Just("=".to_string()),
        Just("<".to_string()),
        Just("cons".to_string()),
        Just("car".to_string()),
        Just("cdr".to_string()),
        Just("list".to_string()),
        Just("and".to_string()),
        Just("or".to_string()),
        Just("#t".to_string()),
        Just("#f".to_string()),
        // atoms
        (-1000i64..1000i64).prop_map(|n| n.to_string()),
        (1i64..100i64, 1i64..100i64).prop_map(|(n, d)| format!("{n}/{d}")),
        prop::string::string_regex("[a-z]{1,6}").unwrap(),
        Just("\"str\"".to_string()),
    ]
}

proptest! {
    #[test]
    fn reader_never_panics_on_arbitrary_input(source in r"[\x00-\x7F]{0,300}") {
        let mut reader = Reader::new(Cursor::new(source));
        // errors are fine; each call consumes input, so this terminates
        for _ in 0..1000 {
            match reader.read_syntax() {
                Ok(None) => break,
                Ok(Some(_)) | Err(_) => {}
            }
        }
    }

    #[test]
    fn pipeline_never_panics_on_token_soup(
        tokens in prop::collection::vec(sexp_token(), 0..40)
    ) {
        let source = tokens.join(" ");
        let _ = run_pipeline(&source);
    }

    #[test]
    fn addition_agrees_with_host(a in -10_000i64..10_000, b in -10_000i64..10_000) {
        prop_assert_eq!(eval_to_string(&format!("(+ {a} {b})")), (a + b).to_string());
    }

    #[test]
    fn multiplication_agrees_with_host(a in -1000i64..1000, b in -1000i64..1000) {
        prop_assert_eq!(eval_to_string(&format!("(* {a} {b})")), (a * b).to_string());
    }

    #[test]
    fn subtraction_agrees_with_host(a in -10_000i64..10_000, b in -10_000i64..10_000) {
        prop_assert_eq!(eval_to_string(&format!("(- {a} {b})")), (a - b).to_string());
    }

    #[test]
    fn comparisons_agree_with_host(a in -1000i64..1000, b in -1000i64..1000) {
        prop_assert_eq!(eval_to_string(&format!("(< {a} {b})")),
                        if a < b { "#t" } else { "#f" });
        prop_assert_eq!(eval_to_string(&format!("(= {a} {b})")),
                        if a == b { "#t" } else { "#f" });
    }

    #[test]
    fn rational_comparison_matches_cross_multiplication(
        an in -100i64..100, ad in 1i64..100,
        bn in -100i64..100, bd in 1i64..100,
    ) {
        let expected = if an * bd < bn * ad { "#t" } else { "#f" };
        prop_assert_eq!(eval_to_string(&format!("(< {an}/{ad} {bn}/{bd})")), expected);
    }

    #[test]
    fn expt_agrees_with_host_on_safe_range(base in -9i64..9, exp in 0u32..15) {
        prop_assume!(!(base == 0 && exp == 0));
        let expected = base.pow(exp).to_string();
        prop_assert_eq!(eval_to_string(&format!("(expt {base} {exp})")), expected);
    }

    #[test]
    fn quote_then_render_round_trips_flat_int_lists(
        items in prop::collection::vec(-100i64..100, 0..8)
    ) {
        let joined = items.iter().map(|n| n.to_string()).collect::<Vec<_>>().join(" ");
        prop_assert_eq!(eval_to_string(&format!("'({joined})")), format!("({joined})"));
    }
}
