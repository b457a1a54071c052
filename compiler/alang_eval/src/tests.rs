//! End-to-end interpreter scenarios and arithmetic properties.

#![allow(clippy::unwrap_used)]

use pretty_assertions::assert_eq;
use proptest::prelude::*;

use crate::test_helpers::{error, output, run, run_with, value};
use crate::{EvalConfig, EvalErrorKind};

fn lines(expected: &[&str]) -> Vec<String> {
    expected.iter().map(ToString::to_string).collect()
}

#[test]
fn print_sum() {
    assert_eq!(output("(print (+ 1 2 3))"), lines(&["6"]));
}

#[test]
fn recursive_factorial() {
    let source = "(defun fact (n) (if (<= n 1) 1 (* n (fact (- n 1))))) (print (fact 5))";
    assert_eq!(output(source), lines(&["120"]));
}

#[test]
fn print_quoted_list() {
    assert_eq!(output("(print '(1 2 3))"), lines(&["(1 2 3)"]));
}

#[test]
fn immediate_lambda_call() {
    assert_eq!(output("(print ((lambda (y) (+ y 5)) 7))"), lines(&["12"]));
}

#[test]
fn set_on_const_fails() {
    let kind = error("(const PI 314) (set PI 1)");
    assert!(kind.is_frozen_binding());
    assert_eq!(
        kind,
        EvalErrorKind::ImmutableBinding {
            name: "PI".to_string()
        }
    );
}

#[test]
fn const_twice_fails() {
    let kind = error("(const PI 314) (const PI 3)");
    assert!(kind.is_frozen_binding());
    assert!(matches!(kind, EvalErrorKind::DuplicateConst { .. }));
}

#[test]
fn chained_division() {
    assert_eq!(output("(print (/ 20 2 2))"), lines(&["5"]));
}

#[test]
fn while_counts_to_three() {
    let source = "(set x 0) (while (< x 3) (print x) (set x (+ x 1)))";
    assert_eq!(output(source), lines(&["0", "1", "2"]));
}

#[test]
fn closure_captures_by_value() {
    let source = "
        (set x 1)
        (set f (lambda () x))
        (set x 2)
        (print (f))";
    assert_eq!(output(source), lines(&["1"]));
}

#[test]
fn defun_captures_by_value() {
    let source = "
        (set base 10)
        (defun add-base (n) (+ n base))
        (set base 100)
        (print (add-base 1))";
    assert_eq!(output(source), lines(&["11"]));
}

#[test]
fn closure_outlives_call_scope() {
    let source = "
        (set make (lambda (k) (lambda (v) (* k v))))
        (set triple (make 3))
        (print (triple 7))";
    assert_eq!(output(source), lines(&["21"]));
}

#[test]
fn captured_const_stays_frozen() {
    let source = "(const k 1) (set f (lambda () (set k 2))) (f)";
    assert!(error(source).is_frozen_binding());
}

#[test]
fn arity_mismatch_named_and_anonymous() {
    assert_eq!(
        error("(defun f (a b) a) (f 1)"),
        EvalErrorKind::ArityMismatch {
            name: "f".to_string(),
            expected: 2,
            got: 1
        }
    );
    assert!(matches!(
        error("((lambda (a) a) 1 2)"),
        EvalErrorKind::ArityMismatch { expected: 1, got: 2, .. }
    ));
}

#[test]
fn arguments_evaluated_before_arity_check() {
    let outcome = run("(defun f (a) a) (f (print 1) (print 2))");
    assert_eq!(outcome.output, lines(&["1", "2"]));
    assert!(matches!(
        outcome.result,
        Err(ref e) if matches!(e.kind, EvalErrorKind::ArityMismatch { .. })
    ));
}

#[test]
fn sample_programs() {
    let source = "
        (defun inc (n) (+ n 1))
        (defun sum3 (a b c) (+ a b c))
        (defun fib (n) (if (< n 2) n (+ (fib (- n 1)) (fib (- n 2)))))
        (print (inc 41))
        (print (sum3 1 2 3))
        (print (fib 10))";
    assert_eq!(output(source), lines(&["42", "6", "55"]));
}

#[test]
fn print_renders_each_argument_on_its_own_line() {
    let source = "(print 1 \"two\" 'three '(a \"b\" (4)) (lambda (x) x) nil)";
    assert_eq!(
        output(source),
        lines(&["1", "two", "three", "(a b (4))", "#<function>", "()"])
    );
}

#[test]
fn program_result_is_last_value() {
    assert_eq!(value("(set x 4) (* x x)"), "16");
    assert_eq!(value(""), "()");
}

#[test]
fn let_bindings_are_parallel() {
    let source = "(set a 1) (let ((a 10) (b a)) (print a b))";
    assert_eq!(output(source), lines(&["10", "1"]));
}

#[test]
fn let_scope_is_popped() {
    let source = "(let ((tmp 5)) tmp) tmp";
    assert_eq!(
        error(source),
        EvalErrorKind::UndefinedVariable {
            name: "tmp".to_string()
        }
    );
}

#[test]
fn set_inside_function_reaches_global() {
    let source = "(defun bump () (set counter 7)) (bump) (print counter)";
    assert_eq!(output(source), lines(&["7"]));
}

#[test]
fn if_evaluates_only_taken_branch() {
    let source = "(if (> 2 1) (print \"yes\") (print \"no\"))";
    assert_eq!(output(source), lines(&["yes"]));
}

#[test]
fn condition_uses_truthiness_for_non_comparisons() {
    assert_eq!(output("(if nil (print 1) (print 2))"), lines(&["2"]));
    assert_eq!(output("(if \"\" (print 1) (print 2))"), lines(&["2"]));
    assert_eq!(output("(if '(0) (print 1) (print 2))"), lines(&["1"]));
}

#[test]
fn logic_forms_short_circuit() {
    assert_eq!(
        output("(print (and 1 0 (print \"never\")))"),
        lines(&["0"])
    );
    assert_eq!(output("(print (or 0 2 (print \"never\")))"), lines(&["1"]));
    assert_eq!(output("(print (not 0) (not '(1)))"), lines(&["1", "0"]));
    assert_eq!(output("(print (and) (or))"), lines(&["1", "0"]));
}

#[test]
fn comparison_coerces_numeric_strings() {
    assert_eq!(output("(if (= \"12\" 12) (print 1) (print 0))"), lines(&["1"]));
    assert_eq!(
        error("(if (< \"abc\" 1) 1 0)"),
        EvalErrorKind::NotNumeric {
            text: "abc".to_string()
        }
    );
    assert_eq!(
        error("(if (< 'a 1) 1 0)"),
        EvalErrorKind::NotAnInteger {
            type_name: "symbol"
        }
    );
}

#[test]
fn comparison_outside_condition_is_unknown_operator() {
    assert_eq!(
        error("(print (< 1 2))"),
        EvalErrorKind::UnknownOperator { op: "<" }
    );
}

#[test]
fn empty_list_is_unknown_form() {
    assert!(matches!(error("()"), EvalErrorKind::UnknownForm { .. }));
}

#[test]
fn undefined_names() {
    assert_eq!(
        error("(print y)"),
        EvalErrorKind::UndefinedVariable {
            name: "y".to_string()
        }
    );
    assert_eq!(
        error("(nope 1)"),
        EvalErrorKind::UndefinedFunction {
            name: "nope".to_string()
        }
    );
}

#[test]
fn calling_a_non_function() {
    assert_eq!(
        error("(set n 3) (n 1)"),
        EvalErrorKind::NotCallable {
            type_name: "integer"
        }
    );
    assert_eq!(
        error("(1 2)"),
        EvalErrorKind::NotCallable {
            type_name: "integer"
        }
    );
}

#[test]
fn operator_arity_errors() {
    assert!(matches!(
        error("(+ 1)"),
        EvalErrorKind::OperatorArity { op: "+", got: 1, .. }
    ));
    assert!(matches!(
        error("(/ 4)"),
        EvalErrorKind::OperatorArity { op: "/", got: 1, .. }
    ));
    assert!(matches!(
        error("(if (< 1) 1 0)"),
        EvalErrorKind::OperatorArity { op: "<", got: 1, .. }
    ));
    assert_eq!(output("(print (- 4))"), lines(&["-4"]));
}

#[test]
fn division_by_zero_checks_every_divisor() {
    assert_eq!(error("(/ 10 0)"), EvalErrorKind::DivisionByZero);
    assert_eq!(error("(/ 10 5 0)"), EvalErrorKind::DivisionByZero);
    let outcome = run("(/ 1 0 (print 9))");
    assert!(outcome.output.is_empty());
}

#[test]
fn division_error_points_at_divisor() {
    let err = run("(/ 10 0)").result.unwrap_err();
    assert_eq!(err.span, Some(alang_ir::Span::new(6, 7)));
}

#[test]
fn arithmetic_rejects_non_integers() {
    assert_eq!(
        error("(+ 1 '(2))"),
        EvalErrorKind::NotAnInteger { type_name: "list" }
    );
    assert_eq!(output("(print (+ \"4\" 1))"), lines(&["5"]));
}

#[test]
fn quote_forms_agree() {
    assert_eq!(
        output("(print 'x (quote x) '(a (b c)) (quote (a (b c))))"),
        lines(&["x", "x", "(a (b c))", "(a (b c))"])
    );
}

#[test]
fn nested_quote_renders_as_quote_list() {
    assert_eq!(output("(print ''a)"), lines(&["(quote a)"]));
}

#[test]
fn quote_does_not_evaluate() {
    assert_eq!(output("(print '(print 1))"), lines(&["(print 1)"]));
}

#[test]
fn while_guard_trips() {
    let outcome = run_with(
        "(set i 0) (while 1 (set i (+ i 1)))",
        EvalConfig {
            loop_limit: Some(50),
        },
    );
    assert_eq!(
        outcome.result.unwrap_err().kind,
        EvalErrorKind::LoopLimitExceeded { limit: 50 }
    );
}

#[test]
fn while_guard_reports_reached_limit() {
    let outcome = run_with(
        "(set i 0) (while (< i 3) (set i (+ i 1)))",
        EvalConfig {
            loop_limit: Some(3),
        },
    );
    assert_eq!(
        outcome.result.unwrap_err().to_string(),
        "loop reached the limit of 3 iterations"
    );
}

#[test]
fn defun_inside_function_is_visible_globally() {
    let source = "(defun g () 1) (defun h () (defun g () 2) 0) (h) (print (g))";
    assert_eq!(output(source), lines(&["2"]));
}

#[test]
fn defun_inside_function_reaches_caller_snapshot() {
    let source = "(defun g () 1) \
                  (defun swap () (defun g () 2) 0) \
                  (defun run () (swap) (g)) \
                  (print (run))";
    assert_eq!(output(source), lines(&["2"]));
}

#[test]
fn call_through_shadowing_local_fails() {
    assert_eq!(
        error("(defun f () 1) (let ((f 2)) (print (f)))"),
        EvalErrorKind::NotCallable {
            type_name: "integer"
        }
    );
}

#[test]
fn while_guard_can_be_disabled() {
    let outcome = run_with(
        "(set i 0) (while (< i 2000) (set i (+ i 1))) i",
        EvalConfig { loop_limit: None },
    );
    assert_eq!(outcome.result.unwrap(), "2000");
}

#[test]
fn malformed_forms() {
    for source in [
        "(set 1 2)",
        "(set x)",
        "(if 1 2)",
        "(not)",
        "(while 1)",
        "(defun f (x))",
        "(defun f x 1)",
        "(lambda (1) 1)",
        "(print)",
    ] {
        assert!(
            matches!(error(source), EvalErrorKind::MalformedForm { .. }),
            "{source}"
        );
    }
}

#[test]
fn deep_recursion_does_not_overflow() {
    let source = "(defun down (n) (if (= n 0) 0 (down (- n 1)))) (down 3000)";
    assert_eq!(value(source), "0");
}

/// Source text of a literal, identifier or nested list, as it renders.
fn datum() -> impl Strategy<Value = String> {
    let leaf = prop_oneof![
        any::<i64>().prop_map(|n| n.to_string()),
        "[a-z][a-z0-9]{0,5}",
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        proptest::collection::vec(inner, 0..4)
            .prop_map(|items| format!("({})", items.join(" ")))
    })
}

proptest! {
    #[test]
    fn sum_product_difference_match_host(a in any::<i64>(), b in any::<i64>(), c in any::<i64>()) {
        let source = format!("(print (+ {a} {b} {c}) (* {a} {b} {c}) (- {a} {b} {c}))");
        let expected = vec![
            a.wrapping_add(b).wrapping_add(c).to_string(),
            a.wrapping_mul(b).wrapping_mul(c).to_string(),
            a.wrapping_sub(b).wrapping_sub(c).to_string(),
        ];
        prop_assert_eq!(output(&source), expected);
    }

    #[test]
    fn division_truncates_toward_zero(a in -10_000i64..10_000, b in -100i64..100) {
        prop_assume!(b != 0);
        let source = format!("(print (/ {a} {b}))");
        prop_assert_eq!(output(&source), vec![(a / b).to_string()]);
    }

    #[test]
    fn division_by_any_zero_divisor_fails(a in any::<i64>(), b in 1i64..1000) {
        prop_assert_eq!(error(&format!("(/ {a} 0 {b})")), EvalErrorKind::DivisionByZero);
        prop_assert_eq!(error(&format!("(/ {a} {b} 0)")), EvalErrorKind::DivisionByZero);
    }

    #[test]
    fn quoted_data_render_verbatim(literal in datum()) {
        prop_assert_eq!(output(&format!("(print '{literal})")), vec![literal.clone()]);
        prop_assert_eq!(output(&format!("(print (quote {literal}))")), vec![literal]);
    }
}
