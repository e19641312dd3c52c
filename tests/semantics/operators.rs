//! Operator semantics

use super::{
    assert_nan, assert_negative_zero, create_test_runtime, eval, eval_result, run, run_strict, s,
};
use es5core::ast::build::*;
use es5core::ast::{BinaryOp, LogicalOp, UnaryOp};
use es5core::interpreter::operators::{abstract_equals, abstract_relational_comparison, add};
use es5core::JsValue;

// ═══════════════════════════════════════════════════════════════════════════════
// Addition
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_add_numbers() {
    let mut interp = create_test_runtime();
    let n = JsValue::Number;

    assert_nan(&add(&mut interp, &n(f64::NAN), &n(5.0)).unwrap());
    assert_nan(&add(&mut interp, &n(f64::INFINITY), &n(f64::NEG_INFINITY)).unwrap());
    assert_eq!(
        add(&mut interp, &n(f64::INFINITY), &n(f64::INFINITY)).unwrap(),
        n(f64::INFINITY)
    );
    assert_negative_zero(&add(&mut interp, &n(-0.0), &n(-0.0)).unwrap());

    let sum = add(&mut interp, &n(0.0), &n(-0.0)).unwrap();
    assert!(sum.same_value(&n(0.0)));

    assert_eq!(add(&mut interp, &n(0.1), &n(0.2)).unwrap(), n(0.1 + 0.2));
}

#[test]
fn test_add_concatenates_when_either_side_is_string() {
    let mut interp = create_test_runtime();
    assert_eq!(add(&mut interp, &JsValue::Number(5.0), &s("3")).unwrap(), s("53"));
    assert_eq!(add(&mut interp, &s("3"), &JsValue::Number(5.0)).unwrap(), s("35"));
    assert_eq!(add(&mut interp, &s("a"), &JsValue::Null).unwrap(), s("anull"));
    assert_eq!(add(&mut interp, &JsValue::Undefined, &s("")).unwrap(), s("undefined"));
}

#[test]
fn test_add_converts_non_strings_to_numbers() {
    let mut interp = create_test_runtime();
    assert_eq!(
        add(&mut interp, &JsValue::Boolean(true), &JsValue::Number(1.0)).unwrap(),
        JsValue::Number(2.0)
    );
    assert_eq!(
        add(&mut interp, &JsValue::Null, &JsValue::Number(1.0)).unwrap(),
        JsValue::Number(1.0)
    );
    assert_nan(&add(&mut interp, &JsValue::Undefined, &JsValue::Number(1.0)).unwrap());
}

#[test]
fn test_add_with_value_of() {
    let obj = object(vec![(
        "valueOf",
        function_expr(function(None, &[], vec![ret(Some(num(2.0)))])),
    )]);
    assert_eq!(eval(binary(BinaryOp::Add, obj, num(3.0))), JsValue::Number(5.0));
}

// ═══════════════════════════════════════════════════════════════════════════════
// Other arithmetic
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_arithmetic_operators() {
    assert_eq!(eval(binary(BinaryOp::Sub, string("10"), num(4.0))), JsValue::Number(6.0));
    assert_eq!(eval(binary(BinaryOp::Mul, string("3"), boolean(true))), JsValue::Number(3.0));
    assert_eq!(eval(binary(BinaryOp::Div, num(1.0), num(0.0))), JsValue::Number(f64::INFINITY));
    assert_eq!(
        eval(binary(BinaryOp::Div, num(1.0), unary(UnaryOp::Minus, num(0.0)))),
        JsValue::Number(f64::NEG_INFINITY)
    );
    assert_nan(&eval(binary(BinaryOp::Div, num(0.0), num(0.0))));
}

#[test]
fn test_remainder_keeps_dividend_sign() {
    assert_eq!(eval(binary(BinaryOp::Mod, num(5.0), num(3.0))), JsValue::Number(2.0));
    assert_eq!(eval(binary(BinaryOp::Mod, num(-5.0), num(3.0))), JsValue::Number(-2.0));
    assert_eq!(eval(binary(BinaryOp::Mod, num(5.5), num(2.0))), JsValue::Number(1.5));
    assert_eq!(
        eval(binary(BinaryOp::Mod, num(5.0), num(f64::INFINITY))),
        JsValue::Number(5.0)
    );
    assert_nan(&eval(binary(BinaryOp::Mod, num(5.0), num(0.0))));
    assert_nan(&eval(binary(BinaryOp::Mod, num(f64::INFINITY), num(2.0))));
    assert_negative_zero(&eval(binary(BinaryOp::Mod, num(-4.0), num(2.0))));
}

// ═══════════════════════════════════════════════════════════════════════════════
// Equality and comparison
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_abstract_equality() {
    let mut interp = create_test_runtime();
    let eq = |interp: &mut es5core::Interpreter, a: JsValue, b: JsValue| {
        abstract_equals(interp, &a, &b).unwrap()
    };

    assert!(eq(&mut interp, JsValue::Null, JsValue::Undefined));
    assert!(eq(&mut interp, s("1"), JsValue::Number(1.0)));
    assert!(eq(&mut interp, JsValue::Boolean(true), JsValue::Number(1.0)));
    assert!(eq(&mut interp, JsValue::Boolean(false), s("")));
    assert!(eq(&mut interp, JsValue::Number(0.0), JsValue::Number(-0.0)));
    assert!(!eq(&mut interp, JsValue::Number(f64::NAN), JsValue::Number(f64::NAN)));
    assert!(!eq(&mut interp, JsValue::Null, JsValue::Number(0.0)));
    assert!(!eq(&mut interp, JsValue::Undefined, JsValue::Boolean(false)));

    let obj = interp.create_object();
    assert!(eq(&mut interp, JsValue::Object(obj.clone()), s("[object Object]")));
    assert!(eq(&mut interp, JsValue::Object(obj.clone()), JsValue::Object(obj)));
    let other = interp.create_object();
    let another = interp.create_object();
    assert!(!eq(&mut interp, JsValue::Object(other), JsValue::Object(another)));
}

#[test]
fn test_strict_equality_operators() {
    assert_eq!(
        eval(binary(BinaryOp::StrictEq, string("1"), num(1.0))),
        JsValue::Boolean(false)
    );
    assert_eq!(
        eval(binary(BinaryOp::StrictNotEq, null(), ident("undefined"))),
        JsValue::Boolean(true)
    );
    assert_eq!(
        eval(binary(BinaryOp::NotEq, null(), ident("undefined"))),
        JsValue::Boolean(false)
    );
}

#[test]
fn test_relational_comparison() {
    let mut interp = create_test_runtime();
    let lt = |interp: &mut es5core::Interpreter, a: JsValue, b: JsValue| {
        abstract_relational_comparison(interp, &a, &b, true).unwrap()
    };
    assert_eq!(lt(&mut interp, s("a"), s("b")), Some(true));
    assert_eq!(lt(&mut interp, s("10"), s("9")), Some(true));
    assert_eq!(lt(&mut interp, s("ab"), s("a")), Some(false));
    assert_eq!(lt(&mut interp, s("a"), s("ab")), Some(true));
    assert_eq!(lt(&mut interp, JsValue::Number(10.0), JsValue::Number(9.0)), Some(false));
    assert_eq!(lt(&mut interp, s("10"), JsValue::Number(9.0)), Some(false));
    assert_eq!(lt(&mut interp, JsValue::Number(f64::NAN), JsValue::Number(1.0)), None);
    assert_eq!(lt(&mut interp, JsValue::Undefined, JsValue::Number(1.0)), None);
    assert_eq!(lt(&mut interp, JsValue::Null, JsValue::Number(1.0)), Some(true));
}

#[test]
fn test_comparison_operators_with_undefined_result() {
    for op in [BinaryOp::Lt, BinaryOp::Gt, BinaryOp::LtEq, BinaryOp::GtEq] {
        assert_eq!(
            eval(binary(op, num(f64::NAN), num(1.0))),
            JsValue::Boolean(false),
            "{:?}",
            op
        );
    }
    assert_eq!(eval(binary(BinaryOp::LtEq, num(1.0), num(1.0))), JsValue::Boolean(true));
    assert_eq!(eval(binary(BinaryOp::GtEq, num(2.0), num(1.0))), JsValue::Boolean(true));
    assert_eq!(eval(binary(BinaryOp::Gt, string("b"), string("a"))), JsValue::Boolean(true));
}

#[test]
fn test_comparison_converts_left_operand_first() {
    // Each operand appends to `order` when converted
    let tracked = |tag: &str| {
        object(vec![(
            "valueOf",
            function_expr(function(
                None,
                &[],
                vec![
                    expr(assign(
                        ident("order"),
                        binary(BinaryOp::Add, ident("order"), string(tag)),
                    )),
                    ret(Some(num(0.0))),
                ],
            )),
        )])
    };
    for op in [BinaryOp::Lt, BinaryOp::Gt, BinaryOp::LtEq, BinaryOp::GtEq] {
        let result = run(vec![
            var("order", Some(string(""))),
            expr(binary(op, tracked("L"), tracked("R"))),
            expr(ident("order")),
        ])
        .unwrap();
        assert_eq!(result, s("LR"), "{:?}", op);
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// typeof, void, !, logical operators
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_typeof() {
    assert_eq!(eval(unary(UnaryOp::Typeof, ident("notDeclared"))), s("undefined"));
    assert_eq!(eval(unary(UnaryOp::Typeof, null())), s("object"));
    assert_eq!(eval(unary(UnaryOp::Typeof, num(1.0))), s("number"));
    assert_eq!(eval(unary(UnaryOp::Typeof, string(""))), s("string"));
    assert_eq!(eval(unary(UnaryOp::Typeof, boolean(false))), s("boolean"));
    assert_eq!(eval(unary(UnaryOp::Typeof, object(vec![]))), s("object"));
    assert_eq!(eval(unary(UnaryOp::Typeof, ident("Object"))), s("function"));
    assert_eq!(
        eval(unary(UnaryOp::Typeof, function_expr(function(None, &[], vec![])))),
        s("function")
    );
    // A null base is still a TypeError under typeof
    assert!(eval_result(unary(UnaryOp::Typeof, member(null(), "x")))
        .unwrap_err()
        .is_type_error());
}

#[test]
fn test_void_and_not() {
    assert_eq!(eval(unary(UnaryOp::Void, num(1.0))), JsValue::Undefined);
    assert_eq!(eval(unary(UnaryOp::Not, string(""))), JsValue::Boolean(true));
    assert_eq!(eval(unary(UnaryOp::Not, object(vec![]))), JsValue::Boolean(false));
}

#[test]
fn test_logical_operators_short_circuit() {
    assert_eq!(eval(logical(LogicalOp::Or, num(0.0), string("x"))), s("x"));
    assert_eq!(eval(logical(LogicalOp::Or, string("first"), ident("boom"))), s("first"));
    assert_eq!(eval(logical(LogicalOp::And, string(""), ident("boom"))), s(""));
    assert!(eval_result(logical(LogicalOp::And, num(1.0), ident("boom")))
        .unwrap_err()
        .is_reference_error());
}

// ═══════════════════════════════════════════════════════════════════════════════
// delete, in, instanceof
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_delete_own_property() {
    let result = run(vec![
        var("o", Some(object(vec![("a", num(1.0))]))),
        var("deleted", Some(unary(UnaryOp::Delete, member(ident("o"), "a")))),
        expr(logical(
            LogicalOp::And,
            ident("deleted"),
            unary(UnaryOp::Not, binary(BinaryOp::In, string("a"), ident("o"))),
        )),
    ])
    .unwrap();
    assert_eq!(result, JsValue::Boolean(true));
}

#[test]
fn test_delete_non_configurable() {
    assert_eq!(
        eval(unary(UnaryOp::Delete, ident("NaN"))),
        JsValue::Boolean(false)
    );
    assert_eq!(
        eval(unary(UnaryOp::Delete, member(this(), "NaN"))),
        JsValue::Boolean(false)
    );
    let err = run_strict(vec![expr(unary(UnaryOp::Delete, member(this(), "NaN")))]).unwrap_err();
    assert!(err.is_type_error());
}

#[test]
fn test_delete_on_values_and_unresolvable() {
    assert_eq!(eval(unary(UnaryOp::Delete, num(1.0))), JsValue::Boolean(true));
    assert_eq!(eval(unary(UnaryOp::Delete, ident("nowhere"))), JsValue::Boolean(true));
    assert_eq!(
        eval(unary(UnaryOp::Delete, member(string("abc"), "length"))),
        JsValue::Boolean(false)
    );
}

#[test]
fn test_in_operator() {
    assert_eq!(
        eval(binary(BinaryOp::In, string("a"), object(vec![("a", num(1.0))]))),
        JsValue::Boolean(true)
    );
    assert_eq!(
        eval(binary(BinaryOp::In, string("toString"), object(vec![]))),
        JsValue::Boolean(true)
    );
    assert_eq!(
        eval(binary(BinaryOp::In, string("b"), object(vec![]))),
        JsValue::Boolean(false)
    );
    assert!(eval_result(binary(BinaryOp::In, string("a"), string("abc")))
        .unwrap_err()
        .is_type_error());
}

#[test]
fn test_instanceof() {
    let setup = || {
        vec![
            function_decl(function(Some("F"), &[], vec![])),
            function_decl(function(Some("G"), &[], vec![])),
            var("o", Some(new(ident("F"), vec![]))),
        ]
    };
    let check = |e| {
        let mut body = setup();
        body.push(expr(e));
        run(body)
    };

    assert_eq!(
        check(binary(BinaryOp::Instanceof, ident("o"), ident("F"))).unwrap(),
        JsValue::Boolean(true)
    );
    assert_eq!(
        check(binary(BinaryOp::Instanceof, ident("o"), ident("Object"))).unwrap(),
        JsValue::Boolean(true)
    );
    assert_eq!(
        check(binary(BinaryOp::Instanceof, ident("o"), ident("G"))).unwrap(),
        JsValue::Boolean(false)
    );
    assert_eq!(
        check(binary(BinaryOp::Instanceof, num(1.0), ident("F"))).unwrap(),
        JsValue::Boolean(false)
    );
    assert!(check(binary(BinaryOp::Instanceof, ident("o"), ident("o")))
        .unwrap_err()
        .is_type_error());
}

#[test]
fn test_instanceof_with_non_object_prototype() {
    let err = run(vec![
        function_decl(function(Some("F"), &[], vec![])),
        expr(assign(member(ident("F"), "prototype"), num(1.0))),
        expr(binary(BinaryOp::Instanceof, object(vec![]), ident("F"))),
    ])
    .unwrap_err();
    assert!(err.is_type_error());
}
