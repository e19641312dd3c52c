//! Type conversion operations through the public API

use super::{assert_nan, assert_negative_zero, create_test_runtime, eval, eval_result, s};
use es5core::ast::build::*;
use es5core::ast::{BinaryOp, UnaryOp};
use es5core::conversion::{
    check_object_coercible, number_to_string, string_to_number, to_boolean, to_int32, to_number,
    to_object, to_primitive, to_string, to_uint16, to_uint32,
};
use es5core::object::{Hint, JsObject, ObjectKind};
use es5core::{CheapClone, Interpreter, JsError, JsObjectRef, JsValue};

fn sample_values(interp: &mut Interpreter) -> Vec<JsValue> {
    vec![
        JsValue::Undefined,
        JsValue::Null,
        JsValue::Boolean(false),
        JsValue::Boolean(true),
        JsValue::Number(0.0),
        JsValue::Number(-0.0),
        JsValue::Number(f64::NAN),
        JsValue::Number(3.5),
        s(""),
        s("0"),
        s("false"),
        JsValue::Object(interp.create_object()),
    ]
}

// ═══════════════════════════════════════════════════════════════════════════════
// ToBoolean / ToObject
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_to_boolean_is_idempotent() {
    let mut interp = create_test_runtime();
    for v in sample_values(&mut interp) {
        let b = to_boolean(&v);
        assert_eq!(to_boolean(&JsValue::Boolean(b)), b, "{:?}", v);
    }
}

#[test]
fn test_to_boolean_table() {
    let mut interp = create_test_runtime();
    let truthy: Vec<bool> = sample_values(&mut interp).iter().map(to_boolean).collect();
    assert_eq!(
        truthy,
        vec![false, false, false, true, false, false, false, true, false, true, true, true]
    );
}

#[test]
fn test_wrapper_objects_are_truthy() {
    assert_eq!(
        eval(unary(
            UnaryOp::Not,
            new(ident("Boolean"), vec![boolean(false)])
        )),
        JsValue::Boolean(false)
    );
    assert_eq!(
        eval(call(ident("Boolean"), vec![new(ident("Boolean"), vec![boolean(false)])])),
        JsValue::Boolean(true)
    );
}

#[test]
fn test_to_object_returns_objects_unchanged() {
    let mut interp = create_test_runtime();
    let obj = interp.create_object();
    let converted = to_object(&mut interp, &JsValue::Object(obj.cheap_clone())).unwrap();
    assert!(JsObjectRef::ptr_eq(&obj, &converted));
}

#[test]
fn test_to_object_wraps_primitives() {
    let mut interp = create_test_runtime();
    for (value, class) in [
        (JsValue::Boolean(true), "Boolean"),
        (JsValue::Number(2.5), "Number"),
        (s("ab"), "String"),
    ] {
        let wrapper = to_object(&mut interp, &value).unwrap();
        assert_eq!(wrapper.class(), class);
        assert!(wrapper.primitive_value().unwrap().same_value(&value));
    }

    let realm_proto = interp.realm().number_prototype.cheap_clone();
    let wrapper = to_object(&mut interp, &JsValue::Number(1.0)).unwrap();
    assert!(JsObjectRef::ptr_eq(&wrapper.prototype().unwrap(), &realm_proto));
}

#[test]
fn test_to_object_rejects_null_and_undefined() {
    let mut interp = create_test_runtime();
    for v in [JsValue::Null, JsValue::Undefined] {
        assert!(to_object(&mut interp, &v).unwrap_err().is_type_error());
        assert!(check_object_coercible(&v).unwrap_err().is_type_error());
    }
    assert!(check_object_coercible(&s("")).is_ok());
}

#[test]
fn test_string_wrapper_shape() {
    assert_eq!(
        eval(member(new(ident("String"), vec![string("ab")]), "length")),
        JsValue::Number(2.0)
    );
    assert_eq!(
        eval(unary(UnaryOp::Typeof, new(ident("String"), vec![string("ab")]))),
        s("object")
    );
    assert_eq!(
        eval(call(
            member(member(member(ident("Object"), "prototype"), "toString"), "call"),
            vec![string("x")],
        )),
        s("[object String]")
    );
    assert_eq!(
        eval(call(
            member(member(member(ident("Object"), "prototype"), "toString"), "call"),
            vec![null()],
        )),
        s("[object Null]")
    );
}

// ═══════════════════════════════════════════════════════════════════════════════
// ToPrimitive / [[DefaultValue]]
// ═══════════════════════════════════════════════════════════════════════════════

fn returns_forty_two(
    _interp: &mut Interpreter,
    _this: JsValue,
    _args: &[JsValue],
) -> Result<JsValue, JsError> {
    Ok(JsValue::Number(42.0))
}

fn returns_label(
    _interp: &mut Interpreter,
    _this: JsValue,
    _args: &[JsValue],
) -> Result<JsValue, JsError> {
    Ok(JsValue::from("label"))
}

fn with_both_methods(interp: &mut Interpreter, kind: ObjectKind) -> JsObjectRef {
    let proto = interp.realm().object_prototype.cheap_clone();
    let obj = JsObjectRef::new(JsObject::with_prototype(Some(proto), kind));
    interp.register_method(&obj, "valueOf", returns_forty_two, 0);
    interp.register_method(&obj, "toString", returns_label, 0);
    obj
}

#[test]
fn test_default_hint_depends_on_kind() {
    let mut interp = create_test_runtime();
    let plain = JsValue::Object(with_both_methods(&mut interp, ObjectKind::Ordinary));
    let date = JsValue::Object(with_both_methods(&mut interp, ObjectKind::Date(0.0)));

    assert_eq!(to_primitive(&mut interp, &plain, None).unwrap(), JsValue::Number(42.0));
    assert_eq!(to_primitive(&mut interp, &date, None).unwrap(), s("label"));

    assert_eq!(
        to_primitive(&mut interp, &plain, Some(Hint::String)).unwrap(),
        s("label")
    );
    assert_eq!(
        to_primitive(&mut interp, &date, Some(Hint::Number)).unwrap(),
        JsValue::Number(42.0)
    );
    assert_eq!(to_number(&mut interp, &date).unwrap(), 42.0);
    assert_eq!(to_string(&mut interp, &plain).unwrap(), "label");
}

#[test]
fn test_to_primitive_is_identity_on_primitives() {
    let mut interp = create_test_runtime();
    for v in [JsValue::Null, JsValue::Boolean(true), JsValue::Number(7.0), s("p")] {
        for hint in [None, Some(Hint::String), Some(Hint::Number)] {
            assert_eq!(to_primitive(&mut interp, &v, hint).unwrap(), v);
        }
    }
}

#[test]
fn test_default_value_falls_back_to_second_method() {
    let obj = || {
        object(vec![(
            "toString",
            function_expr(function(None, &[], vec![ret(Some(string("x")))])),
        )])
    };
    // valueOf is inherited and returns the object itself, so toString wins
    assert_eq!(eval(binary(BinaryOp::Add, obj(), num(1.0))), s("x1"));
    assert_eq!(eval(binary(BinaryOp::Add, object(vec![]), string(""))), s("[object Object]"));
}

#[test]
fn test_default_value_without_callable_method_is_type_error() {
    let err = eval_result(binary(
        BinaryOp::Add,
        object(vec![("valueOf", num(1.0)), ("toString", num(2.0))]),
        num(1.0),
    ))
    .unwrap_err();
    assert!(err.is_type_error());
}

#[test]
fn test_user_value_of_drives_numeric_conversion() {
    let obj = object(vec![
        (
            "valueOf",
            function_expr(function(None, &[], vec![ret(Some(num(2.0)))])),
        ),
        (
            "toString",
            function_expr(function(None, &[], vec![ret(Some(string("s")))])),
        ),
    ]);
    assert_eq!(eval(call(ident("Number"), vec![obj])), JsValue::Number(2.0));

    let obj = object(vec![
        (
            "valueOf",
            function_expr(function(None, &[], vec![ret(Some(num(2.0)))])),
        ),
        (
            "toString",
            function_expr(function(None, &[], vec![ret(Some(string("s")))])),
        ),
    ]);
    assert_eq!(eval(call(ident("String"), vec![obj])), s("s"));
}

// ═══════════════════════════════════════════════════════════════════════════════
// ToNumber / ToString
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_string_to_number_grammar() {
    assert_eq!(string_to_number("0x10"), 16.0);
    assert_eq!(string_to_number("0XfF"), 255.0);
    assert_eq!(string_to_number(""), 0.0);
    assert_eq!(string_to_number(" \n\t "), 0.0);
    assert_eq!(string_to_number("  12  "), 12.0);
    assert_eq!(string_to_number("\u{FEFF}3"), 3.0);
    assert_eq!(string_to_number("-Infinity"), f64::NEG_INFINITY);
    assert_eq!(string_to_number(" 1e1000 "), f64::INFINITY);
    assert_eq!(string_to_number(".5"), 0.5);
    assert_eq!(string_to_number("5."), 5.0);
    assert!(string_to_number("-0").is_sign_negative());
    assert!(string_to_number("0x").is_nan());
    assert!(string_to_number("-0x10").is_nan());
    assert!(string_to_number("1e").is_nan());
    assert!(string_to_number("12px").is_nan());
    assert!(string_to_number("inf").is_nan());
    assert!(string_to_number(".").is_nan());
}

#[test]
fn test_unary_plus_and_minus() {
    assert_eq!(eval(unary(UnaryOp::Plus, string(" 12 "))), JsValue::Number(12.0));
    assert_eq!(eval(unary(UnaryOp::Plus, boolean(true))), JsValue::Number(1.0));
    assert_eq!(eval(unary(UnaryOp::Plus, null())), JsValue::Number(0.0));
    assert_nan(&eval(unary(UnaryOp::Plus, ident("undefined"))));
    assert_nan(&eval(unary(UnaryOp::Plus, string("abc"))));
    assert_negative_zero(&eval(unary(UnaryOp::Minus, num(0.0))));
}

#[test]
fn test_number_to_string() {
    assert_eq!(number_to_string(-0.0), "0");
    assert_eq!(number_to_string(0.0), "0");
    assert_eq!(number_to_string(f64::NAN), "NaN");
    assert_eq!(number_to_string(f64::NEG_INFINITY), "-Infinity");
    assert_eq!(number_to_string(123.0), "123");
    assert_eq!(number_to_string(-1.5), "-1.5");
    assert_eq!(number_to_string(0.1), "0.1");
    assert_eq!(number_to_string(0.000001), "0.000001");
    assert_eq!(number_to_string(1e-7), "1e-7");
    assert_eq!(number_to_string(1e21), "1e+21");
    assert_eq!(number_to_string(123456789012345680000.0), "123456789012345680000");
}

#[test]
fn test_number_to_string_radix() {
    assert_eq!(
        eval(call(member(num(255.0), "toString"), vec![num(16.0)])),
        s("ff")
    );
    assert_eq!(
        eval(call(member(num(-5.0), "toString"), vec![num(2.0)])),
        s("-101")
    );
    assert_eq!(
        eval(call(member(num(0.5), "toString"), vec![num(2.0)])),
        s("0.1")
    );
    let err = eval_result(call(member(num(1.0), "toString"), vec![num(1.0)])).unwrap_err();
    assert_eq!(err.kind(), "RangeError");
}

#[test]
fn test_to_string_of_primitives() {
    let mut interp = create_test_runtime();
    assert_eq!(to_string(&mut interp, &JsValue::Undefined).unwrap(), "undefined");
    assert_eq!(to_string(&mut interp, &JsValue::Null).unwrap(), "null");
    assert_eq!(to_string(&mut interp, &JsValue::Boolean(false)).unwrap(), "false");
    assert_eq!(to_string(&mut interp, &JsValue::Number(-0.0)).unwrap(), "0");
}

// ═══════════════════════════════════════════════════════════════════════════════
// Integer conversions
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_integer_conversions() {
    let mut interp = create_test_runtime();
    let n = |v: f64| JsValue::Number(v);

    assert_eq!(to_int32(&mut interp, &n(4294967295.0)).unwrap(), -1);
    assert_eq!(to_int32(&mut interp, &n(2147483648.0)).unwrap(), -2147483648);
    assert_eq!(to_int32(&mut interp, &n(-1.9)).unwrap(), -1);
    assert_eq!(to_int32(&mut interp, &n(f64::NAN)).unwrap(), 0);
    assert_eq!(to_int32(&mut interp, &s("12")).unwrap(), 12);

    assert_eq!(to_uint32(&mut interp, &n(-1.0)).unwrap(), 4294967295);
    assert_eq!(to_uint32(&mut interp, &n(f64::INFINITY)).unwrap(), 0);

    assert_eq!(to_uint16(&mut interp, &n(65537.0)).unwrap(), 1);
    assert_eq!(to_uint16(&mut interp, &n(-1.0)).unwrap(), 65535);
}
