//! Property descriptors and the object internal methods

use super::{create_test_runtime, eval, eval_result, run, run_strict, s};
use es5core::ast::build::*;
use es5core::ast::{BinaryOp, Expression, UnaryOp};
use es5core::object::{JsObject, ObjectKind};
use es5core::property::PropertyDescriptorPatch;
use es5core::{CheapClone, JsObjectRef, JsValue};

fn define_property(target: Expression, name: &str, descriptor: Expression) -> Expression {
    call(
        member(ident("Object"), "defineProperty"),
        vec![target, string(name), descriptor],
    )
}

fn get_descriptor(target: Expression, name: &str) -> Expression {
    call(
        member(ident("Object"), "getOwnPropertyDescriptor"),
        vec![target, string(name)],
    )
}

// ═══════════════════════════════════════════════════════════════════════════════
// Lookup
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_prototype_lookup() {
    let mut interp = create_test_runtime();
    let a = JsObjectRef::new(JsObject::new());
    a.define_own_property(
        "a",
        PropertyDescriptorPatch::data(JsValue::Number(1.0), true, true, true),
        true,
    )
    .unwrap();
    let b = JsObjectRef::new(JsObject::with_prototype(Some(a.cheap_clone()), ObjectKind::Ordinary));

    assert!(b.get_own_property("a").is_none());
    assert_eq!(
        b.get_property("a").unwrap().unwrap().value(),
        Some(&JsValue::Number(1.0))
    );
    assert_eq!(b.get(&mut interp, "a").unwrap(), JsValue::Number(1.0));
    assert!(b.has_property("a").unwrap());
    assert!(!b.has_property("z").unwrap());
    assert_eq!(b.get(&mut interp, "z").unwrap(), JsValue::Undefined);
}

#[test]
fn test_cyclic_prototype_chain_is_internal_error() {
    let mut interp = create_test_runtime();
    let a = JsObjectRef::new(JsObject::new());
    let b = JsObjectRef::new(JsObject::with_prototype(Some(a.cheap_clone()), ObjectKind::Ordinary));
    a.borrow_mut().prototype = Some(b.cheap_clone());

    assert!(a.get(&mut interp, "x").unwrap_err().is_internal());
    assert!(b.has_property("x").unwrap_err().is_internal());
    assert!(b.can_put("x").unwrap_err().is_internal());
}

#[test]
fn test_has_own_property_ignores_prototype() {
    let result = run(vec![
        var("o", Some(object(vec![("own", num(1.0))]))),
        expr(binary(
            BinaryOp::Add,
            call(member(ident("o"), "hasOwnProperty"), vec![string("own")]),
            call(member(ident("o"), "hasOwnProperty"), vec![string("toString")]),
        )),
    ])
    .unwrap();
    // true + false
    assert_eq!(result, JsValue::Number(1.0));
}

// ═══════════════════════════════════════════════════════════════════════════════
// [[DefineOwnProperty]]
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_frozen_property_accepts_same_value_only() {
    let o = JsObjectRef::new(JsObject::new());
    o.define_own_property(
        "k",
        PropertyDescriptorPatch::data(JsValue::Number(1.0), false, false, false),
        true,
    )
    .unwrap();

    assert!(o
        .define_own_property("k", PropertyDescriptorPatch::value(JsValue::Number(1.0)), true)
        .unwrap());
    assert!(!o
        .define_own_property("k", PropertyDescriptorPatch::value(JsValue::Number(2.0)), false)
        .unwrap());
    assert!(o
        .define_own_property("k", PropertyDescriptorPatch::value(JsValue::Number(2.0)), true)
        .unwrap_err()
        .is_type_error());
    assert_eq!(o.get_own_property("k").unwrap().value(), Some(&JsValue::Number(1.0)));
}

#[test]
fn test_define_on_non_extensible_object() {
    let o = JsObjectRef::new(JsObject::new());
    o.borrow_mut().extensible = false;
    assert!(!o
        .define_own_property("new", PropertyDescriptorPatch::value(JsValue::Null), false)
        .unwrap());
    assert!(o.get_own_property("new").is_none());
}

#[test]
fn test_define_property_defaults_to_false_attributes() {
    let result = run(vec![
        var("o", Some(object(vec![]))),
        expr(define_property(ident("o"), "k", object(vec![("value", num(1.0))]))),
        var("d", Some(get_descriptor(ident("o"), "k"))),
        expr(binary(
            BinaryOp::Add,
            binary(
                BinaryOp::Add,
                member(ident("d"), "writable"),
                member(ident("d"), "enumerable"),
            ),
            member(ident("d"), "configurable"),
        )),
    ])
    .unwrap();
    assert_eq!(result, JsValue::Number(0.0));
}

#[test]
fn test_accessor_descriptor_round_trip() {
    let getter = || function_expr(function(None, &[], vec![ret(Some(num(10.0)))]));
    let result = run(vec![
        var("o", Some(object(vec![]))),
        expr(define_property(
            ident("o"),
            "p",
            object(vec![("get", getter()), ("configurable", boolean(true))]),
        )),
        var("d", Some(get_descriptor(ident("o"), "p"))),
        expr(logical(
            es5core::ast::LogicalOp::And,
            binary(BinaryOp::StrictEq, member(ident("o"), "p"), num(10.0)),
            logical(
                es5core::ast::LogicalOp::And,
                binary(BinaryOp::StrictEq, member(ident("d"), "set"), ident("undefined")),
                logical(
                    es5core::ast::LogicalOp::And,
                    unary(UnaryOp::Not, binary(BinaryOp::In, string("writable"), ident("d"))),
                    binary(
                        BinaryOp::StrictEq,
                        unary(UnaryOp::Typeof, member(ident("d"), "get")),
                        string("function"),
                    ),
                ),
            ),
        )),
    ])
    .unwrap();
    assert_eq!(result, JsValue::Boolean(true));
}

#[test]
fn test_descriptor_of_missing_property_is_undefined() {
    assert_eq!(eval(get_descriptor(object(vec![]), "nope")), JsValue::Undefined);
}

#[test]
fn test_to_property_descriptor_errors() {
    let target = || object(vec![]);
    let cases = vec![
        object(vec![("get", num(1.0))]),
        object(vec![("set", string("no"))]),
        object(vec![
            ("get", function_expr(function(None, &[], vec![]))),
            ("value", num(1.0)),
        ]),
        object(vec![
            ("set", ident("undefined")),
            ("writable", boolean(false)),
        ]),
        num(1.0),
    ];
    for descriptor in cases {
        let err = eval_result(define_property(target(), "k", descriptor)).unwrap_err();
        assert!(err.is_type_error(), "{}", err);
    }
}

#[test]
fn test_inherited_descriptor_fields_count() {
    // Descriptor fields are read with [[Get]], so inherited fields apply
    let result = run(vec![
        function_decl(function(Some("Desc"), &[], vec![])),
        expr(assign(
            member(member(ident("Desc"), "prototype"), "enumerable"),
            boolean(true),
        )),
        var("o", Some(object(vec![]))),
        expr(define_property(ident("o"), "k", new(ident("Desc"), vec![]))),
        expr(member(get_descriptor(ident("o"), "k"), "enumerable")),
    ])
    .unwrap();
    assert_eq!(result, JsValue::Boolean(true));
}

#[test]
fn test_cannot_redefine_non_configurable_accessor() {
    let err = run(vec![
        var("o", Some(object(vec![]))),
        expr(define_property(
            ident("o"),
            "p",
            object(vec![("get", function_expr(function(None, &[], vec![])))]),
        )),
        expr(define_property(ident("o"), "p", object(vec![("value", num(1.0))]))),
    ])
    .unwrap_err();
    assert!(err.is_type_error());
}

// ═══════════════════════════════════════════════════════════════════════════════
// [[Put]] / [[CanPut]]
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_read_only_property_assignment() {
    let body = || {
        vec![
            var("o", Some(object(vec![]))),
            expr(define_property(
                ident("o"),
                "k",
                object(vec![("value", num(1.0)), ("writable", boolean(false))]),
            )),
            expr(assign(member(ident("o"), "k"), num(2.0))),
            expr(member(ident("o"), "k")),
        ]
    };
    assert_eq!(run(body()).unwrap(), JsValue::Number(1.0));
    assert!(run_strict(body()).unwrap_err().is_type_error());
}

#[test]
fn test_inherited_read_only_blocks_assignment() {
    let result = run(vec![
        function_decl(function(Some("F"), &[], vec![])),
        expr(define_property(
            member(ident("F"), "prototype"),
            "ro",
            object(vec![("value", num(1.0))]),
        )),
        var("o", Some(new(ident("F"), vec![]))),
        expr(assign(member(ident("o"), "ro"), num(2.0))),
        expr(binary(
            BinaryOp::Add,
            member(ident("o"), "ro"),
            call(member(ident("o"), "hasOwnProperty"), vec![string("ro")]),
        )),
    ])
    .unwrap();
    assert_eq!(result, JsValue::Number(1.0));
}

#[test]
fn test_assignment_shadows_inherited_writable() {
    let result = run(vec![
        function_decl(function(Some("F"), &[], vec![])),
        expr(assign(member(member(ident("F"), "prototype"), "v"), num(1.0))),
        var("o", Some(new(ident("F"), vec![]))),
        expr(assign(member(ident("o"), "v"), num(2.0))),
        expr(binary(
            BinaryOp::Add,
            member(ident("o"), "v"),
            member(member(ident("F"), "prototype"), "v"),
        )),
    ])
    .unwrap();
    assert_eq!(result, JsValue::Number(3.0));
}

#[test]
fn test_setter_is_called_with_receiver() {
    let setter = function_expr(function(
        None,
        &["v"],
        vec![expr(assign(member(this(), "stored"), ident("v")))],
    ));
    let result = run(vec![
        function_decl(function(Some("F"), &[], vec![])),
        expr(define_property(
            member(ident("F"), "prototype"),
            "p",
            object(vec![("set", setter)]),
        )),
        var("o", Some(new(ident("F"), vec![]))),
        expr(assign(member(ident("o"), "p"), num(9.0))),
        expr(member(ident("o"), "stored")),
    ])
    .unwrap();
    assert_eq!(result, JsValue::Number(9.0));
}

#[test]
fn test_accessor_without_setter() {
    let body = || {
        vec![
            var("o", Some(object(vec![]))),
            expr(define_property(
                ident("o"),
                "p",
                object(vec![(
                    "get",
                    function_expr(function(None, &[], vec![ret(Some(string("g")))])),
                )]),
            )),
            expr(assign(member(ident("o"), "p"), num(1.0))),
            expr(member(ident("o"), "p")),
        ]
    };
    assert_eq!(run(body()).unwrap(), s("g"));
    assert!(run_strict(body()).unwrap_err().is_type_error());
}

#[test]
fn test_prevent_extensions_blocks_new_properties() {
    let body = || {
        vec![
            var("o", Some(object(vec![("a", num(1.0))]))),
            expr(call(member(ident("Object"), "preventExtensions"), vec![ident("o")])),
            expr(assign(member(ident("o"), "a"), num(2.0))),
            expr(assign(member(ident("o"), "b"), num(3.0))),
            expr(binary(
                BinaryOp::Add,
                member(ident("o"), "a"),
                call(member(ident("Object"), "isExtensible"), vec![ident("o")]),
            )),
        ]
    };
    assert_eq!(run(body()).unwrap(), JsValue::Number(2.0));
    assert!(run_strict(body()).unwrap_err().is_type_error());
}

#[test]
fn test_get_prototype_of() {
    assert_eq!(
        eval(binary(
            BinaryOp::StrictEq,
            call(member(ident("Object"), "getPrototypeOf"), vec![object(vec![])]),
            member(ident("Object"), "prototype"),
        )),
        JsValue::Boolean(true)
    );
    assert_eq!(
        eval(call(
            member(ident("Object"), "getPrototypeOf"),
            vec![member(ident("Object"), "prototype")],
        )),
        JsValue::Null
    );
    assert!(eval_result(call(member(ident("Object"), "getPrototypeOf"), vec![num(1.0)]))
        .unwrap_err()
        .is_type_error());
}

#[test]
fn test_string_index_properties() {
    assert_eq!(
        eval(get_descriptor(new(ident("String"), vec![string("hi")]), "2")),
        JsValue::Undefined
    );
    let result = run(vec![
        var("w", Some(new(ident("String"), vec![string("hi")]))),
        var("d", Some(get_descriptor(ident("w"), "0"))),
        expr(binary(
            BinaryOp::Add,
            member(ident("d"), "value"),
            binary(
                BinaryOp::Add,
                member(ident("d"), "writable"),
                member(ident("d"), "enumerable"),
            ),
        )),
    ])
    .unwrap();
    assert_eq!(result, s("h1"));
}
