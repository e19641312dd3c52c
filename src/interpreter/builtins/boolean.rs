//! Boolean built-in constructor and prototype methods

use crate::conversion::{to_boolean, to_object};
use crate::error::JsError;
use crate::interpreter::Interpreter;
use crate::object::{JsObjectRef, ObjectKind};
use crate::value::{CheapClone, JsString, JsValue};

use super::{arg, link_constructor};

/// Initialize Boolean.prototype with toString, valueOf
pub fn init_boolean_prototype(interp: &mut Interpreter) {
    let proto = interp.realm().boolean_prototype.cheap_clone();

    interp.register_method(&proto, "toString", boolean_to_string, 0);
    interp.register_method(&proto, "valueOf", boolean_value_of, 0);
}

/// Create Boolean constructor with prototype property
pub fn create_boolean_constructor(interp: &mut Interpreter) -> JsObjectRef {
    let ctor =
        interp.create_native_constructor("Boolean", boolean_constructor_fn, boolean_construct, 1);
    let proto = interp.realm().boolean_prototype.cheap_clone();
    link_constructor(&ctor, &proto);
    ctor
}

/// Boolean(value) called as a function converts to a primitive boolean
pub fn boolean_constructor_fn(
    _interp: &mut Interpreter,
    _this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    Ok(JsValue::Boolean(to_boolean(&arg(args, 0))))
}

/// new Boolean(value) creates a Boolean wrapper object
pub fn boolean_construct(
    interp: &mut Interpreter,
    _this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let b = to_boolean(&arg(args, 0));
    Ok(JsValue::Object(to_object(interp, &JsValue::Boolean(b))?))
}

/// Boolean.prototype.toString()
pub fn boolean_to_string(
    _interp: &mut Interpreter,
    this: JsValue,
    _args: &[JsValue],
) -> Result<JsValue, JsError> {
    let b = this_boolean_value(&this)?;
    Ok(JsValue::String(JsString::from(if b { "true" } else { "false" })))
}

/// Boolean.prototype.valueOf()
pub fn boolean_value_of(
    _interp: &mut Interpreter,
    this: JsValue,
    _args: &[JsValue],
) -> Result<JsValue, JsError> {
    Ok(JsValue::Boolean(this_boolean_value(&this)?))
}

/// Helper to extract boolean value from `this`
/// Works for both primitive booleans and Boolean wrapper objects
fn this_boolean_value(this: &JsValue) -> Result<bool, JsError> {
    match this {
        JsValue::Boolean(b) => Ok(*b),
        JsValue::Object(obj) => match obj.borrow().kind {
            ObjectKind::Boolean(b) => Ok(b),
            _ => Err(JsError::type_error(
                "Boolean.prototype method called on incompatible receiver",
            )),
        },
        _ => Err(JsError::type_error(
            "Boolean.prototype method called on incompatible receiver",
        )),
    }
}
