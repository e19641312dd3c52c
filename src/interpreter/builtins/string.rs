//! String built-in constructor and prototype methods

use crate::conversion::{to_object, to_string};
use crate::error::JsError;
use crate::interpreter::Interpreter;
use crate::object::{JsObjectRef, ObjectKind};
use crate::value::{CheapClone, JsString, JsValue};

use super::link_constructor;

/// Initialize String.prototype with toString, valueOf
pub fn init_string_prototype(interp: &mut Interpreter) {
    let proto = interp.realm().string_prototype.cheap_clone();

    interp.register_method(&proto, "toString", string_to_string, 0);
    interp.register_method(&proto, "valueOf", string_value_of, 0);
}

/// Create String constructor with prototype property
pub fn create_string_constructor(interp: &mut Interpreter) -> JsObjectRef {
    let ctor =
        interp.create_native_constructor("String", string_constructor_fn, string_construct, 1);
    let proto = interp.realm().string_prototype.cheap_clone();
    link_constructor(&ctor, &proto);
    ctor
}

fn string_argument(interp: &mut Interpreter, args: &[JsValue]) -> Result<JsString, JsError> {
    match args.first() {
        Some(v) => to_string(interp, v),
        None => Ok(JsString::from("")),
    }
}

/// String(value) called as a function converts to a primitive string
pub fn string_constructor_fn(
    interp: &mut Interpreter,
    _this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    Ok(JsValue::String(string_argument(interp, args)?))
}

/// new String(value) creates a String wrapper object
pub fn string_construct(
    interp: &mut Interpreter,
    _this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let s = string_argument(interp, args)?;
    Ok(JsValue::Object(to_object(interp, &JsValue::String(s))?))
}

/// String.prototype.toString()
pub fn string_to_string(
    _interp: &mut Interpreter,
    this: JsValue,
    _args: &[JsValue],
) -> Result<JsValue, JsError> {
    Ok(JsValue::String(this_string_value(&this)?))
}

/// String.prototype.valueOf()
pub fn string_value_of(
    _interp: &mut Interpreter,
    this: JsValue,
    _args: &[JsValue],
) -> Result<JsValue, JsError> {
    Ok(JsValue::String(this_string_value(&this)?))
}

fn this_string_value(this: &JsValue) -> Result<JsString, JsError> {
    match this {
        JsValue::String(s) => Ok(s.cheap_clone()),
        JsValue::Object(obj) => match &obj.borrow().kind {
            ObjectKind::String(s) => Ok(s.cheap_clone()),
            _ => Err(JsError::type_error(
                "String.prototype method called on incompatible receiver",
            )),
        },
        _ => Err(JsError::type_error(
            "String.prototype method called on incompatible receiver",
        )),
    }
}
