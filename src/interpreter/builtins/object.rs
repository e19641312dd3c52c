//! Object constructor and Object.prototype

use crate::conversion::{to_object, to_string};
use crate::error::JsError;
use crate::interpreter::Interpreter;
use crate::object::JsObjectRef;
use crate::property::{from_property_descriptor, to_property_descriptor};
use crate::value::{CheapClone, JsString, JsValue};

use super::{arg, link_constructor};

/// Initialize Object.prototype with toString, valueOf, hasOwnProperty
pub fn init_object_prototype(interp: &mut Interpreter) {
    let proto = interp.realm().object_prototype.cheap_clone();

    interp.register_method(&proto, "toString", object_to_string, 0);
    interp.register_method(&proto, "valueOf", object_value_of, 0);
    interp.register_method(&proto, "hasOwnProperty", object_has_own_property, 1);
}

/// Create the Object constructor with its descriptor reflection functions
pub fn create_object_constructor(interp: &mut Interpreter) -> JsObjectRef {
    let ctor =
        interp.create_native_constructor("Object", object_constructor_fn, object_construct, 1);
    let proto = interp.realm().object_prototype.cheap_clone();
    link_constructor(&ctor, &proto);

    interp.register_method(&ctor, "getPrototypeOf", object_get_prototype_of, 1);
    interp.register_method(
        &ctor,
        "getOwnPropertyDescriptor",
        object_get_own_property_descriptor,
        2,
    );
    interp.register_method(&ctor, "defineProperty", object_define_property, 3);
    interp.register_method(&ctor, "preventExtensions", object_prevent_extensions, 1);
    interp.register_method(&ctor, "isExtensible", object_is_extensible, 1);
    ctor
}

/// Object(value): ToObject, or a fresh object for null/undefined
pub fn object_constructor_fn(
    interp: &mut Interpreter,
    _this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    object_construct(interp, JsValue::Undefined, args)
}

pub fn object_construct(
    interp: &mut Interpreter,
    _this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let value = arg(args, 0);
    if value.is_null_or_undefined() {
        return Ok(JsValue::Object(interp.create_object()));
    }
    Ok(JsValue::Object(to_object(interp, &value)?))
}

/// Object.prototype.toString: "[object " + [[Class]] + "]"
pub fn object_to_string(
    interp: &mut Interpreter,
    this: JsValue,
    _args: &[JsValue],
) -> Result<JsValue, JsError> {
    let class = match &this {
        JsValue::Undefined => "Undefined",
        JsValue::Null => "Null",
        _ => to_object(interp, &this)?.class(),
    };
    Ok(JsValue::String(JsString::from(format!("[object {}]", class))))
}

/// Object.prototype.valueOf
pub fn object_value_of(
    interp: &mut Interpreter,
    this: JsValue,
    _args: &[JsValue],
) -> Result<JsValue, JsError> {
    Ok(JsValue::Object(to_object(interp, &this)?))
}

/// Object.prototype.hasOwnProperty(V)
pub fn object_has_own_property(
    interp: &mut Interpreter,
    this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let name = to_string(interp, &arg(args, 0))?;
    let obj = to_object(interp, &this)?;
    Ok(JsValue::Boolean(obj.get_own_property(&name).is_some()))
}

fn require_object(value: &JsValue, caller: &str) -> Result<JsObjectRef, JsError> {
    match value {
        JsValue::Object(obj) => Ok(obj.cheap_clone()),
        _ => Err(JsError::type_error(format!(
            "{} called on non-object",
            caller
        ))),
    }
}

pub fn object_get_prototype_of(
    _interp: &mut Interpreter,
    _this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let obj = require_object(&arg(args, 0), "Object.getPrototypeOf")?;
    Ok(obj.prototype().map(JsValue::Object).unwrap_or(JsValue::Null))
}

pub fn object_get_own_property_descriptor(
    interp: &mut Interpreter,
    _this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let obj = require_object(&arg(args, 0), "Object.getOwnPropertyDescriptor")?;
    let name = to_string(interp, &arg(args, 1))?;
    let desc = obj.get_own_property(&name);
    from_property_descriptor(interp, desc.as_ref())
}

pub fn object_define_property(
    interp: &mut Interpreter,
    _this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let target = arg(args, 0);
    let obj = require_object(&target, "Object.defineProperty")?;
    let name = to_string(interp, &arg(args, 1))?;
    let desc = to_property_descriptor(interp, &arg(args, 2))?;
    obj.define_own_property(&name, desc, true)?;
    Ok(target)
}

pub fn object_prevent_extensions(
    _interp: &mut Interpreter,
    _this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let target = arg(args, 0);
    let obj = require_object(&target, "Object.preventExtensions")?;
    obj.borrow_mut().extensible = false;
    Ok(target)
}

pub fn object_is_extensible(
    _interp: &mut Interpreter,
    _this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let obj = require_object(&arg(args, 0), "Object.isExtensible")?;
    Ok(JsValue::Boolean(obj.is_extensible()))
}
