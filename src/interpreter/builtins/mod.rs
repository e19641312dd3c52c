//! Built-in objects
//!
//! Only the wrapper shapes that ToObject and ToPrimitive depend on, plus the
//! Object reflection functions over property descriptors.

pub mod boolean;
pub mod function;
pub mod global;
pub mod number;
pub mod object;
pub mod string;

use crate::object::JsObjectRef;
use crate::property::PropertyDescriptor;
use crate::value::{CheapClone, JsValue};

use super::Interpreter;

/// Install prototype methods, constructors and global value properties
pub fn init_realm(interp: &mut Interpreter) {
    object::init_object_prototype(interp);
    function::init_function_prototype(interp);
    boolean::init_boolean_prototype(interp);
    number::init_number_prototype(interp);
    string::init_string_prototype(interp);

    let object_ctor = object::create_object_constructor(interp);
    let boolean_ctor = boolean::create_boolean_constructor(interp);
    let number_ctor = number::create_number_constructor(interp);
    let string_ctor = string::create_string_constructor(interp);

    let global = interp.global_object();
    for (name, ctor) in [
        ("Object", object_ctor),
        ("Boolean", boolean_ctor),
        ("Number", number_ctor),
        ("String", string_ctor),
    ] {
        global.insert_property(
            name,
            PropertyDescriptor::data_with(JsValue::Object(ctor), true, false, true),
        );
    }
    global::init_global_values(interp);
}

/// Link a constructor and its prototype object
pub(crate) fn link_constructor(ctor: &JsObjectRef, proto: &JsObjectRef) {
    ctor.insert_property(
        "prototype",
        PropertyDescriptor::data_with(JsValue::Object(proto.cheap_clone()), false, false, false),
    );
    proto.insert_property(
        "constructor",
        PropertyDescriptor::data_with(JsValue::Object(ctor.cheap_clone()), true, false, true),
    );
}

/// The argument at `index`, or undefined
pub(crate) fn arg(args: &[JsValue], index: usize) -> JsValue {
    args.get(index).cloned().unwrap_or_default()
}
