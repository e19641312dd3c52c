//! Global value properties

use crate::interpreter::Interpreter;
use crate::property::PropertyDescriptor;
use crate::value::JsValue;

/// Install NaN, Infinity and undefined as non-writable, non-enumerable,
/// non-configurable properties of the global object
pub fn init_global_values(interp: &mut Interpreter) {
    let global = interp.global_object();
    for (name, value) in [
        ("NaN", JsValue::Number(f64::NAN)),
        ("Infinity", JsValue::Number(f64::INFINITY)),
        ("undefined", JsValue::Undefined),
    ] {
        global.insert_property(name, PropertyDescriptor::data_with(value, false, false, false));
    }
}
