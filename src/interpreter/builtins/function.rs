//! Function.prototype and the \[\[ThrowTypeError]] function

use crate::error::JsError;
use crate::interpreter::Interpreter;
use crate::value::{CheapClone, JsValue};

/// Initialize Function.prototype with call
pub fn init_function_prototype(interp: &mut Interpreter) {
    let proto = interp.realm().function_prototype.cheap_clone();
    interp.register_method(&proto, "call", function_call, 1);
}

/// Function.prototype itself: accepts any arguments and returns undefined
pub fn function_prototype_call(
    _interp: &mut Interpreter,
    _this: JsValue,
    _args: &[JsValue],
) -> Result<JsValue, JsError> {
    Ok(JsValue::Undefined)
}

/// Function.prototype.call(thisArg, ...args)
pub fn function_call(
    interp: &mut Interpreter,
    this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let JsValue::Object(func) = &this else {
        return Err(JsError::type_error("Function.prototype.call called on non-function"));
    };
    if !func.is_callable() {
        return Err(JsError::type_error("Function.prototype.call called on non-function"));
    }
    let this_arg = args.first().cloned().unwrap_or_default();
    let rest = args.get(1..).unwrap_or(&[]);
    interp.call_function(func, this_arg, rest)
}

/// \[\[ThrowTypeError]]: guards `caller`/`arguments` of strict functions
pub fn throw_type_error(
    _interp: &mut Interpreter,
    _this: JsValue,
    _args: &[JsValue],
) -> Result<JsValue, JsError> {
    Err(JsError::type_error(
        "'caller', 'callee', and 'arguments' properties may not be accessed on strict mode functions or the arguments objects for calls to them",
    ))
}
