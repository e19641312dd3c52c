//! Number built-in constructor and prototype methods

use crate::conversion::{number_to_string, to_integer, to_number, to_object};
use crate::error::JsError;
use crate::interpreter::Interpreter;
use crate::object::{JsObjectRef, ObjectKind};
use crate::prelude::math;
use crate::value::{CheapClone, JsString, JsValue};

use super::{arg, link_constructor};

/// Initialize Number.prototype with toString, valueOf
pub fn init_number_prototype(interp: &mut Interpreter) {
    let proto = interp.realm().number_prototype.cheap_clone();

    interp.register_method(&proto, "toString", number_to_string_method, 1);
    interp.register_method(&proto, "valueOf", number_value_of, 0);
}

/// Create Number constructor with prototype property
pub fn create_number_constructor(interp: &mut Interpreter) -> JsObjectRef {
    let ctor =
        interp.create_native_constructor("Number", number_constructor_fn, number_construct, 1);
    let proto = interp.realm().number_prototype.cheap_clone();
    link_constructor(&ctor, &proto);
    ctor
}

fn number_argument(interp: &mut Interpreter, args: &[JsValue]) -> Result<f64, JsError> {
    match args.first() {
        Some(v) => to_number(interp, v),
        None => Ok(0.0),
    }
}

/// Number(value) called as a function converts to a primitive number
pub fn number_constructor_fn(
    interp: &mut Interpreter,
    _this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    Ok(JsValue::Number(number_argument(interp, args)?))
}

/// new Number(value) creates a Number wrapper object
pub fn number_construct(
    interp: &mut Interpreter,
    _this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let n = number_argument(interp, args)?;
    Ok(JsValue::Object(to_object(interp, &JsValue::Number(n))?))
}

/// Number.prototype.toString(radix)
pub fn number_to_string_method(
    interp: &mut Interpreter,
    this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let n = this_number_value(&this)?;
    let radix = match arg(args, 0) {
        JsValue::Undefined => 10.0,
        r => to_integer(interp, &r)?,
    };

    if !(2.0..=36.0).contains(&radix) {
        return Err(JsError::range_error(
            "toString() radix must be between 2 and 36",
        ));
    }

    if radix == 10.0 || !n.is_finite() {
        return Ok(JsValue::String(number_to_string(n)));
    }
    Ok(JsValue::String(JsString::from(format_radix(n, radix as u32))))
}

/// Format a finite number in a radix other than 10.
///
/// Fraction digits are emitted until they can no longer distinguish the
/// value from its neighbouring doubles, so the result reads back exactly.
fn format_radix(n: f64, radix: u32) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

    let digit = |d: u32| DIGITS.get(d as usize).map(|&c| c as char).unwrap_or('0');
    let negative = n < 0.0;
    let magnitude = math::abs(n);
    let base = radix as f64;
    let mut int_part = math::floor(magnitude);
    let mut fraction = magnitude - int_part;

    // Half the distance to the next double, never below the smallest one
    let mut delta = (0.5 * (next_up(magnitude) - magnitude)).max(next_up(0.0));
    let mut frac_digits: Vec<u32> = Vec::new();
    if fraction >= delta {
        loop {
            fraction *= base;
            delta *= base;
            let d = math::floor(fraction);
            frac_digits.push(d as u32);
            fraction -= d;
            let past_half = fraction > 0.5 || (fraction == 0.5 && (d as u32) & 1 == 1);
            if past_half && fraction + delta > 1.0 {
                round_up_digits(&mut frac_digits, &mut int_part, radix);
                break;
            }
            if fraction < delta {
                break;
            }
        }
    }

    let mut int_digits = Vec::new();
    loop {
        let d = math::fmod(int_part, base) as u32;
        int_digits.push(digit(d));
        int_part = math::floor(int_part / base);
        if int_part < 1.0 {
            break;
        }
    }

    let mut result = String::new();
    if negative {
        result.push('-');
    }
    result.extend(int_digits.iter().rev());
    if !frac_digits.is_empty() {
        result.push('.');
        result.extend(frac_digits.iter().map(|&d| digit(d)));
    }
    result
}

/// Add one unit in the last fraction digit, carrying into the integer part
fn round_up_digits(digits: &mut Vec<u32>, int_part: &mut f64, radix: u32) {
    while let Some(last) = digits.pop() {
        if last + 1 < radix {
            digits.push(last + 1);
            return;
        }
    }
    *int_part += 1.0;
}

/// The next representable double above a finite non-negative `x`
fn next_up(x: f64) -> f64 {
    f64::from_bits(x.to_bits() + 1)
}

/// Number.prototype.valueOf()
pub fn number_value_of(
    _interp: &mut Interpreter,
    this: JsValue,
    _args: &[JsValue],
) -> Result<JsValue, JsError> {
    Ok(JsValue::Number(this_number_value(&this)?))
}

/// Helper to extract number value from `this`
fn this_number_value(this: &JsValue) -> Result<f64, JsError> {
    match this {
        JsValue::Number(n) => Ok(*n),
        JsValue::Object(obj) => match obj.borrow().kind {
            ObjectKind::Number(n) => Ok(n),
            _ => Err(JsError::type_error(
                "Number.prototype method called on incompatible receiver",
            )),
        },
        _ => Err(JsError::type_error(
            "Number.prototype method called on incompatible receiver",
        )),
    }
}
