//! Type conversion abstract operations
//!
//! ToPrimitive, ToBoolean, ToNumber, ToString, ToObject and
//! CheckObjectCoercible, plus the integer conversions built on ToNumber.
//! Operations that may call back into user code take the interpreter.

use crate::error::JsError;
use crate::interpreter::Interpreter;
use crate::object::{Hint, JsObject, JsObjectRef, ObjectKind};
use crate::prelude::math;
use crate::property::PropertyDescriptor;
use crate::value::{CheapClone, JsString, JsValue};

const TWO_POW_32: f64 = 4_294_967_296.0;
const TWO_POW_31: f64 = 2_147_483_648.0;
const TWO_POW_16: f64 = 65_536.0;

// ═══════════════════════════════════════════════════════════════════════════════
// ToPrimitive / ToBoolean
// ═══════════════════════════════════════════════════════════════════════════════

/// ToPrimitive(input, PreferredType)
pub fn to_primitive(
    interp: &mut Interpreter,
    value: &JsValue,
    hint: Option<Hint>,
) -> Result<JsValue, JsError> {
    match value {
        JsValue::Object(obj) => obj.default_value(interp, hint),
        _ => Ok(value.cheap_clone()),
    }
}

/// ToBoolean(argument)
pub fn to_boolean(value: &JsValue) -> bool {
    match value {
        JsValue::Undefined | JsValue::Null => false,
        JsValue::Boolean(b) => *b,
        JsValue::Number(n) => !(*n == 0.0 || n.is_nan()),
        JsValue::String(s) => !s.is_empty(),
        JsValue::Object(_) => true,
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// ToNumber
// ═══════════════════════════════════════════════════════════════════════════════

/// ToNumber(argument)
pub fn to_number(interp: &mut Interpreter, value: &JsValue) -> Result<f64, JsError> {
    match value {
        JsValue::Object(_) => {
            let prim = to_primitive(interp, value, Some(Hint::Number))?;
            Ok(primitive_to_number(&prim))
        }
        _ => Ok(primitive_to_number(value)),
    }
}

/// ToNumber on a value already known to be primitive. Objects yield NaN.
pub fn primitive_to_number(value: &JsValue) -> f64 {
    match value {
        JsValue::Undefined => f64::NAN,
        JsValue::Null => 0.0,
        JsValue::Boolean(true) => 1.0,
        JsValue::Boolean(false) => 0.0,
        JsValue::Number(n) => *n,
        JsValue::String(s) => string_to_number(s.as_str()),
        JsValue::Object(_) => f64::NAN,
    }
}

/// WhiteSpace and LineTerminator code points
pub fn is_js_whitespace(c: char) -> bool {
    match c {
        '\t' | '\u{0B}' | '\u{0C}' | ' ' | '\u{A0}' | '\u{FEFF}' => true,
        '\n' | '\r' | '\u{2028}' | '\u{2029}' => true,
        // Remaining Unicode space separators; U+0085 is not JS whitespace
        '\u{85}' => false,
        c => c.is_whitespace(),
    }
}

/// ToNumber applied to the String type (StringNumericLiteral grammar).
///
/// Anything outside the grammar is NaN; an empty or all-whitespace string
/// is 0.
pub fn string_to_number(s: &str) -> f64 {
    let trimmed = s.trim_matches(is_js_whitespace);
    if trimmed.is_empty() {
        return 0.0;
    }

    if let Some(hex) = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        return parse_hex_digits(hex);
    }

    let (negative, unsigned) = if let Some(rest) = trimmed.strip_prefix('-') {
        (true, rest)
    } else if let Some(rest) = trimmed.strip_prefix('+') {
        (false, rest)
    } else {
        (false, trimmed)
    };

    if unsigned == "Infinity" {
        return if negative {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }

    if !is_unsigned_decimal_literal(unsigned) {
        return f64::NAN;
    }
    // Grammar already validated, so the parse cannot fail
    let magnitude = unsigned.parse::<f64>().unwrap_or(f64::NAN);
    if negative { -magnitude } else { magnitude }
}

fn parse_hex_digits(digits: &str) -> f64 {
    if digits.is_empty() {
        return f64::NAN;
    }
    let mut value = 0.0f64;
    for c in digits.chars() {
        match c.to_digit(16) {
            Some(d) => value = value * 16.0 + d as f64,
            None => return f64::NAN,
        }
    }
    value
}

/// StrUnsignedDecimalLiteral without the `Infinity` alternative
fn is_unsigned_decimal_literal(s: &str) -> bool {
    let mut chars = s.chars().peekable();
    let mut int_digits = 0usize;
    while chars.peek().is_some_and(char::is_ascii_digit) {
        chars.next();
        int_digits += 1;
    }
    let mut frac_digits = 0usize;
    if chars.peek() == Some(&'.') {
        chars.next();
        while chars.peek().is_some_and(char::is_ascii_digit) {
            chars.next();
            frac_digits += 1;
        }
    }
    if int_digits + frac_digits == 0 {
        return false;
    }
    if matches!(chars.peek(), Some('e' | 'E')) {
        chars.next();
        if matches!(chars.peek(), Some('+' | '-')) {
            chars.next();
        }
        let mut exp_digits = 0usize;
        while chars.peek().is_some_and(char::is_ascii_digit) {
            chars.next();
            exp_digits += 1;
        }
        if exp_digits == 0 {
            return false;
        }
    }
    chars.next().is_none()
}

// ═══════════════════════════════════════════════════════════════════════════════
// Integer conversions
// ═══════════════════════════════════════════════════════════════════════════════

/// ToInteger(argument)
pub fn to_integer(interp: &mut Interpreter, value: &JsValue) -> Result<f64, JsError> {
    Ok(number_to_integer(to_number(interp, value)?))
}

/// ToInteger applied to a number
pub fn number_to_integer(n: f64) -> f64 {
    if n.is_nan() {
        return 0.0;
    }
    if n == 0.0 || n.is_infinite() {
        return n;
    }
    math::trunc(n)
}

/// Reduce a number modulo 2^bits into `[0, 2^bits)`; NaN, zeros and
/// infinities map to +0.
fn modulo_integer(n: f64, modulus: f64) -> f64 {
    if !n.is_finite() || n == 0.0 {
        return 0.0;
    }
    let m = math::fmod(math::trunc(n), modulus);
    if m < 0.0 { m + modulus } else { m }
}

/// ToInt32 applied to a number
pub fn number_to_int32(n: f64) -> i32 {
    let m = modulo_integer(n, TWO_POW_32);
    if m >= TWO_POW_31 {
        (m - TWO_POW_32) as i32
    } else {
        m as i32
    }
}

/// ToUint32 applied to a number
pub fn number_to_uint32(n: f64) -> u32 {
    modulo_integer(n, TWO_POW_32) as u32
}

/// ToUint16 applied to a number
pub fn number_to_uint16(n: f64) -> u16 {
    modulo_integer(n, TWO_POW_16) as u16
}

/// ToInt32(argument)
pub fn to_int32(interp: &mut Interpreter, value: &JsValue) -> Result<i32, JsError> {
    Ok(number_to_int32(to_number(interp, value)?))
}

/// ToUint32(argument)
pub fn to_uint32(interp: &mut Interpreter, value: &JsValue) -> Result<u32, JsError> {
    Ok(number_to_uint32(to_number(interp, value)?))
}

/// ToUint16(argument)
pub fn to_uint16(interp: &mut Interpreter, value: &JsValue) -> Result<u16, JsError> {
    Ok(number_to_uint16(to_number(interp, value)?))
}

// ═══════════════════════════════════════════════════════════════════════════════
// ToString
// ═══════════════════════════════════════════════════════════════════════════════

/// ToString(argument)
pub fn to_string(interp: &mut Interpreter, value: &JsValue) -> Result<JsString, JsError> {
    match value {
        JsValue::Object(_) => {
            let prim = to_primitive(interp, value, Some(Hint::String))?;
            Ok(primitive_to_string(&prim))
        }
        _ => Ok(primitive_to_string(value)),
    }
}

/// ToString on a value already known to be primitive
pub fn primitive_to_string(value: &JsValue) -> JsString {
    match value {
        JsValue::Undefined => JsString::from("undefined"),
        JsValue::Null => JsString::from("null"),
        JsValue::Boolean(true) => JsString::from("true"),
        JsValue::Boolean(false) => JsString::from("false"),
        JsValue::Number(n) => number_to_string(*n),
        JsValue::String(s) => s.cheap_clone(),
        JsValue::Object(obj) => JsString::from(format!("[object {}]", obj.class())),
    }
}

/// ToString applied to the Number type
pub fn number_to_string(n: f64) -> JsString {
    if n.is_nan() {
        return JsString::from("NaN");
    }
    // Covers -0 as well
    if n == 0.0 {
        return JsString::from("0");
    }
    if n.is_infinite() {
        return JsString::from(if n > 0.0 { "Infinity" } else { "-Infinity" });
    }
    let mut buffer = ryu_js::Buffer::new();
    JsString::from(buffer.format_finite(n))
}

// ═══════════════════════════════════════════════════════════════════════════════
// ToObject / CheckObjectCoercible
// ═══════════════════════════════════════════════════════════════════════════════

/// ToObject(argument)
///
/// Primitives get a fresh wrapper with `[[PrimitiveValue]]` set and the
/// realm's matching prototype; objects are returned as is.
pub fn to_object(interp: &mut Interpreter, value: &JsValue) -> Result<JsObjectRef, JsError> {
    let realm = interp.realm();
    let (proto, kind) = match value {
        JsValue::Undefined | JsValue::Null => {
            return Err(JsError::type_error(format!(
                "Cannot convert {:?} to object",
                value
            )));
        }
        JsValue::Object(obj) => return Ok(obj.cheap_clone()),
        JsValue::Boolean(b) => (realm.boolean_prototype.cheap_clone(), ObjectKind::Boolean(*b)),
        JsValue::Number(n) => (realm.number_prototype.cheap_clone(), ObjectKind::Number(*n)),
        JsValue::String(s) => (
            realm.string_prototype.cheap_clone(),
            ObjectKind::String(s.cheap_clone()),
        ),
    };
    let wrapper = JsObjectRef::new(JsObject::with_prototype(Some(proto), kind));
    if let JsValue::String(s) = value {
        wrapper.insert_property(
            "length",
            PropertyDescriptor::data_with(
                JsValue::Number(s.utf16_len() as f64),
                false,
                false,
                false,
            ),
        );
    }
    Ok(wrapper)
}

/// CheckObjectCoercible(argument)
pub fn check_object_coercible(value: &JsValue) -> Result<(), JsError> {
    match value {
        JsValue::Undefined | JsValue::Null => Err(JsError::type_error(format!(
            "Cannot read properties of {:?}",
            value
        ))),
        _ => Ok(()),
    }
}
