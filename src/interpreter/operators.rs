//! Operator semantics on values
//!
//! Every function here takes operands that are already dereferenced with
//! GetValue, in evaluation order.

use crate::ast::BinaryOp;
use crate::conversion::{
    primitive_to_number, primitive_to_string, to_boolean, to_number, to_primitive, to_string,
};
use crate::error::JsError;
use crate::object::Hint;
use crate::prelude::math;
use crate::reference::{Evaluated, get_value};
use crate::value::{JsString, JsValue};

use super::Interpreter;

/// The addition operator `+`
///
/// Both operands go through ToPrimitive without a hint. If either result is
/// a String the operation is concatenation, otherwise IEEE-754 addition.
pub fn add(interp: &mut Interpreter, left: &JsValue, right: &JsValue) -> Result<JsValue, JsError> {
    let lprim = to_primitive(interp, left, None)?;
    let rprim = to_primitive(interp, right, None)?;
    if lprim.is_string() || rprim.is_string() {
        let s = primitive_to_string(&lprim) + &primitive_to_string(&rprim);
        return Ok(JsValue::String(s));
    }
    Ok(JsValue::Number(
        primitive_to_number(&lprim) + primitive_to_number(&rprim),
    ))
}

/// `-`, `*`, `/` and `%` after ToNumber on both operands
pub fn arithmetic(
    interp: &mut Interpreter,
    op: BinaryOp,
    left: &JsValue,
    right: &JsValue,
) -> Result<JsValue, JsError> {
    let l = to_number(interp, left)?;
    let r = to_number(interp, right)?;
    let n = match op {
        BinaryOp::Sub => l - r,
        BinaryOp::Mul => l * r,
        BinaryOp::Div => l / r,
        BinaryOp::Mod => math::fmod(l, r),
        _ => {
            return Err(JsError::internal_error(format!(
                "{:?} is not an arithmetic operator",
                op
            )));
        }
    };
    Ok(JsValue::Number(n))
}

/// The abstract equality comparison `x == y`
pub fn abstract_equals(
    interp: &mut Interpreter,
    x: &JsValue,
    y: &JsValue,
) -> Result<bool, JsError> {
    if x.ty() == y.ty() {
        return Ok(x.strict_equals(y));
    }
    match (x, y) {
        (JsValue::Null, JsValue::Undefined) | (JsValue::Undefined, JsValue::Null) => Ok(true),
        (JsValue::Number(n), JsValue::String(s)) | (JsValue::String(s), JsValue::Number(n)) => {
            Ok(*n == primitive_to_number(&JsValue::String(s.clone())))
        }
        (JsValue::Boolean(_), _) => {
            let nx = JsValue::Number(primitive_to_number(x));
            abstract_equals(interp, &nx, y)
        }
        (_, JsValue::Boolean(_)) => {
            let ny = JsValue::Number(primitive_to_number(y));
            abstract_equals(interp, x, &ny)
        }
        (JsValue::Number(_) | JsValue::String(_), JsValue::Object(_)) => {
            let py = to_primitive(interp, y, None)?;
            abstract_equals(interp, x, &py)
        }
        (JsValue::Object(_), JsValue::Number(_) | JsValue::String(_)) => {
            let px = to_primitive(interp, x, None)?;
            abstract_equals(interp, &px, y)
        }
        _ => Ok(false),
    }
}

/// The abstract relational comparison `x < y`
///
/// `None` stands for undefined (a NaN was involved). `left_first` controls
/// the order in which the operands are converted to primitives.
pub fn abstract_relational_comparison(
    interp: &mut Interpreter,
    x: &JsValue,
    y: &JsValue,
    left_first: bool,
) -> Result<Option<bool>, JsError> {
    let (px, py) = if left_first {
        let px = to_primitive(interp, x, Some(Hint::Number))?;
        let py = to_primitive(interp, y, Some(Hint::Number))?;
        (px, py)
    } else {
        let py = to_primitive(interp, y, Some(Hint::Number))?;
        let px = to_primitive(interp, x, Some(Hint::Number))?;
        (px, py)
    };

    if let (JsValue::String(a), JsValue::String(b)) = (&px, &py) {
        // Code unit order, a prefix sorts first
        return Ok(Some(a.encode_utf16().lt(b.encode_utf16())));
    }

    let nx = primitive_to_number(&px);
    let ny = primitive_to_number(&py);
    if nx.is_nan() || ny.is_nan() {
        return Ok(None);
    }
    Ok(Some(nx < ny))
}

/// `instanceof`
pub fn instance_of(
    interp: &mut Interpreter,
    left: &JsValue,
    right: &JsValue,
) -> Result<bool, JsError> {
    let JsValue::Object(func) = right else {
        return Err(JsError::type_error(
            "Right-hand side of 'instanceof' is not an object",
        ));
    };
    if !func.is_callable() {
        return Err(JsError::type_error(
            "Right-hand side of 'instanceof' is not callable",
        ));
    }
    interp.has_instance(func, left)
}

/// `in`
pub fn in_operator(
    interp: &mut Interpreter,
    left: &JsValue,
    right: &JsValue,
) -> Result<bool, JsError> {
    let JsValue::Object(obj) = right else {
        return Err(JsError::type_error(
            "Cannot use 'in' operator to search for a key in a primitive",
        ));
    };
    let name = to_string(interp, left)?;
    obj.has_property(&name)
}

/// Apply a binary operator to two dereferenced operands
pub fn apply_binary(
    interp: &mut Interpreter,
    op: BinaryOp,
    left: &JsValue,
    right: &JsValue,
) -> Result<JsValue, JsError> {
    let result = match op {
        BinaryOp::Add => return add(interp, left, right),
        BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => {
            return arithmetic(interp, op, left, right);
        }
        BinaryOp::Eq => abstract_equals(interp, left, right)?,
        BinaryOp::NotEq => !abstract_equals(interp, left, right)?,
        BinaryOp::StrictEq => left.strict_equals(right),
        BinaryOp::StrictNotEq => !left.strict_equals(right),
        BinaryOp::Lt => {
            abstract_relational_comparison(interp, left, right, true)?.unwrap_or(false)
        }
        BinaryOp::Gt => {
            abstract_relational_comparison(interp, right, left, false)?.unwrap_or(false)
        }
        BinaryOp::LtEq => {
            let r = abstract_relational_comparison(interp, right, left, false)?;
            r == Some(false)
        }
        BinaryOp::GtEq => {
            let r = abstract_relational_comparison(interp, left, right, true)?;
            r == Some(false)
        }
        BinaryOp::In => in_operator(interp, left, right)?,
        BinaryOp::Instanceof => instance_of(interp, left, right)?,
    };
    Ok(JsValue::Boolean(result))
}

/// `typeof` on an evaluated operand; an unresolvable reference is
/// "undefined" instead of a ReferenceError
pub fn type_of(interp: &mut Interpreter, operand: &Evaluated) -> Result<JsString, JsError> {
    if let Evaluated::Reference(r) = operand {
        if r.is_unresolvable_reference() {
            return Ok(JsString::from("undefined"));
        }
    }
    let value = get_value(interp, operand)?;
    Ok(JsString::from(value.type_of()))
}

/// Logical NOT `!`
pub fn logical_not(value: &JsValue) -> JsValue {
    JsValue::Boolean(!to_boolean(value))
}
