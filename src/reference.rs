//! References and GetValue/PutValue
//!
//! A reference is the transient result of evaluating an identifier or a
//! member expression. It names a binding or a property without reading it;
//! [`get_value`] and [`put_value`] consume it.

use crate::conversion::to_object;
use crate::environment::EnvRef;
use crate::error::JsError;
use crate::interpreter::Interpreter;
use crate::object::JsObjectRef;
use crate::property::DescriptorKind;
use crate::value::{CheapClone, JsString, JsValue, Type};

/// What a reference is resolved against
#[derive(Debug, Clone)]
pub enum ReferenceBase {
    /// Name lookup that found no binding
    Unresolvable,
    /// Binding in the record of this environment
    Environment(EnvRef),
    /// Property of an object
    Object(JsObjectRef),
    /// Property of a Boolean, Number or String primitive, or of `null`
    Primitive(JsValue),
}

/// A resolved-but-unread name: base, referenced name and strictness
#[derive(Debug, Clone)]
pub struct Reference {
    base: ReferenceBase,
    name: JsString,
    strict: bool,
}

impl Reference {
    /// Property reference on `base`. An `undefined` base is unresolvable.
    pub fn property(base: JsValue, name: impl Into<JsString>, strict: bool) -> Self {
        let base = match base {
            JsValue::Undefined => ReferenceBase::Unresolvable,
            JsValue::Object(obj) => ReferenceBase::Object(obj),
            primitive => ReferenceBase::Primitive(primitive),
        };
        Self {
            base,
            name: name.into(),
            strict,
        }
    }

    pub fn environment(env: EnvRef, name: impl Into<JsString>, strict: bool) -> Self {
        Self {
            base: ReferenceBase::Environment(env),
            name: name.into(),
            strict,
        }
    }

    pub fn unresolvable(name: impl Into<JsString>, strict: bool) -> Self {
        Self {
            base: ReferenceBase::Unresolvable,
            name: name.into(),
            strict,
        }
    }

    /// GetBase(V)
    pub fn get_base(&self) -> &ReferenceBase {
        &self.base
    }

    /// GetReferencedName(V)
    pub fn get_referenced_name(&self) -> &JsString {
        &self.name
    }

    /// IsStrictReference(V)
    pub fn is_strict_reference(&self) -> bool {
        self.strict
    }

    /// HasPrimitiveBase(V): base is a Boolean, String or Number
    pub fn has_primitive_base(&self) -> bool {
        matches!(
            self.base,
            ReferenceBase::Primitive(JsValue::Boolean(_) | JsValue::Number(_) | JsValue::String(_))
        )
    }

    /// IsPropertyReference(V)
    pub fn is_property_reference(&self) -> bool {
        matches!(self.base, ReferenceBase::Object(_)) || self.has_primitive_base()
    }

    /// IsUnresolvableReference(V)
    pub fn is_unresolvable_reference(&self) -> bool {
        matches!(self.base, ReferenceBase::Unresolvable)
    }
}

/// Result of evaluating an expression: a language value or a reference
#[derive(Debug, Clone)]
pub enum Evaluated {
    Value(JsValue),
    Reference(Reference),
}

impl Evaluated {
    /// `Type(V)`, including the Reference type
    pub fn ty(&self) -> Type {
        match self {
            Evaluated::Value(v) => v.ty(),
            Evaluated::Reference(_) => Type::Reference,
        }
    }
}

impl From<JsValue> for Evaluated {
    fn from(v: JsValue) -> Self {
        Evaluated::Value(v)
    }
}

impl From<Reference> for Evaluated {
    fn from(r: Reference) -> Self {
        Evaluated::Reference(r)
    }
}

/// GetValue(V)
pub fn get_value(interp: &mut Interpreter, v: &Evaluated) -> Result<JsValue, JsError> {
    let reference = match v {
        Evaluated::Value(value) => return Ok(value.cheap_clone()),
        Evaluated::Reference(r) => r,
    };
    let name = reference.name.as_str();
    match &reference.base {
        ReferenceBase::Unresolvable => Err(JsError::reference_error(name)),
        ReferenceBase::Object(obj) => obj.get(interp, name),
        ReferenceBase::Primitive(base) => get_from_primitive(interp, base, name),
        ReferenceBase::Environment(env) => {
            env.record.get_binding_value(interp, name, reference.strict)
        }
    }
}

/// PutValue(V, W)
pub fn put_value(interp: &mut Interpreter, v: &Evaluated, w: JsValue) -> Result<(), JsError> {
    let Evaluated::Reference(reference) = v else {
        return Err(JsError::reference_error_with_message(
            "<value>",
            "invalid assignment target",
        ));
    };
    let name = reference.name.as_str();
    match &reference.base {
        ReferenceBase::Unresolvable => {
            if reference.strict {
                return Err(JsError::reference_error(name));
            }
            let global = interp.global_object();
            global.put(interp, name, w, false)
        }
        ReferenceBase::Object(obj) => obj.put(interp, name, w, reference.strict),
        ReferenceBase::Primitive(base) => put_on_primitive(interp, base, name, w, reference.strict),
        ReferenceBase::Environment(env) => {
            env.record
                .set_mutable_binding(interp, name, w, reference.strict)
        }
    }
}

/// `[[Get]]` with a primitive base. The wrapper is transient; getters see
/// the primitive itself as `this`.
fn get_from_primitive(
    interp: &mut Interpreter,
    base: &JsValue,
    name: &str,
) -> Result<JsValue, JsError> {
    let wrapper = to_object(interp, base)?;
    let Some(desc) = wrapper.get_property(name)? else {
        return Ok(JsValue::Undefined);
    };
    match desc.kind {
        DescriptorKind::Data { value, .. } => Ok(value),
        DescriptorKind::Accessor { get: None, .. } => Ok(JsValue::Undefined),
        DescriptorKind::Accessor { get: Some(getter), .. } => {
            interp.call_function(&getter, base.cheap_clone(), &[])
        }
    }
}

/// `[[Put]]` with a primitive base. Nothing is ever stored on the transient
/// wrapper; only an inherited setter can observe the assignment.
fn put_on_primitive(
    interp: &mut Interpreter,
    base: &JsValue,
    name: &str,
    w: JsValue,
    throw: bool,
) -> Result<(), JsError> {
    let wrapper = to_object(interp, base)?;
    let reject = |reason: &str| -> Result<(), JsError> {
        if throw {
            Err(JsError::type_error(format!(
                "Cannot assign to property '{}' of primitive: {}",
                name, reason
            )))
        } else {
            Ok(())
        }
    };

    if !wrapper.can_put(name)? {
        return reject("property is read-only");
    }
    if wrapper
        .get_own_property(name)
        .is_some_and(|d| d.is_data())
    {
        return reject("value would be discarded");
    }
    if let Some(desc) = wrapper.get_property(name)? {
        if let DescriptorKind::Accessor { set: Some(setter), .. } = desc.kind {
            interp.call_function(&setter, base.cheap_clone(), &[w])?;
            return Ok(());
        }
    }
    reject("value would be discarded")
}
