//! Property descriptors
//!
//! A stored property is always a fully populated [`PropertyDescriptor`]: a
//! tagged data or accessor slot plus the shared `enumerable`/`configurable`
//! attributes. The partial descriptor handed to `[[DefineOwnProperty]]` is a
//! separate [`PropertyDescriptorPatch`] whose fields are independently present
//! or absent, so "present and false" never collapses into "absent".

use crate::error::JsError;
use crate::interpreter::Interpreter;
use crate::object::JsObjectRef;
use crate::value::{CheapClone, JsValue};

/// Slot part of a fully populated descriptor
#[derive(Debug, Clone)]
pub enum DescriptorKind {
    Data {
        value: JsValue,
        writable: bool,
    },
    /// Absent getter/setter functions are stored as `None` (`undefined` in script)
    Accessor {
        get: Option<JsObjectRef>,
        set: Option<JsObjectRef>,
    },
}

/// Fully populated property descriptor as stored on an object
#[derive(Debug, Clone)]
pub struct PropertyDescriptor {
    pub kind: DescriptorKind,
    pub enumerable: bool,
    pub configurable: bool,
}

impl PropertyDescriptor {
    /// Writable, enumerable, configurable data property (plain assignment)
    pub fn data(value: JsValue) -> Self {
        Self::data_with(value, true, true, true)
    }

    /// Data property with explicit attributes
    pub fn data_with(value: JsValue, writable: bool, enumerable: bool, configurable: bool) -> Self {
        Self {
            kind: DescriptorKind::Data { value, writable },
            enumerable,
            configurable,
        }
    }

    /// Accessor property with explicit attributes
    pub fn accessor(
        get: Option<JsObjectRef>,
        set: Option<JsObjectRef>,
        enumerable: bool,
        configurable: bool,
    ) -> Self {
        Self {
            kind: DescriptorKind::Accessor { get, set },
            enumerable,
            configurable,
        }
    }

    pub fn is_data(&self) -> bool {
        matches!(self.kind, DescriptorKind::Data { .. })
    }

    pub fn is_accessor(&self) -> bool {
        matches!(self.kind, DescriptorKind::Accessor { .. })
    }

    /// Value of a data property; `None` for accessors
    pub fn value(&self) -> Option<&JsValue> {
        match &self.kind {
            DescriptorKind::Data { value, .. } => Some(value),
            DescriptorKind::Accessor { .. } => None,
        }
    }

    /// `[[Writable]]` of a data property; `None` for accessors
    pub fn writable(&self) -> Option<bool> {
        match &self.kind {
            DescriptorKind::Data { writable, .. } => Some(*writable),
            DescriptorKind::Accessor { .. } => None,
        }
    }

    pub fn getter(&self) -> Option<&JsObjectRef> {
        match &self.kind {
            DescriptorKind::Accessor { get, .. } => get.as_ref(),
            DescriptorKind::Data { .. } => None,
        }
    }

    pub fn setter(&self) -> Option<&JsObjectRef> {
        match &self.kind {
            DescriptorKind::Accessor { set, .. } => set.as_ref(),
            DescriptorKind::Data { .. } => None,
        }
    }

    /// The patch that, applied to an absent property, recreates this descriptor
    pub fn to_patch(&self) -> PropertyDescriptorPatch {
        let mut patch = PropertyDescriptorPatch {
            enumerable: Some(self.enumerable),
            configurable: Some(self.configurable),
            ..Default::default()
        };
        match &self.kind {
            DescriptorKind::Data { value, writable } => {
                patch.value = Some(value.cheap_clone());
                patch.writable = Some(*writable);
            }
            DescriptorKind::Accessor { get, set } => {
                patch.get = Some(get.clone());
                patch.set = Some(set.clone());
            }
        }
        patch
    }
}

/// Partial descriptor used by `[[DefineOwnProperty]]`.
///
/// Each field is `None` when absent. `get`/`set` are double options: the outer
/// layer is presence, the inner one distinguishes a function from an explicit
/// `undefined`.
#[derive(Debug, Clone, Default)]
pub struct PropertyDescriptorPatch {
    /// \[\[Value]]
    pub value: Option<JsValue>,
    /// \[\[Writable]]
    pub writable: Option<bool>,
    /// \[\[Get]]
    pub get: Option<Option<JsObjectRef>>,
    /// \[\[Set]]
    pub set: Option<Option<JsObjectRef>>,
    /// \[\[Enumerable]]
    pub enumerable: Option<bool>,
    /// \[\[Configurable]]
    pub configurable: Option<bool>,
}

impl PropertyDescriptorPatch {
    /// Patch with only a `[[Value]]` field
    pub fn value(value: JsValue) -> Self {
        Self {
            value: Some(value),
            ..Default::default()
        }
    }

    /// Patch describing a complete data property
    pub fn data(value: JsValue, writable: bool, enumerable: bool, configurable: bool) -> Self {
        Self {
            value: Some(value),
            writable: Some(writable),
            enumerable: Some(enumerable),
            configurable: Some(configurable),
            ..Default::default()
        }
    }

    /// Patch describing a complete accessor property
    pub fn accessor(
        get: Option<JsObjectRef>,
        set: Option<JsObjectRef>,
        enumerable: bool,
        configurable: bool,
    ) -> Self {
        Self {
            get: Some(get),
            set: Some(set),
            enumerable: Some(enumerable),
            configurable: Some(configurable),
            ..Default::default()
        }
    }

    /// IsAccessorDescriptor: has a `[[Get]]` or a `[[Set]]` field
    pub fn is_accessor_descriptor(&self) -> bool {
        self.get.is_some() || self.set.is_some()
    }

    /// IsDataDescriptor: has a `[[Value]]` or a `[[Writable]]` field.
    /// Presence is what counts; `writable: Some(false)` is a data field.
    pub fn is_data_descriptor(&self) -> bool {
        self.value.is_some() || self.writable.is_some()
    }

    /// IsGenericDescriptor: neither accessor nor data fields
    pub fn is_generic_descriptor(&self) -> bool {
        !self.is_accessor_descriptor() && !self.is_data_descriptor()
    }

    /// True when every field is absent
    pub fn is_empty(&self) -> bool {
        self.is_generic_descriptor() && self.enumerable.is_none() && self.configurable.is_none()
    }

    /// Build the stored descriptor for a property that does not exist yet,
    /// filling absent fields with their defaults.
    pub fn into_new_descriptor(self) -> PropertyDescriptor {
        let enumerable = self.enumerable.unwrap_or(false);
        let configurable = self.configurable.unwrap_or(false);
        if self.is_generic_descriptor() || self.is_data_descriptor() {
            PropertyDescriptor::data_with(
                self.value.unwrap_or_default(),
                self.writable.unwrap_or(false),
                enumerable,
                configurable,
            )
        } else {
            PropertyDescriptor::accessor(
                self.get.flatten(),
                self.set.flatten(),
                enumerable,
                configurable,
            )
        }
    }
}

/// IsDataDescriptor(Desc) on a possibly absent stored descriptor
pub fn is_data_descriptor(desc: Option<&PropertyDescriptor>) -> bool {
    desc.is_some_and(PropertyDescriptor::is_data)
}

/// IsAccessorDescriptor(Desc) on a possibly absent stored descriptor
pub fn is_accessor_descriptor(desc: Option<&PropertyDescriptor>) -> bool {
    desc.is_some_and(PropertyDescriptor::is_accessor)
}

/// FromPropertyDescriptor: reflect a stored descriptor as a plain object,
/// or `undefined` when absent.
pub fn from_property_descriptor(
    interp: &mut Interpreter,
    desc: Option<&PropertyDescriptor>,
) -> Result<JsValue, JsError> {
    let Some(desc) = desc else {
        return Ok(JsValue::Undefined);
    };
    let obj = interp.create_object();
    let field = |v: JsValue| PropertyDescriptorPatch::data(v, true, true, true);
    match &desc.kind {
        DescriptorKind::Data { value, writable } => {
            obj.define_own_property("value", field(value.cheap_clone()), false)?;
            obj.define_own_property("writable", field(JsValue::Boolean(*writable)), false)?;
        }
        DescriptorKind::Accessor { get, set } => {
            let get = get.clone().map(JsValue::Object).unwrap_or_default();
            let set = set.clone().map(JsValue::Object).unwrap_or_default();
            obj.define_own_property("get", field(get), false)?;
            obj.define_own_property("set", field(set), false)?;
        }
    }
    obj.define_own_property("enumerable", field(JsValue::Boolean(desc.enumerable)), false)?;
    obj.define_own_property(
        "configurable",
        field(JsValue::Boolean(desc.configurable)),
        false,
    )?;
    Ok(JsValue::Object(obj))
}

/// ToPropertyDescriptor: read a descriptor patch from a plain object.
///
/// Throws a TypeError when `obj` is not an object, when a getter/setter is
/// neither callable nor undefined, or when both accessor and data fields are
/// present.
pub fn to_property_descriptor(
    interp: &mut Interpreter,
    obj: &JsValue,
) -> Result<PropertyDescriptorPatch, JsError> {
    let JsValue::Object(obj) = obj else {
        return Err(JsError::type_error("Property description must be an object"));
    };
    let mut patch = PropertyDescriptorPatch::default();

    if obj.has_property("enumerable")? {
        let v = obj.get(interp, "enumerable")?;
        patch.enumerable = Some(crate::conversion::to_boolean(&v));
    }
    if obj.has_property("configurable")? {
        let v = obj.get(interp, "configurable")?;
        patch.configurable = Some(crate::conversion::to_boolean(&v));
    }
    if obj.has_property("value")? {
        patch.value = Some(obj.get(interp, "value")?);
    }
    if obj.has_property("writable")? {
        let v = obj.get(interp, "writable")?;
        patch.writable = Some(crate::conversion::to_boolean(&v));
    }
    if obj.has_property("get")? {
        patch.get = Some(accessor_function(obj.get(interp, "get")?, "Getter")?);
    }
    if obj.has_property("set")? {
        patch.set = Some(accessor_function(obj.get(interp, "set")?, "Setter")?);
    }

    if patch.is_accessor_descriptor() && patch.is_data_descriptor() {
        return Err(JsError::type_error(
            "Invalid property descriptor. Cannot both specify accessors and a value or writable attribute",
        ));
    }
    Ok(patch)
}

fn accessor_function(value: JsValue, what: &str) -> Result<Option<JsObjectRef>, JsError> {
    match value {
        JsValue::Undefined => Ok(None),
        JsValue::Object(f) if f.is_callable() => Ok(Some(f)),
        other => Err(JsError::type_error(format!(
            "{} must be a function: {:?}",
            what, other
        ))),
    }
}
