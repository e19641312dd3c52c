//! Objects and their internal methods
//!
//! An object is a shared, interior-mutable record: prototype link,
//! `[[Extensible]]`, an insertion-ordered property table and a kind tag. The
//! kind tag selects the [`ObjectInternals`] implementation statically, so
//! wrapper and function objects only override the algorithms that differ from
//! ordinary objects.

use crate::ast::FunctionDef;
use crate::environment::EnvRef;
use crate::error::JsError;
use crate::interpreter::Interpreter;
use crate::prelude::*;
use crate::property::{DescriptorKind, PropertyDescriptor, PropertyDescriptorPatch};
use crate::value::{CheapClone, JsString, JsValue};

/// Shared handle to a heap object.
///
/// Many objects may share one prototype and many references may share one
/// base object, so ownership is reference counted.
#[derive(Clone)]
pub struct JsObjectRef(Rc<RefCell<JsObject>>);

impl CheapClone for JsObjectRef {}

/// A JavaScript object
#[derive(Debug)]
pub struct JsObject {
    /// \[\[Prototype]]
    pub prototype: Option<JsObjectRef>,
    /// \[\[Extensible]]
    pub extensible: bool,
    /// Own named properties, in insertion order
    pub properties: IndexMap<JsString, PropertyDescriptor>,
    /// Kind tag; also carries `[[PrimitiveValue]]` and function internals
    pub kind: ObjectKind,
}

/// Object kinds with their kind-specific internal slots
#[derive(Debug)]
pub enum ObjectKind {
    Ordinary,
    /// Boolean wrapper with its \[\[PrimitiveValue]]
    Boolean(bool),
    /// Number wrapper with its \[\[PrimitiveValue]]
    Number(f64),
    /// String wrapper with its \[\[PrimitiveValue]]
    String(JsString),
    /// Date-like object with its time value; defaults to the String hint
    Date(f64),
    Arguments,
    Function(JsFunction),
}

/// Preferred type passed to `[[DefaultValue]]` and ToPrimitive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hint {
    String,
    Number,
}

impl JsObject {
    /// Create a new ordinary object without a prototype
    pub fn new() -> Self {
        Self {
            prototype: None,
            extensible: true,
            properties: index_map_new(),
            kind: ObjectKind::Ordinary,
        }
    }

    /// Create an object of the given kind with a prototype
    pub fn with_prototype(prototype: Option<JsObjectRef>, kind: ObjectKind) -> Self {
        Self {
            prototype,
            extensible: true,
            properties: index_map_new(),
            kind,
        }
    }

    /// \[\[Class]]
    pub fn class(&self) -> &'static str {
        match self.kind {
            ObjectKind::Ordinary => "Object",
            ObjectKind::Boolean(_) => "Boolean",
            ObjectKind::Number(_) => "Number",
            ObjectKind::String(_) => "String",
            ObjectKind::Date(_) => "Date",
            ObjectKind::Arguments => "Arguments",
            ObjectKind::Function(_) => "Function",
        }
    }

    /// \[\[PrimitiveValue]] of wrapper and date objects
    pub fn primitive_value(&self) -> Option<JsValue> {
        match &self.kind {
            ObjectKind::Boolean(b) => Some(JsValue::Boolean(*b)),
            ObjectKind::Number(n) => Some(JsValue::Number(*n)),
            ObjectKind::String(s) => Some(JsValue::String(s.cheap_clone())),
            ObjectKind::Date(t) => Some(JsValue::Number(*t)),
            _ => None,
        }
    }
}

impl Default for JsObject {
    fn default() -> Self {
        Self::new()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Functions
// ═══════════════════════════════════════════════════════════════════════════════

/// Native function signature: interpreter, this value, arguments
pub type NativeFn = fn(&mut Interpreter, JsValue, &[JsValue]) -> Result<JsValue, JsError>;

/// Function internals
#[derive(Debug, Clone)]
pub enum JsFunction {
    /// Function created from source code
    Interpreted(InterpretedFunction),
    /// Host function implemented in Rust
    Native(NativeFunction),
}

impl JsFunction {
    pub fn name(&self) -> Option<&str> {
        match self {
            JsFunction::Interpreted(f) => f.def.name.as_ref().map(|s| s.as_str()),
            JsFunction::Native(f) => Some(f.name.as_str()),
        }
    }

    /// Strict functions receive `this` unboxed and poison `caller`
    pub fn is_strict(&self) -> bool {
        match self {
            JsFunction::Interpreted(f) => f.strict,
            JsFunction::Native(_) => false,
        }
    }
}

/// User-defined function
#[derive(Clone)]
pub struct InterpretedFunction {
    /// \[\[FormalParameters]] and \[\[Code]]
    pub def: Rc<FunctionDef>,
    /// \[\[Scope]]
    pub scope: EnvRef,
    /// Strictness of the function code, inherited from the enclosing code
    pub strict: bool,
}

impl fmt::Debug for InterpretedFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterpretedFunction")
            .field("name", &self.def.name)
            .field("params", &self.def.params)
            .field("strict", &self.strict)
            .finish()
    }
}

/// Native function wrapper
#[derive(Clone)]
pub struct NativeFunction {
    pub name: JsString,
    pub func: NativeFn,
    pub arity: usize,
    /// Behaviour under `new`; `None` means not a constructor
    pub construct: Option<NativeFn>,
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFunction")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .field("constructor", &self.construct.is_some())
            .finish()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Handle
// ═══════════════════════════════════════════════════════════════════════════════

impl JsObjectRef {
    pub fn new(object: JsObject) -> Self {
        JsObjectRef(Rc::new(RefCell::new(object)))
    }

    pub fn ptr_eq(a: &JsObjectRef, b: &JsObjectRef) -> bool {
        Rc::ptr_eq(&a.0, &b.0)
    }

    /// Identity of the allocation, used by the prototype cycle guard
    pub fn addr(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }

    pub fn borrow(&self) -> Ref<'_, JsObject> {
        self.0.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, JsObject> {
        self.0.borrow_mut()
    }

    pub fn class(&self) -> &'static str {
        self.borrow().class()
    }

    pub fn prototype(&self) -> Option<JsObjectRef> {
        self.borrow().prototype.clone()
    }

    pub fn is_extensible(&self) -> bool {
        self.borrow().extensible
    }

    pub fn primitive_value(&self) -> Option<JsValue> {
        self.borrow().primitive_value()
    }

    /// Implements `[[Call]]`
    pub fn is_callable(&self) -> bool {
        matches!(self.borrow().kind, ObjectKind::Function(_))
    }

    /// Copy of the function internals, if this is a function object
    pub fn function(&self) -> Option<JsFunction> {
        match &self.borrow().kind {
            ObjectKind::Function(f) => Some(f.clone()),
            _ => None,
        }
    }

    /// Internal method table selected by the kind tag
    pub fn internals(&self) -> &'static dyn ObjectInternals {
        match self.borrow().kind {
            ObjectKind::String(_) => &StringObject,
            ObjectKind::Function(_) => &FunctionObject,
            _ => &OrdinaryObject,
        }
    }

    // Internal method entry points. Each one dispatches through `internals()`.

    /// \[\[GetOwnProperty]] (P)
    pub fn get_own_property(&self, p: &str) -> Option<PropertyDescriptor> {
        self.internals().get_own_property(self, p)
    }

    /// \[\[GetProperty]] (P)
    pub fn get_property(&self, p: &str) -> Result<Option<PropertyDescriptor>, JsError> {
        self.internals().get_property(self, p)
    }

    /// \[\[Get]] (P)
    pub fn get(&self, interp: &mut Interpreter, p: &str) -> Result<JsValue, JsError> {
        self.internals().get(interp, self, p)
    }

    /// \[\[CanPut]] (P)
    pub fn can_put(&self, p: &str) -> Result<bool, JsError> {
        self.internals().can_put(self, p)
    }

    /// \[\[Put]] (P, V, Throw)
    pub fn put(
        &self,
        interp: &mut Interpreter,
        p: &str,
        v: JsValue,
        throw: bool,
    ) -> Result<(), JsError> {
        self.internals().put(interp, self, p, v, throw)
    }

    /// \[\[HasProperty]] (P)
    pub fn has_property(&self, p: &str) -> Result<bool, JsError> {
        self.internals().has_property(self, p)
    }

    /// \[\[Delete]] (P, Throw)
    pub fn delete(&self, p: &str, throw: bool) -> Result<bool, JsError> {
        self.internals().delete(self, p, throw)
    }

    /// \[\[DefaultValue]] (hint)
    pub fn default_value(
        &self,
        interp: &mut Interpreter,
        hint: Option<Hint>,
    ) -> Result<JsValue, JsError> {
        self.internals().default_value(interp, self, hint)
    }

    /// \[\[DefineOwnProperty]] (P, Desc, Throw)
    pub fn define_own_property(
        &self,
        p: &str,
        desc: PropertyDescriptorPatch,
        throw: bool,
    ) -> Result<bool, JsError> {
        self.internals().define_own_property(self, p, desc, throw)
    }

    /// Install a property without validation. Only for building fresh
    /// objects whose shape is known to be valid.
    pub(crate) fn insert_property(&self, p: &str, desc: PropertyDescriptor) {
        self.borrow_mut().properties.insert(JsString::from(p), desc);
    }
}

impl fmt::Debug for JsObjectRef {
    // Objects may be cyclic, so never descend into properties
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[object {} @{:#x}]", self.class(), self.addr())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Internal methods
// ═══════════════════════════════════════════════════════════════════════════════

/// Internal method table of an object kind.
///
/// The provided methods are the ordinary object algorithms; kinds override
/// the ones they specialise.
pub trait ObjectInternals {
    fn get_own_property(&self, o: &JsObjectRef, p: &str) -> Option<PropertyDescriptor> {
        o.borrow().properties.get(p).cloned()
    }

    /// Walks the prototype chain. Fails with an internal error when the chain
    /// revisits an object.
    fn get_property(
        &self,
        o: &JsObjectRef,
        p: &str,
    ) -> Result<Option<PropertyDescriptor>, JsError> {
        if let Some(prop) = self.get_own_property(o, p) {
            return Ok(Some(prop));
        }
        let mut visited = FxHashSet::default();
        visited.insert(o.addr());
        let mut current = o.prototype();
        while let Some(proto) = current {
            if !visited.insert(proto.addr()) {
                return Err(JsError::internal_error(format!(
                    "cyclic prototype chain while looking up '{}'",
                    p
                )));
            }
            if let Some(prop) = proto.get_own_property(p) {
                return Ok(Some(prop));
            }
            current = proto.prototype();
        }
        Ok(None)
    }

    fn get(&self, interp: &mut Interpreter, o: &JsObjectRef, p: &str) -> Result<JsValue, JsError> {
        let desc = self.get_property(o, p)?;
        match desc.map(|d| d.kind) {
            None => Ok(JsValue::Undefined),
            Some(DescriptorKind::Data { value, .. }) => Ok(value),
            Some(DescriptorKind::Accessor { get: None, .. }) => Ok(JsValue::Undefined),
            Some(DescriptorKind::Accessor { get: Some(getter), .. }) => {
                interp.call_function(&getter, JsValue::Object(o.cheap_clone()), &[])
            }
        }
    }

    fn can_put(&self, o: &JsObjectRef, p: &str) -> Result<bool, JsError> {
        if let Some(desc) = self.get_own_property(o, p) {
            return Ok(match desc.kind {
                DescriptorKind::Accessor { set, .. } => set.is_some(),
                DescriptorKind::Data { writable, .. } => writable,
            });
        }
        let extensible = o.is_extensible();
        let Some(proto) = o.prototype() else {
            return Ok(extensible);
        };
        let Some(inherited) = proto.get_property(p)? else {
            return Ok(extensible);
        };
        Ok(match inherited.kind {
            DescriptorKind::Accessor { set, .. } => set.is_some(),
            DescriptorKind::Data { writable, .. } => extensible && writable,
        })
    }

    fn put(
        &self,
        interp: &mut Interpreter,
        o: &JsObjectRef,
        p: &str,
        v: JsValue,
        throw: bool,
    ) -> Result<(), JsError> {
        if !self.can_put(o, p)? {
            if throw {
                return Err(JsError::type_error(format!(
                    "Cannot assign to read only property '{}'",
                    p
                )));
            }
            return Ok(());
        }

        let own = self.get_own_property(o, p);
        if own.as_ref().is_some_and(PropertyDescriptor::is_data) {
            self.define_own_property(o, p, PropertyDescriptorPatch::value(v), throw)?;
            return Ok(());
        }

        if let Some(desc) = self.get_property(o, p)? {
            if let DescriptorKind::Accessor { set, .. } = desc.kind {
                // CanPut already guaranteed a setter exists
                if let Some(setter) = set {
                    interp.call_function(&setter, JsValue::Object(o.cheap_clone()), &[v])?;
                }
                return Ok(());
            }
        }

        self.define_own_property(o, p, PropertyDescriptorPatch::data(v, true, true, true), throw)?;
        Ok(())
    }

    fn has_property(&self, o: &JsObjectRef, p: &str) -> Result<bool, JsError> {
        Ok(self.get_property(o, p)?.is_some())
    }

    fn delete(&self, o: &JsObjectRef, p: &str, throw: bool) -> Result<bool, JsError> {
        let Some(desc) = self.get_own_property(o, p) else {
            return Ok(true);
        };
        if desc.configurable {
            o.borrow_mut().properties.shift_remove(p);
            return Ok(true);
        }
        if throw {
            return Err(JsError::type_error(format!(
                "Cannot delete property '{}' of [object {}]",
                p,
                o.class()
            )));
        }
        Ok(false)
    }

    fn default_value(
        &self,
        interp: &mut Interpreter,
        o: &JsObjectRef,
        hint: Option<Hint>,
    ) -> Result<JsValue, JsError> {
        let hint = hint.unwrap_or_else(|| {
            if matches!(o.borrow().kind, ObjectKind::Date(_)) {
                Hint::String
            } else {
                Hint::Number
            }
        });
        let method_names = match hint {
            Hint::String => ["toString", "valueOf"],
            Hint::Number => ["valueOf", "toString"],
        };
        for name in method_names {
            let method = self.get(interp, o, name)?;
            if let JsValue::Object(func) = method {
                if func.is_callable() {
                    let result =
                        interp.call_function(&func, JsValue::Object(o.cheap_clone()), &[])?;
                    if result.is_primitive() {
                        return Ok(result);
                    }
                }
            }
        }
        Err(JsError::type_error(format!(
            "Cannot convert [object {}] to primitive value",
            o.class()
        )))
    }

    fn define_own_property(
        &self,
        o: &JsObjectRef,
        p: &str,
        desc: PropertyDescriptorPatch,
        throw: bool,
    ) -> Result<bool, JsError> {
        let current = self.get_own_property(o, p);
        let extensible = o.is_extensible();
        match validate_and_apply(current, extensible, desc) {
            Ok(None) => Ok(true),
            Ok(Some(next)) => {
                o.borrow_mut().properties.insert(JsString::from(p), next);
                Ok(true)
            }
            Err(reason) => {
                log::trace!("rejected definition of '{}': {}", p, reason);
                if throw {
                    Err(JsError::type_error(format!(
                        "Cannot redefine property '{}': {}",
                        p, reason
                    )))
                } else {
                    Ok(false)
                }
            }
        }
    }
}

/// Validate `desc` against the current state of a property and compute the
/// descriptor to store.
///
/// `Ok(None)` means the definition is accepted and nothing changes;
/// `Err(reason)` means it must be rejected.
pub fn validate_and_apply(
    current: Option<PropertyDescriptor>,
    extensible: bool,
    desc: PropertyDescriptorPatch,
) -> Result<Option<PropertyDescriptor>, &'static str> {
    let Some(current) = current else {
        if !extensible {
            return Err("object is not extensible");
        }
        return Ok(Some(desc.into_new_descriptor()));
    };

    if desc.is_empty() || every_field_matches(&current, &desc) {
        return Ok(None);
    }

    if !current.configurable {
        if desc.configurable == Some(true) {
            return Err("property is not configurable");
        }
        if desc.enumerable.is_some_and(|e| e != current.enumerable) {
            return Err("cannot change enumerability of a non-configurable property");
        }
    }

    let mut next = current.clone();

    if desc.is_generic_descriptor() {
        // Only enumerable/configurable change
    } else if current.is_data() != desc.is_data_descriptor() {
        if !current.configurable {
            return Err("cannot change the kind of a non-configurable property");
        }
        // Attributes other than enumerable/configurable reset to defaults
        next.kind = if current.is_data() {
            DescriptorKind::Accessor {
                get: None,
                set: None,
            }
        } else {
            DescriptorKind::Data {
                value: JsValue::Undefined,
                writable: false,
            }
        };
    } else if let DescriptorKind::Data {
        value: cur_value,
        writable: cur_writable,
    } = &current.kind
    {
        if !current.configurable && !*cur_writable {
            if desc.writable == Some(true) {
                return Err("property is not writable");
            }
            if desc.value.as_ref().is_some_and(|v| !v.same_value(cur_value)) {
                return Err("cannot change the value of a read-only property");
            }
        }
    } else if let DescriptorKind::Accessor {
        get: cur_get,
        set: cur_set,
    } = &current.kind
    {
        if !current.configurable {
            if desc.set.as_ref().is_some_and(|s| !same_function(s, cur_set)) {
                return Err("cannot change the setter of a non-configurable property");
            }
            if desc.get.as_ref().is_some_and(|g| !same_function(g, cur_get)) {
                return Err("cannot change the getter of a non-configurable property");
            }
        }
    }

    apply_fields(&mut next, desc);
    Ok(Some(next))
}

fn apply_fields(target: &mut PropertyDescriptor, desc: PropertyDescriptorPatch) {
    if let Some(e) = desc.enumerable {
        target.enumerable = e;
    }
    if let Some(c) = desc.configurable {
        target.configurable = c;
    }
    match &mut target.kind {
        DescriptorKind::Data { value, writable } => {
            if let Some(v) = desc.value {
                *value = v;
            }
            if let Some(w) = desc.writable {
                *writable = w;
            }
        }
        DescriptorKind::Accessor { get, set } => {
            if let Some(g) = desc.get {
                *get = g;
            }
            if let Some(s) = desc.set {
                *set = s;
            }
        }
    }
}

fn every_field_matches(current: &PropertyDescriptor, desc: &PropertyDescriptorPatch) -> bool {
    if desc.enumerable.is_some_and(|e| e != current.enumerable) {
        return false;
    }
    if desc.configurable.is_some_and(|c| c != current.configurable) {
        return false;
    }
    match &current.kind {
        DescriptorKind::Data { value, writable } => {
            desc.get.is_none()
                && desc.set.is_none()
                && desc.value.as_ref().is_none_or(|v| v.same_value(value))
                && desc.writable.is_none_or(|w| w == *writable)
        }
        DescriptorKind::Accessor { get, set } => {
            desc.value.is_none()
                && desc.writable.is_none()
                && desc.get.as_ref().is_none_or(|g| same_function(g, get))
                && desc.set.as_ref().is_none_or(|s| same_function(s, set))
        }
    }
}

fn same_function(a: &Option<JsObjectRef>, b: &Option<JsObjectRef>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => JsObjectRef::ptr_eq(a, b),
        _ => false,
    }
}

/// Ordinary objects, Boolean/Number wrappers, dates and arguments objects
pub struct OrdinaryObject;

impl ObjectInternals for OrdinaryObject {}

/// String wrappers expose their characters as read-only index properties
pub struct StringObject;

impl ObjectInternals for StringObject {
    fn get_own_property(&self, o: &JsObjectRef, p: &str) -> Option<PropertyDescriptor> {
        let obj = o.borrow();
        if let Some(prop) = obj.properties.get(p) {
            return Some(prop.clone());
        }
        let ObjectKind::String(s) = &obj.kind else {
            return None;
        };
        let index = canonical_array_index(p)?;
        let ch = s.code_unit_at(index)?;
        Some(PropertyDescriptor::data_with(
            JsValue::String(ch),
            false,
            true,
            false,
        ))
    }
}

/// Function objects refuse to hand out a strict function through `caller`
pub struct FunctionObject;

impl ObjectInternals for FunctionObject {
    fn get(&self, interp: &mut Interpreter, o: &JsObjectRef, p: &str) -> Result<JsValue, JsError> {
        let v = OrdinaryObject.get(interp, o, p)?;
        if p == "caller" {
            if let JsValue::Object(f) = &v {
                if f.function().is_some_and(|f| f.is_strict()) {
                    return Err(JsError::type_error(
                        "'caller' may not refer to a strict mode function",
                    ));
                }
            }
        }
        Ok(v)
    }
}

/// Parse `p` as an index whose canonical string form is `p` itself
fn canonical_array_index(p: &str) -> Option<usize> {
    if p.is_empty() || (p.len() > 1 && p.starts_with('0')) {
        return None;
    }
    if !p.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    p.parse::<usize>().ok()
}
