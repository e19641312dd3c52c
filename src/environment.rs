//! Environment records and lexical environments
//!
//! A lexical environment pairs one environment record with an optional outer
//! environment. Declarative records own their bindings; object records expose
//! the properties of a binding object as bindings.
//!
//! Outer links are strong: a closure keeps its whole scope chain alive for as
//! long as it is reachable.

use crate::error::JsError;
use crate::interpreter::Interpreter;
use crate::object::JsObjectRef;
use crate::prelude::*;
use crate::property::PropertyDescriptorPatch;
use crate::reference::Reference;
use crate::value::{CheapClone, JsString, JsValue};

/// Shared handle to a lexical environment
pub type EnvRef = Rc<LexicalEnvironment>;

/// A node of the scope chain
#[derive(Debug)]
pub struct LexicalEnvironment {
    pub record: EnvironmentRecord,
    pub outer: Option<EnvRef>,
}

impl LexicalEnvironment {
    /// NewDeclarativeEnvironment(E)
    pub fn new_declarative(outer: Option<EnvRef>) -> EnvRef {
        Rc::new(LexicalEnvironment {
            record: EnvironmentRecord::Declarative(DeclarativeRecord::default()),
            outer,
        })
    }

    /// NewObjectEnvironment(O, E)
    pub fn new_object(
        binding_object: JsObjectRef,
        provide_this: bool,
        outer: Option<EnvRef>,
    ) -> EnvRef {
        Rc::new(LexicalEnvironment {
            record: EnvironmentRecord::Object(ObjectRecord {
                binding_object,
                provide_this,
            }),
            outer,
        })
    }
}

/// A binding slot in a declarative environment record
#[derive(Debug, Clone)]
pub struct Binding {
    pub value: JsValue,
    pub mutable: bool,
    pub initialized: bool,
    /// Created by eval code; may be removed with `delete`
    pub deletable: bool,
}

#[derive(Debug, Default)]
pub struct DeclarativeRecord {
    bindings: RefCell<FxHashMap<JsString, Binding>>,
}

#[derive(Debug)]
pub struct ObjectRecord {
    /// Borrowed view of the object whose properties are the bindings
    pub binding_object: JsObjectRef,
    /// Calls through this record receive the binding object as `this`
    pub provide_this: bool,
}

#[derive(Debug)]
pub enum EnvironmentRecord {
    Declarative(DeclarativeRecord),
    Object(ObjectRecord),
}

// ═══════════════════════════════════════════════════════════════════════════════
// Declarative records
// ═══════════════════════════════════════════════════════════════════════════════

impl DeclarativeRecord {
    pub fn has_binding(&self, name: &str) -> bool {
        self.bindings.borrow().contains_key(name)
    }

    /// Snapshot of a binding slot
    pub fn binding(&self, name: &str) -> Option<Binding> {
        self.bindings.borrow().get(name).cloned()
    }

    pub fn create_mutable_binding(&self, name: &str, deletable: bool) -> Result<(), JsError> {
        let mut bindings = self.bindings.borrow_mut();
        if bindings.contains_key(name) {
            return Err(JsError::internal_error(format!(
                "binding '{}' already exists",
                name
            )));
        }
        bindings.insert(
            JsString::from(name),
            Binding {
                value: JsValue::Undefined,
                mutable: true,
                initialized: true,
                deletable,
            },
        );
        Ok(())
    }

    pub fn create_immutable_binding(&self, name: &str) -> Result<(), JsError> {
        let mut bindings = self.bindings.borrow_mut();
        if bindings.contains_key(name) {
            return Err(JsError::internal_error(format!(
                "binding '{}' already exists",
                name
            )));
        }
        bindings.insert(
            JsString::from(name),
            Binding {
                value: JsValue::Undefined,
                mutable: false,
                initialized: false,
                deletable: false,
            },
        );
        Ok(())
    }

    pub fn initialize_immutable_binding(&self, name: &str, value: JsValue) -> Result<(), JsError> {
        let mut bindings = self.bindings.borrow_mut();
        match bindings.get_mut(name) {
            Some(binding) if !binding.mutable && !binding.initialized => {
                binding.value = value;
                binding.initialized = true;
                Ok(())
            }
            Some(_) => Err(JsError::internal_error(format!(
                "binding '{}' is not an uninitialized immutable binding",
                name
            ))),
            None => Err(JsError::internal_error(format!(
                "binding '{}' does not exist",
                name
            ))),
        }
    }

    /// Assigning to an immutable binding is a TypeError in strict code and
    /// silently ignored otherwise.
    pub fn set_mutable_binding(
        &self,
        name: &str,
        value: JsValue,
        strict: bool,
    ) -> Result<(), JsError> {
        let mut bindings = self.bindings.borrow_mut();
        let Some(binding) = bindings.get_mut(name) else {
            return Err(JsError::internal_error(format!(
                "binding '{}' does not exist",
                name
            )));
        };
        if binding.mutable {
            binding.value = value;
            binding.initialized = true;
        } else if strict {
            return Err(JsError::type_error(format!(
                "Assignment to constant variable '{}'",
                name
            )));
        }
        Ok(())
    }

    pub fn get_binding_value(&self, name: &str) -> Result<JsValue, JsError> {
        let bindings = self.bindings.borrow();
        let Some(binding) = bindings.get(name) else {
            return Err(JsError::reference_error(name));
        };
        // Uninitialized immutable is an error; mutable-and-undefined is not
        if !binding.mutable && !binding.initialized {
            return Err(JsError::reference_error_with_message(
                name,
                "cannot access binding before initialization",
            ));
        }
        Ok(binding.value.cheap_clone())
    }

    pub fn delete_binding(&self, name: &str) -> bool {
        let mut bindings = self.bindings.borrow_mut();
        match bindings.get(name) {
            None => true,
            Some(binding) if binding.deletable => {
                bindings.remove(name);
                true
            }
            Some(_) => false,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Polymorphic record interface
// ═══════════════════════════════════════════════════════════════════════════════

impl EnvironmentRecord {
    /// HasBinding(N)
    pub fn has_binding(&self, name: &str) -> Result<bool, JsError> {
        match self {
            EnvironmentRecord::Declarative(rec) => Ok(rec.has_binding(name)),
            EnvironmentRecord::Object(rec) => rec.binding_object.has_property(name),
        }
    }

    /// CreateMutableBinding(N, D)
    pub fn create_mutable_binding(&self, name: &str, deletable: bool) -> Result<(), JsError> {
        match self {
            EnvironmentRecord::Declarative(rec) => rec.create_mutable_binding(name, deletable),
            EnvironmentRecord::Object(rec) => {
                rec.binding_object.define_own_property(
                    name,
                    PropertyDescriptorPatch::data(JsValue::Undefined, true, true, deletable),
                    true,
                )?;
                Ok(())
            }
        }
    }

    /// SetMutableBinding(N, V, S)
    pub fn set_mutable_binding(
        &self,
        interp: &mut Interpreter,
        name: &str,
        value: JsValue,
        strict: bool,
    ) -> Result<(), JsError> {
        match self {
            EnvironmentRecord::Declarative(rec) => rec.set_mutable_binding(name, value, strict),
            EnvironmentRecord::Object(rec) => rec.binding_object.put(interp, name, value, strict),
        }
    }

    /// GetBindingValue(N, S)
    ///
    /// A missing binding is a ReferenceError in both strict and sloppy code.
    pub fn get_binding_value(
        &self,
        interp: &mut Interpreter,
        name: &str,
        _strict: bool,
    ) -> Result<JsValue, JsError> {
        match self {
            EnvironmentRecord::Declarative(rec) => rec.get_binding_value(name),
            EnvironmentRecord::Object(rec) => {
                if !rec.binding_object.has_property(name)? {
                    return Err(JsError::reference_error(name));
                }
                rec.binding_object.get(interp, name)
            }
        }
    }

    /// DeleteBinding(N)
    pub fn delete_binding(&self, name: &str) -> Result<bool, JsError> {
        match self {
            EnvironmentRecord::Declarative(rec) => Ok(rec.delete_binding(name)),
            EnvironmentRecord::Object(rec) => rec.binding_object.delete(name, false),
        }
    }

    /// ImplicitThisValue()
    pub fn implicit_this_value(&self) -> JsValue {
        match self {
            EnvironmentRecord::Declarative(_) => JsValue::Undefined,
            EnvironmentRecord::Object(rec) if rec.provide_this => {
                JsValue::Object(rec.binding_object.cheap_clone())
            }
            EnvironmentRecord::Object(_) => JsValue::Undefined,
        }
    }

    pub fn as_declarative(&self) -> Option<&DeclarativeRecord> {
        match self {
            EnvironmentRecord::Declarative(rec) => Some(rec),
            EnvironmentRecord::Object(_) => None,
        }
    }
}

/// GetIdentifierReference(lex, name, strict)
///
/// Walks outward from `lex` until a record has the binding. Returns an
/// unresolvable reference when the chain is exhausted. A chain longer than
/// `max_depth` is treated as malformed.
pub fn get_identifier_reference(
    lex: Option<&EnvRef>,
    name: &str,
    strict: bool,
    max_depth: usize,
) -> Result<Reference, JsError> {
    let mut current = lex.cloned();
    let mut depth = 0usize;
    while let Some(env) = current {
        if depth >= max_depth {
            return Err(JsError::internal_error(format!(
                "scope chain deeper than {} while resolving '{}'",
                max_depth, name
            )));
        }
        if env.record.has_binding(name)? {
            log::trace!("resolved '{}' at depth {}", name, depth);
            return Ok(Reference::environment(env, name, strict));
        }
        current = env.outer.clone();
        depth += 1;
    }
    log::trace!("'{}' is unresolvable", name);
    Ok(Reference::unresolvable(name, strict))
}
