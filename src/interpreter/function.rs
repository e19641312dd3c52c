//! Function objects: creation, `[[Call]]`, `[[Construct]]`, `[[HasInstance]]`
//! and arguments objects

use crate::ast::FunctionDef;
use crate::environment::EnvRef;
use crate::error::JsError;
use crate::object::{
    InterpretedFunction, JsFunction, JsObject, JsObjectRef, NativeFn, NativeFunction, ObjectKind,
};
use crate::prelude::*;
use crate::property::{PropertyDescriptor, PropertyDescriptorPatch};
use crate::value::{CheapClone, JsString, JsValue};

use super::{Completion, Interpreter};

/// Remaining native stack below which a call moves to a fresh segment
pub(crate) const STACK_RED_ZONE: usize = 128 * 1024;
/// Size of each segment allocated when the red zone is reached
pub(crate) const STACK_GROW_SIZE: usize = 4 * 1024 * 1024;

/// Native function internals
pub fn native(name: &str, func: NativeFn, arity: usize, construct: Option<NativeFn>) -> JsFunction {
    JsFunction::Native(NativeFunction {
        name: JsString::from(name),
        func,
        arity,
        construct,
    })
}

/// Allocate a native function object with a read-only `length`
pub fn native_function_object(
    function_prototype: &JsObjectRef,
    name: &str,
    func: NativeFn,
    arity: usize,
    construct: Option<NativeFn>,
) -> JsObjectRef {
    let obj = JsObjectRef::new(JsObject::with_prototype(
        Some(function_prototype.cheap_clone()),
        ObjectKind::Function(native(name, func, arity, construct)),
    ));
    obj.insert_property(
        "length",
        PropertyDescriptor::data_with(JsValue::Number(arity as f64), false, false, false),
    );
    obj
}

impl Interpreter {
    /// Create a function object for `def` closing over `scope`.
    ///
    /// `strict` is the strictness of the enclosing code; a function with its
    /// own directive is strict regardless.
    pub fn create_function_object(
        &mut self,
        def: Rc<FunctionDef>,
        scope: EnvRef,
        strict: bool,
    ) -> Result<JsObjectRef, JsError> {
        let strict = strict || def.strict;
        let length = def.params.len() as f64;
        let f = JsObjectRef::new(JsObject::with_prototype(
            Some(self.realm.function_prototype.cheap_clone()),
            ObjectKind::Function(JsFunction::Interpreted(InterpretedFunction {
                def,
                scope,
                strict,
            })),
        ));

        f.define_own_property(
            "length",
            PropertyDescriptorPatch::data(JsValue::Number(length), false, false, false),
            false,
        )?;

        let proto = self.create_object();
        proto.define_own_property(
            "constructor",
            PropertyDescriptorPatch::data(JsValue::Object(f.cheap_clone()), true, false, true),
            false,
        )?;
        f.define_own_property(
            "prototype",
            PropertyDescriptorPatch::data(JsValue::Object(proto), true, false, false),
            false,
        )?;

        if strict {
            let thrower = self.realm.throw_type_error.cheap_clone();
            for name in ["caller", "arguments"] {
                f.define_own_property(
                    name,
                    PropertyDescriptorPatch::accessor(
                        Some(thrower.cheap_clone()),
                        Some(thrower.cheap_clone()),
                        false,
                        false,
                    ),
                    false,
                )?;
            }
        }
        Ok(f)
    }

    /// Create an unmapped arguments object
    pub fn create_arguments_object(
        &mut self,
        func: &JsObjectRef,
        args: &[JsValue],
        strict: bool,
    ) -> JsObjectRef {
        let obj = JsObjectRef::new(JsObject::with_prototype(
            Some(self.realm.object_prototype.cheap_clone()),
            ObjectKind::Arguments,
        ));
        obj.insert_property(
            "length",
            PropertyDescriptor::data_with(JsValue::Number(args.len() as f64), true, false, true),
        );
        for (i, arg) in args.iter().enumerate() {
            obj.insert_property(&i.to_string(), PropertyDescriptor::data(arg.cheap_clone()));
        }
        if strict {
            let thrower = self.realm.throw_type_error.cheap_clone();
            for name in ["caller", "callee"] {
                obj.insert_property(
                    name,
                    PropertyDescriptor::accessor(
                        Some(thrower.cheap_clone()),
                        Some(thrower.cheap_clone()),
                        false,
                        false,
                    ),
                );
            }
        } else {
            obj.insert_property(
                "callee",
                PropertyDescriptor::data_with(
                    JsValue::Object(func.cheap_clone()),
                    true,
                    false,
                    true,
                ),
            );
        }
        obj
    }

    /// \[\[Call]]
    pub fn call_function(
        &mut self,
        func: &JsObjectRef,
        this: JsValue,
        args: &[JsValue],
    ) -> Result<JsValue, JsError> {
        let Some(f) = func.function() else {
            return Err(JsError::type_error(format!(
                "[object {}] is not a function",
                func.class()
            )));
        };
        match f {
            JsFunction::Native(native) => (native.func)(self, this, args),
            JsFunction::Interpreted(interpreted) => {
                stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || {
                    self.call_interpreted(func, &interpreted, this, args)
                })
            }
        }
    }

    fn call_interpreted(
        &mut self,
        func: &JsObjectRef,
        interpreted: &InterpretedFunction,
        this: JsValue,
        args: &[JsValue],
    ) -> Result<JsValue, JsError> {
        self.enter_function_code(func, interpreted, this, args)?;
        let completion = self.execute_body(&interpreted.def.body);
        self.exit_context();
        match completion? {
            Completion::Return(v) => Ok(v),
            Completion::Normal(_) => Ok(JsValue::Undefined),
        }
    }

    /// \[\[Construct]]
    pub fn construct(&mut self, func: &JsObjectRef, args: &[JsValue]) -> Result<JsValue, JsError> {
        match func.function() {
            Some(JsFunction::Interpreted(_)) => {
                let proto = match func.get(self, "prototype")? {
                    JsValue::Object(p) => p,
                    _ => self.realm.object_prototype.cheap_clone(),
                };
                let obj =
                    JsObjectRef::new(JsObject::with_prototype(Some(proto), ObjectKind::Ordinary));
                let result = self.call_function(func, JsValue::Object(obj.cheap_clone()), args)?;
                match result {
                    JsValue::Object(_) => Ok(result),
                    _ => Ok(JsValue::Object(obj)),
                }
            }
            Some(JsFunction::Native(NativeFunction {
                construct: Some(construct),
                ..
            })) => construct(self, JsValue::Undefined, args),
            _ => Err(JsError::type_error(format!(
                "[object {}] is not a constructor",
                func.class()
            ))),
        }
    }

    /// \[\[HasInstance]] (V)
    pub fn has_instance(&mut self, func: &JsObjectRef, value: &JsValue) -> Result<bool, JsError> {
        let JsValue::Object(mut v) = value.cheap_clone() else {
            return Ok(false);
        };
        let JsValue::Object(o) = func.get(self, "prototype")? else {
            return Err(JsError::type_error(
                "Function has non-object prototype in instanceof check",
            ));
        };
        let mut visited = FxHashSet::default();
        loop {
            if !visited.insert(v.addr()) {
                return Err(JsError::internal_error(
                    "cyclic prototype chain in instanceof check",
                ));
            }
            let Some(proto) = v.prototype() else {
                return Ok(false);
            };
            if JsObjectRef::ptr_eq(&proto, &o) {
                return Ok(true);
            }
            v = proto;
        }
    }
}
