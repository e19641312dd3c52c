//! Interpreter: realm, execution context stack and evaluator
//!
//! An [`Interpreter`] owns one realm (global object, global environment and
//! the intrinsic prototypes) and one execution context stack. Independent
//! interpreters share nothing, so several programs can run side by side in
//! one process.

// Builtin function implementations (split into separate files)
pub mod builtins;

pub mod context;
pub mod eval;
pub mod function;
pub mod operators;

pub use context::{ContextStack, ExecutionContext};
pub use eval::Completion;

use crate::ast::Program;
use crate::config::EngineConfig;
use crate::environment::{EnvRef, LexicalEnvironment, get_identifier_reference};
use crate::error::JsError;
use crate::object::{JsObject, JsObjectRef, NativeFn, ObjectKind};
use crate::property::PropertyDescriptor;
use crate::reference::Reference;
use crate::value::{CheapClone, JsString, JsValue};

/// Intrinsic objects and the global environment of one program run
#[derive(Debug)]
pub struct Realm {
    pub global_object: JsObjectRef,
    /// Object environment over the global object; its outer is null
    pub global_env: EnvRef,
    pub object_prototype: JsObjectRef,
    pub function_prototype: JsObjectRef,
    pub boolean_prototype: JsObjectRef,
    pub number_prototype: JsObjectRef,
    pub string_prototype: JsObjectRef,
    /// The unique \[\[ThrowTypeError]] function object
    pub throw_type_error: JsObjectRef,
}

impl Realm {
    /// Allocate the intrinsic objects. Methods are installed afterwards by
    /// [`builtins::init_realm`].
    fn new() -> Self {
        let object_prototype = JsObjectRef::new(JsObject::new());
        let with_proto = |kind: ObjectKind| {
            JsObjectRef::new(JsObject::with_prototype(
                Some(object_prototype.clone()),
                kind,
            ))
        };

        let function_prototype = with_proto(ObjectKind::Function(function::native(
            "",
            builtins::function::function_prototype_call,
            0,
            None,
        )));
        let boolean_prototype = with_proto(ObjectKind::Boolean(false));
        let number_prototype = with_proto(ObjectKind::Number(0.0));
        let string_prototype = with_proto(ObjectKind::String(JsString::from("")));
        string_prototype.insert_property(
            "length",
            PropertyDescriptor::data_with(JsValue::Number(0.0), false, false, false),
        );

        let throw_type_error = function::native_function_object(
            &function_prototype,
            "ThrowTypeError",
            builtins::function::throw_type_error,
            0,
            None,
        );
        throw_type_error.borrow_mut().extensible = false;

        let global_object = with_proto(ObjectKind::Ordinary);
        let global_env = LexicalEnvironment::new_object(global_object.clone(), false, None);

        Realm {
            global_object,
            global_env,
            object_prototype,
            function_prototype,
            boolean_prototype,
            number_prototype,
            string_prototype,
            throw_type_error,
        }
    }
}

/// The interpreter state
pub struct Interpreter {
    config: EngineConfig,
    realm: Realm,
    stack: ContextStack,
}

impl Interpreter {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        let mut interp = Interpreter {
            stack: ContextStack::new(config.max_call_depth),
            config,
            realm: Realm::new(),
        };
        builtins::init_realm(&mut interp);
        log::debug!(
            "realm created (max_call_depth={}, max_scope_depth={})",
            interp.config.max_call_depth,
            interp.config.max_scope_depth
        );
        interp
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn realm(&self) -> &Realm {
        &self.realm
    }

    pub fn global_object(&self) -> JsObjectRef {
        self.realm.global_object.cheap_clone()
    }

    pub fn global_env(&self) -> EnvRef {
        self.realm.global_env.cheap_clone()
    }

    pub fn context_stack(&self) -> &ContextStack {
        &self.stack
    }

    /// The running execution context, if any code has been entered
    pub fn running_context(&self) -> Option<&ExecutionContext> {
        self.stack.running()
    }

    /// Lexical environment of the running context, or the global
    /// environment when no code is running
    pub fn lexical_environment(&self) -> EnvRef {
        match self.stack.running() {
            Some(ctx) => ctx.lexical_environment.cheap_clone(),
            None => self.global_env(),
        }
    }

    /// Whether the running code is strict
    pub fn current_code_is_strict(&self) -> bool {
        match self.stack.running() {
            Some(ctx) => ctx.strict,
            None => self.config.strict_global,
        }
    }

    /// Resolve `name` against the running context's lexical environment
    pub fn resolve_identifier(&self, name: &str) -> Result<Reference, JsError> {
        let env = self.lexical_environment();
        get_identifier_reference(
            Some(&env),
            name,
            self.current_code_is_strict(),
            self.config.max_scope_depth,
        )
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Object creation
    // ═══════════════════════════════════════════════════════════════════════════

    /// Create a plain object inheriting from Object.prototype
    pub fn create_object(&mut self) -> JsObjectRef {
        JsObjectRef::new(JsObject::with_prototype(
            Some(self.realm.object_prototype.cheap_clone()),
            ObjectKind::Ordinary,
        ))
    }

    /// Create a native function object inheriting from Function.prototype
    pub fn create_native_function(
        &mut self,
        name: &str,
        func: NativeFn,
        arity: usize,
    ) -> JsObjectRef {
        function::native_function_object(&self.realm.function_prototype, name, func, arity, None)
    }

    /// Create a native constructor; `construct` runs under `new`
    pub fn create_native_constructor(
        &mut self,
        name: &str,
        func: NativeFn,
        construct: NativeFn,
        arity: usize,
    ) -> JsObjectRef {
        function::native_function_object(
            &self.realm.function_prototype,
            name,
            func,
            arity,
            Some(construct),
        )
    }

    /// Install a native method as a writable, non-enumerable, configurable
    /// property
    pub fn register_method(&mut self, obj: &JsObjectRef, name: &str, func: NativeFn, arity: usize) {
        let f = self.create_native_function(name, func, arity);
        obj.insert_property(
            name,
            PropertyDescriptor::data_with(JsValue::Object(f), true, false, true),
        );
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Entry points
    // ═══════════════════════════════════════════════════════════════════════════

    /// Run a program as global code and return its completion value
    pub fn run_program(&mut self, program: &Program) -> Result<JsValue, JsError> {
        self.enter_global_code(program)?;
        let result = self.execute_body(&program.body);
        self.exit_context();
        Ok(result?.value())
    }

    /// Run `program` as eval code. A direct eval runs in the caller's
    /// environments; an indirect one runs in the global environment.
    pub fn eval_program(&mut self, program: &Program, direct: bool) -> Result<JsValue, JsError> {
        self.enter_eval_code(program, direct)?;
        let result = self.execute_body(&program.body);
        self.exit_context();
        Ok(result?.value())
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}
