//! Execution contexts
//!
//! Entering global, eval or function code pushes a context; leaving it, on
//! normal or abrupt completion, pops it. Declaration binding instantiation
//! runs right after the push, against the new context's variable
//! environment.

use crate::ast::{Code, CodeType, EvalCode, Program, function_declarations, var_declared_names};
use crate::conversion::to_object;
use crate::environment::{EnvRef, LexicalEnvironment};
use crate::error::JsError;
use crate::object::{InterpretedFunction, JsObjectRef};
use crate::prelude::*;
use crate::property::PropertyDescriptorPatch;
use crate::value::{CheapClone, JsValue};

use super::Interpreter;

/// State of one activation of global, eval or function code
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    pub this_binding: JsValue,
    /// Environment used to resolve identifiers
    pub lexical_environment: EnvRef,
    /// Environment holding `var` and function declarations
    pub variable_environment: EnvRef,
    /// The code running in this context is strict
    pub strict: bool,
}

/// LIFO stack of execution contexts; the top is the running context
#[derive(Debug)]
pub struct ContextStack {
    contexts: Vec<ExecutionContext>,
    max_depth: usize,
}

impl ContextStack {
    pub fn new(max_depth: usize) -> Self {
        Self {
            contexts: Vec::new(),
            max_depth,
        }
    }

    /// Push a context. Fails with a RangeError once the configured maximum
    /// depth is reached.
    pub fn push(&mut self, ctx: ExecutionContext) -> Result<(), JsError> {
        if self.contexts.len() >= self.max_depth {
            return Err(JsError::range_error(format!(
                "Maximum call stack size exceeded ({})",
                self.max_depth
            )));
        }
        self.contexts.push(ctx);
        log::trace!("push context (depth {})", self.contexts.len());
        Ok(())
    }

    pub fn pop(&mut self) -> Option<ExecutionContext> {
        let ctx = self.contexts.pop();
        log::trace!("pop context (depth {})", self.contexts.len());
        ctx
    }

    pub fn running(&self) -> Option<&ExecutionContext> {
        self.contexts.last()
    }

    pub fn depth(&self) -> usize {
        self.contexts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }
}

impl Interpreter {
    /// Push a context prepared by the host, without declaration
    /// instantiation. Pair with [`Interpreter::exit_context`].
    pub fn enter_context(&mut self, ctx: ExecutionContext) -> Result<(), JsError> {
        self.stack.push(ctx)
    }

    /// Pop the running context
    pub fn exit_context(&mut self) {
        self.stack.pop();
    }

    /// Push a context and instantiate `code`'s declarations in it. The
    /// context is popped again if instantiation fails.
    fn push_and_instantiate(
        &mut self,
        ctx: ExecutionContext,
        code: &dyn Code,
        call: Option<(&JsObjectRef, &[JsValue])>,
    ) -> Result<(), JsError> {
        self.stack.push(ctx)?;
        if let Err(e) = self.declaration_binding_instantiation(code, call) {
            self.exit_context();
            return Err(e);
        }
        Ok(())
    }

    /// Entering global code
    pub fn enter_global_code(&mut self, program: &Program) -> Result<(), JsError> {
        let strict = program.strict || self.config.strict_global;
        log::debug!("entering global code (strict={})", strict);
        let ctx = ExecutionContext {
            this_binding: JsValue::Object(self.global_object()),
            lexical_environment: self.global_env(),
            variable_environment: self.global_env(),
            strict,
        };
        self.push_and_instantiate(ctx, program, None)
    }

    /// Entering eval code
    ///
    /// A direct eval inherits the calling context's `this` and environments;
    /// an indirect one, or one without a caller, behaves like global code.
    /// Strict eval code gets a fresh declarative environment so its
    /// declarations do not leak into the caller.
    pub fn enter_eval_code(&mut self, program: &Program, direct: bool) -> Result<(), JsError> {
        let caller = if direct { self.stack.running().cloned() } else { None };
        let (this_binding, mut lexical_environment, mut variable_environment, caller_strict) =
            match caller {
                Some(ctx) => (
                    ctx.this_binding,
                    ctx.lexical_environment,
                    ctx.variable_environment,
                    ctx.strict,
                ),
                None => (
                    JsValue::Object(self.global_object()),
                    self.global_env(),
                    self.global_env(),
                    false,
                ),
            };

        let strict = program.strict || caller_strict;
        if strict {
            let env = LexicalEnvironment::new_declarative(Some(lexical_environment));
            lexical_environment = env.cheap_clone();
            variable_environment = env;
        }
        log::debug!("entering eval code (direct={}, strict={})", direct, strict);

        let ctx = ExecutionContext {
            this_binding,
            lexical_environment,
            variable_environment,
            strict,
        };
        self.push_and_instantiate(ctx, &EvalCode(program), None)
    }

    /// Entering function code
    ///
    /// Strict functions see `this` exactly as passed. Other functions see the
    /// global object for null/undefined and a wrapper for primitives.
    pub fn enter_function_code(
        &mut self,
        func: &JsObjectRef,
        f: &InterpretedFunction,
        this_arg: JsValue,
        args: &[JsValue],
    ) -> Result<(), JsError> {
        let this_binding = if f.strict {
            this_arg
        } else if this_arg.is_null_or_undefined() {
            JsValue::Object(self.global_object())
        } else if this_arg.is_primitive() {
            JsValue::Object(to_object(self, &this_arg)?)
        } else {
            this_arg
        };
        log::debug!(
            "entering function code {} (strict={})",
            f.def.name.as_deref().unwrap_or("<anonymous>"),
            f.strict
        );

        let local_env = LexicalEnvironment::new_declarative(Some(f.scope.cheap_clone()));
        let ctx = ExecutionContext {
            this_binding,
            lexical_environment: local_env.cheap_clone(),
            variable_environment: local_env,
            strict: f.strict,
        };
        self.push_and_instantiate(ctx, f.def.as_ref(), Some((func, args)))
    }

    /// Declaration binding instantiation for `code` in the running context.
    ///
    /// `call` carries the function object and arguments for function code.
    pub fn declaration_binding_instantiation(
        &mut self,
        code: &dyn Code,
        call: Option<(&JsObjectRef, &[JsValue])>,
    ) -> Result<(), JsError> {
        let Some(ctx) = self.stack.running() else {
            return Err(JsError::internal_error(
                "declaration instantiation without a running context",
            ));
        };
        let env = ctx.variable_environment.cheap_clone();
        let strict = ctx.strict;
        let configurable_bindings = code.code_type() == CodeType::Eval;
        let rec = &env.record;

        // Formal parameters; a repeated name keeps the last argument
        if let Some((_, args)) = call {
            for (i, name) in code.formal_parameters().iter().enumerate() {
                let value = args.get(i).cloned().unwrap_or_default();
                if !rec.has_binding(name)? {
                    rec.create_mutable_binding(name, false)?;
                }
                rec.set_mutable_binding(self, name, value, strict)?;
            }
        }

        for def in function_declarations(code.body()) {
            let Some(name) = def.name.clone() else {
                continue;
            };
            let fo = self.create_function_object(def.cheap_clone(), env.cheap_clone(), strict)?;
            if !rec.has_binding(&name)? {
                rec.create_mutable_binding(&name, configurable_bindings)?;
            } else if Rc::ptr_eq(&env, &self.realm.global_env) {
                let global = self.global_object();
                match global.get_property(&name)? {
                    Some(existing) if existing.configurable => {
                        global.define_own_property(
                            &name,
                            PropertyDescriptorPatch::data(
                                JsValue::Undefined,
                                true,
                                true,
                                configurable_bindings,
                            ),
                            true,
                        )?;
                    }
                    Some(existing)
                        if existing.is_accessor()
                            || !(existing.writable() == Some(true) && existing.enumerable) =>
                    {
                        return Err(JsError::type_error(format!(
                            "Cannot redeclare global function '{}'",
                            name
                        )));
                    }
                    _ => {}
                }
            }
            rec.set_mutable_binding(self, &name, JsValue::Object(fo), strict)?;
        }

        if let Some((func, args)) = call {
            if !rec.has_binding("arguments")? {
                let args_obj = self.create_arguments_object(func, args, strict);
                if strict {
                    let decl = rec.as_declarative().ok_or_else(|| {
                        JsError::internal_error("function environment is not declarative")
                    })?;
                    decl.create_immutable_binding("arguments")?;
                    decl.initialize_immutable_binding("arguments", JsValue::Object(args_obj))?;
                } else {
                    rec.create_mutable_binding("arguments", false)?;
                    rec.set_mutable_binding(self, "arguments", JsValue::Object(args_obj), false)?;
                }
            }
        }

        for name in var_declared_names(code.body()) {
            if !rec.has_binding(&name)? {
                rec.create_mutable_binding(&name, configurable_bindings)?;
                rec.set_mutable_binding(self, &name, JsValue::Undefined, strict)?;
            }
        }
        Ok(())
    }
}
