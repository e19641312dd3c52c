//! Statement and expression evaluation

use crate::ast::{
    CallExpression, Expression, Literal, LogicalOp, MemberExpression, MemberProperty, Statement,
    UnaryOp,
};
use crate::conversion::{check_object_coercible, to_boolean, to_number, to_object, to_string};
use crate::environment::LexicalEnvironment;
use crate::error::JsError;
use crate::object::JsObjectRef;
use crate::property::PropertyDescriptorPatch;
use crate::reference::{Evaluated, Reference, ReferenceBase, get_value, put_value};
use crate::value::{CheapClone, JsString, JsValue};

use super::Interpreter;
use super::function::{STACK_GROW_SIZE, STACK_RED_ZONE};
use super::operators;

/// Completion record for control flow
#[derive(Debug, Clone)]
pub enum Completion {
    /// Normal completion with the value of the last expression statement
    Normal(Option<JsValue>),
    Return(JsValue),
}

impl Completion {
    pub fn value(self) -> JsValue {
        match self {
            Completion::Normal(v) => v.unwrap_or_default(),
            Completion::Return(v) => v,
        }
    }
}

impl Interpreter {
    // ═══════════════════════════════════════════════════════════════════════════
    // Statements
    // ═══════════════════════════════════════════════════════════════════════════

    /// Execute statements in order until one returns
    pub fn execute_body(&mut self, body: &[Statement]) -> Result<Completion, JsError> {
        let mut last = None;
        for stmt in body {
            match self.execute_statement(stmt)? {
                Completion::Return(v) => return Ok(Completion::Return(v)),
                Completion::Normal(Some(v)) => last = Some(v),
                Completion::Normal(None) => {}
            }
        }
        Ok(Completion::Normal(last))
    }

    pub fn execute_statement(&mut self, stmt: &Statement) -> Result<Completion, JsError> {
        match stmt {
            Statement::Expression(expr) => {
                let value = self.evaluate_value(expr)?;
                Ok(Completion::Normal(Some(value)))
            }
            Statement::VariableDeclaration(decls) => {
                // Bindings already exist; only initializers run here
                for decl in decls {
                    if let Some(init) = &decl.init {
                        let lhs = Evaluated::Reference(self.resolve_identifier(&decl.name)?);
                        let value = self.evaluate_value(init)?;
                        put_value(self, &lhs, value)?;
                    }
                }
                Ok(Completion::Normal(None))
            }
            Statement::FunctionDeclaration(_) => Ok(Completion::Normal(None)),
            Statement::Return(arg) => {
                let value = match arg {
                    Some(expr) => self.evaluate_value(expr)?,
                    None => JsValue::Undefined,
                };
                Ok(Completion::Return(value))
            }
            Statement::Block(body) => self.execute_body(body),
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Expressions
    // ═══════════════════════════════════════════════════════════════════════════

    /// Evaluate and dereference
    pub fn evaluate_value(&mut self, expr: &Expression) -> Result<JsValue, JsError> {
        let evaluated = self.evaluate(expr)?;
        get_value(self, &evaluated)
    }

    /// Evaluate an expression to a value or a reference
    ///
    /// Deeply nested trees grow the native stack instead of overflowing it.
    pub fn evaluate(&mut self, expr: &Expression) -> Result<Evaluated, JsError> {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || self.evaluate_inner(expr))
    }

    fn evaluate_inner(&mut self, expr: &Expression) -> Result<Evaluated, JsError> {
        match expr {
            Expression::This => Ok(Evaluated::Value(self.this_binding())),
            Expression::Identifier(name) => {
                Ok(Evaluated::Reference(self.resolve_identifier(name)?))
            }
            Expression::Literal(lit) => Ok(Evaluated::Value(match lit {
                Literal::Null => JsValue::Null,
                Literal::Boolean(b) => JsValue::Boolean(*b),
                Literal::Number(n) => JsValue::Number(*n),
                Literal::String(s) => JsValue::String(s.cheap_clone()),
            })),
            Expression::Object(props) => {
                let obj = self.create_object();
                for (name, value_expr) in props {
                    let value = self.evaluate_value(value_expr)?;
                    obj.define_own_property(
                        name,
                        PropertyDescriptorPatch::data(value, true, true, true),
                        false,
                    )?;
                }
                Ok(Evaluated::Value(JsValue::Object(obj)))
            }
            Expression::Function(def) => {
                let strict = self.current_code_is_strict();
                let scope = self.lexical_environment();
                let closure = match &def.name {
                    // The name is bound in an environment only the function sees
                    Some(name) => {
                        let func_env = LexicalEnvironment::new_declarative(Some(scope));
                        let rec = func_env.record.as_declarative().ok_or_else(|| {
                            JsError::internal_error("function name environment is not declarative")
                        })?;
                        rec.create_immutable_binding(name)?;
                        let closure = self.create_function_object(
                            def.cheap_clone(),
                            func_env.cheap_clone(),
                            strict,
                        )?;
                        rec.initialize_immutable_binding(
                            name,
                            JsValue::Object(closure.cheap_clone()),
                        )?;
                        closure
                    }
                    None => self.create_function_object(def.cheap_clone(), scope, strict)?,
                };
                Ok(Evaluated::Value(JsValue::Object(closure)))
            }
            Expression::Member(member) => self.evaluate_member(member).map(Evaluated::Reference),
            Expression::Call(call) => self.evaluate_call(call).map(Evaluated::Value),
            Expression::New(call) => self.evaluate_new(call).map(Evaluated::Value),
            Expression::Assignment(assign) => {
                let lref = self.evaluate(&assign.target)?;
                let value = self.evaluate_value(&assign.value)?;
                put_value(self, &lref, value.cheap_clone())?;
                Ok(Evaluated::Value(value))
            }
            Expression::Unary(unary) => self
                .evaluate_unary(unary.operator, &unary.argument)
                .map(Evaluated::Value),
            Expression::Binary(binary) => {
                let left = self.evaluate_value(&binary.left)?;
                let right = self.evaluate_value(&binary.right)?;
                operators::apply_binary(self, binary.operator, &left, &right).map(Evaluated::Value)
            }
            Expression::Logical(logical) => {
                let left = self.evaluate_value(&logical.left)?;
                let short_circuit = match logical.operator {
                    LogicalOp::And => !to_boolean(&left),
                    LogicalOp::Or => to_boolean(&left),
                };
                if short_circuit {
                    return Ok(Evaluated::Value(left));
                }
                self.evaluate_value(&logical.right).map(Evaluated::Value)
            }
        }
    }

    /// `this` of the running context, or the global object outside any code
    pub fn this_binding(&self) -> JsValue {
        match self.running_context() {
            Some(ctx) => ctx.this_binding.cheap_clone(),
            None => JsValue::Object(self.global_object()),
        }
    }

    fn evaluate_member(&mut self, member: &MemberExpression) -> Result<Reference, JsError> {
        let base = self.evaluate_value(&member.object)?;
        let name_value = match &member.property {
            MemberProperty::Identifier(name) => JsValue::String(name.cheap_clone()),
            MemberProperty::Computed(expr) => self.evaluate_value(expr)?,
        };
        check_object_coercible(&base)?;
        let name = to_string(self, &name_value)?;
        Ok(Reference::property(base, name, self.current_code_is_strict()))
    }

    fn evaluate_arguments(&mut self, args: &[Expression]) -> Result<Vec<JsValue>, JsError> {
        args.iter().map(|arg| self.evaluate_value(arg)).collect()
    }

    fn evaluate_call(&mut self, call: &CallExpression) -> Result<JsValue, JsError> {
        let callee = self.evaluate(&call.callee)?;
        let func = get_value(self, &callee)?;
        let args = self.evaluate_arguments(&call.arguments)?;
        let func = callable(&func, &callee)?;

        let this = match &callee {
            Evaluated::Reference(r) => match r.get_base() {
                ReferenceBase::Object(obj) => JsValue::Object(obj.cheap_clone()),
                ReferenceBase::Primitive(v) => v.cheap_clone(),
                ReferenceBase::Environment(env) => env.record.implicit_this_value(),
                ReferenceBase::Unresolvable => JsValue::Undefined,
            },
            Evaluated::Value(_) => JsValue::Undefined,
        };
        self.call_function(&func, this, &args)
    }

    fn evaluate_new(&mut self, call: &CallExpression) -> Result<JsValue, JsError> {
        let constructor = self.evaluate_value(&call.callee)?;
        let args = self.evaluate_arguments(&call.arguments)?;
        let JsValue::Object(func) = constructor else {
            return Err(JsError::type_error(format!(
                "{:?} is not a constructor",
                constructor
            )));
        };
        self.construct(&func, &args)
    }

    fn evaluate_unary(&mut self, op: UnaryOp, argument: &Expression) -> Result<JsValue, JsError> {
        match op {
            UnaryOp::Typeof => {
                let operand = self.evaluate(argument)?;
                operators::type_of(self, &operand).map(JsValue::String)
            }
            UnaryOp::Delete => {
                let operand = self.evaluate(argument)?;
                self.delete_operand(&operand).map(JsValue::Boolean)
            }
            UnaryOp::Void => {
                self.evaluate_value(argument)?;
                Ok(JsValue::Undefined)
            }
            UnaryOp::Plus => {
                let value = self.evaluate_value(argument)?;
                Ok(JsValue::Number(to_number(self, &value)?))
            }
            UnaryOp::Minus => {
                let value = self.evaluate_value(argument)?;
                // Negating NaN is NaN; negating 0 gives -0
                Ok(JsValue::Number(-to_number(self, &value)?))
            }
            UnaryOp::Not => {
                let value = self.evaluate_value(argument)?;
                Ok(operators::logical_not(&value))
            }
        }
    }

    fn delete_operand(&mut self, operand: &Evaluated) -> Result<bool, JsError> {
        let Evaluated::Reference(r) = operand else {
            return Ok(true);
        };
        let name = r.get_referenced_name().cheap_clone();
        match r.get_base() {
            ReferenceBase::Unresolvable => Ok(true),
            ReferenceBase::Object(obj) => obj.delete(&name, r.is_strict_reference()),
            ReferenceBase::Primitive(v) => {
                let obj = to_object(self, v)?;
                obj.delete(&name, r.is_strict_reference())
            }
            ReferenceBase::Environment(env) => env.record.delete_binding(&name),
        }
    }
}

/// Check that the callee of a call expression is callable
fn callable(func: &JsValue, callee: &Evaluated) -> Result<JsObjectRef, JsError> {
    let describe = || -> JsString {
        match callee {
            Evaluated::Reference(r) => r.get_referenced_name().cheap_clone(),
            Evaluated::Value(v) => JsString::from(format!("{:?}", v)),
        }
    };
    match func {
        JsValue::Object(obj) if obj.is_callable() => Ok(obj.cheap_clone()),
        _ => Err(JsError::type_error(format!("{} is not a function", describe()))),
    }
}
