//! Abstract Syntax Tree types
//!
//! The tree the evaluator consumes. There is no parser in this crate: hosts
//! and tests build trees directly, usually through the helpers in [`build`].
//! Strictness is decided by whoever builds the tree and recorded on
//! [`Program`] and [`FunctionDef`].

use crate::prelude::*;
use crate::value::JsString;

/// A complete script
#[derive(Debug, Clone, Default)]
pub struct Program {
    pub body: Vec<Statement>,
    /// Starts with a "use strict" directive
    pub strict: bool,
}

// ============ CODE VIEW ============

/// Which kind of code a body of statements is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeType {
    Global,
    Eval,
    Function,
}

/// What declaration instantiation and `this` binding need to know about a
/// piece of code.
pub trait Code {
    fn code_type(&self) -> CodeType;
    fn is_strict(&self) -> bool;
    fn body(&self) -> &[Statement];

    /// Formal parameter names; empty for global and eval code
    fn formal_parameters(&self) -> &[JsString] {
        &[]
    }
}

impl Code for Program {
    fn code_type(&self) -> CodeType {
        CodeType::Global
    }

    fn is_strict(&self) -> bool {
        self.strict
    }

    fn body(&self) -> &[Statement] {
        &self.body
    }
}

/// A program handed to eval
#[derive(Debug, Clone, Copy)]
pub struct EvalCode<'a>(pub &'a Program);

impl Code for EvalCode<'_> {
    fn code_type(&self) -> CodeType {
        CodeType::Eval
    }

    fn is_strict(&self) -> bool {
        self.0.strict
    }

    fn body(&self) -> &[Statement] {
        &self.0.body
    }
}

impl Code for FunctionDef {
    fn code_type(&self) -> CodeType {
        CodeType::Function
    }

    fn is_strict(&self) -> bool {
        self.strict
    }

    fn body(&self) -> &[Statement] {
        &self.body
    }

    fn formal_parameters(&self) -> &[JsString] {
        &self.params
    }
}

// ============ STATEMENTS ============

#[derive(Debug, Clone)]
pub enum Statement {
    Expression(Expression),
    VariableDeclaration(Vec<VariableDeclarator>),
    FunctionDeclaration(Rc<FunctionDef>),
    Return(Option<Expression>),
    Block(Vec<Statement>),
}

#[derive(Debug, Clone)]
pub struct VariableDeclarator {
    pub name: JsString,
    pub init: Option<Expression>,
}

/// Function declaration or expression
#[derive(Debug, Clone, Default)]
pub struct FunctionDef {
    pub name: Option<JsString>,
    pub params: Vec<JsString>,
    pub body: Vec<Statement>,
    /// The body has its own "use strict" directive
    pub strict: bool,
}

/// Names declared with `var` anywhere in `body`, excluding nested functions,
/// in source order without duplicates.
pub fn var_declared_names(body: &[Statement]) -> Vec<JsString> {
    fn walk(stmts: &[Statement], out: &mut Vec<JsString>) {
        for stmt in stmts {
            match stmt {
                Statement::VariableDeclaration(decls) => {
                    for decl in decls {
                        if !out.contains(&decl.name) {
                            out.push(decl.name.clone());
                        }
                    }
                }
                Statement::Block(inner) => walk(inner, out),
                _ => {}
            }
        }
    }
    let mut out = Vec::new();
    walk(body, &mut out);
    out
}

/// Function declarations in `body`, including those nested in blocks but
/// not inside other functions, in source order. A later declaration of the
/// same name wins when they are instantiated.
pub fn function_declarations(body: &[Statement]) -> Vec<Rc<FunctionDef>> {
    fn walk(stmts: &[Statement], out: &mut Vec<Rc<FunctionDef>>) {
        for stmt in stmts {
            match stmt {
                Statement::FunctionDeclaration(def) => out.push(def.clone()),
                Statement::Block(inner) => walk(inner, out),
                _ => {}
            }
        }
    }
    let mut out = Vec::new();
    walk(body, &mut out);
    out
}

// ============ EXPRESSIONS ============

#[derive(Debug, Clone)]
pub enum Expression {
    This,
    Identifier(JsString),
    Literal(Literal),
    /// Object literal with `name: value` pairs
    Object(Vec<(JsString, Expression)>),
    Function(Rc<FunctionDef>),

    Member(MemberExpression),
    Call(CallExpression),
    New(CallExpression),

    Assignment(AssignmentExpression),
    Unary(UnaryExpression),
    Binary(BinaryExpression),
    Logical(LogicalExpression),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Null,
    Boolean(bool),
    Number(f64),
    String(JsString),
}

#[derive(Debug, Clone)]
pub struct MemberExpression {
    pub object: Box<Expression>,
    pub property: MemberProperty,
}

#[derive(Debug, Clone)]
pub enum MemberProperty {
    /// `a.b`
    Identifier(JsString),
    /// `a[b]`
    Computed(Box<Expression>),
}

#[derive(Debug, Clone)]
pub struct CallExpression {
    pub callee: Box<Expression>,
    pub arguments: Vec<Expression>,
}

#[derive(Debug, Clone)]
pub struct AssignmentExpression {
    pub target: Box<Expression>,
    pub value: Box<Expression>,
}

#[derive(Debug, Clone)]
pub struct UnaryExpression {
    pub operator: UnaryOp,
    pub argument: Box<Expression>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Minus,  // -
    Plus,   // +
    Not,    // !
    Typeof, // typeof
    Void,   // void
    Delete, // delete
}

#[derive(Debug, Clone)]
pub struct BinaryExpression {
    pub operator: BinaryOp,
    pub left: Box<Expression>,
    pub right: Box<Expression>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    // Arithmetic
    Add, // +
    Sub, // -
    Mul, // *
    Div, // /
    Mod, // %

    // Comparison
    Eq,          // ==
    NotEq,       // !=
    StrictEq,    // ===
    StrictNotEq, // !==
    Lt,          // <
    LtEq,        // <=
    Gt,          // >
    GtEq,        // >=

    // Other
    In,         // in
    Instanceof, // instanceof
}

#[derive(Debug, Clone)]
pub struct LogicalExpression {
    pub operator: LogicalOp,
    pub left: Box<Expression>,
    pub right: Box<Expression>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And, // &&
    Or,  // ||
}

/// Shorthand constructors for building trees by hand
pub mod build {
    use super::*;

    pub fn ident(name: &str) -> Expression {
        Expression::Identifier(JsString::from(name))
    }

    pub fn this() -> Expression {
        Expression::This
    }

    pub fn null() -> Expression {
        Expression::Literal(Literal::Null)
    }

    pub fn boolean(b: bool) -> Expression {
        Expression::Literal(Literal::Boolean(b))
    }

    pub fn num(n: f64) -> Expression {
        Expression::Literal(Literal::Number(n))
    }

    pub fn string(s: &str) -> Expression {
        Expression::Literal(Literal::String(JsString::from(s)))
    }

    pub fn object(props: Vec<(&str, Expression)>) -> Expression {
        Expression::Object(
            props
                .into_iter()
                .map(|(k, v)| (JsString::from(k), v))
                .collect(),
        )
    }

    /// `object.name`
    pub fn member(object: Expression, name: &str) -> Expression {
        Expression::Member(MemberExpression {
            object: Box::new(object),
            property: MemberProperty::Identifier(JsString::from(name)),
        })
    }

    /// `object[property]`
    pub fn index(object: Expression, property: Expression) -> Expression {
        Expression::Member(MemberExpression {
            object: Box::new(object),
            property: MemberProperty::Computed(Box::new(property)),
        })
    }

    pub fn call(callee: Expression, arguments: Vec<Expression>) -> Expression {
        Expression::Call(CallExpression {
            callee: Box::new(callee),
            arguments,
        })
    }

    pub fn new(callee: Expression, arguments: Vec<Expression>) -> Expression {
        Expression::New(CallExpression {
            callee: Box::new(callee),
            arguments,
        })
    }

    pub fn assign(target: Expression, value: Expression) -> Expression {
        Expression::Assignment(AssignmentExpression {
            target: Box::new(target),
            value: Box::new(value),
        })
    }

    pub fn unary(operator: UnaryOp, argument: Expression) -> Expression {
        Expression::Unary(UnaryExpression {
            operator,
            argument: Box::new(argument),
        })
    }

    pub fn binary(operator: BinaryOp, left: Expression, right: Expression) -> Expression {
        Expression::Binary(BinaryExpression {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    pub fn logical(operator: LogicalOp, left: Expression, right: Expression) -> Expression {
        Expression::Logical(LogicalExpression {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    pub fn function(name: Option<&str>, params: &[&str], body: Vec<Statement>) -> FunctionDef {
        FunctionDef {
            name: name.map(JsString::from),
            params: params.iter().map(|p| JsString::from(*p)).collect(),
            body,
            strict: false,
        }
    }

    pub fn strict_function(
        name: Option<&str>,
        params: &[&str],
        body: Vec<Statement>,
    ) -> FunctionDef {
        FunctionDef {
            strict: true,
            ..function(name, params, body)
        }
    }

    pub fn function_expr(def: FunctionDef) -> Expression {
        Expression::Function(Rc::new(def))
    }

    pub fn function_decl(def: FunctionDef) -> Statement {
        Statement::FunctionDeclaration(Rc::new(def))
    }

    pub fn expr(e: Expression) -> Statement {
        Statement::Expression(e)
    }

    /// `var name = init;`
    pub fn var(name: &str, init: Option<Expression>) -> Statement {
        Statement::VariableDeclaration(vec![VariableDeclarator {
            name: JsString::from(name),
            init,
        }])
    }

    pub fn ret(value: Option<Expression>) -> Statement {
        Statement::Return(value)
    }

    pub fn block(body: Vec<Statement>) -> Statement {
        Statement::Block(body)
    }

    pub fn program(body: Vec<Statement>) -> Program {
        Program {
            body,
            strict: false,
        }
    }

    pub fn strict_program(body: Vec<Statement>) -> Program {
        Program { body, strict: true }
    }
}
