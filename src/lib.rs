//! Semantic core of an ECMAScript 5 interpreter
//!
//! Values, property descriptors, environment records, references, type
//! conversions and the execution context stack, driven by a small
//! tree-walking evaluator over a hand-built AST.
//!
//! # Example
//!
//! ```
//! use es5core::ast::build::*;
//! use es5core::{Interpreter, JsValue};
//!
//! let mut interp = Interpreter::new();
//! let program = program(vec![
//!     var("x", Some(num(5.0))),
//!     expr(binary(es5core::ast::BinaryOp::Add, ident("x"), string("3"))),
//! ]);
//! let result = interp.run_program(&program).unwrap();
//! assert_eq!(result, JsValue::from("53"));
//! ```

pub mod ast;
pub mod config;
pub mod conversion;
pub mod environment;
pub mod error;
pub mod interpreter;
pub mod object;
pub mod prelude;
pub mod property;
pub mod reference;
pub mod value;

pub use config::EngineConfig;
pub use error::JsError;
pub use interpreter::Interpreter;
pub use object::{JsObject, JsObjectRef};
pub use reference::{Evaluated, Reference, get_value, put_value};
pub use value::{CheapClone, JsString, JsValue, Type};
