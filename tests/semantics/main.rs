//! Integration tests for the semantic core, organized by feature
//!
//! These tests exercise the engine through the public API, building programs
//! with the `es5core::ast::build` helpers.
//!
//! ## Test Defaults
//!
//! The call depth limit can be overridden to exercise the RangeError path
//! with deeper or shallower stacks:
//!
//! ```bash
//! cargo test                              # Default limits
//! ES5CORE_MAX_CALL_DEPTH=64 cargo test    # Shallower stack
//! ```

mod conversion;
mod operators;
mod property;

use es5core::ast::build::{expr, program, strict_program};
use es5core::ast::{Expression, Statement};
use es5core::{EngineConfig, Interpreter, JsError, JsValue};

/// Create a new interpreter honouring `ES5CORE_MAX_CALL_DEPTH`
pub fn create_test_runtime() -> Interpreter {
    Interpreter::with_config(EngineConfig::from_env())
}

/// Run statements as sloppy global code in a fresh interpreter
pub fn run(body: Vec<Statement>) -> Result<JsValue, JsError> {
    create_test_runtime().run_program(&program(body))
}

/// Run statements as strict global code in a fresh interpreter
pub fn run_strict(body: Vec<Statement>) -> Result<JsValue, JsError> {
    create_test_runtime().run_program(&strict_program(body))
}

/// Evaluate a single expression as sloppy global code
pub fn eval(e: Expression) -> JsValue {
    match run(vec![expr(e)]) {
        Ok(v) => v,
        Err(err) => panic!("evaluation failed: {}", err),
    }
}

/// Evaluate a single expression, keeping the error
pub fn eval_result(e: Expression) -> Result<JsValue, JsError> {
    run(vec![expr(e)])
}

/// Shorthand for a string value
pub fn s(text: &str) -> JsValue {
    JsValue::from(text)
}

/// Assert that a number value is NaN
pub fn assert_nan(value: &JsValue) {
    match value {
        JsValue::Number(n) => assert!(n.is_nan(), "expected NaN, got {}", n),
        other => panic!("expected NaN, got {:?}", other),
    }
}

/// Assert that a number value is -0
pub fn assert_negative_zero(value: &JsValue) {
    match value {
        JsValue::Number(n) => assert!(
            *n == 0.0 && n.is_sign_negative(),
            "expected -0, got {}",
            n
        ),
        other => panic!("expected -0, got {:?}", other),
    }
}
