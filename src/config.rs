//! Engine configuration
//!
//! Limits that keep malformed programs and object graphs from exhausting the
//! host. Loaded from JSON or from environment variable overrides.

use serde::{Deserialize, Serialize};

use crate::error::JsError;

/// Environment variable overriding [`EngineConfig::max_call_depth`]
pub const MAX_CALL_DEPTH_VAR: &str = "ES5CORE_MAX_CALL_DEPTH";

/// Environment variable overriding [`EngineConfig::max_scope_depth`]
pub const MAX_SCOPE_DEPTH_VAR: &str = "ES5CORE_MAX_SCOPE_DEPTH";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum number of execution contexts on the stack. Entering one more
    /// raises a RangeError.
    pub max_call_depth: usize,
    /// Maximum number of lexical environments walked by identifier resolution
    /// before the chain is treated as malformed.
    pub max_scope_depth: usize,
    /// Treat global code without a "use strict" directive as strict.
    pub strict_global: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_call_depth: 512,
            max_scope_depth: 10_000,
            strict_global: false,
        }
    }
}

impl EngineConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(source: &str) -> Result<Self, JsError> {
        serde_json::from_str(source)
            .map_err(|e| JsError::internal_error(format!("invalid engine config: {}", e)))
    }

    /// Default configuration with environment variable overrides applied.
    /// Unparseable values are ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(depth) = read_usize_var(MAX_CALL_DEPTH_VAR) {
            config.max_call_depth = depth;
        }
        if let Some(depth) = read_usize_var(MAX_SCOPE_DEPTH_VAR) {
            config.max_scope_depth = depth;
        }
        config
    }
}

fn read_usize_var(name: &str) -> Option<usize> {
    std::env::var(name).ok().and_then(|s| s.parse::<usize>().ok())
}
