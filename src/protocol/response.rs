//! Response definitions
//!
//! Represents responses to clients.

use serde::{Deserialize, Serialize};

use super::request::Value;

/// A response to send to a client
///
/// Exactly one of `result` and `error` is populated; the constructors are
/// the only way to build one, so the invariant holds everywhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    /// Capability result on success
    pub result: Option<Value>,

    /// Human-readable failure message on error
    pub error: Option<String>,
}

impl Response {
    /// Create a success response
    pub fn ok(result: Value) -> Self {
        Self {
            result: Some(result),
            error: None,
        }
    }

    /// Create an error response
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            result: None,
            error: Some(message.into()),
        }
    }

    /// True if this response carries a result
    pub fn is_ok(&self) -> bool {
        self.result.is_some()
    }
}
