//! Request definitions
//!
//! Represents capability invocations from clients.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::auth::Token;
use crate::identity::Identity;

/// Capability name of the authentication bootstrap path
pub const CAPABILITY_AUTHENTICATE: &str = "authenticate";

/// Metadata key carrying the caller's token
pub const TOKEN_METADATA_KEY: &str = "token";

/// A value carried in request arguments, metadata, or a response result
///
/// Closed set: every value crossing the wire is one of these variants, so
/// capability handlers can match exhaustively instead of downcasting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Value {
    /// Empty result (capabilities with nothing to return)
    Unit,

    /// UTF-8 string
    Str(String),

    /// Authentication token
    Token(Token),

    /// Registered identity
    Identity(Identity),
}

/// A decoded capability invocation
///
/// Constructed once per connection by the codec, consumed once by the
/// dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    /// Name of the capability to invoke
    pub capability: String,

    /// Positional arguments, passed to the capability in order
    pub args: Vec<Value>,

    /// Metadata mapping; the recognized key is `token`
    pub metadata: HashMap<String, Value>,
}

impl Request {
    /// Create a request with no metadata
    pub fn new(capability: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            capability: capability.into(),
            args,
            metadata: HashMap::new(),
        }
    }

    /// Create a request carrying an authentication token
    pub fn with_token(capability: impl Into<String>, args: Vec<Value>, token: Token) -> Self {
        let mut metadata = HashMap::new();
        metadata.insert(TOKEN_METADATA_KEY.to_string(), Value::Token(token));
        Self {
            capability: capability.into(),
            args,
            metadata,
        }
    }

    /// The token metadata entry, if any
    pub fn token_entry(&self) -> Option<&Value> {
        self.metadata.get(TOKEN_METADATA_KEY)
    }
}
