//! Dispatcher Module
//!
//! The single authorization + routing decision point between a decoded
//! request and the backend capabilities.
//!
//! ## Responsibilities
//! - Route `authenticate` requests straight to the auth service (the sole
//!   path that needs no token)
//! - Gate every other capability behind a valid admin token
//! - Resolve the capability name against an explicit registry built at
//!   construction time
//! - Convert every outcome, success or failure, into a well-formed Response
//!
//! No failure propagates past `dispatch`: the caller always gets a Response.

use std::collections::HashMap;
use std::sync::Arc;

use crate::auth::{AuthService, Token};
use crate::error::{AegisError, Result};
use crate::identity::{Identity, Role};
use crate::protocol::{Request, Response, Value, CAPABILITY_AUTHENTICATE};
use crate::store::CredentialStore;

/// A store-backed capability handler
///
/// Takes the request's positional arguments and returns the result value.
type CapabilityFn = fn(&CredentialStore, &[Value]) -> Result<Value>;

/// Routes requests to capabilities, enforcing the authorization policy
pub struct Dispatcher {
    store: Arc<CredentialStore>,
    auth: Arc<AuthService>,
    capabilities: HashMap<&'static str, CapabilityFn>,
}

impl Dispatcher {
    /// Create a dispatcher with the administrative capability registry
    pub fn new(store: Arc<CredentialStore>, auth: Arc<AuthService>) -> Self {
        let mut capabilities: HashMap<&'static str, CapabilityFn> = HashMap::new();
        capabilities.insert("add_user", add_user);
        capabilities.insert("get_user", get_user);
        capabilities.insert("update_user", update_user);
        capabilities.insert("remove_user", remove_user);

        Self {
            store,
            auth,
            capabilities,
        }
    }

    /// Handle one request, producing exactly one response
    pub fn dispatch(&self, request: &Request) -> Response {
        match self.handle(request) {
            Ok(value) => Response::ok(value),
            Err(e) => Response::error(e.to_string()),
        }
    }

    fn handle(&self, request: &Request) -> Result<Value> {
        if request.capability == CAPABILITY_AUTHENTICATE {
            return self.authenticate(&request.args);
        }

        // Administrative path: token gate before the capability is resolved,
        // so a rejected request never touches the store.
        let token = self.authorize(request)?;
        tracing::trace!(
            capability = %request.capability,
            username = %token.username,
            "authorized administrative request"
        );

        let handler = self
            .capabilities
            .get(request.capability.as_str())
            .ok_or_else(|| AegisError::UnknownCapability(request.capability.clone()))?;

        handler(&self.store, &request.args)
    }

    /// The bootstrap path: credentials in, token out
    fn authenticate(&self, args: &[Value]) -> Result<Value> {
        let (username, secret) = match args {
            [Value::Str(username), Value::Str(secret)] => (username, secret),
            _ => {
                return Err(AegisError::InvalidArguments(
                    "authenticate expects (username, secret)".to_string(),
                ))
            }
        };
        let token = self.auth.authenticate(username, secret)?;
        Ok(Value::Token(token))
    }

    /// Enforce the admin-token policy, returning the validated token
    fn authorize(&self, request: &Request) -> Result<Token> {
        let entry = request.token_entry().ok_or(AegisError::MissingToken)?;

        let token = match entry {
            Value::Token(token) => token,
            // A token slot holding anything else is treated like a forged token
            _ => return Err(AegisError::InvalidToken),
        };

        if !self.auth.validate_token(token) {
            return Err(AegisError::InvalidToken);
        }

        let identity = self.auth.resolve(token)?;
        if identity.role != Role::Admin {
            return Err(AegisError::InsufficientPrivileges);
        }

        Ok(token.clone())
    }
}

// =============================================================================
// Capability Handlers
// =============================================================================

fn add_user(store: &CredentialStore, args: &[Value]) -> Result<Value> {
    let identity = one_identity_arg("add_user", args)?;
    store.add(identity)?;
    Ok(Value::Unit)
}

fn get_user(store: &CredentialStore, args: &[Value]) -> Result<Value> {
    let username = one_str_arg("get_user", args)?;
    let identity = store.get(username)?;
    Ok(Value::Identity(identity))
}

fn update_user(store: &CredentialStore, args: &[Value]) -> Result<Value> {
    let identity = one_identity_arg("update_user", args)?;
    store.update(identity)?;
    Ok(Value::Unit)
}

fn remove_user(store: &CredentialStore, args: &[Value]) -> Result<Value> {
    let username = one_str_arg("remove_user", args)?;
    let identity = store.remove(username)?;
    Ok(Value::Identity(identity))
}

fn one_identity_arg(capability: &str, args: &[Value]) -> Result<Identity> {
    match args {
        [Value::Identity(identity)] => Ok(identity.clone()),
        _ => Err(AegisError::InvalidArguments(format!(
            "{} expects (identity)",
            capability
        ))),
    }
}

fn one_str_arg<'a>(capability: &str, args: &'a [Value]) -> Result<&'a str> {
    match args {
        [Value::Str(s)] => Ok(s),
        _ => Err(AegisError::InvalidArguments(format!(
            "{} expects (username)",
            capability
        ))),
    }
}
