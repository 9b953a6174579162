//! Authentication Service
//!
//! Verifies credentials against the credential store and manages token
//! validity. Tokens are opaque handles minted on successful authentication;
//! they live until explicitly revoked or the service instance is dropped.
//! There is no persistence: a process restart invalidates everything.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AegisError, Result};
use crate::identity::Identity;
use crate::store::CredentialStore;

/// Opaque proof of a prior successful authentication
///
/// Bound to exactly one identity at issuance. The `username` field is a
/// back-reference for lookup; ownership of the identity stays with the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Unique token handle (UUIDv4, hex)
    pub id: String,

    /// Username of the owning identity
    pub username: String,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.id, self.username)
    }
}

impl FromStr for Token {
    type Err = AegisError;

    fn from_str(s: &str) -> Result<Self> {
        match s.split_once(':') {
            Some((id, username)) if !id.is_empty() && !username.is_empty() => Ok(Self {
                id: id.to_string(),
                username: username.to_string(),
            }),
            _ => Err(AegisError::InvalidArguments(format!(
                "malformed token: {}",
                s
            ))),
        }
    }
}

/// Verifies credentials and manages token validity
pub struct AuthService {
    /// Identity registry used for credential lookup
    store: Arc<CredentialStore>,

    /// Tokens issued by this instance: token id -> owning username
    issued: RwLock<HashMap<String, String>>,

    /// Log authentication attempts and outcomes
    debug: bool,
}

impl AuthService {
    /// Create a new service backed by the given store
    pub fn new(store: Arc<CredentialStore>, debug: bool) -> Self {
        Self {
            store,
            issued: RwLock::new(HashMap::new()),
            debug,
        }
    }

    /// Authenticate a username/secret pair
    ///
    /// On an exact secret match, mints and returns a fresh token bound to the
    /// identity. A missing identity and a wrong secret are indistinguishable
    /// to the caller: both fail with `AuthenticationFailed`.
    pub fn authenticate(&self, username: &str, secret: &str) -> Result<Token> {
        let identity = match self.store.get(username) {
            Ok(identity) => identity,
            Err(_) => {
                if self.debug {
                    tracing::debug!(username, "authentication failed: unknown identity");
                }
                return Err(AegisError::AuthenticationFailed);
            }
        };

        if identity.secret != secret {
            if self.debug {
                tracing::debug!(username, "authentication failed: secret mismatch");
            }
            return Err(AegisError::AuthenticationFailed);
        }

        let token = Token {
            id: Uuid::new_v4().simple().to_string(),
            username: identity.username.clone(),
        };
        self.issued
            .write()
            .insert(token.id.clone(), token.username.clone());

        if self.debug {
            tracing::debug!(username, token_id = %token.id, "authentication succeeded");
        }
        Ok(token)
    }

    /// Check whether a token is currently valid
    ///
    /// True iff the token was issued by this service instance, has not been
    /// revoked, and is still bound to the same username. Never errors on a
    /// malformed or foreign token.
    pub fn validate_token(&self, token: &Token) -> bool {
        self.issued
            .read()
            .get(&token.id)
            .map(|username| username == &token.username)
            .unwrap_or(false)
    }

    /// Resolve a valid token back to its owning identity
    pub fn resolve(&self, token: &Token) -> Result<Identity> {
        if !self.validate_token(token) {
            return Err(AegisError::InvalidToken);
        }
        // Issued tokens outlive their identity if it is removed from the
        // store; such a token no longer resolves.
        self.store
            .get(&token.username)
            .map_err(|_| AegisError::InvalidToken)
    }

    /// Revoke a token, returning whether it was previously valid
    pub fn revoke(&self, token: &Token) -> bool {
        self.issued.write().remove(&token.id).is_some()
    }

    /// Number of live tokens issued by this instance
    pub fn issued_count(&self) -> usize {
        self.issued.read().len()
    }
}
