//! Identity model
//!
//! Registered principals and their roles.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AegisError;

/// Role assigned to an identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    /// Regular user with no administrative rights
    Ordinary,

    /// Administrator allowed to manage the credential store
    Admin,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Ordinary => write!(f, "ordinary"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

impl FromStr for Role {
    type Err = AegisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ordinary" => Ok(Role::Ordinary),
            "admin" => Ok(Role::Admin),
            other => Err(AegisError::InvalidArguments(format!(
                "unknown role: {}",
                other
            ))),
        }
    }
}

/// A registered principal
///
/// Keyed by username in the credential store. Immutable after registration
/// except through the `update_user` capability, which replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Unique username (store key)
    pub username: String,

    /// Contact addresses
    pub emails: Vec<String>,

    /// Human-readable display name
    pub full_name: String,

    /// Assigned role
    pub role: Role,

    /// Secret credential, compared by exact match at authentication
    pub secret: String,
}

impl Identity {
    /// Create a new identity
    pub fn new(
        username: impl Into<String>,
        emails: Vec<String>,
        full_name: impl Into<String>,
        role: Role,
        secret: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            emails,
            full_name: full_name.into(),
            role,
            secret: secret.into(),
        }
    }

    /// True if this identity holds the Admin role
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}
