//! Credential Store
//!
//! In-memory identity registry keyed by username.
//!
//! The store is shared between the auth service and the dispatcher's
//! capability handlers, so all access goes through an internal RwLock.
//! Reads (get) take the read lock; mutations (add/update/remove) take the
//! write lock.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::error::{AegisError, Result};
use crate::identity::Identity;

/// Registry of identities, keyed by username
pub struct CredentialStore {
    identities: RwLock<HashMap<String, Identity>>,
}

impl CredentialStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self {
            identities: RwLock::new(HashMap::new()),
        }
    }

    /// Insert a new identity
    ///
    /// Fails with `DuplicateIdentity` if the username is already registered;
    /// the stored identity is left untouched in that case.
    pub fn add(&self, identity: Identity) -> Result<()> {
        let mut identities = self.identities.write();
        if identities.contains_key(&identity.username) {
            return Err(AegisError::DuplicateIdentity(identity.username));
        }
        identities.insert(identity.username.clone(), identity);
        Ok(())
    }

    /// Look up an identity by username
    pub fn get(&self, username: &str) -> Result<Identity> {
        self.identities
            .read()
            .get(username)
            .cloned()
            .ok_or_else(|| AegisError::NotFound(username.to_string()))
    }

    /// Replace an existing identity
    ///
    /// Fails with `NotFound` if the username is not registered.
    pub fn update(&self, identity: Identity) -> Result<()> {
        let mut identities = self.identities.write();
        if !identities.contains_key(&identity.username) {
            return Err(AegisError::NotFound(identity.username));
        }
        identities.insert(identity.username.clone(), identity);
        Ok(())
    }

    /// Remove an identity, returning it
    ///
    /// Fails with `NotFound` if the username is not registered.
    pub fn remove(&self, username: &str) -> Result<Identity> {
        self.identities
            .write()
            .remove(username)
            .ok_or_else(|| AegisError::NotFound(username.to_string()))
    }

    /// Number of registered identities
    pub fn len(&self) -> usize {
        self.identities.read().len()
    }

    /// True if no identities are registered
    pub fn is_empty(&self) -> bool {
        self.identities.read().is_empty()
    }
}

impl Default for CredentialStore {
    fn default() -> Self {
        Self::new()
    }
}
