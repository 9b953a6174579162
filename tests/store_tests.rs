//! Credential Store Tests

use aegisrpc::{AegisError, CredentialStore, Identity, Role};

fn identity(username: &str, role: Role) -> Identity {
    Identity::new(
        username,
        vec![format!("{}@example.com", username)],
        username.to_uppercase(),
        role,
        "secret",
    )
}

#[test]
fn test_add_then_get_round_trip() {
    let store = CredentialStore::new();
    let bob = identity("bob", Role::Ordinary);

    store.add(bob.clone()).unwrap();
    let fetched = store.get("bob").unwrap();

    assert_eq!(fetched, bob);
}

#[test]
fn test_add_duplicate_fails_and_preserves_original() {
    let store = CredentialStore::new();
    let original = identity("bob", Role::Ordinary);
    store.add(original.clone()).unwrap();

    let mut imposter = identity("bob", Role::Admin);
    imposter.secret = "stolen".to_string();

    let result = store.add(imposter);
    assert!(matches!(result, Err(AegisError::DuplicateIdentity(ref u)) if u == "bob"));

    // First-added identity is unchanged
    assert_eq!(store.get("bob").unwrap(), original);
    assert_eq!(store.len(), 1);
}

#[test]
fn test_get_missing_fails() {
    let store = CredentialStore::new();
    let result = store.get("ghost");
    assert!(matches!(result, Err(AegisError::NotFound(ref u)) if u == "ghost"));
}

#[test]
fn test_update_replaces_existing() {
    let store = CredentialStore::new();
    store.add(identity("bob", Role::Ordinary)).unwrap();

    let promoted = identity("bob", Role::Admin);
    store.update(promoted.clone()).unwrap();

    assert_eq!(store.get("bob").unwrap(), promoted);
    assert_eq!(store.len(), 1);
}

#[test]
fn test_update_missing_fails() {
    let store = CredentialStore::new();
    let result = store.update(identity("ghost", Role::Ordinary));
    assert!(matches!(result, Err(AegisError::NotFound(_))));
    assert!(store.is_empty());
}

#[test]
fn test_remove_returns_identity() {
    let store = CredentialStore::new();
    let bob = identity("bob", Role::Ordinary);
    store.add(bob.clone()).unwrap();

    let removed = store.remove("bob").unwrap();
    assert_eq!(removed, bob);
    assert!(store.is_empty());

    let result = store.remove("bob");
    assert!(matches!(result, Err(AegisError::NotFound(_))));
}
