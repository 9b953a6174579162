//! Auth Service Tests

use std::sync::Arc;

use aegisrpc::auth::Token;
use aegisrpc::{AegisError, AuthService, CredentialStore, Identity, Role};

fn store_with_user(username: &str, secret: &str, role: Role) -> Arc<CredentialStore> {
    let store = Arc::new(CredentialStore::new());
    store
        .add(Identity::new(
            username,
            vec![format!("{}@example.com", username)],
            username.to_string(),
            role,
            secret,
        ))
        .unwrap();
    store
}

#[test]
fn test_authenticate_success_mints_token() {
    let store = store_with_user("bob", "pw", Role::Ordinary);
    let auth = AuthService::new(Arc::clone(&store), false);

    let token = auth.authenticate("bob", "pw").unwrap();
    assert_eq!(token.username, "bob");
    assert!(!token.id.is_empty());
    assert!(auth.validate_token(&token));
    assert_eq!(auth.issued_count(), 1);
}

#[test]
fn test_authenticate_wrong_secret_fails() {
    let store = store_with_user("bob", "pw", Role::Ordinary);
    let auth = AuthService::new(store, false);

    let result = auth.authenticate("bob", "wrong");
    assert!(matches!(result, Err(AegisError::AuthenticationFailed)));
    assert_eq!(auth.issued_count(), 0);
}

#[test]
fn test_authenticate_unknown_user_fails_identically() {
    let store = store_with_user("bob", "pw", Role::Ordinary);
    let auth = AuthService::new(store, false);

    let unknown = auth.authenticate("ghost", "pw").unwrap_err();
    let mismatch = auth.authenticate("bob", "wrong").unwrap_err();

    // Unknown username and wrong secret must be indistinguishable
    assert_eq!(unknown.to_string(), mismatch.to_string());
}

#[test]
fn test_each_authentication_mints_a_fresh_token() {
    let store = store_with_user("bob", "pw", Role::Ordinary);
    let auth = AuthService::new(store, false);

    let first = auth.authenticate("bob", "pw").unwrap();
    let second = auth.authenticate("bob", "pw").unwrap();

    assert_ne!(first.id, second.id);
    assert!(auth.validate_token(&first));
    assert!(auth.validate_token(&second));
}

#[test]
fn test_validate_token_rejects_foreign_token() {
    let store = store_with_user("bob", "pw", Role::Ordinary);
    let auth_a = AuthService::new(Arc::clone(&store), false);
    let auth_b = AuthService::new(store, false);

    let token = auth_a.authenticate("bob", "pw").unwrap();

    // Issued by a different service instance
    assert!(!auth_b.validate_token(&token));
}

#[test]
fn test_validate_token_rejects_forged_token() {
    let store = store_with_user("bob", "pw", Role::Ordinary);
    let auth = AuthService::new(store, false);

    let forged = Token {
        id: "deadbeefdeadbeefdeadbeefdeadbeef".to_string(),
        username: "bob".to_string(),
    };
    assert!(!auth.validate_token(&forged));
}

#[test]
fn test_validate_token_rejects_rebound_username() {
    let store = store_with_user("bob", "pw", Role::Ordinary);
    let auth = AuthService::new(store, false);

    let mut token = auth.authenticate("bob", "pw").unwrap();
    token.username = "admin".to_string();

    // Token id is real but no longer bound to the claimed identity
    assert!(!auth.validate_token(&token));
}

#[test]
fn test_resolve_returns_owning_identity() {
    let store = store_with_user("bob", "pw", Role::Admin);
    let auth = AuthService::new(store, false);

    let token = auth.authenticate("bob", "pw").unwrap();
    let identity = auth.resolve(&token).unwrap();

    assert_eq!(identity.username, "bob");
    assert_eq!(identity.role, Role::Admin);
}

#[test]
fn test_resolve_invalid_token_fails() {
    let store = store_with_user("bob", "pw", Role::Ordinary);
    let auth = AuthService::new(store, false);

    let forged = Token {
        id: "deadbeefdeadbeefdeadbeefdeadbeef".to_string(),
        username: "bob".to_string(),
    };
    assert!(matches!(
        auth.resolve(&forged),
        Err(AegisError::InvalidToken)
    ));
}

#[test]
fn test_resolve_fails_after_identity_removed() {
    let store = store_with_user("bob", "pw", Role::Ordinary);
    let auth = AuthService::new(Arc::clone(&store), false);

    let token = auth.authenticate("bob", "pw").unwrap();
    store.remove("bob").unwrap();

    assert!(matches!(
        auth.resolve(&token),
        Err(AegisError::InvalidToken)
    ));
}

#[test]
fn test_revoke_invalidates_token() {
    let store = store_with_user("bob", "pw", Role::Ordinary);
    let auth = AuthService::new(store, false);

    let token = auth.authenticate("bob", "pw").unwrap();
    assert!(auth.revoke(&token));
    assert!(!auth.validate_token(&token));

    // Second revoke is a no-op
    assert!(!auth.revoke(&token));
}

#[test]
fn test_token_display_round_trip() {
    let token = Token {
        id: "0123456789abcdef0123456789abcdef".to_string(),
        username: "admin".to_string(),
    };
    let parsed: Token = token.to_string().parse().unwrap();
    assert_eq!(parsed, token);
}

#[test]
fn test_token_parse_rejects_malformed() {
    assert!("no-separator".parse::<Token>().is_err());
    assert!(":missing-id".parse::<Token>().is_err());
    assert!("missing-user:".parse::<Token>().is_err());
}
