//! Authentication tests: credential store and session tokens working together

use coursepad::auth::{CredentialStore, TokenIssuer, TokenRejection, User};
use coursepad::error::Error;

const COST: u32 = 4;

fn issuer() -> TokenIssuer {
    TokenIssuer::new(b"auth-tests-secret", 7)
}

#[tokio::test]
async fn test_register_login_verify_roundtrip() {
    let store = CredentialStore::in_memory(COST).unwrap();
    let tokens = issuer();

    let registered = store.create("A", "a@x.com", "pw123456").await.unwrap();
    let logged_in = store.authenticate("a@x.com", "pw123456").await.unwrap();
    assert_eq!(registered, logged_in);

    let token = tokens.issue(&logged_in).unwrap();
    let claims = tokens.verify(&token).unwrap();
    assert_eq!(claims.user(), registered);
}

#[tokio::test]
async fn test_duplicate_email_regardless_of_other_fields() {
    let store = CredentialStore::in_memory(COST).unwrap();
    store.create("A", "same@x.com", "pw123456").await.unwrap();

    for (name, password) in [("A", "pw123456"), ("B", "other"), ("Completely Different", "x")] {
        let err = store.create(name, "same@x.com", password).await.unwrap_err();
        assert!(matches!(err, Error::DuplicateEmail), "{}: {:?}", name, err);
    }
}

#[tokio::test]
async fn test_email_match_is_exact() {
    let store = CredentialStore::in_memory(COST).unwrap();
    store.create("A", "a@x.com", "pw123456").await.unwrap();

    assert!(matches!(
        store.authenticate("A@X.COM", "pw123456").await,
        Err(Error::InvalidCredentials)
    ));
}

#[tokio::test]
async fn test_stored_user_never_leaks_hash_through_projection() {
    let store = CredentialStore::in_memory(COST).unwrap();
    let user = store.create("A", "a@x.com", "pw123456").await.unwrap();

    let json = serde_json::to_value(&user).unwrap();
    let keys: Vec<&String> = json.as_object().unwrap().keys().collect();
    assert_eq!(keys.len(), 3);
    assert!(json.get("password_hash").is_none());
}

#[test]
fn test_jwt_token_format() {
    let user = User {
        id: 42,
        name: "Dana".to_string(),
        email: "dana@x.com".to_string(),
    };
    let token = issuer().issue(&user).expect("Failed to create token");
    assert!(!token.is_empty());
    assert_eq!(token.split('.').count(), 3); // JWT format: header.payload.signature
}

#[test]
fn test_token_valid_until_expiry() {
    let user = User {
        id: 1,
        name: "E".to_string(),
        email: "e@x.com".to_string(),
    };
    let now = chrono::Utc::now().timestamp();

    // Six days old: still inside the seven day window
    let recent = issuer().issue_at(&user, now - 6 * 24 * 60 * 60).unwrap();
    assert!(issuer().verify(&recent).is_ok());

    // Seven days and a minute old: expired
    let stale = issuer().issue_at(&user, now - 7 * 24 * 60 * 60 - 60).unwrap();
    assert_eq!(issuer().verify(&stale), Err(TokenRejection::Expired));
}

#[test]
fn test_tampered_signature_fails() {
    let user = User {
        id: 1,
        name: "F".to_string(),
        email: "f@x.com".to_string(),
    };
    let token = issuer().issue(&user).unwrap();
    let (unsigned, signature) = token.rsplit_once('.').unwrap();

    // Flip the first signature character; every bit of it is significant
    let mut chars: Vec<char> = signature.chars().collect();
    chars[0] = if chars[0] == 'A' { 'B' } else { 'A' };
    let tampered = format!("{}.{}", unsigned, chars.into_iter().collect::<String>());

    assert_ne!(tampered, token);
    assert_eq!(issuer().verify(&tampered), Err(TokenRejection::BadSignature));
}

#[test]
fn test_tampered_payload_fails() {
    let user = User {
        id: 1,
        name: "G".to_string(),
        email: "g@x.com".to_string(),
    };
    let admin = User {
        id: 2,
        name: "Admin".to_string(),
        email: "admin@x.com".to_string(),
    };
    let token = issuer().issue(&user).unwrap();
    let other = issuer().issue(&admin).unwrap();

    // Splice the second token's payload under the first token's signature
    let parts: Vec<&str> = token.split('.').collect();
    let other_parts: Vec<&str> = other.split('.').collect();
    let spliced = format!("{}.{}.{}", parts[0], other_parts[1], parts[2]);

    assert_eq!(issuer().verify(&spliced), Err(TokenRejection::BadSignature));
}

#[test]
fn test_malformed_token_rejection() {
    assert_eq!(issuer().verify("not-a-jwt-token"), Err(TokenRejection::Malformed));
}
