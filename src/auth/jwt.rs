//! JWT token handling

use crate::auth::models::User;
use crate::error::{Error, Result};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// JWT claims
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// User ID
    pub id: i64,
    /// Display name
    pub name: String,
    /// Login email
    pub email: String,
    /// Issued at
    pub iat: i64,
    /// Expiration time
    pub exp: i64,
}

impl Claims {
    /// Create claims for a user issued at `now` (unix seconds)
    pub fn for_user(user: &User, now: i64, ttl_secs: i64) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            iat: now,
            exp: now + ttl_secs,
        }
    }

    /// Identity asserted by the token
    pub fn user(&self) -> User {
        User {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }

    /// Check if token is expired
    pub fn is_expired(&self) -> bool {
        chrono::Utc::now().timestamp() >= self.exp
    }
}

/// Why a presented token was refused. Only ever logged; callers see `Error::InvalidToken`.
#[derive(Debug, thiserror::Error, Clone, Copy, PartialEq, Eq)]
pub enum TokenRejection {
    #[error("token is malformed")]
    Malformed,

    #[error("token has expired")]
    Expired,

    #[error("token signature does not verify")]
    BadSignature,
}

impl From<TokenRejection> for Error {
    fn from(rejection: TokenRejection) -> Self {
        tracing::debug!("Rejected token: {}", rejection);
        Error::InvalidToken
    }
}

/// Mints and verifies HS256 session tokens with the server-wide secret
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl_secs: i64,
}

impl TokenIssuer {
    /// Create an issuer for `secret` whose tokens live for `ttl_days`
    pub fn new(secret: &[u8], ttl_days: u32) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl_secs: i64::from(ttl_days) * 24 * 60 * 60,
        }
    }

    /// Token lifetime in seconds
    pub fn ttl_secs(&self) -> i64 {
        self.ttl_secs
    }

    /// Create a token for `user` issued now
    pub fn issue(&self, user: &User) -> Result<String> {
        self.issue_at(user, chrono::Utc::now().timestamp())
    }

    /// Create a token for `user` issued at `now` (unix seconds)
    pub fn issue_at(&self, user: &User, now: i64) -> Result<String> {
        let claims = Claims::for_user(user, now, self.ttl_secs);
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| Error::Token(format!("Failed to create token: {}", e)))
    }

    /// Validate and decode a token. Valid only while the current time is before `exp`.
    pub fn verify(&self, token: &str) -> std::result::Result<Claims, TokenRejection> {
        let claims = decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenRejection::Expired,
                ErrorKind::InvalidSignature => TokenRejection::BadSignature,
                _ => TokenRejection::Malformed,
            })?;

        // jsonwebtoken still accepts `exp == now`
        if claims.is_expired() {
            return Err(TokenRejection::Expired);
        }
        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(b"test-secret", 7)
    }

    fn alice() -> User {
        User {
            id: 1,
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
        }
    }

    #[test]
    fn test_create_and_validate_token() {
        let token = issuer().issue(&alice()).expect("Failed to create token");
        let claims = issuer().verify(&token).expect("Failed to validate token");

        assert_eq!(claims.user(), alice());
        assert_eq!(claims.exp - claims.iat, 7 * 24 * 60 * 60);
        assert_eq!(issuer().ttl_secs(), claims.exp - claims.iat);
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_issue_is_deterministic_for_same_timestamp() {
        let a = issuer().issue_at(&alice(), 1_700_000_000).unwrap();
        let b = issuer().issue_at(&alice(), 1_700_000_000).unwrap();
        let c = issuer().issue_at(&alice(), 1_700_000_001).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_expired_token() {
        let eight_days_ago = chrono::Utc::now().timestamp() - 8 * 24 * 60 * 60;
        let token = issuer().issue_at(&alice(), eight_days_ago).unwrap();
        assert_eq!(issuer().verify(&token), Err(TokenRejection::Expired));
    }

    #[test]
    fn test_token_rejected_at_exact_expiry() {
        let tokens = issuer();
        let now = chrono::Utc::now().timestamp();
        let token = tokens.issue_at(&alice(), now - tokens.ttl_secs()).unwrap();
        assert_eq!(tokens.verify(&token), Err(TokenRejection::Expired));

        let token = tokens.issue_at(&alice(), now - tokens.ttl_secs() + 60).unwrap();
        assert!(tokens.verify(&token).is_ok());
    }

    #[test]
    fn test_wrong_secret() {
        let token = issuer().issue(&alice()).unwrap();
        let other = TokenIssuer::new(b"another-secret", 7);
        assert_eq!(other.verify(&token), Err(TokenRejection::BadSignature));
    }

    #[test]
    fn test_invalid_token() {
        assert_eq!(
            issuer().verify("invalid.token.here"),
            Err(TokenRejection::Malformed)
        );
        assert_eq!(issuer().verify(""), Err(TokenRejection::Malformed));
    }

    #[test]
    fn test_rejection_collapses_to_invalid_token() {
        let err: Error = TokenRejection::Expired.into();
        assert!(matches!(err, Error::InvalidToken));
    }
}
