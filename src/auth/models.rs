//! Authentication models

use serde::{Deserialize, Serialize};

/// Public projection of a registered account. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Store-assigned identifier
    pub id: i64,
    /// Display name
    pub name: String,
    /// Unique login email
    pub email: String,
}

/// Full account row as persisted by the credential store
#[derive(Clone)]
pub struct StoredUser {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

impl StoredUser {
    /// Drop the hash, leaving the projection safe to hand out
    pub fn into_user(self) -> User {
        User {
            id: self.id,
            name: self.name,
            email: self.email,
        }
    }
}

impl std::fmt::Debug for StoredUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoredUser")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .finish()
    }
}

/// Registration payload. Fields are optional so absence can be reported uniformly.
#[derive(Debug, Default, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Login credentials
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Register/login response with token
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
}

/// Returns the value when present and non-empty
pub(crate) fn required(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_user_drops_hash() {
        let stored = StoredUser {
            id: 7,
            name: "A".to_string(),
            email: "a@x.com".to_string(),
            password_hash: "$2b$10$abc".to_string(),
        };
        let user = stored.into_user();
        assert_eq!(user.id, 7);

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("password"));
    }

    #[test]
    fn test_debug_redacts_hash() {
        let stored = StoredUser {
            id: 1,
            name: "A".to_string(),
            email: "a@x.com".to_string(),
            password_hash: "$2b$10$secret".to_string(),
        };
        assert!(!format!("{:?}", stored).contains("$2b$10$secret"));
    }

    #[test]
    fn test_required_rejects_empty() {
        assert_eq!(required(&Some("x".to_string())), Some("x"));
        assert_eq!(required(&Some(String::new())), None);
        assert_eq!(required(&None), None);
    }

    #[test]
    fn test_register_request_tolerates_missing_fields() {
        let req: RegisterRequest = serde_json::from_str(r#"{"email":"a@x.com"}"#).unwrap();
        assert!(req.name.is_none());
        assert_eq!(req.email.as_deref(), Some("a@x.com"));
    }
}
