//! Authentication: credential storage, session tokens and the request gate

pub mod jwt;
pub mod middleware;
pub mod models;
pub mod store;

pub use jwt::{Claims, TokenIssuer, TokenRejection};
pub use middleware::{authenticate_headers, bearer_token, require_auth, AuthUser};
pub use models::{AuthResponse, LoginRequest, RegisterRequest, StoredUser, User};
pub use store::CredentialStore;
