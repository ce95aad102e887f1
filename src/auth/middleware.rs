//! Authentication middleware and extractors

use crate::auth::{models::User, TokenIssuer};
use crate::error::{Error, Result};
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};

/// Identity decoded from a verified token, placed in request extensions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser(pub User);

/// Pull the bearer token out of the Authorization header.
///
/// An absent or empty header is `MissingToken`; anything present that is not
/// `Bearer <token>` is `InvalidToken`.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str> {
    let Some(value) = headers.get(header::AUTHORIZATION) else {
        return Err(Error::MissingToken);
    };

    if value.is_empty() {
        return Err(Error::MissingToken);
    }

    value
        .to_str()
        .ok()
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(Error::InvalidToken)
}

/// Verify the request's token and return the identity it asserts
pub fn authenticate_headers(tokens: &TokenIssuer, headers: &HeaderMap) -> Result<User> {
    let token = bearer_token(headers)?;
    let claims = tokens.verify(token)?;
    Ok(claims.user())
}

/// Middleware for requiring authentication
pub async fn require_auth(
    State(tokens): State<TokenIssuer>,
    mut req: Request,
    next: Next,
) -> std::result::Result<Response, Error> {
    let user = authenticate_headers(&tokens, req.headers())?;
    tracing::debug!(user_id = user.id, "Authenticated request");
    req.extensions_mut().insert(AuthUser(user));
    Ok(next.run(req).await)
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or(Error::MissingToken)
    }
}
