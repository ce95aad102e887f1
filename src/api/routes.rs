//! API route handlers

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::JsonRejection,
        Multipart, State,
    },
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::server::SharedState;
use crate::auth::models::required;
use crate::auth::{AuthResponse, AuthUser, LoginRequest, RegisterRequest};
use crate::content::{Example, StoredUpload};
use crate::error::{Error, Result};

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub message: String,
    pub file: StoredUpload,
}

fn missing_fields() -> Error {
    Error::InvalidInput("Missing fields".to_string())
}

// Keeps the multipart status so an oversized body stays a 413
fn upload_failed(err: MultipartError) -> Error {
    Error::Upload(err.status(), err.body_text())
}

// Health check

pub async fn index() -> &'static str {
    "coursepad backend ready"
}

pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "healthy" }))
}

// Auth routes

pub async fn register(
    State(state): State<SharedState>,
    payload: std::result::Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>> {
    let req = payload.map(|Json(req)| req).unwrap_or_default();

    let (Some(name), Some(email), Some(password)) = (
        required(&req.name),
        required(&req.email),
        required(&req.password),
    ) else {
        return Err(missing_fields());
    };

    let user = state.store.create(name, email, password).await?;
    let token = state.tokens.issue(&user)?;

    tracing::info!(user_id = user.id, "Registered new user");

    Ok(Json(AuthResponse { user, token }))
}

pub async fn login(
    State(state): State<SharedState>,
    payload: std::result::Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>> {
    let req = payload.map(|Json(req)| req).unwrap_or_default();

    let (Some(email), Some(password)) = (required(&req.email), required(&req.password)) else {
        return Err(missing_fields());
    };

    let user = match state.store.authenticate(email, password).await {
        Ok(user) => user,
        Err(Error::InvalidCredentials) => {
            tracing::warn!("Failed login attempt");
            return Err(Error::InvalidCredentials);
        }
        Err(e) => return Err(e),
    };
    let token = state.tokens.issue(&user)?;

    tracing::info!(user_id = user.id, "User logged in");

    Ok(Json(AuthResponse { user, token }))
}

// Protected routes

pub async fn get_content(State(state): State<SharedState>) -> Result<Response> {
    match tokio::fs::read(&state.config.storage.content_file).await {
        Ok(body) => Ok((
            [(header::CONTENT_TYPE, "text/markdown; charset=utf-8")],
            body,
        )
            .into_response()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Ok((StatusCode::NOT_FOUND, "Content not found").into_response())
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn list_examples(State(state): State<SharedState>) -> Json<Vec<Example>> {
    Json(state.examples.all().to_vec())
}

pub async fn upload(
    State(state): State<SharedState>,
    AuthUser(user): AuthUser,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>> {
    let Ok(mut multipart) = multipart else {
        return Err(Error::InvalidInput("No file".to_string()));
    };

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(upload_failed)?
    {
        if field.name() != Some("file") {
            continue;
        }
        let Some(original) = field.file_name().map(str::to_string) else {
            continue;
        };

        let data = field
            .bytes()
            .await
            .map_err(upload_failed)?;
        let file = state.uploads.save(&original, &data).await?;

        tracing::info!(user_id = user.id, "Accepted upload {}", file.filename);

        return Ok(Json(UploadResponse {
            message: "Uploaded".to_string(),
            file,
        }));
    }

    Err(Error::InvalidInput("No file".to_string()))
}
