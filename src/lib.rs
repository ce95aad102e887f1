//! Coursepad - course backend with token-authenticated content
//!
//! This is the library interface for Coursepad: the credential store,
//! session tokens, the HTTP API and its configuration.

pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod content;
pub mod error;

pub use config::Config;
pub use error::Error;
