//! HTTP API server

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::auth::{require_auth, CredentialStore, TokenIssuer};
use crate::config::Config;
use crate::content::{ExampleCatalog, UploadStore, UPLOADS_ROUTE};
use crate::error::Result;

use super::routes;

/// Application state shared across handlers. Immutable once built.
pub struct AppState {
    pub config: Config,
    pub store: CredentialStore,
    pub tokens: TokenIssuer,
    pub examples: ExampleCatalog,
    pub uploads: UploadStore,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    /// Open storage and derive signing keys from a validated config
    pub fn from_config(config: Config) -> Result<Self> {
        config.validate()?;

        if config.auth.uses_placeholder_secret() {
            tracing::warn!("Using the placeholder JWT secret; set JWT_SECRET before deploying");
        }

        let store = CredentialStore::open(&config.storage.database, config.auth.bcrypt_cost)?;
        let tokens = TokenIssuer::new(config.auth.jwt_secret.as_bytes(), config.auth.token_ttl_days);
        let examples = ExampleCatalog::load(config.storage.examples_file.as_deref())?;
        let uploads = UploadStore::new(&config.storage.uploads_dir)?;

        tracing::debug!(
            ttl_secs = tokens.ttl_secs(),
            "Loaded {} examples, uploads in {}",
            examples.len(),
            uploads.dir().display()
        );

        Ok(Self {
            config,
            store,
            tokens,
            examples,
            uploads,
        })
    }
}

/// Run the HTTP API server
pub async fn run_server(config: Config) -> Result<()> {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = Arc::new(AppState::from_config(config)?);
    tracing::info!("{} registered accounts", state.store.count().await?);

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}

/// Create the router with all routes
pub fn create_router(state: SharedState) -> Router {
    let protected = Router::new()
        .route("/api/content", get(routes::get_content))
        .route("/api/examples", get(routes::list_examples))
        .route("/api/upload", post(routes::upload))
        .route_layer(middleware::from_fn_with_state(
            state.tokens.clone(),
            require_auth,
        ));

    Router::new()
        .route("/", get(routes::index))
        .route("/api/health", get(routes::health))
        // Auth routes
        .route("/api/auth/register", post(routes::register))
        .route("/api/auth/login", post(routes::login))
        .merge(protected)
        .nest_service(UPLOADS_ROUTE, ServeDir::new(state.uploads.dir()))
        // Middleware
        .layer(DefaultBodyLimit::max(state.config.server.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
