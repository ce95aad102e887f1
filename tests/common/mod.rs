//! Common test utilities for integration tests

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use coursepad::api::{create_router, AppState};
use coursepad::config::Config;
use serde_json::{json, Value};
use tempfile::TempDir;

pub const TEST_SECRET: &str = "integration-test-secret";

/// Config pointing every path into `dir`, with the cheapest bcrypt cost
pub fn test_config(dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.auth.jwt_secret = TEST_SECRET.to_string();
    config.auth.bcrypt_cost = 4;
    config.storage.database = dir.path().join("data.db");
    config.storage.uploads_dir = dir.path().join("uploads");
    config.storage.content_file = dir.path().join("content").join("BCA_content.md");
    config
}

/// A server running in the background on an ephemeral port
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: reqwest::Client,
    pub dir: TempDir,
    shutdown: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestServer {
    pub async fn start() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let config = test_config(&dir);
        Self::start_with(dir, config).await
    }

    pub async fn start_with(dir: TempDir, config: Config) -> Self {
        let state = AppState::from_config(config).expect("Failed to build app state");
        let app = create_router(Arc::new(state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test server");
        let addr = listener.local_addr().expect("Failed to get local address");

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.await;
                })
                .await
                .expect("Server error");
        });

        Self {
            addr,
            client: reqwest::Client::new(),
            dir,
            shutdown: Some(shutdown_tx),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn register(&self, name: &str, email: &str, password: &str) -> reqwest::Response {
        self.client
            .post(self.url("/api/auth/register"))
            .json(&json!({ "name": name, "email": email, "password": password }))
            .send()
            .await
            .expect("register request failed")
    }

    pub async fn login(&self, email: &str, password: &str) -> reqwest::Response {
        self.client
            .post(self.url("/api/auth/login"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("login request failed")
    }

    /// Register an account and return its token
    pub async fn token_for(&self, email: &str) -> String {
        let body: Value = self
            .register("Tester", email, "pw123456")
            .await
            .json()
            .await
            .expect("register response was not JSON");
        body["token"]
            .as_str()
            .expect("register response had no token")
            .to_string()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}
