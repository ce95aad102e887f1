//! SQLite-backed credential store.
//!
//! Owns the `users` table and every password hash in it. Hashing and SQLite
//! calls are blocking, so the async methods hop onto the blocking pool.

use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::Arc;

use crate::auth::models::{StoredUser, User};
use crate::error::{Error, Result};

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL
);";

/// Persistent account storage with bcrypt password hashing
#[derive(Clone)]
pub struct CredentialStore {
    conn: Arc<Mutex<Connection>>,
    bcrypt_cost: u32,
}

impl CredentialStore {
    /// Open (or create) the credential database at the given path
    pub fn open(path: &Path, bcrypt_cost: u32) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        // WAL mode for concurrent reads + crash safety
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get::<_, String>(0))?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;

        Self::with_connection(conn, bcrypt_cost)
    }

    /// In-memory store, for tests and throwaway runs
    pub fn in_memory(bcrypt_cost: u32) -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?, bcrypt_cost)
    }

    fn with_connection(conn: Connection, bcrypt_cost: u32) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            bcrypt_cost,
        })
    }

    /// Register a new account. The email must not already be registered.
    pub async fn create(&self, name: &str, email: &str, password: &str) -> Result<User> {
        if name.is_empty() || email.is_empty() || password.is_empty() {
            return Err(Error::InvalidInput("Missing fields".to_string()));
        }

        let conn = Arc::clone(&self.conn);
        let cost = self.bcrypt_cost;
        let name = name.to_string();
        let email = email.to_string();
        let password = password.to_string();

        tokio::task::spawn_blocking(move || -> Result<User> {
            let password_hash = bcrypt::hash(&password, cost)?;

            let conn = conn.lock();
            conn.execute(
                "INSERT INTO users (name, email, password_hash) VALUES (?1, ?2, ?3)",
                params![name, email, password_hash],
            )
            .map_err(map_insert_error)?;

            Ok(User {
                id: conn.last_insert_rowid(),
                name,
                email,
            })
        })
        .await?
    }

    /// Look up the full record, hash included, for credential checks
    pub async fn find_by_email(&self, email: &str) -> Result<Option<StoredUser>> {
        let conn = Arc::clone(&self.conn);
        let email = email.to_string();

        tokio::task::spawn_blocking(move || -> Result<Option<StoredUser>> {
            let conn = conn.lock();
            let user = conn
                .query_row(
                    "SELECT id, name, email, password_hash FROM users WHERE email = ?1",
                    params![email],
                    |row| {
                        Ok(StoredUser {
                            id: row.get(0)?,
                            name: row.get(1)?,
                            email: row.get(2)?,
                            password_hash: row.get(3)?,
                        })
                    },
                )
                .optional()?;
            Ok(user)
        })
        .await?
    }

    /// Compare a plaintext attempt against a stored bcrypt hash.
    /// An empty or unparseable hash never matches.
    pub fn verify_password(stored_hash: &str, attempt: &str) -> bool {
        if stored_hash.is_empty() {
            return false;
        }
        bcrypt::verify(attempt, stored_hash).unwrap_or(false)
    }

    /// Check login credentials. Unknown email and wrong password are
    /// indistinguishable to the caller.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User> {
        if email.is_empty() || password.is_empty() {
            return Err(Error::InvalidInput("Missing fields".to_string()));
        }

        let Some(stored) = self.find_by_email(email).await? else {
            return Err(Error::InvalidCredentials);
        };

        let attempt = password.to_string();
        let hash = stored.password_hash.clone();
        let ok = tokio::task::spawn_blocking(move || Self::verify_password(&hash, &attempt)).await?;

        if ok {
            Ok(stored.into_user())
        } else {
            Err(Error::InvalidCredentials)
        }
    }

    /// Number of registered accounts
    pub async fn count(&self) -> Result<i64> {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || -> Result<i64> {
            let conn = conn.lock();
            Ok(conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?)
        })
        .await?
    }
}

fn map_insert_error(err: rusqlite::Error) -> Error {
    match &err {
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            Error::DuplicateEmail
        }
        _ => Error::Database(err),
    }
}
