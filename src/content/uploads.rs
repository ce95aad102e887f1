//! File upload storage

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use crate::error::{Error, Result};

/// URL prefix the uploads directory is served under
pub const UPLOADS_ROUTE: &str = "/uploads";

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s+").expect("Invalid regex pattern - this is a bug in the codebase")
});

/// Metadata returned to the client after a successful upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredUpload {
    /// Name on disk
    pub filename: String,
    /// Name as sent by the client
    pub original: String,
    /// Where the file can be fetched
    pub url: String,
}

/// Directory that accepted uploads are written into
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    /// Use `dir`, creating it if needed
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write `data` under a timestamped name derived from `original`
    pub async fn save(&self, original: &str, data: &[u8]) -> Result<StoredUpload> {
        let now_millis = chrono::Utc::now().timestamp_millis();
        let filename = stored_name(original, now_millis)?;
        tokio::fs::write(self.dir.join(&filename), data).await?;

        tracing::info!("Stored upload {} ({} bytes)", filename, data.len());

        Ok(StoredUpload {
            url: format!("{}/{}", UPLOADS_ROUTE, filename),
            filename,
            original: original.to_string(),
        })
    }
}

/// `<millis>-<name>` with whitespace runs collapsed to `_` and any
/// directory components from the client dropped
pub fn stored_name(original: &str, now_millis: i64) -> Result<String> {
    let base = original
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();

    if base.is_empty() || base == "." || base == ".." {
        return Err(Error::InvalidInput("Invalid file name".to_string()));
    }

    Ok(format!("{}-{}", now_millis, WHITESPACE.replace_all(base, "_")))
}
