//! Example programs served to signed-in users

use rust_embed::RustEmbed;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};

#[derive(RustEmbed)]
#[folder = "data/"]
struct BundledData;

const BUNDLED_EXAMPLES: &str = "examples.json";

/// A runnable example shown in the course UI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Example {
    pub id: String,
    pub title: String,
    pub lang: String,
    /// Self-contained HTML document
    pub source: String,
}

/// Immutable list of examples loaded at startup
#[derive(Debug, Clone, Default)]
pub struct ExampleCatalog {
    examples: Vec<Example>,
}

impl ExampleCatalog {
    /// Load from `path` if given, otherwise from the bundled data file
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Self::bundled(),
        }
    }

    /// Read a JSON array of examples from disk
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// The examples shipped inside the binary
    pub fn bundled() -> Result<Self> {
        let file = BundledData::get(BUNDLED_EXAMPLES)
            .ok_or_else(|| Error::NotFound(format!("Bundled {}", BUNDLED_EXAMPLES)))?;
        let examples: Vec<Example> = serde_json::from_slice(&file.data)?;
        Ok(Self { examples })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let examples: Vec<Example> = serde_json::from_str(json)?;
        Ok(Self { examples })
    }

    pub fn all(&self) -> &[Example] {
        &self.examples
    }

    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }
}
