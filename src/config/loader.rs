//! Configuration loading and environment variable interpolation

use crate::error::{Error, Result};
use regex::Regex;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use super::Config;

pub const CONFIG_FILENAME: &str = "coursepad.toml";

/// Load configuration from coursepad.toml
pub fn load_config() -> Result<Config> {
    let config_path = find_config_file()?;
    load_config_from_path(&config_path)
}

/// Load coursepad.toml if one exists, otherwise fall back to defaults.
/// Environment overrides are applied either way.
pub fn load_config_or_default() -> Result<Config> {
    let mut config = match find_config_file() {
        Ok(path) => {
            tracing::debug!("Loading configuration from {}", path.display());
            load_config_from_path(&path)?
        }
        Err(Error::ConfigNotFound) => {
            tracing::debug!("No {} found, using defaults", CONFIG_FILENAME);
            Config::default()
        }
        Err(e) => return Err(e),
    };
    apply_env_overrides(&mut config, |key| env::var(key).ok())?;
    Ok(config)
}

/// Load configuration from a specific path
pub fn load_config_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path).map_err(|_| Error::ConfigNotFound)?;
    let content = interpolate_env_vars(&content);
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

/// Write configuration to a path as TOML
pub fn save_config(config: &Config, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
    fs::write(path, content)?;
    Ok(())
}

/// Apply JWT_SECRET, PORT and COURSEPAD_ENV on top of a loaded config
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(secret) = lookup("JWT_SECRET").filter(|s| !s.is_empty()) {
        config.auth.jwt_secret = secret;
    }

    if let Some(port) = lookup("PORT").filter(|s| !s.is_empty()) {
        config.server.port = port
            .trim()
            .parse()
            .map_err(|_| Error::Config(format!("PORT is not a valid port: {}", port)))?;
    }

    if let Some(environment) = lookup("COURSEPAD_ENV").filter(|s| !s.is_empty()) {
        config.server.environment = environment.parse()?;
    }

    Ok(())
}

/// Find the configuration file, searching upward from current directory
fn find_config_file() -> Result<PathBuf> {
    let mut current = env::current_dir().map_err(|e| Error::Config(e.to_string()))?;

    loop {
        let config_path = current.join(CONFIG_FILENAME);
        if config_path.exists() {
            return Ok(config_path);
        }

        if !current.pop() {
            return Err(Error::ConfigNotFound);
        }
    }
}

/// Interpolate environment variables in the format ${VAR_NAME} or ${VAR_NAME:-default}
fn interpolate_env_vars(content: &str) -> String {
    // This regex is a compile-time constant, panicking is acceptable here
    // as it indicates a programming error in the codebase, not a runtime issue
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)(?::-([^}]*))?\}")
        .expect("Invalid regex pattern - this is a bug in the codebase");

    re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        let default = caps.get(2).map(|m| m.as_str()).unwrap_or("");

        env::var(var_name).unwrap_or_else(|_| default.to_string())
    })
    .to_string()
}

/// Generate a default configuration file content with the given signing secret
pub fn default_config_content(jwt_secret: &str) -> String {
    format!(
        r#"# Coursepad Configuration

[server]
host = "0.0.0.0"
port = 5000
environment = "development"  # or "production"
max_upload_bytes = 10485760

[auth]
# JWT_SECRET in the environment takes precedence over this value
jwt_secret = "${{JWT_SECRET:-{secret}}}"
token_ttl_days = 7
bcrypt_cost = 10

[storage]
database = "./data.db"
uploads_dir = "./uploads"
content_file = "./content/BCA_content.md"
# examples_file = "./content/examples.json"
"#,
        secret = jwt_secret
    )
}
