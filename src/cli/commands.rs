//! CLI command implementations

use anyhow::Result;
use serde_json::json;
use std::fs;
use std::path::Path;

use crate::cli::{error, info, print_config_summary, success, warn, OutputFormat};
use crate::config::{self, loader::CONFIG_FILENAME, Config};

/// Initialize a new coursepad.toml configuration file
pub async fn init(force: bool) -> Result<()> {
    let config_path = Path::new(CONFIG_FILENAME);

    if config_path.exists() && !force {
        warn(&format!("{} already exists (use --force to overwrite)", CONFIG_FILENAME));
        return Ok(());
    }

    let content = config::loader::default_config_content(&generate_secret());
    fs::write(config_path, content)?;

    success(&format!("Created {}", CONFIG_FILENAME));
    info("Run 'coursepad serve' to start the server");

    Ok(())
}

/// Start the HTTP API server
pub async fn serve(host: Option<String>, port: Option<u16>) -> Result<()> {
    let mut config = load_config()?;
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    info(&format!(
        "Starting server at http://{}:{}",
        config.server.host, config.server.port
    ));

    crate::api::run_server(config).await?;
    Ok(())
}

/// Validate configuration and print a summary
pub async fn check_config(format: OutputFormat) -> Result<()> {
    let config = load_config()?;
    let validation = config.validate();

    match format {
        OutputFormat::Text => {
            print_config_summary(&config);
            println!();
        }
        OutputFormat::Json => {
            let summary = json!({
                "server": &config.server,
                "storage": &config.storage,
                "auth": {
                    "placeholder_secret": config.auth.uses_placeholder_secret(),
                    "token_ttl_days": config.auth.token_ttl_days,
                    "bcrypt_cost": config.auth.bcrypt_cost,
                },
                "valid": validation.is_ok(),
            });
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }

    if let Err(e) = &validation {
        error(&format!("Configuration is invalid: {}", e));
    }
    validation?;
    success("Configuration is valid");
    Ok(())
}

fn load_config() -> Result<Config> {
    Ok(config::load_config_or_default()?)
}

/// Two v4 UUIDs worth of randomness, hex encoded
fn generate_secret() -> String {
    format!(
        "{}{}",
        uuid::Uuid::new_v4().simple(),
        uuid::Uuid::new_v4().simple()
    )
}
