//! CLI output formatting utilities

use colored::Colorize;

use crate::config::Config;

/// Print a success message
pub fn success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

/// Print an error message
pub fn error(message: &str) {
    eprintln!("{} {}", "✗".red(), message);
}

/// Print a warning message
pub fn warn(message: &str) {
    println!("{} {}", "⚠".yellow(), message);
}

/// Print an info message
pub fn info(message: &str) {
    println!("{} {}", "ℹ".blue(), message);
}

/// Print a configuration summary. The signing secret is never shown.
pub fn print_config_summary(config: &Config) {
    let secret = if config.auth.uses_placeholder_secret() {
        "placeholder".yellow().to_string()
    } else {
        "set".green().to_string()
    };

    println!("{}", "Server".bold());
    println!("  {:<18} {}:{}", "Listen:", config.server.host, config.server.port);
    println!("  {:<18} {}", "Environment:", config.server.environment);
    println!("  {:<18} {} bytes", "Upload limit:", config.server.max_upload_bytes);
    println!();
    println!("{}", "Auth".bold());
    println!("  {:<18} {}", "JWT secret:", secret);
    println!("  {:<18} {} days", "Token lifetime:", config.auth.token_ttl_days);
    println!("  {:<18} {}", "Bcrypt cost:", config.auth.bcrypt_cost);
    println!();
    println!("{}", "Storage".bold());
    println!("  {:<18} {}", "Database:", config.storage.database.display());
    println!("  {:<18} {}", "Uploads:", config.storage.uploads_dir.display());
    println!("  {:<18} {}", "Content:", config.storage.content_file.display());
    match &config.storage.examples_file {
        Some(path) => println!("  {:<18} {}", "Examples:", path.display()),
        None => println!("  {:<18} {}", "Examples:", "bundled".dimmed()),
    }
}
