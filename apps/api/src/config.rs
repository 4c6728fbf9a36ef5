use std::path::PathBuf;

use anyhow::{Context, Result};

/// Maximum accepted resume size in bytes (2 MB).
pub const MAX_UPLOAD_BYTES: usize = 2 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    /// Secret callers must present in `x-api-key`. `None` leaves the review
    /// endpoint misconfigured (500) rather than open.
    pub api_key: Option<String>,
    pub anthropic_api_key: String,
    pub upload_dir: PathBuf,
    pub knowledge_dir: PathBuf,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            api_key: optional_env("API_KEY"),
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            upload_dir: optional_env("UPLOAD_DIR")
                .unwrap_or_else(|| "web/uploads".to_string())
                .into(),
            knowledge_dir: optional_env("KNOWLEDGE_DIR")
                .unwrap_or_else(|| "knowledge".to_string())
                .into(),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Reads a variable, treating empty values as unset.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
}
