use anyhow::{Context, Result};

use crate::layout::templates::DEFAULT_TEMPLATE;

const DEFAULT_BODY_LIMIT_BYTES: usize = 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Template used when a request names none. Checked against the catalog in `main`.
    pub default_template: String,
    pub body_limit_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
            default_template: env_or("DEFAULT_TEMPLATE", DEFAULT_TEMPLATE),
            body_limit_bytes: match std::env::var("BODY_LIMIT_BYTES") {
                Ok(raw) => raw
                    .parse::<usize>()
                    .with_context(|| format!("BODY_LIMIT_BYTES must be a byte count, got '{raw}'"))?,
                Err(_) => DEFAULT_BODY_LIMIT_BYTES,
            },
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            rust_log: "info".to_string(),
            default_template: DEFAULT_TEMPLATE.to_string(),
            body_limit_bytes: DEFAULT_BODY_LIMIT_BYTES,
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
