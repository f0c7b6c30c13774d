use std::path::PathBuf;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Every variable has a default; without `DATABASE_URL` the service runs
/// against the in-memory store.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub port: u16,
    pub rust_log: String,
    /// JSON vocabulary replacing the built-in catalog.
    pub tag_vocabulary_path: Option<PathBuf>,
    /// Load the sample catalog into the in-memory store at startup.
    pub seed_sample_data: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: optional_env("DATABASE_URL"),
            database_max_connections: std::env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "10".to_string())
                .parse::<u32>()
                .context("DATABASE_MAX_CONNECTIONS must be a positive integer")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            tag_vocabulary_path: optional_env("TAG_VOCABULARY_PATH").map(PathBuf::from),
            seed_sample_data: parse_flag(optional_env("SEED_SAMPLE_DATA").as_deref())
                .context("SEED_SAMPLE_DATA must be true or false")?,
        })
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_flag(value: Option<&str>) -> Result<bool> {
    match value.map(|v| v.trim().to_lowercase()) {
        None => Ok(false),
        Some(v) => match v.as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            other => anyhow::bail!("unrecognized flag value '{other}'"),
        },
    }
}
