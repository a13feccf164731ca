// src/config.rs
//
// Runtime configuration
//
// Defaults target the public TMDB v3 API. Every field can be overridden
// from the environment (MOVIEHUB_*).

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{AppError, AppResult};

pub const DEFAULT_API_BASE_URL: &str = "https://api.themoviedb.org/3/";
pub const DEFAULT_LANGUAGE: &str = "en-US";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Remote catalog root, with trailing slash
    pub api_base_url: String,
    /// Bearer (read-access) token
    pub api_token: Option<String>,
    pub language: String,
    pub request_timeout_secs: u64,
    /// SQLite file; `None` means the platform data directory
    pub database_path: Option<PathBuf>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            api_token: None,
            language: DEFAULT_LANGUAGE.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            database_path: None,
        }
    }
}

impl CatalogConfig {
    /// Build from process environment, falling back to defaults
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (environment, test map, ...)
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("MOVIEHUB_API_BASE_URL") {
            config.api_base_url = url;
        }
        if let Some(token) = lookup("MOVIEHUB_API_TOKEN").filter(|t| !t.trim().is_empty()) {
            config.api_token = Some(token);
        }
        if let Some(language) = lookup("MOVIEHUB_LANGUAGE") {
            config.language = language;
        }
        if let Some(raw) = lookup("MOVIEHUB_TIMEOUT_SECS") {
            config.request_timeout_secs = raw.trim().parse().map_err(|_| {
                AppError::Other(format!("MOVIEHUB_TIMEOUT_SECS is not a number: {}", raw))
            })?;
        }
        if let Some(path) = lookup("MOVIEHUB_DB_PATH") {
            config.database_path = Some(PathBuf::from(path));
        }

        config.normalize();
        Ok(config)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Ensure the base URL ends with a slash so relative joins keep the path
    fn normalize(&mut self) {
        if !self.api_base_url.ends_with('/') {
            self.api_base_url.push('/');
        }
    }
}
