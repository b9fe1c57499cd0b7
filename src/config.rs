// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.

use std::env;
use std::time::Duration;

/// Base address of the hosted content API.
pub const DEFAULT_CONTENT_API_URL: &str = "https://joash-backend.onrender.com/api";

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Content API base URL (no trailing slash)
    pub content_api_url: String,
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// Server port
    pub port: u16,
    /// Abort the social sidebar fetch after this long
    pub socials_timeout: Duration,
    /// Session cookie lifetime in days
    pub session_max_age_days: i64,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self::test_default()
    }
}

impl Config {
    /// Deterministic configuration used by tests.
    pub fn test_default() -> Self {
        Self {
            content_api_url: "http://127.0.0.1:9".to_string(),
            frontend_url: "http://localhost:3000".to_string(),
            port: 8080,
            socials_timeout: Duration::from_secs(10),
            session_max_age_days: 7,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is honoured for local development.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let content_api_url = env::var("CONTENT_API_URL")
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .unwrap_or_else(|_| DEFAULT_CONTENT_API_URL.to_string());

        Ok(Self {
            content_api_url,
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            port: parse_var("PORT", 8080)?,
            socials_timeout: Duration::from_secs(parse_var("SOCIALS_TIMEOUT_SECS", 10)?),
            session_max_age_days: parse_var("SESSION_MAX_AGE_DAYS", 7)?,
        })
    }

    /// Session cookies get the `Secure` attribute when the site is served over HTTPS.
    pub fn secure_cookies(&self) -> bool {
        self.frontend_url.starts_with("https://")
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid(name, raw)),
        Err(_) => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable {0}: {1:?}")]
    Invalid(&'static str, String),
}
