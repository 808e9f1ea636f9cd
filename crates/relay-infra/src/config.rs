//! Relay configuration resolved from the process environment.
//!
//! A `.env` file in the working directory is loaded first (see
//! [`load_dotenv`]); real environment variables take precedence over it.
//! The result is an immutable [`RelayConfig`] built once at startup.

use std::path::PathBuf;

use secrecy::SecretString;

use crate::llm::openai_compat::config::OPENAI_BASE_URL;

/// Environment variable holding the upstream API key.
pub const API_KEY_VAR: &str = "OPENAI_API_KEY";
/// Environment variable overriding the upstream base URL.
pub const BASE_URL_VAR: &str = "OPENAI_BASE_URL";
/// Environment variable overriding the model identifier.
pub const MODEL_VAR: &str = "CHAT_RELAY_MODEL";
/// Environment variable with a comma-separated list of CORS origins.
pub const ALLOWED_ORIGINS_VAR: &str = "CHAT_RELAY_ALLOWED_ORIGINS";

/// Model used for both generation endpoints unless overridden.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Browser origins allowed by default (local frontend dev server).
pub const DEFAULT_ALLOWED_ORIGINS: [&str; 2] = ["http://localhost:3000", "http://127.0.0.1:3000"];

/// Immutable server configuration.
pub struct RelayConfig {
    /// Upstream credential. `None` when unset or blank.
    pub api_key: Option<SecretString>,
    /// Upstream base URL, without the `/chat/completions` suffix.
    pub base_url: String,
    /// Model identifier sent upstream.
    pub model: String,
    /// Origins allowed by the CORS layer.
    pub allowed_origins: Vec<String>,
}

impl RelayConfig {
    /// Resolve configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolve configuration through an arbitrary variable lookup.
    ///
    /// Blank values are treated the same as unset ones.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_blank = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let api_key = non_blank(API_KEY_VAR).map(SecretString::from);

        let base_url = non_blank(BASE_URL_VAR)
            .unwrap_or_else(|| OPENAI_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let model = non_blank(MODEL_VAR).unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let allowed_origins = non_blank(ALLOWED_ORIGINS_VAR)
            .map(|raw| parse_origins(&raw))
            .filter(|origins| !origins.is_empty())
            .unwrap_or_else(|| DEFAULT_ALLOWED_ORIGINS.iter().map(|o| o.to_string()).collect());

        Self {
            api_key,
            base_url,
            model,
            allowed_origins,
        }
    }

    /// Whether an upstream credential is available.
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

/// Split a comma-separated origin list, dropping empty entries.
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

/// Load `.env` from the working directory (or a parent) into the environment.
///
/// Returns the path of the loaded file, or `None` when there is none or it
/// could not be read. Variables already present in the environment are not
/// overwritten.
pub fn load_dotenv() -> Option<PathBuf> {
    match dotenvy::dotenv() {
        Ok(path) => Some(path),
        Err(err) if err.not_found() => None,
        Err(err) => {
            tracing::warn!("Failed to load .env: {err}");
            None
        }
    }
}
