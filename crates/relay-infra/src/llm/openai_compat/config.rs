//! Configuration for the OpenAI-compatible provider.

use secrecy::SecretString;

/// Base URL of the public OpenAI API.
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Configuration for an OpenAI-compatible LLM provider.
///
/// Used to construct an [`super::OpenAiCompatibleProvider`].
pub struct OpenAiCompatConfig {
    /// Human-readable provider name (e.g., "openai").
    pub provider_name: String,
    /// Base URL for the API, without the `/chat/completions` suffix.
    pub base_url: String,
    /// API key for bearer authentication.
    pub api_key: SecretString,
}

/// OpenAI default configuration.
///
/// Base URL: `https://api.openai.com/v1`
pub fn openai_defaults(api_key: SecretString) -> OpenAiCompatConfig {
    OpenAiCompatConfig {
        provider_name: "openai".into(),
        base_url: OPENAI_BASE_URL.into(),
        api_key,
    }
}

impl OpenAiCompatConfig {
    /// Point the provider at another OpenAI-compatible endpoint.
    ///
    /// A trailing slash is dropped so paths can be appended directly.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }
}
