//! LLM provider implementations.
//!
//! Contains the concrete [`LlmProvider`](relay_core::llm::provider::LlmProvider)
//! used by the relay, plus a factory ([`create_provider`]) that builds it
//! from a [`RelayConfig`].

pub mod openai_compat;

use secrecy::{ExposeSecret, SecretString};

use relay_core::llm::box_provider::BoxLlmProvider;

use crate::config::RelayConfig;

use self::openai_compat::OpenAiCompatibleProvider;
use self::openai_compat::config::openai_defaults;

/// Create a [`BoxLlmProvider`] from a [`RelayConfig`].
///
/// Returns `None` when no API key is configured; the relay then answers
/// generation requests with a missing-credential error.
pub fn create_provider(config: &RelayConfig) -> Option<BoxLlmProvider> {
    let api_key = config.api_key.as_ref()?;
    let api_key = SecretString::from(api_key.expose_secret());

    let provider_config = openai_defaults(api_key).with_base_url(&config.base_url);

    Some(BoxLlmProvider::new(OpenAiCompatibleProvider::new(
        provider_config,
    )))
}
