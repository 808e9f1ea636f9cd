//! RelayService -- the stateless core behind `/chat` and `/generate-title`.
//!
//! Holds the upstream provider (absent when no credential was configured)
//! and the model identifier. Each operation performs exactly one upstream
//! call inside a GenAI tracing span and never retries.

use tracing::{Instrument, debug, info_span};

use relay_types::chat::{ChatRequest, ChatResponse, TitleRequest, TitleResponse};
use relay_types::error::RelayError;
use relay_types::llm::{CompletionRequest, CompletionResponse, LlmError};

use crate::llm::box_provider::BoxLlmProvider;

use super::chat::build_chat_request;
use super::title::{build_title_request, clean_title};

/// Relays validated requests to the upstream model.
pub struct RelayService {
    provider: Option<BoxLlmProvider>,
    model: String,
}

impl RelayService {
    /// Create a relay. `provider` is `None` when no credential is configured,
    /// in which case every generation call fails with
    /// [`RelayError::MissingCredential`].
    pub fn new(provider: Option<BoxLlmProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    fn provider(&self) -> Result<&BoxLlmProvider, RelayError> {
        self.provider.as_ref().ok_or(RelayError::MissingCredential)
    }

    /// Forward one user message and return the model's reply.
    ///
    /// A reply without text is returned as an empty string.
    pub async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, RelayError> {
        let provider = self.provider()?;
        let completion = build_chat_request(&self.model, &request.message);

        let response = complete(provider, "chat", &completion).await?;

        Ok(ChatResponse {
            response: response.content.unwrap_or_default(),
        })
    }

    /// Ask the model for a short title summarizing `request.conversation`.
    pub async fn generate_title(
        &self,
        request: &TitleRequest,
    ) -> Result<TitleResponse, RelayError> {
        let provider = self.provider()?;
        let completion = build_title_request(&self.model, &request.conversation);

        let response = complete(provider, "generate_title", &completion).await?;

        Ok(TitleResponse {
            title: clean_title(response.content.as_deref()),
        })
    }
}

/// Send one completion request inside a `gen_ai.complete` span.
async fn complete(
    provider: &BoxLlmProvider,
    operation: &'static str,
    request: &CompletionRequest,
) -> Result<CompletionResponse, LlmError> {
    let span = info_span!(
        "gen_ai.complete",
        gen_ai.operation.name = operation,
        gen_ai.system = provider.name(),
        gen_ai.request.model = %request.model,
        gen_ai.request.max_tokens = ?request.max_tokens,
        gen_ai.request.temperature = ?request.temperature,
    );

    let response = provider.complete(request).instrument(span).await?;

    debug!(
        operation,
        response_id = %response.id,
        response_model = %response.model,
        input_tokens = response.usage.input_tokens,
        output_tokens = response.usage.output_tokens,
        "upstream completion finished"
    );

    Ok(response)
}
