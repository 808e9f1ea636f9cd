//! OpenAI-compatible LLM provider implementation.
//!
//! [`OpenAiCompatibleProvider`] talks to any endpoint that speaks the OpenAI
//! chat completions protocol (OpenAI itself by default). Request and
//! response bodies use the [`async_openai`] chat types so the wire format
//! follows the published schema; the HTTP exchange goes through a plain
//! [`reqwest::Client`] so that every call is exactly one attempt (the
//! async-openai client backs off and retries on rate limits).

pub mod config;

use async_openai::error::ApiError;
use async_openai::types::chat::{
    ChatCompletionRequestAssistantMessage, ChatCompletionRequestAssistantMessageContent,
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessage,
    ChatCompletionRequestSystemMessageContent, ChatCompletionRequestUserMessage,
    ChatCompletionRequestUserMessageContent, CreateChatCompletionRequest,
    CreateChatCompletionResponse,
};
use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use relay_core::llm::provider::LlmProvider;
use relay_types::llm::{CompletionRequest, CompletionResponse, LlmError, MessageRole, Usage};

use self::config::OpenAiCompatConfig;

/// Unified provider for any OpenAI-compatible API.
///
/// # API Key Security
///
/// The API key is stored as a [`SecretString`] and is only exposed when
/// building the `Authorization` header. The type does not derive Debug.
pub struct OpenAiCompatibleProvider {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    provider_name: String,
}

impl OpenAiCompatibleProvider {
    /// Create a new OpenAI-compatible provider from a configuration.
    ///
    /// The HTTP client keeps reqwest's default timeouts.
    pub fn new(config: OpenAiCompatConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: config.api_key,
            base_url: config.base_url,
            provider_name: config.provider_name,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Build a [`CreateChatCompletionRequest`] from a generic [`CompletionRequest`].
fn build_request(request: &CompletionRequest) -> CreateChatCompletionRequest {
    let messages = request
        .messages
        .iter()
        .map(|msg| match msg.role {
            MessageRole::System => {
                ChatCompletionRequestMessage::System(ChatCompletionRequestSystemMessage {
                    content: ChatCompletionRequestSystemMessageContent::Text(
                        msg.content.clone(),
                    ),
                    name: None,
                })
            }
            MessageRole::User => {
                ChatCompletionRequestMessage::User(ChatCompletionRequestUserMessage {
                    content: ChatCompletionRequestUserMessageContent::Text(msg.content.clone()),
                    name: None,
                })
            }
            MessageRole::Assistant => {
                #[allow(deprecated)]
                ChatCompletionRequestMessage::Assistant(
                    ChatCompletionRequestAssistantMessage {
                        content: Some(ChatCompletionRequestAssistantMessageContent::Text(
                            msg.content.clone(),
                        )),
                        refusal: None,
                        name: None,
                        audio: None,
                        tool_calls: None,
                        function_call: None,
                    },
                )
            }
        })
        .collect();

    CreateChatCompletionRequest {
        model: request.model.clone(),
        messages,
        max_completion_tokens: request.max_tokens,
        temperature: request.temperature,
        ..Default::default()
    }
}

impl LlmProvider for OpenAiCompatibleProvider {
    fn name(&self) -> &str {
        &self.provider_name
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let body = build_request(request);

        let response = self
            .client
            .post(self.url("/chat/completions"))
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Provider {
                message: format!("HTTP request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let retry_after_ms = retry_after_ms(response.headers());
            let error_body = response.text().await.unwrap_or_default();
            let err = classify_error(status, &error_body, retry_after_ms);
            tracing::warn!(status = status.as_u16(), error = %err, "upstream rejected request");
            return Err(err);
        }

        let oai_response: CreateChatCompletionResponse = response.json().await.map_err(|e| {
            LlmError::Deserialization(format!("failed to parse response: {e}"))
        })?;

        let first = oai_response
            .choices
            .first()
            .ok_or_else(|| LlmError::Deserialization("response contained no choices".into()))?;

        let usage = oai_response
            .usage
            .map(|u| Usage {
                input_tokens: u.prompt_tokens,
                output_tokens: u.completion_tokens,
            })
            .unwrap_or_default();

        Ok(CompletionResponse {
            id: oai_response.id.clone(),
            content: first.message.content.clone(),
            model: oai_response.model.clone(),
            usage,
        })
    }
}

/// `{"error": {...}}` body returned by OpenAI-compatible APIs on failure.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ApiError,
}

/// Map a non-success HTTP reply to an [`LlmError`].
///
/// The status code decides first (401 authentication, 429 rate limit,
/// 503/529 overloaded); the body's `code`/`type` fields catch proxies that
/// report those conditions under another status.
fn classify_error(status: StatusCode, body: &str, retry_after_ms: Option<u64>) -> LlmError {
    let api_err = serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .map(|envelope| envelope.error);

    let code = api_err.as_ref().and_then(|e| e.code.as_deref()).unwrap_or("");
    let error_type = api_err.as_ref().and_then(|e| e.r#type.as_deref()).unwrap_or("");
    let detail = match &api_err {
        Some(e) => e.message.clone(),
        None => body.trim().to_string(),
    };

    if status == StatusCode::UNAUTHORIZED
        || code == "invalid_api_key"
        || error_type == "authentication_error"
    {
        LlmError::AuthenticationFailed
    } else if status == StatusCode::TOO_MANY_REQUESTS
        || code == "rate_limit_exceeded"
        || error_type == "rate_limit_error"
    {
        LlmError::RateLimited { retry_after_ms }
    } else if status == StatusCode::SERVICE_UNAVAILABLE || status.as_u16() == 529 {
        LlmError::Overloaded(detail)
    } else {
        LlmError::Provider {
            message: format!("HTTP {status}: {detail}"),
        }
    }
}

/// Read the server's retry hint, preferring `retry-after-ms` over `retry-after` seconds.
fn retry_after_ms(headers: &HeaderMap) -> Option<u64> {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<f64>().ok())
    };

    header("retry-after-ms")
        .or_else(|| header("retry-after").map(|secs| secs * 1000.0))
        .filter(|ms| ms.is_finite() && *ms >= 0.0)
        .map(|ms| ms as u64)
}
