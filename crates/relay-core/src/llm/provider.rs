//! LlmProvider trait definition.
//!
//! This is the core abstraction that upstream model clients implement.
//! Uses RPITIT for `complete`; [`super::box_provider::BoxLlmProvider`]
//! erases the concrete type for runtime wiring.

use relay_types::llm::{CompletionRequest, CompletionResponse, LlmError};

/// Trait for LLM provider backends.
///
/// Every call is a single attempt: implementations must not retry on
/// their own. Implementations live in relay-infra (e.g., `OpenAiCompatibleProvider`).
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g., "openai").
    fn name(&self) -> &str;

    /// Send a completion request and receive the full response.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send;
}
