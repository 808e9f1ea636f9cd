//! Single-turn chat relay.

use relay_types::llm::{CompletionRequest, Message};

/// System instruction sent ahead of every chat message.
pub const CHAT_SYSTEM_PROMPT: &str = "You are a helpful assistant.";

/// Build the completion request relaying `message` to `model`.
///
/// Sampling and output length are left to the provider's defaults.
pub fn build_chat_request(model: &str, message: &str) -> CompletionRequest {
    CompletionRequest {
        model: model.to_string(),
        messages: vec![Message::system(CHAT_SYSTEM_PROMPT), Message::user(message)],
        max_tokens: None,
        temperature: None,
    }
}
