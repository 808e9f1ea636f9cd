use thiserror::Error;

use crate::llm::LlmError;

/// Failures of a single relay request.
///
/// The `Display` text of the input and credential variants is the exact
/// message returned to the HTTP client.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("No JSON data provided")]
    MissingBody,

    #[error("No message provided")]
    MissingMessage,

    #[error("No conversation provided")]
    MissingConversation,

    #[error("OpenAI API key not configured")]
    MissingCredential,

    #[error("upstream error: {0}")]
    Upstream(#[from] LlmError),

    #[error("unexpected failure: {0}")]
    Unexpected(String),
}
