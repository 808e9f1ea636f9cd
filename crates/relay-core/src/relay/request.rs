//! Validation of raw request bodies.
//!
//! Bodies arrive as bytes so that a missing or malformed payload can be
//! reported with the relay's own error text instead of the framework's
//! extractor rejection.

use serde_json::{Map, Value};

use relay_types::chat::{ChatRequest, TitleRequest, Turn};
use relay_types::error::RelayError;

/// Parse a body into a JSON object.
///
/// Empty bodies, invalid JSON and JSON values other than objects are all
/// reported as [`RelayError::MissingBody`].
pub fn parse_object(body: &[u8]) -> Result<Map<String, Value>, RelayError> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        _ => Err(RelayError::MissingBody),
    }
}

/// Validate a `POST /chat` body.
pub fn parse_chat_request(body: &[u8]) -> Result<ChatRequest, RelayError> {
    let object = parse_object(body)?;

    match object.get("message") {
        Some(Value::String(message)) if !message.is_empty() => Ok(ChatRequest {
            message: message.clone(),
        }),
        _ => Err(RelayError::MissingMessage),
    }
}

/// Validate a `POST /generate-title` body.
///
/// A missing, empty or non-array `conversation` is a missing-input error.
/// Elements without a `role`, or without a string `content`, are an
/// unexpected failure carrying the decoder's message. Any role value other
/// than `"user"` (including non-strings) is taken as the assistant.
pub fn parse_title_request(body: &[u8]) -> Result<TitleRequest, RelayError> {
    let mut object = parse_object(body)?;

    let turns = match object.remove("conversation") {
        Some(Value::Array(turns)) if !turns.is_empty() => turns,
        _ => return Err(RelayError::MissingConversation),
    };

    let conversation = turns
        .into_iter()
        .map(serde_json::from_value::<Turn>)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| RelayError::Unexpected(e.to_string()))?;

    Ok(TitleRequest { conversation })
}
