//! POST /chat - forward a single user message to the model.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;

use relay_core::relay::request::parse_chat_request;
use relay_types::chat::ChatResponse;

use crate::http::error::AppError;
use crate::state::AppState;

/// POST /chat - `{"message": ...}` in, `{"response": ...}` out.
///
/// The body is parsed from raw bytes whatever the `Content-Type`.
pub async fn chat(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ChatResponse>, AppError> {
    let request = parse_chat_request(&body)?;
    tracing::debug!(chars = request.message.chars().count(), "chat request accepted");

    let response = state.relay.chat(&request).await?;
    Ok(Json(response))
}
