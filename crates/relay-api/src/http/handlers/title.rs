//! POST /generate-title - summarize a conversation as a short title.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;

use relay_core::relay::request::parse_title_request;
use relay_types::chat::TitleResponse;

use crate::http::error::AppError;
use crate::state::AppState;

pub async fn generate_title(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<TitleResponse>, AppError> {
    let request = parse_title_request(&body)?;
    tracing::debug!(turns = request.conversation.len(), "title request accepted");

    let response = state.relay.generate_title(&request).await?;
    Ok(Json(response))
}
