//! Mapping of relay failures to HTTP status codes and `{"error": ...}` bodies.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use relay_types::chat::ErrorBody;
use relay_types::error::RelayError;
use relay_types::llm::LlmError;

/// Handler error wrapping a [`RelayError`].
#[derive(Debug)]
pub struct AppError(pub RelayError);

impl From<RelayError> for AppError {
    fn from(e: RelayError) -> Self {
        AppError(e)
    }
}

impl AppError {
    /// Status code and client-facing message.
    pub fn status_and_message(&self) -> (StatusCode, String) {
        match &self.0 {
            e @ (RelayError::MissingBody
            | RelayError::MissingMessage
            | RelayError::MissingConversation) => (StatusCode::BAD_REQUEST, e.to_string()),
            e @ RelayError::MissingCredential => {
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
            RelayError::Upstream(err) => match err {
                LlmError::AuthenticationFailed => {
                    (StatusCode::UNAUTHORIZED, "Invalid OpenAI API key".to_string())
                }
                LlmError::RateLimited { .. } => {
                    (StatusCode::TOO_MANY_REQUESTS, "Rate limit exceeded".to_string())
                }
                LlmError::Provider { message } => upstream_failure(message),
                LlmError::Deserialization(detail) | LlmError::Overloaded(detail) => {
                    upstream_failure(detail)
                }
            },
            RelayError::Unexpected(detail) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Server error: {detail}"),
            ),
        }
    }
}

fn upstream_failure(detail: &str) -> (StatusCode, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        format!("OpenAI API error: {detail}"),
    )
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = self.status_and_message();

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self.0, "request failed");
        } else {
            tracing::debug!(status = status.as_u16(), error = %self.0, "request rejected");
        }

        (status, Json(ErrorBody { error })).into_response()
    }
}
