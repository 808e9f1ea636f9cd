//! GET / - liveness check.

/// Text returned by the liveness route.
pub const LIVENESS_TEXT: &str = "✅ chat-relay backend is running";

pub async fn health() -> &'static str {
    LIVENESS_TEXT
}
