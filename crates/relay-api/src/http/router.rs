//! Axum router configuration with middleware.
//!
//! Routes: `GET /`, `POST /chat`, `POST /generate-title`.
//! Middleware: CORS (configured origins only) and request tracing.

use axum::Router;
use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the router with all routes and middleware.
///
/// Origins that are not valid header values are skipped with a warning.
pub fn build_router(state: AppState, allowed_origins: &[String]) -> Router {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::health::health))
        .route("/chat", post(handlers::chat::chat))
        .route("/generate-title", post(handlers::title::generate_title))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;
    use std::sync::{Arc, Mutex};

    use relay_core::llm::box_provider::BoxLlmProvider;
    use relay_core::llm::provider::LlmProvider;
    use relay_core::relay::RelayService;
    use relay_types::llm::{CompletionRequest, CompletionResponse, LlmError, Usage};
    use serde_json::{Value, json};

    use super::*;
    use crate::http::handlers::health::LIVENESS_TEXT;

    type Reply = fn(&CompletionRequest) -> Result<CompletionResponse, LlmError>;

    /// In-process stand-in for the upstream model.
    struct ScriptedProvider {
        reply: Reply,
        seen: Arc<Mutex<Vec<CompletionRequest>>>,
    }

    impl LlmProvider for ScriptedProvider {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn complete(
            &self,
            request: &CompletionRequest,
        ) -> Result<CompletionResponse, LlmError> {
            self.seen.lock().unwrap().push(request.clone());
            (self.reply)(request)
        }
    }

    fn reply_text(text: &str) -> Result<CompletionResponse, LlmError> {
        Ok(CompletionResponse {
            id: "chatcmpl-test".to_string(),
            content: Some(text.to_string()),
            model: "gpt-3.5-turbo".to_string(),
            usage: Usage::default(),
        })
    }

    struct TestServer {
        addr: SocketAddr,
        client: reqwest::Client,
        seen: Arc<Mutex<Vec<CompletionRequest>>>,
    }

    impl TestServer {
        fn url(&self, path: &str) -> String {
            format!("http://{}{}", self.addr, path)
        }

        async fn post_json(&self, path: &str, body: Value) -> (u16, Value) {
            let response = self
                .client
                .post(self.url(path))
                .json(&body)
                .send()
                .await
                .unwrap();
            let status = response.status().as_u16();
            (status, response.json().await.unwrap())
        }

        fn upstream_calls(&self) -> usize {
            self.seen.lock().unwrap().len()
        }
    }

    /// Serve the real router with a scripted upstream.
    async fn spawn(reply: Reply) -> TestServer {
        serve(Some(reply)).await
    }

    /// Serve the real router with no credential configured.
    async fn spawn_unconfigured() -> TestServer {
        serve(None).await
    }

    /// Serve the real router on an ephemeral loopback port.
    async fn serve(reply: Option<Reply>) -> TestServer {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let provider = reply.map(|reply| {
            BoxLlmProvider::new(ScriptedProvider {
                reply,
                seen: Arc::clone(&seen),
            })
        });
        let state = AppState::new(RelayService::new(provider, "gpt-3.5-turbo"));
        let origins = vec![
            "http://localhost:3000".to_string(),
            "http://127.0.0.1:3000".to_string(),
        ];
        let router = build_router(state, &origins);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        TestServer {
            addr,
            client: reqwest::Client::new(),
            seen,
        }
    }

    #[tokio::test]
    async fn liveness_returns_plain_text() {
        let server = spawn_unconfigured().await;
        let response = server.client.get(server.url("/")).send().await.unwrap();

        assert_eq!(response.status().as_u16(), 200);
        let content_type = response.headers()["content-type"].to_str().unwrap().to_string();
        assert!(content_type.starts_with("text/plain"));
        assert_eq!(response.text().await.unwrap(), LIVENESS_TEXT);
    }

    #[tokio::test]
    async fn chat_returns_model_reply() {
        let server = spawn(|_| reply_text("Why did the crab never share? Shellfish.")).await;

        let (status, body) = server
            .post_json("/chat", json!({"message": "Hello! Can you tell me a short joke?"}))
            .await;

        assert_eq!(status, 200);
        assert_eq!(body["response"], "Why did the crab never share? Shellfish.");
        assert_eq!(server.upstream_calls(), 1);
    }

    #[tokio::test]
    async fn chat_without_message_is_rejected_regardless_of_credential() {
        for server in [spawn_unconfigured().await, spawn(|_| reply_text("unused")).await] {

            let (status, body) = server.post_json("/chat", json!({})).await;
            assert_eq!(status, 400);
            assert_eq!(body, json!({"error": "No message provided"}));

            let (status, body) = server.post_json("/chat", json!({"message": ""})).await;
            assert_eq!(status, 400);
            assert_eq!(body, json!({"error": "No message provided"}));

            assert_eq!(server.upstream_calls(), 0);
        }
    }

    #[tokio::test]
    async fn chat_without_body_is_rejected() {
        let server = spawn(|_| reply_text("unused")).await;

        let response = server.client.post(server.url("/chat")).send().await.unwrap();
        assert_eq!(response.status().as_u16(), 400);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body, json!({"error": "No JSON data provided"}));

        let (status, body) = server.post_json("/generate-title", json!([1, 2, 3])).await;
        assert_eq!(status, 400);
        assert_eq!(body, json!({"error": "No JSON data provided"}));
    }

    #[tokio::test]
    async fn body_is_parsed_whatever_the_content_type() {
        let server = spawn(|_| reply_text("Hi there")).await;

        let response = server
            .client
            .post(server.url("/chat"))
            .header("content-type", "text/plain")
            .body(r#"{"message": "hi"}"#)
            .send()
            .await
            .unwrap();

        assert_eq!(response.status().as_u16(), 200);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["response"], "Hi there");
    }

    #[tokio::test]
    async fn missing_credential_short_circuits_both_endpoints() {
        let server = spawn_unconfigured().await;

        let (status, body) = server.post_json("/chat", json!({"message": "hi"})).await;
        assert_eq!(status, 500);
        assert_eq!(body, json!({"error": "OpenAI API key not configured"}));

        let (status, body) = server
            .post_json(
                "/generate-title",
                json!({"conversation": [{"role": "user", "content": "hi"}]}),
            )
            .await;
        assert_eq!(status, 500);
        assert_eq!(body, json!({"error": "OpenAI API key not configured"}));
    }

    #[tokio::test]
    async fn empty_conversation_is_rejected() {
        let server = spawn(|_| reply_text("unused")).await;

        let (status, body) = server
            .post_json("/generate-title", json!({"conversation": []}))
            .await;
        assert_eq!(status, 400);
        assert_eq!(body, json!({"error": "No conversation provided"}));
        assert_eq!(server.upstream_calls(), 0);
    }

    #[tokio::test]
    async fn generate_title_cleans_and_truncates() {
        let server = spawn(|_| reply_text("\"Rust Lifetimes Explained\"")).await;
        let long = "q".repeat(450);

        let (status, body) = server
            .post_json(
                "/generate-title",
                json!({"conversation": [
                    {"role": "user", "content": long},
                    {"role": "assistant", "content": "Lifetimes describe borrows."}
                ]}),
            )
            .await;

        assert_eq!(status, 200);
        assert_eq!(body, json!({"title": "Rust Lifetimes Explained"}));

        let seen = server.seen.lock().unwrap();
        let prompt = &seen[0].messages[1].content;
        assert!(prompt.contains(&format!("User: {}\n", "q".repeat(200))));
        assert!(!prompt.contains(&"q".repeat(201)));
        assert!(prompt.contains("Assistant: Lifetimes describe borrows.\n"));
    }

    #[tokio::test]
    async fn generate_title_falls_back_on_blank_output() {
        let server = spawn(|_| reply_text("  ''  ")).await;

        let (status, body) = server
            .post_json(
                "/generate-title",
                json!({"conversation": [{"role": "user", "content": "hi"}]}),
            )
            .await;
        assert_eq!(status, 200);
        assert_eq!(body, json!({"title": "New Chat"}));
    }

    #[tokio::test]
    async fn malformed_turn_is_a_server_error() {
        let server = spawn(|_| reply_text("unused")).await;

        let (status, body) = server
            .post_json("/generate-title", json!({"conversation": [{"role": "user"}]}))
            .await;
        assert_eq!(status, 500);
        let error = body["error"].as_str().unwrap();
        assert!(error.starts_with("Server error: "));
        assert_eq!(server.upstream_calls(), 0);
    }

    #[tokio::test]
    async fn upstream_failures_map_to_status_codes() {
        let server = spawn(|_| Err(LlmError::AuthenticationFailed)).await;
        let (status, body) = server.post_json("/chat", json!({"message": "hi"})).await;
        assert_eq!(status, 401);
        assert_eq!(body, json!({"error": "Invalid OpenAI API key"}));

        let server = spawn(|_| Err(LlmError::RateLimited { retry_after_ms: None })).await;
        let (status, body) = server
            .post_json(
                "/generate-title",
                json!({"conversation": [{"role": "user", "content": "hi"}]}),
            )
            .await;
        assert_eq!(status, 429);
        assert_eq!(body, json!({"error": "Rate limit exceeded"}));
        assert_eq!(server.upstream_calls(), 1);

        let server = spawn(|_| {
            Err(LlmError::Provider {
                message: "HTTP request failed: connection refused".to_string(),
            })
        })
        .await;
        let (status, body) = server.post_json("/chat", json!({"message": "hi"})).await;
        assert_eq!(status, 500);
        assert_eq!(
            body,
            json!({"error": "OpenAI API error: HTTP request failed: connection refused"})
        );
    }

    #[tokio::test]
    async fn cors_allows_configured_origins_only() {
        let server = spawn_unconfigured().await;

        let preflight = |origin: &'static str| {
            server
                .client
                .request(reqwest::Method::OPTIONS, server.url("/chat"))
                .header("origin", origin)
                .header("access-control-request-method", "POST")
                .header("access-control-request-headers", "content-type")
                .send()
        };

        let allowed = preflight("http://localhost:3000").await.unwrap();
        assert_eq!(
            allowed.headers()["access-control-allow-origin"],
            "http://localhost:3000"
        );

        let denied = preflight("http://evil.example.com").await.unwrap();
        assert!(denied.headers().get("access-control-allow-origin").is_none());
    }
}
