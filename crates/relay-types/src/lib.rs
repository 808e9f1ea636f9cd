//! Shared types for chat-relay.
//!
//! Request/response bodies for the HTTP endpoints, the provider-agnostic LLM
//! request shapes, and the error types that flow between layers.
//!
//! Zero infrastructure dependencies -- only serde and thiserror.

pub mod chat;
pub mod error;
pub mod llm;
