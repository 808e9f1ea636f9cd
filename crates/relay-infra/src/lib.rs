//! Infrastructure for chat-relay.
//!
//! Implements the upstream OpenAI client and resolves the relay's
//! configuration from the environment.

pub mod config;
pub mod llm;
