//! Relay logic for chat-relay.
//!
//! Defines the `LlmProvider` port that relay-infra implements, and the
//! request validation, prompt building and result shaping behind the two
//! generation endpoints. Depends only on `relay-types`.

pub mod llm;
pub mod relay;
