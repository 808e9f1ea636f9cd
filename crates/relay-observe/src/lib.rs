//! Observability setup for chat-relay: structured logging with an optional
//! OpenTelemetry bridge.

pub mod tracing_setup;
