//! HTTP layer: router, handlers and the error-to-response mapping.

pub mod error;
pub mod handlers;
pub mod router;
