//! The relay's two generation operations and their input handling.

pub mod chat;
pub mod request;
pub mod service;
pub mod title;

pub use service::RelayService;
