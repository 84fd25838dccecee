//! # Connector Layer
//!
//! External integrations implementing application interfaces:
//! - Completion clients (Gemini over HTTP, retry decorator, offline static client)
//! - HTTP API (axum router, controllers, dependency container)

pub mod adapter;
pub mod api;

pub use adapter::*;
pub use api::*;
