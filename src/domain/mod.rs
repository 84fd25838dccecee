//! # Domain Layer
//!
//! Diagram model, its structural contract, and the error taxonomy.
//! This layer is independent of external frameworks and infrastructure.

mod error;
pub mod models;
pub mod services;

pub use error::*;
pub use models::*;
pub use services::*;
