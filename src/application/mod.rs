//! # Application Layer
//!
//! Use cases and the ports they depend on, plus the fixed prompt asset.

pub mod interfaces;
mod prompt_template;
pub mod use_cases;

pub use interfaces::*;
pub use prompt_template::*;
pub use use_cases::*;
