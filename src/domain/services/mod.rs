//! Domain services: turning provider text into a checked diagram.

mod diagram_validator;
mod response_normalizer;

pub use diagram_validator::*;
pub use response_normalizer::*;
