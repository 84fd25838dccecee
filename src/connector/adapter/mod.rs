mod gemini_client;
mod retrying_completion_client;
mod static_completion_client;

pub use gemini_client::*;
pub use retrying_completion_client::*;
pub use static_completion_client::*;
