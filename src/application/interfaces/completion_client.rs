use async_trait::async_trait;

use crate::domain::DomainError;

/// Sends a fixed system instruction plus one user prompt to a text
/// generation provider and returns the raw response text.
///
/// Implementors own transport, authentication and vendor payload shapes.
/// Errors must be classified: transient provider failures as
/// [`DomainError::transient`], missing credentials as
/// [`DomainError::Configuration`] (raised before any network traffic), and a
/// response without text as [`DomainError::EmptyResponse`].
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn generate(&self, system_instruction: &str, user_prompt: &str)
        -> Result<String, DomainError>;

    /// Model identifier, for logging.
    fn model_name(&self) -> &str;
}
