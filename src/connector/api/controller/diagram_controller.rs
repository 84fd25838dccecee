use serde::Deserialize;
use serde_json::Value;

use crate::domain::DomainError;

use super::super::Container;

/// Body of `POST /diagram/generate`.
#[derive(Debug, Default, Deserialize)]
pub struct GenerateDiagramRequest {
    #[serde(rename = "userPrompt", default)]
    pub user_prompt: Option<String>,
}

pub struct DiagramController<'a> {
    container: &'a Container,
}

impl<'a> DiagramController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    /// Run one generation and return the diagram document to hand back to the
    /// caller.
    pub async fn generate(&self, request: GenerateDiagramRequest) -> Result<Value, DomainError> {
        let prompt = request
            .user_prompt
            .ok_or_else(|| DomainError::invalid_input("userPrompt is required"))?;

        let use_case = self.container.generate_diagram_use_case();
        let generated = use_case.execute(&prompt).await?;

        Ok(generated.into_document())
    }
}
