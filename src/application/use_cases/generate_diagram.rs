use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::application::{CompletionClient, SYSTEM_INSTRUCTION};
use crate::domain::{
    Diagram, DiagramValidator, DomainError, GeneratedDiagram, ResponseNormalizer,
};

/// What to do with a diagram that parses but breaks the structural contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationMode {
    /// Reject the diagram with [`DomainError::InvalidDiagram`].
    #[default]
    Strict,
    /// Log every violation and return the diagram anyway.
    Lenient,
}

impl ValidationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationMode::Strict => "strict",
            ValidationMode::Lenient => "lenient",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "strict" => ValidationMode::Strict,
            "lenient" | "warn" => ValidationMode::Lenient,
            unknown => {
                warn!(
                    "Unknown validation mode '{}', defaulting to strict",
                    unknown
                );
                ValidationMode::Strict
            }
        }
    }
}

/// Generate a diagram from a natural-language prompt: one provider call,
/// then normalization, decoding and structural validation.
pub struct GenerateDiagramUseCase {
    client: Arc<dyn CompletionClient>,
    validator: DiagramValidator,
    mode: ValidationMode,
}

impl GenerateDiagramUseCase {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self {
            client,
            validator: DiagramValidator::new(),
            mode: ValidationMode::default(),
        }
    }

    pub fn with_validation_mode(mut self, mode: ValidationMode) -> Self {
        self.mode = mode;
        self
    }

    pub async fn execute(&self, prompt: &str) -> Result<GeneratedDiagram, DomainError> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(DomainError::invalid_input("userPrompt must not be empty"));
        }

        info!(
            "Generating diagram with {} ({} chars of prompt)",
            self.client.model_name(),
            prompt.len()
        );
        let start_time = Instant::now();

        let raw = self.client.generate(SYSTEM_INSTRUCTION, prompt).await?;
        debug!("Raw provider response: {}", raw);

        let document = ResponseNormalizer::normalize(&raw)?;
        let diagram = Diagram::from_value(&document)?;

        let violations = self.validator.validate(&diagram);
        if !violations.is_empty() {
            match self.mode {
                ValidationMode::Strict => {
                    warn!(
                        "Rejecting generated diagram with {} violation(s)",
                        violations.len()
                    );
                    return Err(DomainError::InvalidDiagram(violations));
                }
                ValidationMode::Lenient => {
                    for violation in &violations {
                        warn!("Diagram violation passed through: {}", violation);
                    }
                }
            }
        }

        info!(
            "Generated diagram with {} element(s) and {} connection(s) in {:?}",
            diagram.elements().len(),
            diagram.connections().len(),
            start_time.elapsed()
        );

        Ok(GeneratedDiagram::new(document, diagram))
    }
}
