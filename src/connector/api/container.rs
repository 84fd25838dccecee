use std::sync::Arc;

use tracing::{debug, warn};

use crate::application::{CompletionClient, GenerateDiagramUseCase, ValidationMode};
use crate::connector::adapter::{
    GeminiClient, GeminiConfig, RetryPolicy, RetryingCompletionClient, StaticCompletionClient,
    DEFAULT_MAX_ATTEMPTS,
};

pub struct ContainerConfig {
    pub gemini: GeminiConfig,
    pub retry: RetryPolicy,
    pub validation: ValidationMode,
    /// Serve the prompt template's worked example instead of calling Gemini.
    pub mock_completion: bool,
}

impl ContainerConfig {
    /// Read configuration from the environment. See [`GeminiConfig::from_env`]
    /// for the provider variables; additionally:
    ///
    /// | Variable              | Default  | Purpose                      |
    /// |-----------------------|----------|------------------------------|
    /// | `GEMINI_MAX_ATTEMPTS` | `3`      | attempts per generation      |
    /// | `DIAGRAM_VALIDATION`  | `strict` | `strict` or `lenient`        |
    pub fn from_env() -> Self {
        let max_attempts = std::env::var("GEMINI_MAX_ATTEMPTS")
            .ok()
            .and_then(|v| v.trim().parse::<u32>().ok())
            .unwrap_or(DEFAULT_MAX_ATTEMPTS);
        let validation = std::env::var("DIAGRAM_VALIDATION")
            .map(|v| ValidationMode::parse(&v))
            .unwrap_or_default();

        Self {
            gemini: GeminiConfig::from_env(),
            retry: RetryPolicy::default().with_max_attempts(max_attempts),
            validation,
            mock_completion: false,
        }
    }
}

pub struct Container {
    completion_client: Arc<dyn CompletionClient>,
    validation: ValidationMode,
    credentials_present: bool,
}

impl Container {
    pub fn new(config: ContainerConfig) -> Self {
        let credentials_present = config.mock_completion || config.gemini.has_api_key();

        let base: Arc<dyn CompletionClient> = if config.mock_completion {
            debug!("Using static completion client");
            Arc::new(StaticCompletionClient::new())
        } else {
            debug!(
                "Using Gemini completion client (model {})",
                config.gemini.model
            );
            if !config.gemini.has_api_key() {
                warn!("GEMINI_API_KEY is not set; generation requests will fail until it is");
            }
            Arc::new(GeminiClient::new(config.gemini))
        };

        let completion_client: Arc<dyn CompletionClient> = if config.retry.max_attempts > 1 {
            Arc::new(RetryingCompletionClient::new(base, config.retry))
        } else {
            base
        };

        Self {
            completion_client,
            validation: config.validation,
            credentials_present,
        }
    }

    /// Build a container around an already constructed client.
    pub fn with_client(client: Arc<dyn CompletionClient>, validation: ValidationMode) -> Self {
        Self {
            completion_client: client,
            validation,
            credentials_present: true,
        }
    }

    pub fn generate_diagram_use_case(&self) -> GenerateDiagramUseCase {
        GenerateDiagramUseCase::new(self.completion_client.clone())
            .with_validation_mode(self.validation)
    }

    pub fn model_name(&self) -> &str {
        self.completion_client.model_name()
    }

    pub fn validation_mode(&self) -> ValidationMode {
        self.validation
    }

    pub fn credentials_present(&self) -> bool {
        self.credentials_present
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(mock: bool, max_attempts: u32) -> ContainerConfig {
        ContainerConfig {
            gemini: GeminiConfig::default(),
            retry: RetryPolicy::default().with_max_attempts(max_attempts),
            validation: ValidationMode::Lenient,
            mock_completion: mock,
        }
    }

    #[test]
    fn mock_container_uses_static_client() {
        let container = Container::new(config(true, 1));

        assert_eq!(container.model_name(), "static-completion");
        assert!(container.credentials_present());
        assert_eq!(container.validation_mode(), ValidationMode::Lenient);
    }

    #[test]
    fn gemini_container_reports_missing_key() {
        let container = Container::new(config(false, 3));

        assert_eq!(container.model_name(), "gemini-2.0-flash");
        assert!(!container.credentials_present());
    }
}
