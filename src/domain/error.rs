use thiserror::Error;

use super::models::DiagramViolation;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Provider error: {message}")]
    Provider { message: String, retryable: bool },

    #[error("Empty response: {0}")]
    EmptyResponse(String),

    #[error("Malformed output: {0}")]
    MalformedOutput(String),

    #[error("Invalid diagram: {} violation(s)", .0.len())]
    InvalidDiagram(Vec<DiagramViolation>),
}

impl DomainError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// A provider failure worth another attempt (transport error, timeout,
    /// throttling, 5xx).
    pub fn transient(msg: impl Into<String>) -> Self {
        Self::Provider {
            message: msg.into(),
            retryable: true,
        }
    }

    /// A provider failure that will not go away by resubmitting the same request.
    pub fn rejected(msg: impl Into<String>) -> Self {
        Self::Provider {
            message: msg.into(),
            retryable: false,
        }
    }

    pub fn empty_response(msg: impl Into<String>) -> Self {
        Self::EmptyResponse(msg.into())
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedOutput(msg.into())
    }

    /// Stable machine-readable tag, exposed to HTTP callers.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::Configuration(_) => "configuration",
            Self::Provider { .. } => "provider",
            Self::EmptyResponse(_) => "empty_response",
            Self::MalformedOutput(_) => "malformed_output",
            Self::InvalidDiagram(_) => "invalid_diagram",
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Provider {
                retryable: true,
                ..
            }
        )
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    /// Details a caller can act on when deciding whether to resubmit with a
    /// different prompt. Empty for failures that carry nothing useful.
    pub fn details(&self) -> Vec<String> {
        match self {
            Self::MalformedOutput(msg) => vec![msg.clone()],
            Self::InvalidDiagram(violations) => {
                violations.iter().map(ToString::to_string).collect()
            }
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_transient_provider_errors_are_retryable() {
        assert!(DomainError::transient("503").is_retryable());
        assert!(!DomainError::rejected("400").is_retryable());
        assert!(!DomainError::configuration("missing key").is_retryable());
        assert!(!DomainError::malformed("bad json").is_retryable());
        assert!(!DomainError::empty_response("nothing").is_retryable());
    }

    #[test]
    fn kinds_are_stable() {
        assert_eq!(DomainError::invalid_input("x").kind(), "invalid_input");
        assert_eq!(DomainError::transient("x").kind(), "provider");
        assert_eq!(DomainError::InvalidDiagram(vec![]).kind(), "invalid_diagram");
    }

    #[test]
    fn invalid_diagram_details_list_each_violation() {
        let err = DomainError::InvalidDiagram(vec![
            DiagramViolation::DiamondNotSquare {
                element_id: "d1".to_string(),
                width: 10.0,
                height: 12.0,
            },
            DiagramViolation::DuplicateElementId("a".to_string()),
        ]);

        let details = err.details();
        assert_eq!(details.len(), 2);
        assert!(details[0].contains("d1"));
        assert_eq!(err.to_string(), "Invalid diagram: 2 violation(s)");
    }
}
