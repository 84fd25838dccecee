use axum::extract::rejection::{FormRejection, JsonRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::{error, warn};

use crate::domain::DomainError;

/// Message shown to callers for every failed generation.
pub const GENERIC_FAILURE_MESSAGE: &str =
    "Failed to generate diagram. Feel free to try again later.";

/// Every generation failure is answered with 404; `kind` and `retryable`
/// tell callers what actually went wrong.
const FAILURE_STATUS: StatusCode = StatusCode::NOT_FOUND;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub kind: &'static str,
    pub retryable: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
}

#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(DomainError::invalid_input(format!(
            "request body is not valid: {}",
            rejection.body_text()
        )))
    }
}

impl From<FormRejection> for ApiError {
    fn from(rejection: FormRejection) -> Self {
        Self(DomainError::invalid_input(format!(
            "request form is not valid: {}",
            rejection.body_text()
        )))
    }
}

impl ApiError {
    pub fn body(&self) -> ErrorBody {
        let details = match &self.0 {
            DomainError::InvalidInput(msg) => vec![msg.clone()],
            other => other.details(),
        };

        ErrorBody {
            error: GENERIC_FAILURE_MESSAGE.to_string(),
            kind: self.0.kind(),
            retryable: self.0.is_retryable(),
            details,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.0.is_configuration() {
            error!("Diagram generation misconfigured: {}", self.0);
        } else {
            warn!("Diagram generation failed: {}", self.0);
        }

        (FAILURE_STATUS, Json(self.body())).into_response()
    }
}
