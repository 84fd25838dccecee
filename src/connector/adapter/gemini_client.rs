use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::application::CompletionClient;
use crate::domain::DomainError;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
/// Low temperature keeps the geometry deterministic.
pub const DEFAULT_TEMPERATURE: f32 = 0.1;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
const API_VERSION_PATH: &str = "/v1beta/models";
const RESPONSE_MIME_TYPE: &str = "application/json";
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Settings for [`GeminiClient`].
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub temperature: f32,
    pub timeout: Duration,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl GeminiConfig {
    /// Read configuration from the environment:
    ///
    /// | Variable              | Default                                     |
    /// |-----------------------|---------------------------------------------|
    /// | `GEMINI_API_KEY`      | unset (generation fails, startup does not)  |
    /// | `GEMINI_MODEL`        | `gemini-2.0-flash`                          |
    /// | `GEMINI_BASE_URL`     | `https://generativelanguage.googleapis.com` |
    /// | `GEMINI_TIMEOUT_SECS` | `60`                                        |
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(api_key) = env_value("GEMINI_API_KEY") {
            config = config.with_api_key(api_key);
        }
        if let Some(model) = env_value("GEMINI_MODEL") {
            config = config.with_model(model);
        }
        if let Some(base_url) = env_value("GEMINI_BASE_URL") {
            config = config.with_base_url(base_url);
        }
        if let Some(secs) = env_value("GEMINI_TIMEOUT_SECS")
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
        {
            config = config.with_timeout(Duration::from_secs(secs));
        }

        config
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

/// Trimmed value of an environment variable, `None` when unset or blank.
fn env_value(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiRequest<'a> {
    system_instruction: ApiContent<'a>,
    contents: Vec<ApiContent<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct ApiContent<'a> {
    role: &'a str,
    parts: Vec<ApiPart<'a>>,
}

#[derive(Serialize)]
struct ApiPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    response_mime_type: &'static str,
}

/// Minimal subset of the `generateContent` response we care about.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

impl ApiResponse {
    /// Concatenated text of the first candidate's parts.
    fn into_text(self) -> Result<String, DomainError> {
        let Some(candidate) = self.candidates.into_iter().next() else {
            let reason = self
                .prompt_feedback
                .and_then(|f| f.block_reason)
                .unwrap_or_else(|| "no candidates returned".to_string());
            return Err(DomainError::empty_response(format!(
                "Gemini returned no candidates: {reason}"
            )));
        };

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            let reason = candidate.finish_reason.unwrap_or_else(|| "unknown".to_string());
            return Err(DomainError::empty_response(format!(
                "Gemini returned an empty response (finish reason: {reason})"
            )));
        }

        Ok(text)
    }
}

/// HTTP client for the Gemini `generateContent` endpoint.
///
/// Requests JSON output at a low temperature. The API key is checked before
/// anything touches the network, so a missing key costs no round trip.
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
    temperature: f32,
    /// Full endpoint URL (base + model + `:generateContent`).
    url: String,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Self {
        let url = format!(
            "{}{}/{}:generateContent",
            config.base_url.trim_end_matches('/'),
            API_VERSION_PATH,
            config.model
        );
        Self {
            client: reqwest::Client::builder()
                .timeout(config.timeout)
                .build()
                .unwrap_or_default(),
            api_key: config.api_key,
            model: config.model,
            temperature: config.temperature,
            url,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.url
    }

    fn classify_status(status: StatusCode, body: &str) -> DomainError {
        let detail = serde_json::from_str::<ApiErrorBody>(body)
            .map(|b| b.error.message)
            .unwrap_or_else(|_| body.trim().to_string());
        let message = if detail.is_empty() {
            format!("Gemini API returned {status}")
        } else {
            format!("Gemini API returned {status}: {detail}")
        };

        let transient = status == StatusCode::REQUEST_TIMEOUT
            || status == StatusCode::TOO_MANY_REQUESTS
            || status.is_server_error();
        if transient {
            DomainError::transient(message)
        } else {
            DomainError::rejected(message)
        }
    }
}

#[async_trait]
impl CompletionClient for GeminiClient {
    async fn generate(
        &self,
        system_instruction: &str,
        user_prompt: &str,
    ) -> Result<String, DomainError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            DomainError::configuration("GEMINI_API_KEY environment variable not set")
        })?;

        let request = ApiRequest {
            system_instruction: ApiContent {
                role: "system",
                parts: vec![ApiPart {
                    text: system_instruction,
                }],
            },
            contents: vec![ApiContent {
                role: "user",
                parts: vec![ApiPart { text: user_prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: self.temperature,
                response_mime_type: RESPONSE_MIME_TYPE,
            },
        };

        debug!("POST {}", self.url);
        let response = self
            .client
            .post(&self.url)
            .header(API_KEY_HEADER, api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    DomainError::transient(format!("Gemini request timed out: {e}"))
                } else {
                    DomainError::transient(format!("Gemini request failed: {e}"))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("GeminiClient: API returned {status}: {body}");
            return Err(Self::classify_status(status, &body));
        }

        let api_response: ApiResponse = response.json().await.map_err(|e| {
            DomainError::transient(format!("Gemini response could not be read: {e}"))
        })?;

        api_response.into_text()
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
