use serde_json::Value;
use tracing::debug;

use crate::domain::DomainError;

const FENCE: &str = "```";

/// Turns raw provider text into a JSON document.
///
/// Providers sometimes wrap the payload in a markdown code fence even when
/// asked for raw JSON; the fence (with or without a language tag) is removed
/// before parsing. Stray fence tokens inside the payload are only removed
/// when the unwrapped text does not parse, so backticks inside string values
/// survive. Parse failures are not otherwise repaired.
pub struct ResponseNormalizer;

impl ResponseNormalizer {
    pub fn normalize(raw: &str) -> Result<Value, DomainError> {
        let unwrapped = Self::strip_code_fences(raw);

        if unwrapped.is_empty() {
            return Err(DomainError::empty_response(
                "provider response contained no JSON payload",
            ));
        }

        let first_error = match serde_json::from_str(unwrapped) {
            Ok(value) => return Ok(value),
            Err(e) => e,
        };

        let scrubbed = Self::remove_fence_tokens(unwrapped);
        if scrubbed == unwrapped {
            return Err(Self::malformed(first_error));
        }
        if scrubbed.is_empty() {
            return Err(DomainError::empty_response(
                "provider response contained no JSON payload",
            ));
        }

        debug!("Retrying parse with stray code fences removed");
        serde_json::from_str(&scrubbed).map_err(Self::malformed)
    }

    /// Removes one enclosing code fence, leaving the payload untouched.
    pub fn strip_code_fences(raw: &str) -> &str {
        let mut text = raw.trim();

        if let Some(rest) = text.strip_prefix(FENCE) {
            // Drop the language tag that may follow the opening fence.
            let tag_len = rest
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
                .unwrap_or(rest.len());
            text = &rest[tag_len..];
        }

        if let Some(rest) = text.trim_end().strip_suffix(FENCE) {
            text = rest;
        }

        text.trim()
    }

    fn remove_fence_tokens(text: &str) -> String {
        text.replace("```json", "").replace(FENCE, "").trim().to_string()
    }

    fn malformed(e: serde_json::Error) -> DomainError {
        DomainError::malformed(format!("response is not valid JSON: {e}"))
    }
}
