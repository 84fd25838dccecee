use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::application::{CompletionClient, EXAMPLE_RESPONSE};
use crate::domain::DomainError;

type ErrorFactory = Box<dyn Fn() -> DomainError + Send + Sync>;

/// Offline [`CompletionClient`] that answers every prompt with a fixed text.
///
/// Backs the `--mock` flag and the test suites. Defaults to the worked
/// example from the prompt template. Can be told to fail, either always or
/// for the first few calls, and records what it was asked.
pub struct StaticCompletionClient {
    response: String,
    failure: Option<ErrorFactory>,
    failures_left: AtomicUsize,
    calls: AtomicUsize,
    last_prompt: Mutex<Option<String>>,
}

impl StaticCompletionClient {
    pub fn new() -> Self {
        Self::with_response(EXAMPLE_RESPONSE)
    }

    pub fn with_response(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            failure: None,
            failures_left: AtomicUsize::new(0),
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        }
    }

    /// Every call fails with the error `make_error` builds.
    pub fn failing(make_error: impl Fn() -> DomainError + Send + Sync + 'static) -> Self {
        Self::new().fail_first(usize::MAX, make_error)
    }

    /// The first `count` calls fail, later ones succeed.
    pub fn fail_first(
        mut self,
        count: usize,
        make_error: impl Fn() -> DomainError + Send + Sync + 'static,
    ) -> Self {
        self.failure = Some(Box::new(make_error));
        self.failures_left = AtomicUsize::new(count);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn take_failure(&self) -> Option<DomainError> {
        let failure = self.failure.as_ref()?;
        self.failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .ok()
            .map(|_| failure())
    }
}

impl Default for StaticCompletionClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CompletionClient for StaticCompletionClient {
    async fn generate(
        &self,
        _system_instruction: &str,
        user_prompt: &str,
    ) -> Result<String, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self
            .last_prompt
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(user_prompt.to_string());

        if let Some(err) = self.take_failure() {
            return Err(err);
        }

        if self.response.trim().is_empty() {
            return Err(DomainError::empty_response(
                "Received an empty response from the provider",
            ));
        }

        Ok(self.response.clone())
    }

    fn model_name(&self) -> &str {
        "static-completion"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn serves_template_example_by_default() {
        let client = StaticCompletionClient::new();
        let text = client.generate("rules", "anything").await.unwrap();

        assert_eq!(text, EXAMPLE_RESPONSE);
        assert_eq!(client.call_count(), 1);
    }

    #[tokio::test]
    async fn fails_only_for_the_first_calls() {
        let client = StaticCompletionClient::with_response("{}")
            .fail_first(2, || DomainError::transient("busy"));

        assert!(client.generate("s", "p").await.is_err());
        assert!(client.generate("s", "p").await.is_err());
        assert_eq!(client.generate("s", "p").await.unwrap(), "{}");
        assert_eq!(client.call_count(), 3);
    }
}
