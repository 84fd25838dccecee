use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use crate::application::CompletionClient;
use crate::domain::DomainError;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
const DEFAULT_INITIAL_BACKOFF: Duration = Duration::from_millis(500);
const DEFAULT_MAX_BACKOFF: Duration = Duration::from_secs(8);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first; `1` disables retrying.
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            initial_backoff: DEFAULT_INITIAL_BACKOFF,
            max_backoff: DEFAULT_MAX_BACKOFF,
        }
    }
}

impl RetryPolicy {
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn with_backoff(mut self, initial: Duration, max: Duration) -> Self {
        self.initial_backoff = initial;
        self.max_backoff = max.max(initial);
        self
    }

    /// Delay before retry number `retry` (1-based): doubles each time, capped.
    pub fn backoff(&self, retry: u32) -> Duration {
        let factor = 2u32.saturating_pow(retry.saturating_sub(1));
        self.initial_backoff
            .saturating_mul(factor)
            .min(self.max_backoff)
    }
}

/// Wraps another [`CompletionClient`] and retries transient provider
/// failures with exponential backoff. Every other error is returned at once.
pub struct RetryingCompletionClient {
    inner: Arc<dyn CompletionClient>,
    policy: RetryPolicy,
}

impl RetryingCompletionClient {
    pub fn new(inner: Arc<dyn CompletionClient>, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }
}

#[async_trait]
impl CompletionClient for RetryingCompletionClient {
    async fn generate(
        &self,
        system_instruction: &str,
        user_prompt: &str,
    ) -> Result<String, DomainError> {
        let mut attempt = 1;
        loop {
            match self.inner.generate(system_instruction, user_prompt).await {
                Ok(text) => return Ok(text),
                Err(e) if e.is_retryable() && attempt < self.policy.max_attempts => {
                    let delay = self.policy.backoff(attempt);
                    warn!(
                        "Attempt {}/{} against {} failed: {}. Retrying in {:?}",
                        attempt,
                        self.policy.max_attempts,
                        self.inner.model_name(),
                        e,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn model_name(&self) -> &str {
        self.inner.model_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connector::StaticCompletionClient;

    fn fast_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy::default()
            .with_max_attempts(max_attempts)
            .with_backoff(Duration::from_millis(1), Duration::from_millis(2))
    }

    #[test]
    fn backoff_doubles_and_caps() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff(1), Duration::from_millis(500));
        assert_eq!(policy.backoff(2), Duration::from_secs(1));
        assert_eq!(policy.backoff(3), Duration::from_secs(2));
        assert_eq!(policy.backoff(10), Duration::from_secs(8));
        assert_eq!(policy.backoff(64), Duration::from_secs(8));
    }

    #[test]
    fn at_least_one_attempt() {
        assert_eq!(RetryPolicy::default().with_max_attempts(0).max_attempts, 1);
    }

    #[tokio::test]
    async fn recovers_from_transient_failures() {
        let inner = Arc::new(
            StaticCompletionClient::with_response("{}")
                .fail_first(2, || DomainError::transient("503")),
        );
        let client = RetryingCompletionClient::new(inner.clone(), fast_policy(3));

        assert_eq!(client.generate("s", "p").await.unwrap(), "{}");
        assert_eq!(inner.call_count(), 3);
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts() {
        let inner = Arc::new(StaticCompletionClient::failing(|| {
            DomainError::transient("503")
        }));
        let client = RetryingCompletionClient::new(inner.clone(), fast_policy(3));

        let err = client.generate("s", "p").await.unwrap_err();
        assert!(err.is_retryable());
        assert_eq!(inner.call_count(), 3);
    }

    #[tokio::test]
    async fn does_not_retry_permanent_failures() {
        let permanent: [fn() -> DomainError; 3] = [
            || DomainError::rejected("400 Bad Request"),
            || DomainError::configuration("GEMINI_API_KEY environment variable not set"),
            || DomainError::empty_response("nothing"),
        ];
        for make_error in permanent {
            let inner = Arc::new(StaticCompletionClient::failing(make_error));
            let client = RetryingCompletionClient::new(inner.clone(), fast_policy(5));

            assert!(client.generate("s", "p").await.is_err());
            assert_eq!(inner.call_count(), 1);
        }
    }
}
