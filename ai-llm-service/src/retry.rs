//! Exponential-backoff retry around a single LLM call.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::error_handler::AiLlmError;

/// How often and how patiently a failing call is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Extra attempts after the first one.
    pub max_retries: u32,
    pub initial_backoff: Duration,
    /// Upper bound for both the doubled backoff and a provider `Retry-After`.
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_millis(8000),
        }
    }
}

impl RetryPolicy {
    /// Single attempt, no waiting.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }
}

/// Runs `f` until it succeeds, fails with a non-retryable error, or the
/// policy's attempts are used up. The last error is returned in that case.
///
/// The wait doubles after every retry and never exceeds `max_backoff`. A
/// rate-limit error carrying `Retry-After` waits that long instead (also capped).
pub async fn with_backoff<F, Fut, T>(
    policy: RetryPolicy,
    label: &str,
    mut f: F,
) -> Result<T, AiLlmError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AiLlmError>>,
{
    let mut backoff = policy.initial_backoff.min(policy.max_backoff);
    let mut attempt: u32 = 0;

    loop {
        match f().await {
            Ok(v) => return Ok(v),
            Err(e) if !e.is_retryable() || attempt >= policy.max_retries => return Err(e),
            Err(e) => {
                attempt += 1;
                let wait = e
                    .retry_after()
                    .map(|d| d.min(policy.max_backoff))
                    .unwrap_or(backoff);

                warn!(
                    call = label,
                    attempt,
                    max_retries = policy.max_retries,
                    wait_ms = wait.as_millis() as u64,
                    error = %e,
                    "LLM call failed, retrying"
                );
                tokio::time::sleep(wait).await;
                backoff = (backoff * 2).min(policy.max_backoff);
            }
        }
    }
}
