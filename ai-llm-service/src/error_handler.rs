//! Unified error handling for `ai-llm-service`.
//!
//! A single top-level error type [`AiLlmError`] for the whole library, with
//! domain-specific errors grouped in nested types ([`ConfigError`],
//! [`ProviderError`]). [`AiLlmError::is_retryable`] is what the retry wrapper
//! consults. Small env helpers return the unified [`Result<T>`] alias.
//!
//! All messages include the prefix `[AI LLM Service]` to simplify attribution in logs.

use reqwest::StatusCode;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/* ------------------------------------------------------------------------- */
/* Public result alias                                                       */
/* ------------------------------------------------------------------------- */

/// Unified result alias for the entire crate.
pub type Result<T> = std::result::Result<T, AiLlmError>;

/* ------------------------------------------------------------------------- */
/* Top-level error                                                           */
/* ------------------------------------------------------------------------- */

/// Top-level error for the `ai-llm-service` crate.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum AiLlmError {
    /// Configuration/validation errors (startup).
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Provider returned something we cannot use (status, payload, ...).
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Underlying HTTP transport error (`reqwest::Error`).
    #[error("[AI LLM Service] transport error: {0}")]
    HttpTransport(#[from] reqwest::Error),

    /// Operation exceeded the configured timeout.
    #[error("[AI LLM Service] operation timed out after {0:?}")]
    Timeout(Duration),
}

impl AiLlmError {
    /// Whether a retry can reasonably succeed.
    ///
    /// Retryable: rate limiting, timeouts, transport failures, HTTP 5xx.
    /// Everything else (config, other 4xx, decode, empty output) is final.
    pub fn is_retryable(&self) -> bool {
        match self {
            AiLlmError::Config(_) => false,
            AiLlmError::Provider(e) => e.kind.is_retryable(),
            AiLlmError::HttpTransport(e) => !(e.is_builder() || e.is_decode()),
            AiLlmError::Timeout(_) => true,
        }
    }

    /// Provider-requested wait before the next attempt, if any.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            AiLlmError::Provider(ProviderError {
                kind: ProviderErrorKind::RateLimited { retry_after },
                ..
            }) => *retry_after,
            _ => None,
        }
    }

    /// True for HTTP 429 from the provider.
    pub fn is_rate_limited(&self) -> bool {
        matches!(
            self,
            AiLlmError::Provider(ProviderError {
                kind: ProviderErrorKind::RateLimited { .. },
                ..
            })
        )
    }
}

/* ------------------------------------------------------------------------- */
/* Config errors                                                             */
/* ------------------------------------------------------------------------- */

/// Error enum for environment/config-driven setup.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable is missing or empty.
    #[error("[AI LLM Service] missing required environment variable: {0}")]
    MissingVar(&'static str),

    /// A number failed to parse (like ports, limits, timeouts).
    #[error("[AI LLM Service] invalid number in {var}: {reason}")]
    InvalidNumber {
        var: &'static str,
        reason: &'static str,
    },

    /// Unsupported provider in `LLM_KIND`.
    #[error("[AI LLM Service] unsupported provider: {0}")]
    UnsupportedProvider(String),

    /// Model name was empty.
    #[error("[AI LLM Service] model name must not be empty")]
    EmptyModel,
}

/* ------------------------------------------------------------------------- */
/* Provider errors                                                           */
/* ------------------------------------------------------------------------- */

/// Which backend produced an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Ollama,
    OpenAI,
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::Ollama => f.write_str("ollama"),
            Provider::OpenAI => f.write_str("openai"),
        }
    }
}

/// Non-success HTTP response details.
#[derive(Debug)]
pub struct HttpError {
    pub status: StatusCode,
    pub url: String,
    /// Short, trimmed snippet of the response body.
    pub snippet: String,
}

#[derive(Debug)]
pub enum ProviderErrorKind {
    /// Client was constructed with a config for another provider.
    InvalidProvider,
    /// Provider requires an API key and none was configured.
    MissingApiKey,
    /// Endpoint is empty or not http/https.
    InvalidEndpoint(String),
    /// HTTP 429.
    RateLimited { retry_after: Option<Duration> },
    /// Any other non-2xx status.
    HttpStatus(HttpError),
    /// Payload could not be decoded.
    Decode(String),
    /// Provider answered but produced no text.
    EmptyResponse,
}

impl ProviderErrorKind {
    fn is_retryable(&self) -> bool {
        match self {
            ProviderErrorKind::RateLimited { .. } => true,
            ProviderErrorKind::HttpStatus(h) => h.status.is_server_error(),
            _ => false,
        }
    }
}

/// Provider-tagged error.
#[derive(Debug, Error)]
#[error("[AI LLM Service] {provider}: {kind}")]
pub struct ProviderError {
    pub provider: Provider,
    pub kind: ProviderErrorKind,
}

impl ProviderError {
    pub fn new(provider: Provider, kind: ProviderErrorKind) -> Self {
        Self { provider, kind }
    }

    /// Maps a non-success status (429 → `RateLimited`, others → `HttpStatus`).
    pub fn from_status(
        provider: Provider,
        status: StatusCode,
        url: String,
        body: &str,
        retry_after: Option<Duration>,
    ) -> Self {
        let kind = if status == StatusCode::TOO_MANY_REQUESTS {
            ProviderErrorKind::RateLimited { retry_after }
        } else {
            ProviderErrorKind::HttpStatus(HttpError {
                status,
                url,
                snippet: make_snippet(body),
            })
        };
        Self::new(provider, kind)
    }
}

impl fmt::Display for ProviderErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderErrorKind::InvalidProvider => f.write_str("config is for a different provider"),
            ProviderErrorKind::MissingApiKey => f.write_str("missing API key"),
            ProviderErrorKind::InvalidEndpoint(e) => write!(f, "invalid endpoint: {e}"),
            ProviderErrorKind::RateLimited { retry_after } => match retry_after {
                Some(d) => write!(f, "rate limited (retry after {:.2}s)", d.as_secs_f64()),
                None => f.write_str("rate limited"),
            },
            ProviderErrorKind::HttpStatus(h) => {
                write!(f, "HTTP {} from {}: {}", h.status, h.url, h.snippet)
            }
            ProviderErrorKind::Decode(e) => write!(f, "decode error: {e}"),
            ProviderErrorKind::EmptyResponse => f.write_str("empty completion"),
        }
    }
}

/// First 240 chars of a response body, whitespace-trimmed.
pub fn make_snippet(body: &str) -> String {
    body.trim().chars().take(240).collect()
}

/// Parses a `Retry-After` header given in seconds.
pub fn parse_retry_after(value: Option<&str>) -> Option<Duration> {
    let secs = value?.trim().parse::<f64>().ok()?;
    (secs.is_finite() && secs >= 0.0).then(|| Duration::from_secs_f64(secs))
}

/* ------------------------------------------------------------------------- */
/* Env helpers (return unified `Result<T>`)                                  */
/* ------------------------------------------------------------------------- */

/// Fetches a required, non-empty environment variable.
///
/// # Errors
/// [`ConfigError::MissingVar`] if the variable is absent or empty.
pub fn must_env(name: &'static str) -> Result<String> {
    opt_env(name).ok_or_else(|| ConfigError::MissingVar(name).into())
}

/// Optional, non-empty environment variable.
pub fn opt_env(name: &str) -> Option<String> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => Some(v),
        _ => None,
    }
}

/// Parses an optional `u32` from env (`Ok(None)` if unset/empty).
///
/// # Errors
/// [`ConfigError::InvalidNumber`] if set but not a valid `u32`.
pub fn env_opt_u32(name: &'static str) -> Result<Option<u32>> {
    match opt_env(name) {
        Some(v) => v.trim().parse::<u32>().map(Some).map_err(|_| {
            AiLlmError::from(ConfigError::InvalidNumber {
                var: name,
                reason: "expected u32",
            })
        }),
        None => Ok(None),
    }
}

/// Parses an optional `u64` from env (`Ok(None)` if unset/empty).
///
/// # Errors
/// [`ConfigError::InvalidNumber`] if set but not a valid `u64`.
pub fn env_opt_u64(name: &'static str) -> Result<Option<u64>> {
    match opt_env(name) {
        Some(v) => v.trim().parse::<u64>().map(Some).map_err(|_| {
            AiLlmError::from(ConfigError::InvalidNumber {
                var: name,
                reason: "expected u64",
            })
        }),
        None => Ok(None),
    }
}

/// Validates that an HTTP endpoint starts with `http://` or `https://`.
pub fn is_http_endpoint(value: &str) -> bool {
    let v = value.trim();
    v.starts_with("http://") || v.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider_err(kind: ProviderErrorKind) -> AiLlmError {
        ProviderError::new(Provider::OpenAI, kind).into()
    }

    #[test]
    fn retryable_classification() {
        assert!(provider_err(ProviderErrorKind::RateLimited { retry_after: None }).is_retryable());
        assert!(AiLlmError::Timeout(Duration::from_secs(1)).is_retryable());
        assert!(
            provider_err(ProviderErrorKind::HttpStatus(HttpError {
                status: StatusCode::BAD_GATEWAY,
                url: "u".into(),
                snippet: String::new(),
            }))
            .is_retryable()
        );

        assert!(
            !provider_err(ProviderErrorKind::HttpStatus(HttpError {
                status: StatusCode::UNAUTHORIZED,
                url: "u".into(),
                snippet: String::new(),
            }))
            .is_retryable()
        );
        assert!(!provider_err(ProviderErrorKind::Decode("bad".into())).is_retryable());
        assert!(!provider_err(ProviderErrorKind::EmptyResponse).is_retryable());
        assert!(!AiLlmError::from(ConfigError::EmptyModel).is_retryable());
    }

    #[test]
    fn status_429_maps_to_rate_limited() {
        let e: AiLlmError = ProviderError::from_status(
            Provider::Ollama,
            StatusCode::TOO_MANY_REQUESTS,
            "http://x".into(),
            "slow down",
            Some(Duration::from_secs(2)),
        )
        .into();
        assert!(e.is_rate_limited());
        assert_eq!(e.retry_after(), Some(Duration::from_secs(2)));
    }

    #[test]
    fn retry_after_header_parsing() {
        assert_eq!(parse_retry_after(Some("3")), Some(Duration::from_secs(3)));
        assert_eq!(parse_retry_after(Some("0.5")), Some(Duration::from_millis(500)));
        assert_eq!(parse_retry_after(Some("Wed, 21 Oct 2015")), None);
        assert_eq!(parse_retry_after(None), None);
    }

    #[test]
    fn snippet_is_trimmed_and_bounded() {
        let long = format!("  {}  ", "x".repeat(500));
        assert_eq!(make_snippet(&long).len(), 240);
    }
}
