//! Default LLM config loaded strictly from environment variables.
//!
//! # Environment variables
//!
//! Common:
//! - `LLM_KIND`          = provider kind (`ollama` default, `openai`/`chatgpt`)
//! - `LLM_MODEL`         = model name (mandatory)
//! - `LLM_ENDPOINT`      = base URL (OpenAI defaults to `https://api.openai.com`)
//! - `LLM_API_KEY`       = API key (mandatory for OpenAI)
//! - `LLM_MAX_TOKENS`    = optional max tokens (u32)
//! - `LLM_TIMEOUT_SECS`  = optional per-request timeout (u64, default 120)
//!
//! Ollama-specific fallback when `LLM_ENDPOINT` is unset:
//! - `OLLAMA_URL` or `OLLAMA_PORT`
//!
//! Retry:
//! - `LLM_MAX_RETRIES` (default 3)
//! - `LLM_INITIAL_BACKOFF_MS` (default 500)
//! - `LLM_MAX_BACKOFF_MS` (default 8000)

use std::time::Duration;

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{
        AiLlmError, ConfigError, env_opt_u32, env_opt_u64, is_http_endpoint, must_env, opt_env,
    },
    retry::RetryPolicy,
};

const OPENAI_DEFAULT_ENDPOINT: &str = "https://api.openai.com";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Resolves the Ollama endpoint strictly from environment.
///
/// Precedence:
/// 1. `OLLAMA_URL` if present and non-empty
/// 2. `OLLAMA_PORT` → `http://localhost:{port}`
///
/// # Errors
///
/// - [`ConfigError::MissingVar`] if both are missing
/// - [`ConfigError::InvalidNumber`] if `OLLAMA_PORT` is invalid
fn ollama_endpoint() -> Result<String, AiLlmError> {
    if let Some(url) = opt_env("OLLAMA_URL") {
        return Ok(url);
    }
    if let Some(port) = opt_env("OLLAMA_PORT") {
        let port = port
            .trim()
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidNumber {
                var: "OLLAMA_PORT",
                reason: "expected u16 (1..=65535)",
            })?;
        return Ok(format!("http://localhost:{port}"));
    }
    Err(AiLlmError::Config(ConfigError::MissingVar(
        "LLM_ENDPOINT, OLLAMA_URL or OLLAMA_PORT",
    )))
}

/// Builds the completion config from the environment.
///
/// # Defaults
/// - `temperature = Some(0.2)` (analyses should be stable across runs)
/// - `timeout_secs = Some(120)`
///
/// # Errors
/// - [`ConfigError::UnsupportedProvider`] for an unknown `LLM_KIND`
/// - [`ConfigError::MissingVar`] for a missing model, endpoint or OpenAI key
/// - [`ConfigError::InvalidNumber`] for malformed numeric vars
pub fn config_from_env() -> Result<LlmModelConfig, AiLlmError> {
    let kind = opt_env("LLM_KIND").unwrap_or_else(|| "ollama".to_string());
    let provider = LlmProvider::from_kind(&kind)
        .ok_or_else(|| ConfigError::UnsupportedProvider(kind.clone()))?;

    let model = must_env("LLM_MODEL")?;
    let endpoint = match (opt_env("LLM_ENDPOINT"), provider) {
        (Some(e), _) => e,
        (None, LlmProvider::Ollama) => ollama_endpoint()?,
        (None, LlmProvider::OpenAI) => OPENAI_DEFAULT_ENDPOINT.to_string(),
    };
    let api_key = match provider {
        LlmProvider::OpenAI => Some(must_env("LLM_API_KEY")?),
        LlmProvider::Ollama => opt_env("LLM_API_KEY"),
    };

    let cfg = LlmModelConfig {
        provider,
        model,
        endpoint,
        api_key,
        max_tokens: env_opt_u32("LLM_MAX_TOKENS")?,
        temperature: Some(0.2),
        top_p: None,
        timeout_secs: Some(env_opt_u64("LLM_TIMEOUT_SECS")?.unwrap_or(DEFAULT_TIMEOUT_SECS)),
    };
    validate(&cfg)?;
    Ok(cfg)
}

/// Reads the retry policy; unset variables keep [`RetryPolicy::default`].
///
/// # Errors
/// [`ConfigError::InvalidNumber`] for malformed values.
pub fn retry_policy_from_env() -> Result<RetryPolicy, AiLlmError> {
    let base = RetryPolicy::default();
    Ok(RetryPolicy {
        max_retries: env_opt_u32("LLM_MAX_RETRIES")?.unwrap_or(base.max_retries),
        initial_backoff: env_opt_u64("LLM_INITIAL_BACKOFF_MS")?
            .map(Duration::from_millis)
            .unwrap_or(base.initial_backoff),
        max_backoff: env_opt_u64("LLM_MAX_BACKOFF_MS")?
            .map(Duration::from_millis)
            .unwrap_or(base.max_backoff),
    })
}

fn validate(cfg: &LlmModelConfig) -> Result<(), AiLlmError> {
    if cfg.model.trim().is_empty() {
        return Err(ConfigError::EmptyModel.into());
    }
    if !is_http_endpoint(&cfg.endpoint) {
        return Err(ConfigError::MissingVar("LLM_ENDPOINT (http:// or https://)").into());
    }
    Ok(())
}
