//! LLM completion client used by the downtime analysis backend.
//!
//! One configured provider (Ollama or OpenAI), one entry point
//! ([`completion_service::CompletionService::complete`]) and exponential
//! backoff on rate limits and transient failures.

pub mod completion_service;
pub mod config;
pub mod error_handler;
pub mod retry;
pub mod services;
pub mod telemetry;

pub use completion_service::{CompletionOptions, CompletionService};
pub use config::default_config::{config_from_env, retry_policy_from_env};
pub use config::llm_model_config::LlmModelConfig;
pub use config::llm_provider::LlmProvider;
pub use error_handler::{AiLlmError, ConfigError, ProviderError, ProviderErrorKind};
pub use retry::{RetryPolicy, with_backoff};
