//! Single completion entry point over the configured provider.
//!
//! - Construct once, wrap in `Arc`, and pass clones to dependents.
//! - Every call goes through [`with_backoff`] with the service's [`RetryPolicy`].
//!
//! # Example
//! ```no_run
//! use std::sync::Arc;
//! use ai_llm_service::completion_service::{CompletionOptions, CompletionService};
//! use ai_llm_service::config::default_config::{config_from_env, retry_policy_from_env};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let svc = Arc::new(CompletionService::new(config_from_env()?, retry_policy_from_env()?)?);
//! let text = svc
//!     .complete("Analyze these downtime records: ...", &CompletionOptions::json())
//!     .await?;
//! println!("{text}");
//! # Ok(()) }
//! ```

use tracing::{debug, instrument};

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::AiLlmError,
    retry::{RetryPolicy, with_backoff},
    services::{ollama_service::OllamaService, open_ai_service::OpenAiService},
};

/// Per-call options shared by all providers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionOptions {
    /// System instruction, sent as a system message or Ollama `system`.
    pub system: Option<String>,
    /// Ask the provider for a JSON-only answer.
    pub json_mode: bool,
}

impl CompletionOptions {
    /// JSON-mode options without a system message.
    pub fn json() -> Self {
        Self {
            system: None,
            json_mode: true,
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }
}

#[derive(Debug)]
enum Backend {
    Ollama(OllamaService),
    OpenAI(OpenAiService),
}

/// Completion client bound to one model config and one retry policy.
#[derive(Debug)]
pub struct CompletionService {
    backend: Backend,
    model: String,
    retry: RetryPolicy,
}

impl CompletionService {
    /// Builds the provider client matching `cfg.provider`.
    ///
    /// # Errors
    /// Whatever the provider constructor rejects (endpoint, API key, HTTP client).
    pub fn new(cfg: LlmModelConfig, retry: RetryPolicy) -> Result<Self, AiLlmError> {
        let model = cfg.model.clone();
        let backend = match cfg.provider {
            LlmProvider::Ollama => Backend::Ollama(OllamaService::new(cfg)?),
            LlmProvider::OpenAI => Backend::OpenAI(OpenAiService::new(cfg)?),
        };
        Ok(Self {
            backend,
            model,
            retry,
        })
    }

    pub fn provider(&self) -> LlmProvider {
        match self.backend {
            Backend::Ollama(_) => LlmProvider::Ollama,
            Backend::OpenAI(_) => LlmProvider::OpenAI,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// Generates a completion for `prompt`, retrying transient failures.
    ///
    /// # Errors
    /// The last provider/transport error once retries are exhausted, or the
    /// first non-retryable one.
    #[instrument(skip_all, fields(provider = ?self.provider(), model = %self.model))]
    pub async fn complete(
        &self,
        prompt: &str,
        opts: &CompletionOptions,
    ) -> Result<String, AiLlmError> {
        let out = with_backoff(self.retry, "complete", || async {
            match &self.backend {
                Backend::Ollama(cli) => cli.generate(prompt, opts).await,
                Backend::OpenAI(cli) => cli.generate(prompt, opts).await,
            }
        })
        .await?;

        debug!(response_len = out.len(), "completion ready");
        Ok(out)
    }
}
