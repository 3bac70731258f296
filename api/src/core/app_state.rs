use std::sync::Arc;

use ai_llm_service::{
    CompletionService, config_from_env, error_handler::opt_env, retry_policy_from_env,
};
use tracing::info;

use crate::error_handler::{AppError, AppResult};

/// Shared state for all HTTP handlers.
#[derive(Clone, Default)]
pub struct AppState {
    /// Completion client; `None` disables `/downtime/analyze`.
    pub llm: Option<Arc<CompletionService>>,
}

impl AppState {
    pub fn new(llm: Option<Arc<CompletionService>>) -> Self {
        Self { llm }
    }

    /// Load shared state from environment variables.
    ///
    /// The LLM is optional: without `LLM_MODEL` the server still serves
    /// segmentation of stored analyses.
    ///
    /// # Errors
    /// [`AppError::Config`] when `LLM_MODEL` is set but the rest of the LLM
    /// configuration is invalid.
    pub fn from_env() -> AppResult<Self> {
        if opt_env("LLM_MODEL").is_none() {
            info!("LLM_MODEL not set, analyze route disabled");
            return Ok(Self::default());
        }

        let cfg = config_from_env().map_err(AppError::Config)?;
        let retry = retry_policy_from_env().map_err(AppError::Config)?;
        let svc = CompletionService::new(cfg, retry).map_err(AppError::Config)?;

        info!(
            provider = ?svc.provider(),
            model = %svc.model(),
            max_retries = retry.max_retries,
            "completion service configured"
        );
        Ok(Self::new(Some(Arc::new(svc))))
    }

    pub fn llm_configured(&self) -> bool {
        self.llm.is_some()
    }
}
