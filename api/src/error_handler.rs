use ai_llm_service::AiLlmError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use downtime_segments::SegmentsError;
use thiserror::Error;
use tracing::warn;

use crate::core::http::response_envelope::ApiResponse;

/// Public application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // --- Boot / config ---
    #[error("invalid LLM configuration: {0}")]
    Config(#[source] AiLlmError),

    // --- IO / network / server ---
    #[error("failed to bind listener")]
    Bind(#[source] std::io::Error),

    #[error("server error")]
    Server(#[source] std::io::Error),

    // --- Request / routing ---
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("no LLM is configured on this server")]
    LlmNotConfigured,

    // --- Downstream ---
    #[error("{0}")]
    Llm(#[from] AiLlmError),

    #[error("LLM output is not a usable analysis: {0}")]
    Analysis(#[from] SegmentsError),
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            // 4xx
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Analysis(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Llm(e) if e.is_rate_limited() => StatusCode::TOO_MANY_REQUESTS,

            // 5xx
            AppError::Llm(_) => StatusCode::BAD_GATEWAY,
            AppError::LlmNotConfigured => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Config(_) | AppError::Bind(_) | AppError::Server(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Bind(_) => "BIND_ERROR",
            AppError::Server(_) => "SERVER_ERROR",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::LlmNotConfigured => "LLM_NOT_CONFIGURED",
            AppError::Llm(e) if e.is_rate_limited() => "LLM_RATE_LIMITED",
            AppError::Llm(_) => "LLM_UPSTREAM_ERROR",
            AppError::Analysis(_) => "ANALYSIS_PARSE_FAILED",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            warn!(%status, code = self.error_code(), error = %self, "request failed");
        }
        ApiResponse::<()>::error(self.error_code(), self.to_string(), Vec::new())
            .into_response_with_status(status)
    }
}

/// Handy result alias used across handlers.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use ai_llm_service::error_handler::{Provider, ProviderError, ProviderErrorKind};

    #[test]
    fn downstream_errors_map_to_stable_codes() {
        let limited: AppError = AiLlmError::from(ProviderError::new(
            Provider::OpenAI,
            ProviderErrorKind::RateLimited { retry_after: None },
        ))
        .into();
        assert_eq!(limited.status_code(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(limited.error_code(), "LLM_RATE_LIMITED");

        let empty: AppError = AiLlmError::from(ProviderError::new(
            Provider::Ollama,
            ProviderErrorKind::EmptyResponse,
        ))
        .into();
        assert_eq!(empty.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(empty.error_code(), "LLM_UPSTREAM_ERROR");

        let parse: AppError = SegmentsError::NoJsonObject.into();
        assert_eq!(parse.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(parse.error_code(), "ANALYSIS_PARSE_FAILED");

        assert_eq!(
            AppError::LlmNotConfigured.status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
