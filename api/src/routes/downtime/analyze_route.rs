use std::sync::Arc;

use ai_llm_service::CompletionOptions;
use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::Response,
};
use downtime_segments::{ReportTotals, build_segments, parse_analysis};
use tracing::{info, instrument};

use crate::{
    core::{app_state::AppState, http::response_envelope::ApiResponse},
    error_handler::{AppError, AppResult},
    routes::downtime::{analyze_request::AnalyzeRequest, analyze_response::AnalyzeResponse},
};

/// Runs the LLM over the caller's records, then segments the result.
///
/// The caller owns the instructions: `prompt` and the optional `system` are
/// sent as given.
///
/// # Errors
/// - 503 `LLM_NOT_CONFIGURED` when the server has no LLM
/// - 400 `BAD_REQUEST` for a blank prompt
/// - 429 / 502 for LLM failures after retries
/// - 422 `ANALYSIS_PARSE_FAILED` when the output holds no analysis object
#[instrument(name = "downtime_analyze_route", skip_all)]
pub async fn analyze_route(
    State(state): State<Arc<AppState>>,
    Json(body): Json<AnalyzeRequest>,
) -> AppResult<Response> {
    let llm = state.llm.as_ref().ok_or(AppError::LlmNotConfigured)?;

    let prompt = body.prompt.trim();
    if prompt.is_empty() {
        return Err(AppError::BadRequest("prompt must not be empty".into()));
    }

    let opts = match body.system.filter(|s| !s.trim().is_empty()) {
        Some(system) => CompletionOptions::json().with_system(system),
        None => CompletionOptions::json(),
    };

    let text = llm.complete(prompt, &opts).await?;
    let analysis = parse_analysis(&text)?;
    let segments = build_segments(Some(&analysis));
    let totals = segments.as_ref().map(ReportTotals::from_segmentation);

    info!(
        downtime_hours = totals.as_ref().map(|t| t.downtime_hours),
        dominant = ?totals.as_ref().and_then(|t| t.dominant_segment),
        "analysis segmented"
    );

    Ok(ApiResponse::success(AnalyzeResponse {
        analysis,
        segments,
        totals,
    })
    .into_response_with_status(StatusCode::OK))
}
