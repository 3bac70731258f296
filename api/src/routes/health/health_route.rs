use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::Response};

use crate::{
    core::{app_state::AppState, http::response_envelope::ApiResponse},
    routes::health::health_response::HealthResponse,
};

pub async fn health_route(State(state): State<Arc<AppState>>) -> Response {
    ApiResponse::success(HealthResponse {
        status: "ok",
        llm_configured: state.llm_configured(),
    })
    .into_response_with_status(StatusCode::OK)
}
