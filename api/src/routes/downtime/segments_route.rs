use axum::{extract::Json, http::StatusCode, response::Response};
use downtime_segments::build_segments;
use tracing::{debug, instrument};

use crate::{
    core::http::response_envelope::ApiResponse,
    routes::downtime::{segments_request::SegmentsRequest, segments_response::SegmentsResponse},
};

/// Segments an analysis the caller already has (stored report, older format).
///
/// Pure and synchronous; never fails once the body decodes.
#[instrument(name = "downtime_segments_route", skip_all)]
pub async fn segments_route(Json(body): Json<SegmentsRequest>) -> Response {
    let segments = build_segments(body.analysis.as_ref());
    debug!(has_segments = segments.is_some(), "segments built");

    ApiResponse::success(SegmentsResponse::from_segments(segments))
        .into_response_with_status(StatusCode::OK)
}
