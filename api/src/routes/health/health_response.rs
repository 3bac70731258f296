use serde::Serialize;

/// Liveness payload for `GET /health`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    /// Whether `/downtime/analyze` can reach an LLM.
    pub llm_configured: bool,
}
