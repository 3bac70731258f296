use serde::Deserialize;

/// Request body for `POST /downtime/analyze`.
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    /// Downtime records and instructions, passed to the LLM verbatim.
    #[serde(default)]
    pub prompt: String,
    /// System instructions for the LLM; omitted from the request when blank.
    #[serde(default)]
    pub system: Option<String>,
}
