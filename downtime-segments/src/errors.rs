//! Crate-wide error type for downtime-segments.
//!
//! The segmentation core itself is total and never fails. Errors only arise
//! on the edges: decoding LLM text into an analysis, or parsing segment /
//! severity names coming from callers.

use thiserror::Error;

/// Convenient alias for crate-wide results.
pub type SegResult<T> = Result<T, SegmentsError>;

/// Root error type for the downtime-segments crate.
#[derive(Debug, Error)]
pub enum SegmentsError {
    /// Analysis text was empty or whitespace only.
    #[error("analysis text is empty")]
    EmptyInput,

    /// No `{ ... }` object span could be located in the analysis text.
    #[error("analysis text does not contain a JSON object")]
    NoJsonObject,

    /// The located object span is not valid JSON.
    #[error("analysis json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Segment key outside of the fixed four.
    #[error("unknown segment: {0}")]
    UnknownSegment(String),

    /// Severity label outside of low / medium / high.
    #[error("unknown severity: {0}")]
    UnknownSeverity(String),
}
