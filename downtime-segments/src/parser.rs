//! Turn raw LLM completion text into a [`RawAnalysis`].
//!
//! Providers wrap JSON in code fences or add a sentence of prose around it
//! even when asked not to, so decoding goes: trim fences → take the outermost
//! `{ ... }` span → lenient serde decode.

use tracing::debug;

use crate::errors::{SegResult, SegmentsError};
use crate::model::RawAnalysis;

/// Parse LLM output text into an analysis.
///
/// # Errors
/// - [`SegmentsError::EmptyInput`] for blank text
/// - [`SegmentsError::NoJsonObject`] when no object span exists
/// - [`SegmentsError::Json`] when the span is not valid JSON
pub fn parse_analysis(text: &str) -> SegResult<RawAnalysis> {
    let clean = cleanup_json_like(text);
    if clean.is_empty() {
        return Err(SegmentsError::EmptyInput);
    }

    let span = outer_object_span(&clean).ok_or(SegmentsError::NoJsonObject)?;
    let analysis: RawAnalysis = serde_json::from_str(span)?;

    debug!(
        "parse_analysis: len={} root_causes={} patterns={} recommendations={} segmented={}",
        span.len(),
        analysis.root_cause_analysis.len(),
        analysis.patterns.len(),
        analysis.recommendations.len(),
        analysis.segments.is_some()
    );
    Ok(analysis)
}

/// Trim common code-fence wrappers around JSON.
fn cleanup_json_like(s: &str) -> String {
    let mut t = s.trim().to_string();
    if t.starts_with("```") {
        t = t
            .trim_start_matches("```json")
            .trim_start_matches("```JSON")
            .trim_start_matches("```")
            .to_string();
        if let Some(pos) = t.rfind("```") {
            t.truncate(pos);
        }
    }
    t.trim().to_string()
}

/// From the first `{` to the last `}`, inclusive.
fn outer_object_span(s: &str) -> Option<&str> {
    let start = s.find('{')?;
    let end = s.rfind('}')?;
    (end > start).then(|| &s[start..=end])
}
