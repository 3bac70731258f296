use downtime_segments::RawAnalysis;
use serde::Deserialize;

/// Request body for `POST /downtime/segments`.
///
/// `analysis` is a stored or freshly generated analysis object; `null` or a
/// missing key yields no segments.
#[derive(Debug, Deserialize)]
pub struct SegmentsRequest {
    #[serde(default)]
    pub analysis: Option<RawAnalysis>,
}
