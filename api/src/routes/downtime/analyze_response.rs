use downtime_segments::{RawAnalysis, ReportTotals, Segmentation};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    /// Analysis as decoded from the LLM output.
    pub analysis: RawAnalysis,
    pub segments: Option<Segmentation>,
    pub totals: Option<ReportTotals>,
}
