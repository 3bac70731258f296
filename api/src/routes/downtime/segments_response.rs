use downtime_segments::{ReportTotals, Segmentation};
use serde::Serialize;

/// Segments plus report roll-ups; both `null` when there was no analysis.
#[derive(Debug, Serialize)]
pub struct SegmentsResponse {
    pub segments: Option<Segmentation>,
    pub totals: Option<ReportTotals>,
}

impl SegmentsResponse {
    pub fn from_segments(segments: Option<Segmentation>) -> Self {
        let totals = segments.as_ref().map(ReportTotals::from_segmentation);
        Self { segments, totals }
    }
}
