//! Data model: raw LLM/legacy input records and the segmented output.

pub mod de;
pub mod raw;
pub mod segment;

pub use raw::{AnalysisSummary, ClassifyInput, RawAnalysis, RawPattern, RawRecommendation, RawRootCause};
pub use segment::{
    Finding, Kpi, Recommendation, RootCause, Segment, SegmentData, SegmentMap, Segmentation,
    Severity,
};
