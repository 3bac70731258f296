//! Public entry for the downtime segmentation engine.
//!
//! Takes a downtime analysis (as produced by the LLM, or stored in an older
//! report format) and partitions it into four fixed business segments:
//! safety, quality, operations and maintenance.
//!
//! 1) **Classifier** (`classify`): record → segment, explicit category first,
//!    then keyword classes in fixed priority, maintenance as catch-all.
//! 2) **Hour extractor** (`hours`): first `<n> hours` quantity in an impact string.
//! 3) **Segment builder** (`builder`): distributes root causes, patterns and
//!    recommendations, apportions untracked hours by item count, derives
//!    severity and summaries (`policy`).
//!
//! Everything here is pure and synchronous: no I/O, no shared state, same
//! input → same output. `parser` and `totals` sit on the edges for callers
//! that start from raw LLM text or need report roll-ups.

pub mod builder;
pub mod classify;
pub mod errors;
pub mod hours;
pub mod model;
pub mod parser;
pub mod policy;
pub mod totals;

pub use builder::{build_segments, reconstruct};
pub use classify::classify;
pub use errors::{SegResult, SegmentsError};
pub use hours::extract_hours;
pub use model::{
    Finding, Kpi, RawAnalysis, RawPattern, RawRecommendation, RawRootCause, Recommendation,
    RootCause, Segment, SegmentData, SegmentMap, Segmentation, Severity,
};
pub use parser::parse_analysis;
pub use totals::ReportTotals;
