//! Policy utilities: per-segment seed tables, severity thresholds, summary
//! synthesis and the one-decimal rounding used for reported hours.

use std::collections::BTreeMap;

use crate::model::{Segment, SegmentData, Severity};

/// Owner stamped on reconstructed recommendations.
pub const DEFAULT_OWNER: &str = "Maintenance Team";
/// Timeline when a recommendation carries neither timeframe nor implementation.
pub const DEFAULT_TIMELINE: &str = "30 days";
/// Fallback for risk level, priority and finding severity labels.
pub const DEFAULT_LEVEL: &str = "medium";

/// Boilerplate summary for a segment with no attributed items.
pub fn default_summary(segment: Segment) -> &'static str {
    match segment {
        Segment::Safety => {
            "No safety-related downtime was identified for this period. Continue routine safety audits and near-miss reporting."
        }
        Segment::Quality => {
            "No quality-related downtime was identified for this period. Maintain current inspection and calibration routines."
        }
        Segment::Operations => {
            "No operations-related downtime was identified for this period. Changeover and scheduling performance is within expectations."
        }
        Segment::Maintenance => {
            "No maintenance-related downtime was identified for this period. Keep preventive maintenance schedules on track."
        }
    }
}

/// Key metric placeholders shown for each segment.
pub fn metric_labels(segment: Segment) -> &'static [&'static str] {
    match segment {
        Segment::Safety => &["incidentCount", "nearMissCount", "riskScore"],
        Segment::Quality => &["defectRate", "firstPassYield", "scrapCount"],
        Segment::Operations => &["availability", "oee", "throughputLoss"],
        Segment::Maintenance => &["mtbf", "mttr", "pmCompliance"],
    }
}

/// Fresh segment: zero hours, `low`, boilerplate summary, zeroed metrics.
pub fn seed(segment: Segment) -> SegmentData {
    let key_metrics: BTreeMap<String, f64> = metric_labels(segment)
        .iter()
        .map(|label| (label.to_string(), 0.0))
        .collect();

    SegmentData {
        downtime_hours: 0.0,
        severity: Severity::Low,
        executive_summary: default_summary(segment).to_string(),
        key_metrics,
        ..Default::default()
    }
}

/// Share of the report total, in percent. 0 when the total is not positive.
pub fn hours_percent(hours: f64, total: f64) -> f64 {
    if total > 0.0 {
        100.0 * hours / total
    } else {
        0.0
    }
}

/// Severity from item count and hours share.
///
/// Count thresholds are inclusive (`>=`), percent thresholds strict (`>`).
pub fn severity_for(item_count: usize, hours_percent: f64) -> Severity {
    if item_count >= 3 || hours_percent > 30.0 {
        Severity::High
    } else if item_count >= 2 || hours_percent > 15.0 {
        Severity::Medium
    } else {
        Severity::Low
    }
}

/// Summary sentence built from the first two items (findings first, then
/// root causes). `None` when the segment has neither.
pub fn executive_summary(segment: Segment, data: &SegmentData) -> Option<String> {
    if data.item_count() == 0 {
        return None;
    }

    let top_issues = data
        .findings
        .iter()
        .map(|f| f.title.as_str())
        .chain(data.root_causes.iter().map(|r| r.cause.as_str()))
        .take(2)
        .collect::<Vec<_>>()
        .join(", ");

    Some(format!(
        "{} hours of downtime attributed to {}-related issues. Primary concerns: {}.",
        data.downtime_hours, segment, top_issues
    ))
}

/// Round to one decimal, half toward positive infinity. Negative zero is
/// folded into zero so it never reaches the wire as `-0.0`.
pub fn round1(value: f64) -> f64 {
    let rounded = (value * 10.0 + 0.5).floor() / 10.0;
    if rounded == 0.0 { 0.0 } else { rounded }
}
