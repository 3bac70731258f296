//! Segment builder: reconstructs the four-segment structure from a legacy
//! (pre-segmentation) analysis.
//!
//! Steps:
//! - **A** seed all four segments from the static tables in [`crate::policy`]
//! - **B** root causes → classify, extract hours, push `RootCause`
//! - **C** patterns → classify, push `Finding`
//! - **D** recommendations → classify, push `Recommendation`
//! - **E** apportion untracked hours by item count
//! - **F** derive severity per segment
//! - **G** synthesize the executive summary
//!
//! Analyses that already carry `segments` skip all of the above.

use tracing::debug;

use crate::classify::classify;
use crate::hours::extract_hours;
use crate::model::{
    Finding, RawAnalysis, RawPattern, RawRecommendation, RawRootCause, Recommendation, RootCause,
    Segment, SegmentMap, Segmentation,
};
use crate::policy::{
    DEFAULT_LEVEL, DEFAULT_OWNER, DEFAULT_TIMELINE, executive_summary, hours_percent, round1, seed,
    severity_for,
};

/// Directly attributed hours, indexed by [`Segment::index`].
type TrackedHours = [f64; 4];

/// Segments for a report.
///
/// - `None` when there is no analysis.
/// - `analysis.segments` exactly as received when upstream already
///   segmented the data.
/// - Otherwise the reconstruction described in the module docs.
pub fn build_segments(analysis: Option<&RawAnalysis>) -> Option<Segmentation> {
    let analysis = analysis?;
    if let Some(segments) = &analysis.segments {
        debug!("segments: upstream segments present → pass-through");
        return Some(Segmentation::Native(segments.clone()));
    }
    Some(Segmentation::Reconstructed(reconstruct(analysis)))
}

/// Full fallback reconstruction (steps A–G). Pure; `analysis` is not touched.
pub fn reconstruct(analysis: &RawAnalysis) -> SegmentMap {
    let total = analysis.declared_total_hours();

    // A: seed
    let mut map = SegmentMap {
        safety: seed(Segment::Safety),
        quality: seed(Segment::Quality),
        operations: seed(Segment::Operations),
        maintenance: seed(Segment::Maintenance),
    };
    let mut tracked: TrackedHours = [0.0; 4];

    // B: root causes
    for rc in &analysis.root_cause_analysis {
        let segment = classify(&rc.classify_input());
        let impact = rc.estimated_impact.as_deref().unwrap_or("");
        tracked[segment.index()] += extract_hours(impact);
        map.get_mut(segment).root_causes.push(normalize_root_cause(rc));
    }

    // C: patterns
    for p in &analysis.patterns {
        let segment = classify(&p.classify_input());
        map.get_mut(segment).findings.push(normalize_pattern(p));
    }

    // D: recommendations
    for r in &analysis.recommendations {
        let segment = classify(&r.classify_input());
        map.get_mut(segment)
            .recommendations
            .push(normalize_recommendation(r));
    }

    debug!(
        "segments: distributed root_causes={} patterns={} recommendations={} total_hours={}",
        analysis.root_cause_analysis.len(),
        analysis.patterns.len(),
        analysis.recommendations.len(),
        total
    );

    // E: apportionment
    apportion(&mut map, &tracked, total);

    // F + G: severity and summary
    for segment in Segment::ALL {
        let data = map.get_mut(segment);
        let percent = hours_percent(data.downtime_hours, total);
        data.severity = severity_for(data.item_count(), percent);
        if let Some(summary) = executive_summary(segment, data) {
            data.executive_summary = summary;
        }
        debug!(
            "segments: {} hours={} items={} severity={}",
            segment,
            data.downtime_hours,
            data.item_count(),
            data.severity
        );
    }

    map
}

/// `hours[s] = round1(tracked[s] + count[s] / totalCount * (total - Σ tracked))`.
///
/// The remainder is not clamped; over-attribution yields negative shares.
fn apportion(map: &mut SegmentMap, tracked: &TrackedHours, total: f64) {
    let total_tracked: f64 = tracked.iter().sum();
    let untracked = total - total_tracked;

    let counts: Vec<usize> = Segment::ALL
        .iter()
        .map(|s| map.get(*s).item_count())
        .collect();
    let total_count = match counts.iter().sum::<usize>() {
        0 => 1,
        n => n,
    };

    for segment in Segment::ALL {
        let i = segment.index();
        let share = counts[i] as f64 / total_count as f64;
        map.get_mut(segment).downtime_hours = round1(tracked[i] + share * untracked);
    }
}

/// First non-empty candidate, or "".
fn first_text<'a>(candidates: &[Option<&'a str>]) -> &'a str {
    candidates
        .iter()
        .flatten()
        .copied()
        .find(|s| !s.is_empty())
        .unwrap_or("")
}

fn normalize_root_cause(rc: &RawRootCause) -> RootCause {
    RootCause {
        cause: first_text(&[rc.cause.as_deref()]).to_string(),
        evidence: first_text(&[rc.evidence.as_deref(), rc.estimated_impact.as_deref()])
            .to_string(),
        risk_level: first_text(&[rc.priority.as_deref(), Some(DEFAULT_LEVEL)]).to_string(),
    }
}

fn normalize_pattern(p: &RawPattern) -> Finding {
    Finding {
        title: first_text(&[p.title.as_deref()]).to_string(),
        description: first_text(&[p.description.as_deref()]).to_string(),
        severity: first_text(&[p.severity.as_deref(), Some(DEFAULT_LEVEL)]).to_string(),
        affected_equipment: p.affected_equipment.clone(),
        impact: format!("Frequency: {}", first_text(&[p.frequency.as_deref()])),
    }
}

fn normalize_recommendation(r: &RawRecommendation) -> Recommendation {
    Recommendation {
        title: first_text(&[r.title.as_deref(), r.action.as_deref()]).to_string(),
        description: first_text(&[r.description.as_deref(), r.action.as_deref()]).to_string(),
        priority: first_text(&[r.priority.as_deref(), Some(DEFAULT_LEVEL)]).to_string(),
        owner: DEFAULT_OWNER.to_string(),
        timeline: first_text(&[
            r.timeframe.as_deref(),
            r.implementation.as_deref(),
            Some(DEFAULT_TIMELINE),
        ])
        .to_string(),
        expected_outcome: first_text(&[r.expected_impact.as_deref()]).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Severity;
    use crate::policy::default_summary;
    use serde_json::json;

    fn analysis(v: serde_json::Value) -> RawAnalysis {
        serde_json::from_value(v).unwrap()
    }

    fn rebuilt(a: &RawAnalysis) -> SegmentMap {
        match build_segments(Some(a)) {
            Some(Segmentation::Reconstructed(map)) => map,
            other => panic!("expected a reconstruction, got {other:?}"),
        }
    }

    fn hours_sum(map: &SegmentMap) -> f64 {
        map.iter().map(|(_, d)| d.downtime_hours).sum()
    }

    #[test]
    fn absent_analysis_yields_none() {
        assert!(build_segments(None).is_none());
    }

    #[test]
    fn upstream_segments_pass_through_untouched() {
        let segments = json!({
            "safety": {
                "downtimeHours": 12,
                "severity": "critical",
                "executiveSummary": "native",
                "keyMetrics": { "incidentCount": 2, "riskScore": "High" },
                "kpis": [{ "name": "TRIR", "current": 1.2, "target": 0.8 }]
            },
            "quality": "n/a"
        });
        let a = analysis(json!({
            "totalDowntimeHours": 100,
            "segments": segments.clone(),
            "rootCauseAnalysis": [{ "cause": "Bearing failure", "estimatedImpact": "40 hours" }]
        }));

        let out = build_segments(Some(&a)).unwrap();
        assert_eq!(out, Segmentation::Native(segments.clone()));
        assert_eq!(serde_json::to_value(&out).unwrap(), segments);
        assert!(out.as_map().maintenance.root_causes.is_empty());
    }

    #[test]
    fn array_evidence_reaches_the_classifier() {
        let a = analysis(json!({
            "totalDowntimeHours": 4,
            "rootCauseAnalysis": [{
                "cause": "Stoppage on line 2",
                "evidence": ["Emergency stop pressed 4 times"],
                "estimatedImpact": "4 hours",
                "category": "safety"
            }]
        }));

        let out = rebuilt(&a);
        assert_eq!(out.safety.root_causes.len(), 1);
        assert!(out.maintenance.root_causes.is_empty());
        assert_eq!(out.safety.root_causes[0].evidence, "Emergency stop pressed 4 times");
        assert_eq!(out.safety.downtime_hours, 4.0);
    }

    #[test]
    fn end_to_end_apportionment() {
        let a = analysis(json!({
            "totalDowntimeHours": 100,
            "rootCauseAnalysis": [{
                "cause": "Drive bearing failure on Conveyor 3",
                "category": "mechanical",
                "estimatedImpact": "40 hours"
            }],
            "patterns": [{
                "title": "Extended changeovers on Filler 2",
                "description": "Changeovers exceed the standard by 20 minutes",
                "frequency": "Weekly"
            }]
        }));

        let out = rebuilt(&a);

        assert_eq!(out.maintenance.downtime_hours, 70.0);
        assert_eq!(out.operations.downtime_hours, 30.0);
        assert_eq!(out.safety.downtime_hours, 0.0);
        assert_eq!(out.quality.downtime_hours, 0.0);

        // count=1 but 70% > 30 → high; 30% is not > 30 but is > 15 → medium.
        assert_eq!(out.maintenance.severity, Severity::High);
        assert_eq!(out.operations.severity, Severity::Medium);
        assert_eq!(out.safety.severity, Severity::Low);

        assert_eq!(
            out.maintenance.executive_summary,
            "70 hours of downtime attributed to maintenance-related issues. \
             Primary concerns: Drive bearing failure on Conveyor 3."
        );
        assert_eq!(out.safety.executive_summary, default_summary(Segment::Safety));
        assert_eq!(out.operations.findings[0].impact, "Frequency: Weekly");
        assert_eq!(out.maintenance.root_causes[0].evidence, "40 hours");
        assert_eq!(out.maintenance.root_causes[0].risk_level, "medium");
    }

    #[test]
    fn two_findings_at_ten_percent_is_medium() {
        let a = analysis(json!({
            "summary": { "totalDowntimeHours": 100 },
            "rootCauseAnalysis": [{ "cause": "Hydraulic pump failure", "estimatedImpact": "85 hours" }],
            "patterns": [
                { "title": "Label defects on Line 1" },
                { "title": "Rejects at checkweigher" }
            ]
        }));

        let out = rebuilt(&a);
        assert_eq!(out.quality.findings.len(), 2);
        assert_eq!(out.quality.downtime_hours, 10.0);
        assert_eq!(out.quality.severity, Severity::Medium);
        assert_eq!(out.maintenance.downtime_hours, 90.0);
    }

    #[test]
    fn conservation_within_rounding() {
        let a = analysis(json!({
            "totalDowntimeHours": 137.3,
            "rootCauseAnalysis": [
                { "cause": "Guard interlock fault", "estimatedImpact": "12.5 hours" },
                { "cause": "Motor overheating", "estimatedImpact": "7 hrs" },
                { "cause": "Contamination in mixer", "estimatedImpact": "unknown" }
            ],
            "patterns": [
                { "title": "Slow changeovers" },
                { "title": "Sensor misreads", "category": "electrical" },
                { "title": "Belt tracking issues" }
            ]
        }));

        let out = rebuilt(&a);
        assert!((hours_sum(&out) - 137.3).abs() <= 0.2);
    }

    #[test]
    fn over_attribution_is_not_clamped() {
        let a = analysis(json!({
            "totalDowntimeHours": 10,
            "rootCauseAnalysis": [{ "cause": "Gearbox failure", "estimatedImpact": "20 hours" }],
            "patterns": [{ "title": "Operator staffing gaps" }]
        }));

        let out = rebuilt(&a);
        assert_eq!(out.maintenance.downtime_hours, 15.0);
        assert_eq!(out.operations.downtime_hours, -5.0);
        assert!((hours_sum(&out) - 10.0).abs() <= 0.2);
    }

    #[test]
    fn no_items_keeps_seeded_segments() {
        let a = analysis(json!({ "totalDowntimeHours": 50 }));
        let out = rebuilt(&a);
        for (segment, data) in out.iter() {
            assert_eq!(data.downtime_hours, 0.0);
            assert_eq!(data.severity, Severity::Low);
            assert_eq!(data.executive_summary, default_summary(segment));
        }
    }

    #[test]
    fn recommendations_are_normalized_and_do_not_count() {
        let a = analysis(json!({
            "totalDowntimeHours": 20,
            "rootCauseAnalysis": [{ "cause": "Chain wear", "estimatedImpact": "5 hours" }],
            "recommendations": [
                { "action": "Replace worn chain links on the main line", "expectedImpact": "Fewer stops" },
                {
                    "title": "Add guard interlocks",
                    "description": "Fit interlocks to all access doors",
                    "priority": "high",
                    "implementation": "Q3"
                }
            ]
        }));

        let out = rebuilt(&a);

        let rec = &out.maintenance.recommendations[0];
        assert_eq!(rec.title, "Replace worn chain links on the main line");
        assert_eq!(rec.description, rec.title);
        assert_eq!(rec.priority, "medium");
        assert_eq!(rec.timeline, "30 days");
        assert_eq!(rec.owner, "Maintenance Team");
        assert_eq!(rec.expected_outcome, "Fewer stops");

        let safety = &out.safety.recommendations[0];
        assert_eq!(safety.timeline, "Q3");
        assert_eq!(safety.priority, "high");

        // Only the root cause counts toward apportionment.
        assert_eq!(out.maintenance.downtime_hours, 20.0);
        assert_eq!(out.safety.downtime_hours, 0.0);
    }

    #[test]
    fn empty_strings_fall_back_like_missing_fields() {
        let a = analysis(json!({
            "rootCauseAnalysis": [{
                "cause": "Seal leak",
                "evidence": "",
                "estimatedImpact": "3 hours",
                "priority": ""
            }]
        }));
        let out = rebuilt(&a);
        let rc = &out.maintenance.root_causes[0];
        assert_eq!(rc.evidence, "3 hours");
        assert_eq!(rc.risk_level, "medium");
    }

    #[test]
    fn rebuilding_is_idempotent() {
        let a = analysis(json!({
            "totalDowntimeHours": 64.2,
            "rootCauseAnalysis": [{ "cause": "Near miss at palletizer", "estimatedImpact": "2 hours" }],
            "patterns": [{ "title": "Frequent jams", "affectedEquipment": ["Palletizer"] }]
        }));
        let before = a.clone();
        assert_eq!(build_segments(Some(&a)), build_segments(Some(&a)));
        assert_eq!(a, before);
    }
}
