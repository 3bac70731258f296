//! Report-level roll-ups persisted by callers next to the report
//! (`downtimeHours`, `recordCount`).

use serde::{Deserialize, Serialize};

use crate::model::{Segment, SegmentMap, Segmentation};
use crate::policy::round1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportTotals {
    /// Sum of segment hours, one decimal.
    pub downtime_hours: f64,
    /// Findings + root causes + recommendations across all segments.
    pub record_count: usize,
    /// Segment with the most hours; earlier segment wins ties. `None` when
    /// no segment has positive hours.
    pub dominant_segment: Option<Segment>,
}

impl ReportTotals {
    /// Roll-ups over either output shape; native segments are read leniently.
    pub fn from_segmentation(segments: &Segmentation) -> Self {
        Self::from_segments(&segments.as_map())
    }

    pub fn from_segments(map: &SegmentMap) -> Self {
        let downtime_hours = round1(map.iter().map(|(_, d)| d.downtime_hours).sum());
        let record_count = map
            .iter()
            .map(|(_, d)| d.findings.len() + d.root_causes.len() + d.recommendations.len())
            .sum();

        let mut dominant: Option<(Segment, f64)> = None;
        for (segment, data) in map.iter() {
            if data.downtime_hours <= 0.0 {
                continue;
            }
            match dominant {
                Some((_, best)) if data.downtime_hours <= best => {}
                _ => dominant = Some((segment, data.downtime_hours)),
            }
        }

        Self {
            downtime_hours,
            record_count,
            dominant_segment: dominant.map(|(s, _)| s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Finding, Recommendation};
    use serde_json::json;

    #[test]
    fn rolls_up_hours_and_records() {
        let mut map = SegmentMap::default();
        map.quality.downtime_hours = 12.4;
        map.operations.downtime_hours = 30.0;
        map.maintenance.downtime_hours = 30.0;
        map.quality.findings.push(Finding::default());
        map.maintenance.recommendations.push(Recommendation::default());

        let totals = ReportTotals::from_segments(&map);
        assert_eq!(totals.downtime_hours, 72.4);
        assert_eq!(totals.record_count, 2);
        assert_eq!(totals.dominant_segment, Some(Segment::Operations));
    }

    #[test]
    fn no_hours_means_no_dominant_segment() {
        let totals = ReportTotals::from_segments(&SegmentMap::default());
        assert_eq!(totals.downtime_hours, 0.0);
        assert_eq!(totals.record_count, 0);
        assert_eq!(totals.dominant_segment, None);
    }

    #[test]
    fn native_segments_roll_up_from_their_readable_entries() {
        let native = Segmentation::Native(json!({
            "safety": "n/a",
            "quality": { "downtimeHours": "6.25", "findings": [{ "title": "Label defects" }] },
            "maintenance": { "downtimeHours": 18, "severity": "critical" }
        }));

        let totals = ReportTotals::from_segmentation(&native);
        assert_eq!(totals.downtime_hours, 24.3);
        assert_eq!(totals.record_count, 1);
        assert_eq!(totals.dominant_segment, Some(Segment::Maintenance));
    }
}
