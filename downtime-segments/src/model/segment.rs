//! Output vocabulary: the four fixed segments and their per-segment payload.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::errors::SegmentsError;
use crate::model::de;

/// One of the four fixed business segments. Not extensible: the report UI
/// and the PDF export hard-code these keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Segment {
    Safety,
    Quality,
    Operations,
    Maintenance,
}

impl Segment {
    /// Fixed iteration order used everywhere (seeding, sums, tie-breaks).
    pub const ALL: [Segment; 4] = [
        Segment::Safety,
        Segment::Quality,
        Segment::Operations,
        Segment::Maintenance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Segment::Safety => "safety",
            Segment::Quality => "quality",
            Segment::Operations => "operations",
            Segment::Maintenance => "maintenance",
        }
    }

    /// Position in [`Segment::ALL`].
    pub fn index(&self) -> usize {
        match self {
            Segment::Safety => 0,
            Segment::Quality => 1,
            Segment::Operations => 2,
            Segment::Maintenance => 3,
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Segment {
    type Err = SegmentsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "safety" => Ok(Segment::Safety),
            "quality" => Ok(Segment::Quality),
            "operations" => Ok(Segment::Operations),
            "maintenance" => Ok(Segment::Maintenance),
            other => Err(SegmentsError::UnknownSegment(other.to_string())),
        }
    }
}

/// Derived segment severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = SegmentsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Severity::Low),
            "medium" => Ok(Severity::Medium),
            "high" => Ok(Severity::High),
            other => Err(SegmentsError::UnknownSeverity(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    #[serde(default, deserialize_with = "de::text")]
    pub title: String,
    #[serde(default, deserialize_with = "de::text")]
    pub description: String,
    #[serde(default, deserialize_with = "de::text")]
    pub severity: String,
    #[serde(default, deserialize_with = "de::text_list")]
    pub affected_equipment: Vec<String>,
    #[serde(default, deserialize_with = "de::text")]
    pub impact: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RootCause {
    #[serde(default, deserialize_with = "de::text")]
    pub cause: String,
    #[serde(default, deserialize_with = "de::text")]
    pub evidence: String,
    #[serde(default, deserialize_with = "de::text")]
    pub risk_level: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    #[serde(default, deserialize_with = "de::text")]
    pub title: String,
    #[serde(default, deserialize_with = "de::text")]
    pub description: String,
    #[serde(default, deserialize_with = "de::text")]
    pub priority: String,
    #[serde(default, deserialize_with = "de::text")]
    pub owner: String,
    #[serde(default, deserialize_with = "de::text")]
    pub timeline: String,
    #[serde(default, deserialize_with = "de::text")]
    pub expected_outcome: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Kpi {
    #[serde(default, deserialize_with = "de::text")]
    pub metric: String,
    #[serde(default, deserialize_with = "de::text")]
    pub current: String,
    #[serde(default, deserialize_with = "de::text")]
    pub target: String,
    #[serde(default, deserialize_with = "de::text")]
    pub gap: String,
}

/// Everything the report shows for a single segment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentData {
    #[serde(default, deserialize_with = "de::number")]
    pub downtime_hours: f64,
    #[serde(default, deserialize_with = "de::severity")]
    pub severity: Severity,
    #[serde(default, deserialize_with = "de::text")]
    pub executive_summary: String,
    #[serde(default, deserialize_with = "de::metric_map")]
    pub key_metrics: BTreeMap<String, f64>,
    #[serde(default, deserialize_with = "de::record_list")]
    pub findings: Vec<Finding>,
    #[serde(default, deserialize_with = "de::record_list")]
    pub root_causes: Vec<RootCause>,
    #[serde(default, deserialize_with = "de::record_list")]
    pub recommendations: Vec<Recommendation>,
    #[serde(default, deserialize_with = "de::record_list")]
    pub kpis: Vec<Kpi>,
}

impl SegmentData {
    /// Items that count toward apportionment and severity.
    pub fn item_count(&self) -> usize {
        self.findings.len() + self.root_causes.len()
    }
}

/// The four segments of one report. Always complete: a missing key in
/// upstream JSON decodes to an empty [`SegmentData`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SegmentMap {
    #[serde(default)]
    pub safety: SegmentData,
    #[serde(default)]
    pub quality: SegmentData,
    #[serde(default)]
    pub operations: SegmentData,
    #[serde(default)]
    pub maintenance: SegmentData,
}

impl SegmentMap {
    pub fn get(&self, segment: Segment) -> &SegmentData {
        match segment {
            Segment::Safety => &self.safety,
            Segment::Quality => &self.quality,
            Segment::Operations => &self.operations,
            Segment::Maintenance => &self.maintenance,
        }
    }

    pub fn get_mut(&mut self, segment: Segment) -> &mut SegmentData {
        match segment {
            Segment::Safety => &mut self.safety,
            Segment::Quality => &mut self.quality,
            Segment::Operations => &mut self.operations,
            Segment::Maintenance => &mut self.maintenance,
        }
    }

    /// Segments in fixed order.
    pub fn iter(&self) -> impl Iterator<Item = (Segment, &SegmentData)> {
        Segment::ALL.into_iter().map(move |s| (s, self.get(s)))
    }

    /// Typed reading of an upstream `segments` object. Each key decodes on
    /// its own; a missing or unusable entry reads as an empty segment.
    pub fn from_upstream(segments: &Value) -> Self {
        let mut map = Self::default();
        for segment in Segment::ALL {
            if let Some(data) = segments
                .get(segment.as_str())
                .filter(|v| v.is_object())
                .and_then(|v| SegmentData::deserialize(v).ok())
            {
                *map.get_mut(segment) = data;
            }
        }
        map
    }
}

/// Segments of one report, as returned to callers.
///
/// Serializes as the bare segments object in both cases.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Segmentation {
    /// Upstream `segments`, byte for byte.
    Native(Value),
    /// Rebuilt from a legacy analysis.
    Reconstructed(SegmentMap),
}

impl Segmentation {
    /// Typed view for roll-ups. Native segments are read leniently and are
    /// never written back.
    pub fn as_map(&self) -> Cow<'_, SegmentMap> {
        match self {
            Segmentation::Native(v) => Cow::Owned(SegmentMap::from_upstream(v)),
            Segmentation::Reconstructed(map) => Cow::Borrowed(map),
        }
    }
}
