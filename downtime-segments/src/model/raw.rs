//! Input records as produced by the LLM or stored legacy reports.
//!
//! All fields are optional and decoded leniently (see [`super::de`]).
//! These records are read-only; the builder never mutates them.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::de;

/// Borrowed view of the text a record exposes to the classifier.
///
/// `texts` is `[cause, title, description, evidence]`, in that order.
#[derive(Debug, Clone, Copy)]
pub struct ClassifyInput<'a> {
    pub category: Option<&'a str>,
    pub texts: [Option<&'a str>; 4],
    pub equipment: &'a [String],
}

/// Root cause entry from `rootCauseAnalysis`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRootCause {
    #[serde(default, deserialize_with = "de::opt_text", skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text", skip_serializing_if = "Option::is_none")]
    pub evidence: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text", skip_serializing_if = "Option::is_none")]
    pub estimated_impact: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text", skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text", skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "de::text_list", skip_serializing_if = "Vec::is_empty")]
    pub affected_equipment: Vec<String>,
}

/// Recurring pattern entry from `patterns`; becomes a finding.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPattern {
    #[serde(default, deserialize_with = "de::opt_text", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text", skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text", skip_serializing_if = "Option::is_none")]
    pub frequency: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text", skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "de::text_list", skip_serializing_if = "Vec::is_empty")]
    pub affected_equipment: Vec<String>,
}

/// Recommendation entry from `recommendations`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRecommendation {
    #[serde(default, deserialize_with = "de::opt_text", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text", skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text", skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text", skip_serializing_if = "Option::is_none")]
    pub expected_impact: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text", skip_serializing_if = "Option::is_none")]
    pub timeframe: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text", skip_serializing_if = "Option::is_none")]
    pub implementation: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text", skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// `summary` block of an analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSummary {
    #[serde(default, deserialize_with = "de::opt_number", skip_serializing_if = "Option::is_none")]
    pub total_downtime_hours: Option<f64>,
}

/// Whole analysis blob, as stored on a downtime report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAnalysis {
    #[serde(default, deserialize_with = "de::opt_record", skip_serializing_if = "Option::is_none")]
    pub summary: Option<AnalysisSummary>,
    #[serde(default, deserialize_with = "de::opt_number", skip_serializing_if = "Option::is_none")]
    pub total_downtime_hours: Option<f64>,
    /// Native segmented output, untouched; when present the builder passes
    /// it through as is.
    #[serde(default, deserialize_with = "de::opt_object", skip_serializing_if = "Option::is_none")]
    pub segments: Option<Value>,
    #[serde(default, deserialize_with = "de::record_list")]
    pub root_cause_analysis: Vec<RawRootCause>,
    #[serde(default, deserialize_with = "de::record_list")]
    pub patterns: Vec<RawPattern>,
    #[serde(default, deserialize_with = "de::record_list")]
    pub recommendations: Vec<RawRecommendation>,
}

impl RawAnalysis {
    /// Declared report total: `summary.totalDowntimeHours`, then the top-level
    /// `totalDowntimeHours`, then 0. A zero total is treated as not declared.
    pub fn declared_total_hours(&self) -> f64 {
        let declared = |v: Option<f64>| v.filter(|h| *h != 0.0);
        declared(self.summary.as_ref().and_then(|s| s.total_downtime_hours))
            .or(declared(self.total_downtime_hours))
            .unwrap_or(0.0)
    }
}

impl RawRootCause {
    pub fn classify_input(&self) -> ClassifyInput<'_> {
        ClassifyInput {
            category: self.category.as_deref(),
            texts: [
                self.cause.as_deref(),
                None,
                self.description.as_deref(),
                self.evidence.as_deref(),
            ],
            equipment: &self.affected_equipment,
        }
    }
}

impl RawPattern {
    pub fn classify_input(&self) -> ClassifyInput<'_> {
        ClassifyInput {
            category: self.category.as_deref(),
            texts: [
                None,
                self.title.as_deref(),
                self.description.as_deref(),
                None,
            ],
            equipment: &self.affected_equipment,
        }
    }
}

impl RawRecommendation {
    pub fn classify_input(&self) -> ClassifyInput<'_> {
        ClassifyInput {
            category: self.category.as_deref(),
            texts: [
                None,
                self.title.as_deref(),
                self.description.as_deref(),
                None,
            ],
            equipment: &[],
        }
    }
}
