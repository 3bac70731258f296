//! Lenient field decoders for LLM-produced analysis JSON.
//!
//! Models do not respect schemas reliably: numbers show up where strings are
//! expected, single strings where arrays are expected, and list elements are
//! occasionally bare strings. Every decoder here accepts the sloppy shape and
//! degrades to "absent" instead of failing the whole document.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::model::segment::Severity;

/// Stringify a JSON scalar; `None` for null / arrays / objects.
fn scalar_to_string(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn value_to_f64(v: &Value) -> Option<f64> {
    let n = match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}

/// Free text from a scalar, or from an array of scalars joined with `"; "`.
fn text_of(v: &Value) -> Option<String> {
    match v {
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(scalar_to_string).collect();
            (!parts.is_empty()).then(|| parts.join("; "))
        }
        other => scalar_to_string(other),
    }
}

/// Optional free text (string / number / bool, or a list of those).
pub fn opt_text<'de, D>(d: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Option::<Value>::deserialize(d)?;
    Ok(v.as_ref().and_then(text_of))
}

/// Required free text; anything unusable becomes an empty string.
pub fn text<'de, D>(d: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(opt_text(d)?.unwrap_or_default())
}

/// List of names: an array of scalars, or a single string.
pub fn text_list<'de, D>(d: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Option::<Value>::deserialize(d)?;
    Ok(match v {
        Some(Value::Array(items)) => items.iter().filter_map(scalar_to_string).collect(),
        Some(Value::String(s)) if !s.trim().is_empty() => vec![s],
        _ => Vec::new(),
    })
}

/// Optional number; numeric strings are accepted, non-finite values are not.
pub fn opt_number<'de, D>(d: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Option::<Value>::deserialize(d)?;
    Ok(v.as_ref().and_then(value_to_f64))
}

/// Number defaulting to zero.
pub fn number<'de, D>(d: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(opt_number(d)?.unwrap_or(0.0))
}

/// Array of records; non-object or undecodable elements are skipped.
pub fn record_list<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let v = Option::<Value>::deserialize(d)?;
    Ok(match v {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter(Value::is_object)
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

/// Optional nested object; anything that does not decode counts as absent.
pub fn opt_record<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let v = Option::<Value>::deserialize(d)?;
    Ok(match v {
        Some(obj @ Value::Object(_)) => serde_json::from_value(obj).ok(),
        _ => None,
    })
}

/// Optional JSON object, kept verbatim; any other shape counts as absent.
pub fn opt_object<'de, D>(d: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Option::<Value>::deserialize(d)?;
    Ok(v.filter(Value::is_object))
}

/// Metric map: keeps numeric (or numeric-string) values only.
pub fn metric_map<'de, D>(d: D) -> Result<BTreeMap<String, f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Option::<Value>::deserialize(d)?;
    Ok(match v {
        Some(Value::Object(map)) => map
            .iter()
            .filter_map(|(k, v)| value_to_f64(v).map(|n| (k.clone(), n)))
            .collect(),
        _ => BTreeMap::new(),
    })
}

/// Severity label from upstream segments; unknown labels fall back to `low`.
pub fn severity<'de, D>(d: D) -> Result<Severity, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = opt_text(d)?.unwrap_or_default();
    Ok(match raw.trim().to_ascii_lowercase().as_str() {
        "high" | "critical" => Severity::High,
        "medium" | "moderate" => Severity::Medium,
        _ => Severity::Low,
    })
}
