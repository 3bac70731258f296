//! Hour quantities embedded in free-text impact strings.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref HOURS: Regex =
        Regex::new(r"(?i)([0-9]+(?:\.[0-9]+)?)\s*(?:hours?|hrs?)").expect("valid regex");
}

/// First `<number> hour(s)/hr(s)` quantity in `text`, or 0.
///
/// Only the first mention counts; several mentions are not summed.
pub fn extract_hours(text: &str) -> f64 {
    if text.is_empty() {
        return 0.0;
    }
    HOURS
        .captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(0.0)
}
