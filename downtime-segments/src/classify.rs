//! Record → segment classification.
//!
//! Ordered, first-match-wins:
//! 1) An explicit equipment category (`mechanical` / `electrical`) decides
//!    between quality, safety and maintenance using sub-patterns.
//! 2) An explicit process category (`process` / `planned maintenance`)
//!    decides between operations and quality.
//! 3) Without a recognized category, keyword classes are tried in fixed
//!    priority: safety, quality, operations, maintenance.
//! 4) Nothing matched → maintenance.
//!
//! Records regularly match several keyword classes at once, so the order
//! above is part of the contract. Historical reports were produced with it.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::trace;

use crate::model::{ClassifyInput, Segment};

lazy_static! {
    // Sub-patterns for equipment categories.
    static ref EQUIPMENT_QUALITY: Regex =
        Regex::new(r"sensor|alignment|misalign|calibrat|inspection").expect("valid regex");
    static ref EQUIPMENT_SAFETY: Regex =
        Regex::new(r"safety|guard|lockout|lock-out|\bloto\b|emergency|e-stop").expect("valid regex");

    // Sub-patterns for process categories.
    static ref PROCESS_OPERATIONS: Regex = Regex::new(
        r"sanitation|sanitiz|cleaning|clean-up|changeover|change-over|setup|set-up"
    )
    .expect("valid regex");
    static ref PROCESS_QUALITY: Regex =
        Regex::new(r"quality|defect|contaminat").expect("valid regex");

    // Keyword fallback classes.
    static ref SAFETY_KEYWORDS: Regex = Regex::new(
        r"safety|injur|hazard|guard|lockout|lock-out|\bloto\b|emergency|e-stop|accident|near[ -]miss|\bppe\b|\bfire\b|osha"
    )
    .expect("valid regex");
    static ref QUALITY_KEYWORDS: Regex = Regex::new(
        r"quality|defect|contaminat|reject|scrap|rework|out[ -]of[ -]spec|tolerance|calibrat|sensor|inspection|foreign (?:material|object)"
    )
    .expect("valid regex");
    static ref OPERATIONS_KEYWORDS: Regex = Regex::new(
        r"changeover|change-over|setup|set-up|sanitation|sanitiz|cleaning|operator|staffing|schedul|material shortage|starv|upstream|downstream|process|throughput|training|procedure"
    )
    .expect("valid regex");
    static ref MAINTENANCE_KEYWORDS: Regex = Regex::new(
        r"bearing|motor|gearbox|belt|chain|lubric|wear|hydraulic|pneumatic|pump|seal|leak|breakdown|failure|repair|preventive|\bpm\b|mechanical|electrical|vibration|overheat"
    )
    .expect("valid regex");
}

/// Category vocabulary recognized before keyword inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CategoryClass {
    Equipment,
    Process,
    Unrecognized,
}

fn category_class(category: &str) -> CategoryClass {
    match category {
        "mechanical" | "electrical" => CategoryClass::Equipment,
        "process" | "planned maintenance" => CategoryClass::Process,
        _ => CategoryClass::Unrecognized,
    }
}

/// Lowercased concatenation of the record's text fields and equipment names.
pub fn combined_text(item: &ClassifyInput<'_>) -> String {
    let equipment = item.equipment.join(" ");
    let mut parts: Vec<&str> = item.texts.iter().map(|t| t.unwrap_or("")).collect();
    parts.push(equipment.as_str());
    parts.join(" ").to_lowercase()
}

/// Decide the segment for one record. Total: always returns a segment.
pub fn classify(item: &ClassifyInput<'_>) -> Segment {
    let category = item.category.unwrap_or("").trim().to_lowercase();
    let text = combined_text(item);

    let segment = match category_class(&category) {
        CategoryClass::Equipment => {
            if EQUIPMENT_QUALITY.is_match(&text) {
                Segment::Quality
            } else if EQUIPMENT_SAFETY.is_match(&text) {
                Segment::Safety
            } else {
                Segment::Maintenance
            }
        }
        CategoryClass::Process => {
            if PROCESS_OPERATIONS.is_match(&text) {
                Segment::Operations
            } else if PROCESS_QUALITY.is_match(&text) {
                Segment::Quality
            } else {
                Segment::Operations
            }
        }
        CategoryClass::Unrecognized => classify_by_keywords(&text),
    };

    trace!("classify: category={:?} → {}", category, segment);
    segment
}

fn classify_by_keywords(text: &str) -> Segment {
    if SAFETY_KEYWORDS.is_match(text) {
        Segment::Safety
    } else if QUALITY_KEYWORDS.is_match(text) {
        Segment::Quality
    } else if OPERATIONS_KEYWORDS.is_match(text) {
        Segment::Operations
    } else if MAINTENANCE_KEYWORDS.is_match(text) {
        Segment::Maintenance
    } else {
        Segment::Maintenance
    }
}
