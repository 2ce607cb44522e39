//! JSON serialization for bound reports.

use crate::result::BoundReport;

/// Serialize a report to a compact JSON string.
///
/// # Errors
///
/// Returns an error if serialization fails (should not happen for BoundReport).
pub fn to_json(report: &BoundReport) -> Result<String, serde_json::Error> {
    serde_json::to_string(report)
}

/// Serialize a report to a pretty-printed JSON string.
///
/// # Errors
///
/// Returns an error if serialization fails (should not happen for BoundReport).
pub fn to_json_pretty(report: &BoundReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}
