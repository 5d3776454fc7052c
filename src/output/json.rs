//! JSON serialization of comparison results.

use crate::result::ComparisonResult;

/// Serialize a result to a compact JSON string.
///
/// Non-finite values (e.g. an indeterminate coefficient of variation)
/// serialize as `null`.
///
/// # Errors
///
/// Returns an error if serialization fails (should not happen for
/// `ComparisonResult`).
pub fn to_json(result: &ComparisonResult) -> Result<String, serde_json::Error> {
    serde_json::to_string(result)
}

/// Serialize a result to a pretty-printed JSON string.
///
/// # Errors
///
/// Returns an error if serialization fails (should not happen for
/// `ComparisonResult`).
pub fn to_json_pretty(result: &ComparisonResult) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(result)
}
