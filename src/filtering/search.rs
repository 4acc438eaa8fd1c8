//! Free-text search expansion.
//!
//! A non-empty search string becomes one OR-group of `LIKE` conditions over
//! every search-capable field of the entity, ANDed onto the rest of the
//! filter expression. Search terms are always valid once built - there is no
//! rejection path.

use sea_orm::Value;

/// Render the search OR-group over the given storage columns.
///
/// Returns `None` when the search text is empty or no field is searchable.
pub(crate) fn search_condition(value: &str, columns: &[String]) -> Option<(String, Vec<Value>)> {
    if value.is_empty() || columns.is_empty() {
        return None;
    }

    let pattern = format!("%{value}%");
    let parts: Vec<String> = columns.iter().map(|col| format!("{col} LIKE ?")).collect();
    let args = vec![Value::from(pattern); columns.len()];
    Some((format!("({})", parts.join(" OR ")), args))
}
