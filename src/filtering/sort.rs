//! Sort rules and the ASC/DESC direction allow-list.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::errors::GridError;

/// One sort rule: request-facing column plus direction.
///
/// Directions are validated case-insensitively against `ASC`/`DESC` and
/// normalized to uppercase by the fit pass; nothing else is ever
/// interpolated into ORDER BY text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SortRule {
    /// Request-facing column name
    pub column: String,
    /// Sort direction, `ASC` or `DESC` (case-insensitive on input)
    #[serde(default)]
    pub direction: String,
    #[serde(skip)]
    pub(crate) resolved: Option<String>,
}

impl SortRule {
    /// Create an unfitted sort rule.
    #[must_use]
    pub fn new(column: impl Into<String>, direction: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: direction.into(),
            resolved: None,
        }
    }

    /// ORDER BY fragment for a fitted rule, `None` before fitting.
    pub(crate) fn order_by(&self) -> Option<String> {
        self.resolved
            .as_ref()
            .map(|column| format!("{column} {}", self.direction))
    }
}

/// Validate a direction token against the `{ASC, DESC}` allow-list.
///
/// Returns the normalized uppercase token; an empty direction defaults to
/// `ASC`.
pub(crate) fn normalize_direction(column: &str, direction: &str) -> Result<String, GridError> {
    match direction.trim().to_ascii_uppercase().as_str() {
        "" | "ASC" => Ok("ASC".to_string()),
        "DESC" => Ok("DESC".to_string()),
        _ => Err(GridError::invalid_direction(column, direction)),
    }
}
