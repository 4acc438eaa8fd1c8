//! Filter terms and the AND-of-OR expression model.
//!
//! A request carries `filter: [[FilterTerm]]` - the inner lists are OR'd,
//! the outer list is AND'd. Terms reference request-facing column names; the
//! fit pass rewrites them to storage columns and converted values. A term
//! the fit pass could not resolve renders to nothing (silent skip).

use sea_orm::Value;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::operator::FilterOperator;
use crate::errors::GridError;

/// One condition on one column.
///
/// `column` and `values` are the request-facing (JSON) forms and are echoed
/// back verbatim in the response envelope. The storage-facing state lives in
/// [`ResolvedTerm`] and is populated only by the fit pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FilterTerm {
    /// Request-facing column name
    pub column: String,
    /// Comparison operator; empty string on the wire means `EQ`
    #[serde(default)]
    #[schema(value_type = String, example = "EQ")]
    pub operator: FilterOperator,
    /// Raw values as supplied by the client
    #[serde(default, rename = "value")]
    pub values: Vec<serde_json::Value>,
    #[serde(skip)]
    pub(crate) resolved: Option<ResolvedTerm>,
}

/// Storage-facing state of a fitted term: the backing column name and the
/// converted bound values.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ResolvedTerm {
    pub(crate) column: String,
    pub(crate) values: Vec<Value>,
}

impl FilterTerm {
    /// Create an unfitted term from request-facing parts.
    #[must_use]
    pub fn new(
        column: impl Into<String>,
        operator: FilterOperator,
        values: Vec<serde_json::Value>,
    ) -> Self {
        Self {
            column: column.into(),
            operator,
            values,
            resolved: None,
        }
    }

    /// Whether the fit pass matched this term against a filterable field.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.resolved.is_some()
    }

    pub(crate) fn resolve(&mut self, column: String, values: Vec<Value>) {
        self.resolved = Some(ResolvedTerm { column, values });
    }

    /// Render this term to a parameterized SQL fragment.
    ///
    /// Returns `Ok(None)` for unresolved terms - they contribute no SQL and
    /// no bound argument. Arity violations are a hard error naming the
    /// column and operator.
    pub(crate) fn render(&self) -> Result<Option<(String, Vec<Value>)>, GridError> {
        let Some(res) = &self.resolved else {
            return Ok(None);
        };

        let op = self.operator;
        let required = op.min_arity();
        if res.values.len() < required {
            return Err(GridError::arity(
                &self.column,
                op,
                required,
                res.values.len(),
            ));
        }

        let col = &res.column;
        let fragment = match op {
            FilterOperator::Eq => (format!("{col} = ?"), vec![res.values[0].clone()]),
            FilterOperator::Neq => (format!("{col} != ?"), vec![res.values[0].clone()]),
            FilterOperator::Gt => (format!("{col} > ?"), vec![res.values[0].clone()]),
            FilterOperator::Lt => (format!("{col} < ?"), vec![res.values[0].clone()]),
            FilterOperator::Gte => (format!("{col} >= ?"), vec![res.values[0].clone()]),
            FilterOperator::Lte => (format!("{col} <= ?"), vec![res.values[0].clone()]),
            FilterOperator::Like | FilterOperator::Starts | FilterOperator::Ends => {
                (format!("{col} LIKE ?"), vec![op.decorate(&res.values[0])])
            }
            FilterOperator::Nlike => (
                format!("{col} NOT LIKE ?"),
                vec![op.decorate(&res.values[0])],
            ),
            // EMPTY/NEMPTY bind zero arguments regardless of supplied values
            FilterOperator::Empty => (format!("{col} IS NULL"), Vec::new()),
            FilterOperator::Nempty => (format!("{col} IS NOT NULL"), Vec::new()),
            // Half-open interval, exclusive on the upper bound
            FilterOperator::Between => (
                format!("{col} >= ? AND {col} < ?"),
                vec![res.values[0].clone(), res.values[1].clone()],
            ),
            // Complement of the half-open interval, kept as two plain
            // comparisons rather than NOT(BETWEEN)
            FilterOperator::Nbetween => (
                format!("{col} < ? OR {col} >= ?"),
                vec![res.values[0].clone(), res.values[1].clone()],
            ),
            FilterOperator::In => (
                format!("{col} IN ({})", placeholders(res.values.len())),
                res.values.clone(),
            ),
            FilterOperator::Nin => (
                format!("{col} NOT IN ({})", placeholders(res.values.len())),
                res.values.clone(),
            ),
        };

        Ok(Some(fragment))
    }
}

fn placeholders(count: usize) -> String {
    vec!["?"; count].join(",")
}
