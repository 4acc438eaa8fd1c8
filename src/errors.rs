//! # Error Handling for Grid Queries
//!
//! Every failure in the parse → fit → build → execute pipeline is a value of
//! [`GridError`]. Handlers can return it directly: the `IntoResponse` impl
//! maps each variant to an HTTP status code and a sanitized JSON body, while
//! internal details (database errors, SQL assembly failures) are logged
//! through the `tracing` crate and never sent to clients.
//!
//! ```rust,ignore
//! async fn my_handler() -> Result<Json<GridResponse<Row>>, GridError> {
//!     let response = Row::fetch(&db, query).await?;
//!     Ok(Json(response))
//! }
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde::Serialize;
use std::fmt;

use crate::filtering::operator::FilterOperator;

/// Error type for the grid pipeline with automatic logging and sanitized
/// responses.
///
/// Variants mirror the pipeline stages: input decoding, value conversion,
/// sort capability resolution, operator arity checks, SQL text assembly and
/// database execution. None of them are retried; all are returned
/// synchronously.
#[derive(Debug)]
pub enum GridError {
    /// 400 Bad Request - malformed filter/sorter/paging input
    Input {
        /// User-facing error message
        message: String,
    },

    /// 422 Unprocessable Entity - a filter value could not be converted to
    /// the field's backing type
    Conversion {
        /// Request-facing column name
        column: String,
        /// The raw value that failed to convert
        value: String,
        /// Human description of the expected layout
        expected: String,
    },

    /// 400 Bad Request - a sort column without the sortable capability.
    ///
    /// Deliberately asymmetric with filtering, where unknown columns are
    /// silently dropped.
    UnsortableColumn {
        /// Request-facing column name
        column: String,
    },

    /// 400 Bad Request - sort direction outside the ASC/DESC allow-list
    InvalidDirection {
        /// Request-facing column name
        column: String,
        /// The rejected direction token
        direction: String,
    },

    /// 400 Bad Request - an operator received fewer values than it requires
    Arity {
        /// Request-facing column name
        column: String,
        /// The offending operator
        operator: FilterOperator,
        /// Minimum number of values the operator requires
        required: usize,
        /// Number of values actually supplied
        supplied: usize,
    },

    /// 500 Internal Server Error - SQL text assembly failure (details
    /// logged, not exposed)
    Build {
        /// Internal description of the assembly failure
        message: String,
    },

    /// 500 Internal Server Error - database error (details logged, not
    /// exposed)
    Database {
        /// User-facing generic message
        message: String,
        /// Internal error (logged, not sent to user)
        internal: DbErr,
    },
}

impl GridError {
    /// Create a 400 Bad Request error for malformed input.
    pub fn input(message: impl Into<String>) -> Self {
        Self::Input {
            message: message.into(),
        }
    }

    /// Create a 422 error for a value that failed type conversion.
    pub fn conversion(
        column: impl Into<String>,
        value: impl Into<String>,
        expected: impl Into<String>,
    ) -> Self {
        Self::Conversion {
            column: column.into(),
            value: value.into(),
            expected: expected.into(),
        }
    }

    /// Create a 400 error for a column that is not sortable.
    pub fn unsortable_column(column: impl Into<String>) -> Self {
        Self::UnsortableColumn {
            column: column.into(),
        }
    }

    /// Create a 400 error for a direction token outside ASC/DESC.
    pub fn invalid_direction(column: impl Into<String>, direction: impl Into<String>) -> Self {
        Self::InvalidDirection {
            column: column.into(),
            direction: direction.into(),
        }
    }

    /// Create a 400 error for an operator with too few values.
    pub fn arity(
        column: impl Into<String>,
        operator: FilterOperator,
        required: usize,
        supplied: usize,
    ) -> Self {
        Self::Arity {
            column: column.into(),
            operator,
            required,
            supplied,
        }
    }

    /// Create a 500 error for a SQL assembly failure.
    pub fn build(message: impl Into<String>) -> Self {
        Self::Build {
            message: message.into(),
        }
    }

    /// Create a 500 error from a database error.
    ///
    /// The database error details are logged but NOT sent to the user.
    pub fn database(err: DbErr) -> Self {
        Self::Database {
            message: "A database error occurred".to_string(),
            internal: err,
        }
    }

    /// Get the HTTP status code for this error
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Input { .. }
            | Self::UnsortableColumn { .. }
            | Self::InvalidDirection { .. }
            | Self::Arity { .. } => StatusCode::BAD_REQUEST,
            Self::Conversion { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Build { .. } | Self::Database { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the user-facing error message (sanitized)
    fn user_message(&self) -> String {
        match self {
            Self::Input { message } => message.clone(),
            Self::Conversion {
                column,
                value,
                expected,
            } => {
                format!("invalid value '{value}' for field '{column}': expected {expected}")
            }
            Self::UnsortableColumn { column } => {
                format!("field '{column}' is not sortable")
            }
            Self::InvalidDirection { column, direction } => {
                format!("invalid sort direction '{direction}' for field '{column}': expected ASC or DESC")
            }
            Self::Arity {
                column,
                operator,
                required,
                supplied,
            } => {
                format!(
                    "operator {operator} on field '{column}' expects at least {required} value(s), got {supplied}"
                )
            }
            Self::Build { .. } => "Failed to build query".to_string(),
            Self::Database { message, .. } => message.clone(),
        }
    }

    /// Log internal error details (not sent to user)
    ///
    /// Uses the `tracing` crate - only logs if the application has enabled
    /// tracing. No output otherwise.
    fn log_internal(&self) {
        match self {
            Self::Database { internal, .. } => {
                tracing::error!(
                    error = ?internal,
                    "Database error occurred"
                );
            }
            Self::Build { message } => {
                tracing::error!(
                    details = %message,
                    "Query assembly failed"
                );
            }
            _ => {
                // Client errors carry no internal details.
                // Still log at debug level for visibility
                tracing::debug!(
                    error = %self.user_message(),
                    status = %self.status_code(),
                    "Grid request rejected"
                );
            }
        }
    }
}

/// Error response sent to users (sanitized)
#[derive(Serialize)]
struct ErrorResponse {
    /// Error message
    error: String,
}

impl IntoResponse for GridError {
    fn into_response(self) -> Response {
        // Log internal error details (not sent to user)
        self.log_internal();

        let status = self.status_code();
        let response = ErrorResponse {
            error: self.user_message(),
        };

        (status, Json(response)).into_response()
    }
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.user_message())
    }
}

impl std::error::Error for GridError {}

impl From<DbErr> for GridError {
    fn from(err: DbErr) -> Self {
        Self::database(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_error() {
        let err = GridError::input("unknown filter operator: FOO");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.user_message(), "unknown filter operator: FOO");
    }

    #[test]
    fn test_conversion_error_names_field_and_layout() {
        let err = GridError::conversion("created", "yesterday", "an RFC 3339 timestamp");
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            err.user_message(),
            "invalid value 'yesterday' for field 'created': expected an RFC 3339 timestamp"
        );
    }

    #[test]
    fn test_unsortable_column() {
        let err = GridError::unsortable_column("secret");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.user_message(), "field 'secret' is not sortable");
    }

    #[test]
    fn test_invalid_direction() {
        let err = GridError::invalid_direction("name", "SIDEWAYS");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert!(err.user_message().contains("SIDEWAYS"));
        assert!(err.user_message().contains("ASC or DESC"));
    }

    #[test]
    fn test_arity_error_names_operator_and_count() {
        let err = GridError::arity("age", FilterOperator::Between, 2, 1);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            err.user_message(),
            "operator BETWEEN on field 'age' expects at least 2 value(s), got 1"
        );
    }

    #[test]
    fn test_build_error_is_sanitized() {
        let err = GridError::build("no top-level FROM clause in 'SELECT 1'");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.user_message(), "Failed to build query");
    }

    #[test]
    fn test_database_error_is_sanitized() {
        let err = GridError::database(DbErr::Type("type mismatch".to_string()));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.user_message(), "A database error occurred");
    }

    #[test]
    fn test_dberr_conversion() {
        let err: GridError = DbErr::Custom("boom".to_string()).into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_display_trait() {
        let err = GridError::input("bad");
        assert_eq!(format!("{err}"), "bad");
    }
}
