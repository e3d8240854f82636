//! # Error Handling
//!
//! Two layers of errors live here:
//!
//! - [`PaginationError`] is raised while a request is being composed into a query.
//!   Every variant is a caller-input problem and is reported as `400 Bad Request`.
//! - [`ApiError`] is what handlers return. It maps pagination errors to 400 and
//!   database or configuration failures to 500, logging the internal details with
//!   `tracing` and sending only a sanitized message to the client.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pagecrate::ApiError;
//!
//! async fn list_posts(
//!     State(state): State<PaginationState>,
//!     request: PaginationRequest,
//! ) -> Result<Json<Page<Post>>, ApiError> {
//!     let repository = EntityRepository::<post::Entity, _>::new(&state.db);
//!     let page = state
//!         .paginator
//!         .paginate::<Post, _>(&request, &repository, FindOverrides::new(), "posts")
//!         .await?;
//!     Ok(Json(page))
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

/// Reasons a pagination request cannot be turned into a query.
///
/// These are raised synchronously during composition, before any repository
/// call, so a failed request never executes a partial query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaginationError {
    /// A `where__`/`order__` key did not split into the allowed number of segments
    MalformedFilterKey {
        key: String,
        /// Human-readable allowed lengths, e.g. `"2"` or `"2 or 3"`
        expected: &'static str,
    },
    /// The operator segment of a `where__field__op` key is not registered
    UnknownOperator { key: String, operator: String },
    /// A pair/list operator did not receive the number of comma-separated values it needs
    InvalidOperatorArity {
        key: String,
        operator: String,
        expected: &'static str,
        found: usize,
    },
    /// An `order__` value was neither `ASC` nor `DESC`
    InvalidSortDirection { key: String, value: String },
    /// The field is not in the resource's filter or sort whitelist
    UnknownField { key: String, field: String },
    /// The value could not be read as the field's type
    InvalidFilterValue {
        key: String,
        value: String,
        expected: &'static str,
    },
    /// `page` or `take` was not a usable integer
    InvalidPaginationParameter { name: &'static str, value: String },
}

impl fmt::Display for PaginationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedFilterKey { key, expected } => write!(
                f,
                "filter key must split into {expected} segments on '__' - {key}"
            ),
            Self::UnknownOperator { key, operator } => {
                write!(f, "unknown filter operator '{operator}' - {key}")
            }
            Self::InvalidOperatorArity {
                key,
                operator,
                expected,
                found,
            } => write!(
                f,
                "operator '{operator}' takes {expected} comma-separated values, got {found} - {key}"
            ),
            Self::InvalidSortDirection { key, value } => {
                write!(f, "sort direction must be 'ASC' or 'DESC', got '{value}' - {key}")
            }
            Self::UnknownField { key, field } => {
                write!(f, "field '{field}' cannot be used here - {key}")
            }
            Self::InvalidFilterValue {
                key,
                value,
                expected,
            } => write!(f, "expected {expected}, got '{value}' - {key}"),
            Self::InvalidPaginationParameter { name, value } => {
                write!(f, "'{name}' must be a positive integer, got '{value}'")
            }
        }
    }
}

impl std::error::Error for PaginationError {}

/// API error type with automatic logging and sanitized responses
#[derive(Debug)]
pub enum ApiError {
    /// 400 Bad Request - the query string could not be composed
    BadRequest {
        /// User-facing error message
        message: String,
    },

    /// 500 Internal Server Error - Database error (details logged, not exposed)
    Database {
        /// User-facing generic message
        message: String,
        /// Internal error (logged, not sent to user)
        internal: DbErr,
    },

    /// 500 Internal Server Error - misconfiguration or an unexpected row shape
    Internal {
        /// User-facing generic message
        message: String,
        /// Internal error details (logged, not sent to user)
        internal: Option<String>,
    },
}

impl ApiError {
    /// Create a 400 Bad Request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Create a 500 Internal Server Error from a database error
    ///
    /// The database error details are logged but NOT sent to the user.
    pub fn database(err: DbErr) -> Self {
        Self::Database {
            message: "A database error occurred".to_string(),
            internal: err,
        }
    }

    /// Create a 500 Internal Server Error with optional details
    pub fn internal(message: impl Into<String>, internal: Option<String>) -> Self {
        Self::Internal {
            message: message.into(),
            internal,
        }
    }

    /// Get the HTTP status code for this error
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::Database { .. } | Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the user-facing error message (sanitized)
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::BadRequest { message }
            | Self::Database { message, .. }
            | Self::Internal { message, .. } => message.clone(),
        }
    }

    fn log_internal(&self) {
        match self {
            Self::Database { internal, .. } => {
                tracing::error!(error = ?internal, "Database error occurred");
            }
            Self::Internal {
                internal: Some(details),
                ..
            } => {
                tracing::error!(details = %details, "Internal error occurred");
            }
            _ => {
                tracing::debug!(
                    error = %self.user_message(),
                    status = %self.status_code(),
                    "API error"
                );
            }
        }
    }
}

/// Error response sent to users (sanitized)
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.log_internal();

        let status = self.status_code();
        let response = ErrorResponse {
            error: self.user_message(),
        };

        (status, Json(response)).into_response()
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.user_message())
    }
}

impl std::error::Error for ApiError {}

impl From<PaginationError> for ApiError {
    fn from(err: PaginationError) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        Self::database(err)
    }
}
