//! Centralized failure handling.
//!
//! Every fallible operation in the crate returns [`ApiResult`], carrying a
//! typed [`Failure`] on the error path. Failures convert to HTTP responses
//! through a fixed code-to-status table; the captured source error is kept
//! for logging only and never serialized to clients.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// Closed taxonomy of failure categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub enum FailureCode {
    Unauthorized,
    NotFound,
    DuplicateEmail,
    DbConcurrency,
    ValidationError,
    InvalidOperation,
    Timeout,
    DbError,
    InternalServerError,
    Unknown,
    InsufficientStock,
    PaymentFailed,
}

impl FailureCode {
    /// Stable wire name for this code.
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureCode::Unauthorized => "Unauthorized",
            FailureCode::NotFound => "NotFound",
            FailureCode::DuplicateEmail => "DuplicateEmail",
            FailureCode::DbConcurrency => "DbConcurrency",
            FailureCode::ValidationError => "ValidationError",
            FailureCode::InvalidOperation => "InvalidOperation",
            FailureCode::Timeout => "Timeout",
            FailureCode::DbError => "DbError",
            FailureCode::InternalServerError => "InternalServerError",
            FailureCode::Unknown => "Unknown",
            FailureCode::InsufficientStock => "InsufficientStock",
            FailureCode::PaymentFailed => "PaymentFailed",
        }
    }

    /// Map this code to its HTTP status.
    ///
    /// Total and deterministic: the match is exhaustive over the closed
    /// enum, and anything outside the taxonomy is represented as
    /// `Unknown`, which answers 500.
    pub fn status(&self) -> StatusCode {
        match self {
            FailureCode::Unauthorized => StatusCode::UNAUTHORIZED,
            FailureCode::NotFound => StatusCode::NOT_FOUND,
            FailureCode::DuplicateEmail | FailureCode::DbConcurrency => StatusCode::CONFLICT,
            FailureCode::ValidationError
            | FailureCode::InvalidOperation
            | FailureCode::InsufficientStock => StatusCode::BAD_REQUEST,
            FailureCode::Timeout => StatusCode::REQUEST_TIMEOUT,
            FailureCode::PaymentFailed => StatusCode::PAYMENT_REQUIRED,
            FailureCode::DbError
            | FailureCode::InternalServerError
            | FailureCode::Unknown => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl std::fmt::Display for FailureCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed failure value.
///
/// Carries the category code, a client-safe message, the per-request trace
/// id for correlation, and an optional structured payload. The original
/// error (when one exists) stays in `source` for in-process logging.
#[derive(Debug, Error)]
#[error("{code}: {message}")]
pub struct Failure {
    pub code: FailureCode,
    pub message: String,
    pub trace_id: Option<String>,
    pub data: Option<serde_json::Value>,
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl Failure {
    pub fn new(code: FailureCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            trace_id: None,
            data: None,
            source: None,
        }
    }

    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }

    /// Attach a trace id unless one is already set.
    pub fn or_trace_id(mut self, trace_id: &str) -> Self {
        if self.trace_id.is_none() {
            self.trace_id = Some(trace_id.to_string());
        }
        self
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_source(
        mut self,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    // Convenience constructors for the common categories

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(FailureCode::ValidationError, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(FailureCode::NotFound, message)
    }

    pub fn duplicate_email(message: impl Into<String>) -> Self {
        Self::new(FailureCode::DuplicateEmail, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(FailureCode::InternalServerError, message)
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(FailureCode::Unknown, message)
    }
}

/// Convert database errors at the repository boundary.
///
/// Expected conditions never surface as raw `DbErr`: the original error is
/// captured for logs and the client sees only the category message.
impl From<sea_orm::DbErr> for Failure {
    fn from(err: sea_orm::DbErr) -> Self {
        let code = match &err {
            sea_orm::DbErr::RecordNotUpdated => FailureCode::DbConcurrency,
            sea_orm::DbErr::ConnectionAcquire(_) => FailureCode::Timeout,
            _ => FailureCode::DbError,
        };
        tracing::error!(code = %code, error = %err, "database error");
        Failure::new(code, "A database error occurred").with_source(err)
    }
}

/// Failure envelope serialized to clients.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FailureBody {
    pub code: FailureCode,
    pub message: String,
    pub trace_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl IntoResponse for Failure {
    fn into_response(self) -> Response {
        let status = self.code.status();
        let body = FailureBody {
            code: self.code,
            message: self.message,
            trace_id: self.trace_id,
            data: self.data,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias used across all layers.
pub type ApiResult<T> = Result<T, Failure>;

/// Extension trait for Option -> Failure conversion.
pub trait OptionExt<T> {
    fn ok_or_not_found(self) -> ApiResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self) -> ApiResult<T> {
        self.ok_or_else(|| Failure::not_found("Resource not found"))
    }
}
