//! Failure payload shared by the services and every adapter.
//!
//! Services choose an [`ErrorCode`] and a client-facing message; the HTTP
//! adapter owns the mapping to status codes and the JSON envelope.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use super::TraceId;

/// Response header carrying the request trace identifier.
pub const TRACE_ID_HEADER: &str = "trace-id";

/// Failure category, serialised in `snake_case`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Missing or blank input, or a username/ISBN that is already taken.
    InvalidRequest,
    /// Login with an unknown username or a wrong password.
    Unauthorized,
    /// Missing, malformed or expired bearer token.
    Forbidden,
    /// No such book or review, or an empty author/title lookup.
    NotFound,
    /// The store failed.
    InternalError,
}

impl ErrorCode {
    /// Message used when a caller supplies a blank one.
    pub const fn fallback_message(self) -> &'static str {
        match self {
            Self::InvalidRequest => "Invalid request",
            Self::Unauthorized => "Unauthorized",
            Self::Forbidden => "Forbidden",
            Self::NotFound => "Not found",
            Self::InternalError => "Internal server error",
        }
    }
}

/// Error envelope: `{code, message, traceId?, details?}`.
///
/// `message` is never blank. `trace_id` is captured from the task-local
/// [`TraceId`] at construction, so errors built while serving a request are
/// correlated without the caller threading the id through.
///
/// # Examples
/// ```
/// use bookstore::domain::{Error, ErrorCode};
///
/// let err = Error::not_found("Book not found");
/// assert_eq!(err.code(), ErrorCode::NotFound);
/// assert_eq!(err.message(), "Book not found");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[serde(try_from = "WireError", into = "WireError")]
pub struct Error {
    #[schema(example = "not_found")]
    code: ErrorCode,
    #[schema(example = "Book not found")]
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

/// Reasons a serialised envelope is refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ErrorValidationError {
    #[error("error message must not be empty")]
    EmptyMessage,
    #[error("trace identifier must not be empty")]
    EmptyTraceId,
}

impl Error {
    /// Build an error, substituting [`ErrorCode::fallback_message`] for a
    /// blank message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        let mut message = message.into();
        if message.trim().is_empty() {
            code.fallback_message().clone_into(&mut message);
        }
        Self {
            code,
            message,
            trace_id: TraceId::current().map(|id| id.to_string()),
            details: None,
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Forbidden, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }

    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Replace the captured trace identifier.
    pub fn with_trace_id(mut self, id: TraceId) -> Self {
        self.trace_id = Some(id.to_string());
        self
    }

    /// Attach structured details, e.g. the offending field.
    ///
    /// # Examples
    /// ```
    /// use bookstore::domain::Error;
    /// use serde_json::json;
    ///
    /// let err = Error::invalid_request("Book with this ISBN already exists")
    ///     .with_details(json!({ "code": "duplicate_isbn" }));
    /// assert_eq!(err.details(), Some(&json!({ "code": "duplicate_isbn" })));
    /// ```
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Strip details; used before internal errors leave the process.
    pub fn without_details(mut self) -> Self {
        self.details = None;
        self
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for Error {}

/// Serde shape of [`Error`]; incoming payloads are validated on the way in.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct WireError {
    code: ErrorCode,
    message: String,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "trace_id")]
    trace_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl From<Error> for WireError {
    fn from(error: Error) -> Self {
        let Error {
            code,
            message,
            trace_id,
            details,
        } = error;
        Self {
            code,
            message,
            trace_id,
            details,
        }
    }
}

impl TryFrom<WireError> for Error {
    type Error = ErrorValidationError;

    fn try_from(wire: WireError) -> Result<Self, Self::Error> {
        if wire.message.trim().is_empty() {
            return Err(ErrorValidationError::EmptyMessage);
        }
        if wire.trace_id.as_deref().is_some_and(|id| id.trim().is_empty()) {
            return Err(ErrorValidationError::EmptyTraceId);
        }
        // The payload's own trace id wins over whatever is in scope.
        Ok(Self {
            code: wire.code,
            message: wire.message,
            trace_id: wire.trace_id,
            details: wire.details,
        })
    }
}
