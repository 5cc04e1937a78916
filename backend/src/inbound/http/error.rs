//! `ResponseError` for the domain [`Error`].
//!
//! Status codes follow the error code. Store failures are logged here and
//! reach the client with their message but without details.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use tracing::error;

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

/// Result returned by every handler.
pub type ApiResult<T> = Result<T, Error>;

const fn http_status(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        http_status(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self.code() {
            ErrorCode::InternalError => {
                error!(message = %self.message(), details = ?self.details(), "store failure");
                self.clone().without_details()
            }
            _ => self.clone(),
        };

        let mut response = HttpResponse::build(self.status_code());
        if let Some(trace_id) = self.trace_id() {
            response.insert_header((TRACE_ID_HEADER, trace_id));
        }
        response.json(body)
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "framework error surfaced as internal error");
        Self::internal("Internal server error")
    }
}
