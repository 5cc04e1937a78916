//! Request validation helpers shared by HTTP handlers.
//!
//! Request bodies deserialize into DTOs with optional fields so a missing
//! field and a blank one produce the same `400` envelope instead of a serde
//! error.

use actix_web::error::JsonPayloadError;
use actix_web::{HttpRequest, web};
use serde_json::json;
use tracing::debug;

use crate::domain::{BookValidationError, CredentialsValidationError, Error};

/// Name of a request field reported in validation details.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub(crate) const fn as_str(self) -> &'static str {
        self.0
    }
}

pub(crate) const USERNAME: FieldName = FieldName::new("username");
pub(crate) const PASSWORD: FieldName = FieldName::new("password");
pub(crate) const REVIEW: FieldName = FieldName::new("review");

pub(crate) const CREDENTIALS_REQUIRED: &str = "Username and password required";
pub(crate) const BOOK_FIELDS_REQUIRED: &str = "ISBN, title, and author are required";
pub(crate) const REVIEW_TEXT_REQUIRED: &str = "Review text required";

pub(crate) fn missing_field_error(message: &str, field: FieldName) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "code": "missing_field",
    }))
}

pub(crate) fn credentials_error(err: CredentialsValidationError) -> Error {
    let field = match err {
        CredentialsValidationError::EmptyUsername => USERNAME,
        CredentialsValidationError::EmptyPassword => PASSWORD,
    };
    missing_field_error(CREDENTIALS_REQUIRED, field)
}

pub(crate) fn book_error(err: BookValidationError) -> Error {
    missing_field_error(BOOK_FIELDS_REQUIRED, FieldName::new(err.field()))
}

/// JSON extractor settings returning the shared error envelope on bad bodies.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(json_error_handler)
}

fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    debug!(error = %err, "rejected request body");
    let code = match err {
        JsonPayloadError::ContentType => "unsupported_content_type",
        JsonPayloadError::OverflowKnownLength { .. } | JsonPayloadError::Overflow { .. } => {
            "payload_too_large"
        }
        _ => "invalid_json",
    };
    Error::invalid_request("Invalid JSON payload")
        .with_details(json!({ "code": code }))
        .into()
}
