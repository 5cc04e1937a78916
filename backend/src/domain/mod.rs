//! Domain primitives, aggregates and services.
//!
//! Purpose: define the strongly typed entities shared by the HTTP and
//! persistence adapters and the services implementing the driving ports.
//! Nothing here knows about actix, Diesel or the environment.
//!
//! Public surface:
//! - `Error` / `ErrorCode`: transport-agnostic failure payload.
//! - `User`, `Username`, `UserId`, `Credentials`, `Identity`: accounts.
//! - `Book`, `Isbn`, `Review`, `ReviewText`, `ReviewLedger`: catalogue.
//! - `CredentialService`, `TokenService`, `BookCatalogueService`,
//!   `ReviewLedgerService`: use-case implementations.

pub mod auth;
pub mod book;
pub mod catalogue_service;
pub mod credential_service;
pub mod error;
pub mod password;
pub mod ports;
pub mod review;
pub mod review_service;
pub mod token;
pub mod trace_id;
pub mod user;

pub use self::auth::{Credentials, CredentialsValidationError, Identity};
pub use self::book::{Book, BookValidationError, Isbn};
pub use self::catalogue_service::BookCatalogueService;
pub use self::credential_service::CredentialService;
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::password::{CredentialHasher, PasswordDigest, PasswordError};
pub use self::review::{EmptyReviewText, Review, ReviewLedger, ReviewNotFound, ReviewText};
pub use self::review_service::ReviewLedgerService;
pub use self::token::{Claims, SigningSecret, TOKEN_LIFETIME_SECS, TokenError, TokenService};
pub use self::trace_id::TraceId;
pub use self::user::{User, UserId, UserValidationError, Username};
