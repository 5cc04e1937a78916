//! Shared Diesel and pool error classification for the repositories.
//!
//! Each repository turns a [`StoreFailure`] into its own port error; the
//! database's raw message is logged at `debug` and never forwarded.

use tracing::debug;

use super::pool::PoolError;

/// Repository-agnostic view of a failed database call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum StoreFailure {
    /// A unique constraint rejected the write.
    UniqueViolation,
    /// The connection was lost or could not be obtained.
    Connection(String),
    /// Any other query failure.
    Query(&'static str),
}

/// Every pool error is a connection failure.
pub(crate) fn classify_pool_error(error: PoolError) -> StoreFailure {
    debug!(message = error.message(), "connection pool failure");
    StoreFailure::Connection(error.message().to_owned())
}

/// Classify a Diesel error and emit debug context.
pub(crate) fn classify_diesel_error(error: diesel::result::Error) -> StoreFailure {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(
                ?kind,
                message = info.message(),
                constraint = info.constraint_name(),
                "diesel operation failed"
            );
        }
        _ => debug!(error = %error, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            StoreFailure::UniqueViolation
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            StoreFailure::Connection("database connection error".to_owned())
        }
        DieselError::NotFound => StoreFailure::Query("record not found"),
        DieselError::QueryBuilderError(_) => StoreFailure::Query("database query error"),
        DieselError::DeserializationError(_) => StoreFailure::Query("row deserialisation error"),
        _ => StoreFailure::Query("database error"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};
    use rstest::rstest;

    struct Info(&'static str);

    impl DatabaseErrorInformation for Info {
        fn message(&self) -> &str {
            self.0
        }
        fn details(&self) -> Option<&str> {
            None
        }
        fn hint(&self) -> Option<&str> {
            None
        }
        fn table_name(&self) -> Option<&str> {
            None
        }
        fn column_name(&self) -> Option<&str> {
            None
        }
        fn constraint_name(&self) -> Option<&str> {
            Some("books_pkey")
        }
        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    fn database_error(kind: DatabaseErrorKind) -> DieselError {
        DieselError::DatabaseError(kind, Box::new(Info("boom")))
    }

    #[rstest]
    #[case(database_error(DatabaseErrorKind::UniqueViolation), StoreFailure::UniqueViolation)]
    #[case(
        database_error(DatabaseErrorKind::ClosedConnection),
        StoreFailure::Connection("database connection error".to_owned())
    )]
    #[case(
        database_error(DatabaseErrorKind::ForeignKeyViolation),
        StoreFailure::Query("database error")
    )]
    #[case(DieselError::NotFound, StoreFailure::Query("record not found"))]
    fn classifies_diesel_errors(#[case] error: DieselError, #[case] expected: StoreFailure) {
        assert_eq!(classify_diesel_error(error), expected);
    }

    #[rstest]
    fn pool_errors_are_connection_failures() {
        assert_eq!(
            classify_pool_error(PoolError::unavailable("timed out")),
            StoreFailure::Connection("timed out".to_owned())
        );
    }
}
