//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{User, Username};

use super::diesel_error_mapping::{StoreFailure, classify_diesel_error, classify_pool_error};
use super::models::{NewUserRow, UserRow};
use super::pool::DbPool;
use super::schema::users;

/// Diesel-backed implementation of the [`UserRepository`] port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn to_port_error(failure: StoreFailure, username: &Username) -> UserPersistenceError {
    match failure {
        StoreFailure::UniqueViolation => {
            UserPersistenceError::duplicate_username(username.as_ref())
        }
        StoreFailure::Connection(message) => UserPersistenceError::connection(message),
        StoreFailure::Query(message) => UserPersistenceError::query(message),
    }
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let username = user.username();
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| to_port_error(classify_pool_error(err), username))?;

        let row = NewUserRow {
            id: *user.id().as_uuid(),
            username: username.as_ref(),
            password_hash: user.password_hash().as_str(),
        };
        diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| to_port_error(classify_diesel_error(err), username))
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| to_port_error(classify_pool_error(err), username))?;

        let row = users::table
            .filter(users::username.eq(username.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| to_port_error(classify_diesel_error(err), username))?;

        row.map(User::try_from).transpose().map_err(|err| {
            warn!(error = %err, "unreadable user row");
            UserPersistenceError::query(err.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(StoreFailure::UniqueViolation, UserPersistenceError::duplicate_username("alice"))]
    #[case(
        StoreFailure::Connection("refused".to_owned()),
        UserPersistenceError::connection("refused")
    )]
    #[case(StoreFailure::Query("database error"), UserPersistenceError::query("database error"))]
    fn maps_store_failures(#[case] failure: StoreFailure, #[case] expected: UserPersistenceError) {
        let username = Username::new("alice").expect("username");
        assert_eq!(to_port_error(failure, &username), expected);
    }
}
