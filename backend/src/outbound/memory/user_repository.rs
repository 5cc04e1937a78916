//! Map-backed [`UserRepository`].

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{User, Username};

use super::lock;

#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<Username, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut users = lock(&self.users);
        if users.contains_key(user.username()) {
            return Err(UserPersistenceError::duplicate_username(
                user.username().as_ref(),
            ));
        }
        users.insert(user.username().clone(), user.clone());
        Ok(())
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserPersistenceError> {
        Ok(lock(&self.users).get(username).cloned())
    }
}
