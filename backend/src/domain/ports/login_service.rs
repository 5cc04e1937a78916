//! Driving ports for registration and login.
//!
//! Inbound adapters call these to create accounts and exchange credentials
//! for a bearer token without knowing how users are stored or how tokens
//! are signed. Handler tests substitute doubles instead of wiring storage.

use async_trait::async_trait;

use crate::domain::{Credentials, Error, User};

/// Account creation use-case.
#[async_trait]
pub trait RegistrationService: Send + Sync {
    /// Hash the password and persist a new user.
    ///
    /// Fails with an invalid-request error when the username is taken.
    async fn register(&self, credentials: &Credentials) -> Result<User, Error>;
}

/// Credential exchange use-case.
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Verify credentials and return a signed bearer token.
    ///
    /// Unknown usernames and wrong passwords fail identically.
    async fn login(&self, credentials: &Credentials) -> Result<String, Error>;
}
