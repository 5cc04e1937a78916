//! Authentication primitives: submitted credentials and verified identities.
//!
//! Inbound adapters turn raw payload strings into [`Credentials`] before
//! calling a port, and only the token verifier produces an [`Identity`].

use std::fmt;

use zeroize::Zeroizing;

use super::user::{UserId, Username};

/// Returned when a register or login payload is missing a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialsValidationError {
    /// Username was missing or blank once trimmed.
    EmptyUsername,
    /// Password was missing or empty.
    EmptyPassword,
}

impl fmt::Display for CredentialsValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for CredentialsValidationError {}

/// Username and plaintext password as submitted by a client.
///
/// ## Invariants
/// - `username` is trimmed and non-empty.
/// - `password` is non-empty; whitespace inside it is significant.
/// - The password buffer is zeroed on drop.
///
/// # Examples
/// ```
/// use bookstore::domain::Credentials;
///
/// let creds = Credentials::try_from_parts(" alice ", "pw1").unwrap();
/// assert_eq!(creds.username().as_ref(), "alice");
/// assert_eq!(creds.password(), "pw1");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: Username,
    password: Zeroizing<String>,
}

impl Credentials {
    pub fn try_from_parts(
        username: &str,
        password: &str,
    ) -> Result<Self, CredentialsValidationError> {
        let username =
            Username::new(username).map_err(|_| CredentialsValidationError::EmptyUsername)?;
        if password.is_empty() {
            return Err(CredentialsValidationError::EmptyPassword);
        }
        Ok(Self {
            username,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Caller identity recovered from a verified bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    username: Username,
    id: UserId,
}

impl Identity {
    pub fn new(username: Username, id: UserId) -> Self {
        Self { username, id }
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    pub fn id(&self) -> &UserId {
        &self.id
    }
}
