//! One-way password hashing.
//!
//! Passwords are hashed with Argon2id and stored as PHC strings, so the
//! algorithm, cost parameters and salt travel with each digest. Verification
//! reads the parameters back out of the stored digest.

use std::fmt;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};

/// Errors raised while hashing or checking a password.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordError {
    #[error("failed to hash password: {message}")]
    Hash { message: String },
    #[error("stored password digest is malformed: {message}")]
    MalformedDigest { message: String },
}

/// Stored PHC-format password digest.
///
/// `Debug` never prints the digest itself.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordDigest(String);

impl PasswordDigest {
    /// Wrap a digest loaded from storage. No validation happens here; a
    /// malformed digest surfaces when it is verified.
    pub fn from_phc(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordDigest(..)")
    }
}

/// Argon2id hasher with fixed cost parameters.
///
/// # Examples
/// ```
/// use bookstore::domain::CredentialHasher;
///
/// let hasher = CredentialHasher::default();
/// let digest = hasher.hash("pw1").expect("hashing succeeds");
/// assert!(hasher.verify("pw1", &digest).expect("digest parses"));
/// assert!(!hasher.verify("pw2", &digest).expect("digest parses"));
/// ```
#[derive(Debug, Clone)]
pub struct CredentialHasher {
    params: Params,
}

impl Default for CredentialHasher {
    fn default() -> Self {
        Self {
            params: Params::default(),
        }
    }
}

impl CredentialHasher {
    /// Minimum-cost parameters so test suites can hash many passwords.
    #[cfg(any(test, feature = "test-support"))]
    pub fn low_cost() -> Self {
        let params = Params::new(
            Params::MIN_M_COST,
            Params::MIN_T_COST,
            Params::MIN_P_COST,
            None,
        )
        .unwrap_or_default();
        Self { params }
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash `plaintext` with a freshly generated salt.
    ///
    /// CPU heavy; async callers should run it on a blocking thread.
    pub fn hash(&self, plaintext: &str) -> Result<PasswordDigest, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|err| PasswordError::Hash {
                message: err.to_string(),
            })?;
        Ok(PasswordDigest(hash.to_string()))
    }

    /// Check `plaintext` against a stored digest.
    ///
    /// Returns `Ok(false)` on mismatch and an error only when the digest
    /// cannot be parsed.
    pub fn verify(&self, plaintext: &str, digest: &PasswordDigest) -> Result<bool, PasswordError> {
        let parsed =
            PasswordHash::new(digest.as_str()).map_err(|err| PasswordError::MalformedDigest {
                message: err.to_string(),
            })?;
        Ok(self
            .argon2()
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok())
    }
}
