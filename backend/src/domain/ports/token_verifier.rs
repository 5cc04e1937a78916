//! Driving port used by the bearer-token extractor.

use crate::domain::{Error, Identity};

/// Turns a presented bearer token into a trusted caller identity.
///
/// Verification is pure computation, so the port is synchronous.
pub trait TokenVerifier: Send + Sync {
    /// Fails with a forbidden error for any malformed, forged or expired
    /// token.
    fn verify(&self, token: &str) -> Result<Identity, Error>;
}
