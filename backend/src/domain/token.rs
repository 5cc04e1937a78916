//! Signed, time-limited bearer tokens.
//!
//! Tokens are HS256 JWTs over a process-wide secret. They are stateless:
//! nothing is stored, nothing can be revoked, and a token simply stops
//! working one hour after it was issued.

use std::fmt;
use std::sync::Arc;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use tracing::debug;
use zeroize::Zeroizing;

use super::auth::Identity;
use super::error::Error;
use super::ports::TokenVerifier;
use super::user::{User, UserId, Username};

/// Seconds between issuing a token and its expiry.
pub const TOKEN_LIFETIME_SECS: i64 = 60 * 60;

/// JWT payload carried by every bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub username: String,
    pub id: String,
    pub iat: i64,
    pub exp: i64,
}

/// Failures raised while issuing or verifying tokens.
///
/// Every verification failure collapses into [`TokenError::Invalid`] so
/// callers cannot tell a forged token from an expired one.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("failed to sign token: {message}")]
    Signing { message: String },
    #[error("token is invalid or expired")]
    Invalid,
}

/// HMAC secret shared by the issuer and verifier.
///
/// The bytes are zeroed when the last copy is dropped.
#[derive(Clone)]
pub struct SigningSecret(Arc<Zeroizing<Vec<u8>>>);

impl SigningSecret {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(Arc::new(Zeroizing::new(bytes.into())))
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_slice()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningSecret(..)")
    }
}

/// Issues and verifies bearer tokens.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use bookstore::domain::{
///     CredentialHasher, SigningSecret, TokenService, User, UserId, Username,
/// };
/// use mockable::DefaultClock;
///
/// let tokens = TokenService::new(SigningSecret::new(b"secret".to_vec()), Arc::new(DefaultClock));
/// let user = User::new(
///     UserId::random(),
///     Username::new("alice").unwrap(),
///     CredentialHasher::default().hash("pw1").unwrap(),
/// );
/// let token = tokens.issue(&user).unwrap();
/// let identity = tokens.verify_token(&token).unwrap();
/// assert_eq!(identity.username().as_ref(), "alice");
/// ```
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    clock: Arc<dyn Clock>,
}

impl TokenService {
    pub fn new(secret: SigningSecret, clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against the injected clock instead.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            clock,
        }
    }

    /// Sign a token for `user`, valid for [`TOKEN_LIFETIME_SECS`].
    pub fn issue(&self, user: &User) -> Result<String, TokenError> {
        let iat = self.clock.utc().timestamp();
        let claims = Claims {
            username: user.username().to_string(),
            id: user.id().to_string(),
            iat,
            exp: iat + TOKEN_LIFETIME_SECS,
        };
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding).map_err(
            |err| TokenError::Signing {
                message: err.to_string(),
            },
        )
    }

    /// Check signature, shape and expiry, then return the embedded identity.
    pub fn verify_token(&self, token: &str) -> Result<Identity, TokenError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|err| {
                debug!(error = %err, "bearer token rejected");
                TokenError::Invalid
            })?;
        let claims = data.claims;

        if self.clock.utc().timestamp() >= claims.exp {
            debug!(exp = claims.exp, "bearer token expired");
            return Err(TokenError::Invalid);
        }

        let username = Username::new(&claims.username).map_err(|_| TokenError::Invalid)?;
        let id = UserId::new(&claims.id).map_err(|_| TokenError::Invalid)?;
        Ok(Identity::new(username, id))
    }
}

impl TokenVerifier for TokenService {
    fn verify(&self, token: &str) -> Result<Identity, Error> {
        self.verify_token(token)
            .map_err(|_| Error::forbidden("Invalid token"))
    }
}
