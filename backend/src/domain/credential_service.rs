//! Registration and login backed by a [`UserRepository`].
//!
//! Password hashing lives here, in the registration operation itself, and
//! both hashing and verification run on tokio's blocking pool.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tokio::task;
use tracing::{info, warn};
use zeroize::Zeroizing;

use super::password::{CredentialHasher, PasswordDigest, PasswordError};
use super::ports::{LoginService, RegistrationService, UserPersistenceError, UserRepository};
use super::token::TokenService;
use super::{Credentials, Error, User, UserId};

const INVALID_CREDENTIALS: &str = "Invalid username or password";

/// Credential store and login use-cases.
#[derive(Clone)]
pub struct CredentialService<R> {
    users: Arc<R>,
    hasher: CredentialHasher,
    tokens: TokenService,
}

impl<R> CredentialService<R> {
    pub fn new(users: Arc<R>, hasher: CredentialHasher, tokens: TokenService) -> Self {
        Self {
            users,
            hasher,
            tokens,
        }
    }
}

impl<R> CredentialService<R>
where
    R: UserRepository,
{
    fn map_user_error(error: UserPersistenceError) -> Error {
        match error {
            UserPersistenceError::Connection { message } => {
                Error::internal("user store unavailable").with_details(json!({ "message": message }))
            }
            UserPersistenceError::Query { message } => {
                Error::internal("user store error").with_details(json!({ "message": message }))
            }
            UserPersistenceError::DuplicateUsername { .. } => duplicate_username(),
        }
    }

    async fn hash_password(&self, password: &str) -> Result<PasswordDigest, Error> {
        let hasher = self.hasher.clone();
        let password = Zeroizing::new(password.to_owned());
        task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|err| Error::internal(format!("password hashing task failed: {err}")))?
            .map_err(|err| Error::internal(format!("password hashing failed: {err}")))
    }

    async fn password_matches(&self, user: &User, password: &str) -> Result<bool, Error> {
        let hasher = self.hasher.clone();
        let digest = user.password_hash().clone();
        let password = Zeroizing::new(password.to_owned());
        let outcome = task::spawn_blocking(move || hasher.verify(&password, &digest))
            .await
            .map_err(|err| Error::internal(format!("password check task failed: {err}")))?;
        match outcome {
            Ok(matches) => Ok(matches),
            Err(err @ PasswordError::MalformedDigest { .. }) => {
                warn!(username = %user.username(), error = %err, "stored password digest unusable");
                Ok(false)
            }
            Err(err) => Err(Error::internal(format!("password check failed: {err}"))),
        }
    }

    /// Return the user only when the password matches the stored digest.
    pub async fn verify(&self, credentials: &Credentials) -> Result<Option<User>, Error> {
        let Some(user) = self
            .users
            .find_by_username(credentials.username())
            .await
            .map_err(Self::map_user_error)?
        else {
            return Ok(None);
        };

        if self.password_matches(&user, credentials.password()).await? {
            Ok(Some(user))
        } else {
            Ok(None)
        }
    }
}

fn duplicate_username() -> Error {
    Error::invalid_request("User already exists").with_details(json!({
        "field": "username",
        "code": "duplicate_username",
    }))
}

#[async_trait]
impl<R> RegistrationService for CredentialService<R>
where
    R: UserRepository,
{
    async fn register(&self, credentials: &Credentials) -> Result<User, Error> {
        let existing = self
            .users
            .find_by_username(credentials.username())
            .await
            .map_err(Self::map_user_error)?;
        if existing.is_some() {
            return Err(duplicate_username());
        }

        let digest = self.hash_password(credentials.password()).await?;
        let user = User::new(UserId::random(), credentials.username().clone(), digest);
        self.users
            .insert(&user)
            .await
            .map_err(Self::map_user_error)?;
        info!(user_id = %user.id(), "user registered");
        Ok(user)
    }
}

#[async_trait]
impl<R> LoginService for CredentialService<R>
where
    R: UserRepository,
{
    async fn login(&self, credentials: &Credentials) -> Result<String, Error> {
        let user = self
            .verify(credentials)
            .await?
            .ok_or_else(|| Error::unauthorized(INVALID_CREDENTIALS))?;
        self.tokens
            .issue(&user)
            .map_err(|err| Error::internal(format!("token signing failed: {err}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::MockUserRepository;
    use crate::domain::token::SigningSecret;
    use mockable::DefaultClock;
    use rstest::{fixture, rstest};

    #[fixture]
    fn tokens() -> TokenService {
        TokenService::new(SigningSecret::new(b"test-secret".to_vec()), Arc::new(DefaultClock))
    }

    fn service(repo: MockUserRepository, tokens: TokenService) -> CredentialService<MockUserRepository> {
        CredentialService::new(Arc::new(repo), CredentialHasher::low_cost(), tokens)
    }

    fn creds(username: &str, password: &str) -> Credentials {
        Credentials::try_from_parts(username, password).expect("valid credentials")
    }

    fn stored_user(username: &str, password: &str) -> User {
        let digest = CredentialHasher::low_cost().hash(password).expect("hash");
        User::new(
            UserId::random(),
            crate::domain::Username::new(username).expect("username"),
            digest,
        )
    }

    #[rstest]
    #[tokio::test]
    async fn register_hashes_before_insert(tokens: TokenService) {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_username().returning(|_| Ok(None));
        repo.expect_insert()
            .withf(|user| {
                user.username().as_ref() == "alice"
                    && user.password_hash().as_str().starts_with("$argon2id$")
                    && !user.password_hash().as_str().contains("pw1")
            })
            .times(1)
            .returning(|_| Ok(()));

        let user = service(repo, tokens)
            .register(&creds(" alice ", "pw1"))
            .await
            .expect("registration succeeds");
        assert_eq!(user.username().as_ref(), "alice");
    }

    #[rstest]
    #[tokio::test]
    async fn register_rejects_existing_username(tokens: TokenService) {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_username()
            .returning(|_| Ok(Some(stored_user("alice", "pw1"))));
        repo.expect_insert().never();

        let err = service(repo, tokens)
            .register(&creds("alice", "pw2"))
            .await
            .expect_err("duplicate");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(err.message(), "User already exists");
        assert_eq!(
            err.details().and_then(|d| d.get("code")).and_then(|c| c.as_str()),
            Some("duplicate_username")
        );
    }

    #[rstest]
    #[tokio::test]
    async fn register_maps_insert_race_to_duplicate(tokens: TokenService) {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_username().returning(|_| Ok(None));
        repo.expect_insert()
            .returning(|_| Err(UserPersistenceError::duplicate_username("alice")));

        let err = service(repo, tokens)
            .register(&creds("alice", "pw1"))
            .await
            .expect_err("duplicate");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[rstest]
    #[tokio::test]
    async fn store_failure_is_internal(tokens: TokenService) {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_username()
            .returning(|_| Err(UserPersistenceError::connection("refused")));

        let err = service(repo, tokens)
            .register(&creds("alice", "pw1"))
            .await
            .expect_err("store down");
        assert_eq!(err.code(), ErrorCode::InternalError);
    }

    #[rstest]
    #[case("alice", "pw1", true)]
    #[case("alice", "wrong", false)]
    #[tokio::test]
    async fn verify_checks_password(
        tokens: TokenService,
        #[case] username: &str,
        #[case] password: &str,
        #[case] expected: bool,
    ) {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_username()
            .returning(|_| Ok(Some(stored_user("alice", "pw1"))));

        let found = service(repo, tokens)
            .verify(&creds(username, password))
            .await
            .expect("lookup succeeds");
        assert_eq!(found.is_some(), expected);
    }

    #[rstest]
    #[tokio::test]
    async fn malformed_digest_counts_as_mismatch(tokens: TokenService) {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_username().returning(|_| {
            Ok(Some(User::new(
                UserId::random(),
                crate::domain::Username::new("alice").expect("username"),
                PasswordDigest::from_phc("pw1"),
            )))
        });

        let found = service(repo, tokens)
            .verify(&creds("alice", "pw1"))
            .await
            .expect("lookup succeeds");
        assert!(found.is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_user_and_wrong_password_fail_identically(tokens: TokenService) {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_username().returning(|name| {
            if name.as_ref() == "alice" {
                Ok(Some(stored_user("alice", "pw1")))
            } else {
                Ok(None)
            }
        });
        let service = service(repo, tokens);

        let unknown = service.login(&creds("mallory", "pw1")).await.expect_err("unknown");
        let wrong = service.login(&creds("alice", "nope")).await.expect_err("wrong");
        assert_eq!(unknown.code(), ErrorCode::Unauthorized);
        assert_eq!(unknown.code(), wrong.code());
        assert_eq!(unknown.message(), wrong.message());
        assert_eq!(unknown.details(), wrong.details());
    }

    #[rstest]
    #[tokio::test]
    async fn login_issues_verifiable_token(tokens: TokenService) {
        let user = stored_user("alice", "pw1");
        let expected_id = *user.id();
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_username()
            .returning(move |_| Ok(Some(user.clone())));

        let token = service(repo, tokens.clone())
            .login(&creds("alice", "pw1"))
            .await
            .expect("login succeeds");
        let identity = tokens.verify_token(&token).expect("token verifies");
        assert_eq!(identity.id(), &expected_id);
    }
}
