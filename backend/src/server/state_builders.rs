//! Builders wiring repositories and domain services into [`HttpState`].

use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use tracing::warn;

use crate::domain::ports::{BookRepository, UserRepository};
use crate::domain::{
    BookCatalogueService, CredentialHasher, CredentialService, ReviewLedgerService, TokenService,
};
use crate::inbound::http::state::HttpState;
use crate::outbound::memory::{InMemoryBookRepository, InMemoryUserRepository};
use crate::outbound::persistence::{DieselBookRepository, DieselUserRepository};

use super::ServerConfig;

/// Wire the domain services over one user store and one book store.
pub fn assemble_http_state<U, B>(
    users: Arc<U>,
    books: Arc<B>,
    hasher: CredentialHasher,
    tokens: TokenService,
    clock: Arc<dyn Clock>,
) -> HttpState
where
    U: UserRepository + 'static,
    B: BookRepository + 'static,
{
    let credentials = Arc::new(CredentialService::new(users, hasher, tokens.clone()));
    let ledger = Arc::new(ReviewLedgerService::new(Arc::clone(&books), clock));
    HttpState {
        registration: credentials.clone(),
        login: credentials,
        tokens: Arc::new(tokens),
        catalogue: Arc::new(BookCatalogueService::new(books)),
        reviews_query: ledger.clone(),
        reviews: ledger,
    }
}

/// Diesel repositories when a pool is configured, in-memory ones otherwise.
pub(crate) fn build_http_state(config: &ServerConfig) -> HttpState {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let tokens = TokenService::new(config.signing_secret.clone(), Arc::clone(&clock));
    let hasher = CredentialHasher::default();

    match &config.db_pool {
        Some(pool) => assemble_http_state(
            Arc::new(DieselUserRepository::new(pool.clone())),
            Arc::new(DieselBookRepository::new(pool.clone())),
            hasher,
            tokens,
            clock,
        ),
        None => {
            warn!("no database configured; users and books are kept in memory");
            assemble_http_state(
                Arc::new(InMemoryUserRepository::new()),
                Arc::new(InMemoryBookRepository::new()),
                hasher,
                tokens,
                clock,
            )
        }
    }
}
