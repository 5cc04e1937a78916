//! Test utilities for the bookstore crate.
//!
//! Shared by unit tests in `src/` and the integration suites in `tests/`.
//! Only compiled for tests or with the `test-support` feature.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;

use crate::domain::{CredentialHasher, SigningSecret, TokenService};
use crate::inbound::http::state::HttpState;
use crate::outbound::memory::{InMemoryBookRepository, InMemoryUserRepository};
use crate::server::assemble_http_state;

/// Signing secret used by test token services.
pub const TEST_SIGNING_SECRET: &[u8] = b"bookstore-test-signing-secret";

/// Instant every test clock starts from unless told otherwise.
pub fn fixture_start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

/// Manually advanced clock.
///
/// # Examples
/// ```
/// use bookstore::test_support::{StepClock, fixture_start};
/// use mockable::Clock;
///
/// let clock = StepClock::at(fixture_start());
/// clock.advance_secs(90);
/// assert_eq!((clock.utc() - fixture_start()).num_seconds(), 90);
/// ```
#[derive(Debug)]
pub struct StepClock(Mutex<DateTime<Utc>>);

impl StepClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    pub fn advance_secs(&self, secs: i64) {
        let mut now = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        *now += TimeDelta::seconds(secs);
    }
}

impl Clock for StepClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// In-memory stores and token service sharing one controllable clock.
pub struct MemoryBackend {
    pub clock: Arc<StepClock>,
    pub tokens: TokenService,
    pub state: HttpState,
}

impl MemoryBackend {
    pub fn new() -> Self {
        let clock = Arc::new(StepClock::at(fixture_start()));
        let as_clock: Arc<dyn Clock> = clock.clone();
        let tokens = TokenService::new(SigningSecret::new(TEST_SIGNING_SECRET), as_clock.clone());
        let state = assemble_http_state(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemoryBookRepository::new()),
            CredentialHasher::low_cost(),
            tokens.clone(),
            as_clock,
        );
        Self {
            clock,
            tokens,
            state,
        }
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}
