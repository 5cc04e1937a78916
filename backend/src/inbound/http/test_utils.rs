//! Test helpers for inbound HTTP components.

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, test, web};
use rstest::fixture;
use serde_json::Value;

use crate::Trace;
use crate::domain::{PasswordDigest, User, UserId, Username};
use crate::inbound::http::state::HttpState;
use crate::test_support::MemoryBackend;

/// In-memory backend plus helpers for minting tokens.
pub struct TestHarness {
    backend: MemoryBackend,
    state: web::Data<HttpState>,
}

impl TestHarness {
    pub fn new() -> Self {
        let backend = MemoryBackend::new();
        let state = web::Data::new(backend.state.clone());
        Self { backend, state }
    }

    pub fn state(&self) -> web::Data<HttpState> {
        self.state.clone()
    }

    pub fn token_for(&self, username: &str, id: UserId) -> String {
        let user = User::new(
            id,
            Username::new(username).expect("fixture username"),
            PasswordDigest::from_phc("$argon2id$unused"),
        );
        self.backend.tokens.issue(&user).expect("issue fixture token")
    }

    pub fn advance_clock(&self, secs: i64) {
        self.backend.clock.advance_secs(secs);
    }

    /// The full router over this harness' state.
    pub fn app(
        &self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        > + use<>,
    > {
        App::new()
            .app_data(self.state())
            .wrap(Trace)
            .configure(super::configure)
    }
}

#[fixture]
pub fn harness() -> TestHarness {
    TestHarness::new()
}

/// Read a response body as JSON.
pub async fn read_json(response: ServiceResponse) -> Value {
    let body = test::read_body(response).await;
    serde_json::from_slice(&body).expect("JSON response body")
}
