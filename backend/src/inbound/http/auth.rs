//! Bearer-token extraction for authenticated review routes.
//!
//! Handlers that take a [`BearerIdentity`] only run once the
//! `Authorization` header carried a token the configured
//! [`TokenVerifier`](crate::domain::ports::TokenVerifier) accepted.

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::{Ready, ready};
use tracing::debug;

use crate::domain::{Error, Identity};
use crate::inbound::http::state::HttpState;

pub(crate) const TOKEN_MISSING: &str = "Token missing";
pub(crate) const INVALID_TOKEN: &str = "Invalid token";

/// Identity proven by a verified bearer token.
#[derive(Debug, Clone)]
pub struct BearerIdentity(Identity);

impl BearerIdentity {
    pub fn identity(&self) -> &Identity {
        &self.0
    }

    pub fn into_inner(self) -> Identity {
        self.0
    }
}

/// Split `<scheme> <token>`; anything after the first space is the token.
fn bearer_token(req: &HttpRequest) -> Result<&str, Error> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .ok_or_else(|| Error::forbidden(TOKEN_MISSING))?;
    let value = header
        .to_str()
        .map_err(|_| Error::forbidden(INVALID_TOKEN))?;
    let Some((scheme, token)) = value.trim().split_once(' ') else {
        return Err(Error::forbidden(TOKEN_MISSING));
    };
    let token = token.trim();
    if token.is_empty() {
        return Err(Error::forbidden(TOKEN_MISSING));
    }
    if !scheme.eq_ignore_ascii_case("bearer") {
        debug!(%scheme, "unsupported authorization scheme");
        return Err(Error::forbidden(INVALID_TOKEN));
    }
    Ok(token)
}

fn authenticate(req: &HttpRequest) -> Result<BearerIdentity, Error> {
    let state = req
        .app_data::<web::Data<HttpState>>()
        .ok_or_else(|| Error::internal("HTTP state is not configured"))?;
    let token = bearer_token(req)?;
    state.tokens.verify(token).map(BearerIdentity)
}

impl FromRequest for BearerIdentity {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}
