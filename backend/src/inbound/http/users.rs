//! Account handlers.
//!
//! ```text
//! POST /register {"username":"alice","password":"pw1"}
//! POST /login {"username":"alice","password":"pw1"}
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Credentials, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::credentials_error;

/// Body of `POST /register` and `POST /login`.
///
/// Both fields are optional at the wire level so a missing field is reported
/// with the same message as a blank one.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct CredentialsRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl TryFrom<CredentialsRequest> for Credentials {
    type Error = Error;

    fn try_from(value: CredentialsRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(
            value.username.as_deref().unwrap_or_default(),
            value.password.as_deref().unwrap_or_default(),
        )
        .map_err(credentials_error)
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RegisterResponse {
    #[schema(example = "User registered successfully")]
    pub message: String,
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub user_id: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    #[schema(example = "Login successful")]
    pub message: String,
    pub token: String,
}

/// Create an account.
#[utoipa::path(
    post,
    path = "/register",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Account created", body = RegisterResponse),
        (status = 400, description = "Missing field or username taken", body = Error),
        (status = 500, description = "User store failure", body = Error)
    ),
    tags = ["users"],
    operation_id = "register",
    security([])
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<CredentialsRequest>,
) -> ApiResult<HttpResponse> {
    let credentials = Credentials::try_from(payload.into_inner())?;
    let user = state.registration.register(&credentials).await?;
    Ok(HttpResponse::Ok().json(RegisterResponse {
        message: "User registered successfully".to_owned(),
        user_id: user.id().to_string(),
    }))
}

/// Exchange credentials for a bearer token valid for one hour.
#[utoipa::path(
    post,
    path = "/login",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Token issued", body = LoginResponse),
        (status = 400, description = "Missing field", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 500, description = "User store failure", body = Error)
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<CredentialsRequest>,
) -> ApiResult<HttpResponse> {
    let credentials = Credentials::try_from(payload.into_inner())?;
    let token = state.login.login(&credentials).await?;
    Ok(HttpResponse::Ok().json(LoginResponse {
        message: "Login successful".to_owned(),
        token,
    }))
}
