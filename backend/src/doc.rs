//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every handler under `inbound::http`, the request and
//! response DTOs, and the bearer-token security scheme used by the review
//! mutation routes. Swagger UI serves it in debug builds.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::books_dto::{
    BookEnvelope, BookListEnvelope, BookResponse, NewBookRequest, ReviewListEnvelope,
    ReviewRequest, ReviewResponse,
};
use crate::inbound::http::users::{CredentialsRequest, LoginResponse, RegisterResponse};

/// Adds the `BearerToken` scheme referenced by authenticated routes.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerToken",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Token returned by POST /login, valid for one hour."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Bookstore API",
        description = "Book catalogue with per-user reviews and bearer-token authentication."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::register,
        crate::inbound::http::users::login,
        crate::inbound::http::books::create_book,
        crate::inbound::http::books::list_books,
        crate::inbound::http::books::get_book,
        crate::inbound::http::books::books_by_author,
        crate::inbound::http::books::books_by_title,
        crate::inbound::http::reviews::list_reviews,
        crate::inbound::http::reviews::upsert_review,
        crate::inbound::http::reviews::update_review,
        crate::inbound::http::reviews::delete_review,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        CredentialsRequest,
        RegisterResponse,
        LoginResponse,
        NewBookRequest,
        ReviewRequest,
        ReviewResponse,
        BookResponse,
        BookEnvelope,
        BookListEnvelope,
        ReviewListEnvelope,
    )),
    tags(
        (name = "users", description = "Registration and login"),
        (name = "books", description = "Catalogue lookups and additions"),
        (name = "reviews", description = "One review per user per book"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
