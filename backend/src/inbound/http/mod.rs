//! HTTP inbound adapter exposing the bookstore REST endpoints.

pub mod auth;
pub mod books;
pub mod books_dto;
pub mod error;
pub mod health;
pub mod reviews;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

pub use error::ApiResult;

use actix_web::web;

/// Register every catalogue, review and account route on `cfg`.
///
/// Callers supply `web::Data<HttpState>` as app data.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(validation::json_config())
        .service(users::register)
        .service(users::login)
        .service(books::create_book)
        .service(books::list_books)
        .service(books::books_by_author)
        .service(books::books_by_title)
        .service(reviews::list_reviews)
        .service(reviews::upsert_review)
        .service(reviews::update_review)
        .service(reviews::delete_review)
        .service(books::get_book);
}
