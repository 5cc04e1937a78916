//! Review handlers.
//!
//! ```text
//! GET    /books/reviews/{isbn}
//! POST   /books/auth/review/{isbn} {"review":"Great"}   (bearer token)
//! PUT    /books/auth/review/{isbn} {"review":"Better"}  (bearer token)
//! DELETE /books/auth/review/{isbn}                      (bearer token)
//! ```
//!
//! The reviewer is always the token's user; the body never names one.

use actix_web::{delete, get, post, put, web};

use crate::domain::{Error, ReviewText};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::BearerIdentity;
use crate::inbound::http::books::isbn_from_path;
use crate::inbound::http::books_dto::{
    BookEnvelope, ReviewListEnvelope, ReviewRequest, ReviewResponse,
};
use crate::inbound::http::state::HttpState;

/// List the reviews attached to a book.
#[utoipa::path(
    get,
    path = "/books/reviews/{isbn}",
    params(("isbn" = String, Path, description = "Book ISBN")),
    responses(
        (status = 200, description = "Reviews in stored order", body = ReviewListEnvelope),
        (status = 404, description = "Book not found", body = Error),
        (status = 500, description = "Book store failure", body = Error)
    ),
    tags = ["reviews"],
    operation_id = "listReviews",
    security([])
)]
#[get("/books/reviews/{isbn}")]
pub async fn list_reviews(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<ReviewListEnvelope>> {
    let isbn = isbn_from_path(path.into_inner())?;
    let reviews = state.reviews_query.list_reviews(&isbn).await?;
    Ok(web::Json(ReviewListEnvelope {
        message: "Reviews fetched".to_owned(),
        reviews: reviews.iter().map(ReviewResponse::from).collect(),
    }))
}

/// Add the caller's review, replacing and moving to the end any earlier one.
#[utoipa::path(
    post,
    path = "/books/auth/review/{isbn}",
    params(("isbn" = String, Path, description = "Book ISBN")),
    request_body = ReviewRequest,
    responses(
        (status = 200, description = "Review stored", body = BookEnvelope),
        (status = 400, description = "Review text missing", body = Error),
        (status = 403, description = "Token missing or invalid", body = Error),
        (status = 404, description = "Book not found", body = Error),
        (status = 500, description = "Book store failure", body = Error)
    ),
    tags = ["reviews"],
    operation_id = "upsertReview",
    security(("BearerToken" = []))
)]
#[post("/books/auth/review/{isbn}")]
pub async fn upsert_review(
    state: web::Data<HttpState>,
    identity: BearerIdentity,
    path: web::Path<String>,
    payload: web::Json<ReviewRequest>,
) -> ApiResult<web::Json<BookEnvelope>> {
    let isbn = isbn_from_path(path.into_inner())?;
    let text = ReviewText::try_from(payload.into_inner())?;
    let book = state
        .reviews
        .upsert(&isbn, identity.identity(), text)
        .await?;
    Ok(web::Json(BookEnvelope::new("Review added successfully", &book)))
}

/// Change the text of the caller's existing review in place.
#[utoipa::path(
    put,
    path = "/books/auth/review/{isbn}",
    params(("isbn" = String, Path, description = "Book ISBN")),
    request_body = ReviewRequest,
    responses(
        (status = 200, description = "Review updated", body = BookEnvelope),
        (status = 400, description = "Review text missing", body = Error),
        (status = 403, description = "Token missing or invalid", body = Error),
        (status = 404, description = "Book or review not found", body = Error),
        (status = 500, description = "Book store failure", body = Error)
    ),
    tags = ["reviews"],
    operation_id = "updateReview",
    security(("BearerToken" = []))
)]
#[put("/books/auth/review/{isbn}")]
pub async fn update_review(
    state: web::Data<HttpState>,
    identity: BearerIdentity,
    path: web::Path<String>,
    payload: web::Json<ReviewRequest>,
) -> ApiResult<web::Json<BookEnvelope>> {
    let isbn = isbn_from_path(path.into_inner())?;
    let text = ReviewText::try_from(payload.into_inner())?;
    let book = state
        .reviews
        .update(&isbn, identity.identity(), text)
        .await?;
    Ok(web::Json(BookEnvelope::new(
        "Review updated successfully",
        &book,
    )))
}

/// Remove the caller's review.
#[utoipa::path(
    delete,
    path = "/books/auth/review/{isbn}",
    params(("isbn" = String, Path, description = "Book ISBN")),
    responses(
        (status = 200, description = "Review removed", body = BookEnvelope),
        (status = 403, description = "Token missing or invalid", body = Error),
        (status = 404, description = "Book or review not found", body = Error),
        (status = 500, description = "Book store failure", body = Error)
    ),
    tags = ["reviews"],
    operation_id = "deleteReview",
    security(("BearerToken" = []))
)]
#[delete("/books/auth/review/{isbn}")]
pub async fn delete_review(
    state: web::Data<HttpState>,
    identity: BearerIdentity,
    path: web::Path<String>,
) -> ApiResult<web::Json<BookEnvelope>> {
    let isbn = isbn_from_path(path.into_inner())?;
    let book = state.reviews.delete(&isbn, identity.identity()).await?;
    Ok(web::Json(BookEnvelope::new(
        "Review deleted successfully",
        &book,
    )))
}
