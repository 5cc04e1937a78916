//! Catalogue handlers.
//!
//! ```text
//! POST /books {"isbn":"111","title":"Title A","author":"Author A"}
//! GET  /books
//! GET  /books/{isbn}
//! GET  /books/author/{author}
//! GET  /books/title/{title}
//! ```
//!
//! Author and title lookups match the whole path segment, ignoring case.

use actix_web::{HttpResponse, get, post, web};

use crate::domain::{Book, Error, Isbn};
use crate::inbound::http::ApiResult;
use crate::inbound::http::books_dto::{BookEnvelope, BookListEnvelope, NewBookRequest};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::book_error;

/// Parse the `{isbn}` path segment.
pub(crate) fn isbn_from_path(raw: String) -> Result<Isbn, Error> {
    Isbn::new(raw).map_err(book_error)
}

/// Add a book with an empty review list.
#[utoipa::path(
    post,
    path = "/books",
    request_body = NewBookRequest,
    responses(
        (status = 201, description = "Book added", body = BookEnvelope),
        (status = 400, description = "Missing field or duplicate ISBN", body = Error),
        (status = 500, description = "Book store failure", body = Error)
    ),
    tags = ["books"],
    operation_id = "createBook",
    security([])
)]
#[post("/books")]
pub async fn create_book(
    state: web::Data<HttpState>,
    payload: web::Json<NewBookRequest>,
) -> ApiResult<HttpResponse> {
    let book = Book::try_from(payload.into_inner())?;
    let created = state.catalogue.create(book).await?;
    Ok(HttpResponse::Created().json(BookEnvelope::new("Book added successfully", &created)))
}

/// List every book in store order.
#[utoipa::path(
    get,
    path = "/books",
    responses(
        (status = 200, description = "All books", body = BookListEnvelope),
        (status = 500, description = "Book store failure", body = Error)
    ),
    tags = ["books"],
    operation_id = "listBooks",
    security([])
)]
#[get("/books")]
pub async fn list_books(state: web::Data<HttpState>) -> ApiResult<web::Json<BookListEnvelope>> {
    let books = state.catalogue.list_all().await?;
    Ok(web::Json(BookListEnvelope::new("All books fetched", &books)))
}

/// Fetch one book by ISBN.
#[utoipa::path(
    get,
    path = "/books/{isbn}",
    params(("isbn" = String, Path, description = "Book ISBN")),
    responses(
        (status = 200, description = "Book", body = BookEnvelope),
        (status = 404, description = "Book not found", body = Error),
        (status = 500, description = "Book store failure", body = Error)
    ),
    tags = ["books"],
    operation_id = "getBook",
    security([])
)]
#[get("/books/{isbn}")]
pub async fn get_book(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<BookEnvelope>> {
    let isbn = isbn_from_path(path.into_inner())?;
    let book = state.catalogue.get_by_isbn(&isbn).await?;
    Ok(web::Json(BookEnvelope::new("Book fetched successfully", &book)))
}

/// Books whose author equals the path segment, ignoring case.
#[utoipa::path(
    get,
    path = "/books/author/{author}",
    params(("author" = String, Path, description = "Full author name")),
    responses(
        (status = 200, description = "Matching books", body = BookListEnvelope),
        (status = 404, description = "No books found", body = Error),
        (status = 500, description = "Book store failure", body = Error)
    ),
    tags = ["books"],
    operation_id = "booksByAuthor",
    security([])
)]
#[get("/books/author/{author}")]
pub async fn books_by_author(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<BookListEnvelope>> {
    let books = state.catalogue.find_by_author(&path.into_inner()).await?;
    Ok(web::Json(BookListEnvelope::new("Books by author fetched", &books)))
}

/// Books whose title equals the path segment, ignoring case.
#[utoipa::path(
    get,
    path = "/books/title/{title}",
    params(("title" = String, Path, description = "Full title")),
    responses(
        (status = 200, description = "Matching books", body = BookListEnvelope),
        (status = 404, description = "No books found", body = Error),
        (status = 500, description = "Book store failure", body = Error)
    ),
    tags = ["books"],
    operation_id = "booksByTitle",
    security([])
)]
#[get("/books/title/{title}")]
pub async fn books_by_title(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<BookListEnvelope>> {
    let books = state.catalogue.find_by_title(&path.into_inner()).await?;
    Ok(web::Json(BookListEnvelope::new("Books by title fetched", &books)))
}
