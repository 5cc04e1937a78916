//! Book and review DTOs shared by the catalogue and review handlers.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Book, Error, Review, ReviewText};
use crate::inbound::http::validation::{
    REVIEW, REVIEW_TEXT_REQUIRED, book_error, missing_field_error,
};

/// Body of `POST /books`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct NewBookRequest {
    #[schema(example = "9780141439518")]
    pub isbn: Option<String>,
    #[schema(example = "Pride and Prejudice")]
    pub title: Option<String>,
    #[schema(example = "Jane Austen")]
    pub author: Option<String>,
}

impl TryFrom<NewBookRequest> for Book {
    type Error = Error;

    fn try_from(value: NewBookRequest) -> Result<Self, Self::Error> {
        Book::try_new(
            value.isbn.as_deref().unwrap_or_default(),
            value.title.as_deref().unwrap_or_default(),
            value.author.as_deref().unwrap_or_default(),
        )
        .map_err(book_error)
    }
}

/// Body of the review `POST` and `PUT` routes.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct ReviewRequest {
    #[schema(example = "Great")]
    pub review: Option<String>,
}

impl TryFrom<ReviewRequest> for ReviewText {
    type Error = Error;

    fn try_from(value: ReviewRequest) -> Result<Self, Self::Error> {
        ReviewText::new(value.review.unwrap_or_default())
            .map_err(|_| missing_field_error(REVIEW_TEXT_REQUIRED, REVIEW))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ReviewResponse {
    #[schema(example = "alice")]
    pub username: String,
    #[schema(example = "Great")]
    pub review: String,
    /// RFC 3339 timestamp of when the review was written.
    #[schema(example = "2026-03-01T12:00:00+00:00")]
    pub date: String,
}

impl From<&Review> for ReviewResponse {
    fn from(review: &Review) -> Self {
        Self {
            username: review.username().to_string(),
            review: review.text().as_ref().to_owned(),
            date: review.date().to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BookResponse {
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub reviews: Vec<ReviewResponse>,
}

impl From<&Book> for BookResponse {
    fn from(book: &Book) -> Self {
        Self {
            isbn: book.isbn().to_string(),
            title: book.title().to_owned(),
            author: book.author().to_owned(),
            reviews: book.reviews().iter().map(ReviewResponse::from).collect(),
        }
    }
}

/// `{message, data}` envelope around one book.
#[derive(Debug, Serialize, ToSchema)]
pub struct BookEnvelope {
    pub message: String,
    pub data: BookResponse,
}

impl BookEnvelope {
    pub(crate) fn new(message: &str, book: &Book) -> Self {
        Self {
            message: message.to_owned(),
            data: book.into(),
        }
    }
}

/// `{message, data}` envelope around a list of books.
#[derive(Debug, Serialize, ToSchema)]
pub struct BookListEnvelope {
    pub message: String,
    pub data: Vec<BookResponse>,
}

impl BookListEnvelope {
    pub(crate) fn new(message: &str, books: &[Book]) -> Self {
        Self {
            message: message.to_owned(),
            data: books.iter().map(BookResponse::from).collect(),
        }
    }
}

/// `{message, reviews}` envelope returned by the review listing.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReviewListEnvelope {
    pub message: String,
    pub reviews: Vec<ReviewResponse>,
}
