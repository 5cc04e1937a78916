//! Internal Diesel row structs and the JSONB review document.
//!
//! These types never leave the persistence layer. Conversions into domain
//! types live here so the repositories stay thin.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Book, Isbn, PasswordDigest, Review, ReviewText, User, UserId, Username};

use super::schema::{books, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub username: &'a str,
    pub password_hash: &'a str,
}

/// Row struct for reading from the books table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = books)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct BookRow {
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub reviews: serde_json::Value,
}

/// Insertable struct for creating new book records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = books)]
pub(crate) struct NewBookRow<'a> {
    pub isbn: &'a str,
    pub title: &'a str,
    pub author: &'a str,
    pub reviews: serde_json::Value,
}

/// One element of the `books.reviews` JSONB array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct ReviewDocument {
    pub username: String,
    pub review: String,
    pub date: DateTime<Utc>,
}

/// Reasons a stored row cannot become a domain value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub(crate) enum RowConversionError {
    #[error("stored {column} is invalid: {message}")]
    InvalidColumn {
        column: &'static str,
        message: String,
    },
}

impl RowConversionError {
    fn invalid(column: &'static str, message: impl ToString) -> Self {
        Self::InvalidColumn {
            column,
            message: message.to_string(),
        }
    }
}

impl From<&Review> for ReviewDocument {
    fn from(review: &Review) -> Self {
        Self {
            username: review.username().to_string(),
            review: review.text().as_ref().to_owned(),
            date: review.date(),
        }
    }
}

impl TryFrom<ReviewDocument> for Review {
    type Error = RowConversionError;

    fn try_from(doc: ReviewDocument) -> Result<Self, Self::Error> {
        let username =
            Username::new(&doc.username).map_err(|err| RowConversionError::invalid("reviews", err))?;
        let text =
            ReviewText::new(doc.review).map_err(|err| RowConversionError::invalid("reviews", err))?;
        Ok(Review::new(username, text, doc.date))
    }
}

/// Encode a review sequence for the JSONB column, preserving order.
pub(crate) fn reviews_to_json(reviews: &[Review]) -> Result<serde_json::Value, serde_json::Error> {
    let docs: Vec<ReviewDocument> = reviews.iter().map(ReviewDocument::from).collect();
    serde_json::to_value(docs)
}

impl TryFrom<UserRow> for User {
    type Error = RowConversionError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let username =
            Username::new(&row.username).map_err(|err| RowConversionError::invalid("username", err))?;
        Ok(User::new(
            UserId::from(row.id),
            username,
            PasswordDigest::from_phc(row.password_hash),
        ))
    }
}

impl TryFrom<BookRow> for Book {
    type Error = RowConversionError;

    fn try_from(row: BookRow) -> Result<Self, Self::Error> {
        let isbn = Isbn::new(&row.isbn).map_err(|err| RowConversionError::invalid("isbn", err))?;
        let docs: Vec<ReviewDocument> = serde_json::from_value(row.reviews)
            .map_err(|err| RowConversionError::invalid("reviews", err))?;
        let reviews = docs
            .into_iter()
            .map(Review::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Book::from_parts(isbn, row.title, row.author, reviews))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;
    use serde_json::json;

    fn row(reviews: serde_json::Value) -> BookRow {
        BookRow {
            isbn: "111".to_owned(),
            title: "Title A".to_owned(),
            author: "Author A".to_owned(),
            reviews,
        }
    }

    #[rstest]
    fn review_documents_use_api_field_names() {
        let date = Utc
            .with_ymd_and_hms(2026, 3, 1, 9, 0, 0)
            .single()
            .expect("timestamp");
        let review = Review::new(
            Username::new("alice").expect("username"),
            ReviewText::new("Great").expect("text"),
            date,
        );

        let value = reviews_to_json(&[review]).expect("encode");
        assert_eq!(
            value,
            json!([{ "username": "alice", "review": "Great", "date": "2026-03-01T09:00:00Z" }])
        );
    }

    #[rstest]
    fn empty_array_becomes_book_without_reviews() {
        let book = Book::try_from(row(json!([]))).expect("valid row");
        assert!(book.reviews().is_empty());
        assert_eq!(book.isbn().as_ref(), "111");
    }

    #[rstest]
    #[case(json!({ "not": "an array" }))]
    #[case(json!([{ "username": "", "review": "x", "date": "2026-03-01T09:00:00Z" }]))]
    #[case(json!([{ "username": "alice", "review": " ", "date": "2026-03-01T09:00:00Z" }]))]
    fn malformed_reviews_are_rejected(#[case] reviews: serde_json::Value) {
        let err = Book::try_from(row(reviews)).expect_err("malformed");
        assert!(matches!(
            err,
            RowConversionError::InvalidColumn {
                column: "reviews",
                ..
            }
        ));
    }
}
