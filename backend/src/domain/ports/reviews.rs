//! Driving ports for reading and mutating a book's reviews.

use async_trait::async_trait;

use crate::domain::{Book, Error, Identity, Isbn, Review, ReviewText};

#[async_trait]
pub trait ReviewsQuery: Send + Sync {
    /// Reviews of one book in stored order.
    async fn list_reviews(&self, isbn: &Isbn) -> Result<Vec<Review>, Error>;
}

/// Mutations keyed by (book, caller). Each returns the updated book.
#[async_trait]
pub trait ReviewsCommand: Send + Sync {
    /// Create or replace the caller's review.
    async fn upsert(&self, isbn: &Isbn, identity: &Identity, text: ReviewText)
    -> Result<Book, Error>;

    /// Change the text of the caller's existing review.
    async fn update(&self, isbn: &Isbn, identity: &Identity, text: ReviewText)
    -> Result<Book, Error>;

    /// Remove the caller's review.
    async fn delete(&self, isbn: &Isbn, identity: &Identity) -> Result<Book, Error>;
}
