//! Review ledger use-cases.
//!
//! Each mutation loads the book, applies one [`ReviewLedger`] rule to its
//! review sequence and writes the whole sequence back with a single
//! [`BookRepository::replace_reviews`] call. Two writers racing on the same
//! book resolve as last-write-wins.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::debug;

use super::catalogue_service::{BOOK_NOT_FOUND, map_book_error};
use super::ports::{BookRepository, ReviewsCommand, ReviewsQuery};
use super::{Book, Error, Identity, Isbn, Review, ReviewLedger, ReviewNotFound, ReviewText};

/// Review ledger service implementing [`ReviewsQuery`] and [`ReviewsCommand`].
#[derive(Clone)]
pub struct ReviewLedgerService<R> {
    books: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> ReviewLedgerService<R> {
    pub fn new(books: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { books, clock }
    }
}

impl<R> ReviewLedgerService<R>
where
    R: BookRepository,
{
    async fn load(&self, isbn: &Isbn) -> Result<Book, Error> {
        self.books
            .find_by_isbn(isbn)
            .await
            .map_err(map_book_error)?
            .ok_or_else(|| Error::not_found(BOOK_NOT_FOUND))
    }

    /// Load the book, let `apply` edit its ledger, then persist the result.
    async fn mutate<F>(&self, isbn: &Isbn, apply: F) -> Result<Book, Error>
    where
        F: FnOnce(&mut ReviewLedger) -> Result<(), Error> + Send,
    {
        let book = self.load(isbn).await?;
        let mut ledger = ReviewLedger::new(book.reviews().to_vec());
        apply(&mut ledger)?;

        let reviews = ledger.into_inner();
        let stored = self
            .books
            .replace_reviews(isbn, &reviews)
            .await
            .map_err(map_book_error)?;
        if !stored {
            // Deleted between the read and the write.
            return Err(Error::not_found(BOOK_NOT_FOUND));
        }
        debug!(isbn = %isbn, reviews = reviews.len(), "review sequence replaced");
        Ok(book.with_reviews(reviews))
    }
}

#[async_trait]
impl<R> ReviewsQuery for ReviewLedgerService<R>
where
    R: BookRepository,
{
    async fn list_reviews(&self, isbn: &Isbn) -> Result<Vec<Review>, Error> {
        Ok(self.load(isbn).await?.into_reviews())
    }
}

#[async_trait]
impl<R> ReviewsCommand for ReviewLedgerService<R>
where
    R: BookRepository,
{
    async fn upsert(
        &self,
        isbn: &Isbn,
        identity: &Identity,
        text: ReviewText,
    ) -> Result<Book, Error> {
        let now = self.clock.utc();
        let username = identity.username().clone();
        self.mutate(isbn, move |ledger| {
            ledger.upsert(username, text, now);
            Ok(())
        })
        .await
    }

    async fn update(
        &self,
        isbn: &Isbn,
        identity: &Identity,
        text: ReviewText,
    ) -> Result<Book, Error> {
        let username = identity.username();
        self.mutate(isbn, move |ledger| {
            ledger
                .update_text(username, text)
                .map_err(|ReviewNotFound| {
                    Error::not_found("No review found for this user to update")
                })
        })
        .await
    }

    async fn delete(&self, isbn: &Isbn, identity: &Identity) -> Result<Book, Error> {
        let username = identity.username();
        self.mutate(isbn, move |ledger| {
            ledger
                .remove(username)
                .map_err(|ReviewNotFound| Error::not_found("Review not found for this user"))
        })
        .await
    }
}
