//! Port abstraction for the book store, reviews included.
//!
//! Reviews live inside their book. Adapters persist the review sequence as a
//! whole through [`BookRepository::replace_reviews`]; they never merge or
//! reorder it.
use async_trait::async_trait;

use crate::domain::{Book, Isbn, Review};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by book repository adapters.
    pub enum BookPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "book repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "book repository query failed: {message}",
        /// The store already holds a book with this ISBN.
        DuplicateIsbn { isbn: String } => "isbn already catalogued: {isbn}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Insert a new book.
    async fn insert(&self, book: &Book) -> Result<(), BookPersistenceError>;

    async fn find_by_isbn(&self, isbn: &Isbn) -> Result<Option<Book>, BookPersistenceError>;

    /// Every book in the adapter's natural order.
    async fn list_all(&self) -> Result<Vec<Book>, BookPersistenceError>;

    /// Books whose author equals `author`, ignoring case.
    async fn find_by_author(&self, author: &str) -> Result<Vec<Book>, BookPersistenceError>;

    /// Books whose title equals `title`, ignoring case.
    async fn find_by_title(&self, title: &str) -> Result<Vec<Book>, BookPersistenceError>;

    /// Overwrite the review sequence of a book in a single write.
    ///
    /// Returns `false` when no book with `isbn` exists.
    async fn replace_reviews(
        &self,
        isbn: &Isbn,
        reviews: &[Review],
    ) -> Result<bool, BookPersistenceError>;
}
