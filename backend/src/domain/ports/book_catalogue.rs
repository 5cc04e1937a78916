//! Driving port for catalogue reads and book creation.

use async_trait::async_trait;

use crate::domain::{Book, Error, Isbn};

#[async_trait]
pub trait BookCatalogue: Send + Sync {
    /// Add a validated book. Fails when the ISBN is already catalogued.
    async fn create(&self, book: Book) -> Result<Book, Error>;

    /// Fails with not-found when no book has this ISBN.
    async fn get_by_isbn(&self, isbn: &Isbn) -> Result<Book, Error>;

    async fn list_all(&self) -> Result<Vec<Book>, Error>;

    /// Exact, case-insensitive author match. An empty result is not-found.
    async fn find_by_author(&self, author: &str) -> Result<Vec<Book>, Error>;

    /// Exact, case-insensitive title match. An empty result is not-found.
    async fn find_by_title(&self, title: &str) -> Result<Vec<Book>, Error>;
}
