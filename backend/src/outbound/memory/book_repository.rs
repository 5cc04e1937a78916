//! Insertion-ordered [`BookRepository`].

use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::ports::{BookPersistenceError, BookRepository};
use crate::domain::{Book, Isbn, Review};

use super::lock;

/// Books kept in insertion order, which is also the listing order.
#[derive(Debug, Default)]
pub struct InMemoryBookRepository {
    books: Mutex<Vec<Book>>,
}

impl InMemoryBookRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn matching(&self, keep: impl Fn(&Book) -> bool) -> Vec<Book> {
        lock(&self.books)
            .iter()
            .filter(|book| keep(book))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl BookRepository for InMemoryBookRepository {
    async fn insert(&self, book: &Book) -> Result<(), BookPersistenceError> {
        let mut books = lock(&self.books);
        if books.iter().any(|b| b.isbn() == book.isbn()) {
            return Err(BookPersistenceError::duplicate_isbn(book.isbn().as_ref()));
        }
        books.push(book.clone());
        Ok(())
    }

    async fn find_by_isbn(&self, isbn: &Isbn) -> Result<Option<Book>, BookPersistenceError> {
        Ok(lock(&self.books).iter().find(|b| b.isbn() == isbn).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Book>, BookPersistenceError> {
        Ok(lock(&self.books).clone())
    }

    async fn find_by_author(&self, author: &str) -> Result<Vec<Book>, BookPersistenceError> {
        Ok(self.matching(|b| b.has_author(author)))
    }

    async fn find_by_title(&self, title: &str) -> Result<Vec<Book>, BookPersistenceError> {
        Ok(self.matching(|b| b.has_title(title)))
    }

    async fn replace_reviews(
        &self,
        isbn: &Isbn,
        reviews: &[Review],
    ) -> Result<bool, BookPersistenceError> {
        let mut books = lock(&self.books);
        let Some(slot) = books.iter_mut().find(|b| b.isbn() == isbn) else {
            return Ok(false);
        };
        *slot = slot.clone().with_reviews(reviews.to_vec());
        Ok(true)
    }
}
