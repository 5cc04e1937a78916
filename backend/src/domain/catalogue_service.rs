//! Book catalogue use-cases.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use super::ports::{BookCatalogue, BookPersistenceError, BookRepository};
use super::{Book, Error, Isbn};

pub(crate) const BOOK_NOT_FOUND: &str = "Book not found";
const NO_BOOKS_FOUND: &str = "No books found";

/// Maps book store failures onto domain errors.
///
/// Shared with the review ledger, which persists through the same port.
pub(crate) fn map_book_error(error: BookPersistenceError) -> Error {
    match error {
        BookPersistenceError::Connection { message } => {
            Error::internal("book store unavailable").with_details(json!({ "message": message }))
        }
        BookPersistenceError::Query { message } => {
            Error::internal("book store error").with_details(json!({ "message": message }))
        }
        BookPersistenceError::DuplicateIsbn { isbn } => duplicate_isbn(&isbn),
    }
}

fn duplicate_isbn(isbn: &str) -> Error {
    Error::invalid_request("Book with this ISBN already exists").with_details(json!({
        "field": "isbn",
        "isbn": isbn,
        "code": "duplicate_isbn",
    }))
}

fn non_empty(books: Vec<Book>) -> Result<Vec<Book>, Error> {
    if books.is_empty() {
        return Err(Error::not_found(NO_BOOKS_FOUND));
    }
    Ok(books)
}

/// Catalogue service implementing [`BookCatalogue`].
#[derive(Clone)]
pub struct BookCatalogueService<R> {
    books: Arc<R>,
}

impl<R> BookCatalogueService<R> {
    pub fn new(books: Arc<R>) -> Self {
        Self { books }
    }
}

#[async_trait]
impl<R> BookCatalogue for BookCatalogueService<R>
where
    R: BookRepository,
{
    async fn create(&self, book: Book) -> Result<Book, Error> {
        let existing = self
            .books
            .find_by_isbn(book.isbn())
            .await
            .map_err(map_book_error)?;
        if existing.is_some() {
            return Err(duplicate_isbn(book.isbn().as_ref()));
        }

        // A new book never carries reviews over from the caller.
        let book = book.with_reviews(Vec::new());
        self.books.insert(&book).await.map_err(map_book_error)?;
        info!(isbn = %book.isbn(), "book catalogued");
        Ok(book)
    }

    async fn get_by_isbn(&self, isbn: &Isbn) -> Result<Book, Error> {
        self.books
            .find_by_isbn(isbn)
            .await
            .map_err(map_book_error)?
            .ok_or_else(|| Error::not_found(BOOK_NOT_FOUND))
    }

    async fn list_all(&self) -> Result<Vec<Book>, Error> {
        self.books.list_all().await.map_err(map_book_error)
    }

    async fn find_by_author(&self, author: &str) -> Result<Vec<Book>, Error> {
        let books = self
            .books
            .find_by_author(author)
            .await
            .map_err(map_book_error)?;
        non_empty(books)
    }

    async fn find_by_title(&self, title: &str) -> Result<Vec<Book>, Error> {
        let books = self
            .books
            .find_by_title(title)
            .await
            .map_err(map_book_error)?;
        non_empty(books)
    }
}
