//! Catalogue entries.

use std::fmt;

use super::review::Review;

/// Validation errors returned by [`Book::try_new`] and [`Isbn::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookValidationError {
    EmptyIsbn,
    EmptyTitle,
    EmptyAuthor,
}

impl BookValidationError {
    /// Name of the offending request field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyIsbn => "isbn",
            Self::EmptyTitle => "title",
            Self::EmptyAuthor => "author",
        }
    }
}

impl fmt::Display for BookValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} must not be empty", self.field())
    }
}

impl std::error::Error for BookValidationError {}

/// Opaque book identifier.
///
/// Only trimmed and checked for emptiness; no checksum validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Isbn(String);

impl Isbn {
    pub fn new(value: impl AsRef<str>) -> Result<Self, BookValidationError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(BookValidationError::EmptyIsbn);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for Isbn {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Isbn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A catalogued book and the reviews embedded in it.
///
/// ## Invariants
/// - `isbn`, `title` and `author` are trimmed and non-empty.
/// - `reviews` holds at most one entry per username.
///
/// # Examples
/// ```
/// use bookstore::domain::Book;
///
/// let book = Book::try_new("111", "Title A", "Author A").unwrap();
/// assert!(book.reviews().is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    isbn: Isbn,
    title: String,
    author: String,
    reviews: Vec<Review>,
}

impl Book {
    /// Validate catalogue fields for a new book with no reviews.
    pub fn try_new(isbn: &str, title: &str, author: &str) -> Result<Self, BookValidationError> {
        let isbn = Isbn::new(isbn)?;
        let title = non_blank(title, BookValidationError::EmptyTitle)?;
        let author = non_blank(author, BookValidationError::EmptyAuthor)?;
        Ok(Self {
            isbn,
            title,
            author,
            reviews: Vec::new(),
        })
    }

    /// Rebuild a stored book. Adapters must only hand over review lists
    /// that were produced by [`super::ReviewLedger`].
    pub fn from_parts(isbn: Isbn, title: String, author: String, reviews: Vec<Review>) -> Self {
        Self {
            isbn,
            title,
            author,
            reviews,
        }
    }

    pub fn isbn(&self) -> &Isbn {
        &self.isbn
    }

    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    pub fn author(&self) -> &str {
        self.author.as_str()
    }

    pub fn reviews(&self) -> &[Review] {
        &self.reviews
    }

    /// Replace the embedded review sequence.
    pub fn with_reviews(mut self, reviews: Vec<Review>) -> Self {
        self.reviews = reviews;
        self
    }

    pub fn into_reviews(self) -> Vec<Review> {
        self.reviews
    }

    /// Case-insensitive exact comparison used by author lookups.
    pub fn has_author(&self, query: &str) -> bool {
        eq_ignore_case(&self.author, query)
    }

    /// Case-insensitive exact comparison used by title lookups.
    pub fn has_title(&self, query: &str) -> bool {
        eq_ignore_case(&self.title, query)
    }
}

fn non_blank(value: &str, err: BookValidationError) -> Result<String, BookValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(err);
    }
    Ok(trimmed.to_owned())
}

fn eq_ignore_case(stored: &str, query: &str) -> bool {
    stored.to_lowercase() == query.to_lowercase()
}
