//! PostgreSQL-backed `BookRepository` implementation using Diesel ORM.
//!
//! Reviews are stored as a JSONB array on the book row, so replacing them is
//! a single `UPDATE` of one column.

use async_trait::async_trait;
use diesel::dsl::{AsSelect, SqlTypeOf};
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::sql_types::Text;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{BookPersistenceError, BookRepository};
use crate::domain::{Book, Isbn, Review};

use super::diesel_error_mapping::{StoreFailure, classify_diesel_error, classify_pool_error};
use super::models::{BookRow, NewBookRow, reviews_to_json};
use super::pool::DbPool;
use super::schema::books;

diesel::define_sql_function! {
    /// PostgreSQL `lower(text)`.
    fn lower(x: Text) -> Text;
}

/// Diesel-backed implementation of the [`BookRepository`] port.
#[derive(Clone)]
pub struct DieselBookRepository {
    pool: DbPool,
}

impl DieselBookRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn to_port_error(failure: StoreFailure, isbn: Option<&Isbn>) -> BookPersistenceError {
    match (failure, isbn) {
        (StoreFailure::UniqueViolation, Some(isbn)) => {
            BookPersistenceError::duplicate_isbn(isbn.as_ref())
        }
        (StoreFailure::UniqueViolation, None) => {
            BookPersistenceError::query("unexpected unique violation")
        }
        (StoreFailure::Connection(message), _) => BookPersistenceError::connection(message),
        (StoreFailure::Query(message), _) => BookPersistenceError::query(message),
    }
}

fn rows_to_books(rows: Vec<BookRow>) -> Result<Vec<Book>, BookPersistenceError> {
    rows.into_iter()
        .map(|row| {
            let isbn = row.isbn.clone();
            Book::try_from(row).map_err(|err| {
                warn!(%isbn, error = %err, "unreadable book row");
                BookPersistenceError::query(err.to_string())
            })
        })
        .collect()
}

fn encode_reviews(reviews: &[Review]) -> Result<serde_json::Value, BookPersistenceError> {
    reviews_to_json(reviews)
        .map_err(|err| BookPersistenceError::query(format!("failed to encode reviews: {err}")))
}

/// Which books a listing query returns.
enum Listing<'a> {
    All,
    Author(&'a str),
    Title(&'a str),
}

type ListingQuery<'a> = books::BoxedQuery<'a, Pg, SqlTypeOf<AsSelect<BookRow, Pg>>>;

/// Creation-ordered select; both sides of a name match are lowered by the
/// database so the comparison follows its collation.
fn listing_query(listing: Listing<'_>) -> ListingQuery<'_> {
    let query = books::table
        .select(BookRow::as_select())
        .order((books::created_at.asc(), books::isbn.asc()))
        .into_boxed();
    match listing {
        Listing::All => query,
        Listing::Author(author) => query.filter(lower(books::author).eq(lower(author))),
        Listing::Title(title) => query.filter(lower(books::title).eq(lower(title))),
    }
}

impl DieselBookRepository {
    /// Run a creation-ordered listing, optionally filtered.
    async fn load(&self, listing: Listing<'_>) -> Result<Vec<Book>, BookPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| to_port_error(classify_pool_error(err), None))?;

        let query = listing_query(listing);
        let rows = query
            .load(&mut conn)
            .await
            .map_err(|err| to_port_error(classify_diesel_error(err), None))?;
        rows_to_books(rows)
    }
}

#[async_trait]
impl BookRepository for DieselBookRepository {
    async fn insert(&self, book: &Book) -> Result<(), BookPersistenceError> {
        let isbn = book.isbn();
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| to_port_error(classify_pool_error(err), Some(isbn)))?;

        let row = NewBookRow {
            isbn: isbn.as_ref(),
            title: book.title(),
            author: book.author(),
            reviews: encode_reviews(book.reviews())?,
        };
        diesel::insert_into(books::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| to_port_error(classify_diesel_error(err), Some(isbn)))
    }

    async fn find_by_isbn(&self, isbn: &Isbn) -> Result<Option<Book>, BookPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| to_port_error(classify_pool_error(err), Some(isbn)))?;

        let row = books::table
            .filter(books::isbn.eq(isbn.as_ref()))
            .select(BookRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| to_port_error(classify_diesel_error(err), Some(isbn)))?;

        Ok(rows_to_books(row.into_iter().collect())?.pop())
    }

    async fn list_all(&self) -> Result<Vec<Book>, BookPersistenceError> {
        self.load(Listing::All).await
    }

    async fn find_by_author(&self, author: &str) -> Result<Vec<Book>, BookPersistenceError> {
        self.load(Listing::Author(author)).await
    }

    async fn find_by_title(&self, title: &str) -> Result<Vec<Book>, BookPersistenceError> {
        self.load(Listing::Title(title)).await
    }

    async fn replace_reviews(
        &self,
        isbn: &Isbn,
        reviews: &[Review],
    ) -> Result<bool, BookPersistenceError> {
        let encoded = encode_reviews(reviews)?;
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| to_port_error(classify_pool_error(err), Some(isbn)))?;

        let updated = diesel::update(books::table.filter(books::isbn.eq(isbn.as_ref())))
            .set(books::reviews.eq(encoded))
            .execute(&mut conn)
            .await
            .map_err(|err| to_port_error(classify_diesel_error(err), Some(isbn)))?;
        Ok(updated == 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn unique_violation_with_isbn_is_duplicate() {
        let isbn = Isbn::new("111").expect("isbn");
        assert_eq!(
            to_port_error(StoreFailure::UniqueViolation, Some(&isbn)),
            BookPersistenceError::duplicate_isbn("111")
        );
    }

    #[rstest]
    fn unique_violation_without_isbn_is_query_error() {
        assert!(matches!(
            to_port_error(StoreFailure::UniqueViolation, None),
            BookPersistenceError::Query { .. }
        ));
    }

    #[rstest]
    fn connection_failures_keep_message() {
        assert_eq!(
            to_port_error(StoreFailure::Connection("refused".to_owned()), None),
            BookPersistenceError::connection("refused")
        );
    }

    #[rstest]
    #[case(Listing::Author("Ada Lovelace"), "lower(\"books\".\"author\") = lower($1)")]
    #[case(Listing::Title("Notes"), "lower(\"books\".\"title\") = lower($1)")]
    fn name_matches_lower_both_sides_in_sql(
        #[case] listing: Listing<'static>,
        #[case] clause: &str,
    ) {
        let sql = diesel::debug_query::<Pg, _>(&listing_query(listing)).to_string();
        assert!(sql.contains(clause), "unexpected SQL: {sql}");
    }

    #[rstest]
    fn full_listing_has_no_filter() {
        let sql = diesel::debug_query::<Pg, _>(&listing_query(Listing::All)).to_string();
        assert!(!sql.contains("WHERE"), "unexpected SQL: {sql}");
    }
}
