//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repository implementations only translate between Diesel rows and domain
//! types. Row structs (`models.rs`) and table definitions (`schema.rs`) stay
//! private to this module, and every database error is mapped to the port's
//! typed error before it leaves.
//!
//! # Example
//!
//! ```ignore
//! use bookstore::outbound::persistence::{DbPool, DieselBookRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/bookstore")).await?;
//! let books = DieselBookRepository::new(pool);
//! ```

mod diesel_book_repository;
mod diesel_error_mapping;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_book_repository::DieselBookRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
