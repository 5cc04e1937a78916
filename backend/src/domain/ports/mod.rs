//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports are the use-cases inbound adapters call. Driven ports are
//! the repositories outbound adapters implement; each exposes a typed error
//! built with [`define_port_error!`] so adapters map failures into
//! predictable variants.

mod macros;
pub(crate) use macros::define_port_error;

mod book_catalogue;
mod book_repository;
mod login_service;
mod reviews;
mod token_verifier;
mod user_repository;

pub use book_catalogue::BookCatalogue;
#[cfg(test)]
pub use book_repository::MockBookRepository;
pub use book_repository::{BookPersistenceError, BookRepository};
pub use login_service::{LoginService, RegistrationService};
pub use reviews::{ReviewsCommand, ReviewsQuery};
pub use token_verifier::TokenVerifier;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
