//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    BookCatalogue, LoginService, RegistrationService, ReviewsCommand, ReviewsQuery, TokenVerifier,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub registration: Arc<dyn RegistrationService>,
    pub login: Arc<dyn LoginService>,
    pub tokens: Arc<dyn TokenVerifier>,
    pub catalogue: Arc<dyn BookCatalogue>,
    pub reviews_query: Arc<dyn ReviewsQuery>,
    pub reviews: Arc<dyn ReviewsCommand>,
}
