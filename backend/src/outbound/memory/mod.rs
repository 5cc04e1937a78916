//! In-process repositories.
//!
//! Used when no database URL is configured and by handler tests. State lives
//! behind a `std::sync::Mutex` held only for the duration of each call, so
//! every operation is atomic with respect to the others.

mod book_repository;
mod user_repository;

pub use book_repository::InMemoryBookRepository;
pub use user_repository::InMemoryUserRepository;

use std::sync::{Mutex, MutexGuard};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // Every mutation is a single push or assignment, so poisoned state is
    // still consistent.
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
