//! Diesel table definitions for the PostgreSQL schema.
//!
//! These must match `backend/migrations` exactly; `diesel print-schema`
//! against a migrated database regenerates them.

diesel::table! {
    /// Registered accounts. `username` carries a unique constraint.
    users (id) {
        id -> Uuid,
        username -> Varchar,
        /// Argon2id digest in PHC string format.
        password_hash -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Catalogue entries with their reviews embedded as a JSONB array.
    books (isbn) {
        isbn -> Varchar,
        title -> Varchar,
        author -> Varchar,
        reviews -> Jsonb,
        created_at -> Timestamptz,
    }
}

diesel::allow_tables_to_appear_in_same_query!(users, books);
