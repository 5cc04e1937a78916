//! Inbound adapters translating external requests into domain service calls.
//!
//! Only the HTTP transport exists today; framework types stay inside
//! [`http`].

pub mod http;
