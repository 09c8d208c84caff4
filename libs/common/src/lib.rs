//! Common library for the Cheriyan Studio showcase
//!
//! Shared by the API service and the API client: the wire models, the
//! response envelope and the form validation rules live here so both ends
//! agree on one contract. With the `server` feature the crate also provides
//! PostgreSQL and Redis connection helpers.

pub mod envelope;
pub mod models;
pub mod validation;

#[cfg(feature = "server")]
pub mod cache;
#[cfg(feature = "server")]
pub mod database;
#[cfg(feature = "server")]
pub mod error;

pub use envelope::{Envelope, ErrorDetail, Rejection};
pub use validation::FieldErrors;
