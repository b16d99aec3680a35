//! # Course Catalog Database Crate
//!
//! This crate is the only place that knows about SQL. It owns the connection
//! pool and exposes the catalog lookup behind the `CatalogStore` trait.
//!
//! ## Public API
//!
//! - `connect`: Builds the lazily-connecting `PgPool` from `DbSettings`.
//! - `CatalogStore`: The read-only lookup the web server depends on.
//! - `DbRepository`: The Postgres implementation of `CatalogStore`.
//! - `DbError`: The error type returned from this crate.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
pub mod repository;

// Re-export the key components to create a clean, public-facing API.
pub use connection::{connect, connect_options};
pub use error::DbError;
pub use repository::{CatalogStore, DbRepository, like_contains_pattern};
