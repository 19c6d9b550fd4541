//! SQLite storage backend implementation.
//!
//! Each collection is a table of JSON documents keyed by ID, so the stored
//! shape is exactly the wire shape. Access goes through a fixed-size pool of
//! `tokio-rusqlite` connections opened with bounded retry.

mod error;
mod pool;
mod repository;
mod schema;

pub use pool::{ConnectionPool, RetryPolicy};
pub use repository::SqliteRepository;
