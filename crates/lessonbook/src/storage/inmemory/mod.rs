//! In-memory storage backend.
//!
//! Stores every collection in HashMaps wrapped in `Arc<RwLock<_>>`. Nothing
//! is persisted. This is the default backend and the one the tests use.

mod repository;

pub use repository::InMemoryRepository;
