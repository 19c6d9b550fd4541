//! Storage backend implementations.
//!
//! This module provides concrete implementations of the repository traits
//! defined in `lessonbook_core::storage`. The backend is selected at compile
//! time via feature flags.
//!
//! # Feature Flags
//!
//! - `inmemory` (default): HashMap-backed storage, lost on restart
//! - `sqlite`: SQLite file holding one JSON document per record, accessed
//!   through a fixed-size pool of `tokio-rusqlite` connections
//!
//! These features are mutually exclusive.
//!
//! Build with SQLite:
//! ```bash
//! cargo build -p lessonbook --no-default-features --features sqlite
//! ```

#[cfg(all(feature = "sqlite", feature = "inmemory"))]
compile_error!(
    "Features 'sqlite' and 'inmemory' are mutually exclusive. \
    Enable only one storage backend at a time."
);

#[cfg(not(any(feature = "sqlite", feature = "inmemory")))]
compile_error!(
    "No storage backend selected. Enable 'inmemory' or 'sqlite' feature. \
    Example: cargo build -p lessonbook --no-default-features --features sqlite"
);

pub mod cached;

#[cfg(any(test, feature = "inmemory"))]
pub mod inmemory;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(any(test, feature = "inmemory"))]
pub use inmemory::InMemoryRepository;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteRepository;
