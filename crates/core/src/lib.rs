//! lessonbook_core - domain types, cache and storage contracts for lessonbook.
//!
//! Everything in this crate is free of network and disk I/O. The server and
//! the client crates build on these types.

pub mod cache;
pub mod lesson;
pub mod serde;
pub mod storage;
