//! lessonbook_client - HTTP client, state stores and CLI for the lessonbook API.

pub mod cli;
pub mod client;
pub mod error;
pub mod output;
pub mod store;

pub use client::LessonbookClient;
pub use error::{ClientError, Result};
