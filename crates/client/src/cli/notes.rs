//! Lesson note CLI commands.

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use uuid::Uuid;

/// Lesson note commands.
#[derive(Debug, Parser)]
pub struct NotesCommand {
    #[command(subcommand)]
    pub action: NotesAction,
}

/// Available note actions.
#[derive(Debug, Subcommand)]
pub enum NotesAction {
    /// List a student's notes.
    List {
        student_id: Uuid,
    },
    /// Add a note.
    Create {
        student_id: Uuid,
        #[arg(long)]
        content: String,
        /// RFC 3339 date. Defaults to now.
        #[arg(long)]
        date: Option<DateTime<Utc>>,
    },
    /// Get one note.
    Get {
        student_id: Uuid,
        note_id: Uuid,
    },
    /// Edit a note.
    Update {
        student_id: Uuid,
        note_id: Uuid,
        #[arg(long)]
        content: Option<String>,
        #[arg(long)]
        date: Option<DateTime<Utc>>,
    },
    /// Delete a note.
    Delete {
        student_id: Uuid,
        note_id: Uuid,
    },
}
