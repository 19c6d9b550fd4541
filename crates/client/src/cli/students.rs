//! Student CLI commands.

use clap::{Parser, Subcommand};
use uuid::Uuid;

/// Student management commands.
#[derive(Debug, Parser)]
pub struct StudentsCommand {
    #[command(subcommand)]
    pub action: StudentsAction,
}

/// Available student actions.
#[derive(Debug, Subcommand)]
pub enum StudentsAction {
    /// List all students.
    List,
    /// Add a student.
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        instrument: String,
        #[arg(long)]
        grade: String,
        /// Lesson day. Abbreviations like `mon` are accepted.
        #[arg(long)]
        day: String,
        /// Lesson time, `HH:MM`.
        #[arg(long)]
        time: String,
        #[arg(long)]
        contact: Option<String>,
        #[arg(long)]
        current_material: Option<String>,
    },
    /// Get student by ID.
    Get {
        id: Uuid,
    },
    /// Update a student. Omitted fields are left unchanged.
    Update {
        id: Uuid,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        instrument: Option<String>,
        #[arg(long)]
        grade: Option<String>,
        #[arg(long)]
        day: Option<String>,
        #[arg(long)]
        time: Option<String>,
        #[arg(long)]
        contact: Option<String>,
        #[arg(long)]
        current_material: Option<String>,
        #[arg(long)]
        attendance: Option<u32>,
    },
    /// Delete a student and their teaching records.
    Delete {
        id: Uuid,
    },
}
