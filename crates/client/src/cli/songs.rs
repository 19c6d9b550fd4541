//! Song CLI commands.

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use uuid::Uuid;

use lessonbook_core::lesson::{KeyLetter, KeyMode, KeyModifier};

use super::parse_wire;

/// Song library commands.
#[derive(Debug, Parser)]
pub struct SongsCommand {
    #[command(subcommand)]
    pub action: SongsAction,
}

/// Optional song attributes shared by create and update.
#[derive(Debug, Args)]
pub struct SongFields {
    /// Key letter, `A` to `G`.
    #[arg(long, value_parser = parse_wire::<KeyLetter>)]
    pub key_letter: Option<KeyLetter>,
    /// `natural`, `sharp` or `flat`.
    #[arg(long, value_parser = parse_wire::<KeyModifier>)]
    pub key_modifier: Option<KeyModifier>,
    /// `major` or `minor`.
    #[arg(long, value_parser = parse_wire::<KeyMode>)]
    pub key_mode: Option<KeyMode>,
    /// Tempo. `0` clears it on update.
    #[arg(long)]
    pub bpm: Option<u16>,
    #[arg(long)]
    pub youtube_url: Option<String>,
}

/// Available song actions.
#[derive(Debug, Subcommand)]
pub enum SongsAction {
    /// List all songs.
    List,
    /// Add a song.
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        artist: String,
        #[command(flatten)]
        fields: SongFields,
    },
    /// Get song by ID.
    Get {
        id: Uuid,
    },
    /// Update a song.
    Update {
        id: Uuid,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        artist: Option<String>,
        #[command(flatten)]
        fields: SongFields,
    },
    /// Delete a song and its teaching records.
    Delete {
        id: Uuid,
    },
    /// Record that a song was taught.
    Teach {
        song_id: Uuid,
        #[arg(long)]
        student_id: Uuid,
        /// RFC 3339 date. Defaults to now.
        #[arg(long)]
        date: Option<DateTime<Utc>>,
        #[arg(long)]
        lesson_id: Option<String>,
    },
    /// List teaching records.
    Teachings {
        #[arg(long)]
        student_id: Option<Uuid>,
        #[arg(long)]
        song_id: Option<Uuid>,
    },
}
