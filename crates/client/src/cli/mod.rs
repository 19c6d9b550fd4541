//! CLI command definitions.

pub mod data;
pub mod notes;
pub mod settings;
pub mod songs;
pub mod students;

use clap::{Parser, Subcommand, ValueEnum};
use serde::de::DeserializeOwned;

/// CLI client for the lessonbook API.
#[derive(Debug, Parser)]
#[command(name = "lessonbook-client")]
#[command(about = "CLI client for the lessonbook API", long_about = None)]
pub struct Cli {
    /// Server base URL.
    #[arg(long, env = "LESSONBOOK_URL", default_value = crate::client::DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Output format.
    #[arg(long, default_value = "pretty")]
    pub format: OutputFormat,

    /// Suppress non-essential output.
    #[arg(long)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Raw JSON output.
    Json,
    /// Human-readable output.
    #[default]
    Pretty,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Student management.
    Students(students::StudentsCommand),
    /// Lesson notes of a student.
    Notes(notes::NotesCommand),
    /// Song library and teaching records.
    Songs(songs::SongsCommand),
    /// Settings document.
    Settings(settings::SettingsCommand),
    /// Instrument list.
    Instruments(settings::InstrumentsCommand),
    /// Dashboard statistics.
    Stats,
    /// Dump every collection as JSON.
    Export(data::ExportArgs),
    /// Replace collections from an export file.
    Import(data::ImportArgs),
}

/// Parses a CLI value through the type's JSON representation, so enum
/// spellings match the wire format (`sharp`, `minor`, ...).
pub(crate) fn parse_wire<T: DeserializeOwned>(value: &str) -> Result<T, String> {
    serde_json::from_value(serde_json::Value::String(value.to_string()))
        .map_err(|_| format!("invalid value '{value}'"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lessonbook_core::lesson::{KeyLetter, KeyMode, KeyModifier};

    #[test]
    fn test_parse_wire_uses_serde_spelling() {
        assert_eq!(parse_wire::<KeyLetter>("F"), Ok(KeyLetter::F));
        assert_eq!(parse_wire::<KeyModifier>("sharp"), Ok(KeyModifier::Sharp));
        assert_eq!(parse_wire::<KeyMode>("minor"), Ok(KeyMode::Minor));
        assert!(parse_wire::<KeyMode>("Dorian").is_err());
    }

    #[test]
    fn test_cli_parses_student_create() {
        let cli = Cli::try_parse_from([
            "lessonbook-client",
            "--format",
            "json",
            "students",
            "create",
            "--name",
            "Ana",
            "--instrument",
            "Guitar",
            "--grade",
            "1",
            "--day",
            "mon",
            "--time",
            "9:05",
        ])
        .unwrap();

        assert!(matches!(cli.format, OutputFormat::Json));
        assert!(matches!(
            cli.command,
            Commands::Students(students::StudentsCommand {
                action: students::StudentsAction::Create { .. }
            })
        ));
    }
}
