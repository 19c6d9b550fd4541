//! Settings and instrument CLI commands.

use clap::{Parser, Subcommand};

/// Settings document commands.
#[derive(Debug, Parser)]
pub struct SettingsCommand {
    #[command(subcommand)]
    pub action: SettingsAction,
}

/// Available settings actions.
#[derive(Debug, Subcommand)]
pub enum SettingsAction {
    /// Show the settings document.
    Get,
    /// Merge a JSON object into the settings document.
    Set {
        /// JSON object, e.g. `{"theme":"dark"}`.
        json: String,
    },
}

/// Instrument list commands.
#[derive(Debug, Parser)]
pub struct InstrumentsCommand {
    #[command(subcommand)]
    pub action: InstrumentsAction,
}

/// Available instrument actions.
#[derive(Debug, Subcommand)]
pub enum InstrumentsAction {
    /// List instruments.
    List,
    /// Add an instrument.
    Add { name: String },
    /// Rename an instrument.
    Rename { name: String, new_name: String },
    /// Remove an instrument.
    Remove { name: String },
}
