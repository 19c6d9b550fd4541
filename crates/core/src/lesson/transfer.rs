//! Export and import bundles.
//!
//! An export holds every collection. An import may hold any subset: each
//! collection present replaces the stored one, absent ones are untouched.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::ValidationErrors;
use super::operations::{prepare_student, validate_song};
use super::types::{Settings, Song, SongTeaching, Student};

/// Format version written by this build.
pub const EXPORT_VERSION: u32 = 1;

/// Response body of `GET /api/export`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportBundle {
    pub version: u32,
    pub exported_at: DateTime<Utc>,
    pub students: Vec<Student>,
    pub songs: Vec<Song>,
    pub song_teachings: Vec<SongTeaching>,
    pub settings: Settings,
}

impl ExportBundle {
    /// Builds an export. Collections are sorted (students by name, songs by
    /// title, teachings by date, ties by id) so two exports of the same data
    /// are identical apart from `exportedAt`.
    pub fn new(
        mut students: Vec<Student>,
        mut songs: Vec<Song>,
        mut song_teachings: Vec<SongTeaching>,
        settings: Settings,
    ) -> Self {
        students.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.id.cmp(&b.id))
        });
        songs.sort_by(|a, b| {
            a.title
                .to_lowercase()
                .cmp(&b.title.to_lowercase())
                .then_with(|| a.id.cmp(&b.id))
        });
        song_teachings.sort_by(|a, b| {
            a.taught_date
                .cmp(&b.taught_date)
                .then_with(|| a.id.cmp(&b.id))
        });

        Self {
            version: EXPORT_VERSION,
            exported_at: Utc::now(),
            students,
            songs,
            song_teachings,
            settings,
        }
    }
}

/// Request body of `POST /api/import`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportBundle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub students: Option<Vec<Student>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub songs: Option<Vec<Song>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub song_teachings: Option<Vec<SongTeaching>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Settings>,
}

impl From<ExportBundle> for ImportBundle {
    fn from(export: ExportBundle) -> Self {
        Self {
            version: Some(export.version),
            students: Some(export.students),
            songs: Some(export.songs),
            song_teachings: Some(export.song_teachings),
            settings: Some(export.settings),
        }
    }
}

/// Number of records written per collection. Collections that were not
/// part of the import are omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub students: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub songs: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub song_teachings: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<usize>,
}

/// Validates an import bundle, normalizing students in place.
///
/// Stops at the first invalid record; its errors are prefixed with the
/// record's position, e.g. `students[3].time`. An id repeated within a
/// collection is reported at its second occurrence, e.g. `students[1].id`.
pub fn validate_import(bundle: &mut ImportBundle) -> Result<(), ValidationErrors> {
    if let Some(version) = bundle.version {
        if version > EXPORT_VERSION {
            return Err(ValidationErrors::single(
                "version",
                format!("unsupported export version {version}"),
            ));
        }
    }

    for (index, student) in bundle.students.iter_mut().flatten().enumerate() {
        if let Err(errors) = prepare_student(student) {
            let mut prefixed = ValidationErrors::new();
            prefixed.merge_prefixed(&format!("students[{index}]"), errors);
            return Err(prefixed);
        }
    }

    for (index, song) in bundle.songs.iter().flatten().enumerate() {
        if let Err(errors) = validate_song(song) {
            let mut prefixed = ValidationErrors::new();
            prefixed.merge_prefixed(&format!("songs[{index}]"), errors);
            return Err(prefixed);
        }
    }

    if let Some(students) = &bundle.students {
        unique_ids("students", students.iter().map(|s| s.id))?;
    }
    if let Some(songs) = &bundle.songs {
        unique_ids("songs", songs.iter().map(|s| s.id))?;
    }
    if let Some(teachings) = &bundle.song_teachings {
        unique_ids("songTeachings", teachings.iter().map(|t| t.id))?;
    }

    Ok(())
}

fn unique_ids(
    collection: &str,
    ids: impl Iterator<Item = Uuid>,
) -> Result<(), ValidationErrors> {
    let mut seen = HashSet::new();
    for (index, id) in ids.enumerate() {
        if !seen.insert(id) {
            return Err(ValidationErrors::single(
                format!("{collection}[{index}].id"),
                format!("duplicate id {id}"),
            ));
        }
    }
    Ok(())
}
