mod days;
mod error;
mod operations;
mod requests;
mod stats;
mod transfer;
mod types;

pub use days::{day_name, normalize_day, today_name, DAY_NAMES};
pub use error::{FieldError, InstrumentError, ValidationErrors};
pub use operations::{
    add_instrument, prepare_student, remove_instrument, rename_instrument, sort_songs_by_title,
    sort_students_by_name, validate_note, validate_song,
};
pub use requests::{
    CreateNoteRequest, CreateSongRequest, CreateStudentRequest, InstrumentRequest,
    RecordTeachingRequest, TeachingRecorded, UpdateNoteRequest, UpdateSettingsRequest,
    UpdateSongRequest, UpdateStudentRequest,
};
pub use stats::{
    compute_dashboard_stats, group_counts, DashboardStats, Distributions, GroupCount, StatsCounts,
    RECENT_STUDENTS_LIMIT,
};
pub use transfer::{validate_import, ExportBundle, ImportBundle, ImportSummary, EXPORT_VERSION};
pub use types::{
    KeyLetter, KeyMode, KeyModifier, Note, Settings, Song, SongTeaching, Student,
};
