mod error;
mod keys;
mod memory;
mod serialization;
mod traits;

pub use error::{CacheError, Result};
pub use keys::{
    settings_key, song_key, song_pattern, songs_key, student_key, student_pattern, students_key,
    SETTINGS_KEY, SONGS_KEY, STUDENTS_KEY,
};
pub use memory::MemoryCache;
pub use serialization::{deserialize, serialize};
pub use traits::{Cache, CacheExt};
