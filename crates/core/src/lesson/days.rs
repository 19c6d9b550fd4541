//! Weekday names.
//!
//! Lesson days are stored as English weekday names. "Today" is resolved
//! through a fixed lookup table rather than a locale-aware formatter so the
//! stored names and the computed name always agree.

use chrono::{Datelike, Local, Weekday};

/// Weekday names indexed by days from Sunday.
pub const DAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Returns the canonical name for a weekday.
pub fn day_name(weekday: Weekday) -> &'static str {
    DAY_NAMES[weekday.num_days_from_sunday() as usize]
}

/// Returns today's weekday name using the server's local time.
pub fn today_name() -> &'static str {
    day_name(Local::now().weekday())
}

/// Maps user input to a canonical weekday name.
///
/// Matching is case-insensitive and accepts the full name or its
/// three-letter abbreviation.
pub fn normalize_day(input: &str) -> Option<&'static str> {
    let input = input.trim();
    DAY_NAMES.iter().copied().find(|name| {
        name.eq_ignore_ascii_case(input) || (input.len() == 3 && name[..3].eq_ignore_ascii_case(input))
    })
}
