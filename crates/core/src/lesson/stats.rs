//! Dashboard statistics.
//!
//! The aggregation is a pure function over the full student list plus the
//! collection sizes, so the handler decides what "today" is.

use std::collections::HashMap;

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use super::days::day_name;
use super::types::Student;

/// How many students `recentStudents` holds.
pub const RECENT_STUDENTS_LIMIT: usize = 5;

/// A grouped count. `_id` is the group key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupCount {
    #[serde(rename = "_id")]
    pub id: String,
    pub count: u64,
}

impl GroupCount {
    pub fn new(id: impl Into<String>, count: u64) -> Self {
        Self {
            id: id.into(),
            count,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsCounts {
    pub students: u64,
    pub songs: u64,
    pub teachings: u64,
    pub students_today: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Distributions {
    pub instruments: Vec<GroupCount>,
    pub days: Vec<GroupCount>,
}

/// Response body of `GET /api/stats`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub today: String,
    pub counts: StatsCounts,
    pub distributions: Distributions,
    pub recent_students: Vec<Student>,
}

/// Counts items per key. Groups are ordered by descending count, then by
/// key ascending.
pub fn group_counts<'a, I>(keys: I) -> Vec<GroupCount>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: HashMap<&str, u64> = HashMap::new();
    for key in keys {
        *counts.entry(key).or_default() += 1;
    }

    let mut groups: Vec<GroupCount> = counts
        .into_iter()
        .map(|(id, count)| GroupCount::new(id, count))
        .collect();
    groups.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.id.cmp(&b.id)));
    groups
}

/// Computes the dashboard statistics for `today`.
///
/// A student counts toward `studentsToday` when its `day` equals today's
/// name, ignoring case and surrounding whitespace.
pub fn compute_dashboard_stats(
    students: &[Student],
    song_count: u64,
    teaching_count: u64,
    today: Weekday,
) -> DashboardStats {
    let today = day_name(today);

    let students_today = students
        .iter()
        .filter(|s| s.day.trim().eq_ignore_ascii_case(today))
        .count() as u64;

    let mut recent: Vec<&Student> = students.iter().collect();
    recent.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    let recent_students = recent
        .into_iter()
        .take(RECENT_STUDENTS_LIMIT)
        .cloned()
        .collect();

    DashboardStats {
        today: today.to_string(),
        counts: StatsCounts {
            students: students.len() as u64,
            songs: song_count,
            teachings: teaching_count,
            students_today,
        },
        distributions: Distributions {
            instruments: group_counts(students.iter().map(|s| s.instrument.as_str())),
            days: group_counts(students.iter().map(|s| s.day.as_str())),
        },
        recent_students,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn student(name: &str, instrument: &str, day: &str) -> Student {
        Student::new(name, instrument, "1", day, "10:00")
    }

    #[test]
    fn test_students_today_and_day_distribution() {
        let students = vec![
            student("A", "Guitar", "Monday"),
            student("B", "Piano", "Monday"),
            student("C", "Guitar", "Tuesday"),
        ];

        let stats = compute_dashboard_stats(&students, 2, 5, Weekday::Mon);

        assert_eq!(stats.today, "Monday");
        assert_eq!(stats.counts.students_today, 2);
        assert_eq!(
            stats.distributions.days,
            vec![GroupCount::new("Monday", 2), GroupCount::new("Tuesday", 1)]
        );
        assert_eq!(
            stats.distributions.instruments,
            vec![GroupCount::new("Guitar", 2), GroupCount::new("Piano", 1)]
        );
        assert_eq!(
            stats.counts,
            StatsCounts {
                students: 3,
                songs: 2,
                teachings: 5,
                students_today: 2,
            }
        );
    }

    #[test]
    fn test_today_match_ignores_case_and_whitespace() {
        let students = vec![student("A", "Guitar", " friday ")];
        let stats = compute_dashboard_stats(&students, 0, 0, Weekday::Fri);
        assert_eq!(stats.counts.students_today, 1);
    }

    #[test]
    fn test_group_ties_break_by_key() {
        let groups = group_counts(["Violin", "Cello", "Violin", "Cello", "Bass"]);
        assert_eq!(
            groups,
            vec![
                GroupCount::new("Cello", 2),
                GroupCount::new("Violin", 2),
                GroupCount::new("Bass", 1),
            ]
        );
    }

    #[test]
    fn test_recent_students_limited_and_ordered() {
        let now = Utc::now();
        let students: Vec<Student> = (0..7)
            .map(|i| {
                let mut s = student(&format!("S{i}"), "Piano", "Monday");
                s.updated_at = now - Duration::minutes(i);
                s
            })
            .collect();

        let stats = compute_dashboard_stats(&students, 0, 0, Weekday::Sun);

        let names: Vec<_> = stats.recent_students.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["S0", "S1", "S2", "S3", "S4"]);
        assert_eq!(stats.counts.students_today, 0);
    }

    #[test]
    fn test_empty_store() {
        let stats = compute_dashboard_stats(&[], 0, 0, Weekday::Wed);
        assert!(stats.distributions.instruments.is_empty());
        assert!(stats.recent_students.is_empty());
    }

    #[test]
    fn test_serialized_shape() {
        let stats = compute_dashboard_stats(&[student("A", "Guitar", "Monday")], 1, 0, Weekday::Mon);
        let json = serde_json::to_value(&stats).unwrap();

        assert_eq!(json["counts"]["studentsToday"], 1);
        assert_eq!(json["distributions"]["days"][0]["_id"], "Monday");
        assert_eq!(json["recentStudents"].as_array().unwrap().len(), 1);
    }
}
