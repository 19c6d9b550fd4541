//! Serde helper functions for request and document deserialization.
//!
//! Form-style payloads send empty strings for unset optional fields, and
//! note dates arrive in more than one format. These helpers normalize both
//! at the data-model boundary.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Deserializer};

/// Deserialize an optional string, treating empty strings as None.
pub fn deserialize_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    Ok(s.filter(|s| !s.trim().is_empty()))
}

/// Parses a lesson date in any of the accepted formats.
///
/// Accepted: RFC 3339 datetimes, `YYYY-MM-DDTHH:MM:SS` without offset (read
/// as UTC), `YYYY-MM-DD`, and legacy `DD/MM/YYYY`. Date-only values become
/// midnight UTC.
pub fn parse_lesson_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(value, "%d/%m/%Y"))
        .ok()
        .map(|date| date.and_time(NaiveTime::MIN).and_utc())
}

/// Deserialize a lesson date, accepting every format [`parse_lesson_date`] does.
pub fn deserialize_lesson_date<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_lesson_date(&s)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid date: {s}")))
}

/// Deserialize an optional lesson date, treating empty strings as None.
pub fn deserialize_optional_lesson_date<'de, D>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if !s.trim().is_empty() => parse_lesson_date(&s)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid date: {s}"))),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[derive(Debug, Deserialize, PartialEq)]
    struct TestStruct {
        #[serde(default, deserialize_with = "deserialize_optional_string")]
        string_field: Option<String>,
        #[serde(default, deserialize_with = "deserialize_optional_lesson_date")]
        date_field: Option<DateTime<Utc>>,
    }

    #[derive(Debug, Deserialize)]
    struct Required {
        #[serde(deserialize_with = "deserialize_lesson_date")]
        date: DateTime<Utc>,
    }

    #[test]
    fn test_deserialize_optional_string_empty() {
        let result: TestStruct = serde_json::from_str(r#"{"string_field": ""}"#).unwrap();
        assert_eq!(result.string_field, None);
    }

    #[test]
    fn test_deserialize_optional_string_whitespace() {
        let result: TestStruct = serde_json::from_str(r#"{"string_field": "   "}"#).unwrap();
        assert_eq!(result.string_field, None);
    }

    #[test]
    fn test_deserialize_optional_string_value() {
        let result: TestStruct = serde_json::from_str(r#"{"string_field": "hello"}"#).unwrap();
        assert_eq!(result.string_field, Some("hello".to_string()));
    }

    #[test]
    fn test_deserialize_optional_string_missing() {
        let result: TestStruct = serde_json::from_str("{}").unwrap();
        assert_eq!(result.string_field, None);
        assert_eq!(result.date_field, None);
    }

    #[test]
    fn test_parse_rfc3339() {
        assert_eq!(
            parse_lesson_date("2024-03-05T14:30:00.000Z"),
            Some(Utc.with_ymd_and_hms(2024, 3, 5, 14, 30, 0).unwrap())
        );
    }

    #[test]
    fn test_parse_rfc3339_with_offset_converts_to_utc() {
        assert_eq!(
            parse_lesson_date("2024-03-05T14:30:00+02:00"),
            Some(Utc.with_ymd_and_hms(2024, 3, 5, 12, 30, 0).unwrap())
        );
    }

    #[test]
    fn test_parse_plain_date() {
        assert_eq!(
            parse_lesson_date("2024-03-05"),
            Some(Utc.with_ymd_and_hms(2024, 3, 5, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_parse_legacy_day_month_year() {
        assert_eq!(
            parse_lesson_date("05/03/2024"),
            Some(Utc.with_ymd_and_hms(2024, 3, 5, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_parse_invalid_date() {
        assert_eq!(parse_lesson_date("31/31/2024"), None);
        assert_eq!(parse_lesson_date("yesterday"), None);
    }

    #[test]
    fn test_deserialize_required_date_rejects_garbage() {
        let result: Result<Required, _> = serde_json::from_str(r#"{"date": "soon"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_deserialize_required_date_legacy() {
        let result: Required = serde_json::from_str(r#"{"date": "01/12/2023"}"#).unwrap();
        assert_eq!(
            result.date,
            Utc.with_ymd_and_hms(2023, 12, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_deserialize_optional_date_empty() {
        let result: TestStruct = serde_json::from_str(r#"{"date_field": ""}"#).unwrap();
        assert_eq!(result.date_field, None);
    }
}
