//! Server timestamps ⇄ editable local date strings
//!
//! The backend speaks ISO-8601 UTC. Forms show and accept local wall-clock
//! time as `YYYY-MM-DD HH:mm`; the `T` separator is accepted too.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};

/// Display and input format for dates.
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

const INPUT_FORMATS: &[&str] = &[
    DATE_TIME_FORMAT,
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
];

/// Format a server timestamp for display or editing in local time. Absent
/// dates format as an empty string.
pub fn from_server(date: Option<DateTime<Utc>>) -> String {
    from_server_in(date, &Local)
}

/// Parse a local date string into a server timestamp.
///
/// Returns `None` for blank or unparsable input.
pub fn to_server(input: &str) -> Option<DateTime<Utc>> {
    to_server_in(input, &Local)
}

pub fn from_server_in<Tz: TimeZone>(date: Option<DateTime<Utc>>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    date.map(|d| d.with_timezone(tz).format(DATE_TIME_FORMAT).to_string())
        .unwrap_or_default()
}

pub fn to_server_in<Tz: TimeZone>(input: &str, tz: &Tz) -> Option<DateTime<Utc>> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    let naive = INPUT_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())?;
    // Nonexistent local times (DST gaps) have no mapping
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn utc(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn test_from_server_formats_in_zone() {
        let date = Some(utc("2024-03-01T10:30:00Z"));
        assert_eq!(from_server_in(date, &Utc), "2024-03-01 10:30");

        let kyiv = FixedOffset::east_opt(2 * 3600).unwrap();
        assert_eq!(from_server_in(date, &kyiv), "2024-03-01 12:30");
    }

    #[test]
    fn test_from_server_absent() {
        assert_eq!(from_server(None), "");
    }

    #[test]
    fn test_to_server_accepts_both_separators() {
        let expected = Some(utc("2024-03-01T10:30:00Z"));
        assert_eq!(to_server_in("2024-03-01 10:30", &Utc), expected);
        assert_eq!(to_server_in("2024-03-01T10:30", &Utc), expected);
        assert_eq!(to_server_in(" 2024-03-01 10:30:00 ", &Utc), expected);
    }

    #[test]
    fn test_to_server_converts_offset() {
        let offset = FixedOffset::west_opt(5 * 3600).unwrap();
        assert_eq!(
            to_server_in("2024-03-01 10:30", &offset),
            Some(utc("2024-03-01T15:30:00Z"))
        );
    }

    #[test]
    fn test_to_server_rejects_garbage() {
        assert_eq!(to_server_in("", &Utc), None);
        assert_eq!(to_server_in("yesterday", &Utc), None);
        assert_eq!(to_server_in("2024-13-01 10:30", &Utc), None);
    }

    #[test]
    fn test_local_round_trip() {
        let date = Some(utc("2024-07-15T08:05:00Z"));
        assert_eq!(to_server(&from_server(date)), date);
    }
}
