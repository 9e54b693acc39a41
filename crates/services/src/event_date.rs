use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

const NAIVE_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];

/// Parses the event date submitted with an invitation.
///
/// Accepts RFC 3339 timestamps, `YYYY-MM-DDTHH:MM[:SS]` and plain
/// `YYYY-MM-DD`. Values without an offset are taken as UTC; a plain date
/// maps to midnight.
pub fn parse_event_date(input: &str) -> Option<bson::DateTime> {
    let input = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(bson::DateTime::from_chrono(dt.with_timezone(&Utc)));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            return Some(bson::DateTime::from_chrono(naive.and_utc()));
        }
    }

    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| bson::DateTime::from_chrono(naive.and_utc()))
}
