pub mod aggregate;
pub mod filter;

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::api::models::{StoredBusinessCard, StoredVisitorLog};

/// A record carrying the server-assigned creation timestamp.
pub trait DatedRecord {
    fn created_at(&self) -> Option<&str>;
}

impl DatedRecord for StoredBusinessCard {
    fn created_at(&self) -> Option<&str> {
        self.created_at.as_deref()
    }
}

impl DatedRecord for StoredVisitorLog {
    fn created_at(&self) -> Option<&str> {
        self.created_at.as_deref()
    }
}

/// Calendar day of a backend timestamp, taken in the timestamp's own offset.
/// Accepts RFC 3339 and the naive forms sqlite-backed servers emit; returns
/// `None` for anything else.
pub fn parse_created_day(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.date_naive());
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(parsed.date());
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(parsed.date());
    }
    NaiveDate::parse_from_str(trimmed.get(..10)?, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_created_day_accepts_backend_timestamp_forms() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 5).expect("date should construct");
        assert_eq!(parse_created_day("2024-01-05T10:00:00Z"), Some(expected));
        assert_eq!(
            parse_created_day("2024-01-05T10:00:00+05:30"),
            Some(expected)
        );
        assert_eq!(
            parse_created_day("2024-01-05T10:00:00.123456"),
            Some(expected)
        );
        assert_eq!(parse_created_day("2024-01-05 10:00:00"), Some(expected));
        assert_eq!(parse_created_day("2024-01-05"), Some(expected));
    }

    #[test]
    fn parse_created_day_rejects_garbage() {
        assert_eq!(parse_created_day(""), None);
        assert_eq!(parse_created_day("yesterday"), None);
        assert_eq!(parse_created_day("2024-13-40T00:00:00Z"), None);
    }
}
