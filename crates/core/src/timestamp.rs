//! Lenient timestamp parsing for artifact CSV cells.
//!
//! The extraction tools emit a handful of layouts (MFTECmd is configured for
//! `yyyy-MM-dd HH:mm:ss.fffffff`, AmcacheParser emits RFC 3339-ish values).
//! An unparsable value is never an error here; the caller treats `None` as a
//! missing timestamp.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

const FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Parse a timestamp cell, trying RFC 3339 first, then the known extractor
/// layouts, then a bare date. All naive values are taken as UTC.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in &FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(DateTime::<Utc>::from_naive_utc_and_offset(dt, Utc));
        }
    }

    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return d
            .and_hms_opt(0, 0, 0)
            .map(|dt| DateTime::<Utc>::from_naive_utc_and_offset(dt, Utc));
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_extractor_formats() {
        // MFTECmd with 7-digit fractional seconds
        assert!(parse_timestamp("2020-01-01 10:30:00.1234567").is_some());
        assert!(parse_timestamp("2020-01-01 10:30:00").is_some());
        assert!(parse_timestamp("2020/01/01 10:30:00").is_some());
        assert!(parse_timestamp("2020-01-01T10:30:00.123").is_some());
        assert!(parse_timestamp("2020-01-01T10:30:00+00:00").is_some());
    }

    #[test]
    fn test_parse_bare_date_is_midnight() {
        let expected = Utc.with_ymd_and_hms(2019, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(parse_timestamp("2019-01-01"), Some(expected));
    }

    #[test]
    fn test_unparsable_is_none_never_panics() {
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("not a time"), None);
        assert_eq!(parse_timestamp("13/37/9999 99:99:99"), None);
    }
}
