use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::spec::TimeBucket;

/// Lenient ISO-8601 parsing for submitted values: full timestamps with an
/// offset (trailing `Z` normalized to `+00:00`), naive timestamps taken as
/// UTC, and bare calendar dates taken as UTC midnight.
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let normalized = text.replace('Z', "+00:00");
    if let Ok(parsed) = DateTime::parse_from_rfc3339(&normalized) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(&normalized, "%Y-%m-%dT%H:%M:%S") {
        return Some(parsed.and_utc());
    }
    if let Ok(parsed) = NaiveDate::parse_from_str(&normalized, "%Y-%m-%d") {
        return Some(parsed.and_hms_opt(0, 0, 0)?.and_utc());
    }
    None
}

/// Formats a timestamp as its bucket label. Week uses the ISO week-numbering
/// year so the label stays consistent around January 1st.
pub fn bucket_label(timestamp: DateTime<Utc>, bucket: TimeBucket) -> String {
    let format = match bucket {
        TimeBucket::Day => "%Y-%m-%d",
        TimeBucket::Week => "%G-W%V",
        TimeBucket::Month => "%Y-%m",
    };
    timestamp.format(format).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_offset_naive_and_date_only_forms() {
        for text in [
            "2024-03-05T10:30:00Z",
            "2024-03-05T10:30:00+00:00",
            "2024-03-05T10:30:00",
            "2024-03-05",
        ] {
            assert!(parse_timestamp(text).is_some(), "{text}");
        }
        assert!(parse_timestamp("03/05/2024").is_none());
        assert!(parse_timestamp("").is_none());
    }

    #[test]
    fn offsets_shift_into_utc_before_labelling() {
        let ts = parse_timestamp("2024-03-01T01:00:00+02:00").unwrap();
        assert_eq!(bucket_label(ts, TimeBucket::Month), "2024-02");
        assert_eq!(bucket_label(ts, TimeBucket::Day), "2024-02-29");
    }

    #[test]
    fn week_label_uses_iso_week_year() {
        // 2024-12-30 falls in ISO week 1 of 2025.
        let ts = parse_timestamp("2024-12-30").unwrap();
        assert_eq!(bucket_label(ts, TimeBucket::Week), "2025-W01");
    }
}
