//! Record date parsing and inclusive date-range matching.
//!
//! Backend rows carry dates in whatever shape the form that produced them
//! used: `MM/DD/YYYY` from the older screens, ISO dates from the newer ones
//! and full timestamps for audit rows. Everything is compared on the local
//! calendar.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
];

/// Parse a record date into a local wall-clock timestamp.
///
/// Date-only forms resolve to midnight. Returns `None` for anything that is
/// not one of the accepted shapes.
pub fn parse_record_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Local).naive_local());
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt);
        }
    }

    parse_calendar_date(raw).and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Parse a bare calendar date: `YYYY-MM-DD` or `MM/DD/YYYY`.
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    parse_us_date(raw)
}

fn parse_us_date(raw: &str) -> Option<NaiveDate> {
    let mut parts = raw.split('/');
    let month = parts.next()?;
    let day = parts.next()?;
    let year = parts.next()?;
    if parts.next().is_some() || year.len() != 4 || month.len() > 2 || day.len() > 2 {
        return None;
    }
    let month: u32 = month.parse().ok()?;
    let day: u32 = day.parse().ok()?;
    let year: i32 = year.parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Inclusive calendar range. Either bound may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    pub fn is_active(&self) -> bool {
        self.start.is_some() || self.end.is_some()
    }

    /// First instant of the start day.
    pub fn lower_bound(&self) -> Option<NaiveDateTime> {
        self.start.and_then(|d| d.and_hms_milli_opt(0, 0, 0, 0))
    }

    /// Last millisecond of the end day.
    pub fn upper_bound(&self) -> Option<NaiveDateTime> {
        self.end.and_then(|d| d.and_hms_milli_opt(23, 59, 59, 999))
    }

    pub fn contains_datetime(&self, value: NaiveDateTime) -> bool {
        if let Some(lower) = self.lower_bound() {
            if value < lower {
                return false;
            }
        }
        if let Some(upper) = self.upper_bound() {
            if value > upper {
                return false;
            }
        }
        true
    }

    /// Whether a raw record date falls inside the range.
    ///
    /// An inactive range accepts anything, including missing dates. An active
    /// range rejects values that do not parse.
    pub fn contains(&self, raw: Option<&str>) -> bool {
        if !self.is_active() {
            return true;
        }
        match raw.and_then(parse_record_date) {
            Some(value) => self.contains_datetime(value),
            None => false,
        }
    }

    /// `startDate` / `endDate` query pairs for server-side range filtering.
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(start) = self.start {
            params.push(("startDate", start.format("%Y-%m-%d").to_string()));
        }
        if let Some(end) = self.end {
            params.push(("endDate", end.format("%Y-%m-%d").to_string()));
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, TimeZone, Timelike, Utc};

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parses_us_and_iso_dates() {
        assert_eq!(parse_calendar_date("03/15/2024"), Some(ymd(2024, 3, 15)));
        assert_eq!(parse_calendar_date("3/5/2024"), Some(ymd(2024, 3, 5)));
        assert_eq!(parse_calendar_date("2024-03-15"), Some(ymd(2024, 3, 15)));
    }

    #[test]
    fn test_rejects_garbage_and_impossible_dates() {
        assert_eq!(parse_record_date(""), None);
        assert_eq!(parse_record_date("not a date"), None);
        assert_eq!(parse_record_date("02/30/2024"), None);
        assert_eq!(parse_record_date("13/01/2024"), None);
        assert_eq!(parse_record_date("1/2/24"), None);
        assert_eq!(parse_record_date("2024-3"), None);
    }

    #[test]
    fn test_parses_naive_timestamps() {
        let dt = parse_record_date("2024-03-15 08:30:00").unwrap();
        assert_eq!((dt.hour(), dt.minute()), (8, 30));
        let dt = parse_record_date("2024-03-15T23:59:59.999").unwrap();
        assert_eq!(dt.date(), ymd(2024, 3, 15));
    }

    #[test]
    fn test_parses_rfc3339_into_local_day() {
        let utc = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let expected = utc.with_timezone(&Local).naive_local();
        assert_eq!(parse_record_date("2024-06-01T12:00:00Z"), Some(expected));
    }

    #[test]
    fn test_date_only_resolves_to_midnight() {
        let dt = parse_record_date("04/01/2024").unwrap();
        assert_eq!((dt.hour(), dt.minute(), dt.second()), (0, 0, 0));
        assert_eq!(dt.day(), 1);
    }

    #[test]
    fn test_range_is_inclusive_at_both_edges() {
        let range = DateRange::new(Some(ymd(2024, 3, 1)), Some(ymd(2024, 3, 31)));
        assert!(range.contains(Some("2024-03-01T00:00:00.000")));
        assert!(range.contains(Some("2024-03-31T23:59:59.999")));
        assert!(range.contains(Some("03/31/2024")));
        assert!(!range.contains(Some("2024-02-29T23:59:59.999")));
        assert!(!range.contains(Some("2024-04-01")));
    }

    #[test]
    fn test_active_range_excludes_unparsable_and_missing() {
        let range = DateRange::new(Some(ymd(2024, 1, 1)), None);
        assert!(!range.contains(Some("soon")));
        assert!(!range.contains(None));
    }

    #[test]
    fn test_inactive_range_accepts_everything() {
        let range = DateRange::default();
        assert!(range.contains(None));
        assert!(range.contains(Some("garbage")));
    }

    #[test]
    fn test_open_ended_bounds() {
        let from = DateRange::new(Some(ymd(2024, 5, 1)), None);
        assert!(from.contains(Some("2030-01-01")));
        assert!(!from.contains(Some("2024-04-30")));

        let until = DateRange::new(None, Some(ymd(2024, 5, 1)));
        assert!(until.contains(Some("1999-01-01")));
        assert!(!until.contains(Some("2024-05-02")));
    }

    #[test]
    fn test_query_params_render_iso_dates() {
        let range = DateRange::new(Some(ymd(2024, 1, 2)), Some(ymd(2024, 2, 3)));
        assert_eq!(
            range.query_params(),
            vec![
                ("startDate", "2024-01-02".to_string()),
                ("endDate", "2024-02-03".to_string())
            ]
        );
        assert!(DateRange::default().query_params().is_empty());
    }
}
