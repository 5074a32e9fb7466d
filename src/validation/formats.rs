//! ISO 8601 and UUID string formats
//!
//! Format strings are matched with anchored patterns first, then parsed into
//! chrono/uuid values so that equality and ordering are semantic:
//! `"2018"` and `"2018-01-01"` are the same date, `"Z"` and `"+00:00"` are
//! the same time zone, UUIDs compare case-insensitively.
//!
//! Accepted shapes:
//! - date:     `YYYY[-MM[-DD]]`
//! - datetime: `YYYY[-MM[-DD[THH:MM[:SS[.sss]][Z|±HH:MM]]]]` (no offset = UTC)
//! - time:     `HH:MM[:SS[.sss]]`
//! - timezone: `Z` or `±HH:MM`
//! - uuid:     8-4-4-4-12 hex digits

use std::cmp::Ordering;
use std::sync::OnceLock;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use regex::{Captures, Regex};
use uuid::Uuid;

/// String types whose values are compared after canonicalization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StringFormat {
    Date,
    DateTime,
    Time,
    TimeZone,
    Uuid,
}

static DATE_RE: OnceLock<Option<Regex>> = OnceLock::new();
static DATETIME_RE: OnceLock<Option<Regex>> = OnceLock::new();
static TIME_RE: OnceLock<Option<Regex>> = OnceLock::new();
static TIMEZONE_RE: OnceLock<Option<Regex>> = OnceLock::new();
static UUID_RE: OnceLock<Option<Regex>> = OnceLock::new();

/// Compiled once; `None` only if the literal pattern is broken
fn pattern(cell: &'static OnceLock<Option<Regex>>, source: &str) -> Option<&'static Regex> {
    cell.get_or_init(|| Regex::new(source).ok()).as_ref()
}

fn date_re() -> Option<&'static Regex> {
    pattern(&DATE_RE, r"^(\d{4})(?:-(\d{2})(?:-(\d{2}))?)?$")
}

fn datetime_re() -> Option<&'static Regex> {
    pattern(
        &DATETIME_RE,
        r"^(\d{4})(?:-(\d{2})(?:-(\d{2})(?:T(\d{2}):(\d{2})(?::(\d{2})(?:\.(\d{1,3}))?)?(Z|[+-]\d{2}:\d{2})?)?)?)?$",
    )
}

fn time_re() -> Option<&'static Regex> {
    pattern(&TIME_RE, r"^(\d{2}):(\d{2})(?::(\d{2})(?:\.(\d{1,3}))?)?$")
}

fn timezone_re() -> Option<&'static Regex> {
    pattern(&TIMEZONE_RE, r"^(?:Z|([+-])(\d{2}):(\d{2}))$")
}

fn uuid_re() -> Option<&'static Regex> {
    pattern(
        &UUID_RE,
        r"^[0-9A-Fa-f]{8}-[0-9A-Fa-f]{4}-[0-9A-Fa-f]{4}-[0-9A-Fa-f]{4}-[0-9A-Fa-f]{12}$",
    )
}

fn group_u32(caps: &Captures<'_>, index: usize) -> Option<u32> {
    caps.get(index).and_then(|m| m.as_str().parse().ok())
}

/// Fraction digits as milliseconds (".5" is 500ms)
fn group_millis(caps: &Captures<'_>, index: usize) -> u32 {
    caps.get(index)
        .map(|m| {
            let digits = m.as_str();
            let padded = format!("{:0<3}", digits);
            padded.parse().unwrap_or(0)
        })
        .unwrap_or(0)
}

fn ymd(caps: &Captures<'_>) -> Option<NaiveDate> {
    let year: i32 = caps.get(1)?.as_str().parse().ok()?;
    let month = group_u32(caps, 2).unwrap_or(1);
    let day = group_u32(caps, 3).unwrap_or(1);
    NaiveDate::from_ymd_opt(year, month, day)
}

fn offset_seconds(zone: &str) -> Option<i32> {
    let caps = timezone_re()?.captures(zone)?;
    if caps.get(1).is_none() {
        return Some(0);
    }
    let hours = group_u32(&caps, 2)?;
    let minutes = group_u32(&caps, 3)?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    let magnitude = (hours * 3600 + minutes * 60) as i32;
    Some(if &caps[1] == "-" { -magnitude } else { magnitude })
}

/// Parse a calendar date; missing month/day default to 1
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    ymd(&date_re()?.captures(value)?)
}

/// Parse a date with optional time and offset into an instant
pub fn parse_datetime(value: &str) -> Option<DateTime<FixedOffset>> {
    let caps = datetime_re()?.captures(value)?;
    let date = ymd(&caps)?;

    let time = if caps.get(4).is_some() {
        NaiveTime::from_hms_milli_opt(
            group_u32(&caps, 4)?,
            group_u32(&caps, 5)?,
            group_u32(&caps, 6).unwrap_or(0),
            group_millis(&caps, 7),
        )?
    } else {
        NaiveTime::from_hms_opt(0, 0, 0)?
    };

    let offset = match caps.get(8) {
        Some(zone) => FixedOffset::east_opt(offset_seconds(zone.as_str())?)?,
        None => FixedOffset::east_opt(0)?,
    };

    offset
        .from_local_datetime(&NaiveDateTime::new(date, time))
        .single()
}

/// Parse a time of day
pub fn parse_time(value: &str) -> Option<NaiveTime> {
    let caps = time_re()?.captures(value)?;
    NaiveTime::from_hms_milli_opt(
        group_u32(&caps, 1)?,
        group_u32(&caps, 2)?,
        group_u32(&caps, 3).unwrap_or(0),
        group_millis(&caps, 4),
    )
}

/// Parse a time zone designator into an offset from UTC
pub fn parse_timezone(value: &str) -> Option<FixedOffset> {
    FixedOffset::east_opt(offset_seconds(value)?)
}

/// Parse a hyphenated UUID
pub fn parse_uuid(value: &str) -> Option<Uuid> {
    if !uuid_re()?.is_match(value) {
        return None;
    }
    Uuid::parse_str(value).ok()
}

impl StringFormat {
    /// Returns true if the string is well-formed for this format
    pub fn is_valid(&self, value: &str) -> bool {
        match self {
            StringFormat::Date => parse_date(value).is_some(),
            StringFormat::DateTime => parse_datetime(value).is_some(),
            StringFormat::Time => parse_time(value).is_some(),
            StringFormat::TimeZone => parse_timezone(value).is_some(),
            StringFormat::Uuid => parse_uuid(value).is_some(),
        }
    }

    /// Semantic ordering; `None` when either side does not parse
    pub fn compare(&self, a: &str, b: &str) -> Option<Ordering> {
        match self {
            StringFormat::Date => Some(parse_date(a)?.cmp(&parse_date(b)?)),
            StringFormat::DateTime => Some(parse_datetime(a)?.cmp(&parse_datetime(b)?)),
            StringFormat::Time => Some(parse_time(a)?.cmp(&parse_time(b)?)),
            StringFormat::TimeZone => {
                let a = parse_timezone(a)?.local_minus_utc();
                let b = parse_timezone(b)?.local_minus_utc();
                Some(a.cmp(&b))
            }
            StringFormat::Uuid => Some(parse_uuid(a)?.cmp(&parse_uuid(b)?)),
        }
    }

    /// Semantic equality, falling back to raw equality for malformed input
    pub fn canonical_eq(&self, a: &str, b: &str) -> bool {
        match self.compare(a, b) {
            Some(ordering) => ordering == Ordering::Equal,
            None => a == b,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_dates_default_to_first() {
        assert_eq!(parse_date("2018"), NaiveDate::from_ymd_opt(2018, 1, 1));
        assert_eq!(parse_date("2018-03"), NaiveDate::from_ymd_opt(2018, 3, 1));
        assert!(StringFormat::Date.canonical_eq("2018", "2018-01-01"));
    }

    #[test]
    fn test_invalid_calendar_dates_rejected() {
        assert!(parse_date("2018-02-29").is_none());
        assert!(parse_date("2016-02-29").is_some());
        assert!(parse_date("2018-13-01").is_none());
        assert!(parse_date("2018-01-01T00:00").is_none());
        assert!(parse_date("18-01-01").is_none());
    }

    #[test]
    fn test_datetime_offsets_compare_as_instants() {
        assert!(StringFormat::DateTime.canonical_eq(
            "2018-06-01T12:00:00Z",
            "2018-06-01T14:00:00+02:00"
        ));
        assert!(StringFormat::DateTime.canonical_eq("2018-06-01", "2018-06-01T00:00:00.000Z"));
        assert_eq!(
            StringFormat::DateTime.compare("2018-06-01T12:00:00Z", "2018-06-01T12:00:00-01:00"),
            Some(Ordering::Less)
        );
    }

    #[test]
    fn test_datetime_rejects_out_of_range_components() {
        assert!(parse_datetime("2018-06-01T24:00").is_none());
        assert!(parse_datetime("2018-06-01T10:60").is_none());
        assert!(parse_datetime("2018-06-01T10:00+25:00").is_none());
        assert!(parse_datetime("2018-06-01 10:00").is_none());
    }

    #[test]
    fn test_datetime_time_requires_full_date() {
        assert!(!StringFormat::DateTime.is_valid("2018T10:00"));
        assert!(!StringFormat::DateTime.is_valid("2018-06T10:00Z"));
        assert!(StringFormat::DateTime.is_valid("2018-06"));
        assert!(StringFormat::DateTime.is_valid("2018-06-01T10:00Z"));
    }

    #[test]
    fn test_time_fraction_padding() {
        assert_eq!(parse_time("10:15:30.5"), NaiveTime::from_hms_milli_opt(10, 15, 30, 500));
        assert!(StringFormat::Time.canonical_eq("10:15", "10:15:00.000"));
        assert!(parse_time("10:15:30.1234").is_none());
    }

    #[test]
    fn test_timezone_zulu_equals_zero_offset() {
        assert!(StringFormat::TimeZone.canonical_eq("Z", "+00:00"));
        assert!(StringFormat::TimeZone.canonical_eq("-00:00", "Z"));
        assert_eq!(
            StringFormat::TimeZone.compare("-05:00", "+01:30"),
            Some(Ordering::Less)
        );
        assert!(!StringFormat::TimeZone.is_valid("+5:00"));
    }

    #[test]
    fn test_uuid_case_folding() {
        let lower = "1511fba4-e039-42cc-9ac2-9f2fa29eecfc";
        let upper = "1511FBA4-E039-42CC-9AC2-9F2FA29EECFC";
        assert!(StringFormat::Uuid.canonical_eq(lower, upper));
        assert!(!StringFormat::Uuid.is_valid("1511fba4e03942cc9ac29f2fa29eecfc"));
        assert!(StringFormat::Uuid.is_valid(&Uuid::new_v4().to_string()));
    }

    #[test]
    fn test_malformed_values_fall_back_to_raw_equality() {
        assert!(StringFormat::Date.canonical_eq("not-a-date", "not-a-date"));
        assert!(!StringFormat::Date.canonical_eq("not-a-date", "2018"));
        assert_eq!(StringFormat::Date.compare("not-a-date", "2018"), None);
    }
}
