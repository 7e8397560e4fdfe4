//! Date/time-family conversion
//!
//! Native type: `NaiveDateTime`. The four structured bound shapes embed
//! into it losslessly (date-only at midnight, time-only on the epoch
//! date) so their round-trip is exact; ISO-8601 text is parsed on the way
//! in and normalized to RFC 3339 seconds precision on the way back, so
//! its round-trip is format-dependent by contract.
//!
//! The date-range table is separate: native `(NaiveDate, NaiveDate)`
//! against `Range<date>` cells.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use trellis_core::{CellType, CellValue, DateType, DateValue};

use super::now_value;

/// Anchor date for time-only values embedded in the native type
fn epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1970, 1, 1).expect("epoch date")
}

/// Bound types the date/time family edits
pub fn supports(inner: &CellType) -> bool {
    matches!(inner, CellType::Date(_) | CellType::Text)
}

/// Cell value to native `NaiveDateTime`; `None` = absent or unparsable
///
/// An unparsable text payload reads as `None`: the widget seeds empty
/// rather than failing the binding.
pub fn to_native(value: &CellValue) -> Option<NaiveDateTime> {
    match value {
        CellValue::Date(DateValue::Date(d)) => d.and_hms_opt(0, 0, 0),
        CellValue::Date(DateValue::Time(t)) => Some(epoch().and_time(*t)),
        CellValue::Date(DateValue::DateTime(dt)) => Some(*dt),
        CellValue::Date(DateValue::DateTimeUtc(dt)) => Some(dt.naive_utc()),
        CellValue::Text(s) => parse_text(s),
        _ => None,
    }
}

/// Parse the ISO-8601 text forms the family accepts
pub fn parse_text(s: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt);
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return d.and_hms_opt(0, 0, 0);
    }
    None
}

/// Native `NaiveDateTime` back to a cell value of the bound type
///
/// Absent into a non-nullable binding substitutes "now".
pub fn from_native(inner: &CellType, nullable: bool, native: Option<NaiveDateTime>) -> CellValue {
    let dt = match native {
        Some(dt) => dt,
        None if nullable => return CellValue::Absent,
        None => {
            return match inner {
                CellType::Date(kind) => CellValue::Date(now_value(*kind)),
                _ => CellValue::Text(format_text(Utc::now().naive_utc())),
            }
        }
    };
    match inner {
        CellType::Date(DateType::Date) => CellValue::Date(DateValue::Date(dt.date())),
        CellType::Date(DateType::Time) => CellValue::Date(DateValue::Time(dt.time())),
        CellType::Date(DateType::DateTime) => CellValue::Date(DateValue::DateTime(dt)),
        CellType::Date(DateType::DateTimeUtc) => {
            CellValue::Date(DateValue::DateTimeUtc(DateTime::from_naive_utc_and_offset(
                dt, Utc,
            )))
        }
        _ => CellValue::Text(format_text(dt)),
    }
}

/// RFC 3339 at seconds precision, UTC
pub fn format_text(dt: NaiveDateTime) -> String {
    DateTime::<Utc>::from_naive_utc_and_offset(dt, Utc).to_rfc3339_opts(SecondsFormat::Secs, true)
}

// ─────────────────────────────────────────────────────────────────────────────
// Date range
// ─────────────────────────────────────────────────────────────────────────────

/// Bound types the date-range family edits
pub fn range_supports(inner: &CellType) -> bool {
    matches!(inner, CellType::Range(elem) if matches!(**elem, CellType::Date(DateType::Date)))
}

/// Range cell value to native endpoint pair; `None` = absent
pub fn range_to_native(value: &CellValue) -> Option<(NaiveDate, NaiveDate)> {
    match value {
        CellValue::Range { start, end } => match (start.as_ref(), end.as_ref()) {
            (
                CellValue::Date(DateValue::Date(s)),
                CellValue::Date(DateValue::Date(e)),
            ) => Some((*s, *e)),
            _ => None,
        },
        _ => None,
    }
}

/// Native endpoint pair back to a range cell value
///
/// Absent into a non-nullable binding substitutes today for both ends.
pub fn range_from_native(nullable: bool, native: Option<(NaiveDate, NaiveDate)>) -> CellValue {
    let (start, end) = match native {
        Some(pair) => pair,
        None if nullable => return CellValue::Absent,
        None => {
            let today = Utc::now().date_naive();
            (today, today)
        }
    };
    CellValue::range(
        CellValue::Date(DateValue::Date(start)),
        CellValue::Date(DateValue::Date(end)),
    )
}
