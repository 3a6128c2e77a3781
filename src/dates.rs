//! Calendar date parsing and the booklet's header labels.
//!
//! Dates arrive from the provider as `YYYY-MM-DD` strings.  Parsing is
//! deliberately soft: a string that does not match the pattern yields `None`
//! and the affected label components render empty, never aborting generation.

use chrono::{Datelike, NaiveDate};

/// Parses a `YYYY-MM-DD` string into a calendar date.
pub fn parse_calendar_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

/// Full English month name, e.g. "March".
pub fn month_name(date: NaiveDate) -> String {
    date.format("%B").to_string()
}

/// The title-page date range line, e.g. "March 9-11, 2024".
///
/// The month and year come from the end date even though both dates are
/// parsed; when the end date fails to parse, the start date's month and year
/// remain in effect.  This reproduces the historical behavior and is kept
/// pending product sign-off on shows that span a month boundary.
pub fn date_range_label(start: &str, end: &str) -> String {
    let start_date = parse_calendar_date(start);
    let end_date = parse_calendar_date(end);

    let header = end_date.or(start_date);
    let month = header.map(month_name).unwrap_or_default();
    let year = header.map(|d| d.year().to_string()).unwrap_or_default();
    let start_day = start_date.map(|d| d.day().to_string()).unwrap_or_default();
    let end_day = end_date.map(|d| d.day().to_string()).unwrap_or_default();

    format!("{} {}-{}, {}", month, start_day, end_day, year)
}

/// The welcome-page month label derived from the start date, e.g. "March, 2024".
pub fn month_year_label(start: &str) -> String {
    let date = parse_calendar_date(start);
    let month = date.map(month_name).unwrap_or_default();
    let year = date.map(|d| d.year().to_string()).unwrap_or_default();
    format!("{}, {}", month, year)
}
