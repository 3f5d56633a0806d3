// src/months.rs

use chrono::{DateTime, Datelike, Months, NaiveDate, NaiveDateTime};

use crate::error::{IngestError, Result};

/// Parse an ISO calendar date. A trailing time part (`T..` or ` ..`) is
/// accepted and ignored, so `2023-01-15T08:00:00` reads as `2023-01-15`.
pub fn parse_date(name: &'static str, raw: &str) -> Result<NaiveDate> {
    let s = raw.trim();
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(d);
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt.date());
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.date_naive());
    }
    Err(IngestError::InvalidRange {
        name,
        value: raw.to_string(),
    })
}

/// First day of the month containing `date`.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Ascending first-of-month dates from `start`'s month through `end`'s month,
/// inclusive. Empty when `start` falls in a later month than `end`.
pub fn expand(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let end = month_start(end);
    let mut months = Vec::new();
    let mut current = month_start(start);
    while current <= end {
        months.push(current);
        match current.checked_add_months(Months::new(1)) {
            Some(next) => current = next,
            None => break,
        }
    }
    months
}
