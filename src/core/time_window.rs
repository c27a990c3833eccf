//! Calendar boundaries used to filter fixtures and points.
//!
//! Timestamps are stored in UTC. "This month" is a UTC calendar month, while
//! "now" for upcoming/finished fixtures is shifted to the deployment's fixed
//! local offset so that "today" matches the local calendar.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Utc};
use serde::Serialize;

/// Literal form the store expects for DATETIME parameters.
pub const SQL_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A half-open month interval `[start, end)` plus the month it describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthWindow {
    pub year: i32,
    pub month: u32,
    #[serde(skip)]
    pub start: NaiveDateTime,
    #[serde(skip)]
    pub end: NaiveDateTime,
}

impl MonthWindow {
    pub fn start_literal(&self) -> String {
        sql_literal(self.start)
    }

    pub fn end_literal(&self) -> String {
        sql_literal(self.end)
    }
}

/// Clock adapter for a fixed UTC offset. Reads the wall clock on every call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    offset_hours: i32,
}

impl TimeWindow {
    pub fn new(offset_hours: i32) -> Self {
        Self { offset_hours }
    }

    /// Current instant shifted to the local offset.
    pub fn now_shifted(&self) -> NaiveDateTime {
        Utc::now().naive_utc() + TimeDelta::hours(i64::from(self.offset_hours))
    }

    /// Last second of the current local day.
    pub fn end_of_local_day(&self) -> NaiveDateTime {
        end_of_day(self.now_shifted().date())
    }
}

/// Bounds of the requested month, defaulting to the current UTC month.
///
/// Month windows ignore the local offset. Returns `None` when the month or
/// year cannot form a calendar date.
pub fn month_bounds(year: Option<i32>, month: Option<u32>) -> Option<MonthWindow> {
    month_bounds_on(Utc::now().date_naive(), year, month)
}

/// Month bounds relative to an explicit "today".
pub fn month_bounds_on(today: NaiveDate, year: Option<i32>, month: Option<u32>) -> Option<MonthWindow> {
    let year = year.unwrap_or_else(|| today.year());
    let month = month.unwrap_or_else(|| today.month());

    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };

    let start = NaiveDate::from_ymd_opt(year, month, 1)?.and_time(NaiveTime::MIN);
    let end = NaiveDate::from_ymd_opt(next_year, next_month, 1)?.and_time(NaiveTime::MIN);

    Some(MonthWindow {
        year,
        month,
        start,
        end,
    })
}

pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN))
}

pub fn sql_literal(value: NaiveDateTime) -> String {
    value.format(SQL_DATETIME_FORMAT).to_string()
}

/// Parse a `YYYY-MM-DD HH:MM:SS` literal.
pub fn parse_sql_literal(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value.trim(), SQL_DATETIME_FORMAT).ok()
}
