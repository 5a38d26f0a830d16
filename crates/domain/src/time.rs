//! Wall-clock helpers.
//!
//! Schedules are written in local time ("08:00"), so the controller works
//! with naive local timestamps rather than UTC.

use chrono::{Datelike, Local, NaiveDate, NaiveDateTime, Weekday};

/// Local wall-clock timestamp.
pub type LocalTime = NaiveDateTime;

/// Return the current local time.
#[must_use]
pub fn now() -> LocalTime {
    Local::now().naive_local()
}

/// Whether `date` falls on Saturday or Sunday.
#[must_use]
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}
