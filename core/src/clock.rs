//! Run clock: pins "now" for one generation run, plus the
//! date arithmetic every table shares.
//!
//! "Now" is read once when the run starts. Policy inception offsets
//! and the premium-transaction cut-off both use this same date, so a
//! run that straddles midnight stays internally consistent.

use crate::error::{GenError, GenResult};
use chrono::{Datelike, Days, Local, NaiveDate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunClock {
    run_date: NaiveDate,
}

impl RunClock {
    /// Use the configured date, or the local calendar date if none.
    pub fn resolve(configured: Option<NaiveDate>) -> Self {
        let run_date = configured.unwrap_or_else(|| Local::now().date_naive());
        Self { run_date }
    }

    pub fn pinned(run_date: NaiveDate) -> Self {
        Self { run_date }
    }

    pub fn today(&self) -> NaiveDate {
        self.run_date
    }

    /// True if `date` lies after the run date.
    pub fn is_future(&self, date: NaiveDate) -> bool {
        date > self.run_date
    }
}

pub fn add_days(date: NaiveDate, days: i64) -> GenResult<NaiveDate> {
    let shifted = if days >= 0 {
        date.checked_add_days(Days::new(days as u64))
    } else {
        date.checked_sub_days(Days::new(days.unsigned_abs()))
    };
    shifted.ok_or_else(|| GenError::DateOutOfRange(format!("{date} {days:+} days")))
}

pub fn january_first(year: i32) -> GenResult<NaiveDate> {
    NaiveDate::from_ymd_opt(year, 1, 1)
        .ok_or_else(|| GenError::DateOutOfRange(format!("{year}-01-01")))
}

/// Same month/day in another year. Feb 29 has no counterpart in a
/// common year; callers only pass January 1.
pub fn with_year(date: NaiveDate, year: i32) -> GenResult<NaiveDate> {
    date.with_year(year)
        .ok_or_else(|| GenError::DateOutOfRange(format!("{date} moved to {year}")))
}

/// Whole days from `from` to `to` (negative if `to` is earlier).
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}
