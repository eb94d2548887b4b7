//! Working-day calendar: weekends plus a fetched holiday set.

use crate::error::{AuditError, Result};
use chrono::{Datelike, Days, NaiveDate, Weekday};
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;
use tracing::debug;

/// `DTSTART;VALUE=DATE:20240101` lines in an iCalendar feed.
static DTSTART_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^DTSTART;VALUE=DATE:(\d+)").expect("valid regex"));

/// Immutable set of non-working dates. Weekends are computed, holidays are
/// supplied at construction.
#[derive(Debug, Clone)]
pub struct WorkingCalendar {
    holidays: HashSet<NaiveDate>,
}

impl WorkingCalendar {
    /// Builds a calendar from a holiday set.
    ///
    /// Refuses to proceed when the set is smaller than `min_holidays`: a
    /// truncated or malformed feed would silently shift every due date.
    pub fn new(holidays: HashSet<NaiveDate>, min_holidays: usize) -> Result<Self> {
        if holidays.len() < min_holidays {
            return Err(AuditError::CalendarUnavailable {
                found: holidays.len(),
                required: min_holidays,
            });
        }
        Ok(Self { holidays })
    }

    pub fn is_working_day(&self, date: NaiveDate) -> bool {
        !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) && !self.holidays.contains(&date)
    }

    /// Advances `start` by `days` working days.
    ///
    /// A zero-length grace period never steps at all, even when `start`
    /// itself falls on a weekend or holiday.
    pub fn add_working_days(&self, start: NaiveDate, days: u32) -> NaiveDate {
        let mut date = start;
        let mut remaining = days;
        while remaining > 0 {
            date = date + Days::new(1);
            if self.is_working_day(date) {
                remaining -= 1;
            }
        }
        date
    }
}

/// Extracts the all-day event dates from an iCalendar body.
pub fn parse_holiday_feed(body: &str) -> HashSet<NaiveDate> {
    let holidays: HashSet<NaiveDate> = DTSTART_DATE
        .captures_iter(body)
        .filter_map(|cap| NaiveDate::parse_from_str(&cap[1], "%Y%m%d").ok())
        .collect();
    debug!(count = holidays.len(), "parsed holiday feed");
    holidays
}

/// Fetches the holiday calendar feed and parses it into a date set.
pub fn fetch_holidays(url: &str) -> Result<HashSet<NaiveDate>> {
    let body = reqwest::blocking::get(url)?.error_for_status()?.text()?;
    Ok(parse_holiday_feed(&body))
}
