//! Generation of weekly date sequences

mod decoration;
pub use decoration::{ordinal_suffix, DateDecoration};

use chrono::{Datelike, Duration, Local, NaiveDate, Weekday};

use crate::error::{Error, Result};

/// Something that knows what day it is today
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// The local wall clock
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A clock that is stuck on a given day. Mostly useful for tests
#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Converts a weekday index (Monday = 0 ... Sunday = 6) into a `Weekday`
pub fn weekday_from_index(index: u8) -> Result<Weekday> {
    match index {
        0 => Ok(Weekday::Mon),
        1 => Ok(Weekday::Tue),
        2 => Ok(Weekday::Wed),
        3 => Ok(Weekday::Thu),
        4 => Ok(Weekday::Fri),
        5 => Ok(Weekday::Sat),
        6 => Ok(Weekday::Sun),
        other => Err(Error::InvalidWeekday(other)),
    }
}

/// Parses a weekday given either as an index (Monday = 0 ... Sunday = 6) or as an English name ("sun", "Sunday")
pub fn parse_weekday(text: &str) -> Result<Weekday> {
    let text = text.trim();
    if let Ok(index) = text.parse::<u8>() {
        return weekday_from_index(index);
    }
    text.parse::<Weekday>()
        .map_err(|_| Error::Config(format!("unknown weekday '{}'", text)))
}

/// Returns the first date strictly after `reference` that falls on `weekday`.
///
/// When `reference` is `None`, today's date (as told by `clock`) is used.
pub fn next_occurrence(reference: Option<NaiveDate>, weekday: Weekday, clock: &dyn Clock) -> NaiveDate {
    let reference = reference.unwrap_or_else(|| clock.today());
    let current = reference.weekday().num_days_from_monday() as i64;
    let target = weekday.num_days_from_monday() as i64;
    let mut ahead = (target - current).rem_euclid(7);
    if ahead == 0 {
        ahead = 7;
    }
    reference + Duration::days(ahead)
}

/// Same as [`next_occurrence`], for a raw weekday index
pub fn next_occurrence_by_index(reference: Option<NaiveDate>, weekday_index: u8, clock: &dyn Clock) -> Result<NaiveDate> {
    let weekday = weekday_from_index(weekday_index)?;
    Ok(next_occurrence(reference, weekday, clock))
}

/// Returns `count` dates, one week apart, starting with `anchor`
///
/// Fails when the last date would be out of the range `NaiveDate` supports.
pub fn sequence(anchor: NaiveDate, count: u32) -> Result<Vec<NaiveDate>> {
    (0..count)
        .map(|week| add_weeks(anchor, week))
        .collect()
}

fn add_weeks(date: NaiveDate, weeks: u32) -> Result<NaiveDate> {
    date.checked_add_signed(Duration::weeks(weeks as i64))
        .ok_or(Error::DateOutOfRange { start: date, weeks })
}

/// An inclusive range of dates
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    /// `[start, start + weeks weeks]`
    pub fn weeks_from(start: NaiveDate, weeks: u32) -> Result<Self> {
        Ok(Self {
            start,
            end: add_weeks(start, weeks)?,
        })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}
