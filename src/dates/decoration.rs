//! Calendar metadata of a single date

use chrono::{Datelike, NaiveDate, Weekday};

/// Calendar metadata derived from a date.
///
/// The week-of-month index is the 1-based bucket of the day-of-month in blocks of 7 days
/// (days 1-7 are week 1, days 8-14 are week 2, and so on). It does not depend on which weekday
/// starts a week: the 29th is always in week 5, whatever weekday it falls on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DateDecoration {
    date: NaiveDate,
    /// e.g. "Sunday"
    pub daystr: String,
    /// Zero-padded day of month, e.g. "01"
    pub datenum: String,
    /// "st", "nd", "rd" or "th"
    pub suffixstr: &'static str,
    /// e.g. "February"
    pub monthstr: String,
    /// Zero-padded month number, e.g. "02"
    pub monthnum: String,
    /// Four-digit year, e.g. "2026"
    pub yearstr: String,
    /// 1-based week-of-month index
    pub week_num: u32,
}

impl DateDecoration {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            daystr: date.format("%A").to_string(),
            datenum: date.format("%d").to_string(),
            suffixstr: ordinal_suffix(date.day()),
            monthstr: date.format("%B").to_string(),
            monthnum: date.format("%m").to_string(),
            yearstr: date.format("%Y").to_string(),
            week_num: week_of_month(date.day()),
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn weekday(&self) -> Weekday {
        self.date.weekday()
    }

    /// The month as a number in 1..=12
    pub fn month(&self) -> u32 {
        self.date.month()
    }

    /// ISO representation, e.g. "2026-02-01"
    pub fn iso(&self) -> String {
        format!("{}-{}-{}", self.yearstr, self.monthnum, self.datenum)
    }

    /// Human readable date, e.g. "Sunday 1st February 2026"
    pub fn human(&self) -> String {
        format!("{} {}{} {} {}",
            self.daystr,
            self.date.day(),
            self.suffixstr,
            self.monthstr,
            self.yearstr,
        )
    }
}

impl From<NaiveDate> for DateDecoration {
    fn from(date: NaiveDate) -> Self {
        Self::new(date)
    }
}

/// Ordinal suffix of a day of month. 11, 12 and 13 are "th".
pub fn ordinal_suffix(day: u32) -> &'static str {
    if (11..=13).contains(&(day % 100)) {
        return "th";
    }
    match day % 10 {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    }
}

fn week_of_month(day: u32) -> u32 {
    (day - 1) / 7 + 1
}
