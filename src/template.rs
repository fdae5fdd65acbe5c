//! Event templates, i.e. recurrence rules together with the content of the events they produce

use std::collections::{BTreeSet, HashSet};
use std::convert::TryFrom;

use bitflags::bitflags;
use chrono::{NaiveTime, Weekday};
use serde::Deserialize;

use crate::dates::weekday_from_index;
use crate::error::Error;

bitflags! {
    /// A set of days of the week
    pub struct Weekdays: u8 {
        const MONDAY = 1;
        const TUESDAY = 1 << 1;
        const WEDNESDAY = 1 << 2;
        const THURSDAY = 1 << 3;
        const FRIDAY = 1 << 4;
        const SATURDAY = 1 << 5;
        const SUNDAY = 1 << 6;
    }
}

impl Weekdays {
    pub fn contains_day(&self, weekday: Weekday) -> bool {
        self.contains(Self::from(weekday))
    }
}

impl From<Weekday> for Weekdays {
    fn from(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Mon => Self::MONDAY,
            Weekday::Tue => Self::TUESDAY,
            Weekday::Wed => Self::WEDNESDAY,
            Weekday::Thu => Self::THURSDAY,
            Weekday::Fri => Self::FRIDAY,
            Weekday::Sat => Self::SATURDAY,
            Weekday::Sun => Self::SUNDAY,
        }
    }
}

/// A recurrence rule, and the content of the events it creates.
///
/// Templates are validated when they are built (see the `TryFrom<RawTemplate>` implementation),
/// and are never modified afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct EventTemplate {
    pub key: String,
    pub title: String,
    /// HTML description
    pub description: String,
    /// HTML excerpt, usually a shorter version of the description
    pub excerpt: String,
    pub weekdays: Weekdays,
    /// Wall-clock start time, `HH:MM:SS`
    pub start_time: String,
    /// Wall-clock end time, `HH:MM:SS`
    pub end_time: String,
    /// Weeks of the month (1-based) this template is restricted to. Empty means every week.
    pub weeks: BTreeSet<u32>,
    /// Month numbers (1-12) this template never occurs in
    pub skip_months: BTreeSet<u32>,
    pub tags: Vec<String>,
    pub categories: Vec<String>,
    pub venue: Option<String>,
    pub organiser: Option<String>,
    /// Remote id of the featured image
    pub image: Option<u64>,
    pub disabled: bool,
    /// Whether the human-readable date is appended to the title
    pub date_in_title: bool,
}

/// A template, as written in the configuration file
#[derive(Clone, Debug, Deserialize)]
pub struct RawTemplate {
    pub key: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub excerpt: Option<String>,
    /// Weekday indices, Monday = 0 ... Sunday = 6
    #[serde(default)]
    pub weekdays: Vec<u8>,
    pub start: Option<String>,
    pub end: Option<String>,
    #[serde(default)]
    pub weeks: Vec<u32>,
    #[serde(default)]
    pub skip_months: Vec<u32>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    pub venue: Option<String>,
    #[serde(alias = "organizer")]
    pub organiser: Option<String>,
    pub image: Option<u64>,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default = "default_date_in_title")]
    pub date_in_title: bool,
}

fn default_date_in_title() -> bool {
    true
}

impl TryFrom<RawTemplate> for EventTemplate {
    type Error = Error;

    fn try_from(raw: RawTemplate) -> Result<Self, Self::Error> {
        let key = raw.key.trim().to_string();
        let invalid = |reason: String| Error::InvalidRuleInput { key: key.clone(), reason };

        if key.is_empty() {
            return Err(invalid("the key must not be empty".to_string()));
        }
        if raw.title.trim().is_empty() {
            return Err(invalid("missing title".to_string()));
        }

        let start_time = validate_time(raw.start, "start").map_err(invalid)?;
        let end_time = validate_time(raw.end, "end").map_err(invalid)?;

        if raw.weekdays.is_empty() {
            return Err(invalid("the weekday set is empty".to_string()));
        }
        let mut weekdays = Weekdays::empty();
        for index in raw.weekdays {
            let weekday = weekday_from_index(index).map_err(|err| invalid(err.to_string()))?;
            weekdays.insert(Weekdays::from(weekday));
        }

        if let Some(week) = raw.weeks.iter().find(|w| (1..=5).contains(*w) == false) {
            return Err(invalid(format!("week of month {} is not in 1..=5", week)));
        }
        if let Some(month) = raw.skip_months.iter().find(|m| (1..=12).contains(*m) == false) {
            return Err(invalid(format!("month {} is not in 1..=12", month)));
        }

        let excerpt = raw.excerpt.unwrap_or_else(|| raw.description.clone());

        Ok(Self {
            key,
            title: raw.title,
            description: raw.description,
            excerpt,
            weekdays,
            start_time,
            end_time,
            weeks: raw.weeks.into_iter().collect(),
            skip_months: raw.skip_months.into_iter().collect(),
            tags: raw.tags,
            categories: raw.categories,
            venue: raw.venue,
            organiser: raw.organiser,
            image: raw.image,
            disabled: raw.disabled,
            date_in_title: raw.date_in_title,
        })
    }
}

fn validate_time(value: Option<String>, which: &str) -> Result<String, String> {
    let value = value.ok_or_else(|| format!("missing {} time", which))?;
    let value = value.trim().to_string();
    NaiveTime::parse_from_str(&value, "%H:%M:%S")
        .map_err(|_| format!("{} time '{}' is not in HH:MM:SS format", which, value))?;
    Ok(value)
}

/// Validate a whole template table. Keys must be unique, table order is preserved.
pub fn validate_templates(raw_templates: Vec<RawTemplate>) -> Result<Vec<EventTemplate>, Error> {
    let mut keys = HashSet::new();
    let mut templates = Vec::with_capacity(raw_templates.len());

    for raw in raw_templates {
        let template = EventTemplate::try_from(raw)?;
        if keys.insert(template.key.clone()) == false {
            return Err(Error::InvalidRuleInput {
                key: template.key,
                reason: "duplicate template key".to_string(),
            });
        }
        templates.push(template);
    }
    Ok(templates)
}
