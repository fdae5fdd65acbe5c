//! What a synchronization run did

use std::fmt::{Display, Formatter};

use chrono::{NaiveDate, Weekday};

use crate::cache::Outcome;
use crate::error::Error;
use crate::references::ReferenceKind;

/// How many occurrences ended up in each outcome
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OutcomeCounts {
    pub created: u32,
    pub updated: u32,
    pub skipped: u32,
    pub would_create: u32,
    pub would_update: u32,
}

impl OutcomeCounts {
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Created => self.created += 1,
            Outcome::Updated => self.updated += 1,
            Outcome::Skipped => self.skipped += 1,
            Outcome::WouldCreate => self.would_create += 1,
            Outcome::WouldUpdate => self.would_update += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.created + self.updated + self.skipped + self.would_create + self.would_update
    }

    fn add(&mut self, other: &OutcomeCounts) {
        self.created += other.created;
        self.updated += other.updated;
        self.skipped += other.skipped;
        self.would_create += other.would_create;
        self.would_update += other.would_update;
    }
}

impl Display for OutcomeCounts {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} created, {} updated, {} skipped, {} would create, {} would update",
            self.created, self.updated, self.skipped, self.would_create, self.would_update)
    }
}

/// The occurrences of a single weekday
#[derive(Debug)]
pub struct WeekdaySummary {
    pub weekday: Weekday,
    /// The dates that have been processed, in order
    pub dates: Vec<NaiveDate>,
    pub counts: OutcomeCounts,
    /// What stopped this weekday. Its remaining dates have not been attempted.
    pub failure: Option<Error>,
}

impl WeekdaySummary {
    pub fn new(weekday: Weekday) -> Self {
        Self { weekday, dates: Vec::new(), counts: OutcomeCounts::default(), failure: None }
    }
}

/// A remote collection that could only be partially fetched
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TruncatedCollection {
    Events,
    References(ReferenceKind),
}

impl Display for TruncatedCollection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TruncatedCollection::Events => write!(f, "events"),
            TruncatedCollection::References(kind) => match kind {
                ReferenceKind::Venue => write!(f, "venues"),
                ReferenceKind::Organiser => write!(f, "organisers"),
                ReferenceKind::Tag => write!(f, "tags"),
                ReferenceKind::Category => write!(f, "categories"),
            },
        }
    }
}

/// The outcome of a whole run
#[derive(Debug, Default)]
pub struct SyncSummary {
    pub weekdays: Vec<WeekdaySummary>,
    /// An error that aborted the whole run
    pub fatal: Option<Error>,
    pub truncated: Vec<TruncatedCollection>,
    /// How many warnings have been logged during the run
    pub warnings: u32,
}

impl SyncSummary {
    /// Whether the run went through without any failure
    pub fn is_success(&self) -> bool {
        self.fatal.is_none() && self.weekdays.iter().all(|w| w.failure.is_none())
    }

    pub fn totals(&self) -> OutcomeCounts {
        let mut totals = OutcomeCounts::default();
        for weekday in &self.weekdays {
            totals.add(&weekday.counts);
        }
        totals
    }

    pub fn weekday(&self, weekday: Weekday) -> Option<&WeekdaySummary> {
        self.weekdays.iter().find(|w| w.weekday == weekday)
    }
}

impl Display for SyncSummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if let Some(err) = &self.fatal {
            writeln!(f, "Run aborted: {}", err)?;
        }
        for weekday in &self.weekdays {
            write!(f, "{:?}: {} date(s), {}", weekday.weekday, weekday.dates.len(), weekday.counts)?;
            if let Some(err) = &weekday.failure {
                write!(f, " (stopped: {})", err)?;
            }
            writeln!(f)?;
        }
        for collection in &self.truncated {
            writeln!(f, "Warning: the {} could only be partially fetched", collection)?;
        }
        write!(f, "Total: {}", self.totals())
    }
}
