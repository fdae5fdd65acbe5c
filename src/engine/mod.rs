//! This module drives a whole synchronization run
//!
//! For every requested weekday, occurrence dates are generated, the templates that fire on them are rendered,
//! and the resulting events are created on (or updated in) the remote service.

use std::time::Duration;

use chrono::{NaiveDate, Weekday};

use crate::cache::EventIndex;
use crate::dates::{next_occurrence, sequence, Clock, DateDecoration, DateWindow, SystemClock};
use crate::error::Result;
use crate::paging::PagingOptions;
use crate::references::{ReferenceDefaults, ReferenceResolver};
use crate::render::render;
use crate::rules::applicable_templates;
use crate::template::EventTemplate;
use crate::traits::RemoteSource;

pub mod sync_progress;
use sync_progress::SyncProgress;
use sync_progress::{FeedbackSender, SyncEvent};

mod summary;
pub use summary::{OutcomeCounts, SyncSummary, TruncatedCollection, WeekdaySummary};

/// What a run should do
#[derive(Clone, Debug, PartialEq)]
pub struct SyncRequest {
    /// Processed in this order
    pub weekdays: Vec<Weekday>,
    /// The first date (inclusive) occurrences may fall on. Defaults to the day after today.
    pub start_date: Option<NaiveDate>,
    /// How many occurrences are generated for each weekday
    pub week_count: u32,
    /// Only templates with these keys are considered. Empty means every template.
    pub limit_keys: Vec<String>,
    pub dry_run: bool,
    /// Whether events that already exist are overwritten (rather than skipped)
    pub allow_update: bool,
    /// Pause between two successive dates of a weekday
    pub delay: Duration,
}

impl SyncRequest {
    pub fn new(weekdays: Vec<Weekday>, week_count: u32) -> Self {
        Self {
            weekdays,
            start_date: None,
            week_count,
            limit_keys: Vec::new(),
            dry_run: false,
            allow_update: false,
            delay: Duration::from_secs(0),
        }
    }
}

/// Creates the occurrences of event templates on a remote source.
///
/// The reference caches and the index of existing events are owned by the synchronizer, and live as long as it does.
pub struct Synchronizer<R: RemoteSource> {
    remote: R,
    templates: Vec<EventTemplate>,
    references: ReferenceResolver,
    index: EventIndex,
    clock: Box<dyn Clock>,
    paging: PagingOptions,
}

impl<R: RemoteSource> Synchronizer<R> {
    /// `templates` are expected to be validated already, and are evaluated in this order.
    pub fn new(remote: R, templates: Vec<EventTemplate>, defaults: ReferenceDefaults) -> Self {
        let paging = PagingOptions::default();
        Self {
            remote,
            templates,
            references: ReferenceResolver::new(defaults, paging),
            index: EventIndex::new(),
            clock: Box::new(SystemClock),
            paging,
        }
    }

    pub fn with_clock<C: Clock + 'static>(mut self, clock: C) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_paging(mut self, paging: PagingOptions) -> Self {
        self.paging = paging;
        self.references = ReferenceResolver::new(self.references.defaults().clone(), paging);
        self
    }

    /// Returns the remote source.
    ///
    /// Apart from tests, there are very few (if any) reasons to access it directly.
    pub fn remote(&self) -> &R { &self.remote }
    pub fn templates(&self) -> &[EventTemplate] { &self.templates }
    pub fn index(&self) -> &EventIndex { &self.index }
    pub fn references(&self) -> &ReferenceResolver { &self.references }

    /// Performs a synchronization, and provide feeedback to the user about the progress.
    ///
    /// See [`Self::synchronize`]
    pub async fn synchronize_with_feedback(&mut self, request: &SyncRequest, feedback_sender: FeedbackSender) -> SyncSummary {
        let mut progress = SyncProgress::new_with_feedback_channel(feedback_sender);
        self.run_sync(request, &mut progress).await
    }

    /// Performs a synchronization, without giving any feedback.
    ///
    /// Failing to fetch the existing events aborts the whole run.
    /// Any other failure stops the weekday it happened on, and the next weekday is processed.
    /// What has already been created stays created: simply fix the cause and run again, existing events will be skipped.
    pub async fn synchronize(&mut self, request: &SyncRequest) -> SyncSummary {
        let mut progress = SyncProgress::new();
        self.run_sync(request, &mut progress).await
    }

    async fn run_sync(&mut self, request: &SyncRequest, progress: &mut SyncProgress) -> SyncSummary {
        let mut summary = SyncSummary::default();
        progress.feedback(SyncEvent::Started);

        let start = request.start_date.unwrap_or_else(|| self.clock.today());
        let prefetched = match DateWindow::weeks_from(start, request.week_count) {
            Ok(window) => self.index.prefetch(&self.remote, &window, &self.paging).await,
            Err(err) => Err(err),
        };
        match prefetched {
            Err(err) => {
                progress.error(&format!("Sync aborted: {}", err));
                summary.fatal = Some(err);
            },
            Ok(report) => {
                if report.truncated {
                    progress.warn("Existing events have only been partially fetched, some occurrences may be duplicated");
                    summary.truncated.push(TruncatedCollection::Events);
                }

                for weekday in &request.weekdays {
                    let weekday_summary = self.sync_weekday(*weekday, request, progress).await;
                    summary.weekdays.push(weekday_summary);
                }

                for kind in self.references.truncated_kinds() {
                    progress.warn(&format!("The {} cache has only been partially populated", kind));
                    summary.truncated.push(TruncatedCollection::References(kind));
                }
            },
        }

        summary.warnings = progress.n_warnings();
        progress.feedback(SyncEvent::Finished{ success: progress.is_success() });
        summary
    }

    /// The first occurrence of `weekday`
    fn anchor(&self, weekday: Weekday, request: &SyncRequest) -> NaiveDate {
        match request.start_date {
            // The start date itself is a valid occurrence
            Some(start) => next_occurrence(Some(start - chrono::Duration::days(1)), weekday, self.clock.as_ref()),
            None => next_occurrence(None, weekday, self.clock.as_ref()),
        }
    }

    async fn sync_weekday(&mut self, weekday: Weekday, request: &SyncRequest, progress: &mut SyncProgress) -> WeekdaySummary {
        let mut summary = WeekdaySummary::new(weekday);
        let dates = match sequence(self.anchor(weekday, request), request.week_count) {
            Ok(dates) => dates,
            Err(err) => {
                progress.error(&format!("Unable to generate the {:?} occurrences: {}", weekday, err));
                summary.failure = Some(err);
                return summary;
            },
        };
        progress.info(&format!("Processing {} occurrence(s) of {:?}", dates.len(), weekday));

        for (i, date) in dates.into_iter().enumerate() {
            if i > 0 && request.delay.is_zero() == false {
                tokio::time::sleep(request.delay).await;
            }

            let decoration = DateDecoration::new(date);
            progress.feedback(SyncEvent::InProgress{ weekday: decoration.daystr.clone(), details: decoration.iso() });
            summary.dates.push(date);

            if let Err(err) = self.sync_date(weekday, &decoration, request, &mut summary, progress).await {
                progress.error(&format!("Stopping {:?} occurrences at {}: {}", weekday, decoration.iso(), err));
                summary.failure = Some(err);
                break;
            }
        }

        progress.info(&format!("{:?}: {}", weekday, summary.counts));
        summary
    }

    async fn sync_date(
        &mut self,
        weekday: Weekday,
        decoration: &DateDecoration,
        request: &SyncRequest,
        summary: &mut WeekdaySummary,
        progress: &mut SyncProgress,
    ) -> Result<()> {
        let templates = applicable_templates(weekday, &self.templates, decoration, &request.limit_keys);
        if templates.is_empty() {
            progress.debug(&format!("Nothing happens on {}", decoration.iso()));
        }

        for template in templates {
            let event = render(template, decoration, &mut self.references, &self.remote).await?;
            let outcome = self.index.upsert(&self.remote, &event, request.dry_run, request.allow_update).await?;
            progress.debug(&format!("{}: {}", event.slug, outcome));
            summary.counts.record(outcome);
        }
        Ok(())
    }
}
