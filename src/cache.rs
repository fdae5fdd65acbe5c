//! This module provides a local index of the events that already exist on the remote service

use std::collections::HashMap;
use std::fmt::{Display, Formatter};

use crate::dates::DateWindow;
use crate::error::{Error, Result};
use crate::event::{RemoteEvent, RemoteId, RenderedEvent};
use crate::paging::{fetch_all_pages, PagingOptions, PrefetchReport};
use crate::traits::RemoteSource;

/// What an upsert did (or would have done, in a dry run)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
    Created,
    Updated,
    Skipped,
    WouldCreate,
    WouldUpdate,
}

impl Display for Outcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Outcome::Created => "created",
            Outcome::Updated => "updated",
            Outcome::Skipped => "skipped",
            Outcome::WouldCreate => "would create",
            Outcome::WouldUpdate => "would update",
        };
        write!(f, "{}", name)
    }
}

/// A slug -> remote id index.
///
/// It is filled once from the remote events of the target window, then grows as events get created.
/// Entries are never removed.
#[derive(Clone, Debug, Default)]
pub struct EventIndex {
    entries: HashMap<String, RemoteId>,
}

impl EventIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, slug: &str) -> Option<RemoteId> {
        self.entries.get(slug).copied()
    }

    pub fn contains(&self, slug: &str) -> bool {
        self.entries.contains_key(slug)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn insert(&mut self, slug: String, id: RemoteId) {
        self.entries.insert(slug, id);
    }

    /// Index every remote event that starts within `window`.
    ///
    /// Any failure is reported as a [`Error::PrefetchFailed`]
    pub async fn prefetch(&mut self, remote: &dyn RemoteSource, window: &DateWindow, paging: &PagingOptions) -> Result<PrefetchReport> {
        log::info!("Fetching existing events between {} and {}", window.start, window.end);

        let entries = &mut self.entries;
        let report = fetch_all_pages(paging,
            |page| remote.list_events(window, page, paging.page_size),
            |event: RemoteEvent| { entries.insert(event.slug, event.id); },
        ).await
        .map_err(|err| Error::PrefetchFailed(err.to_string()))?;

        log::info!("{} existing events found", self.entries.len());
        Ok(report)
    }

    /// Create `event`, or update it when its slug is already known.
    ///
    /// * a known slug is only overwritten when `allow_update` is set, and is skipped otherwise
    /// * `dry_run` performs no network call and leaves the index untouched
    pub async fn upsert(&mut self, remote: &dyn RemoteSource, event: &RenderedEvent, dry_run: bool, allow_update: bool) -> Result<Outcome> {
        match self.get(&event.slug) {
            Some(_) if allow_update == false => {
                log::debug!("{} already exists, skipping it", event.slug);
                Ok(Outcome::Skipped)
            },
            Some(id) => {
                if dry_run {
                    log::info!("Would update {} (#{})", event.slug, id);
                    return Ok(Outcome::WouldUpdate);
                }
                remote.update_event(id, event).await?;
                log::info!("Updated {} (#{})", event.slug, id);
                Ok(Outcome::Updated)
            },
            None => {
                if dry_run {
                    log::info!("Would create {}", event.slug);
                    return Ok(Outcome::WouldCreate);
                }
                let id = remote.create_event(event).await?;
                log::info!("Created {} (#{})", event.slug, id);
                self.insert(event.slug.clone(), id);
                Ok(Outcome::Created)
            },
        }
    }
}
