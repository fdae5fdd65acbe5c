//! Two-phase (bulk, then targeted) name resolution

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::event::RemoteId;
use crate::paging::{fetch_all_pages, PagingOptions, PrefetchReport};
use crate::references::{ReferenceKind, RemoteReference};
use crate::traits::RemoteSource;

/// The building blocks of a reference lookup. [`resolve_with`] decides how they are combined.
#[async_trait]
pub trait LookupStrategy {
    fn kind(&self) -> ReferenceKind;
    /// Has a bulk population already been attempted?
    fn is_populated(&self) -> bool;
    /// Cache-only lookup
    fn try_get(&self, name: &str) -> Option<RemoteId>;
    /// Fetch the whole collection of this kind, and cache every entry
    async fn bulk_populate(&mut self, remote: &dyn RemoteSource, paging: &PagingOptions) -> Result<PrefetchReport>;
    /// Ask the remote service for this single name, and cache it if it exists
    async fn targeted_lookup(&mut self, remote: &dyn RemoteSource, name: &str) -> Result<Option<RemoteId>>;
}

/// Resolve `name` into a remote identifier.
///
/// 1. cached names are returned immediately
/// 2. the first miss of a kind triggers a bulk population of its cache
/// 3. names that are still missing are looked up one by one
///
/// Names are compared lowercase. Remote failures are propagated as-is.
pub async fn resolve_with<S>(strategy: &mut S, remote: &dyn RemoteSource, paging: &PagingOptions, name: &str) -> Result<RemoteId>
where
    S: LookupStrategy + Send + ?Sized,
{
    let name = normalize_name(name);

    if let Some(id) = strategy.try_get(&name) {
        return Ok(id);
    }

    if strategy.is_populated() == false {
        log::debug!("Populating the {} cache", strategy.kind());
        strategy.bulk_populate(remote, paging).await?;
        if let Some(id) = strategy.try_get(&name) {
            return Ok(id);
        }
    }

    log::debug!("{} '{}' is not cached, looking it up", strategy.kind(), name);
    match strategy.targeted_lookup(remote, &name).await? {
        Some(id) => Ok(id),
        None => Err(Error::ReferenceNotFound { kind: strategy.kind(), name }),
    }
}

pub(crate) fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// The name -> id cache of a single reference kind.
///
/// Entries are only ever added.
#[derive(Clone, Debug)]
pub struct ReferenceCache {
    kind: ReferenceKind,
    entries: HashMap<String, RemoteId>,
    populated: bool,
    last_prefetch: Option<PrefetchReport>,
}

impl ReferenceCache {
    pub fn new(kind: ReferenceKind) -> Self {
        Self {
            kind,
            entries: HashMap::new(),
            populated: false,
            last_prefetch: None,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The report of the bulk population, if it happened
    pub fn last_prefetch(&self) -> Option<&PrefetchReport> {
        self.last_prefetch.as_ref()
    }

    fn insert(&mut self, slug: &str, id: RemoteId) {
        self.entries.entry(normalize_name(slug)).or_insert(id);
    }
}

#[async_trait]
impl LookupStrategy for ReferenceCache {
    fn kind(&self) -> ReferenceKind {
        self.kind
    }

    fn is_populated(&self) -> bool {
        self.populated
    }

    fn try_get(&self, name: &str) -> Option<RemoteId> {
        self.entries.get(name).copied()
    }

    async fn bulk_populate(&mut self, remote: &dyn RemoteSource, paging: &PagingOptions) -> Result<PrefetchReport> {
        let kind = self.kind;
        let mut fetched: Vec<RemoteReference> = Vec::new();
        let report = fetch_all_pages(paging,
            |page| remote.list_references(kind, page, paging.page_size),
            |reference| fetched.push(reference),
        ).await?;

        for reference in fetched {
            self.insert(&reference.slug, reference.id);
        }
        self.populated = true;
        self.last_prefetch = Some(report);

        if report.truncated {
            log::warn!("The {} cache has been partially populated ({} entries)", kind, self.entries.len());
        } else {
            log::debug!("The {} cache has been populated with {} entries", kind, self.entries.len());
        }
        Ok(report)
    }

    async fn targeted_lookup(&mut self, remote: &dyn RemoteSource, name: &str) -> Result<Option<RemoteId>> {
        let found = if self.kind.supports_exact_lookup() {
            remote.find_reference(self.kind, name).await?
        } else {
            // Search is fuzzy: only an exact slug match counts
            remote.search_references(self.kind, name).await?
                .into_iter()
                .find(|candidate| normalize_name(&candidate.slug) == name)
        };

        Ok(found.map(|reference| {
            self.insert(&reference.slug, reference.id);
            reference.id
        }))
    }
}
