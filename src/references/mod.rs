//! Venues, organisers, tags and categories: the objects an event refers to by name, but the remote service by id.

mod lookup;
pub use lookup::{resolve_with, LookupStrategy, ReferenceCache};

use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

use serde::Deserialize;

use crate::error::Result;
use crate::event::RemoteId;
use crate::paging::PagingOptions;
use crate::traits::RemoteSource;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ReferenceKind {
    Venue,
    Organiser,
    Tag,
    Category,
}

impl ReferenceKind {
    pub const ALL: [ReferenceKind; 4] = [
        ReferenceKind::Venue,
        ReferenceKind::Organiser,
        ReferenceKind::Tag,
        ReferenceKind::Category,
    ];

    /// The name of the REST collection of this kind
    pub fn collection(&self) -> &'static str {
        match self {
            ReferenceKind::Venue => "venues",
            ReferenceKind::Organiser => "organizers",
            ReferenceKind::Tag => "tags",
            ReferenceKind::Category => "categories",
        }
    }

    /// Whether the remote service can look up a single reference of this kind by its exact slug.
    /// Categories can only be searched.
    pub fn supports_exact_lookup(&self) -> bool {
        match self {
            ReferenceKind::Category => false,
            _ => true,
        }
    }
}

impl Display for ReferenceKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ReferenceKind::Venue => "venue",
            ReferenceKind::Organiser => "organiser",
            ReferenceKind::Tag => "tag",
            ReferenceKind::Category => "category",
        };
        write!(f, "{}", name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct RemoteReference {
    pub id: RemoteId,
    pub slug: String,
}

impl RemoteReference {
    pub fn new(id: RemoteId, slug: &str) -> Self {
        Self { id, slug: slug.to_string() }
    }
}

/// The venue and organiser used by templates that do not name their own
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct ReferenceDefaults {
    pub venue: Option<String>,
    #[serde(alias = "organizer")]
    pub organiser: Option<String>,
}

/// Resolves reference names into remote ids, with one cache per kind.
///
/// The caches live as long as the resolver, that is for a whole run.
#[derive(Debug)]
pub struct ReferenceResolver {
    venues: ReferenceCache,
    organisers: ReferenceCache,
    tags: ReferenceCache,
    categories: ReferenceCache,
    defaults: ReferenceDefaults,
    paging: PagingOptions,
}

impl ReferenceResolver {
    pub fn new(defaults: ReferenceDefaults, paging: PagingOptions) -> Self {
        Self {
            venues: ReferenceCache::new(ReferenceKind::Venue),
            organisers: ReferenceCache::new(ReferenceKind::Organiser),
            tags: ReferenceCache::new(ReferenceKind::Tag),
            categories: ReferenceCache::new(ReferenceKind::Category),
            defaults,
            paging,
        }
    }

    pub fn defaults(&self) -> &ReferenceDefaults {
        &self.defaults
    }

    pub fn cache(&self, kind: ReferenceKind) -> &ReferenceCache {
        match kind {
            ReferenceKind::Venue => &self.venues,
            ReferenceKind::Organiser => &self.organisers,
            ReferenceKind::Tag => &self.tags,
            ReferenceKind::Category => &self.categories,
        }
    }

    fn cache_mut(&mut self, kind: ReferenceKind) -> &mut ReferenceCache {
        match kind {
            ReferenceKind::Venue => &mut self.venues,
            ReferenceKind::Organiser => &mut self.organisers,
            ReferenceKind::Tag => &mut self.tags,
            ReferenceKind::Category => &mut self.categories,
        }
    }

    /// The kinds whose bulk population stopped at the page ceiling
    pub fn truncated_kinds(&self) -> BTreeSet<ReferenceKind> {
        ReferenceKind::ALL.iter()
            .filter(|kind| self.cache(**kind).last_prefetch().map(|r| r.truncated).unwrap_or(false))
            .copied()
            .collect()
    }

    pub async fn resolve(&mut self, remote: &dyn RemoteSource, kind: ReferenceKind, name: &str) -> Result<RemoteId> {
        let paging = self.paging;
        resolve_with(self.cache_mut(kind), remote, &paging, name).await
    }

    /// Resolves the venue named by a template, or the default venue.
    /// Returns `None` when neither is set.
    pub async fn resolve_venue(&mut self, remote: &dyn RemoteSource, name: Option<&str>) -> Result<Option<RemoteId>> {
        let name = name.map(str::to_string).or_else(|| self.defaults.venue.clone());
        self.resolve_optional(remote, ReferenceKind::Venue, name).await
    }

    /// Resolves the organiser named by a template, or the default organiser.
    /// Returns `None` when neither is set.
    pub async fn resolve_organiser(&mut self, remote: &dyn RemoteSource, name: Option<&str>) -> Result<Option<RemoteId>> {
        let name = name.map(str::to_string).or_else(|| self.defaults.organiser.clone());
        self.resolve_optional(remote, ReferenceKind::Organiser, name).await
    }

    async fn resolve_optional(&mut self, remote: &dyn RemoteSource, kind: ReferenceKind, name: Option<String>) -> Result<Option<RemoteId>> {
        match name {
            None => Ok(None),
            Some(name) => self.resolve(remote, kind, &name).await.map(Some),
        }
    }
}
