use async_trait::async_trait;

use crate::dates::DateWindow;
use crate::error::Result;
use crate::event::{RemoteEvent, RemoteId, RenderedEvent};
use crate::paging::Page;
use crate::references::{ReferenceKind, RemoteReference};

/// The remote calendaring service events are synchronized to.
///
/// Every call is expected to either succeed or fail immediately: implementors must not retry on their own.
#[async_trait]
pub trait RemoteSource: Send + Sync {
    /// Returns one page (1-based) of the events that start within `window`
    async fn list_events(&self, window: &DateWindow, page: u32, per_page: u32) -> Result<Page<RemoteEvent>>;
    /// Creates an event, and returns its new remote identifier
    async fn create_event(&self, event: &RenderedEvent) -> Result<RemoteId>;
    /// Overwrites the event that has the given remote identifier
    async fn update_event(&self, id: RemoteId, event: &RenderedEvent) -> Result<()>;

    /// Returns one page (1-based) of the venues, organisers, tags or categories
    async fn list_references(&self, kind: ReferenceKind, page: u32, per_page: u32) -> Result<Page<RemoteReference>>;
    /// Looks up a single reference by its exact slug. Returns `None` when it does not exist.
    ///
    /// Some kinds may not support this (see [`ReferenceKind::supports_exact_lookup`])
    async fn find_reference(&self, kind: ReferenceKind, slug: &str) -> Result<Option<RemoteReference>>;
    /// Full-text search among the references of a kind. Results may not match `term` exactly.
    async fn search_references(&self, kind: ReferenceKind, term: &str) -> Result<Vec<RemoteReference>>;
}
