//! An in-memory remote source, for tests
#![cfg(any(test, feature = "mock_remote"))]

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::Mutex;

use crate::dates::DateWindow;
use crate::error::{Error, Result};
use crate::event::{RemoteEvent, RemoteId, RenderedEvent};
use crate::mock_behaviour::MockBehaviour;
use crate::paging::Page;
use crate::references::{ReferenceKind, RemoteReference};
use crate::traits::RemoteSource;

/// A call that has been made to a [`MockRemote`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RemoteCall {
    ListEvents { page: u32 },
    CreateEvent { slug: String },
    UpdateEvent { id: RemoteId, slug: String },
    ListReferences { kind: ReferenceKind, page: u32 },
    FindReference { kind: ReferenceKind, slug: String },
    SearchReferences { kind: ReferenceKind, term: String },
}

/// An event stored by a [`MockRemote`]
#[derive(Clone, Debug)]
pub struct MockedEvent {
    pub id: RemoteId,
    pub slug: String,
    pub start: NaiveDate,
    /// The last payload received for this event. `None` for events that have been seeded with [`MockRemote::add_event`]
    pub payload: Option<RenderedEvent>,
}

#[derive(Debug, Default)]
struct MockState {
    events: Vec<MockedEvent>,
    references: HashMap<ReferenceKind, Vec<RemoteReference>>,
    next_id: RemoteId,
    calls: Vec<RemoteCall>,
    behaviour: MockBehaviour,
}

/// A remote source that keeps everything in memory.
///
/// Like the real service, categories can only be searched, not looked up by slug.
/// Every call is recorded, and can be made to fail with a [`MockBehaviour`].
#[derive(Debug)]
pub struct MockRemote {
    state: Mutex<MockState>,
}

impl Default for MockRemote {
    fn default() -> Self {
        Self::new()
    }
}

impl MockRemote {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MockState { next_id: 1, ..MockState::default() }),
        }
    }

    pub async fn set_behaviour(&self, behaviour: MockBehaviour) {
        self.state.lock().await.behaviour = behaviour;
    }

    pub async fn add_reference(&self, kind: ReferenceKind, reference: RemoteReference) {
        self.state.lock().await.references.entry(kind).or_default().push(reference);
    }

    /// Seed an already existing event. Returns its id
    pub async fn add_event(&self, slug: &str, start: NaiveDate) -> RemoteId {
        let mut state = self.state.lock().await;
        let id = state.next_id;
        state.next_id += 1;
        state.events.push(MockedEvent { id, slug: slug.to_string(), start, payload: None });
        id
    }

    pub async fn events(&self) -> Vec<MockedEvent> {
        self.state.lock().await.events.clone()
    }

    pub async fn event_ids(&self) -> Vec<RemoteId> {
        self.state.lock().await.events.iter().map(|e| e.id).collect()
    }

    pub async fn event_slugs(&self) -> Vec<String> {
        self.state.lock().await.events.iter().map(|e| e.slug.clone()).collect()
    }

    pub async fn calls(&self) -> Vec<RemoteCall> {
        self.state.lock().await.calls.clone()
    }

    pub async fn clear_calls(&self) {
        self.state.lock().await.calls.clear();
    }
}

fn paginate<T: Clone>(items: &[T], page: u32, per_page: u32) -> Page<T> {
    let per_page = per_page.max(1) as usize;
    let total_pages = ((items.len() + per_page - 1) / per_page) as u32;
    let first = (page.max(1) as usize - 1) * per_page;
    let items = items.iter().skip(first).take(per_page).cloned().collect();
    Page { items, total_pages }
}

fn start_of(event: &RenderedEvent) -> Result<NaiveDate> {
    let date = event.start_date.get(..10).unwrap_or(&event.start_date);
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|err| Error::Remote(format!("invalid start date '{}': {}", event.start_date, err)))
}

#[async_trait]
impl RemoteSource for MockRemote {
    async fn list_events(&self, window: &DateWindow, page: u32, per_page: u32) -> Result<Page<RemoteEvent>> {
        let mut state = self.state.lock().await;
        state.calls.push(RemoteCall::ListEvents { page });
        state.behaviour.can_list_events()?;

        let mut matching: Vec<&MockedEvent> = state.events.iter()
            .filter(|e| window.contains(e.start))
            .collect();
        matching.sort_by_key(|e| (e.start, e.id));
        let matching: Vec<RemoteEvent> = matching.into_iter()
            .map(|e| RemoteEvent { id: e.id, slug: e.slug.clone() })
            .collect();
        Ok(paginate(&matching, page, per_page))
    }

    async fn create_event(&self, event: &RenderedEvent) -> Result<RemoteId> {
        let mut state = self.state.lock().await;
        state.calls.push(RemoteCall::CreateEvent { slug: event.slug.clone() });
        state.behaviour.can_create_event()?;

        let id = state.next_id;
        state.next_id += 1;
        state.events.push(MockedEvent {
            id,
            slug: event.slug.clone(),
            start: start_of(event)?,
            payload: Some(event.clone()),
        });
        Ok(id)
    }

    async fn update_event(&self, id: RemoteId, event: &RenderedEvent) -> Result<()> {
        let mut state = self.state.lock().await;
        state.calls.push(RemoteCall::UpdateEvent { id, slug: event.slug.clone() });
        state.behaviour.can_update_event()?;

        let start = start_of(event)?;
        match state.events.iter_mut().find(|e| e.id == id) {
            None => Err(Error::Remote(format!("no event with id {}", id))),
            Some(stored) => {
                stored.slug = event.slug.clone();
                stored.start = start;
                stored.payload = Some(event.clone());
                Ok(())
            },
        }
    }

    async fn list_references(&self, kind: ReferenceKind, page: u32, per_page: u32) -> Result<Page<RemoteReference>> {
        let mut state = self.state.lock().await;
        state.calls.push(RemoteCall::ListReferences { kind, page });
        state.behaviour.can_list_references()?;

        let references = state.references.get(&kind).map(Vec::as_slice).unwrap_or(&[]);
        Ok(paginate(references, page, per_page))
    }

    async fn find_reference(&self, kind: ReferenceKind, slug: &str) -> Result<Option<RemoteReference>> {
        let mut state = self.state.lock().await;
        state.calls.push(RemoteCall::FindReference { kind, slug: slug.to_string() });
        state.behaviour.can_find_reference()?;

        if kind.supports_exact_lookup() == false {
            return Err(Error::Remote(format!("{} cannot be looked up by slug", kind)));
        }
        Ok(state.references.get(&kind)
            .and_then(|refs| refs.iter().find(|r| r.slug.eq_ignore_ascii_case(slug)))
            .cloned())
    }

    async fn search_references(&self, kind: ReferenceKind, term: &str) -> Result<Vec<RemoteReference>> {
        let mut state = self.state.lock().await;
        state.calls.push(RemoteCall::SearchReferences { kind, term: term.to_string() });
        state.behaviour.can_search_references()?;

        let term = term.to_lowercase();
        Ok(state.references.get(&kind)
            .map(|refs| refs.iter().filter(|r| r.slug.to_lowercase().contains(&term)).cloned().collect())
            .unwrap_or_default())
    }
}
