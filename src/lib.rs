//! This crate creates the occurrences of recurring events on a WordPress events calendar.
//!
//! Recurring events are described by [`EventTemplate`](template::EventTemplate)s: a weekly rule (weekdays, weeks of the month,
//! excluded months) and the content of the events it produces. \
//! A [`Synchronizer`](engine::Synchronizer) generates the dates of every occurrence, renders them into events,
//! and creates them on a remote source (usually a [`Client`](client::Client)), skipping the ones that already exist.
//!
//! Occurrences are identified by their [slug](slug::build_slug), so that running a synchronization twice is harmless.

pub mod traits;
pub mod error;
pub use error::{Error, Result};

pub mod dates;
pub mod template;
pub use template::EventTemplate;
pub mod rules;
pub mod slug;
pub mod event;
pub use event::RenderedEvent;
pub mod references;
pub mod render;
pub mod paging;

pub mod engine;
pub use engine::Synchronizer;

pub mod client;
pub mod resource;
pub mod cache;

pub mod settings;

pub mod mock_behaviour;
pub mod mock_remote;
