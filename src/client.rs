//! This module provides a client to connect to the REST API of a WordPress events calendar

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use url::Url;

use crate::dates::DateWindow;
use crate::error::{Error, Result};
use crate::event::{RemoteEvent, RemoteId, RenderedEvent};
use crate::paging::Page;
use crate::references::{ReferenceKind, RemoteReference};
use crate::resource::{Credentials, Resource};
use crate::traits::RemoteSource;

/// Every request is abandoned after this delay
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// What the API returns after a creation. Only the id matters.
#[derive(Deserialize)]
struct Created {
    id: RemoteId,
}

/// A remote source that talks to a WordPress server over HTTP
pub struct Client {
    resource: Resource,
    http: reqwest::Client,
}

impl Client {
    /// Create a client. This does not start a connection
    pub fn new<S: AsRef<str>>(url: S, credentials: Credentials) -> Result<Self> {
        let url = Url::parse(url.as_ref())?;
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            resource: Resource::new(url, credentials),
            http,
        })
    }

    pub fn resource(&self) -> &Resource {
        &self.resource
    }

    async fn send(&self, method: Method, url: Url, body: Option<&RenderedEvent>) -> Result<Response> {
        log::trace!("{} {}", method, url);
        let mut request = self.resource.authorize(self.http.request(method, url));
        if let Some(body) = body {
            request = request.json(body);
        }
        Ok(request.send().await?)
    }

    async fn get_json(&self, url: Url) -> Result<Value> {
        let response = self.send(Method::GET, url.clone(), None).await?;
        if response.status().is_success() == false {
            return Err(Error::UnexpectedStatus { status: response.status().as_u16(), url: url.to_string() });
        }
        Ok(response.json().await?)
    }

    /// Fetches one page of a collection. Its items are stored under the collection name.
    async fn get_page<T: DeserializeOwned>(&self, url: Url, collection: &str) -> Result<Page<T>> {
        let body = self.get_json(url).await?;
        let total_pages = body.get("total_pages")
            .and_then(Value::as_u64)
            .unwrap_or(1) as u32;
        let items = items_of(body, collection)?;
        Ok(Page { items, total_pages })
    }
}

/// The (possibly missing) array stored under `collection` in a response body
fn items_of<T: DeserializeOwned>(mut body: Value, collection: &str) -> Result<Vec<T>> {
    match body.get_mut(collection).map(Value::take) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(items) => Ok(serde_json::from_value(items)?),
    }
}

fn with_paging(mut url: Url, page: u32, per_page: u32) -> Url {
    url.query_pairs_mut()
        .append_pair("page", &page.to_string())
        .append_pair("per_page", &per_page.to_string());
    url
}

#[async_trait]
impl RemoteSource for Client {
    async fn list_events(&self, window: &DateWindow, page: u32, per_page: u32) -> Result<Page<RemoteEvent>> {
        let mut url = self.resource.endpoint("events")?;
        url.query_pairs_mut()
            .append_pair("start_date", &window.start.format("%Y-%m-%d").to_string())
            .append_pair("end_date", &window.end.format("%Y-%m-%d").to_string());
        self.get_page(with_paging(url, page, per_page), "events").await
    }

    async fn create_event(&self, event: &RenderedEvent) -> Result<RemoteId> {
        let url = self.resource.endpoint("events")?;
        let response = self.send(Method::POST, url.clone(), Some(event)).await?;
        if response.status().is_success() == false {
            return Err(Error::UnexpectedStatus { status: response.status().as_u16(), url: url.to_string() });
        }
        let created: Created = response.json().await?;
        Ok(created.id)
    }

    async fn update_event(&self, id: RemoteId, event: &RenderedEvent) -> Result<()> {
        let url = self.resource.endpoint(&format!("events/{}", id))?;
        let response = self.send(Method::PATCH, url.clone(), Some(event)).await?;
        if response.status().is_success() == false {
            return Err(Error::UnexpectedStatus { status: response.status().as_u16(), url: url.to_string() });
        }
        Ok(())
    }

    async fn list_references(&self, kind: ReferenceKind, page: u32, per_page: u32) -> Result<Page<RemoteReference>> {
        let url = self.resource.endpoint(kind.collection())?;
        self.get_page(with_paging(url, page, per_page), kind.collection()).await
    }

    async fn find_reference(&self, kind: ReferenceKind, slug: &str) -> Result<Option<RemoteReference>> {
        let url = match kind {
            ReferenceKind::Venue | ReferenceKind::Organiser => {
                let mut url = self.resource.endpoint(kind.collection())?;
                url.path_segments_mut()
                    .map_err(|_| Error::Config(format!("{} cannot be a base URL", self.resource.base())))?
                    .push("by-slug")
                    .push(slug);
                url
            },
            ReferenceKind::Tag => {
                let mut url = self.resource.endpoint(kind.collection())?;
                url.query_pairs_mut().append_pair("slug", slug);
                url
            },
            ReferenceKind::Category => {
                return Err(Error::Remote(format!("{} cannot be looked up by slug", kind)));
            },
        };

        let response = self.send(Method::GET, url.clone(), None).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if response.status().is_success() == false {
            return Err(Error::UnexpectedStatus { status: response.status().as_u16(), url: url.to_string() });
        }

        let body: Value = response.json().await?;
        let found = match kind {
            ReferenceKind::Tag => items_of::<RemoteReference>(body, kind.collection())?
                .into_iter()
                .find(|tag| tag.slug.eq_ignore_ascii_case(slug)),
            _ => Some(serde_json::from_value(body)?),
        };
        Ok(found)
    }

    async fn search_references(&self, kind: ReferenceKind, term: &str) -> Result<Vec<RemoteReference>> {
        let mut url = self.resource.endpoint(kind.collection())?;
        url.query_pairs_mut().append_pair("search", term);
        let body = self.get_json(url).await?;
        items_of(body, kind.collection())
    }
}
