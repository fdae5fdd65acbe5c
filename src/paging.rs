//! Paginated collections of the remote service

use std::future::Future;

use serde::Deserialize;

use crate::error::Result;

/// How collections are fetched from the remote service
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct PagingOptions {
    /// How many items are requested in a single HTTP request
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Safety ceiling on the number of pages fetched for a single collection
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
}

fn default_page_size() -> u32 { 50 }
fn default_max_pages() -> u32 { 20 }

impl Default for PagingOptions {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            max_pages: default_max_pages(),
        }
    }
}

/// One page of a remote collection
#[derive(Clone, Debug, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// The total page count, as reported by the remote service
    pub total_pages: u32,
}

/// What happened during a paginated prefetch
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PrefetchReport {
    pub pages_fetched: u32,
    pub total_pages: u32,
    pub items: usize,
    /// The remote service reported more pages than the page ceiling allowed to fetch.
    /// The prefetched data is then incomplete.
    pub truncated: bool,
}

/// Fetch pages (1-based) until the reported total page count, or the page ceiling, is reached.
///
/// Every item is passed to `sink` as soon as its page has been received.
pub async fn fetch_all_pages<T, F, Fut, S>(paging: &PagingOptions, mut fetch: F, mut sink: S) -> Result<PrefetchReport>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
    S: FnMut(T),
{
    let mut report = PrefetchReport::default();
    let mut page_number = 1;

    loop {
        if page_number > paging.max_pages {
            report.truncated = true;
            break;
        }

        let page = fetch(page_number).await?;
        report.pages_fetched += 1;
        report.total_pages = page.total_pages;
        report.items += page.items.len();
        for item in page.items {
            sink(item);
        }

        if page_number >= page.total_pages {
            break;
        }
        page_number += 1;
    }

    if report.truncated {
        log::warn!("Stopped after {} pages, but the remote reported {} pages. Prefetched data is incomplete.",
            report.pages_fetched, report.total_pages);
    }
    Ok(report)
}
