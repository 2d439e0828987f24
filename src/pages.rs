//! Page-by-page result aggregation.
//!
//! IPBoard listing endpoints are paged with no cursor: each page reports
//! `totalPages`, and the whole listing is consumed by walking page numbers
//! from 1. [`fetch_all_pages`] drives that walk and concatenates the
//! results.

use crate::Result;
use serde::Deserialize;
use std::future::Future;

/// One page of a listing response.
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    /// The page number the server says this is.
    #[serde(default)]
    pub page: u64,

    /// The total number of pages the server reports for this listing.
    #[serde(rename = "totalPages")]
    pub total_pages: u64,

    /// The items on this page, in the server's order.
    pub results: Vec<T>,
}

/// Fetches every page of a listing and concatenates the results in order.
///
/// `fetch_page` is called with page numbers starting at 1 and is always
/// called at least once, even when the listing turns out to be empty or a
/// single page. Pages are fetched strictly sequentially; page N+1 is never
/// requested before page N's response has been consumed. The walk continues
/// while the next page number is within the `total_pages` reported by the
/// most recent response.
///
/// Any page failure aborts the whole aggregation; results gathered from
/// earlier pages are discarded, not returned.
///
/// A server whose `total_pages` keeps growing as fast as pages are consumed
/// never satisfies the termination condition. No iteration cap is imposed
/// here; a warning is logged when the reported total grows mid-walk.
pub async fn fetch_all_pages<T, F, Fut>(mut fetch_page: F) -> Result<Vec<T>>
where
    F: FnMut(u64) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    let mut all = Vec::new();
    let mut current = 1;
    let mut reported_total = 1;

    loop {
        let page = fetch_page(current).await?;

        if current > 1 && page.total_pages > reported_total {
            tracing::warn!(
                page = current,
                previous_total = reported_total,
                new_total = page.total_pages,
                "server grew the listing mid-aggregation"
            );
        }
        reported_total = page.total_pages;

        tracing::debug!(
            page = current,
            total_pages = reported_total,
            items = page.results.len(),
            "fetched listing page"
        );
        all.extend(page.results);

        current += 1;
        if current > reported_total {
            break;
        }
    }

    Ok(all)
}
