// src/fetch/paginated.rs
// Page driver for one region. Discovers the page count from the first
// response, caps it, paces consecutive requests, and degrades per page:
// a failed page is skipped, a failed first page aborts the region.

use std::time::Duration;

use metrics::counter;
use tracing::{debug, warn};

use crate::fetch::PageFetcher;
use crate::model::RawVacancy;

/// Hard ceiling on pages fetched per region (~2000 listings at 100 per
/// page), regardless of the upstream-reported total. Bounds worst-case
/// latency and memory.
pub const PAGE_CEILING: u32 = 20;

/// Minimum delay between consecutive page requests within a region.
pub const FETCH_DELAY: Duration = Duration::from_millis(250);

/// Finite, lazy sequence of listing batches for one region. Not
/// restartable; construct a new one to re-fetch.
pub struct PaginatedFetcher<'a, F: PageFetcher + ?Sized> {
    fetcher: &'a F,
    query: &'a str,
    region_id: i64,
    per_page: u32,
    page: u32,
    total_pages: Option<u32>,
    aborted: bool,
}

impl<'a, F: PageFetcher + ?Sized> PaginatedFetcher<'a, F> {
    pub fn new(fetcher: &'a F, query: &'a str, region_id: i64, per_page: u32) -> Self {
        Self {
            fetcher,
            query,
            region_id,
            per_page,
            page: 0,
            total_pages: None,
            aborted: false,
        }
    }

    /// Fetch the next page's listings. `Some(vec![])` means the page
    /// failed and was skipped; `None` means the region is exhausted (or
    /// was aborted on its first page).
    pub async fn next_page(&mut self) -> Option<Vec<RawVacancy>> {
        if self.aborted {
            return None;
        }
        if let Some(total) = self.total_pages {
            if self.page >= total {
                return None;
            }
            // Pacing applies to every request after the first.
            tokio::time::sleep(FETCH_DELAY).await;
        }

        let result = self
            .fetcher
            .fetch_page(self.query, self.region_id, self.page, self.per_page)
            .await;
        counter!("fetch_pages_total").increment(1);
        let current = self.page;
        self.page += 1;

        match result {
            Ok(page) => {
                if self.total_pages.is_none() {
                    let total = page.pages.max(1).min(PAGE_CEILING);
                    debug!(
                        region = self.region_id,
                        reported = page.pages,
                        capped = total,
                        found = page.found,
                        "discovered page count"
                    );
                    self.total_pages = Some(total);
                }
                Some(page.items)
            }
            Err(e) if self.total_pages.is_none() => {
                // Cannot determine the page count: abort this region
                // only. Other regions are unaffected.
                warn!(region = self.region_id, error = %e, "first page failed, aborting region");
                counter!("fetch_region_failures_total").increment(1);
                self.aborted = true;
                None
            }
            Err(e) => {
                warn!(region = self.region_id, page = current, error = %e, "page failed, skipping");
                counter!("fetch_page_errors_total").increment(1);
                Some(Vec::new())
            }
        }
    }
}
