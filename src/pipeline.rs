// src/pipeline.rs
// The orchestrator: iterates regions in caller order, drives a
// paginated fetch per region, and funnels every listing through the
// dedup gate into the aggregators. One logical request is one
// sequential pipeline — regions one at a time, pages one at a time,
// the inter-request delay as the backpressure mechanism.

use std::sync::Arc;

use futures::Stream;
use metrics::{counter, describe_counter};
use once_cell::sync::OnceCell;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::aggregate::{AggregationResult, AggregationState};
use crate::error::AppError;
use crate::fetch::{PageFetcher, PaginatedFetcher};
use crate::model::{Listing, RawVacancy};

pub const DEFAULT_PER_PAGE: u32 = 100;

/// Snapshot channel depth for streaming mode. Small on purpose: a slow
/// consumer slows the fetch loop instead of piling up copies.
const STREAM_BUFFER: usize = 8;

fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("fetch_pages_total", "Upstream page requests issued.");
        describe_counter!("fetch_page_errors_total", "Pages skipped after a fetch failure.");
        describe_counter!(
            "fetch_region_failures_total",
            "Regions aborted because their first page failed."
        );
        describe_counter!("vacancies_fetched_total", "Listings delivered by the fetcher.");
        describe_counter!("vacancies_admitted_total", "Listings past the dedup gate.");
        describe_counter!("vacancies_duplicate_total", "Listings rejected as duplicates.");
        describe_counter!("vacancies_malformed_total", "Listings dropped as malformed.");
    });
}

pub struct Orchestrator<F: PageFetcher + 'static> {
    fetcher: Arc<F>,
}

impl<F: PageFetcher + 'static> Clone for Orchestrator<F> {
    fn clone(&self) -> Self {
        Self {
            fetcher: Arc::clone(&self.fetcher),
        }
    }
}

impl<F: PageFetcher + 'static> Orchestrator<F> {
    pub fn new(fetcher: Arc<F>) -> Self {
        ensure_metrics_described();
        Self { fetcher }
    }

    fn validate(query: &str, region_ids: &[i64]) -> Result<(), AppError> {
        if query.trim().is_empty() {
            return Err(AppError::InvalidRequest("query must not be empty".into()));
        }
        if region_ids.is_empty() {
            return Err(AppError::InvalidRequest(
                "at least one region id is required".into(),
            ));
        }
        Ok(())
    }

    /// Batch mode: one final result after every region is exhausted (or
    /// has failed independently). Never errors on upstream degradation —
    /// if every region's first page fails the result is simply empty.
    pub async fn compute_stats(
        &self,
        query: &str,
        region_ids: &[i64],
        per_page: u32,
    ) -> Result<AggregationResult, AppError> {
        Self::validate(query, region_ids)?;

        let mut state = AggregationState::new();
        for &region_id in region_ids {
            let mut pages = PaginatedFetcher::new(self.fetcher.as_ref(), query, region_id, per_page);
            while let Some(batch) = pages.next_page().await {
                absorb_batch(&mut state, region_id, batch);
            }
        }

        let result = state.snapshot();
        info!(
            query,
            regions = region_ids.len(),
            total = result.total_vacancies,
            unique = result.unique_vacancies,
            "aggregation finished"
        );
        Ok(result)
    }

    /// Streaming mode: an initial empty snapshot, then one snapshot per
    /// processed page, ending after the last page of the last region.
    /// Dropping the stream stops the fetch loop at the next page
    /// boundary.
    pub fn stream_stats(
        &self,
        query: String,
        region_ids: Vec<i64>,
        per_page: u32,
    ) -> Result<impl Stream<Item = AggregationResult>, AppError> {
        Self::validate(&query, &region_ids)?;

        let (tx, mut rx) = mpsc::channel::<AggregationResult>(STREAM_BUFFER);
        let fetcher = Arc::clone(&self.fetcher);

        tokio::spawn(async move {
            let mut state = AggregationState::new();
            if tx.send(state.snapshot()).await.is_err() {
                return;
            }
            'regions: for &region_id in &region_ids {
                let mut pages =
                    PaginatedFetcher::new(fetcher.as_ref(), &query, region_id, per_page);
                loop {
                    // Cancellation check sits at the top of each page
                    // iteration, never mid-fetch.
                    if tx.is_closed() {
                        info!(query = %query, "stream consumer gone, stopping fetch");
                        break 'regions;
                    }
                    let Some(batch) = pages.next_page().await else {
                        break;
                    };
                    absorb_batch(&mut state, region_id, batch);
                    if tx.send(state.snapshot()).await.is_err() {
                        break 'regions;
                    }
                }
            }
        });

        Ok(futures::stream::poll_fn(move |cx| rx.poll_recv(cx)))
    }
}

/// Feed one page worth of raw listings into the state. A malformed
/// record is dropped on its own; it cannot unwind the page, the region,
/// or the run.
fn absorb_batch(state: &mut AggregationState, region_id: i64, batch: Vec<RawVacancy>) {
    for raw in batch {
        counter!("vacancies_fetched_total").increment(1);
        match Listing::try_from(raw) {
            Ok(listing) => {
                if state.observe(region_id, &listing) {
                    counter!("vacancies_admitted_total").increment(1);
                } else {
                    counter!("vacancies_duplicate_total").increment(1);
                }
            }
            Err(e) => {
                warn!(region = region_id, error = %e, "dropping malformed listing");
                counter!("vacancies_malformed_total").increment(1);
            }
        }
    }
}
