// src/fetch/mod.rs
pub mod client;
pub mod paginated;

use async_trait::async_trait;
use serde::Deserialize;

use crate::areas::AreaNode;
use crate::error::AppError;
use crate::model::RawVacancy;

pub use client::HhClient;
pub use paginated::{PaginatedFetcher, FETCH_DELAY, PAGE_CEILING};

/// One page of search results as reported by the upstream API.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VacancyPage {
    #[serde(default)]
    pub items: Vec<RawVacancy>,
    #[serde(default)]
    pub pages: u32,
    #[serde(default)]
    pub found: u64,
}

/// Seam between the pipeline and the HTTP transport. The real client
/// talks to the search API; tests substitute fixture-backed fakes.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_page(
        &self,
        query: &str,
        region_id: i64,
        page: u32,
        per_page: u32,
    ) -> Result<VacancyPage, AppError>;
}

/// Source of the upstream region tree, consumed by the areas endpoint
/// and the region-name cache.
#[async_trait]
pub trait AreaProvider: Send + Sync {
    async fn fetch_areas(&self) -> Result<Vec<AreaNode>, AppError>;
}
