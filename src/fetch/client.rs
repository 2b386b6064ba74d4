// src/fetch/client.rs
// Real HTTP transport for the HeadHunter API. Thin by design: build the
// request, check the status, deserialize. All failure modes collapse to
// `AppError::Upstream`; the pipeline decides what to do with them.

use async_trait::async_trait;
use std::time::Duration;

use crate::areas::AreaNode;
use crate::config::Settings;
use crate::error::AppError;
use crate::fetch::{AreaProvider, PageFetcher, VacancyPage};

pub struct HhClient {
    http: reqwest::Client,
    base_url: String,
}

impl HhClient {
    pub fn new(settings: &Settings) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.upstream_timeout_secs))
            .user_agent(settings.user_agent.clone())
            .build()?;
        Ok(Self {
            http,
            base_url: settings.upstream_base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl PageFetcher for HhClient {
    async fn fetch_page(
        &self,
        query: &str,
        region_id: i64,
        page: u32,
        per_page: u32,
    ) -> Result<VacancyPage, AppError> {
        let url = format!("{}/vacancies", self.base_url);
        let resp = self
            .http
            .get(&url)
            .query(&[
                ("text", query),
                ("area", &region_id.to_string()),
                ("page", &page.to_string()),
                ("per_page", &per_page.to_string()),
            ])
            .send()
            .await?
            .error_for_status()?;
        let page: VacancyPage = resp.json().await?;
        Ok(page)
    }
}

#[async_trait]
impl AreaProvider for HhClient {
    async fn fetch_areas(&self) -> Result<Vec<AreaNode>, AppError> {
        let url = format!("{}/areas", self.base_url);
        let resp = self.http.get(&url).send().await?.error_for_status()?;
        let tree: Vec<AreaNode> = resp.json().await?;
        Ok(tree)
    }
}
