// tests/common/mod.rs
// Fixture-backed PageFetcher used by the integration suites: scripted
// pages per region plus a call counter, so tests can assert how many
// upstream requests the pipeline actually issued.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;

use hh_vacancy_analyzer::areas::AreaNode;
use hh_vacancy_analyzer::error::AppError;
use hh_vacancy_analyzer::fetch::{AreaProvider, PageFetcher, VacancyPage};
use hh_vacancy_analyzer::model::{Named, RawVacancy, SalaryRecord, Snippet};

pub type PageScript = Vec<Result<VacancyPage, String>>;

#[derive(Default)]
pub struct MockHh {
    regions: HashMap<i64, PageScript>,
    pub calls: AtomicU32,
}

impl MockHh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_region(mut self, region_id: i64, script: PageScript) -> Self {
        self.regions.insert(region_id, script);
        self
    }

    pub fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageFetcher for MockHh {
    async fn fetch_page(
        &self,
        _query: &str,
        region_id: i64,
        page: u32,
        _per_page: u32,
    ) -> Result<VacancyPage, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self
            .regions
            .get(&region_id)
            .and_then(|script| script.get(page as usize))
        {
            Some(Ok(p)) => Ok(p.clone()),
            Some(Err(msg)) => Err(AppError::Upstream(msg.clone())),
            None => Err(AppError::Upstream(format!(
                "no fixture for region {region_id} page {page}"
            ))),
        }
    }
}

#[async_trait]
impl AreaProvider for MockHh {
    async fn fetch_areas(&self) -> Result<Vec<AreaNode>, AppError> {
        Ok(vec![AreaNode {
            id: "113".into(),
            name: "Россия".into(),
            areas: vec![
                AreaNode {
                    id: "1".into(),
                    name: "Москва".into(),
                    areas: vec![],
                },
                AreaNode {
                    id: "2".into(),
                    name: "Санкт-Петербург".into(),
                    areas: vec![],
                },
            ],
        }])
    }
}

pub fn vacancy(id: &str, name: &str, from: Option<f64>, to: Option<f64>) -> RawVacancy {
    RawVacancy {
        id: Some(id.to_string()),
        name: Some(name.to_string()),
        salary: match (from, to) {
            (None, None) => None,
            _ => Some(SalaryRecord {
                from,
                to,
                currency: Some("RUR".into()),
            }),
        },
        employer: Some(Named {
            name: Some("Рога и Копыта".into()),
        }),
        snippet: Some(Snippet {
            requirement: Some("Опыт работы с Python и Docker".into()),
            responsibility: None,
        }),
        ..RawVacancy::default()
    }
}

pub fn page(items: Vec<RawVacancy>, pages: u32) -> Result<VacancyPage, String> {
    let found = items.len() as u64;
    Ok(VacancyPage {
        items,
        pages,
        found,
    })
}

pub fn failed_page(msg: &str) -> Result<VacancyPage, String> {
    Err(msg.to_string())
}
