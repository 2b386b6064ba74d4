// src/aggregate.rs
// The mutable state of one aggregation run and the snapshot type handed
// to callers. One run owns its state exclusively; counters only grow,
// and a snapshot is a complete, consistent copy safe to emit mid-stream.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::dedup::Deduplicator;
use crate::model::{Listing, VacancyView};
use crate::salary::{self, normalized_amount, SalaryAggregator, SalaryRanges};
use crate::wordcloud::{WordFrequency, WORD_CLOUD_LIMIT};

/// Per-region counters mirroring the global ones, plus that region's
/// salary samples for derived statistics.
#[derive(Debug, Default)]
struct RegionStats {
    total: u64,
    with_salary: u64,
    without_salary: u64,
    samples: Vec<f64>,
}

/// Derived per-region block as it appears in a snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionSummary {
    pub total: u64,
    pub with_salary: u64,
    pub without_salary: u64,
    pub average_salary: u64,
    pub median_salary: u64,
}

/// Complete aggregation output: what the stats endpoint returns and
/// what every streaming snapshot carries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregationResult {
    pub total_vacancies: u64,
    pub unique_vacancies: u64,
    pub vacancies_with_salary: u64,
    pub vacancies_without_salary: u64,
    pub average_salary: u64,
    pub median_salary: u64,
    pub word_cloud: BTreeMap<String, u64>,
    pub salary_ranges: SalaryRanges,
    pub area_stats: BTreeMap<String, RegionSummary>,
    pub vacancies: Vec<VacancyView>,
}

impl AggregationResult {
    /// Empty-but-well-formed result: all counters zero, all collections
    /// empty, every bucket present. Returned when no region produced a
    /// single page.
    pub fn empty() -> Self {
        AggregationState::new().snapshot()
    }
}

/// Mutable accumulator for one run. Populated monotonically over the
/// fetch loop and discarded when the request completes.
#[derive(Debug, Default)]
pub struct AggregationState {
    dedup: Deduplicator,
    total: u64,
    with_salary: u64,
    without_salary: u64,
    salary: SalaryAggregator,
    words: WordFrequency,
    per_region: BTreeMap<i64, RegionStats>,
    views: Vec<VacancyView>,
}

impl AggregationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one fetched listing through the dedup gate and, if admitted,
    /// into the salary and word-frequency accumulators. Returns whether
    /// the listing was admitted. `total` counts every occurrence;
    /// `unique` only admitted ones.
    pub fn observe(&mut self, region_id: i64, listing: &Listing) -> bool {
        self.total += 1;
        let region = self.per_region.entry(region_id).or_default();
        region.total += 1;

        if !self.dedup.admit(&listing.id) {
            return false;
        }

        match normalized_amount(listing.salary.as_ref()) {
            Some(amount) => {
                self.with_salary += 1;
                self.salary.observe(amount);
                region.with_salary += 1;
                region.samples.push(amount);
            }
            None => {
                self.without_salary += 1;
                region.without_salary += 1;
            }
        }

        self.words.observe(&listing.name);
        if let Some(req) = &listing.requirement {
            self.words.observe(req);
        }
        if let Some(resp) = &listing.responsibility {
            self.words.observe(resp);
        }

        // Formatting happens once per admitted listing, not per snapshot.
        self.views.push(VacancyView::from(listing));
        true
    }

    pub fn unique_count(&self) -> u64 {
        self.dedup.len() as u64
    }

    /// Consistent copy of the current state for emission.
    pub fn snapshot(&self) -> AggregationResult {
        let area_stats = self
            .per_region
            .iter()
            .map(|(id, r)| {
                (
                    format!("area_{id}"),
                    RegionSummary {
                        total: r.total,
                        with_salary: r.with_salary,
                        without_salary: r.without_salary,
                        average_salary: salary::mean(&r.samples),
                        median_salary: salary::median(&r.samples),
                    },
                )
            })
            .collect();

        AggregationResult {
            total_vacancies: self.total,
            unique_vacancies: self.unique_count(),
            vacancies_with_salary: self.with_salary,
            vacancies_without_salary: self.without_salary,
            average_salary: self.salary.mean(),
            median_salary: self.salary.median(),
            word_cloud: self.words.top(WORD_CLOUD_LIMIT),
            salary_ranges: self.salary.ranges(),
            area_stats,
            vacancies: self.views.clone(),
        }
    }
}
