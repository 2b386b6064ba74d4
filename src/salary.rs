// src/salary.rs
// Salary normalization and running aggregation: one comparable amount
// per listing, running samples for mean/median, and a fixed-bucket
// histogram. All currencies are pooled without conversion; that is a
// known limitation inherited from the upstream data, not a bug to fix
// here.

use serde::{Deserialize, Serialize};

use crate::model::SalaryRecord;

/// Single representative amount for a salary record: the lower bound if
/// present, else the upper bound, else no sample at all. A record with
/// both bounds absent is *no salary*, never zero.
pub fn normalized_amount(salary: Option<&SalaryRecord>) -> Option<f64> {
    let s = salary?;
    s.from.or(s.to)
}

/// Fixed, contiguous, half-open salary buckets. Inclusive lower bound,
/// exclusive upper bound; exactly 300000 lands in the open-ended top
/// bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryRanges {
    #[serde(rename = "0-50000")]
    pub r0_50: u64,
    #[serde(rename = "50000-100000")]
    pub r50_100: u64,
    #[serde(rename = "100000-150000")]
    pub r100_150: u64,
    #[serde(rename = "150000-200000")]
    pub r150_200: u64,
    #[serde(rename = "200000-250000")]
    pub r200_250: u64,
    #[serde(rename = "250000-300000")]
    pub r250_300: u64,
    #[serde(rename = "300000+")]
    pub r300_plus: u64,
}

impl SalaryRanges {
    fn slot(&mut self, amount: f64) -> &mut u64 {
        if amount < 50_000.0 {
            &mut self.r0_50
        } else if amount < 100_000.0 {
            &mut self.r50_100
        } else if amount < 150_000.0 {
            &mut self.r100_150
        } else if amount < 200_000.0 {
            &mut self.r150_200
        } else if amount < 250_000.0 {
            &mut self.r200_250
        } else if amount < 300_000.0 {
            &mut self.r250_300
        } else {
            &mut self.r300_plus
        }
    }

    /// Label/count pairs in bucket order, for tabular exports.
    pub fn entries(&self) -> [(&'static str, u64); 7] {
        [
            ("0-50000", self.r0_50),
            ("50000-100000", self.r50_100),
            ("100000-150000", self.r100_150),
            ("150000-200000", self.r150_200),
            ("200000-250000", self.r200_250),
            ("250000-300000", self.r250_300),
            ("300000+", self.r300_plus),
        ]
    }

    pub fn total(&self) -> u64 {
        self.r0_50
            + self.r50_100
            + self.r100_150
            + self.r150_200
            + self.r200_250
            + self.r250_300
            + self.r300_plus
    }
}

/// Running salary statistics for one aggregation run. Samples are kept
/// in discovery order; the median sort happens at read time, not write
/// time.
#[derive(Debug, Default)]
pub struct SalaryAggregator {
    samples: Vec<f64>,
    ranges: SalaryRanges,
}

impl SalaryAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one normalized amount: appends the sample and increments
    /// exactly one bucket.
    pub fn observe(&mut self, amount: f64) {
        self.samples.push(amount);
        *self.ranges.slot(amount) += 1;
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    /// Arithmetic mean rounded to the nearest integer; 0 when empty.
    pub fn mean(&self) -> u64 {
        mean(&self.samples)
    }

    /// Element at index `n/2` of the ascending-sorted samples — for even
    /// n this is the upper-middle element, not the average of the two
    /// middle ones. That tie-break is load-bearing for compatibility
    /// with existing consumers. 0 when empty.
    pub fn median(&self) -> u64 {
        median(&self.samples)
    }

    pub fn ranges(&self) -> SalaryRanges {
        self.ranges.clone()
    }
}

pub(crate) fn mean(samples: &[f64]) -> u64 {
    if samples.is_empty() {
        return 0;
    }
    let sum: f64 = samples.iter().sum();
    (sum / samples.len() as f64).round() as u64
}

pub(crate) fn median(samples: &[f64]) -> u64 {
    if samples.is_empty() {
        return 0;
    }
    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    sorted[sorted.len() / 2].round() as u64
}
