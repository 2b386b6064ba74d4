// src/dedup.rs
// The single gate that keeps a listing from being counted twice when
// upstream pagination shifts between fetches or the same vacancy shows
// up in more than one queried region.

use std::collections::HashSet;

/// Monotonic set of seen listing identifiers for one aggregation run.
/// No removal; O(1) amortized per call.
#[derive(Debug, Default)]
pub struct Deduplicator {
    seen: HashSet<String>,
}

impl Deduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true (and records the id) the first time an id is seen,
    /// false on every later call with the same id.
    pub fn admit(&mut self, id: &str) -> bool {
        self.seen.insert(id.to_string())
    }

    /// Number of distinct ids admitted so far.
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
