// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod aggregate;
pub mod api;
pub mod areas;
pub mod config;
pub mod dedup;
pub mod error;
pub mod export;
pub mod fetch;
pub mod metrics;
pub mod model;
pub mod pipeline;
pub mod salary;
pub mod wordcloud;

// ---- Re-exports for stable public API ----
pub use crate::aggregate::{AggregationResult, AggregationState};
pub use crate::api::{router, AppState};
pub use crate::error::AppError;
pub use crate::pipeline::Orchestrator;
