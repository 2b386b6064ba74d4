use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::sse::{Event, KeepAlive, Sse},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use futures::{Stream, StreamExt};
use serde::Deserialize;
use tower_http::cors::CorsLayer;
use tracing::error;

use crate::aggregate::AggregationResult;
use crate::areas::{AreaCache, AreaNode};
use crate::error::AppError;
use crate::export::{self, ExportFormat};
use crate::fetch::{AreaProvider, PageFetcher};
use crate::pipeline::{Orchestrator, DEFAULT_PER_PAGE};

pub struct AppState<C: PageFetcher + AreaProvider + 'static> {
    pub client: Arc<C>,
    pub areas: Arc<AreaCache>,
}

impl<C: PageFetcher + AreaProvider + 'static> Clone for AppState<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            areas: Arc::clone(&self.areas),
        }
    }
}

impl<C: PageFetcher + AreaProvider + 'static> AppState<C> {
    pub fn new(client: Arc<C>, areas: Arc<AreaCache>) -> Self {
        Self { client, areas }
    }

    fn orchestrator(&self) -> Orchestrator<C> {
        Orchestrator::new(Arc::clone(&self.client))
    }
}

pub fn router<C: PageFetcher + AreaProvider + 'static>(state: AppState<C>) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/api/vacancies/stats", post(vacancy_stats))
        .route("/api/vacancies/stream", get(stream_vacancies))
        .route("/api/vacancies/export", get(export_stats))
        .route("/api/areas", get(get_areas))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

fn default_per_page() -> u32 {
    DEFAULT_PER_PAGE
}

#[derive(Deserialize)]
struct SearchBody {
    query: String,
    areas: Vec<i64>,
    #[serde(default = "default_per_page")]
    per_page: u32,
}

async fn vacancy_stats<C: PageFetcher + AreaProvider + 'static>(
    State(state): State<AppState<C>>,
    Json(body): Json<SearchBody>,
) -> Result<Json<AggregationResult>, AppError> {
    let result = state
        .orchestrator()
        .compute_stats(&body.query, &body.areas, body.per_page)
        .await?;
    Ok(Json(result))
}

#[derive(Deserialize)]
struct StreamParams {
    query: String,
    /// Comma-separated region ids, e.g. `areas=1,2`.
    areas: String,
    #[serde(default = "default_per_page")]
    per_page: u32,
}

fn parse_area_list(raw: &str) -> Result<Vec<i64>, AppError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<i64>()
                .map_err(|_| AppError::InvalidRequest(format!("invalid region id '{s}'")))
        })
        .collect()
}

async fn stream_vacancies<C: PageFetcher + AreaProvider + 'static>(
    State(state): State<AppState<C>>,
    Query(params): Query<StreamParams>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    let region_ids = parse_area_list(&params.areas)?;
    let snapshots =
        state
            .orchestrator()
            .stream_stats(params.query, region_ids, params.per_page)?;

    let events = snapshots.map(|snapshot| {
        Ok(Event::default()
            .json_data(&snapshot)
            .unwrap_or_else(|_| Event::default().data("{}")))
    });
    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}

#[derive(Deserialize)]
struct ExportParams {
    query: String,
    areas: String,
    #[serde(default)]
    format: Option<String>,
    #[serde(default = "default_per_page")]
    per_page: u32,
}

async fn export_stats<C: PageFetcher + AreaProvider + 'static>(
    State(state): State<AppState<C>>,
    Query(params): Query<ExportParams>,
) -> Result<Response, AppError> {
    let format: ExportFormat = params.format.as_deref().unwrap_or("json").parse()?;
    let region_ids = parse_area_list(&params.areas)?;

    let result = state
        .orchestrator()
        .compute_stats(&params.query, &region_ids, params.per_page)
        .await?;

    let region_names: Vec<String> = region_ids
        .iter()
        .map(|&id| state.areas.resolve_name(id))
        .collect();

    match export::render(format, &result, &params.query, &region_names) {
        Ok(body) => Ok((
            [
                (header::CONTENT_TYPE, format.content_type().to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"vacancy_stats.{format}\""),
                ),
            ],
            body,
        )
            .into_response()),
        Err(e) => {
            error!(error = %e, "export rendering failed");
            Ok(StatusCode::INTERNAL_SERVER_ERROR.into_response())
        }
    }
}

async fn get_areas<C: PageFetcher + AreaProvider + 'static>(
    State(state): State<AppState<C>>,
) -> Result<Json<Vec<AreaNode>>, AppError> {
    let tree = state.client.fetch_areas().await?;
    state.areas.update_from_tree(&tree);
    Ok(Json(tree))
}
