// tests/api_http.rs
//
// HTTP-level tests for the public API Router without opening sockets.
// We exercise the router directly via tower::ServiceExt::oneshot.
//
// Covered:
// - GET /health
// - POST /api/vacancies/stats (happy path + validation)
// - GET /api/vacancies/export (format negotiation)
// - GET /api/areas (tree passthrough + cache refresh)

mod common;

use std::sync::Arc;

use axum::{
    body::{self, Body},
    http::{Request, StatusCode},
    Router,
};
use common::{page, vacancy, MockHh};
use serde_json::{json, Value as Json};
use tower::ServiceExt as _; // for `oneshot`

use hh_vacancy_analyzer::api::{self, AppState};
use hh_vacancy_analyzer::areas::AreaCache;

const BODY_LIMIT: usize = 1024 * 1024; // 1MB, safe for tests

fn test_router(mock: MockHh, cache_dir: &tempfile::TempDir) -> (Router, Arc<AreaCache>) {
    let areas = Arc::new(AreaCache::load(cache_dir.path().join("areas.json")));
    let state = AppState::new(Arc::new(mock), Arc::clone(&areas));
    (api::router(state), areas)
}

fn seeded_mock() -> MockHh {
    MockHh::new().with_region(
        1,
        vec![page(
            vec![
                vacancy("101", "Rust разработчик", Some(250_000.0), None),
                vacancy("102", "Python разработчик", None, Some(180_000.0)),
            ],
            1,
        )],
    )
}

#[tokio::test]
async fn api_health_returns_200_and_ok_body() {
    let dir = tempfile::tempdir().unwrap();
    let (app, _) = test_router(MockHh::new(), &dir);

    let req = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .expect("build GET /health");

    let resp = app.oneshot(req).await.expect("oneshot /health");
    assert_eq!(resp.status(), StatusCode::OK, "health should be 200");

    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body")
        .to_vec();
    let body = String::from_utf8(bytes).expect("utf8");
    assert_eq!(body.trim(), "ok");
}

#[tokio::test]
async fn api_stats_returns_aggregation_fields() {
    let dir = tempfile::tempdir().unwrap();
    let (app, _) = test_router(seeded_mock(), &dir);

    let payload = json!({ "query": "разработчик", "areas": [1] });
    let req = Request::builder()
        .method("POST")
        .uri("/api/vacancies/stats")
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .expect("build POST /stats");

    let resp = app.oneshot(req).await.expect("oneshot /stats");
    assert!(
        resp.status().is_success(),
        "POST /stats should be 2xx, got {}",
        resp.status()
    );

    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read json")
        .to_vec();
    let v: Json = serde_json::from_slice(&bytes).expect("parse stats json");

    assert_eq!(v["total_vacancies"], 2);
    assert_eq!(v["unique_vacancies"], 2);
    assert_eq!(v["vacancies_with_salary"], 2);
    // 250000 normalizes from the lower bound, 180000 from the upper.
    assert_eq!(v["average_salary"], 215_000);
    assert_eq!(v["salary_ranges"]["250000-300000"], 1);
    assert_eq!(v["salary_ranges"]["150000-200000"], 1);
    assert!(v["word_cloud"].is_object(), "missing word_cloud");
    assert_eq!(v["vacancies"].as_array().map(|a| a.len()), Some(2));
}

#[tokio::test]
async fn api_stats_rejects_empty_query_with_400() {
    let dir = tempfile::tempdir().unwrap();
    let (app, _) = test_router(MockHh::new(), &dir);

    let payload = json!({ "query": "", "areas": [1] });
    let req = Request::builder()
        .method("POST")
        .uri("/api/vacancies/stats")
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap();

    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn api_export_csv_sets_content_type() {
    let dir = tempfile::tempdir().unwrap();
    let (app, _) = test_router(seeded_mock(), &dir);

    let req = Request::builder()
        .method("GET")
        .uri("/api/vacancies/export?query=rust&areas=1&format=csv")
        .body(Body::empty())
        .unwrap();

    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let ct = resp
        .headers()
        .get("content-type")
        .and_then(|h| h.to_str().ok())
        .unwrap_or("");
    assert!(ct.starts_with("text/csv"), "unexpected content type {ct}");

    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .unwrap()
        .to_vec();
    let body = String::from_utf8(bytes).unwrap();
    assert!(body.contains("total_vacancies,2"));
    // Region 1 is unknown to the empty cache: synthetic label.
    assert!(body.contains("Region 1"));
}

#[tokio::test]
async fn api_export_rejects_unknown_format() {
    let dir = tempfile::tempdir().unwrap();
    let (app, _) = test_router(seeded_mock(), &dir);

    let req = Request::builder()
        .method("GET")
        .uri("/api/vacancies/export?query=rust&areas=1&format=yaml")
        .body(Body::empty())
        .unwrap();

    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn api_areas_returns_tree_and_refreshes_cache() {
    let dir = tempfile::tempdir().unwrap();
    let (app, areas) = test_router(MockHh::new(), &dir);
    assert!(areas.is_empty());

    let req = Request::builder()
        .method("GET")
        .uri("/api/areas")
        .body(Body::empty())
        .unwrap();

    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .unwrap()
        .to_vec();
    let tree: Json = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(tree[0]["name"], "Россия");

    // The lookup cache picked the flattened names up.
    assert_eq!(areas.resolve_name(1), "Москва");
    assert_eq!(areas.resolve_name(999), "Region 999");
}

#[tokio::test]
async fn api_stream_rejects_bad_region_list() {
    let dir = tempfile::tempdir().unwrap();
    let (app, _) = test_router(MockHh::new(), &dir);

    let req = Request::builder()
        .method("GET")
        .uri("/api/vacancies/stream?query=rust&areas=1,abc")
        .body(Body::empty())
        .unwrap();

    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
