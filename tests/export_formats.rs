// tests/export_formats.rs
// Export rendering is pure projection: same numbers in every format,
// correct escaping, no recomputation.

mod common;

use std::sync::Arc;

use common::{page, vacancy, MockHh};
use hh_vacancy_analyzer::export::{self, ExportFormat};
use hh_vacancy_analyzer::pipeline::Orchestrator;

async fn sample_result() -> hh_vacancy_analyzer::AggregationResult {
    let mock = Arc::new(MockHh::new().with_region(
        1,
        vec![page(
            vec![
                vacancy("101", "C++ & <senior> разработчик", Some(200_000.0), None),
                vacancy("102", "Аналитик, данные", None, None),
            ],
            1,
        )],
    ));
    Orchestrator::new(mock)
        .compute_stats("c++", &[1], 100)
        .await
        .unwrap()
}

#[tokio::test(start_paused = true)]
async fn json_export_wraps_result_with_metadata() {
    let result = sample_result().await;
    let out = export::render(
        ExportFormat::Json,
        &result,
        "c++",
        &["Москва".to_string()],
    )
    .unwrap();

    let v: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(v["query"], "c++");
    assert_eq!(v["regions"][0], "Москва");
    assert_eq!(v["result"]["unique_vacancies"], 2);
    assert_eq!(v["result"]["salary_ranges"]["200000-250000"], 1);
}

#[tokio::test(start_paused = true)]
async fn csv_export_quotes_fields_with_commas() {
    let result = sample_result().await;
    let out = export::render(
        ExportFormat::Csv,
        &result,
        "c++",
        &["Москва".to_string()],
    )
    .unwrap();

    assert!(out.contains("unique_vacancies,2"));
    // "Аналитик, данные" contains a comma and must be quoted.
    assert!(out.contains("\"Аналитик, данные\""));
    assert!(out.lines().any(|l| l.starts_with("id,name,salary_from")));
}

#[tokio::test(start_paused = true)]
async fn xml_export_escapes_markup_characters() {
    let result = sample_result().await;
    let out = export::render(
        ExportFormat::Xml,
        &result,
        "c++",
        &["Москва".to_string()],
    )
    .unwrap();

    assert!(out.starts_with("<?xml"));
    assert!(out.contains("query=\"c++\""));
    // The raw name contained & and <>; both must arrive escaped.
    assert!(out.contains("C++ &amp; &lt;senior&gt; разработчик"));
    assert!(out.contains("<range label=\"200000-250000\" count=\"1\"/>"));
}

#[test]
fn unknown_format_is_an_invalid_request() {
    let err = "yaml".parse::<ExportFormat>().unwrap_err();
    assert!(matches!(
        err,
        hh_vacancy_analyzer::AppError::InvalidRequest(_)
    ));
}
