// src/export.rs
// Pure projection of an AggregationResult into JSON, CSV, or XML. No
// aggregation happens here — only field selection and text escaping.

use std::fmt;
use std::str::FromStr;

use anyhow::{Context, Result};
use quick_xml::events::{BytesDecl, BytesText, Event};
use quick_xml::Writer;

use crate::aggregate::AggregationResult;
use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
    Xml,
}

impl ExportFormat {
    pub fn content_type(self) -> &'static str {
        match self {
            ExportFormat::Json => "application/json",
            ExportFormat::Csv => "text/csv; charset=utf-8",
            ExportFormat::Xml => "application/xml",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            "xml" => Ok(ExportFormat::Xml),
            other => Err(AppError::InvalidRequest(format!(
                "unknown export format '{other}'"
            ))),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
            ExportFormat::Xml => "xml",
        };
        f.write_str(s)
    }
}

/// Render a result in the requested format, annotated with the original
/// query and the resolved region names.
pub fn render(
    format: ExportFormat,
    result: &AggregationResult,
    query: &str,
    region_names: &[String],
) -> Result<String> {
    match format {
        ExportFormat::Json => render_json(result, query, region_names),
        ExportFormat::Csv => render_csv(result, query, region_names),
        ExportFormat::Xml => render_xml(result, query, region_names),
    }
}

fn render_json(result: &AggregationResult, query: &str, region_names: &[String]) -> Result<String> {
    let doc = serde_json::json!({
        "query": query,
        "regions": region_names,
        "generated_at": chrono::Utc::now().to_rfc3339(),
        "result": result,
    });
    serde_json::to_string_pretty(&doc).context("serializing JSON export")
}

fn render_csv(result: &AggregationResult, query: &str, region_names: &[String]) -> Result<String> {
    let mut w = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(Vec::new());

    w.write_record(["query", "regions", "generated_at"])?;
    w.write_record([
        query,
        &region_names.join("; "),
        &chrono::Utc::now().to_rfc3339(),
    ])?;
    w.write_record(["", "", ""])?;

    w.write_record(["metric", "value", ""])?;
    for (name, value) in [
        ("total_vacancies", result.total_vacancies),
        ("unique_vacancies", result.unique_vacancies),
        ("vacancies_with_salary", result.vacancies_with_salary),
        ("vacancies_without_salary", result.vacancies_without_salary),
        ("average_salary", result.average_salary),
        ("median_salary", result.median_salary),
    ] {
        w.write_record([name, &value.to_string(), ""])?;
    }
    for (label, count) in result.salary_ranges.entries() {
        w.write_record([&format!("salary_range {label}"), &count.to_string(), ""])?;
    }
    w.write_record(["", "", ""])?;

    w.write_record([
        "id",
        "name",
        "salary_from",
        "salary_to",
        "currency",
        "employer",
        "area",
        "url",
        "published_at",
    ])?;
    for v in &result.vacancies {
        let (from, to, currency) = match &v.salary {
            Some(s) => (
                s.from.map(|x| x.to_string()).unwrap_or_default(),
                s.to.map(|x| x.to_string()).unwrap_or_default(),
                s.currency.clone().unwrap_or_default(),
            ),
            None => (String::new(), String::new(), String::new()),
        };
        w.write_record([
            &v.id,
            &v.name,
            &from,
            &to,
            &currency,
            &v.employer,
            &v.area,
            &v.url,
            &v.published_at,
        ])?;
    }

    let bytes = w.into_inner().context("flushing CSV export")?;
    String::from_utf8(bytes).context("CSV export is not valid UTF-8")
}

fn render_xml(result: &AggregationResult, query: &str, region_names: &[String]) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    writer
        .create_element("vacancy_stats")
        .with_attribute(("query", query))
        .with_attribute(("generated_at", chrono::Utc::now().to_rfc3339().as_str()))
        .write_inner_content(|w| {
            w.create_element("regions").write_inner_content(|w| {
                for name in region_names {
                    w.create_element("region")
                        .write_text_content(BytesText::new(name))?;
                }
                Ok::<(), quick_xml::Error>(())
            })?;

            w.create_element("summary")
                .with_attribute(("total", result.total_vacancies.to_string().as_str()))
                .with_attribute(("unique", result.unique_vacancies.to_string().as_str()))
                .with_attribute((
                    "with_salary",
                    result.vacancies_with_salary.to_string().as_str(),
                ))
                .with_attribute((
                    "without_salary",
                    result.vacancies_without_salary.to_string().as_str(),
                ))
                .with_attribute(("average_salary", result.average_salary.to_string().as_str()))
                .with_attribute(("median_salary", result.median_salary.to_string().as_str()))
                .write_empty()?;

            w.create_element("salary_ranges").write_inner_content(|w| {
                for (label, count) in result.salary_ranges.entries() {
                    w.create_element("range")
                        .with_attribute(("label", label))
                        .with_attribute(("count", count.to_string().as_str()))
                        .write_empty()?;
                }
                Ok::<(), quick_xml::Error>(())
            })?;

            w.create_element("word_cloud").write_inner_content(|w| {
                for (token, count) in &result.word_cloud {
                    w.create_element("word")
                        .with_attribute(("count", count.to_string().as_str()))
                        .write_text_content(BytesText::new(token))?;
                }
                Ok::<(), quick_xml::Error>(())
            })?;

            w.create_element("vacancies").write_inner_content(|w| {
                for v in &result.vacancies {
                    w.create_element("vacancy")
                        .with_attribute(("id", v.id.as_str()))
                        .write_inner_content(|w| {
                            w.create_element("name")
                                .write_text_content(BytesText::new(&v.name))?;
                            w.create_element("employer")
                                .write_text_content(BytesText::new(&v.employer))?;
                            w.create_element("area")
                                .write_text_content(BytesText::new(&v.area))?;
                            w.create_element("url")
                                .write_text_content(BytesText::new(&v.url))?;
                            w.create_element("published_at")
                                .write_text_content(BytesText::new(&v.published_at))?;
                            if let Some(s) = &v.salary {
                                let from = s.from.map(|x| x.to_string());
                                let to = s.to.map(|x| x.to_string());
                                let mut el = w.create_element("salary");
                                if let Some(f) = from.as_deref() {
                                    el = el.with_attribute(("from", f));
                                }
                                if let Some(t) = to.as_deref() {
                                    el = el.with_attribute(("to", t));
                                }
                                if let Some(c) = s.currency.as_deref() {
                                    el = el.with_attribute(("currency", c));
                                }
                                el.write_empty()?;
                            }
                            Ok::<(), quick_xml::Error>(())
                        })?;
                }
                Ok::<(), quick_xml::Error>(())
            })?;

            Ok::<(), quick_xml::Error>(())
        })
        .context("writing XML export")?;

    String::from_utf8(writer.into_inner()).context("XML export is not valid UTF-8")
}
