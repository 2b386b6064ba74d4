// src/model.rs
// Upstream payload shapes and the validated listing types the pipeline
// works with. Raw types are deliberately permissive (everything optional);
// `Listing::try_from` is the single place that rejects malformed records.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Salary block as the upstream API reports it. Either bound may be
/// absent; a record with both bounds absent counts as *no salary*,
/// not as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalaryRecord {
    pub from: Option<f64>,
    pub to: Option<f64>,
    pub currency: Option<String>,
}

/// Nested `{ "name": ... }` objects (employer, area, schedule, ...).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Named {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Snippet {
    pub requirement: Option<String>,
    pub responsibility: Option<String>,
}

/// One vacancy exactly as it arrives from the search API.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawVacancy {
    pub id: Option<String>,
    pub name: Option<String>,
    pub salary: Option<SalaryRecord>,
    pub employer: Option<Named>,
    pub area: Option<Named>,
    pub snippet: Option<Snippet>,
    pub alternate_url: Option<String>,
    pub published_at: Option<String>,
    pub schedule: Option<Named>,
    pub experience: Option<Named>,
    pub employment: Option<Named>,
}

/// A validated listing. Construction fails only when the upstream record
/// lacks an identifier; everything else degrades to a placeholder at
/// presentation time.
#[derive(Debug, Clone)]
pub struct Listing {
    pub id: String,
    pub name: String,
    pub salary: Option<SalaryRecord>,
    pub employer: Option<String>,
    pub area_name: Option<String>,
    pub url: Option<String>,
    pub requirement: Option<String>,
    pub responsibility: Option<String>,
    pub published_at: Option<String>,
    pub schedule: Option<String>,
    pub experience: Option<String>,
    pub employment: Option<String>,
}

impl TryFrom<RawVacancy> for Listing {
    type Error = AppError;

    fn try_from(raw: RawVacancy) -> Result<Self, Self::Error> {
        let id = match raw.id {
            Some(id) if !id.is_empty() => id,
            _ => return Err(AppError::MalformedListing("missing id".into())),
        };
        let snippet = raw.snippet.unwrap_or_default();
        Ok(Listing {
            id,
            name: raw.name.unwrap_or_default(),
            salary: raw.salary,
            employer: raw.employer.and_then(|n| n.name),
            area_name: raw.area.and_then(|n| n.name),
            url: raw.alternate_url,
            requirement: snippet.requirement,
            responsibility: snippet.responsibility,
            published_at: raw.published_at,
            schedule: raw.schedule.and_then(|n| n.name),
            experience: raw.experience.and_then(|n| n.name),
            employment: raw.employment.and_then(|n| n.name),
        })
    }
}

const NOT_SPECIFIED: &str = "Не указано";
const NO_DESCRIPTION: &str = "Описание отсутствует";

/// Presentation-ready view of one listing, built once per admitted
/// listing (not per snapshot).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VacancyView {
    pub id: String,
    pub name: String,
    pub salary: Option<SalaryRecord>,
    pub employer: String,
    pub area: String,
    pub url: String,
    pub snippet: String,
    pub published_at: String,
    pub schedule: String,
    pub experience: String,
    pub employment: String,
}

impl From<&Listing> for VacancyView {
    fn from(l: &Listing) -> Self {
        let snippet = l
            .requirement
            .as_deref()
            .filter(|s| !s.is_empty())
            .or(l.responsibility.as_deref().filter(|s| !s.is_empty()))
            .unwrap_or(NO_DESCRIPTION);
        VacancyView {
            id: l.id.clone(),
            name: l.name.clone(),
            salary: l.salary.clone(),
            employer: or_placeholder(&l.employer),
            area: or_placeholder(&l.area_name),
            url: l.url.clone().unwrap_or_default(),
            snippet: snippet.to_string(),
            published_at: l.published_at.clone().unwrap_or_default(),
            schedule: or_placeholder(&l.schedule),
            experience: or_placeholder(&l.experience),
            employment: or_placeholder(&l.employment),
        }
    }
}

fn or_placeholder(field: &Option<String>) -> String {
    match field.as_deref() {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => NOT_SPECIFIED.to_string(),
    }
}
