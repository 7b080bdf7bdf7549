use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::vacancy::{Vacancy, VacancyStatus};
use crate::services::vacancy_service::VacancyList;

const PUBLIC_SUMMARY_CHARS: usize = 320;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_create_salary_range"))]
pub struct CreateVacancyPayload {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1))]
    pub company: String,
    #[validate(length(min = 1))]
    pub location: String,
    pub employment_type: Option<String>,
    pub salary_from: Option<Decimal>,
    pub salary_to: Option<Decimal>,
    pub currency: Option<String>,
    #[validate(length(min = 1))]
    pub description: Option<String>,
    pub requirements: Option<String>,
    #[validate(email)]
    pub contact_email: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_update_salary_range"))]
pub struct UpdateVacancyPayload {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(min = 1))]
    pub company: Option<String>,
    #[validate(length(min = 1))]
    pub location: Option<String>,
    pub employment_type: Option<String>,
    pub salary_from: Option<Decimal>,
    pub salary_to: Option<Decimal>,
    pub currency: Option<String>,
    #[validate(length(min = 1))]
    pub description: Option<String>,
    pub requirements: Option<String>,
    #[validate(email)]
    pub contact_email: Option<String>,
}

fn validate_create_salary_range(
    payload: &CreateVacancyPayload,
) -> Result<(), ValidationError> {
    check_salary_range(payload.salary_from, payload.salary_to)
}

fn validate_update_salary_range(
    payload: &UpdateVacancyPayload,
) -> Result<(), ValidationError> {
    check_salary_range(payload.salary_from, payload.salary_to)
}

fn check_salary_range(from: Option<Decimal>, to: Option<Decimal>) -> Result<(), ValidationError> {
    let negative = [from, to]
        .iter()
        .flatten()
        .any(|value| value.is_sign_negative());
    if negative {
        let mut err = ValidationError::new("salary_range");
        err.message = Some("Salary must not be negative".into());
        return Err(err);
    }
    if let (Some(from), Some(to)) = (from, to) {
        if from > to {
            let mut err = ValidationError::new("salary_range");
            err.message = Some("salary_from must not exceed salary_to".into());
            return Err(err);
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VacancyStatusPayload {
    pub status: VacancyStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VacancyResponse {
    pub id: uuid::Uuid,
    pub title: String,
    pub company: String,
    pub location: String,
    pub employment_type: Option<String>,
    pub salary_from: Option<Decimal>,
    pub salary_to: Option<Decimal>,
    pub currency: Option<String>,
    pub description: Option<String>,
    pub requirements: Option<String>,
    pub contact_email: Option<String>,
    pub status: String,
    pub posted_by: uuid::Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VacancyPublicSummary {
    pub id: uuid::Uuid,
    pub title: String,
    pub company: String,
    pub location: String,
    pub employment_type: Option<String>,
    pub salary_from: Option<Decimal>,
    pub salary_to: Option<Decimal>,
    pub currency: Option<String>,
    pub summary: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VacancyListResponse {
    pub items: Vec<VacancyResponse>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub total_pages: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VacancyPublicListResponse {
    pub items: Vec<VacancyPublicSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct VacancyListQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub status: Option<VacancyStatus>,
    pub company: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct VacancyPublicQuery {
    pub limit: Option<i64>,
}

impl From<Vacancy> for VacancyResponse {
    fn from(value: Vacancy) -> Self {
        Self {
            id: value.id,
            title: value.title,
            company: value.company,
            location: value.location,
            employment_type: value.employment_type,
            salary_from: value.salary_from,
            salary_to: value.salary_to,
            currency: value.currency,
            description: value.description,
            requirements: value.requirements,
            contact_email: value.contact_email,
            status: value.status,
            posted_by: value.posted_by,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl From<Vacancy> for VacancyPublicSummary {
    fn from(value: Vacancy) -> Self {
        let summary = value
            .description
            .as_ref()
            .or(value.requirements.as_ref())
            .map(|text| {
                let trimmed = text.trim();
                if trimmed.chars().count() > PUBLIC_SUMMARY_CHARS {
                    format!(
                        "{}\u{2026}",
                        trimmed.chars().take(PUBLIC_SUMMARY_CHARS).collect::<String>()
                    )
                } else {
                    trimmed.to_string()
                }
            });

        Self {
            id: value.id,
            title: value.title,
            company: value.company,
            location: value.location,
            employment_type: value.employment_type,
            salary_from: value.salary_from,
            salary_to: value.salary_to,
            currency: value.currency,
            summary,
            created_at: value.created_at,
        }
    }
}

impl From<VacancyList> for VacancyListResponse {
    fn from(value: VacancyList) -> Self {
        Self {
            items: value.items.into_iter().map(Into::into).collect(),
            total: value.total,
            page: value.page,
            per_page: value.per_page,
            total_pages: value.total_pages,
        }
    }
}
