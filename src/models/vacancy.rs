use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::Error;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Vacancy {
    pub id: Uuid,
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
    pub posted_by: Uuid,
    pub poster_email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VacancyStatus {
    Pending,
    Approved,
    Rejected,
}

impl VacancyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VacancyStatus::Pending => "pending",
            VacancyStatus::Approved => "approved",
            VacancyStatus::Rejected => "rejected",
        }
    }

    /// Review is one step: a pending vacancy is approved or rejected, and
    /// both outcomes are final.
    pub fn can_transition_to(&self, next: VacancyStatus) -> bool {
        matches!(
            (self, next),
            (VacancyStatus::Pending, VacancyStatus::Approved)
                | (VacancyStatus::Pending, VacancyStatus::Rejected)
        )
    }
}

impl fmt::Display for VacancyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VacancyStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(VacancyStatus::Pending),
            "approved" => Ok(VacancyStatus::Approved),
            "rejected" => Ok(VacancyStatus::Rejected),
            other => Err(Error::BadRequest(format!("Unknown vacancy status: {}", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_pending_vacancies_can_be_reviewed() {
        use VacancyStatus::*;
        assert!(Pending.can_transition_to(Approved));
        assert!(Pending.can_transition_to(Rejected));
        assert!(!Pending.can_transition_to(Pending));
        assert!(!Approved.can_transition_to(Rejected));
        assert!(!Rejected.can_transition_to(Approved));
    }

    #[test]
    fn parses_known_statuses_only() {
        assert_eq!("approved".parse::<VacancyStatus>().unwrap(), VacancyStatus::Approved);
        assert!("published".parse::<VacancyStatus>().is_err());
    }
}
