use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::Error;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Application {
    pub id: Uuid,
    pub vacancy_id: Uuid,
    pub applicant_id: Uuid,
    pub applicant_email: Option<String>,
    pub cv_id: Option<Uuid>,
    pub cover_letter: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewApplication {
    pub vacancy_id: Uuid,
    pub applicant_id: Uuid,
    pub applicant_email: Option<String>,
    pub cv_id: Option<Uuid>,
    pub cover_letter: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Reviewed,
    Shortlisted,
    Rejected,
    Hired,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Reviewed => "reviewed",
            ApplicationStatus::Shortlisted => "shortlisted",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::Hired => "hired",
        }
    }

    /// Every review outcome is reachable directly, in any order. An
    /// application never goes back to pending.
    pub fn can_transition_to(&self, next: ApplicationStatus) -> bool {
        next != ApplicationStatus::Pending && *self != next
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ApplicationStatus::Pending),
            "reviewed" => Ok(ApplicationStatus::Reviewed),
            "shortlisted" => Ok(ApplicationStatus::Shortlisted),
            "rejected" => Ok(ApplicationStatus::Rejected),
            "hired" => Ok(ApplicationStatus::Hired),
            other => Err(Error::BadRequest(format!(
                "Unknown application status: {}",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ApplicationStatus::*;

    #[test]
    fn pending_reaches_every_outcome_directly() {
        for next in [Reviewed, Shortlisted, Rejected, Hired] {
            assert!(Pending.can_transition_to(next));
        }
    }

    #[test]
    fn outcomes_can_change_but_never_return_to_pending() {
        assert!(Reviewed.can_transition_to(Shortlisted));
        assert!(Shortlisted.can_transition_to(Hired));
        assert!(!Hired.can_transition_to(Pending));
        assert!(!Rejected.can_transition_to(Rejected));
    }
}
