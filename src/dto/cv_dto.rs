use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::cv::form::CvForm;
use crate::cv::form_session::{FormSession, StepUpdate};
use crate::cv::lifecycle::CvStatus;
use crate::cv::promotion::SubstitutedDate;
use crate::models::cv::Cv;

/// Body of a CV create or update. `data` is taken as loose JSON: drafts are
/// normalized leniently, completions are parsed and validated strictly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveCvPayload {
    pub status: CvStatus,
    pub data: JsonValue,
    #[serde(default)]
    pub ai_assisted: bool,
    #[serde(default)]
    pub source_job_seeker_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CvListQuery {
    pub status: Option<CvStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatedByResponse {
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CvResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub job_title: String,
    pub status: String,
    pub executive_summary: String,
    pub data: CvForm,
    pub ai_assisted: bool,
    pub source_job_seeker_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub updated_by: Option<UpdatedByResponse>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveCvResponse {
    pub cv: CvResponse,
    /// Dates filled in during completion; empty for drafts.
    pub substituted_dates: Vec<SubstitutedDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateCvResponse {
    pub valid: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStepPayload {
    pub session: FormSession,
    pub update: StepUpdate,
}

impl From<Cv> for CvResponse {
    fn from(value: Cv) -> Self {
        let updated_by = match (value.updated_by_name, value.updated_by_email) {
            (None, None) => None,
            (name, email) => Some(UpdatedByResponse { name, email }),
        };
        Self {
            id: value.id,
            user_id: value.user_id,
            job_title: value.job_title,
            status: value.status,
            executive_summary: value.executive_summary,
            data: value.data.0,
            ai_assisted: value.ai_assisted,
            source_job_seeker_id: value.source_job_seeker_id,
            created_at: value.created_at,
            updated_at: value.updated_at,
            updated_by,
        }
    }
}
