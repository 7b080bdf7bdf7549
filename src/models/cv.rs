use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::cv::form::CvForm;
use crate::cv::lifecycle::CvStatus;
use crate::error::Result;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Cv {
    pub id: Uuid,
    pub user_id: Uuid,
    pub job_title: String,
    pub status: String,
    pub executive_summary: String,
    pub data: Json<CvForm>,
    pub ai_assisted: bool,
    pub source_job_seeker_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub updated_by_name: Option<String>,
    pub updated_by_email: Option<String>,
}

impl Cv {
    pub fn status(&self) -> Result<CvStatus> {
        self.status.parse()
    }

    pub fn form(&self) -> &CvForm {
        &self.data.0
    }

    pub fn is_completed(&self) -> bool {
        matches!(self.status(), Ok(CvStatus::Completed))
    }

    /// Suggested file name for exported documents.
    pub fn document_name(&self) -> String {
        let info = &self.form().personal_info;
        let name: String = format!("{} {}", info.first_name.trim(), info.last_name.trim())
            .trim()
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { '_' })
            .collect();
        if name.is_empty() {
            format!("cv_{}", self.id)
        } else {
            format!("{}_CV", name)
        }
    }
}

/// Who last touched a CV, denormalized for display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdatedBy {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Column values written on every CV insert or update.
#[derive(Debug, Clone, PartialEq)]
pub struct CvWrite {
    pub status: CvStatus,
    pub data: CvForm,
    pub ai_assisted: bool,
    pub source_job_seeker_id: Option<Uuid>,
    pub updated_by: UpdatedBy,
}
