use serde_json::Value as JsonValue;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::cv::external::{to_external_payload, ExternalCvPayload};
use crate::cv::form::CvForm;
use crate::cv::lenient::normalize_lenient;
use crate::cv::lifecycle::{ensure_owner, plan_save, CvStatus, SaveAction};
use crate::cv::promotion::{promote, SubstitutedDate};
use crate::cv::strict::parse_form;
use crate::database::cv_repository::CvRepository;
use crate::database::job_seeker_repository::JobSeekerRepository;
use crate::dto::cv_dto::SaveCvPayload;
use crate::error::{Error, Result};
use crate::middleware::auth::CurrentUser;
use crate::models::activity_log::NewActivity;
use crate::models::cv::{Cv, CvWrite, UpdatedBy};
use crate::services::activity_log_service::ActivityLogService;
use crate::utils::time::today;

const ENTITY: &str = "cv";

#[derive(Debug, Clone)]
pub struct SavedCv {
    pub cv: Cv,
    pub substituted_dates: Vec<SubstitutedDate>,
}

#[derive(Clone)]
pub struct CvService {
    cvs: Arc<dyn CvRepository>,
    job_seekers: Arc<dyn JobSeekerRepository>,
    activity: ActivityLogService,
}

impl CvService {
    pub fn new(
        cvs: Arc<dyn CvRepository>,
        job_seekers: Arc<dyn JobSeekerRepository>,
        activity: ActivityLogService,
    ) -> Self {
        Self {
            cvs,
            job_seekers,
            activity,
        }
    }

    pub async fn create(&self, actor: &CurrentUser, payload: SaveCvPayload) -> Result<SavedCv> {
        let action = plan_save(None, payload.status)?;
        let (data, substituted_dates) = build_form(action, &payload.data)?;
        self.check_job_seeker(payload.source_job_seeker_id).await?;

        let write = CvWrite {
            status: payload.status,
            data,
            ai_assisted: payload.ai_assisted,
            source_job_seeker_id: payload.source_job_seeker_id,
            updated_by: updated_by(actor),
        };
        let cv = self.cvs.insert(actor.id, &write).await?;
        info!(cv_id = %cv.id, status = %cv.status, ai_assisted = cv.ai_assisted, "CV created");

        let action_name = match payload.status {
            CvStatus::Draft => "cv_created",
            CvStatus::Completed => "cv_completed",
        };
        self.activity
            .record(
                NewActivity::new(action_name, ENTITY, cv.id)
                    .by(actor.id, actor.display_name())
                    .with_new_status(payload.status.as_str()),
            )
            .await;

        Ok(SavedCv {
            cv,
            substituted_dates,
        })
    }

    /// Saves new data over an existing CV. A completed CV is re-validated
    /// and stays completed.
    pub async fn update(
        &self,
        actor: &CurrentUser,
        id: Uuid,
        payload: SaveCvPayload,
    ) -> Result<SavedCv> {
        let existing = self.owned(actor, id).await?;
        let current = existing.status()?;
        let action = plan_save(Some(current), payload.status)?;
        let (data, substituted_dates) = build_form(action, &payload.data)?;
        self.check_job_seeker(payload.source_job_seeker_id).await?;

        let write = CvWrite {
            status: payload.status,
            data,
            ai_assisted: existing.ai_assisted,
            source_job_seeker_id: payload.source_job_seeker_id,
            updated_by: updated_by(actor),
        };
        let cv = self.cvs.update(id, &write).await?;
        info!(cv_id = %cv.id, status = %cv.status, "CV updated");

        let entry = if current != payload.status {
            NewActivity::new("cv_completed", ENTITY, cv.id)
                .transition(current.as_str(), payload.status.as_str())
        } else {
            NewActivity::new("cv_updated", ENTITY, cv.id)
        };
        self.activity
            .record(entry.by(actor.id, actor.display_name()))
            .await;

        Ok(SavedCv {
            cv,
            substituted_dates,
        })
    }

    pub async fn get(&self, actor: &CurrentUser, id: Uuid) -> Result<Cv> {
        self.owned(actor, id).await
    }

    pub async fn list(&self, actor: &CurrentUser, status: Option<CvStatus>) -> Result<Vec<Cv>> {
        self.cvs.list_by_owner(actor.id, status).await
    }

    pub async fn delete(&self, actor: &CurrentUser, id: Uuid) -> Result<()> {
        let existing = self.owned(actor, id).await?;
        self.cvs.delete(id).await?;
        info!(cv_id = %id, "CV deleted");

        self.activity
            .record(
                NewActivity::new("cv_deleted", ENTITY, id)
                    .by(actor.id, actor.display_name())
                    .with_previous_status(&existing.status),
            )
            .await;
        Ok(())
    }

    /// The document-service payload for one of the caller's completed CVs.
    pub async fn external_payload(
        &self,
        actor: &CurrentUser,
        id: Uuid,
    ) -> Result<(Cv, ExternalCvPayload)> {
        let cv = self.owned(actor, id).await?;
        if !cv.is_completed() {
            return Err(Error::Conflict(
                "Only completed CVs can be exported".to_string(),
            ));
        }
        let payload = to_external_payload(cv.form());
        Ok((cv, payload))
    }

    /// Runs the completion rules without saving anything.
    pub fn dry_run(data: &JsonValue) -> Result<()> {
        build_form(SaveAction::Complete, data)?;
        Ok(())
    }

    async fn owned(&self, actor: &CurrentUser, id: Uuid) -> Result<Cv> {
        let cv = self
            .cvs
            .find(id)
            .await?
            .ok_or_else(|| Error::NotFound("CV not found".to_string()))?;
        ensure_owner(cv.user_id, actor.id)?;
        Ok(cv)
    }

    async fn check_job_seeker(&self, id: Option<Uuid>) -> Result<()> {
        let Some(id) = id else { return Ok(()) };
        if self.job_seekers.find(id).await?.is_none() {
            return Err(Error::NotFound(format!("Job seeker {} not found", id)));
        }
        Ok(())
    }
}

fn build_form(action: SaveAction, data: &JsonValue) -> Result<(CvForm, Vec<SubstitutedDate>)> {
    match action {
        SaveAction::StoreDraft => Ok((normalize_lenient(data), Vec::new())),
        SaveAction::Complete => {
            let form = parse_form(data)?;
            let promotion = promote(form, today())?;
            Ok((promotion.form, promotion.substituted_dates))
        }
    }
}

fn updated_by(actor: &CurrentUser) -> UpdatedBy {
    UpdatedBy {
        name: actor.name.clone(),
        email: actor.email.clone(),
    }
}
