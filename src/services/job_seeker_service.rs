use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::database::job_seeker_repository::JobSeekerRepository;
use crate::dto::job_seeker_dto::JobSeekerPayload;
use crate::error::{Error, Result};
use crate::middleware::auth::CurrentUser;
use crate::models::activity_log::NewActivity;
use crate::models::job_seeker::JobSeeker;
use crate::services::activity_log_service::ActivityLogService;

const ENTITY: &str = "job_seeker";

/// Candidate profiles kept by a recruiter. Only the owner or an administrator
/// may read or change one.
#[derive(Clone)]
pub struct JobSeekerService {
    repo: Arc<dyn JobSeekerRepository>,
    activity: ActivityLogService,
}

impl JobSeekerService {
    pub fn new(repo: Arc<dyn JobSeekerRepository>, activity: ActivityLogService) -> Self {
        Self { repo, activity }
    }

    pub async fn create(&self, actor: &CurrentUser, payload: JobSeekerPayload) -> Result<JobSeeker> {
        let seeker = self.repo.insert(actor.id, &payload).await?;
        info!(job_seeker_id = %seeker.id, "Job seeker created");
        self.activity
            .record(NewActivity::new("job_seeker_created", ENTITY, seeker.id).by(actor.id, actor.display_name()))
            .await;
        Ok(seeker)
    }

    pub async fn update(
        &self,
        actor: &CurrentUser,
        id: Uuid,
        payload: JobSeekerPayload,
    ) -> Result<JobSeeker> {
        self.accessible(actor, id).await?;
        let seeker = self.repo.update(id, &payload).await?;
        self.activity
            .record(NewActivity::new("job_seeker_updated", ENTITY, id).by(actor.id, actor.display_name()))
            .await;
        Ok(seeker)
    }

    pub async fn get(&self, actor: &CurrentUser, id: Uuid) -> Result<JobSeeker> {
        self.accessible(actor, id).await
    }

    pub async fn list(&self, actor: &CurrentUser) -> Result<Vec<JobSeeker>> {
        self.repo.list_by_owner(actor.id).await
    }

    pub async fn delete(&self, actor: &CurrentUser, id: Uuid) -> Result<()> {
        self.accessible(actor, id).await?;
        self.repo.delete(id).await?;
        info!(job_seeker_id = %id, "Job seeker deleted");
        self.activity
            .record(NewActivity::new("job_seeker_deleted", ENTITY, id).by(actor.id, actor.display_name()))
            .await;
        Ok(())
    }

    async fn accessible(&self, actor: &CurrentUser, id: Uuid) -> Result<JobSeeker> {
        let seeker = self
            .repo
            .find(id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Job seeker {} not found", id)))?;
        if seeker.owner_id != actor.id && !actor.is_admin() {
            return Err(Error::Forbidden(
                "This job seeker belongs to another recruiter".to_string(),
            ));
        }
        Ok(seeker)
    }
}
