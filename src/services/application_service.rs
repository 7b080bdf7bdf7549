use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::cv::lifecycle::ensure_owner;
use crate::database::application_repository::ApplicationRepository;
use crate::database::cv_repository::CvRepository;
use crate::database::vacancy_repository::VacancyRepository;
use crate::dto::application_dto::{ApplicationListQuery, ApplyPayload};
use crate::error::{Error, Result};
use crate::middleware::auth::CurrentUser;
use crate::models::activity_log::NewActivity;
use crate::models::application::{Application, ApplicationStatus, NewApplication};
use crate::models::vacancy::VacancyStatus;
use crate::services::activity_log_service::ActivityLogService;
use crate::services::bulk::{run_sequential, BulkOutcome};
use crate::services::notification_service::NotificationService;

const ENTITY: &str = "application";

#[derive(Clone)]
pub struct ApplicationService {
    applications: Arc<dyn ApplicationRepository>,
    vacancies: Arc<dyn VacancyRepository>,
    cvs: Arc<dyn CvRepository>,
    activity: ActivityLogService,
    notifications: NotificationService,
}

impl ApplicationService {
    pub fn new(
        applications: Arc<dyn ApplicationRepository>,
        vacancies: Arc<dyn VacancyRepository>,
        cvs: Arc<dyn CvRepository>,
        activity: ActivityLogService,
        notifications: NotificationService,
    ) -> Self {
        Self {
            applications,
            vacancies,
            cvs,
            activity,
            notifications,
        }
    }

    /// Applies to an approved vacancy, optionally attaching one of the
    /// applicant's completed CVs. One application per vacancy and applicant.
    pub async fn apply(&self, actor: &CurrentUser, payload: ApplyPayload) -> Result<Application> {
        let vacancy = self
            .vacancies
            .find(payload.vacancy_id)
            .await?
            .ok_or_else(|| Error::NotFound("Vacancy not found".to_string()))?;
        if vacancy.status != VacancyStatus::Approved.as_str() {
            return Err(Error::Conflict(
                "This vacancy is not open for applications".to_string(),
            ));
        }

        if let Some(cv_id) = payload.cv_id {
            let cv = self
                .cvs
                .find(cv_id)
                .await?
                .ok_or_else(|| Error::NotFound(format!("CV {} not found", cv_id)))?;
            ensure_owner(cv.user_id, actor.id)?;
            if !cv.is_completed() {
                return Err(Error::Conflict(
                    "Only a completed CV can be attached to an application".to_string(),
                ));
            }
        }

        if self
            .applications
            .find_for(vacancy.id, actor.id)
            .await?
            .is_some()
        {
            return Err(Error::Conflict(
                "You have already applied to this vacancy".to_string(),
            ));
        }

        let application = self
            .applications
            .insert(&NewApplication {
                vacancy_id: vacancy.id,
                applicant_id: actor.id,
                applicant_email: actor.email.clone(),
                cv_id: payload.cv_id,
                cover_letter: payload.cover_letter,
            })
            .await?;
        info!(application_id = %application.id, vacancy_id = %vacancy.id, "Application submitted");

        self.activity
            .record(
                NewActivity::new("application_submitted", ENTITY, application.id)
                    .by(actor.id, actor.display_name())
                    .with_new_status(&application.status),
            )
            .await;
        Ok(application)
    }

    /// Applicants only ever see their own applications.
    pub async fn list(
        &self,
        actor: &CurrentUser,
        mut query: ApplicationListQuery,
    ) -> Result<Vec<Application>> {
        if !actor.is_admin() {
            query.applicant_id = Some(actor.id);
        }
        self.applications.list(&query).await
    }

    pub async fn get(&self, actor: &CurrentUser, id: Uuid) -> Result<Application> {
        let application = self.find(id).await?;
        if !actor.is_admin() && application.applicant_id != actor.id {
            return Err(Error::Forbidden(
                "You can only view your own applications".to_string(),
            ));
        }
        Ok(application)
    }

    pub async fn change_status(
        &self,
        actor: &CurrentUser,
        id: Uuid,
        status: ApplicationStatus,
    ) -> Result<Application> {
        actor.ensure_admin()?;
        let application = self.find(id).await?;
        let current: ApplicationStatus = application.status.parse()?;
        if !current.can_transition_to(status) {
            return Err(Error::Conflict(format!(
                "Cannot move application from {} to {}",
                current, status
            )));
        }

        let updated = self.applications.set_status(id, status).await?;
        info!(application_id = %id, from = %current, to = %status, "Application status changed");

        self.activity
            .record(
                NewActivity::new("application_status_changed", ENTITY, id)
                    .by(actor.id, actor.display_name())
                    .transition(current.as_str(), status.as_str()),
            )
            .await;

        let title = match self.vacancies.find(updated.vacancy_id).await {
            Ok(Some(vacancy)) => vacancy.title,
            _ => "your application".to_string(),
        };
        self.notifications
            .application_status_changed(&updated, &title)
            .await;
        Ok(updated)
    }

    pub async fn bulk_change_status(
        &self,
        actor: &CurrentUser,
        ids: &[Uuid],
        status: ApplicationStatus,
    ) -> Result<BulkOutcome> {
        actor.ensure_admin()?;
        let outcome = run_sequential(ids, |id| self.change_status(actor, id, status)).await;
        info!(%status, summary = %outcome.summary(), "Bulk application review finished");
        Ok(outcome)
    }

    async fn find(&self, id: Uuid) -> Result<Application> {
        self.applications
            .find(id)
            .await?
            .ok_or_else(|| Error::NotFound("Application not found".to_string()))
    }
}
