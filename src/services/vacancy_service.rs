use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::database::vacancy_repository::VacancyRepository;
use crate::dto::vacancy_dto::{CreateVacancyPayload, UpdateVacancyPayload, VacancyListQuery};
use crate::error::{Error, Result};
use crate::middleware::auth::CurrentUser;
use crate::models::activity_log::NewActivity;
use crate::models::vacancy::{Vacancy, VacancyStatus};
use crate::services::activity_log_service::ActivityLogService;
use crate::services::bulk::{run_sequential, BulkOutcome};
use crate::services::notification_service::NotificationService;

const ENTITY: &str = "vacancy";

#[derive(Clone)]
pub struct VacancyService {
    repo: Arc<dyn VacancyRepository>,
    activity: ActivityLogService,
    notifications: NotificationService,
}

pub struct VacancyList {
    pub items: Vec<Vacancy>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub total_pages: i64,
}

impl VacancyService {
    pub fn new(
        repo: Arc<dyn VacancyRepository>,
        activity: ActivityLogService,
        notifications: NotificationService,
    ) -> Self {
        Self {
            repo,
            activity,
            notifications,
        }
    }

    /// New vacancies always wait for review.
    pub async fn create(&self, actor: &CurrentUser, payload: CreateVacancyPayload) -> Result<Vacancy> {
        let vacancy = self
            .repo
            .insert(actor.id, actor.email.clone(), &payload)
            .await?;
        info!(vacancy_id = %vacancy.id, "Vacancy submitted for review");

        self.activity
            .record(
                NewActivity::new("vacancy_created", ENTITY, vacancy.id)
                    .by(actor.id, actor.display_name())
                    .with_new_status(&vacancy.status),
            )
            .await;
        Ok(vacancy)
    }

    pub async fn update(
        &self,
        actor: &CurrentUser,
        id: Uuid,
        payload: UpdateVacancyPayload,
    ) -> Result<Vacancy> {
        let vacancy = self.get_by_id(id).await?;
        ensure_can_manage(actor, &vacancy)?;
        if vacancy.status != VacancyStatus::Pending.as_str() {
            return Err(Error::Conflict(
                "Only pending vacancies can be edited".to_string(),
            ));
        }
        self.repo.update(id, &payload).await
    }

    pub async fn delete(&self, actor: &CurrentUser, id: Uuid) -> Result<()> {
        let vacancy = self.get_by_id(id).await?;
        ensure_can_manage(actor, &vacancy)?;
        self.repo.delete(id).await?;
        info!(vacancy_id = %id, "Vacancy deleted");

        self.activity
            .record(
                NewActivity::new("vacancy_deleted", ENTITY, id)
                    .by(actor.id, actor.display_name())
                    .with_previous_status(&vacancy.status),
            )
            .await;
        Ok(())
    }

    pub async fn list(&self, query: VacancyListQuery) -> Result<VacancyList> {
        let page = query.page.unwrap_or(1).max(1);
        let per_page = query.per_page.unwrap_or(20).clamp(1, 100);
        let offset = (page - 1).saturating_mul(per_page);

        let (items, total) = self.repo.list(&query, per_page, offset).await?;
        let total_pages = ((total as f64) / (per_page as f64)).ceil() as i64;

        Ok(VacancyList {
            items,
            total,
            page,
            per_page,
            total_pages,
        })
    }

    pub async fn list_approved(&self, limit: i64) -> Result<Vec<Vacancy>> {
        let limit = if limit <= 0 { 20 } else { limit.min(100) };
        self.repo.list_approved(limit).await
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Vacancy> {
        self.repo
            .find(id)
            .await?
            .ok_or_else(|| Error::NotFound("Vacancy not found".to_string()))
    }

    /// Unapproved vacancies are invisible to the public.
    pub async fn get_public(&self, id: Uuid) -> Result<Vacancy> {
        let vacancy = self.get_by_id(id).await?;
        if vacancy.status != VacancyStatus::Approved.as_str() {
            return Err(Error::NotFound("Vacancy not found".to_string()));
        }
        Ok(vacancy)
    }

    pub async fn change_status(
        &self,
        actor: &CurrentUser,
        id: Uuid,
        status: VacancyStatus,
    ) -> Result<Vacancy> {
        actor.ensure_admin()?;
        let vacancy = self.get_by_id(id).await?;
        let current: VacancyStatus = vacancy.status.parse()?;
        if !current.can_transition_to(status) {
            return Err(Error::Conflict(format!(
                "Cannot move vacancy from {} to {}",
                current, status
            )));
        }

        let updated = self.repo.set_status(id, status).await?;
        info!(vacancy_id = %id, from = %current, to = %status, "Vacancy status changed");

        self.activity
            .record(
                NewActivity::new("vacancy_status_changed", ENTITY, id)
                    .by(actor.id, actor.display_name())
                    .transition(current.as_str(), status.as_str()),
            )
            .await;
        self.notifications.vacancy_status_changed(&updated).await;
        Ok(updated)
    }

    pub async fn bulk_change_status(
        &self,
        actor: &CurrentUser,
        ids: &[Uuid],
        status: VacancyStatus,
    ) -> Result<BulkOutcome> {
        actor.ensure_admin()?;
        let outcome = run_sequential(ids, |id| self.change_status(actor, id, status)).await;
        info!(%status, summary = %outcome.summary(), "Bulk vacancy review finished");
        Ok(outcome)
    }
}

fn ensure_can_manage(actor: &CurrentUser, vacancy: &Vacancy) -> Result<()> {
    if actor.is_admin() || vacancy.posted_by == actor.id {
        return Ok(());
    }
    Err(Error::Forbidden(
        "Only the poster or an administrator can change this vacancy".to_string(),
    ))
}
