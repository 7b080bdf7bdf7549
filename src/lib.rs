pub mod config;
pub mod cv;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use crate::config::Config;
use crate::database::{
    activity_log_repository::PgActivityLogRepository,
    application_repository::PgApplicationRepository, cv_repository::PgCvRepository,
    job_seeker_repository::PgJobSeekerRepository, user_repository::PgUserRepository,
    vacancy_repository::PgVacancyRepository,
};
use crate::services::{
    activity_log_service::ActivityLogService, application_service::ApplicationService,
    cv_service::CvService, document_service::DocumentService,
    extraction_service::ExtractionService, job_seeker_service::JobSeekerService,
    notification_service::NotificationService, user_service::UserService,
    vacancy_service::VacancyService,
};
use reqwest::Client;
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub cv_service: CvService,
    pub vacancy_service: VacancyService,
    pub application_service: ApplicationService,
    pub job_seeker_service: JobSeekerService,
    pub user_service: UserService,
    pub activity_log_service: ActivityLogService,
    pub document_service: DocumentService,
    pub extraction_service: ExtractionService,
}

impl AppState {
    pub fn new(pool: PgPool, config: &Config) -> error::Result<Self> {
        let http_client = Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()?;

        let cvs = Arc::new(PgCvRepository::new(pool.clone()));
        let vacancies = Arc::new(PgVacancyRepository::new(pool.clone()));
        let job_seekers = Arc::new(PgJobSeekerRepository::new(pool.clone()));

        let activity_log_service =
            ActivityLogService::new(Arc::new(PgActivityLogRepository::new(pool.clone())));
        let notification_service = NotificationService::from_config(config, http_client.clone());

        let cv_service = CvService::new(
            cvs.clone(),
            job_seekers.clone(),
            activity_log_service.clone(),
        );
        let vacancy_service = VacancyService::new(
            vacancies.clone(),
            activity_log_service.clone(),
            notification_service.clone(),
        );
        let application_service = ApplicationService::new(
            Arc::new(PgApplicationRepository::new(pool.clone())),
            vacancies,
            cvs,
            activity_log_service.clone(),
            notification_service,
        );
        let job_seeker_service = JobSeekerService::new(job_seekers, activity_log_service.clone());
        let user_service = UserService::new(Arc::new(PgUserRepository::new(pool.clone())));
        let document_service = DocumentService::new(
            http_client.clone(),
            config.document_api_url.clone(),
            config.document_api_key.clone(),
        );
        let extraction_service = ExtractionService::new(
            http_client,
            config.openai_api_key.clone(),
            config.openai_model.clone(),
            config.max_upload_bytes,
        );

        Ok(Self {
            pool,
            config: Arc::new(config.clone()),
            cv_service,
            vacancy_service,
            application_service,
            job_seeker_service,
            user_service,
            activity_log_service,
            document_service,
            extraction_service,
        })
    }
}
