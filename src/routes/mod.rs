pub mod activity;
pub mod application;
pub mod cv;
pub mod cv_session;
pub mod health;
pub mod job_seeker;
pub mod user;
pub mod vacancy;

use axum::{
    extract::DefaultBodyLimit,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

use crate::middleware::auth::{require_admin, require_auth};
use crate::AppState;

/// Room for multipart boundaries and headers around an upload.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes + MULTIPART_OVERHEAD_BYTES;

    let public_api = Router::new()
        .route("/health", get(health::health))
        .route("/api/public/vacancies", get(vacancy::list_public_vacancies))
        .route("/api/public/vacancies/:id", get(vacancy::get_public_vacancy));

    let admin_api = Router::new()
        .route("/api/admin/users", get(user::list_users))
        .route("/api/activity-logs", get(activity::list_activity))
        .layer(from_fn(require_admin));

    let user_api = Router::new()
        .route("/api/me", get(user::me))
        .route("/api/cvs", get(cv::list_cvs).post(cv::create_cv))
        .route("/api/cvs/validate", post(cv::validate_cv))
        .route("/api/cvs/extract", post(cv::extract_cv))
        .route(
            "/api/cvs/:id",
            get(cv::get_cv).put(cv::update_cv).delete(cv::delete_cv),
        )
        .route("/api/cvs/:id/payload", get(cv::cv_payload))
        .route("/api/cvs/:id/export", post(cv::export_cv))
        .route("/api/cv-sessions/new", get(cv_session::new_session))
        .route("/api/cv-sessions/step", post(cv_session::apply_step))
        .route(
            "/api/vacancies",
            get(vacancy::list_vacancies).post(vacancy::create_vacancy),
        )
        .route("/api/vacancies/bulk-status", post(vacancy::bulk_vacancy_status))
        .route(
            "/api/vacancies/:id",
            get(vacancy::get_vacancy)
                .patch(vacancy::update_vacancy)
                .delete(vacancy::delete_vacancy),
        )
        .route("/api/vacancies/:id/status", post(vacancy::change_vacancy_status))
        .route(
            "/api/applications",
            get(application::list_applications).post(application::apply),
        )
        .route(
            "/api/applications/bulk-status",
            post(application::bulk_application_status),
        )
        .route("/api/applications/:id", get(application::get_application))
        .route(
            "/api/applications/:id/status",
            post(application::change_application_status),
        )
        .route(
            "/api/job-seekers",
            get(job_seeker::list_job_seekers).post(job_seeker::create_job_seeker),
        )
        .route(
            "/api/job-seekers/:id",
            get(job_seeker::get_job_seeker)
                .put(job_seeker::update_job_seeker)
                .delete(job_seeker::delete_job_seeker),
        )
        .merge(admin_api)
        .layer(from_fn_with_state(state.clone(), require_auth));

    public_api
        .merge(user_api)
        .with_state(state)
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
