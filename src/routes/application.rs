use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::{
        application_dto::{ApplicationListQuery, ApplicationStatusPayload, ApplyPayload},
        bulk_dto::BulkApplicationStatusPayload,
    },
    error::Result,
    middleware::auth::CurrentUser,
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/applications",
    request_body = ApplyPayload,
    responses(
        (status = 201, description = "Application submitted", body = Json<Application>),
        (status = 403, description = "CV belongs to someone else"),
        (status = 404, description = "Vacancy or CV not found"),
        (status = 409, description = "Vacancy closed, CV not completed, or already applied")
    )
)]
#[axum::debug_handler]
pub async fn apply(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<ApplyPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let application = state.application_service.apply(&user, payload).await?;
    Ok((StatusCode::CREATED, Json(application)))
}

#[utoipa::path(
    get,
    path = "/api/applications",
    params(
        ("vacancy_id" = Option<Uuid>, Query, description = "Filter by vacancy"),
        ("applicant_id" = Option<Uuid>, Query, description = "Filter by applicant (administrators only)"),
        ("status" = Option<String>, Query, description = "Filter by status")
    ),
    responses(
        (status = 200, description = "Applications visible to the caller", body = Json<Vec<Application>>)
    )
)]
#[axum::debug_handler]
pub async fn list_applications(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<ApplicationListQuery>,
) -> Result<impl IntoResponse> {
    let items = state.application_service.list(&user, query).await?;
    Ok(Json(items))
}

#[utoipa::path(
    get,
    path = "/api/applications/{id}",
    params(
        ("id" = Uuid, Path, description = "Application ID")
    ),
    responses(
        (status = 200, description = "Application found", body = Json<Application>),
        (status = 403, description = "Not the applicant"),
        (status = 404, description = "Application not found")
    )
)]
#[axum::debug_handler]
pub async fn get_application(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let application = state.application_service.get(&user, id).await?;
    Ok(Json(application))
}

#[utoipa::path(
    post,
    path = "/api/applications/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Application ID")
    ),
    request_body = ApplicationStatusPayload,
    responses(
        (status = 200, description = "Application reviewed", body = Json<Application>),
        (status = 403, description = "Administrator role required"),
        (status = 409, description = "Transition not allowed")
    )
)]
#[axum::debug_handler]
pub async fn change_application_status(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ApplicationStatusPayload>,
) -> Result<impl IntoResponse> {
    let application = state
        .application_service
        .change_status(&user, id, payload.status)
        .await?;
    Ok(Json(application))
}

#[utoipa::path(
    post,
    path = "/api/applications/bulk-status",
    request_body = BulkApplicationStatusPayload,
    responses(
        (status = 200, description = "Per-item outcome of the batch", body = Json<BulkOutcome>),
        (status = 403, description = "Administrator role required")
    )
)]
#[axum::debug_handler]
pub async fn bulk_application_status(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<BulkApplicationStatusPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let outcome = state
        .application_service
        .bulk_change_status(&user, &payload.ids, payload.status)
        .await?;
    Ok(Json(outcome))
}
