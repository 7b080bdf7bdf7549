use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::job_seeker_dto::JobSeekerPayload, error::Result, middleware::auth::CurrentUser,
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/job-seekers",
    request_body = JobSeekerPayload,
    responses(
        (status = 201, description = "Job seeker created", body = Json<JobSeeker>),
        (status = 400, description = "Invalid payload")
    )
)]
#[axum::debug_handler]
pub async fn create_job_seeker(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<JobSeekerPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let seeker = state.job_seeker_service.create(&user, payload).await?;
    Ok((StatusCode::CREATED, Json(seeker)))
}

#[utoipa::path(
    get,
    path = "/api/job-seekers",
    responses(
        (status = 200, description = "Job seekers owned by the caller", body = Json<Vec<JobSeeker>>)
    )
)]
#[axum::debug_handler]
pub async fn list_job_seekers(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<impl IntoResponse> {
    let items = state.job_seeker_service.list(&user).await?;
    Ok(Json(items))
}

#[utoipa::path(
    get,
    path = "/api/job-seekers/{id}",
    params(
        ("id" = Uuid, Path, description = "Job seeker ID")
    ),
    responses(
        (status = 200, description = "Job seeker found", body = Json<JobSeeker>),
        (status = 404, description = "Job seeker not found")
    )
)]
#[axum::debug_handler]
pub async fn get_job_seeker(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let seeker = state.job_seeker_service.get(&user, id).await?;
    Ok(Json(seeker))
}

#[utoipa::path(
    put,
    path = "/api/job-seekers/{id}",
    params(
        ("id" = Uuid, Path, description = "Job seeker ID")
    ),
    request_body = JobSeekerPayload,
    responses(
        (status = 200, description = "Job seeker updated", body = Json<JobSeeker>),
        (status = 403, description = "Owned by another recruiter"),
        (status = 404, description = "Job seeker not found")
    )
)]
#[axum::debug_handler]
pub async fn update_job_seeker(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<JobSeekerPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let seeker = state.job_seeker_service.update(&user, id, payload).await?;
    Ok(Json(seeker))
}

#[utoipa::path(
    delete,
    path = "/api/job-seekers/{id}",
    params(
        ("id" = Uuid, Path, description = "Job seeker ID")
    ),
    responses(
        (status = 204, description = "Job seeker deleted"),
        (status = 403, description = "Owned by another recruiter"),
        (status = 404, description = "Job seeker not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_job_seeker(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.job_seeker_service.delete(&user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
