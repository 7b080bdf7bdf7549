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
        bulk_dto::BulkVacancyStatusPayload,
        vacancy_dto::{
            CreateVacancyPayload, UpdateVacancyPayload, VacancyListQuery, VacancyListResponse,
            VacancyPublicListResponse, VacancyPublicQuery, VacancyPublicSummary, VacancyResponse,
            VacancyStatusPayload,
        },
    },
    error::Result,
    middleware::auth::CurrentUser,
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/vacancies",
    request_body = CreateVacancyPayload,
    responses(
        (status = 201, description = "Vacancy submitted for review", body = Json<VacancyResponse>),
        (status = 400, description = "Invalid payload")
    )
)]
#[axum::debug_handler]
pub async fn create_vacancy(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<CreateVacancyPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let vacancy = state.vacancy_service.create(&user, payload).await?;
    Ok((StatusCode::CREATED, Json(VacancyResponse::from(vacancy))))
}

#[utoipa::path(
    patch,
    path = "/api/vacancies/{id}",
    params(
        ("id" = Uuid, Path, description = "Vacancy ID")
    ),
    request_body = UpdateVacancyPayload,
    responses(
        (status = 200, description = "Vacancy updated successfully", body = Json<VacancyResponse>),
        (status = 400, description = "Invalid payload"),
        (status = 403, description = "Not the poster or an administrator"),
        (status = 404, description = "Vacancy not found"),
        (status = 409, description = "Vacancy already reviewed")
    )
)]
#[axum::debug_handler]
pub async fn update_vacancy(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateVacancyPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let vacancy = state.vacancy_service.update(&user, id, payload).await?;
    Ok(Json(VacancyResponse::from(vacancy)))
}

#[utoipa::path(
    delete,
    path = "/api/vacancies/{id}",
    params(
        ("id" = Uuid, Path, description = "Vacancy ID")
    ),
    responses(
        (status = 204, description = "Vacancy deleted successfully"),
        (status = 403, description = "Not the poster or an administrator"),
        (status = 404, description = "Vacancy not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_vacancy(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.vacancy_service.delete(&user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/vacancies",
    params(
        ("page" = Option<i64>, Query, description = "Page number"),
        ("per_page" = Option<i64>, Query, description = "Items per page"),
        ("status" = Option<String>, Query, description = "Filter by status"),
        ("company" = Option<String>, Query, description = "Filter by company"),
        ("search" = Option<String>, Query, description = "Search query")
    ),
    responses(
        (status = 200, description = "List of vacancies", body = Json<VacancyListResponse>)
    )
)]
#[axum::debug_handler]
pub async fn list_vacancies(
    State(state): State<AppState>,
    Query(query): Query<VacancyListQuery>,
) -> Result<impl IntoResponse> {
    let result = state.vacancy_service.list(query).await?;
    Ok(Json(VacancyListResponse::from(result)))
}

#[utoipa::path(
    get,
    path = "/api/vacancies/{id}",
    params(
        ("id" = Uuid, Path, description = "Vacancy ID")
    ),
    responses(
        (status = 200, description = "Vacancy found", body = Json<VacancyResponse>),
        (status = 404, description = "Vacancy not found")
    )
)]
#[axum::debug_handler]
pub async fn get_vacancy(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let vacancy = state.vacancy_service.get_by_id(id).await?;
    Ok(Json(VacancyResponse::from(vacancy)))
}

#[utoipa::path(
    post,
    path = "/api/vacancies/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Vacancy ID")
    ),
    request_body = VacancyStatusPayload,
    responses(
        (status = 200, description = "Vacancy reviewed", body = Json<VacancyResponse>),
        (status = 403, description = "Administrator role required"),
        (status = 409, description = "Transition not allowed")
    )
)]
#[axum::debug_handler]
pub async fn change_vacancy_status(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<VacancyStatusPayload>,
) -> Result<impl IntoResponse> {
    let vacancy = state
        .vacancy_service
        .change_status(&user, id, payload.status)
        .await?;
    Ok(Json(VacancyResponse::from(vacancy)))
}

#[utoipa::path(
    post,
    path = "/api/vacancies/bulk-status",
    request_body = BulkVacancyStatusPayload,
    responses(
        (status = 200, description = "Per-item outcome of the batch", body = Json<BulkOutcome>),
        (status = 403, description = "Administrator role required")
    )
)]
#[axum::debug_handler]
pub async fn bulk_vacancy_status(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<BulkVacancyStatusPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let outcome = state
        .vacancy_service
        .bulk_change_status(&user, &payload.ids, payload.status)
        .await?;
    Ok(Json(outcome))
}

#[utoipa::path(
    get,
    path = "/api/public/vacancies",
    params(
        ("limit" = Option<i64>, Query, description = "Number of items to return")
    ),
    responses(
        (status = 200, description = "List of approved vacancies", body = Json<VacancyPublicListResponse>)
    )
)]
#[axum::debug_handler]
pub async fn list_public_vacancies(
    State(state): State<AppState>,
    Query(query): Query<VacancyPublicQuery>,
) -> Result<impl IntoResponse> {
    let items = state
        .vacancy_service
        .list_approved(query.limit.unwrap_or(20))
        .await?;
    let summaries: Vec<VacancyPublicSummary> = items.into_iter().map(Into::into).collect();
    Ok(Json(VacancyPublicListResponse { items: summaries }))
}

#[utoipa::path(
    get,
    path = "/api/public/vacancies/{id}",
    params(
        ("id" = Uuid, Path, description = "Vacancy ID")
    ),
    responses(
        (status = 200, description = "Approved vacancy found", body = Json<VacancyResponse>),
        (status = 404, description = "Vacancy not found")
    )
)]
#[axum::debug_handler]
pub async fn get_public_vacancy(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let vacancy = state.vacancy_service.get_public(id).await?;
    Ok(Json(VacancyResponse::from(vacancy)))
}
