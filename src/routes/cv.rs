use axum::{
    extract::{Multipart, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json},
    Extension,
};
use serde_json::Value as JsonValue;
use tracing::info;
use uuid::Uuid;

use crate::{
    dto::cv_dto::{CvListQuery, CvResponse, SaveCvPayload, SaveCvResponse, ValidateCvResponse},
    error::{Error, Result},
    middleware::auth::CurrentUser,
    services::cv_service::{CvService, SavedCv},
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/cvs/validate",
    request_body = serde_json::Value,
    responses(
        (status = 200, description = "Data passes completion rules", body = Json<ValidateCvResponse>),
        (status = 400, description = "Validation errors with field paths")
    )
)]
#[axum::debug_handler]
pub async fn validate_cv(Json(data): Json<JsonValue>) -> Result<impl IntoResponse> {
    CvService::dry_run(&data)?;
    Ok(Json(ValidateCvResponse { valid: true }))
}

#[utoipa::path(
    get,
    path = "/api/cvs",
    params(
        ("status" = Option<String>, Query, description = "draft or completed")
    ),
    responses(
        (status = 200, description = "The caller's CVs, newest first", body = Json<Vec<CvResponse>>)
    )
)]
#[axum::debug_handler]
pub async fn list_cvs(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<CvListQuery>,
) -> Result<impl IntoResponse> {
    let cvs = state.cv_service.list(&user, query.status).await?;
    let items: Vec<CvResponse> = cvs.into_iter().map(CvResponse::from).collect();
    Ok(Json(items))
}

#[utoipa::path(
    post,
    path = "/api/cvs",
    request_body = SaveCvPayload,
    responses(
        (status = 201, description = "CV saved", body = Json<SaveCvResponse>),
        (status = 400, description = "Validation errors"),
        (status = 404, description = "Source job seeker not found")
    )
)]
#[axum::debug_handler]
pub async fn create_cv(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<SaveCvPayload>,
) -> Result<impl IntoResponse> {
    let saved = state.cv_service.create(&user, payload).await?;
    Ok((StatusCode::CREATED, Json(save_response(saved))))
}

#[utoipa::path(
    get,
    path = "/api/cvs/{id}",
    params(
        ("id" = Uuid, Path, description = "CV ID")
    ),
    responses(
        (status = 200, description = "CV found", body = Json<CvResponse>),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "CV not found")
    )
)]
#[axum::debug_handler]
pub async fn get_cv(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let cv = state.cv_service.get(&user, id).await?;
    Ok(Json(CvResponse::from(cv)))
}

#[utoipa::path(
    put,
    path = "/api/cvs/{id}",
    params(
        ("id" = Uuid, Path, description = "CV ID")
    ),
    request_body = SaveCvPayload,
    responses(
        (status = 200, description = "CV saved", body = Json<SaveCvResponse>),
        (status = 400, description = "Validation errors"),
        (status = 403, description = "Not the owner"),
        (status = 409, description = "Completed CVs cannot return to draft")
    )
)]
#[axum::debug_handler]
pub async fn update_cv(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SaveCvPayload>,
) -> Result<impl IntoResponse> {
    let saved = state.cv_service.update(&user, id, payload).await?;
    Ok(Json(save_response(saved)))
}

#[utoipa::path(
    delete,
    path = "/api/cvs/{id}",
    params(
        ("id" = Uuid, Path, description = "CV ID")
    ),
    responses(
        (status = 204, description = "CV deleted"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "CV not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_cv(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.cv_service.delete(&user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/cvs/{id}/payload",
    params(
        ("id" = Uuid, Path, description = "CV ID")
    ),
    responses(
        (status = 200, description = "Document-generation payload preview"),
        (status = 409, description = "CV is still a draft")
    )
)]
#[axum::debug_handler]
pub async fn cv_payload(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let (_, payload) = state.cv_service.external_payload(&user, id).await?;
    Ok(Json(payload))
}

#[utoipa::path(
    post,
    path = "/api/cvs/{id}/export",
    params(
        ("id" = Uuid, Path, description = "CV ID")
    ),
    responses(
        (status = 200, description = "Generated document"),
        (status = 409, description = "CV is still a draft"),
        (status = 502, description = "Document service rejected the payload")
    )
)]
#[axum::debug_handler]
pub async fn export_cv(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let (cv, payload) = state.cv_service.external_payload(&user, id).await?;
    let document = state.document_service.render(&payload).await?;
    info!(cv_id = %id, bytes = document.bytes.len(), "CV exported");

    let disposition = format!("attachment; filename=\"{}.docx\"", cv.document_name());
    Ok((
        [
            (header::CONTENT_TYPE, document.content_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        document.bytes,
    ))
}

#[utoipa::path(
    post,
    path = "/api/cvs/extract",
    responses(
        (status = 200, description = "Pre-filled, AI-assisted form session"),
        (status = 400, description = "Unsupported, oversized or unreadable file"),
        (status = 502, description = "Extraction service failed")
    )
)]
#[axum::debug_handler]
pub async fn extract_cv(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| Error::BadRequest("Uploaded file has no name".to_string()))?;
        let bytes = field.bytes().await?;
        info!(user_id = %user.id, %file_name, size = bytes.len(), "CV upload received");

        let session = state.extraction_service.extract(&file_name, &bytes).await?;
        return Ok(Json(session));
    }
    Err(Error::BadRequest("Missing multipart field 'file'".to_string()))
}

fn save_response(saved: SavedCv) -> SaveCvResponse {
    SaveCvResponse {
        cv: CvResponse::from(saved.cv),
        substituted_dates: saved.substituted_dates,
    }
}
