use axum::response::{IntoResponse, Json};

use crate::{cv::form_session::FormSession, dto::cv_dto::SessionStepPayload, error::Result};

#[utoipa::path(
    get,
    path = "/api/cv-sessions/new",
    responses(
        (status = 200, description = "Empty form session at the first step")
    )
)]
#[axum::debug_handler]
pub async fn new_session() -> impl IntoResponse {
    Json(FormSession::new())
}

#[utoipa::path(
    post,
    path = "/api/cv-sessions/step",
    request_body = SessionStepPayload,
    responses(
        (status = 200, description = "Session with the update applied"),
        (status = 400, description = "Malformed session or update")
    )
)]
#[axum::debug_handler]
pub async fn apply_step(Json(payload): Json<SessionStepPayload>) -> Result<impl IntoResponse> {
    Ok(Json(payload.session.apply(payload.update)))
}
