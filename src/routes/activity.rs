use axum::{
    extract::{Query, State},
    response::{IntoResponse, Json},
};

use crate::{dto::activity_dto::ActivityLogQuery, error::Result, AppState};

#[utoipa::path(
    get,
    path = "/api/activity-logs",
    params(
        ("entity_type" = Option<String>, Query, description = "cv, vacancy, application or job_seeker"),
        ("entity_id" = Option<String>, Query, description = "Filter by entity"),
        ("limit" = Option<i64>, Query, description = "Maximum entries, newest first")
    ),
    responses(
        (status = 200, description = "Activity entries", body = Json<Vec<ActivityLog>>),
        (status = 403, description = "Administrator role required")
    )
)]
#[axum::debug_handler]
pub async fn list_activity(
    State(state): State<AppState>,
    Query(query): Query<ActivityLogQuery>,
) -> Result<impl IntoResponse> {
    let entries = state.activity_log_service.list(&query).await?;
    Ok(Json(entries))
}
