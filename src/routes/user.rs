use axum::{
    extract::State,
    response::{IntoResponse, Json},
    Extension,
};

use crate::{error::Result, middleware::auth::CurrentUser, AppState};

#[utoipa::path(
    get,
    path = "/api/me",
    responses(
        (status = 200, description = "The caller's synced profile", body = Json<User>),
        (status = 401, description = "Missing or invalid token")
    )
)]
#[axum::debug_handler]
pub async fn me(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<impl IntoResponse> {
    let profile = state.user_service.me(&user).await?;
    Ok(Json(profile))
}

#[utoipa::path(
    get,
    path = "/api/admin/users",
    responses(
        (status = 200, description = "All known users", body = Json<Vec<User>>),
        (status = 403, description = "Administrator role required")
    )
)]
#[axum::debug_handler]
pub async fn list_users(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<impl IntoResponse> {
    let users = state.user_service.list(&user).await?;
    Ok(Json(users))
}
