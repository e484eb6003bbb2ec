//! HTTP handlers for user administration endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::{require_role, CurrentUser};
use crate::services::user::{CreateUserInput, UserFilter, UserService, UserView};
use crate::AppState;
use shared::models::UserRole;

/// List users (admin)
pub async fn list_users(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(filter): Query<UserFilter>,
) -> AppResult<Json<Vec<UserView>>> {
    require_role(&current_user.0, &[UserRole::Admin])?;
    let service = UserService::new(state.db, &state.config.auth.default_password);
    let users = service.list(&filter).await?;
    Ok(Json(users))
}

/// Create a user (admin)
pub async fn create_user(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateUserInput>,
) -> AppResult<(StatusCode, Json<UserView>)> {
    require_role(&current_user.0, &[UserRole::Admin])?;
    let service = UserService::new(state.db, &state.config.auth.default_password);
    let user = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Deactivate a user (admin)
pub async fn deactivate_user(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    require_role(&current_user.0, &[UserRole::Admin])?;
    let service = UserService::new(state.db, &state.config.auth.default_password);
    service.deactivate(user_id).await?;
    Ok(Json(()))
}

/// Reset a user's password to the default (admin)
pub async fn reset_password(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    require_role(&current_user.0, &[UserRole::Admin])?;
    let service = UserService::new(state.db, &state.config.auth.default_password);
    service.reset_password(user_id).await?;
    Ok(Json(()))
}
