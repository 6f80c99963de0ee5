//! User account API handlers
//!
//! Responses use [`UserResponse`], which never carries the password
//! hash.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::models::{UserCreate, UserResponse, UserUpdate};
use crate::db::repository::UserRepository;
use crate::security_log;
use shared::{AppError, AppResult};

/// GET /api/users
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<UserResponse>>> {
    let repo = UserRepository::new(state.get_db());
    let users = repo.find_all().await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// POST /api/users
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<UserCreate>,
) -> AppResult<Json<UserResponse>> {
    if payload.password.len() < 8 {
        return Err(AppError::validation(
            "Password must be at least 8 characters",
        ));
    }
    let username = payload.username.clone();
    let repo = UserRepository::new(state.get_db());
    let user = repo.create(payload).await?;
    security_log!("INFO", "user_created", username = username);
    Ok(Json(UserResponse::from(user)))
}

/// PUT /api/users/:id - password reset, rename, enable/disable
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<UserUpdate>,
) -> AppResult<Json<UserResponse>> {
    if let Some(password) = &payload.password {
        if password.len() < 8 {
            return Err(AppError::validation(
                "Password must be at least 8 characters",
            ));
        }
    }
    let repo = UserRepository::new(state.get_db());
    let user = repo.update(&id, payload).await?;
    security_log!("INFO", "user_updated", user_id = id);
    Ok(Json(UserResponse::from(user)))
}
