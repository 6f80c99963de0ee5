//! Authentication handlers

use std::time::Duration;

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::auth::{CurrentUser, default_permissions};
use crate::core::ServerState;
use crate::db::repository::UserRepository;
use crate::security_log;
use shared::{AppError, AppResult, Role};

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_in: u64,
    pub user: UserInfo,
}

#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: String,
    pub username: String,
    pub display_name: String,
    pub role: Role,
    pub profile: Option<String>,
}

/// POST /api/auth/login
///
/// Failures are deliberately uniform: the same delay and message for a
/// missing account and a wrong password.
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let repo = UserRepository::new(state.get_db());
    let user = repo.find_by_username(&req.username).await?;

    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    let user = match user {
        Some(u) => {
            if !u.is_active {
                security_log!("WARN", "login_disabled_account", username = req.username.clone());
                return Err(AppError::forbidden("Account has been disabled"));
            }
            let password_valid = u
                .verify_password(&req.password)
                .map_err(|e| AppError::internal(format!("Password verification failed: {}", e)))?;
            if !password_valid {
                security_log!("WARN", "login_failed", username = req.username.clone());
                return Err(AppError::invalid_credentials());
            }
            u
        }
        None => {
            security_log!("WARN", "login_unknown_user", username = req.username.clone());
            return Err(AppError::invalid_credentials());
        }
    };

    let user_id = user
        .id
        .as_ref()
        .map(|id| id.to_string())
        .ok_or_else(|| AppError::internal("User record missing id"))?;
    let profile = user
        .client
        .as_ref()
        .or(user.interpreter.as_ref())
        .map(|r| r.to_string());
    let permissions = default_permissions(user.role);

    let jwt = state.get_jwt_service();
    let token = jwt
        .generate_token(
            &user_id,
            &user.username,
            user.role,
            profile.as_deref(),
            &permissions,
        )
        .map_err(|e| AppError::internal(format!("Token generation failed: {}", e)))?;

    security_log!(
        "INFO",
        "login_success",
        username = user.username.clone(),
        role = user.role.as_str()
    );

    Ok(Json(LoginResponse {
        token,
        expires_in: (jwt.config.expiration_minutes * 60).max(0) as u64,
        user: UserInfo {
            id: user_id,
            username: user.username,
            display_name: user.display_name,
            role: user.role,
            profile,
        },
    }))
}

/// GET /api/auth/me
pub async fn me(user: CurrentUser) -> Json<UserInfo> {
    Json(UserInfo {
        id: user.id.clone(),
        username: user.username.clone(),
        display_name: user.username,
        role: user.role,
        profile: user.profile,
    })
}
