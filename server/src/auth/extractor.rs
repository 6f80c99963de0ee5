//! Axum extractor yielding the authenticated [`CurrentUser`]
//!
//! Handlers behind `require_auth` get the user from request extensions;
//! the extractor can also validate a bearer token on its own, so routes
//! outside the global auth layer still work.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::auth::{CurrentUser, JwtError, JwtService};
use crate::core::ServerState;
use crate::security_log;
use shared::AppError;

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(JwtService::extract_from_header)
}

impl FromRequestParts<ServerState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(user.clone());
        }

        let Some(token) = bearer_token(parts) else {
            security_log!("WARN", "auth_missing", path = parts.uri.path().to_string());
            return Err(AppError::unauthorized());
        };

        let claims = state.get_jwt_service().validate_token(token).map_err(|e| {
            security_log!(
                "WARN",
                "auth_failed",
                error = e.to_string(),
                path = parts.uri.path().to_string()
            );
            match e {
                JwtError::ExpiredToken => AppError::token_expired(),
                _ => AppError::invalid_token("Invalid token"),
            }
        })?;

        let user = CurrentUser::try_from(claims)
            .map_err(|e| AppError::invalid_token(format!("Malformed JWT claims: {}", e)))?;
        parts.extensions.insert(user.clone());
        Ok(user)
    }
}
