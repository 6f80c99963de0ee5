//! Authentication and authorization middleware

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::auth::{CurrentUser, JwtError, JwtService};
use crate::core::ServerState;
use crate::security_log;
use shared::AppError;

/// Routes reachable without a token
fn is_public(path: &str) -> bool {
    path == "/api/auth/login" || path == "/api/health"
}

fn current_user(req: &Request) -> Result<&CurrentUser, AppError> {
    req.extensions()
        .get::<CurrentUser>()
        .ok_or(AppError::unauthorized())
}

/// Authentication middleware - requires a logged-in user
///
/// Validates the JWT from `Authorization: Bearer <token>` and injects
/// [`CurrentUser`] into the request extensions. CORS preflights,
/// non-`/api/` paths, and the public routes pass through untouched.
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = req.uri().path();
    if req.method() == http::Method::OPTIONS || !path.starts_with("/api/") || is_public(path) {
        return Ok(next.run(req).await);
    }

    let token = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(JwtService::extract_from_header);
    let Some(token) = token else {
        security_log!("WARN", "auth_missing", path = path.to_string());
        return Err(AppError::unauthorized());
    };

    let claims = state.get_jwt_service().validate_token(token).map_err(|e| {
        security_log!(
            "WARN",
            "auth_failed",
            error = e.to_string(),
            path = req.uri().path().to_string()
        );
        match e {
            JwtError::ExpiredToken => AppError::token_expired(),
            _ => AppError::invalid_token("Invalid token"),
        }
    })?;

    let user = CurrentUser::try_from(claims)
        .map_err(|e| AppError::invalid_token(format!("Malformed JWT claims: {}", e)))?;
    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

/// Permission middleware - requires a configured permission scope
///
/// ```ignore
/// Router::new()
///     .route("/", get(handler::list))
///     .layer(middleware::from_fn(require_permission("rates:manage")));
/// ```
pub fn require_permission(
    permission: &'static str,
) -> impl Fn(
    Request,
    Next,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, AppError>> + Send>>
+ Clone {
    move |req: Request, next: Next| {
        Box::pin(async move {
            let user = current_user(&req)?;
            if !user.has_permission(permission) {
                security_log!(
                    "WARN",
                    "permission_denied",
                    username = user.username.clone(),
                    scope = permission
                );
                return Err(AppError::forbidden(format!(
                    "Permission denied: {}",
                    permission
                )));
            }
            Ok(next.run(req).await)
        })
    }
}

/// Admin middleware - requires the ADMIN role outright
pub async fn require_admin(req: Request, next: Next) -> Result<Response, AppError> {
    let user = current_user(&req)?;
    if !user.is_admin() {
        security_log!("WARN", "admin_required", username = user.username.clone());
        return Err(AppError::forbidden("Admin role required"));
    }
    Ok(next.run(req).await)
}
