//! Interpreter profile API handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Interpreter, InterpreterCreate, InterpreterUpdate};
use crate::db::repository::InterpreterRepository;
use crate::utils::validation::validate_payload;
use shared::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Restrict to active interpreters offering this language
    pub language: Option<String>,
}

/// GET /api/interpreters - optionally filtered by offered language
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Interpreter>>> {
    let repo = InterpreterRepository::new(state.get_db());
    let interpreters = match query.language {
        Some(language) => repo.find_active_by_language(&language).await?,
        None => repo.find_all().await?,
    };
    Ok(Json(interpreters))
}

/// GET /api/interpreters/:id - admin or the owning interpreter account
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Interpreter>> {
    if !user.is_admin() && !user.owns_profile(&id) {
        return Err(AppError::forbidden("Not your profile"));
    }
    let repo = InterpreterRepository::new(state.get_db());
    let interpreter = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Interpreter {}", id)))?;
    Ok(Json(interpreter))
}

/// POST /api/interpreters
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<InterpreterCreate>,
) -> AppResult<Json<Interpreter>> {
    validate_payload(&payload)?;
    let repo = InterpreterRepository::new(state.get_db());
    let interpreter = repo
        .create(Interpreter {
            id: None,
            name: payload.name,
            email: payload.email,
            phone: payload.phone,
            languages: payload.languages,
            services: payload.services,
            is_active: true,
        })
        .await?;
    Ok(Json(interpreter))
}

/// PUT /api/interpreters/:id
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<InterpreterUpdate>,
) -> AppResult<Json<Interpreter>> {
    validate_payload(&payload)?;
    let repo = InterpreterRepository::new(state.get_db());
    let interpreter = repo.update(&id, payload).await?;
    Ok(Json(interpreter))
}

/// DELETE /api/interpreters/:id - soft delete
pub async fn deactivate(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Interpreter>> {
    let repo = InterpreterRepository::new(state.get_db());
    let interpreter = repo.deactivate(&id).await?;
    Ok(Json(interpreter))
}
