//! Client profile API handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Client, ClientCreate, ClientUpdate};
use crate::db::repository::ClientRepository;
use crate::utils::validation::validate_payload;
use shared::{AppError, AppResult};

/// GET /api/clients
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Client>>> {
    let repo = ClientRepository::new(state.get_db());
    let clients = repo.find_all().await?;
    Ok(Json(clients))
}

/// GET /api/clients/:id - admin or the owning client account
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Client>> {
    if !user.is_admin() && !user.owns_profile(&id) {
        return Err(AppError::forbidden("Not your profile"));
    }
    let repo = ClientRepository::new(state.get_db());
    let client = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Client {}", id)))?;
    Ok(Json(client))
}

/// POST /api/clients
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ClientCreate>,
) -> AppResult<Json<Client>> {
    validate_payload(&payload)?;
    let repo = ClientRepository::new(state.get_db());
    let client = repo
        .create(Client {
            id: None,
            name: payload.name,
            contact_name: payload.contact_name,
            email: payload.email,
            phone: payload.phone,
            billing_address: payload.billing_address,
            payment_terms_days: payload.payment_terms_days,
            is_active: true,
        })
        .await?;
    Ok(Json(client))
}

/// PUT /api/clients/:id
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<ClientUpdate>,
) -> AppResult<Json<Client>> {
    validate_payload(&payload)?;
    let repo = ClientRepository::new(state.get_db());
    let client = repo.update(&id, payload).await?;
    Ok(Json(client))
}

/// DELETE /api/clients/:id - soft delete
pub async fn deactivate(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Client>> {
    let repo = ClientRepository::new(state.get_db());
    let client = repo.deactivate(&id).await?;
    Ok(Json(client))
}
