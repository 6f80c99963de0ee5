//! Rate table API handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::models::{Rate, RateUpsert};
use crate::db::repository::RateRepository;
use shared::{AppError, AppResult};

/// GET /api/rates
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Rate>>> {
    let repo = RateRepository::new(state.get_db());
    let rates = repo.find_all().await?;
    Ok(Json(rates))
}

/// PUT /api/rates - create or replace the rate for a
/// (rate_type, service_type) key
pub async fn upsert(
    State(state): State<ServerState>,
    Json(payload): Json<RateUpsert>,
) -> AppResult<Json<Rate>> {
    if !payload.amount_per_unit.is_finite() || payload.amount_per_unit < 0.0 {
        return Err(AppError::validation("amount_per_unit must be non-negative"));
    }
    if !payload.minimum_units.is_finite() || payload.minimum_units < 0.0 {
        return Err(AppError::validation("minimum_units must be non-negative"));
    }
    let repo = RateRepository::new(state.get_db());
    let rate = repo.upsert(payload).await?;
    Ok(Json(rate))
}

/// DELETE /api/rates/:id - jobs fall back to the hardcoded card
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = RateRepository::new(state.get_db());
    let deleted = repo.delete(&id).await?;
    Ok(Json(deleted))
}
