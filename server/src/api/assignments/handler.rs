//! Assignment (offer) API handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::bookings::BookingService;
use crate::core::ServerState;
use crate::db::models::{Assignment, AssignmentCreate, Booking, OfferActor};
use crate::db::repository::AssignmentRepository;
use shared::{AppError, AppResult};

fn service(state: &ServerState) -> BookingService {
    BookingService::new(state.get_db())
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Booking id ("booking:x")
    pub booking: Option<String>,
}

/// GET /api/assignments?booking=booking:x - admin view
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Assignment>>> {
    let repo = AssignmentRepository::new(state.get_db());
    let assignments = match query.booking {
        Some(booking) => repo.find_by_booking(&booking).await?,
        None => {
            return Err(AppError::validation("booking query parameter is required"));
        }
    };
    Ok(Json(assignments))
}

/// GET /api/assignments/mine - offers addressed to the calling interpreter
pub async fn list_mine(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<Assignment>>> {
    let profile = user
        .profile
        .as_deref()
        .ok_or_else(|| AppError::forbidden("Account has no linked profile"))?;
    let repo = AssignmentRepository::new(state.get_db());
    let assignments = repo.find_by_interpreter(profile).await?;
    Ok(Json(assignments))
}

/// POST /api/assignments - admin offers a booking to an interpreter
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<AssignmentCreate>,
) -> AppResult<Json<Assignment>> {
    let assignment = service(&state).create_assignment(payload).await?;
    Ok(Json(assignment))
}

/// The calling interpreter must hold the offer
async fn owned_offer(
    state: &ServerState,
    user: &CurrentUser,
    assignment_id: &str,
) -> AppResult<Assignment> {
    let repo = AssignmentRepository::new(state.get_db());
    let assignment = repo
        .find_by_id(assignment_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Assignment {}", assignment_id)))?;
    if !user.owns_profile(&assignment.interpreter.to_string()) {
        return Err(AppError::forbidden("Not your offer"));
    }
    Ok(assignment)
}

/// POST /api/assignments/:id/accept - interpreter accepts, confirming
/// the booking
pub async fn accept(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Booking>> {
    owned_offer(&state, &user, &id).await?;
    let booking = service(&state).accept_offer(&id).await?;
    Ok(Json(booking))
}

/// POST /api/assignments/:id/decline
///
/// An interpreter declines their own offer; an admin retracts any
/// offer. The recorded actor keeps the two distinguishable.
pub async fn decline(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Assignment>> {
    let actor = if user.is_admin() {
        OfferActor::Admin
    } else {
        owned_offer(&state, &user, &id).await?;
        OfferActor::Interpreter
    };
    let assignment = service(&state).decline_offer(&id, actor).await?;
    Ok(Json(assignment))
}
