//! Booking API handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};

use crate::auth::CurrentUser;
use crate::bookings::BookingService;
use crate::core::ServerState;
use crate::db::models::{Booking, BookingCreate, BookingStatus, BookingUpdate};
use crate::db::repository::BookingRepository;
use crate::utils::validation::{parse_date, parse_time, validate_payload};
use shared::{AppError, AppResult, Role};

fn service(state: &ServerState) -> BookingService {
    BookingService::new(state.get_db())
}

/// Owner-or-admin guard for one booking
fn authorize_view(user: &CurrentUser, booking: &Booking) -> AppResult<()> {
    if user.is_admin() {
        return Ok(());
    }
    let client = booking.client.to_string();
    if user.owns_profile(&client) {
        return Ok(());
    }
    if let Some(interpreter) = &booking.interpreter {
        if user.owns_profile(&interpreter.to_string()) {
            return Ok(());
        }
    }
    Err(AppError::forbidden("Not your booking"))
}

/// GET /api/bookings - list bookings visible to the caller
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<Booking>>> {
    let repo = BookingRepository::new(state.get_db());
    let bookings = match (user.role, &user.profile) {
        (Role::Admin, _) => repo.find_all().await?,
        (Role::Client, Some(profile)) => repo.find_by_client(profile).await?,
        (Role::Interpreter, Some(profile)) => repo.find_by_interpreter(profile).await?,
        // An account without a linked profile owns nothing
        _ => return Err(AppError::forbidden("Account has no linked profile")),
    };
    Ok(Json(bookings))
}

/// GET /api/bookings/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Booking>> {
    let repo = BookingRepository::new(state.get_db());
    let booking = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Booking {}", id)))?;
    authorize_view(&user, &booking)?;
    Ok(Json(booking))
}

/// POST /api/bookings - client requests a booking
///
/// Clients may only book for their own profile; admins may book on any
/// client's behalf.
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<BookingCreate>,
) -> AppResult<Json<Booking>> {
    match user.role {
        Role::Admin => {}
        Role::Client => {
            if !user.owns_profile(&payload.client) {
                return Err(AppError::forbidden("Clients may only book for themselves"));
            }
        }
        Role::Interpreter => {
            return Err(AppError::forbidden("Interpreters cannot create bookings"));
        }
    }
    let booking = service(&state).create_booking(payload).await?;
    Ok(Json(booking))
}

/// PUT /api/bookings/:id - admin edits booking details
///
/// Details only; status never moves through this path.
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<BookingUpdate>,
) -> AppResult<Json<Booking>> {
    validate_payload(&payload)?;
    if let Some(date) = &payload.date {
        parse_date(date)?;
    }
    if let Some(time) = &payload.start_time {
        parse_time(time)?;
    }

    let repo = BookingRepository::new(state.get_db());
    let existing = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Booking {}", id)))?;
    if !matches!(
        existing.status,
        BookingStatus::Requested | BookingStatus::Offered
    ) {
        return Err(AppError::invalid(format!(
            "Booking details are frozen once {}",
            existing.status.as_str()
        )));
    }

    let booking = repo.update_details(&id, payload).await?;
    Ok(Json(booking))
}

/// POST /api/bookings/:id/cancel
pub async fn cancel(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Booking>> {
    let repo = BookingRepository::new(state.get_db());
    let booking = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Booking {}", id)))?;
    if !user.is_admin() && !user.owns_profile(&booking.client.to_string()) {
        return Err(AppError::forbidden("Not your booking"));
    }

    let cancelled = service(&state).cancel_booking(&id).await?;
    Ok(Json(cancelled))
}

#[derive(Debug, Deserialize)]
pub struct AssignRequest {
    /// Interpreter id ("interpreter:x")
    pub interpreter: String,
}

/// POST /api/bookings/:id/assign - admin direct-assign
pub async fn assign(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<AssignRequest>,
) -> AppResult<Json<Booking>> {
    let booking = service(&state)
        .assign_interpreter(&id, &payload.interpreter)
        .await?;
    Ok(Json(booking))
}

#[derive(Debug, Deserialize)]
pub struct ConflictQuery {
    pub interpreter: String,
    /// YYYY-MM-DD
    pub date: String,
    /// HH:MM
    pub start_time: String,
    pub duration_minutes: i64,
    pub exclude_booking: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ConflictResponse {
    pub conflict: bool,
    pub conflicting_booking: Option<String>,
}

/// GET /api/bookings/conflict-check - advisory schedule overlap scan
pub async fn conflict_check(
    State(state): State<ServerState>,
    Query(query): Query<ConflictQuery>,
) -> AppResult<Json<ConflictResponse>> {
    let date = parse_date(&query.date)?;
    let start_time = parse_time(&query.start_time)?;

    let hit = service(&state)
        .check_schedule_conflict(
            &query.interpreter,
            date,
            start_time,
            query.duration_minutes,
            query.exclude_booking.as_deref(),
        )
        .await?;

    Ok(Json(ConflictResponse {
        conflict: hit.is_some(),
        conflicting_booking: hit.and_then(|b| b.id.map(|id| id.to_string())),
    }))
}
