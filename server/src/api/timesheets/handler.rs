//! Timesheet API handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::auth::CurrentUser;
use crate::billing::BillingService;
use crate::bookings::BookingService;
use crate::core::ServerState;
use crate::db::models::{Timesheet, TimesheetCreate};
use crate::db::repository::TimesheetRepository;
use shared::{AppError, AppResult, Role};

fn billing(state: &ServerState) -> BillingService {
    BillingService::new(state.get_db(), state.config.payment_terms_days)
}

/// GET /api/timesheets - admin sees all, interpreters their own
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<Timesheet>>> {
    let repo = TimesheetRepository::new(state.get_db());
    let timesheets = match (user.role, &user.profile) {
        (Role::Admin, _) => repo.find_all().await?,
        (Role::Interpreter, Some(profile)) => repo.find_by_interpreter(profile).await?,
        _ => return Err(AppError::forbidden("Not a timesheet holder")),
    };
    Ok(Json(timesheets))
}

/// GET /api/timesheets/:id - admin, the owning interpreter, or the
/// billed client
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Timesheet>> {
    let repo = TimesheetRepository::new(state.get_db());
    let timesheet = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Timesheet {}", id)))?;

    let owns = user.owns_profile(&timesheet.interpreter.to_string())
        || user.owns_profile(&timesheet.client.to_string());
    if !user.is_admin() && !owns {
        return Err(AppError::forbidden("Not your timesheet"));
    }
    Ok(Json(timesheet))
}

/// POST /api/timesheets - interpreter submits actual working time
///
/// Submission also completes the booking.
pub async fn submit(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<TimesheetCreate>,
) -> AppResult<Json<Timesheet>> {
    if user.role != Role::Interpreter {
        return Err(AppError::forbidden("Only interpreters submit timesheets"));
    }
    let profile = user
        .profile
        .as_deref()
        .ok_or_else(|| AppError::forbidden("Account has no linked profile"))?;

    let booking_id = payload.booking.clone();
    let timesheet = billing(&state).submit_timesheet(profile, payload).await?;
    BookingService::new(state.get_db())
        .complete_booking(&booking_id)
        .await?;
    Ok(Json(timesheet))
}

/// POST /api/timesheets/:id/approve - admin freezes the computed figures
pub async fn approve(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Timesheet>> {
    let timesheet = billing(&state).approve_timesheet(&id).await?;
    Ok(Json(timesheet))
}
