//! Interpreter invoice API handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::auth::CurrentUser;
use crate::billing::BillingService;
use crate::core::ServerState;
use crate::db::models::{InterpreterInvoice, InterpreterInvoiceLine, InterpreterInvoiceSubmit};
use crate::db::repository::InterpreterInvoiceRepository;
use shared::{AppError, AppResult, Role};

fn billing(state: &ServerState) -> BillingService {
    BillingService::new(state.get_db(), state.config.payment_terms_days)
}

/// GET /api/interpreter-invoices - admin view
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<InterpreterInvoice>>> {
    let repo = InterpreterInvoiceRepository::new(state.get_db());
    let invoices = repo.find_all().await?;
    Ok(Json(invoices))
}

/// GET /api/interpreter-invoices/mine
pub async fn list_mine(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<InterpreterInvoice>>> {
    let profile = user
        .profile
        .as_deref()
        .ok_or_else(|| AppError::forbidden("Account has no linked profile"))?;
    let repo = InterpreterInvoiceRepository::new(state.get_db());
    let invoices = repo.find_by_interpreter(profile).await?;
    Ok(Json(invoices))
}

/// GET /api/interpreter-invoices/:id/lines - admin or the submitting
/// interpreter
pub async fn get_lines(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<InterpreterInvoiceLine>>> {
    let repo = InterpreterInvoiceRepository::new(state.get_db());
    let invoice = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Invoice {}", id)))?;
    if !user.is_admin() && !user.owns_profile(&invoice.interpreter.to_string()) {
        return Err(AppError::forbidden("Not your invoice"));
    }
    let lines = repo.find_lines(&id).await?;
    Ok(Json(lines))
}

/// POST /api/interpreter-invoices - interpreter submits a self-bill
pub async fn submit(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<InterpreterInvoiceSubmit>,
) -> AppResult<Json<InterpreterInvoice>> {
    if user.role != Role::Interpreter {
        return Err(AppError::forbidden("Only interpreters submit self-bills"));
    }
    let profile = user
        .profile
        .as_deref()
        .ok_or_else(|| AppError::forbidden("Account has no linked profile"))?;
    let invoice = billing(&state)
        .submit_interpreter_invoice(profile, payload)
        .await?;
    Ok(Json(invoice))
}

/// POST /api/interpreter-invoices/:id/approve
pub async fn approve(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<InterpreterInvoice>> {
    let invoice = billing(&state).resolve_interpreter_invoice(&id, true).await?;
    Ok(Json(invoice))
}

/// POST /api/interpreter-invoices/:id/reject - frees the claimed
/// timesheets
pub async fn reject(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<InterpreterInvoice>> {
    let invoice = billing(&state)
        .resolve_interpreter_invoice(&id, false)
        .await?;
    Ok(Json(invoice))
}
