//! Client invoice API handlers
//!
//! Invoice reads are fail-closed: a caller who is neither admin nor the
//! owning client gets a permission error, never an empty list.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::billing::BillingService;
use crate::core::ServerState;
use crate::db::models::{
    ClientInvoice, ClientInvoiceLine, ClientInvoiceStatus, GenerateClientInvoiceRequest,
    GenerateClientInvoiceResult,
};
use crate::db::repository::ClientInvoiceRepository;
use shared::{AppError, AppResult};

fn billing(state: &ServerState) -> BillingService {
    BillingService::new(state.get_db(), state.config.payment_terms_days)
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Client id ("client:x"); optional for admins, implied for clients
    pub client: Option<String>,
}

/// GET /api/client-invoices?client=client:x
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<ClientInvoice>>> {
    let repo = ClientInvoiceRepository::new(state.get_db());

    if user.is_admin() {
        let invoices = match query.client {
            Some(client) => repo.find_by_client(&client).await?,
            None => repo.find_all().await?,
        };
        return Ok(Json(invoices));
    }

    let profile = user
        .profile
        .as_deref()
        .ok_or_else(|| AppError::forbidden("Account has no linked profile"))?;
    if let Some(requested) = &query.client {
        if requested != profile {
            return Err(AppError::forbidden("Not your invoices"));
        }
    }
    let invoices = repo.find_by_client(profile).await?;
    Ok(Json(invoices))
}

/// Owner-or-admin guard for one invoice
async fn owned_invoice(
    state: &ServerState,
    user: &CurrentUser,
    invoice_id: &str,
) -> AppResult<ClientInvoice> {
    let repo = ClientInvoiceRepository::new(state.get_db());
    let invoice = repo
        .find_by_id(invoice_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Invoice {}", invoice_id)))?;
    if !user.is_admin() && !user.owns_profile(&invoice.client.to_string()) {
        return Err(AppError::forbidden("Not your invoice"));
    }
    Ok(invoice)
}

/// GET /api/client-invoices/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<ClientInvoice>> {
    let invoice = owned_invoice(&state, &user, &id).await?;
    Ok(Json(invoice))
}

/// GET /api/client-invoices/:id/lines
pub async fn get_lines(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<ClientInvoiceLine>>> {
    owned_invoice(&state, &user, &id).await?;
    let repo = ClientInvoiceRepository::new(state.get_db());
    let lines = repo.find_lines(&id).await?;
    Ok(Json(lines))
}

/// POST /api/client-invoices/generate - roll up a client's approved
/// timesheets for a period
pub async fn generate(
    State(state): State<ServerState>,
    Json(payload): Json<GenerateClientInvoiceRequest>,
) -> AppResult<Json<GenerateClientInvoiceResult>> {
    let result = billing(&state).generate_client_invoice(payload).await?;
    Ok(Json(result))
}

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: ClientInvoiceStatus,
}

/// POST /api/client-invoices/:id/status - DRAFT -> SENT -> PAID
///
/// Marking an invoice paid also stamps its bookings PAID.
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<StatusRequest>,
) -> AppResult<Json<ClientInvoice>> {
    let invoice = billing(&state)
        .update_client_invoice_status(&id, payload.status)
        .await?;
    Ok(Json(invoice))
}
