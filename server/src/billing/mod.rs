//! Billing engine
//!
//! Per-timesheet pricing at approval time, client invoice rollup, and
//! interpreter self-billed invoices. Rollup writes are atomic: the
//! invoice, its lines, and the timesheet links land in one transaction.

pub mod calculator;

#[cfg(test)]
mod tests;

use crate::db::models::{
    Booking, BookingStatus, ClientInvoice, ClientInvoiceLine, ClientInvoiceStatus,
    GenerateClientInvoiceRequest, GenerateClientInvoiceResult, InterpreterInvoice,
    InterpreterInvoiceLine, InterpreterInvoiceStatus, InterpreterInvoiceSubmit, RateType,
    Timesheet, TimesheetCreate, TimesheetStatus,
};
use crate::db::repository::{
    ApprovalFigures, BookingRepository, ClientInvoiceRepository, ClientRepository,
    InterpreterInvoiceRepository, RateRepository, RepoError, TimesheetRepository, parse_record_id,
};
use crate::utils::validation::{parse_date, validate_payload};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use shared::{AppError, AppResult, ErrorCode};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

/// Billing service
#[derive(Clone)]
pub struct BillingService {
    timesheets: TimesheetRepository,
    rates: RateRepository,
    client_invoices: ClientInvoiceRepository,
    interpreter_invoices: InterpreterInvoiceRepository,
    bookings: BookingRepository,
    clients: ClientRepository,
    /// Default payment terms when the client profile carries none
    default_terms_days: i64,
}

impl BillingService {
    pub fn new(db: Surreal<Db>, default_terms_days: i64) -> Self {
        Self {
            timesheets: TimesheetRepository::new(db.clone()),
            rates: RateRepository::new(db.clone()),
            client_invoices: ClientInvoiceRepository::new(db.clone()),
            interpreter_invoices: InterpreterInvoiceRepository::new(db.clone()),
            bookings: BookingRepository::new(db.clone()),
            clients: ClientRepository::new(db),
            default_terms_days,
        }
    }

    /// Interpreter submits a timesheet for a booking they hold
    ///
    /// The booking must be CONFIRMED for this interpreter; submission
    /// also completes the booking (the caller drives that through
    /// [`crate::bookings::BookingService::complete_booking`]).
    pub async fn submit_timesheet(
        &self,
        interpreter_id: &str,
        data: TimesheetCreate,
    ) -> AppResult<Timesheet> {
        validate_payload(&data)?;
        if data.actual_end <= data.actual_start {
            return Err(AppError::with_message(
                ErrorCode::InvalidTimesheetPeriod,
                "actual_end must be after actual_start",
            ));
        }

        let booking = self
            .bookings
            .find_by_id(&data.booking)
            .await?
            .ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::BookingNotFound,
                    format!("Booking {} not found", data.booking),
                )
            })?;
        if booking.status != BookingStatus::Confirmed {
            return Err(AppError::conflict(
                ErrorCode::InvalidBookingTransition,
                format!(
                    "Booking {} is {}, not CONFIRMED",
                    data.booking,
                    booking.status.as_str()
                ),
            ));
        }
        let holder = booking.interpreter.as_ref().map(|r| r.to_string());
        if holder.as_deref() != Some(interpreter_id) {
            return Err(AppError::with_message(
                ErrorCode::NotResourceOwner,
                "Booking is not confirmed for this interpreter",
            ));
        }

        let timesheet = Timesheet {
            id: None,
            booking: parse_record_id("booking", &data.booking).map_err(AppError::from)?,
            interpreter: parse_record_id("interpreter", interpreter_id).map_err(AppError::from)?,
            client: booking.client.clone(),
            actual_start: data.actual_start,
            actual_end: data.actual_end,
            break_minutes: data.break_minutes,
            admin_approved: false,
            status: TimesheetStatus::Submitted,
            client_units: None,
            client_amount: None,
            interpreter_units: None,
            interpreter_amount: None,
            ready_for_client_invoice: false,
            ready_for_interpreter_invoice: false,
            client_invoice: None,
            interpreter_invoice: None,
            created_at: chrono::Utc::now().timestamp_millis(),
        };
        let created = self.timesheets.create(timesheet).await?;
        tracing::info!(
            booking = %data.booking,
            interpreter = %interpreter_id,
            "Timesheet submitted"
        );
        Ok(created)
    }

    /// Admin approves a timesheet, freezing the computed figures
    ///
    /// Both sides are priced independently; a missing rate record falls
    /// back to the side's hardcoded card. Re-approval is rejected.
    pub async fn approve_timesheet(&self, timesheet_id: &str) -> AppResult<Timesheet> {
        let timesheet = self.get_timesheet(timesheet_id).await?;
        if timesheet.admin_approved {
            return Err(AppError::conflict(
                ErrorCode::TimesheetAlreadyApproved,
                format!("Timesheet {} is already approved", timesheet_id),
            ));
        }

        let booking_id = timesheet.booking.to_string();
        let booking = self
            .bookings
            .find_by_id(&booking_id)
            .await?
            .ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::BookingNotFound,
                    format!("Booking {} not found", booking_id),
                )
            })?;

        let client_rate = self
            .rates
            .find_by_key(RateType::Client, booking.service_type)
            .await?;
        let interpreter_rate = self
            .rates
            .find_by_key(RateType::Interpreter, booking.service_type)
            .await?;

        let client_side = calculator::price_side(
            RateType::Client,
            client_rate.as_ref(),
            timesheet.actual_start,
            timesheet.actual_end,
            timesheet.break_minutes,
        );
        let interpreter_side = calculator::price_side(
            RateType::Interpreter,
            interpreter_rate.as_ref(),
            timesheet.actual_start,
            timesheet.actual_end,
            timesheet.break_minutes,
        );

        let figures = ApprovalFigures {
            client_units: calculator::to_f64(client_side.units),
            client_amount: calculator::to_f64(client_side.amount),
            interpreter_units: calculator::to_f64(interpreter_side.units),
            interpreter_amount: calculator::to_f64(interpreter_side.amount),
        };

        let approved = self
            .timesheets
            .approve(timesheet_id, figures)
            .await
            .map_err(|err| match err {
                RepoError::Duplicate(msg) => {
                    AppError::conflict(ErrorCode::TimesheetAlreadyApproved, msg)
                }
                other => other.into(),
            })?;

        tracing::info!(
            timesheet = %timesheet_id,
            client_amount = %client_side.amount,
            interpreter_amount = %interpreter_side.amount,
            "Timesheet approved"
        );
        Ok(approved)
    }

    /// Roll approved, uninvoiced timesheets of one client and period
    /// into a single DRAFT invoice
    ///
    /// Zero eligible timesheets is a no-op: nothing is created. Eligible
    /// timesheets become the invoice's lines and are stamped INVOICED in
    /// the same transaction as the invoice itself.
    pub async fn generate_client_invoice(
        &self,
        req: GenerateClientInvoiceRequest,
    ) -> AppResult<GenerateClientInvoiceResult> {
        let period_start = parse_date(&req.period_start)?;
        let period_end = parse_date(&req.period_end)?;
        if period_end < period_start {
            return Err(AppError::validation("period_end is before period_start"));
        }

        let start_millis = start_of_day_millis(period_start);
        let end_millis = end_of_day_millis(period_end);

        let eligible = self
            .timesheets
            .find_eligible_for_client_invoice(&req.client_id, start_millis, end_millis)
            .await?;
        if eligible.is_empty() {
            return Ok(GenerateClientInvoiceResult {
                invoice_id: None,
                count: 0,
                total: 0.0,
            });
        }

        let client = parse_record_id("client", &req.client_id).map_err(AppError::from)?;
        let terms_days = self
            .clients
            .find_by_id(&req.client_id)
            .await?
            .and_then(|c| c.payment_terms_days)
            .unwrap_or(self.default_terms_days);

        let now = chrono::Utc::now().timestamp_millis();
        let invoice_key = now.to_string();
        let reference = format!("INV-{}", now);
        let invoice_record = surrealdb::RecordId::from_table_key("client_invoice", invoice_key.as_str());

        // Summed in Decimal so float noise cannot creep into the total
        let total: Decimal = eligible
            .iter()
            .map(|ts| calculator::to_decimal(ts.client_amount.unwrap_or(0.0)))
            .sum();
        let total = calculator::to_f64(total);

        let mut lines = Vec::with_capacity(eligible.len());
        let mut timesheet_ids = Vec::with_capacity(eligible.len());
        let mut booking_ids = Vec::with_capacity(eligible.len());
        for ts in &eligible {
            let ts_id = ts
                .id
                .clone()
                .ok_or_else(|| AppError::internal("Timesheet missing id"))?;
            let units = calculator::to_decimal(ts.client_units.unwrap_or(0.0));
            let line_amount = calculator::to_decimal(ts.client_amount.unwrap_or(0.0));
            let rate = if units.is_zero() {
                Decimal::ZERO
            } else {
                line_amount / units
            };
            lines.push(ClientInvoiceLine {
                id: None,
                invoice: invoice_record.clone(),
                timesheet: ts_id.clone(),
                booking: ts.booking.clone(),
                description: format!(
                    "Interpreting {} on {}",
                    ts.booking,
                    millis_date(ts.actual_start)
                ),
                units: calculator::to_f64(units),
                rate: calculator::to_f64(rate),
                amount: calculator::to_f64(line_amount),
            });
            timesheet_ids.push(ts_id);
            booking_ids.push(ts.booking.to_string());
        }

        let invoice = ClientInvoice {
            id: None,
            reference: reference.clone(),
            client,
            period_start: start_millis,
            period_end: end_millis,
            issue_date: now,
            due_date: now + terms_days * 86_400_000,
            total_amount: total,
            status: ClientInvoiceStatus::Draft,
        };

        let created = self
            .client_invoices
            .create_with_lines(&invoice_key, invoice, lines, timesheet_ids)
            .await?;

        // Booking statuses follow the invoice after the fact; a failed
        // stamp leaves the authoritative timesheet link intact.
        for booking_id in booking_ids {
            if let Err(err) = self.stamp_booking(&booking_id, BookingStatus::Invoiced).await {
                tracing::warn!(
                    booking = %booking_id,
                    error = %err,
                    "Failed to mark booking invoiced"
                );
            }
        }

        let invoice_id = created.id.as_ref().map(|id| id.to_string());
        tracing::info!(
            client = %req.client_id,
            invoice = %reference,
            count = eligible.len(),
            total = %total,
            "Client invoice generated"
        );
        Ok(GenerateClientInvoiceResult {
            invoice_id,
            count: eligible.len(),
            total,
        })
    }

    /// Interpreter submits a self-billed invoice over their approved,
    /// unclaimed timesheets
    pub async fn submit_interpreter_invoice(
        &self,
        interpreter_id: &str,
        data: InterpreterInvoiceSubmit,
    ) -> AppResult<InterpreterInvoice> {
        validate_payload(&data)?;

        let mut lines = Vec::with_capacity(data.timesheet_ids.len());
        let mut timesheet_ids = Vec::with_capacity(data.timesheet_ids.len());
        let now = chrono::Utc::now().timestamp_millis();
        let invoice_key = now.to_string();
        let invoice_record =
            surrealdb::RecordId::from_table_key("interpreter_invoice", invoice_key.as_str());

        for ts_ref in &data.timesheet_ids {
            let ts = self.get_timesheet(ts_ref).await?;
            if ts.interpreter.to_string() != interpreter_id {
                return Err(AppError::with_message(
                    ErrorCode::NotResourceOwner,
                    format!("Timesheet {} belongs to another interpreter", ts_ref),
                ));
            }
            if !ts.ready_for_interpreter_invoice || ts.interpreter_invoice.is_some() {
                return Err(AppError::conflict(
                    ErrorCode::TimesheetAlreadyInvoiced,
                    format!("Timesheet {} is not claimable", ts_ref),
                ));
            }
            let ts_id = ts
                .id
                .clone()
                .ok_or_else(|| AppError::internal("Timesheet missing id"))?;
            lines.push(InterpreterInvoiceLine {
                id: None,
                invoice: invoice_record.clone(),
                timesheet: ts_id.clone(),
                amount: ts.interpreter_amount.unwrap_or(0.0),
            });
            timesheet_ids.push(ts_id);
        }

        let invoice = InterpreterInvoice {
            id: None,
            reference: data.reference,
            interpreter: parse_record_id("interpreter", interpreter_id).map_err(AppError::from)?,
            total_amount: data.total_amount,
            status: InterpreterInvoiceStatus::Submitted,
            submitted_at: now,
            resolved_at: None,
        };

        let created = self
            .interpreter_invoices
            .submit_with_lines(&invoice_key, invoice, lines, timesheet_ids)
            .await?;
        tracing::info!(
            interpreter = %interpreter_id,
            invoice = %created.reference,
            count = data.timesheet_ids.len(),
            "Interpreter invoice submitted"
        );
        Ok(created)
    }

    /// Admin approves or rejects a submitted interpreter invoice;
    /// rejection frees the claimed timesheets
    pub async fn resolve_interpreter_invoice(
        &self,
        invoice_id: &str,
        approve: bool,
    ) -> AppResult<InterpreterInvoice> {
        let status = if approve {
            InterpreterInvoiceStatus::Approved
        } else {
            InterpreterInvoiceStatus::Rejected
        };
        self.interpreter_invoices
            .resolve(invoice_id, status)
            .await
            .map_err(|err| match err {
                RepoError::Duplicate(msg) => {
                    AppError::conflict(ErrorCode::InvalidInvoiceTransition, msg)
                }
                other => other.into(),
            })
    }

    /// Move a client invoice DRAFT -> SENT -> PAID
    ///
    /// Payment is pushed down onto the invoice's bookings the same way
    /// the rollup stamps them INVOICED: best effort, after the invoice
    /// write itself has landed.
    pub async fn update_client_invoice_status(
        &self,
        invoice_id: &str,
        status: ClientInvoiceStatus,
    ) -> AppResult<ClientInvoice> {
        let existing = self
            .client_invoices
            .find_by_id(invoice_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Invoice {}", invoice_id)))?;

        let legal = matches!(
            (existing.status, status),
            (ClientInvoiceStatus::Draft, ClientInvoiceStatus::Sent)
                | (ClientInvoiceStatus::Sent, ClientInvoiceStatus::Paid)
        );
        if !legal {
            return Err(AppError::conflict(
                ErrorCode::InvalidInvoiceTransition,
                format!("Invoice {} cannot move to the requested status", invoice_id),
            ));
        }

        let invoice = self.client_invoices.update_status(invoice_id, status).await?;

        if status == ClientInvoiceStatus::Paid {
            for line in self.client_invoices.find_lines(invoice_id).await? {
                let booking_id = line.booking.to_string();
                if let Err(err) = self.stamp_booking(&booking_id, BookingStatus::Paid).await {
                    tracing::warn!(
                        booking = %booking_id,
                        error = %err,
                        "Failed to mark booking paid"
                    );
                }
            }
        }
        Ok(invoice)
    }

    pub fn timesheets(&self) -> &TimesheetRepository {
        &self.timesheets
    }

    pub fn rates(&self) -> &RateRepository {
        &self.rates
    }

    pub fn client_invoices(&self) -> &ClientInvoiceRepository {
        &self.client_invoices
    }

    pub fn interpreter_invoices(&self) -> &InterpreterInvoiceRepository {
        &self.interpreter_invoices
    }

    async fn get_timesheet(&self, id: &str) -> AppResult<Timesheet> {
        self.timesheets.find_by_id(id).await?.ok_or_else(|| {
            AppError::with_message(
                ErrorCode::TimesheetNotFound,
                format!("Timesheet {} not found", id),
            )
        })
    }

    async fn stamp_booking(&self, booking_id: &str, to: BookingStatus) -> AppResult<Booking> {
        let booking = self
            .bookings
            .find_by_id(booking_id)
            .await?
            .ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::BookingNotFound,
                    format!("Booking {} not found", booking_id),
                )
            })?;
        crate::bookings::check_transition(booking.status, to)?;
        Ok(self
            .bookings
            .transition(booking_id, booking.version, to, None)
            .await?)
    }
}

fn start_of_day_millis(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp_millis())
        .unwrap_or(0)
}

fn end_of_day_millis(date: NaiveDate) -> i64 {
    date.and_hms_milli_opt(23, 59, 59, 999)
        .map(|dt| dt.and_utc().timestamp_millis())
        .unwrap_or(0)
}

fn millis_date(millis: i64) -> String {
    chrono::DateTime::from_timestamp_millis(millis)
        .map(|dt| dt.date_naive().to_string())
        .unwrap_or_default()
}
