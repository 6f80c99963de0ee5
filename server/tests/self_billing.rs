//! Interpreter self-billed invoice integration tests against an
//! in-memory store

use chrono::NaiveDate;
use lingua_server::billing::BillingService;
use lingua_server::bookings::BookingService;
use lingua_server::db::models::{
    Booking, BookingCreate, Client, Interpreter, InterpreterInvoiceStatus,
    InterpreterInvoiceSubmit, Location, ServiceType, Timesheet, TimesheetCreate,
};
use lingua_server::db::repository::{ClientRepository, InterpreterRepository};
use lingua_server::{Config, ServerState};
use shared::ErrorCode;

const TERMS_DAYS: i64 = 30;

async fn test_state() -> ServerState {
    let config = Config::default();
    ServerState::initialize_in_memory(&config)
        .await
        .expect("in-memory state")
}

async fn seed_client(state: &ServerState) -> String {
    let repo = ClientRepository::new(state.get_db());
    let client = repo
        .create(Client {
            id: None,
            name: "Acme Hospital".into(),
            contact_name: None,
            email: "billing@acme.example".into(),
            phone: None,
            billing_address: None,
            payment_terms_days: None,
            is_active: true,
        })
        .await
        .expect("client");
    client.id.expect("client id").to_string()
}

async fn seed_interpreter(state: &ServerState) -> String {
    let repo = InterpreterRepository::new(state.get_db());
    let interpreter = repo
        .create(Interpreter {
            id: None,
            name: "Maria Lopez".into(),
            email: "maria@example.com".into(),
            phone: None,
            languages: vec!["Spanish".into()],
            services: vec![ServiceType::Onsite],
            is_active: true,
        })
        .await
        .expect("interpreter");
    interpreter.id.expect("interpreter id").to_string()
}

fn millis(date: &str, hour: u32) -> i64 {
    date.parse::<NaiveDate>()
        .expect("date")
        .and_hms_opt(hour, 0, 0)
        .expect("time")
        .and_utc()
        .timestamp_millis()
}

/// Book, confirm, work, approve: one claimable timesheet
async fn claimable_timesheet(
    bookings: &BookingService,
    billing: &BillingService,
    client: &str,
    interpreter: &str,
    date: &str,
) -> Timesheet {
    let booking: Booking = bookings
        .create_booking(BookingCreate {
            client: client.to_string(),
            language_from: "English".into(),
            language_to: "Spanish".into(),
            service_type: ServiceType::Onsite,
            date: date.into(),
            start_time: "09:00".into(),
            duration_minutes: 120,
            location: Location::Onsite {
                address: "12 Harley St".into(),
            },
            notes: None,
        })
        .await
        .expect("booking");
    let booking_id = booking.id.as_ref().expect("id").to_string();
    bookings
        .assign_interpreter(&booking_id, interpreter)
        .await
        .expect("assign");
    let submitted = billing
        .submit_timesheet(
            interpreter,
            TimesheetCreate {
                booking: booking_id,
                actual_start: millis(date, 9),
                actual_end: millis(date, 11),
                break_minutes: 0,
            },
        )
        .await
        .expect("submit");
    billing
        .approve_timesheet(&submitted.id.expect("id").to_string())
        .await
        .expect("approve")
}

fn claim(reference: &str, total: f64, timesheets: &[&Timesheet]) -> InterpreterInvoiceSubmit {
    InterpreterInvoiceSubmit {
        reference: reference.to_string(),
        total_amount: total,
        timesheet_ids: timesheets
            .iter()
            .map(|ts| ts.id.as_ref().expect("id").to_string())
            .collect(),
    }
}

#[tokio::test]
async fn test_submission_claims_the_timesheets() {
    let state = test_state().await;
    let bookings = BookingService::new(state.get_db());
    let billing = BillingService::new(state.get_db(), TERMS_DAYS);
    let client = seed_client(&state).await;
    let interpreter = seed_interpreter(&state).await;

    let ts1 = claimable_timesheet(&bookings, &billing, &client, &interpreter, "2026-03-03").await;
    let ts2 = claimable_timesheet(&bookings, &billing, &client, &interpreter, "2026-03-10").await;

    let invoice = billing
        .submit_interpreter_invoice(&interpreter, claim("MLOPEZ-001", 100.0, &[&ts1, &ts2]))
        .await
        .expect("invoice");
    assert_eq!(invoice.status, InterpreterInvoiceStatus::Submitted);
    assert_eq!(invoice.total_amount, 100.0);
    let invoice_id = invoice.id.expect("id").to_string();

    // Two 2h jobs at the 25/unit fallback
    let lines = billing
        .interpreter_invoices()
        .find_lines(&invoice_id)
        .await
        .expect("lines");
    assert_eq!(lines.len(), 2);
    let line_total: f64 = lines.iter().map(|l| l.amount).sum();
    assert_eq!(line_total, 100.0);

    for ts in billing.timesheets().find_all().await.expect("timesheets") {
        assert_eq!(
            ts.interpreter_invoice.map(|r| r.to_string()),
            Some(invoice_id.clone())
        );
        assert!(!ts.ready_for_interpreter_invoice);
    }
}

#[tokio::test]
async fn test_claimed_timesheet_cannot_be_claimed_again() {
    let state = test_state().await;
    let bookings = BookingService::new(state.get_db());
    let billing = BillingService::new(state.get_db(), TERMS_DAYS);
    let client = seed_client(&state).await;
    let interpreter = seed_interpreter(&state).await;

    let ts = claimable_timesheet(&bookings, &billing, &client, &interpreter, "2026-03-03").await;
    billing
        .submit_interpreter_invoice(&interpreter, claim("MLOPEZ-001", 50.0, &[&ts]))
        .await
        .expect("first claim");

    let err = billing
        .submit_interpreter_invoice(&interpreter, claim("MLOPEZ-002", 50.0, &[&ts]))
        .await
        .expect_err("second claim");
    assert_eq!(err.code, ErrorCode::TimesheetAlreadyInvoiced);
}

#[tokio::test]
async fn test_another_interpreters_timesheet_is_refused() {
    let state = test_state().await;
    let bookings = BookingService::new(state.get_db());
    let billing = BillingService::new(state.get_db(), TERMS_DAYS);
    let client = seed_client(&state).await;
    let interpreter = seed_interpreter(&state).await;
    let other = {
        let repo = InterpreterRepository::new(state.get_db());
        repo.create(Interpreter {
            id: None,
            name: "Jan Novak".into(),
            email: "jan@example.com".into(),
            phone: None,
            languages: vec!["Czech".into()],
            services: vec![ServiceType::Onsite],
            is_active: true,
        })
        .await
        .expect("interpreter")
        .id
        .expect("id")
        .to_string()
    };

    let ts = claimable_timesheet(&bookings, &billing, &client, &interpreter, "2026-03-03").await;
    let err = billing
        .submit_interpreter_invoice(&other, claim("JNOVAK-001", 50.0, &[&ts]))
        .await
        .expect_err("foreign claim");
    assert_eq!(err.code, ErrorCode::NotResourceOwner);
}

#[tokio::test]
async fn test_approval_keeps_the_timesheets_claimed() {
    let state = test_state().await;
    let bookings = BookingService::new(state.get_db());
    let billing = BillingService::new(state.get_db(), TERMS_DAYS);
    let client = seed_client(&state).await;
    let interpreter = seed_interpreter(&state).await;

    let ts = claimable_timesheet(&bookings, &billing, &client, &interpreter, "2026-03-03").await;
    let invoice = billing
        .submit_interpreter_invoice(&interpreter, claim("MLOPEZ-001", 50.0, &[&ts]))
        .await
        .expect("invoice");
    let invoice_id = invoice.id.expect("id").to_string();

    let approved = billing
        .resolve_interpreter_invoice(&invoice_id, true)
        .await
        .expect("approve");
    assert_eq!(approved.status, InterpreterInvoiceStatus::Approved);
    assert!(approved.resolved_at.is_some());

    let timesheets = billing.timesheets().find_all().await.expect("timesheets");
    assert_eq!(
        timesheets[0].interpreter_invoice.as_ref().map(|r| r.to_string()),
        Some(invoice_id)
    );
}

#[tokio::test]
async fn test_rejection_releases_the_timesheets() {
    let state = test_state().await;
    let bookings = BookingService::new(state.get_db());
    let billing = BillingService::new(state.get_db(), TERMS_DAYS);
    let client = seed_client(&state).await;
    let interpreter = seed_interpreter(&state).await;

    let ts = claimable_timesheet(&bookings, &billing, &client, &interpreter, "2026-03-03").await;
    let invoice = billing
        .submit_interpreter_invoice(&interpreter, claim("MLOPEZ-001", 50.0, &[&ts]))
        .await
        .expect("invoice");
    let invoice_id = invoice.id.expect("id").to_string();

    let rejected = billing
        .resolve_interpreter_invoice(&invoice_id, false)
        .await
        .expect("reject");
    assert_eq!(rejected.status, InterpreterInvoiceStatus::Rejected);

    // Released timesheets can go onto a corrected invoice
    let timesheets = billing.timesheets().find_all().await.expect("timesheets");
    assert!(timesheets[0].interpreter_invoice.is_none());
    assert!(timesheets[0].ready_for_interpreter_invoice);

    let released = timesheets.into_iter().next().expect("timesheet");
    billing
        .submit_interpreter_invoice(&interpreter, claim("MLOPEZ-001R", 50.0, &[&released]))
        .await
        .expect("corrected claim");
}

#[tokio::test]
async fn test_rejecting_a_resolved_invoice_keeps_its_timesheets_claimed() {
    let state = test_state().await;
    let bookings = BookingService::new(state.get_db());
    let billing = BillingService::new(state.get_db(), TERMS_DAYS);
    let client = seed_client(&state).await;
    let interpreter = seed_interpreter(&state).await;

    let ts = claimable_timesheet(&bookings, &billing, &client, &interpreter, "2026-03-03").await;
    let invoice = billing
        .submit_interpreter_invoice(&interpreter, claim("MLOPEZ-001", 50.0, &[&ts]))
        .await
        .expect("invoice");
    let invoice_id = invoice.id.expect("id").to_string();

    billing
        .resolve_interpreter_invoice(&invoice_id, true)
        .await
        .expect("approve");

    // A late rejection loses, and must not free the claimed timesheets
    let err = billing
        .resolve_interpreter_invoice(&invoice_id, false)
        .await
        .expect_err("late reject");
    assert_eq!(err.code, ErrorCode::InvalidInvoiceTransition);

    let timesheets = billing.timesheets().find_all().await.expect("timesheets");
    assert_eq!(
        timesheets[0].interpreter_invoice.as_ref().map(|r| r.to_string()),
        Some(invoice_id)
    );
    assert!(!timesheets[0].ready_for_interpreter_invoice);
}
