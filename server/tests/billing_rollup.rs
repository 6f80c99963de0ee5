//! Timesheet approval and invoice rollup integration tests against an
//! in-memory store

use chrono::NaiveDate;
use lingua_server::billing::BillingService;
use lingua_server::bookings::BookingService;
use lingua_server::db::models::{
    Booking, BookingCreate, BookingStatus, Client, ClientInvoice, ClientInvoiceLine,
    ClientInvoiceStatus, GenerateClientInvoiceRequest, Interpreter, Location, RateType, RateUpsert,
    ServiceType, Timesheet, TimesheetCreate, TimesheetStatus,
};
use lingua_server::db::repository::{ClientRepository, InterpreterRepository};
use lingua_server::{Config, ServerState};
use shared::ErrorCode;
use surrealdb::RecordId;

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

/// Create a booking and confirm it for the interpreter
async fn confirmed_booking(
    bookings: &BookingService,
    client: &str,
    interpreter: &str,
    date: &str,
    start: &str,
) -> Booking {
    let booking = bookings
        .create_booking(BookingCreate {
            client: client.to_string(),
            language_from: "English".into(),
            language_to: "Spanish".into(),
            service_type: ServiceType::Onsite,
            date: date.into(),
            start_time: start.into(),
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
        .expect("assign")
}

fn millis(date: &str, hour: u32, minute: u32) -> i64 {
    date.parse::<NaiveDate>()
        .expect("date")
        .and_hms_opt(hour, minute, 0)
        .expect("time")
        .and_utc()
        .timestamp_millis()
}

/// Submit and approve a timesheet for a confirmed booking
async fn approved_timesheet(
    billing: &BillingService,
    interpreter: &str,
    booking: &Booking,
    date: &str,
    start_hour: u32,
    end_hour: u32,
) -> Timesheet {
    let submitted = billing
        .submit_timesheet(
            interpreter,
            TimesheetCreate {
                booking: booking.id.as_ref().expect("id").to_string(),
                actual_start: millis(date, start_hour, 0),
                actual_end: millis(date, end_hour, 0),
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

#[tokio::test]
async fn test_approval_freezes_both_sides_from_fallback_rates() {
    let state = test_state().await;
    let bookings = BookingService::new(state.get_db());
    let billing = BillingService::new(state.get_db(), TERMS_DAYS);
    let client = seed_client(&state).await;
    let interpreter = seed_interpreter(&state).await;

    let booking = confirmed_booking(&bookings, &client, &interpreter, "2026-03-10", "09:00").await;
    // 2 hours, no stored rates: client 2 * 40, interpreter 2 * 25
    let approved =
        approved_timesheet(&billing, &interpreter, &booking, "2026-03-10", 9, 11).await;

    assert!(approved.admin_approved);
    assert_eq!(approved.status, TimesheetStatus::Approved);
    assert!(approved.ready_for_client_invoice);
    assert_eq!(approved.client_units, Some(2.0));
    assert_eq!(approved.client_amount, Some(80.0));
    assert_eq!(approved.interpreter_units, Some(2.0));
    assert_eq!(approved.interpreter_amount, Some(50.0));

    // The frozen figures survive a fresh read from the store
    let reread = billing
        .timesheets()
        .find_by_id(&approved.id.expect("id").to_string())
        .await
        .expect("query")
        .expect("timesheet");
    assert_eq!(reread.client_amount, Some(80.0));
    assert_eq!(reread.interpreter_amount, Some(50.0));
    assert_eq!(reread.status, TimesheetStatus::Approved);
}

#[tokio::test]
async fn test_approval_uses_stored_rate_and_minimum_units() {
    let state = test_state().await;
    let bookings = BookingService::new(state.get_db());
    let billing = BillingService::new(state.get_db(), TERMS_DAYS);
    let client = seed_client(&state).await;
    let interpreter = seed_interpreter(&state).await;

    // Stored client rate with a 2-unit minimum; interpreter side still
    // falls back
    billing
        .rates()
        .upsert(RateUpsert {
            rate_type: RateType::Client,
            service_type: ServiceType::Onsite,
            amount_per_unit: 60.0,
            minimum_units: 2.0,
        })
        .await
        .expect("rate");

    let booking = confirmed_booking(&bookings, &client, &interpreter, "2026-03-10", "09:00").await;
    // 1 hour worked, below the client minimum
    let approved =
        approved_timesheet(&billing, &interpreter, &booking, "2026-03-10", 9, 10).await;

    assert_eq!(approved.client_units, Some(2.0));
    assert_eq!(approved.client_amount, Some(120.0));
    assert_eq!(approved.interpreter_units, Some(1.0));
    assert_eq!(approved.interpreter_amount, Some(25.0));
}

#[tokio::test]
async fn test_double_approval_is_rejected() {
    let state = test_state().await;
    let bookings = BookingService::new(state.get_db());
    let billing = BillingService::new(state.get_db(), TERMS_DAYS);
    let client = seed_client(&state).await;
    let interpreter = seed_interpreter(&state).await;

    let booking = confirmed_booking(&bookings, &client, &interpreter, "2026-03-10", "09:00").await;
    let approved =
        approved_timesheet(&billing, &interpreter, &booking, "2026-03-10", 9, 11).await;

    let err = billing
        .approve_timesheet(&approved.id.expect("id").to_string())
        .await
        .expect_err("second approval");
    assert_eq!(err.code, ErrorCode::TimesheetAlreadyApproved);
}

#[tokio::test]
async fn test_rollup_creates_one_invoice_with_all_lines() {
    let state = test_state().await;
    let bookings = BookingService::new(state.get_db());
    let billing = BillingService::new(state.get_db(), TERMS_DAYS);
    let client = seed_client(&state).await;
    let interpreter = seed_interpreter(&state).await;

    // Three jobs in March: 2h + 2h + 3h at the 40/unit fallback
    let mut expected_total = 0.0;
    for (date, start, end) in [
        ("2026-03-03", 9, 11),
        ("2026-03-10", 9, 11),
        ("2026-03-17", 9, 12),
    ] {
        let booking = confirmed_booking(&bookings, &client, &interpreter, date, "09:00").await;
        let ts = approved_timesheet(&billing, &interpreter, &booking, date, start, end).await;
        expected_total += ts.client_amount.expect("amount");
    }

    let result = billing
        .generate_client_invoice(GenerateClientInvoiceRequest {
            client_id: client.clone(),
            period_start: "2026-03-01".into(),
            period_end: "2026-03-31".into(),
        })
        .await
        .expect("rollup");

    assert_eq!(result.count, 3);
    assert_eq!(result.total, expected_total);
    assert_eq!(result.total, 280.0);
    let invoice_id = result.invoice_id.expect("invoice id");

    let invoices = billing.client_invoices().find_all().await.expect("query");
    assert_eq!(invoices.len(), 1);
    let invoice = &invoices[0];
    assert_eq!(invoice.status, ClientInvoiceStatus::Draft);
    assert_eq!(invoice.total_amount, expected_total);
    assert_eq!(
        invoice.due_date,
        invoice.issue_date + TERMS_DAYS * 86_400_000
    );

    let lines = billing
        .client_invoices()
        .find_lines(&invoice_id)
        .await
        .expect("lines");
    assert_eq!(lines.len(), 3);
    let line_total: f64 = lines.iter().map(|l| l.amount).sum();
    assert_eq!(line_total, expected_total);

    // Every rolled-up timesheet is stamped and linked
    for ts in billing.timesheets().find_all().await.expect("timesheets") {
        assert_eq!(ts.status, TimesheetStatus::Invoiced);
        assert!(!ts.ready_for_client_invoice);
        assert_eq!(
            ts.client_invoice.map(|r| r.to_string()),
            Some(invoice_id.clone())
        );
    }

    // A second run over the same period finds nothing left
    let rerun = billing
        .generate_client_invoice(GenerateClientInvoiceRequest {
            client_id: client,
            period_start: "2026-03-01".into(),
            period_end: "2026-03-31".into(),
        })
        .await
        .expect("rerun");
    assert!(rerun.invoice_id.is_none());
    assert_eq!(rerun.count, 0);
    assert_eq!(billing.client_invoices().find_all().await.expect("query").len(), 1);
}

#[tokio::test]
async fn test_rollup_skips_timesheets_outside_the_period() {
    let state = test_state().await;
    let bookings = BookingService::new(state.get_db());
    let billing = BillingService::new(state.get_db(), TERMS_DAYS);
    let client = seed_client(&state).await;
    let interpreter = seed_interpreter(&state).await;

    let in_period = confirmed_booking(&bookings, &client, &interpreter, "2026-03-10", "09:00").await;
    approved_timesheet(&billing, &interpreter, &in_period, "2026-03-10", 9, 11).await;
    let out_of_period =
        confirmed_booking(&bookings, &client, &interpreter, "2026-04-02", "09:00").await;
    approved_timesheet(&billing, &interpreter, &out_of_period, "2026-04-02", 9, 11).await;

    let result = billing
        .generate_client_invoice(GenerateClientInvoiceRequest {
            client_id: client,
            period_start: "2026-03-01".into(),
            period_end: "2026-03-31".into(),
        })
        .await
        .expect("rollup");
    assert_eq!(result.count, 1);
    assert_eq!(result.total, 80.0);
}

#[tokio::test]
async fn test_rollup_with_zero_eligible_creates_nothing() {
    let state = test_state().await;
    let billing = BillingService::new(state.get_db(), TERMS_DAYS);
    let client = seed_client(&state).await;

    let result = billing
        .generate_client_invoice(GenerateClientInvoiceRequest {
            client_id: client,
            period_start: "2026-03-01".into(),
            period_end: "2026-03-31".into(),
        })
        .await
        .expect("rollup");

    assert!(result.invoice_id.is_none());
    assert_eq!(result.count, 0);
    assert_eq!(result.total, 0.0);
    assert!(billing.client_invoices().find_all().await.expect("query").is_empty());
}

#[tokio::test]
async fn test_rollup_transaction_is_all_or_nothing() {
    let state = test_state().await;
    let bookings = BookingService::new(state.get_db());
    let billing = BillingService::new(state.get_db(), TERMS_DAYS);
    let client = seed_client(&state).await;
    let interpreter = seed_interpreter(&state).await;

    let booking = confirmed_booking(&bookings, &client, &interpreter, "2026-03-10", "09:00").await;
    let approved =
        approved_timesheet(&billing, &interpreter, &booking, "2026-03-10", 9, 11).await;

    let client_key = client.split(':').nth(1).expect("client key");
    let invoice = |reference: &str| ClientInvoice {
        id: None,
        reference: reference.to_string(),
        client: RecordId::from_table_key("client", client_key),
        period_start: millis("2026-03-01", 0, 0),
        period_end: millis("2026-03-31", 23, 59),
        issue_date: millis("2026-04-01", 0, 0),
        due_date: millis("2026-05-01", 0, 0),
        total_amount: 80.0,
        status: ClientInvoiceStatus::Draft,
    };

    // Occupy the invoice key so the CREATE inside the transaction fails
    // mid-batch
    state
        .get_db()
        .query("CREATE type::thing('client_invoice', $key) CONTENT $invoice")
        .bind(("key", "dup"))
        .bind(("invoice", invoice("INV-OCCUPIED")))
        .await
        .expect("pre-create")
        .check()
        .expect("pre-create check");

    let ts_id = approved.id.expect("id");
    let invoice_record = RecordId::from_table_key("client_invoice", "dup");
    let line = ClientInvoiceLine {
        id: None,
        invoice: invoice_record,
        timesheet: ts_id.clone(),
        booking: booking.id.expect("id"),
        description: "Interpreting on 2026-03-10".into(),
        units: 2.0,
        rate: 40.0,
        amount: 80.0,
    };

    billing
        .client_invoices()
        .create_with_lines("dup", invoice("INV-DUP"), vec![line], vec![ts_id])
        .await
        .expect_err("duplicate key aborts the transaction");

    // Nothing from the failed batch stuck: no lines, timesheet untouched
    let lines = billing
        .client_invoices()
        .find_lines("client_invoice:dup")
        .await
        .expect("lines");
    assert!(lines.is_empty());
    let timesheets = billing.timesheets().find_all().await.expect("timesheets");
    assert_eq!(timesheets.len(), 1);
    assert_eq!(timesheets[0].status, TimesheetStatus::Approved);
    assert!(timesheets[0].ready_for_client_invoice);
    assert!(timesheets[0].client_invoice.is_none());
}

#[tokio::test]
async fn test_marking_an_invoice_paid_stamps_its_bookings() {
    let state = test_state().await;
    let bookings = BookingService::new(state.get_db());
    let billing = BillingService::new(state.get_db(), TERMS_DAYS);
    let client = seed_client(&state).await;
    let interpreter = seed_interpreter(&state).await;

    let booking = confirmed_booking(&bookings, &client, &interpreter, "2026-03-10", "09:00").await;
    let booking_id = booking.id.as_ref().expect("id").to_string();
    approved_timesheet(&billing, &interpreter, &booking, "2026-03-10", 9, 11).await;
    bookings.complete_booking(&booking_id).await.expect("complete");

    let result = billing
        .generate_client_invoice(GenerateClientInvoiceRequest {
            client_id: client,
            period_start: "2026-03-01".into(),
            period_end: "2026-03-31".into(),
        })
        .await
        .expect("rollup");
    let invoice_id = result.invoice_id.expect("invoice id");

    // The rollup already pushed the booking to INVOICED
    let invoiced = bookings.repo().find_by_id(&booking_id).await.expect("query").expect("booking");
    assert_eq!(invoiced.status, BookingStatus::Invoiced);

    // DRAFT cannot jump straight to PAID
    let err = billing
        .update_client_invoice_status(&invoice_id, ClientInvoiceStatus::Paid)
        .await
        .expect_err("skip SENT");
    assert_eq!(err.code, ErrorCode::InvalidInvoiceTransition);

    billing
        .update_client_invoice_status(&invoice_id, ClientInvoiceStatus::Sent)
        .await
        .expect("send");
    let paid = billing
        .update_client_invoice_status(&invoice_id, ClientInvoiceStatus::Paid)
        .await
        .expect("pay");
    assert_eq!(paid.status, ClientInvoiceStatus::Paid);

    let booking = bookings.repo().find_by_id(&booking_id).await.expect("query").expect("booking");
    assert_eq!(booking.status, BookingStatus::Paid);
}

#[tokio::test]
async fn test_rate_delete_reports_whether_a_row_existed() {
    let state = test_state().await;
    let billing = BillingService::new(state.get_db(), TERMS_DAYS);

    let rate = billing
        .rates()
        .upsert(RateUpsert {
            rate_type: RateType::Client,
            service_type: ServiceType::Onsite,
            amount_per_unit: 55.0,
            minimum_units: 1.0,
        })
        .await
        .expect("rate");
    let rate_id = rate.id.expect("id").to_string();

    assert!(billing.rates().delete(&rate_id).await.expect("delete"));
    assert!(!billing.rates().delete(&rate_id).await.expect("second delete"));
}
