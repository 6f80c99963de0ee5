//! Booking/offer state machine integration tests against an in-memory
//! store

use lingua_server::bookings::BookingService;
use lingua_server::db::models::{
    AssignmentCreate, AssignmentStatus, BookingCreate, BookingStatus, Client, Interpreter,
    Location, OfferActor, ServiceType,
};
use lingua_server::db::repository::{ClientRepository, InterpreterRepository, RepoError};
use lingua_server::{Config, ServerState};
use shared::ErrorCode;

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

async fn seed_interpreter(state: &ServerState, name: &str) -> String {
    let repo = InterpreterRepository::new(state.get_db());
    let interpreter = repo
        .create(Interpreter {
            id: None,
            name: name.into(),
            email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
            phone: None,
            languages: vec!["Spanish".into()],
            services: vec![ServiceType::Onsite],
            is_active: true,
        })
        .await
        .expect("interpreter");
    interpreter.id.expect("interpreter id").to_string()
}

fn booking_request(client: &str, date: &str, start: &str) -> BookingCreate {
    BookingCreate {
        client: client.to_string(),
        language_from: "English".into(),
        language_to: "Spanish".into(),
        service_type: ServiceType::Onsite,
        date: date.into(),
        start_time: start.into(),
        duration_minutes: 60,
        location: Location::Onsite {
            address: "12 Harley St".into(),
        },
        notes: None,
    }
}

#[tokio::test]
async fn test_first_offer_moves_booking_to_offered() {
    let state = test_state().await;
    let service = BookingService::new(state.get_db());
    let client = seed_client(&state).await;
    let interpreter = seed_interpreter(&state, "Maria Lopez").await;

    let booking = service
        .create_booking(booking_request(&client, "2026-03-10", "10:00"))
        .await
        .expect("booking");
    assert_eq!(booking.status, BookingStatus::Requested);
    let booking_id = booking.id.expect("id").to_string();

    service
        .create_assignment(AssignmentCreate {
            booking: booking_id.clone(),
            interpreter: interpreter.clone(),
        })
        .await
        .expect("offer");

    let reloaded = service
        .repo()
        .find_by_id(&booking_id)
        .await
        .expect("query")
        .expect("booking");
    assert_eq!(reloaded.status, BookingStatus::Offered);

    // A second offer to another interpreter leaves the status alone
    let second = seed_interpreter(&state, "Jan Novak").await;
    service
        .create_assignment(AssignmentCreate {
            booking: booking_id.clone(),
            interpreter: second,
        })
        .await
        .expect("second offer");
    let reloaded = service
        .repo()
        .find_by_id(&booking_id)
        .await
        .expect("query")
        .expect("booking");
    assert_eq!(reloaded.status, BookingStatus::Offered);
}

#[tokio::test]
async fn test_duplicate_open_offer_is_rejected() {
    let state = test_state().await;
    let service = BookingService::new(state.get_db());
    let client = seed_client(&state).await;
    let interpreter = seed_interpreter(&state, "Maria Lopez").await;

    let booking = service
        .create_booking(booking_request(&client, "2026-03-10", "10:00"))
        .await
        .expect("booking");
    let booking_id = booking.id.expect("id").to_string();

    service
        .create_assignment(AssignmentCreate {
            booking: booking_id.clone(),
            interpreter: interpreter.clone(),
        })
        .await
        .expect("offer");

    let err = service
        .create_assignment(AssignmentCreate {
            booking: booking_id,
            interpreter,
        })
        .await
        .expect_err("duplicate open offer");
    assert_eq!(err.code, ErrorCode::OfferAlreadyOpen);
}

#[tokio::test]
async fn test_accept_confirms_booking_and_stores_interpreter() {
    let state = test_state().await;
    let service = BookingService::new(state.get_db());
    let client = seed_client(&state).await;
    let interpreter = seed_interpreter(&state, "Maria Lopez").await;

    let booking = service
        .create_booking(booking_request(&client, "2026-03-10", "10:00"))
        .await
        .expect("booking");
    let booking_id = booking.id.expect("id").to_string();

    let offer = service
        .create_assignment(AssignmentCreate {
            booking: booking_id.clone(),
            interpreter: interpreter.clone(),
        })
        .await
        .expect("offer");
    let offer_id = offer.id.expect("id").to_string();

    let confirmed = service.accept_offer(&offer_id).await.expect("accept");
    assert_eq!(confirmed.status, BookingStatus::Confirmed);
    assert_eq!(
        confirmed.interpreter.map(|r| r.to_string()),
        Some(interpreter)
    );

    let resolved = service
        .assignments()
        .find_by_id(&offer_id)
        .await
        .expect("query")
        .expect("assignment");
    assert_eq!(resolved.status, AssignmentStatus::Accepted);
    assert_eq!(resolved.responded_by, Some(OfferActor::Interpreter));
    assert!(resolved.responded_at.is_some());
}

#[tokio::test]
async fn test_late_accept_cannot_steal_a_confirmed_booking() {
    let state = test_state().await;
    let service = BookingService::new(state.get_db());
    let client = seed_client(&state).await;
    let first = seed_interpreter(&state, "Maria Lopez").await;
    let second = seed_interpreter(&state, "Jan Novak").await;

    let booking = service
        .create_booking(booking_request(&client, "2026-03-10", "10:00"))
        .await
        .expect("booking");
    let booking_id = booking.id.expect("id").to_string();

    let offer_a = service
        .create_assignment(AssignmentCreate {
            booking: booking_id.clone(),
            interpreter: first.clone(),
        })
        .await
        .expect("offer a");
    let offer_b = service
        .create_assignment(AssignmentCreate {
            booking: booking_id.clone(),
            interpreter: second,
        })
        .await
        .expect("offer b");

    service
        .accept_offer(&offer_a.id.expect("id").to_string())
        .await
        .expect("first accept");

    let err = service
        .accept_offer(&offer_b.id.expect("id").to_string())
        .await
        .expect_err("second accept");
    assert_eq!(err.code, ErrorCode::BookingAlreadyConfirmed);

    // The booking still belongs to the first interpreter
    let reloaded = service
        .repo()
        .find_by_id(&booking_id)
        .await
        .expect("query")
        .expect("booking");
    assert_eq!(reloaded.interpreter.map(|r| r.to_string()), Some(first));
}

#[tokio::test]
async fn test_stale_version_write_fails_with_conflict() {
    let state = test_state().await;
    let service = BookingService::new(state.get_db());
    let client = seed_client(&state).await;
    let interpreter = seed_interpreter(&state, "Maria Lopez").await;

    let booking = service
        .create_booking(booking_request(&client, "2026-03-10", "10:00"))
        .await
        .expect("booking");
    let booking_id = booking.id.expect("id").to_string();

    // First writer wins
    service
        .create_assignment(AssignmentCreate {
            booking: booking_id.clone(),
            interpreter,
        })
        .await
        .expect("offer");

    // Second writer holds the pre-offer snapshot (version 0)
    let err = service
        .repo()
        .transition(&booking_id, booking.version, BookingStatus::Cancelled, None)
        .await
        .expect_err("stale write");
    assert!(matches!(err, RepoError::VersionConflict(_)));
}

#[tokio::test]
async fn test_cancel_retracts_open_offers() {
    let state = test_state().await;
    let service = BookingService::new(state.get_db());
    let client = seed_client(&state).await;
    let interpreter = seed_interpreter(&state, "Maria Lopez").await;

    let booking = service
        .create_booking(booking_request(&client, "2026-03-10", "10:00"))
        .await
        .expect("booking");
    let booking_id = booking.id.expect("id").to_string();

    let offer = service
        .create_assignment(AssignmentCreate {
            booking: booking_id.clone(),
            interpreter,
        })
        .await
        .expect("offer");

    let cancelled = service.cancel_booking(&booking_id).await.expect("cancel");
    assert_eq!(cancelled.status, BookingStatus::Cancelled);

    let resolved = service
        .assignments()
        .find_by_id(&offer.id.expect("id").to_string())
        .await
        .expect("query")
        .expect("assignment");
    assert_eq!(resolved.status, AssignmentStatus::Declined);
    assert_eq!(resolved.responded_by, Some(OfferActor::Admin));
}

#[tokio::test]
async fn test_cancelled_booking_rejects_offers() {
    let state = test_state().await;
    let service = BookingService::new(state.get_db());
    let client = seed_client(&state).await;
    let interpreter = seed_interpreter(&state, "Maria Lopez").await;

    let booking = service
        .create_booking(booking_request(&client, "2026-03-10", "10:00"))
        .await
        .expect("booking");
    let booking_id = booking.id.expect("id").to_string();

    service.cancel_booking(&booking_id).await.expect("cancel");

    let err = service
        .create_assignment(AssignmentCreate {
            booking: booking_id,
            interpreter,
        })
        .await
        .expect_err("offer on cancelled booking");
    assert_eq!(err.code, ErrorCode::BookingCancelled);
}

#[tokio::test]
async fn test_schedule_conflict_scan() {
    let state = test_state().await;
    let service = BookingService::new(state.get_db());
    let client = seed_client(&state).await;
    let interpreter = seed_interpreter(&state, "Maria Lopez").await;

    // Confirm a 10:00-11:00 booking for the interpreter
    let booking = service
        .create_booking(booking_request(&client, "2026-03-10", "10:00"))
        .await
        .expect("booking");
    let booking_id = booking.id.expect("id").to_string();
    service
        .assign_interpreter(&booking_id, &interpreter)
        .await
        .expect("assign");

    let date = "2026-03-10".parse().expect("date");

    // 10:30-11:30 overlaps
    let hit = service
        .check_schedule_conflict(
            &interpreter,
            date,
            "10:30:00".parse().expect("time"),
            60,
            None,
        )
        .await
        .expect("scan");
    assert_eq!(
        hit.and_then(|b| b.id).map(|id| id.to_string()),
        Some(booking_id.clone())
    );

    // 11:00-12:00 is adjacent, not a conflict
    let hit = service
        .check_schedule_conflict(
            &interpreter,
            date,
            "11:00:00".parse().expect("time"),
            60,
            None,
        )
        .await
        .expect("scan");
    assert!(hit.is_none());

    // The booking never conflicts with itself
    let hit = service
        .check_schedule_conflict(
            &interpreter,
            date,
            "10:00:00".parse().expect("time"),
            60,
            Some(&booking_id),
        )
        .await
        .expect("scan");
    assert!(hit.is_none());
}

#[tokio::test]
async fn test_direct_assign_skips_offer_round() {
    let state = test_state().await;
    let service = BookingService::new(state.get_db());
    let client = seed_client(&state).await;
    let interpreter = seed_interpreter(&state, "Maria Lopez").await;

    let booking = service
        .create_booking(booking_request(&client, "2026-03-10", "10:00"))
        .await
        .expect("booking");
    let booking_id = booking.id.expect("id").to_string();

    let confirmed = service
        .assign_interpreter(&booking_id, &interpreter)
        .await
        .expect("assign");
    assert_eq!(confirmed.status, BookingStatus::Confirmed);
    assert_eq!(
        confirmed.interpreter.map(|r| r.to_string()),
        Some(interpreter)
    );
}

#[tokio::test]
async fn test_accepting_a_retracted_offer_leaves_booking_unconfirmed() {
    let state = test_state().await;
    let service = BookingService::new(state.get_db());
    let client = seed_client(&state).await;
    let interpreter = seed_interpreter(&state, "Maria Lopez").await;

    let booking = service
        .create_booking(booking_request(&client, "2026-03-10", "10:00"))
        .await
        .expect("booking");
    let booking_id = booking.id.expect("id").to_string();
    let offer = service
        .create_assignment(AssignmentCreate {
            booking: booking_id.clone(),
            interpreter,
        })
        .await
        .expect("offer");
    let offer_id = offer.id.expect("id").to_string();

    service
        .decline_offer(&offer_id, OfferActor::Admin)
        .await
        .expect("retract");

    let err = service.accept_offer(&offer_id).await.expect_err("late accept");
    assert_eq!(err.code, ErrorCode::OfferAlreadyResolved);

    // The losing accept must not have confirmed anything
    let reloaded = service
        .repo()
        .find_by_id(&booking_id)
        .await
        .expect("query")
        .expect("booking");
    assert_eq!(reloaded.status, BookingStatus::Offered);
    assert!(reloaded.interpreter.is_none());
}
