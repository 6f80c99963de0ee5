//! On-disk store and randomized conflict-scan checks

use lingua_server::auth::JwtConfig;
use lingua_server::bookings::BookingService;
use lingua_server::db::models::{BookingCreate, Client, Interpreter, Location, ServiceType};
use lingua_server::db::repository::{ClientRepository, InterpreterRepository};
use lingua_server::{Config, ServerState};
use rand::Rng;

fn disk_config(work_dir: &std::path::Path) -> Config {
    Config {
        work_dir: work_dir.to_string_lossy().into_owned(),
        http_port: 0,
        jwt: JwtConfig::default(),
        environment: "development".into(),
        payment_terms_days: 30,
        request_timeout_ms: 30_000,
        shutdown_timeout_ms: 10_000,
    }
}

#[tokio::test]
async fn test_data_survives_reopen() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let config = disk_config(tmp.path());

    {
        let state = ServerState::initialize(&config).await.expect("first open");
        ClientRepository::new(state.get_db())
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
    }

    let state = ServerState::initialize(&config).await.expect("reopen");
    let clients = ClientRepository::new(state.get_db())
        .find_all()
        .await
        .expect("query");
    assert!(clients.iter().any(|c| c.name == "Acme Hospital"));
}

#[tokio::test]
async fn test_conflict_scan_agrees_with_overlap_arithmetic() {
    let config = Config::default();
    let state = ServerState::initialize_in_memory(&config)
        .await
        .expect("state");
    let service = BookingService::new(state.get_db());

    let client = ClientRepository::new(state.get_db())
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
        .expect("client")
        .id
        .expect("client id")
        .to_string();
    let interpreter = InterpreterRepository::new(state.get_db())
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
        .expect("interpreter")
        .id
        .expect("interpreter id")
        .to_string();

    // Confirm one 10:00-11:00 booking, then throw random candidate
    // slots against it
    let booking = service
        .create_booking(BookingCreate {
            client,
            language_from: "English".into(),
            language_to: "Spanish".into(),
            service_type: ServiceType::Onsite,
            date: "2026-03-10".into(),
            start_time: "10:00".into(),
            duration_minutes: 60,
            location: Location::Onsite {
                address: "12 Harley St".into(),
            },
            notes: None,
        })
        .await
        .expect("booking");
    service
        .assign_interpreter(&booking.id.expect("id").to_string(), &interpreter)
        .await
        .expect("assign");

    let confirmed_start = 10 * 60;
    let confirmed_end = 11 * 60;
    let date = "2026-03-10".parse().expect("date");

    let mut rng = rand::thread_rng();
    for _ in 0..40 {
        let start_min: i64 = rng.gen_range(8 * 60..13 * 60);
        let duration: i64 = rng.gen_range(15..=180);
        let start_time = chrono::NaiveTime::from_num_seconds_from_midnight_opt(
            (start_min * 60) as u32,
            0,
        )
        .expect("time");

        let expected = start_min < confirmed_end && confirmed_start < start_min + duration;
        let hit = service
            .check_schedule_conflict(&interpreter, date, start_time, duration, None)
            .await
            .expect("scan");
        assert_eq!(
            hit.is_some(),
            expected,
            "candidate {}+{}min vs 10:00-11:00",
            start_min,
            duration
        );
    }
}
