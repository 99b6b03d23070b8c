// tavolo-client/tests/client_integration.rs
// Integration tests against the in-memory mock backend

use std::sync::atomic::Ordering;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use shared::ApiShiftPatch;
use tavolo_client::{
    ClientConfig, ClientError, ClientResult, Notifier, Reservation, ReservationFilter,
    ReservationService, ReservationStatus,
};
use tokio::sync::mpsc;
use tokio::time::timeout;

#[derive(Default)]
struct RecordingNotifier {
    sent: Mutex<Vec<(String, String)>>,
}

impl Notifier for RecordingNotifier {
    fn schedule(&self, title: &str, body: &str) -> ClientResult<()> {
        self.sent
            .lock()
            .unwrap()
            .push((title.to_string(), body.to_string()));
        Ok(())
    }
}

impl RecordingNotifier {
    fn titles(&self) -> Vec<String> {
        self.sent.lock().unwrap().iter().map(|(t, _)| t.clone()).collect()
    }
}

fn sample_reservation(name: &str, time: &str, seats: u32) -> Reservation {
    Reservation {
        id: None,
        full_name: name.to_string(),
        phone: "+39 333 1234567".to_string(),
        email: "guest@example.com".to_string(),
        date: "2025-06-14".to_string(),
        time: time.to_string(),
        seats,
        special_requests: None,
        status: ReservationStatus::Pending,
    }
}

async fn start(
    poll_interval: Duration,
) -> (ReservationService, Arc<RecordingNotifier>, Arc<tavolo_mock::AppState>) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
    let (base_url, state, _server) = tavolo_mock::spawn().await;
    let config = ClientConfig::new(base_url)
        .with_timeout(Duration::from_secs(2))
        .with_poll_interval(poll_interval);
    let notifier = Arc::new(RecordingNotifier::default());
    let service = ReservationService::new(&config, notifier.clone());
    (service, notifier, state)
}

#[tokio::test]
async fn reservation_crud_roundtrip() {
    let (service, _notifier, _state) = start(Duration::from_secs(5)).await;

    let id = service
        .add_reservation(&sample_reservation("Mario Rossi", "20:00", 4))
        .await
        .unwrap()
        .expect("backend assigns an id");

    let fetched = service.reservation(&id).await.unwrap().unwrap();
    assert_eq!(fetched.full_name, "Mario Rossi");
    assert_eq!(fetched.status, ReservationStatus::Pending);

    let mut updated = fetched.clone();
    updated.seats = 6;
    service.update_reservation(&id, &updated).await.unwrap();
    assert_eq!(service.reservation(&id).await.unwrap().unwrap().seats, 6);

    let pending = service
        .reservations(&ReservationFilter {
            status: Some("pending".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(pending.len(), 1);

    service.delete_reservation(&id).await.unwrap();
    assert!(service.reservation(&id).await.unwrap().is_none());
    assert!(service.reservation("missing").await.unwrap().is_none());
}

#[tokio::test]
async fn accept_and_reject_update_status_and_notify() {
    let (service, notifier, _state) = start(Duration::from_secs(5)).await;

    let first = sample_reservation("Anna Bianchi", "19:30", 2);
    let second = sample_reservation("Luca Verdi", "21:00", 5);
    let first_id = service.add_reservation(&first).await.unwrap().unwrap();
    let second_id = service.add_reservation(&second).await.unwrap().unwrap();

    service.accept_reservation(&first_id, &first).await.unwrap();
    assert_eq!(
        service.reservation(&first_id).await.unwrap().unwrap().status,
        ReservationStatus::Accepted
    );

    service
        .reject_reservation(&second_id, &second, Some("completo".to_string()))
        .await
        .unwrap();
    assert_eq!(
        service.reservation(&second_id).await.unwrap().unwrap().status,
        ReservationStatus::Rejected
    );

    let titles = notifier.titles();
    assert!(titles.contains(&"Prenotazione accettata".to_string()));
    assert!(titles.contains(&"Prenotazione rifiutata".to_string()));

    // Staff-action notifications are not deduplicated
    service.accept_reservation(&first_id, &first).await.unwrap();
    let accepted = notifier
        .titles()
        .iter()
        .filter(|t| *t == "Prenotazione accettata")
        .count();
    assert_eq!(accepted, 2);
}

#[tokio::test]
async fn accepting_unknown_reservation_is_a_remote_error() {
    let (service, _notifier, _state) = start(Duration::from_secs(5)).await;

    let missing = sample_reservation("Nessuno", "19:00", 2);
    let err = service
        .accept_reservation("missing", &missing)
        .await
        .unwrap_err();
    match err {
        ClientError::Remote { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "reservation not found");
        }
        other => panic!("expected remote error, got {other}"),
    }
}

#[tokio::test]
async fn shifts_auto_initialize_and_toggle_end_to_end() {
    let (service, _notifier, _state) = start(Duration::from_secs(5)).await;
    let date = "2025-07-01";

    // First access creates the default set
    let shifts = service.shifts_for_date(date).await.unwrap();
    assert_eq!(shifts.len(), shared::DEFAULT_TIMES.len());
    assert!(shifts.iter().all(|s| s.enabled && s.max_reservations == 15));

    // Disable 19:00, read it back, re-enable it, read it back
    service
        .update_shift(date, "19:00", &ApiShiftPatch {
            enabled: Some(false),
            ..Default::default()
        })
        .await
        .unwrap();
    let disabled = service.shifts_for_date(date).await.unwrap();
    assert!(!disabled.iter().find(|s| s.time == "19:00").unwrap().enabled);

    service
        .update_shift(date, "19:00", &ApiShiftPatch {
            enabled: Some(true),
            ..Default::default()
        })
        .await
        .unwrap();
    let enabled = service.shifts_for_date(date).await.unwrap();
    assert!(enabled.iter().find(|s| s.time == "19:00").unwrap().enabled);

    // Explicit initialization is idempotent
    service.initialize_shifts(date).await.unwrap();
    assert!(
        service
            .shifts_for_date(date)
            .await
            .unwrap()
            .iter()
            .find(|s| s.time == "19:00")
            .unwrap()
            .enabled
    );

    let times = service.available_times().await.unwrap();
    assert_eq!(times.len(), shared::DEFAULT_TIMES.len());
}

#[tokio::test]
async fn shift_lookup_finds_known_slots_only() {
    let (service, _notifier, _state) = start(Duration::from_secs(5)).await;
    let date = "2025-07-02";

    let slot = service.shift(date, "19:00").await.unwrap().unwrap();
    assert_eq!(slot.time, "19:00");
    assert!(slot.enabled);
    assert_eq!(slot.max_reservations, 15);

    assert!(service.shift(date, "23:45").await.unwrap().is_none());
}

#[tokio::test]
async fn stats_aggregate_reservations_by_status_and_shift() {
    let (service, _notifier, _state) = start(Duration::from_secs(5)).await;

    let pending = sample_reservation("Anna Bianchi", "19:30", 2);
    let mut accepted = sample_reservation("Luca Verdi", "20:00", 4);
    service.add_reservation(&pending).await.unwrap();
    let accepted_id = service.add_reservation(&accepted).await.unwrap().unwrap();
    accepted.id = Some(accepted_id.clone());
    service.accept_reservation(&accepted_id, &accepted).await.unwrap();

    let stats = service.stats("2025-06-14").await.unwrap();
    assert_eq!(stats.total_reservations, 2);
    assert_eq!(stats.total_seats, 6);
    assert_eq!(stats.pending_reservations, 1);
    assert_eq!(stats.accepted_reservations, 1);
    assert_eq!(stats.rejected_reservations, 0);

    let at_twenty = stats
        .shift_stats
        .iter()
        .find(|row| row.time == "20:00")
        .unwrap();
    assert_eq!(at_twenty.reservations, 1);
    assert_eq!(at_twenty.seats, 4);
    assert!(at_twenty.available);
}

#[tokio::test]
async fn poller_delivers_initial_state_then_only_changes() {
    let (service, notifier, _state) = start(Duration::from_millis(100)).await;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let subscription = service
        .subscribe(move |reservations| {
            let _ = tx.send(reservations);
        })
        .unwrap();

    // Initial state arrives once, even when empty
    let initial = timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("initial callback")
        .unwrap();
    assert!(initial.is_empty());

    // Identical consecutive states never re-invoke the callback
    assert!(timeout(Duration::from_millis(400), rx.recv()).await.is_err());

    // A second concurrent subscription fails loudly
    let second = service.subscribe(|_: Vec<Reservation>| {});
    assert!(matches!(second, Err(ClientError::AlreadySubscribed)));

    // A new reservation changes the fingerprint and is delivered once
    let id = service
        .add_reservation(&sample_reservation("Mario Rossi", "20:00", 4))
        .await
        .unwrap()
        .unwrap();
    let changed = timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("change callback")
        .unwrap();
    assert_eq!(changed.len(), 1);
    assert_eq!(changed[0].id.as_deref(), Some(id.as_str()));

    // The new pending reservation notified exactly once across cycles
    assert!(timeout(Duration::from_millis(400), rx.recv()).await.is_err());
    let new_pending = notifier
        .titles()
        .iter()
        .filter(|t| *t == "Nuova Prenotazione")
        .count();
    assert_eq!(new_pending, 1);

    // A status change is a new fingerprint but not a new pending notification
    let accepted = sample_reservation("Mario Rossi", "20:00", 4);
    service.accept_reservation(&id, &accepted).await.unwrap();
    let after_accept = timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("status change callback")
        .unwrap();
    assert_eq!(after_accept[0].status, ReservationStatus::Accepted);
    let new_pending = notifier
        .titles()
        .iter()
        .filter(|t| *t == "Nuova Prenotazione")
        .count();
    assert_eq!(new_pending, 1);

    // After unsubscribe no further callbacks occur and the slot frees up
    subscription.unsubscribe();
    service
        .add_reservation(&sample_reservation("Anna Bianchi", "19:30", 2))
        .await
        .unwrap();
    match timeout(Duration::from_millis(400), rx.recv()).await {
        Err(_) | Ok(None) => {}
        Ok(Some(_)) => panic!("callback fired after unsubscribe"),
    }

    let (tx2, mut rx2) = mpsc::unbounded_channel();
    let resubscribed = service
        .subscribe(move |reservations| {
            let _ = tx2.send(reservations);
        })
        .unwrap();
    let replayed = timeout(Duration::from_secs(2), rx2.recv())
        .await
        .expect("resubscribe initial callback")
        .unwrap();
    assert_eq!(replayed.len(), 2);
    resubscribed.unsubscribe();
}

#[tokio::test]
async fn poller_skips_failed_cycles_and_recovers() {
    let (service, _notifier, state) = start(Duration::from_millis(100)).await;
    state.fail_reads.store(true, Ordering::SeqCst);

    let (tx, mut rx) = mpsc::unbounded_channel();
    let subscription = service
        .subscribe(move |reservations| {
            let _ = tx.send(reservations);
        })
        .unwrap();

    // Every cycle fails: no delivery, but the subscription stays alive
    assert!(timeout(Duration::from_millis(500), rx.recv()).await.is_err());

    state.fail_reads.store(false, Ordering::SeqCst);
    let recovered = timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("delivery after outage")
        .unwrap();
    assert!(recovered.is_empty());

    subscription.unsubscribe();
}

#[tokio::test]
async fn push_token_registration_roundtrip() {
    let (service, _notifier, _state) = start(Duration::from_secs(5)).await;

    let registration = shared::PushTokenRegistration {
        token: "ExponentPushToken[abc123]".to_string(),
        device_id: "pixel-7-staff".to_string(),
        platform: "android".to_string(),
        user_id: None,
    };
    service.register_push_token(&registration).await.unwrap();
    service.unregister_push_token("pixel-7-staff").await.unwrap();

    let err = service.unregister_push_token("pixel-7-staff").await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn timeout_expiring_during_body_read_maps_to_timeout() {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = [0u8; 1024];
        let _ = socket.read(&mut buf).await;
        // Headers promise more body than is ever sent, so the client times
        // out while reading the body rather than while waiting for a response
        socket.write_all(b"HTTP/1.1 200 OK\r\n").await.unwrap();
        socket
            .write_all(b"content-type: application/json\r\n")
            .await
            .unwrap();
        socket.write_all(b"content-length: 512\r\n\r\n").await.unwrap();
        socket.write_all(b"{\"success\":true,").await.unwrap();
        socket.flush().await.unwrap();
        tokio::time::sleep(Duration::from_secs(60)).await;
    });

    let service = ReservationService::new(
        &ClientConfig::new(format!("http://{addr}/api")).with_timeout(Duration::from_millis(300)),
        Arc::new(RecordingNotifier::default()),
    );
    let err = service
        .reservations(&ReservationFilter::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Timeout), "got {err}");
}

#[tokio::test]
async fn health_check_reflects_reachability() {
    let (service, _notifier, _state) = start(Duration::from_secs(5)).await;
    assert!(service.check_server_connection().await);

    let unreachable = ReservationService::new(
        &ClientConfig::new("http://127.0.0.1:9/api").with_timeout(Duration::from_millis(300)),
        Arc::new(RecordingNotifier::default()),
    );
    assert!(!unreachable.check_server_connection().await);
}
