//! Local notification dispatch
//!
//! The dispatcher owns the seen-set guarding the "new pending reservation"
//! notification: at most one per reservation id for the dispatcher's
//! lifetime. It is injectable so tests can reset it and callers can scope it
//! to a session instead of the whole process.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use shared::{Reservation, ReservationStatus};

use crate::ClientResult;

/// Local notification backend
pub trait Notifier: Send + Sync {
    /// Schedule a local notification with the platform
    fn schedule(&self, title: &str, body: &str) -> ClientResult<()>;
}

/// Tracing-backed notifier for tests and headless use
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn schedule(&self, title: &str, body: &str) -> ClientResult<()> {
        tracing::info!(title, body, "local notification");
        Ok(())
    }
}

/// Deduplicating dispatcher for reservation notifications
pub struct NotificationDispatcher {
    notifier: Arc<dyn Notifier>,
    seen: Mutex<HashSet<String>>,
}

impl NotificationDispatcher {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self {
            notifier,
            seen: Mutex::new(HashSet::new()),
        }
    }

    /// Raise the "new pending reservation" notification for every pending
    /// reservation not seen before. The id is recorded before dispatch, so a
    /// given reservation notifies at most once even if dispatch fails.
    pub fn observe(&self, reservations: &[Reservation]) {
        let mut seen = self.seen.lock().expect("notification set lock poisoned");
        for reservation in reservations {
            let Some(id) = &reservation.id else { continue };
            if reservation.status != ReservationStatus::Pending || seen.contains(id) {
                continue;
            }
            seen.insert(id.clone());
            let body = format!(
                "Nuova prenotazione da {} per {} persone il {} alle {}",
                reservation.full_name, reservation.seats, reservation.date, reservation.time
            );
            self.dispatch("Nuova Prenotazione", &body);
        }
    }

    /// Always notifies: accepting is a direct staff action, not a polling
    /// artifact, so it is not deduplicated.
    pub fn notify_accepted(&self, reservation: &Reservation) {
        let body = format!(
            "Hai accettato la prenotazione di {} per {} persone",
            reservation.full_name, reservation.seats
        );
        self.dispatch("Prenotazione accettata", &body);
    }

    /// Always notifies, same as [`Self::notify_accepted`].
    pub fn notify_rejected(&self, reservation: &Reservation) {
        let body = format!(
            "Hai rifiutato la prenotazione di {} per {} persone",
            reservation.full_name, reservation.seats
        );
        self.dispatch("Prenotazione rifiutata", &body);
    }

    /// Forget every id seen so far, e.g. at the end of a staff session.
    pub fn reset(&self) {
        self.seen
            .lock()
            .expect("notification set lock poisoned")
            .clear();
    }

    fn dispatch(&self, title: &str, body: &str) {
        // Dispatch failure must never block data delivery
        if let Err(e) = self.notifier.schedule(title, body) {
            tracing::warn!(title, error = %e, "notification dispatch failed");
        }
    }
}
