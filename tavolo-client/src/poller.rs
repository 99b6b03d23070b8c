//! Change-detection poller
//!
//! Fetches the reservation collection on a fixed interval and invokes the
//! subscriber callback only when the content fingerprint changes. One
//! subscription slot per poller: tearing the old one down frees the slot.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use sha2::{Digest, Sha256};
use shared::{ApiReservation, Reservation};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::http::{HttpClient, ReservationFilter};
use crate::notify::NotificationDispatcher;
use crate::{ClientError, ClientResult};

/// Default fetch-and-compare cadence
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Subscriber callback, invoked with the mapped domain records on change
pub type ReservationCallback = Arc<dyn Fn(Vec<Reservation>) + Send + Sync>;

/// Polling-based reservation watcher
pub struct ReservationPoller {
    http: HttpClient,
    dispatcher: Arc<NotificationDispatcher>,
    interval: Duration,
    active: Arc<AtomicBool>,
}

impl ReservationPoller {
    pub fn new(http: HttpClient, dispatcher: Arc<NotificationDispatcher>) -> Self {
        Self {
            http,
            dispatcher,
            interval: DEFAULT_POLL_INTERVAL,
            active: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Set the polling cadence. The cadence is fixed for the subscription
    /// lifetime, with no backoff escalation on repeated fetch failures.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Start polling: one fetch-compare cycle immediately, then one per
    /// interval. The callback fires once for the initial state and once per
    /// subsequent distinct state.
    ///
    /// Exactly one subscription may be active; a second `subscribe` while
    /// one is active fails with [`ClientError::AlreadySubscribed`].
    pub fn subscribe(&self, callback: ReservationCallback) -> ClientResult<Subscription> {
        if self.active.swap(true, Ordering::SeqCst) {
            return Err(ClientError::AlreadySubscribed);
        }

        let http = self.http.clone();
        let dispatcher = self.dispatcher.clone();
        let active = self.active.clone();
        let interval = self.interval;

        let task = tokio::spawn({
            let active = active.clone();
            async move {
                let mut last_fingerprint = String::new();
                let mut ticker = tokio::time::interval(interval);
                ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

                loop {
                    ticker.tick().await;
                    if !active.load(Ordering::SeqCst) {
                        break;
                    }
                    match http.list_reservations(&ReservationFilter::default()).await {
                        Ok(wire) => {
                            // A fetch resolving after unsubscribe is discarded
                            if !active.load(Ordering::SeqCst) {
                                break;
                            }
                            let current = fingerprint(&wire);
                            if current == last_fingerprint {
                                continue;
                            }
                            last_fingerprint = current;
                            let reservations: Vec<Reservation> =
                                wire.into_iter().map(Reservation::from).collect();
                            dispatcher.observe(&reservations);
                            callback(reservations);
                        }
                        Err(e) => {
                            // Skip the cycle, keep the interval running
                            tracing::warn!(error = %e, "poll cycle failed");
                        }
                    }
                }
                tracing::debug!("reservation polling loop exited");
            }
        });

        tracing::info!(
            interval_ms = self.interval.as_millis() as u64,
            "reservation polling started"
        );
        Ok(Subscription {
            active,
            task: Some(task),
        })
    }
}

/// Handle for one active polling subscription. Unsubscribes on drop.
pub struct Subscription {
    active: Arc<AtomicBool>,
    task: Option<JoinHandle<()>>,
}

impl Subscription {
    /// Stop polling. No callback fires after this returns; an in-flight
    /// fetch may still complete but its result is discarded.
    pub fn unsubscribe(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            self.active.store(false, Ordering::SeqCst);
            task.abort();
            tracing::info!("reservation polling stopped");
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Content fingerprint over the (id, status, updatedAt) triples.
///
/// Triples are sorted by id first, so fetch-order differences introduced by
/// the backend or the mapper never register as changes.
fn fingerprint(reservations: &[ApiReservation]) -> String {
    let mut triples: Vec<(&str, &str, &str)> = reservations
        .iter()
        .map(|r| {
            (
                r.id.as_deref().unwrap_or(""),
                r.status.as_str(),
                r.updated_at.as_deref().unwrap_or(""),
            )
        })
        .collect();
    triples.sort_unstable();

    let mut hasher = Sha256::new();
    for (id, status, updated_at) in triples {
        hasher.update(id.as_bytes());
        hasher.update(b"|");
        hasher.update(status.as_bytes());
        hasher.update(b"|");
        hasher.update(updated_at.as_bytes());
        hasher.update(b"\n");
    }
    hex::encode(hasher.finalize())
}
