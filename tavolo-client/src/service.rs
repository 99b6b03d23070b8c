//! Reservation service façade
//!
//! The typed surface the UI layer drives: transport plus retry for critical
//! mutations, domain mapping on reads, and staff-action notifications.

use std::sync::Arc;

use shared::{
    ApiReservation, ApiShiftPatch, PushTokenRegistration, Reservation, ReservationStats, Shift,
};

use crate::http::{HttpClient, ReservationFilter};
use crate::notify::{NotificationDispatcher, Notifier};
use crate::poller::{ReservationCallback, ReservationPoller, Subscription};
use crate::retry::{DEFAULT_BASE_DELAY, DEFAULT_MAX_ATTEMPTS, retry};
use crate::{ClientConfig, ClientResult};

pub struct ReservationService {
    http: HttpClient,
    dispatcher: Arc<NotificationDispatcher>,
    poller: ReservationPoller,
}

impl ReservationService {
    pub fn new(config: &ClientConfig, notifier: Arc<dyn Notifier>) -> Self {
        let http = HttpClient::new(config);
        let dispatcher = Arc::new(NotificationDispatcher::new(notifier));
        let poller = ReservationPoller::new(http.clone(), dispatcher.clone())
            .with_interval(config.poll_interval);
        Self {
            http,
            dispatcher,
            poller,
        }
    }

    /// Direct transport access for operations not covered by the façade
    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    /// Dispatcher handle, e.g. to reset the seen-set between staff sessions
    pub fn dispatcher(&self) -> &Arc<NotificationDispatcher> {
        &self.dispatcher
    }

    // ========== Reservations ==========

    pub async fn reservations(&self, filter: &ReservationFilter) -> ClientResult<Vec<Reservation>> {
        Ok(self
            .http
            .list_reservations(filter)
            .await?
            .into_iter()
            .map(Reservation::from)
            .collect())
    }

    pub async fn reservation(&self, id: &str) -> ClientResult<Option<Reservation>> {
        Ok(self
            .http
            .reservation_by_id(id)
            .await?
            .map(Reservation::from))
    }

    /// Create a reservation, returning the backend-assigned id
    pub async fn add_reservation(&self, reservation: &Reservation) -> ClientResult<Option<String>> {
        let payload = ApiReservation::from(reservation);
        let created = self.http.create_reservation(&payload).await?;
        Ok(created.id)
    }

    /// Critical mutation: retried with linear backoff so a transient failure
    /// does not drop staff intent.
    pub async fn update_reservation(
        &self,
        id: &str,
        reservation: &Reservation,
    ) -> ClientResult<()> {
        let payload = ApiReservation::from(reservation);
        retry(
            || self.http.update_reservation(id, &payload),
            DEFAULT_MAX_ATTEMPTS,
            DEFAULT_BASE_DELAY,
        )
        .await
    }

    /// Critical mutation, retried like [`Self::update_reservation`].
    pub async fn delete_reservation(&self, id: &str) -> ClientResult<()> {
        retry(
            || self.http.delete_reservation(id),
            DEFAULT_MAX_ATTEMPTS,
            DEFAULT_BASE_DELAY,
        )
        .await
    }

    /// Accept a reservation and raise the staff-action notification
    pub async fn accept_reservation(
        &self,
        id: &str,
        reservation: &Reservation,
    ) -> ClientResult<()> {
        self.http.accept_reservation(id).await?;
        self.dispatcher.notify_accepted(reservation);
        Ok(())
    }

    /// Reject a reservation and raise the staff-action notification
    pub async fn reject_reservation(
        &self,
        id: &str,
        reservation: &Reservation,
        reason: Option<String>,
    ) -> ClientResult<()> {
        self.http.reject_reservation(id, reason).await?;
        self.dispatcher.notify_rejected(reservation);
        Ok(())
    }

    // ========== Shifts ==========

    pub async fn shifts_for_date(&self, date: &str) -> ClientResult<Vec<Shift>> {
        Ok(self
            .http
            .shifts_for_date(date)
            .await?
            .into_iter()
            .map(Shift::from)
            .collect())
    }

    /// Fetch one shift; an unknown slot is `None`, not an error
    pub async fn shift(&self, date: &str, time: &str) -> ClientResult<Option<Shift>> {
        Ok(self.http.shift(date, time).await?.map(Shift::from))
    }

    pub async fn update_shift(
        &self,
        date: &str,
        time: &str,
        patch: &ApiShiftPatch,
    ) -> ClientResult<()> {
        self.http.update_shift(date, time, patch).await
    }

    pub async fn initialize_shifts(&self, date: &str) -> ClientResult<()> {
        self.http.initialize_shifts(date).await
    }

    pub async fn stats(&self, date: &str) -> ClientResult<ReservationStats> {
        self.http.shift_stats(date).await
    }

    pub async fn available_times(&self) -> ClientResult<Vec<String>> {
        self.http.available_times().await
    }

    // ========== Push tokens ==========

    pub async fn register_push_token(
        &self,
        registration: &PushTokenRegistration,
    ) -> ClientResult<()> {
        self.http.register_push_token(registration).await
    }

    pub async fn unregister_push_token(&self, device_id: &str) -> ClientResult<()> {
        self.http.unregister_push_token(device_id).await
    }

    // ========== Connection ==========

    pub async fn check_server_connection(&self) -> bool {
        self.http.health_check().await
    }

    // ========== Live updates ==========

    /// Subscribe to reservation changes. The callback fires on the initial
    /// state and on every subsequent distinct state; new pending
    /// reservations raise a local notification through the dispatcher.
    pub fn subscribe<F>(&self, callback: F) -> ClientResult<Subscription>
    where
        F: Fn(Vec<Reservation>) + Send + Sync + 'static,
    {
        let callback: ReservationCallback = Arc::new(callback);
        self.poller.subscribe(callback)
    }
}
