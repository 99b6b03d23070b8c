//! Mock backend state

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::AtomicBool;

use shared::{
    ApiReservation, ApiShift, DEFAULT_MAX_RESERVATIONS, DEFAULT_TIMES, PushTokenRegistration,
};

/// In-memory backend state
#[derive(Default)]
pub struct AppState {
    /// Reservations keyed by id
    pub reservations: Mutex<HashMap<String, ApiReservation>>,
    /// Shift sets keyed by date
    pub shifts: Mutex<HashMap<String, Vec<ApiShift>>>,
    /// Push tokens keyed by device id
    pub push_tokens: Mutex<HashMap<String, PushTokenRegistration>>,
    /// When set, reservation reads fail with a 500. Lets tests exercise the
    /// poller's skip-and-continue behavior.
    pub fail_reads: AtomicBool,
}

impl AppState {
    /// Shifts for a date, auto-initializing the default slot set on the
    /// first access to a date with no existing shifts.
    pub fn shifts_for_date(&self, date: &str) -> Vec<ApiShift> {
        let mut shifts = self.shifts.lock().unwrap();
        shifts
            .entry(date.to_string())
            .or_insert_with(|| default_shifts(date))
            .clone()
    }
}

/// The default shift set: every slot enabled at the default capacity
pub fn default_shifts(date: &str) -> Vec<ApiShift> {
    DEFAULT_TIMES
        .iter()
        .map(|time| ApiShift {
            time: (*time).to_string(),
            date: date.to_string(),
            enabled: true,
            max_reservations: DEFAULT_MAX_RESERVATIONS,
        })
        .collect()
}
