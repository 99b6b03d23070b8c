//! Shift Model

use serde::{Deserialize, Serialize};

use crate::client::ApiShift;

/// Default seats reservable per shift
pub const DEFAULT_MAX_RESERVATIONS: u32 = 15;

/// Default slot set created when a date is first accessed
pub const DEFAULT_TIMES: &[&str] = &[
    "19:00", "19:15", "19:30", "19:45", "20:00", "20:15", "20:30", "20:45", "21:00", "21:15",
    "21:30",
];

/// Bookable time slot for a given date, togglable enabled/disabled
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shift {
    /// Slot label, e.g. "19:00"
    pub time: String,
    pub enabled: bool,
    pub max_reservations: u32,
}

impl From<ApiShift> for Shift {
    fn from(api: ApiShift) -> Self {
        Self {
            time: api.time,
            enabled: api.enabled,
            max_reservations: api.max_reservations,
        }
    }
}
