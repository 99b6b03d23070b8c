//! Reservation Model

use serde::{Deserialize, Serialize};

use crate::client::ApiReservation;

/// Reservation status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Pending,
    Accepted,
    Rejected,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }
}

impl Default for ReservationStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reservation record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reservation {
    /// Backend-assigned identifier, absent until persisted
    pub id: Option<String>,
    pub full_name: String,
    pub phone: String,
    pub email: String,
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:mm`
    pub time: String,
    /// Party size (1-20 by policy, not enforced here)
    pub seats: u32,
    pub special_requests: Option<String>,
    pub status: ReservationStatus,
}

impl From<ApiReservation> for Reservation {
    fn from(api: ApiReservation) -> Self {
        Self {
            id: api.id,
            full_name: api.full_name,
            phone: api.phone,
            email: api.email,
            date: api.date,
            time: api.time,
            seats: api.seats,
            special_requests: api.special_requests,
            status: api.status,
        }
    }
}

/// Create/update payload conversion. Drops id and timestamps, which the
/// backend owns.
impl From<&Reservation> for ApiReservation {
    fn from(r: &Reservation) -> Self {
        Self {
            id: None,
            full_name: r.full_name.clone(),
            phone: r.phone.clone(),
            email: r.email.clone(),
            date: r.date.clone(),
            time: r.time.clone(),
            seats: r.seats,
            special_requests: r.special_requests.clone(),
            status: r.status,
            created_at: None,
            updated_at: None,
        }
    }
}
