//! Client-related types shared between backend and client
//!
//! Wire DTOs used in API communication. Field names are camelCase on the
//! wire, matching the backend's JSON contract.

use serde::{Deserialize, Serialize};

use crate::models::ReservationStatus;

// Re-export ApiResponse from response module
pub use crate::response::ApiResponse;

// =============================================================================
// Reservation API DTOs
// =============================================================================

/// Reservation wire record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiReservation {
    /// Backend-assigned identifier, absent until persisted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub full_name: String,
    pub phone: String,
    pub email: String,
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:mm`
    pub time: String,
    pub seats: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_requests: Option<String>,
    pub status: ReservationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Reject reservation payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RejectRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

// =============================================================================
// Shift API DTOs
// =============================================================================

/// Shift wire record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiShift {
    /// Slot label, e.g. "19:00"
    pub time: String,
    /// `YYYY-MM-DD`
    pub date: String,
    pub enabled: bool,
    pub max_reservations: u32,
}

/// Partial shift update payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiShiftPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_reservations: Option<u32>,
}

/// Aggregate reservation statistics for one date
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationStats {
    pub date: String,
    pub total_reservations: u32,
    pub total_seats: u32,
    pub pending_reservations: u32,
    pub accepted_reservations: u32,
    pub rejected_reservations: u32,
    pub shift_stats: Vec<ShiftStat>,
}

/// Per-shift row of [`ReservationStats`]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftStat {
    pub time: String,
    pub reservations: u32,
    pub seats: u32,
    pub available: bool,
}

// =============================================================================
// Push token API DTOs
// =============================================================================

/// Push token registration payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushTokenRegistration {
    pub token: String,
    pub device_id: String,
    /// "ios" or "android"
    pub platform: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reservation_uses_camel_case_on_the_wire() {
        let raw = r#"{
            "id": "r1",
            "fullName": "Mario Rossi",
            "phone": "+39 333 1234567",
            "email": "mario@example.com",
            "date": "2025-06-14",
            "time": "20:00",
            "seats": 4,
            "specialRequests": "tavolo fuori",
            "status": "pending",
            "updatedAt": "2025-06-10T12:00:00Z"
        }"#;
        let r: ApiReservation = serde_json::from_str(raw).unwrap();
        assert_eq!(r.full_name, "Mario Rossi");
        assert_eq!(r.special_requests.as_deref(), Some("tavolo fuori"));
        assert_eq!(r.status, ReservationStatus::Pending);

        let json = serde_json::to_value(&r).unwrap();
        assert!(json.get("fullName").is_some());
        assert!(json.get("full_name").is_none());
        assert!(json.get("createdAt").is_none());
    }

    #[test]
    fn shift_patch_skips_unset_fields() {
        let patch = ApiShiftPatch {
            enabled: Some(true),
            max_reservations: None,
        };
        let json = serde_json::to_string(&patch).unwrap();
        assert_eq!(json, r#"{"enabled":true}"#);
    }
}
