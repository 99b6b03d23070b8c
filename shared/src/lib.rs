//! Shared types for the Tavolo reservation manager
//!
//! Common types used across the client and the mock backend: wire DTOs,
//! the API response envelope, and domain models.

pub mod client;
pub mod models;
pub mod response;

// Re-exports
pub use client::{
    ApiReservation, ApiShift, ApiShiftPatch, PushTokenRegistration, RejectRequest,
    ReservationStats, ShiftStat,
};
pub use models::{Reservation, ReservationStatus, Shift, DEFAULT_MAX_RESERVATIONS, DEFAULT_TIMES};
pub use response::ApiResponse;
