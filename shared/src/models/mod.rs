//! Domain models
//!
//! Local records the UI layer works with, converted from the wire DTOs in
//! [`crate::client`] by the pure mapping impls next to each model.

pub mod reservation;
pub mod shift;

// Re-exports
pub use reservation::*;
pub use shift::*;
