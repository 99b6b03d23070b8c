//! Tavolo Client - staff client for the restaurant reservation backend
//!
//! Synchronization layer between the staff UI and the remote backend:
//! typed HTTP calls, retried mutations, change-detection polling, and
//! local notification dispatch.

pub mod config;
pub mod error;
pub mod http;
pub mod notify;
pub mod poller;
pub mod retry;
pub mod service;

pub use config::{ClientConfig, Environment};
pub use error::{ClientError, ClientResult};
pub use http::{HttpClient, ReservationFilter};
pub use notify::{LogNotifier, NotificationDispatcher, Notifier};
pub use poller::{DEFAULT_POLL_INTERVAL, ReservationPoller, Subscription};
pub use retry::{DEFAULT_BASE_DELAY, DEFAULT_MAX_ATTEMPTS, retry};
pub use service::ReservationService;

// Re-export shared types for convenience
pub use shared::{Reservation, ReservationStatus, Shift};
