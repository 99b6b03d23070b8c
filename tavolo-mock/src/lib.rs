//! In-memory mock of the reservation backend
//!
//! Serves the full REST surface the client consumes, backed by in-memory
//! state. Used by the client integration tests.

pub mod api;
pub mod state;

pub use api::router;
pub use state::AppState;

use std::sync::Arc;

use tokio::task::JoinHandle;

/// Serve the mock on an ephemeral local port.
///
/// Returns the `/api` base URL, the shared state for test seeding, and the
/// server task handle.
pub async fn spawn() -> (String, Arc<AppState>, JoinHandle<()>) {
    let state = Arc::new(AppState::default());
    let app = router(state.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock listener");
    let addr = listener.local_addr().expect("mock listener addr");
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.expect("mock server");
    });
    tracing::debug!(%addr, "mock backend started");
    (format!("http://{addr}/api"), state, handle)
}
