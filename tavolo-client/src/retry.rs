//! Retry wrapper for critical mutating operations
//!
//! Reads are never wrapped: a transient read failure self-heals on the next
//! poll tick. A transient write failure must not silently drop user intent,
//! so reservation update/delete go through [`retry`].

use std::future::Future;
use std::time::Duration;

use crate::ClientResult;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(1);

/// Run `operation` up to `max_attempts` times.
///
/// Between attempt `k` and `k + 1` the wrapper sleeps `base_delay * k`
/// (linear backoff: 1x, 2x, ...). After the final attempt the last error is
/// surfaced unchanged; there is no partial-result fallback.
pub async fn retry<T, F, Fut>(
    mut operation: F,
    max_attempts: u32,
    base_delay: Duration,
) -> ClientResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ClientResult<T>>,
{
    let max_attempts = max_attempts.max(1);
    let mut attempt = 0;
    loop {
        attempt += 1;
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt >= max_attempts => {
                tracing::error!(attempt, error = %e, "operation failed, retries exhausted");
                return Err(e);
            }
            Err(e) => {
                let backoff = base_delay * attempt;
                tracing::warn!(
                    attempt,
                    backoff_ms = backoff.as_millis() as u64,
                    error = %e,
                    "operation failed, retrying"
                );
                tokio::time::sleep(backoff).await;
            }
        }
    }
}
