//! Retry of failed attempts.
//!
//! [`RetryOnFailure`] plugs the [`RetryPolicy`] carried by each
//! [`RequestDescriptor`] into [`tower::retry`]. The descriptor is re-sent
//! unchanged, so every attempt carries byte-identical query and body.

use restwire_core::{Error, RequestDescriptor, RetryPolicy};
use tokio::time::Sleep;
use tower::retry::Policy;
use tracing::warn;

use crate::response::Response;

/// Tower retry policy driven by the descriptor's [`RetryPolicy`].
///
/// Retries:
/// - connection and timeout errors
/// - responses whose status is listed in [`RetryPolicy::http_status`]
///
/// at most [`RetryPolicy::times`] times, waiting [`RetryPolicy::delay`]
/// before each new attempt.
#[derive(Debug, Clone)]
pub struct RetryOnFailure {
    remaining: Option<u32>,
    attempt: u32,
}

impl RetryOnFailure {
    /// Create a policy; the retry budget is read from the first request.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            remaining: None,
            attempt: 1,
        }
    }

    /// Number of the attempt in flight, starting at 1.
    #[must_use]
    pub const fn attempt(&self) -> u32 {
        self.attempt
    }

    fn should_retry_response(policy: &RetryPolicy, response: &Response) -> bool {
        policy.retries_status(response.status().as_u16())
    }

    fn should_retry_error(error: &Error) -> bool {
        error.is_connection() || error.is_timeout()
    }
}

impl Default for RetryOnFailure {
    fn default() -> Self {
        Self::new()
    }
}

impl Policy<RequestDescriptor, Response, Error> for RetryOnFailure {
    type Future = Sleep;

    fn retry(
        &mut self,
        req: &mut RequestDescriptor,
        result: &mut Result<Response, Error>,
    ) -> Option<Self::Future> {
        let policy = req.retry();
        let remaining = self.remaining.get_or_insert(policy.times);
        if *remaining == 0 {
            return None;
        }

        let reason = match result {
            Ok(response) if Self::should_retry_response(policy, response) => {
                response.status().to_string()
            }
            Err(error) if Self::should_retry_error(error) => error.to_string(),
            _ => return None,
        };

        *remaining -= 1;
        self.attempt += 1;
        warn!(
            attempt = self.attempt,
            delay_ms = u64::try_from(policy.delay.as_millis()).unwrap_or(u64::MAX),
            %reason,
            "retrying request"
        );
        Some(tokio::time::sleep(policy.delay))
    }

    fn clone_request(&mut self, req: &RequestDescriptor) -> Option<RequestDescriptor> {
        Some(req.clone())
    }
}
