use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::error::ToolError;
use crate::Result;

/// Explicit retry policy for fallible network-facing operations.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub backoff_factor: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_secs(1),
            backoff_factor: 2.0,
        }
    }
}

/// Runs `f` until it succeeds, the error is not retryable, or the attempt
/// budget is spent. The delay doubles (by `backoff_factor`) between attempts.
pub async fn with_retry<F, Fut, T>(policy: &RetryPolicy, f: F) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Result<T>>,
{
    let mut attempts = 0;
    let mut delay = policy.initial_delay;
    loop {
        debug!("Attempt {} of {}", attempts + 1, policy.max_attempts);
        match f().await {
            Ok(result) => {
                if attempts > 0 {
                    info!("Operation succeeded after {} retries", attempts);
                }
                return Ok(result);
            }
            Err(e) => {
                attempts += 1;
                if !e.is_retryable() {
                    error!("Non-retryable error on attempt {}: {}", attempts, e);
                    return Err(e);
                }
                if attempts >= policy.max_attempts {
                    error!("Operation failed after {} attempts: {}", attempts, e);
                    return Err(e);
                }
                warn!(
                    "Attempt {} failed: {}. Retrying in {:?}...",
                    attempts, e, delay
                );
                sleep(delay).await;
                delay = delay.mul_f64(policy.backoff_factor);
            }
        }
    }
}
