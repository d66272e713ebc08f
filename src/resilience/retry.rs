use std::future::Future;

use tokio::time::{sleep, Duration};
use tracing::{debug, error, warn};

#[derive(Debug, Clone)]
pub struct RetrySettings {
    /// total attempts, first call included
    pub attempts: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl RetrySettings {
    /// One retry, straight after the first failure.
    pub fn once() -> Self {
        Self { attempts: 2, base_delay_ms: 0, max_delay_ms: 0 }
    }

    /// Runs `operation` until it succeeds, `is_retryable` rejects the error or
    /// attempts run out. The attempt number (1-based) is handed to the operation
    /// so later attempts can change the request.
    pub async fn run_with_retry_if<F, Fut, T, E, R>(&self, mut operation: F, is_retryable: R) -> Result<T, E>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        R: Fn(&E) -> bool,
        E: std::fmt::Display,
    {
        let attempts = self.attempts.max(1);
        let mut delay = self.base_delay_ms;
        let mut attempt = 1;

        loop {
            match operation(attempt).await {
                Ok(value) => return Ok(value),
                Err(e) if attempt < attempts && is_retryable(&e) => {
                    warn!("Attempt {attempt}/{attempts} failed: {e}");
                    if delay > 0 {
                        sleep(Duration::from_millis(delay)).await;
                    }
                    delay = (delay * 2).min(self.max_delay_ms);
                    attempt += 1;
                }
                Err(e) if attempts > 1 && attempt >= attempts => {
                    error!("attempt {attempt}/{attempts} failed, retries exhausted: {e}");
                    return Err(e);
                }
                Err(e) => {
                    debug!("attempt {attempt}/{attempts} failed, not retryable: {e}");
                    return Err(e);
                }
            }
        }
    }
}
