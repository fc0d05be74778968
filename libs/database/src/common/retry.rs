//! Retry helpers with exponential backoff for transient connection failures.

use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Configuration for retry behavior.
#[derive(Clone, Debug)]
pub struct RetryConfig {
    /// Maximum number of retries after the initial attempt
    pub max_retries: u32,
    /// Initial delay before the first retry, in milliseconds
    pub initial_delay_ms: u64,
    /// Multiplier applied to the delay after each failed attempt
    pub backoff_factor: u32,
}

impl RetryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_initial_delay(mut self, initial_delay_ms: u64) -> Self {
        self.initial_delay_ms = initial_delay_ms;
        self
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay_ms: 100,
            backoff_factor: 2,
        }
    }
}

/// Retry an async operation with the default configuration.
pub async fn retry<F, Fut, T, E>(operation: F) -> Result<T, E>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    retry_with_backoff(operation, RetryConfig::default()).await
}

/// Retry an async operation with exponential backoff.
///
/// The final error is returned once `max_retries` is exhausted.
pub async fn retry_with_backoff<F, Fut, T, E>(operation: F, config: RetryConfig) -> Result<T, E>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut delay = Duration::from_millis(config.initial_delay_ms);
    let mut attempt = 0;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < config.max_retries => {
                attempt += 1;
                warn!(
                    "Operation failed (attempt {}/{}): {}. Retrying in {:?}",
                    attempt, config.max_retries, e, delay
                );
                tokio::time::sleep(delay).await;
                delay *= config.backoff_factor;
            }
            Err(e) => return Err(e),
        }
    }
}
