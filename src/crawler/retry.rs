//! Fetch retries with exponential backoff
//!
//! Retryable failures (see [`FetchError::is_retryable`]) are retried up to
//! the configured bound, doubling the delay each time. A stop signal
//! abandons the remaining back-offs.

use crate::config::CrawlerConfig;
use crate::crawler::fetcher::Fetcher;
use crate::FetchError;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Retry bound and backoff delays for one fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,

    /// Delay before the first retry
    pub base_delay: Duration,

    /// Cap for any single delay
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            base_delay: Duration::from_millis(config.retry_base_delay_ms),
            max_delay: Duration::from_millis(config.retry_max_delay_ms),
        }
    }

    /// A policy that never retries
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Delay before `attempt` (0 is the first attempt and has no delay)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }

        let factor = 2u32.saturating_pow(attempt - 1);
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }
}

/// Fetches a URL, retrying retryable failures with backoff
///
/// A non-2xx response is turned into [`FetchError::Status`].
///
/// # Returns
///
/// * `Ok(String)` - Body of the first successful response
/// * `Err(FetchError)` - The last failure, a non-retryable failure, or
///   [`FetchError::Cancelled`] if the stop signal fired during a backoff
pub async fn fetch_with_retry<F: Fetcher + ?Sized>(
    fetcher: &F,
    url: &Url,
    policy: &RetryPolicy,
    cancel: &CancellationToken,
) -> Result<String, FetchError> {
    let mut attempt = 0;

    loop {
        let delay = policy.delay_for(attempt);
        if !delay.is_zero() {
            tokio::select! {
                _ = cancel.cancelled() => return Err(FetchError::Cancelled),
                _ = tokio::time::sleep(delay) => {}
            }
        }

        let result = match fetcher.fetch(url).await {
            Ok(page) if page.is_success() => return Ok(page.body),
            Ok(page) => FetchError::Status(page.status),
            Err(e) => e,
        };

        if !result.is_retryable() || attempt >= policy.max_retries {
            return Err(result);
        }

        attempt += 1;
        tracing::debug!(
            url = %url,
            attempt,
            delay_ms = policy.delay_for(attempt).as_millis() as u64,
            "Retrying fetch after: {}",
            result
        );
    }
}
