//! Retrying fetcher over any [`SourceTransport`].
//!
//! Up to `max_retries` attempts. Between attempts it sleeps
//! `base_delay * 2^attempt` (attempt counted from 1), so with the defaults the
//! waits are 2s then 4s and there is no sleep after the final attempt. Content
//! whose trimmed length falls below `min_content_len` counts as a failure.

use super::provider::{FetchError, SourceTransport};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Retry knobs for [`SourceFetcher`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts per fetch, the first included.
    pub max_retries: u32,
    /// Doubled per attempt to get the backoff sleep.
    pub base_delay: Duration,
    /// Trimmed bodies shorter than this are treated as failed fetches.
    pub min_content_len: usize,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_secs(1),
            min_content_len: 10,
        }
    }
}

impl RetryPolicy {
    /// Sleep after failed attempt `attempt` (1-based).
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(2u32.saturating_pow(attempt))
    }
}

/// Fetches resources through a transport, retrying with exponential backoff.
#[derive(Clone)]
pub struct SourceFetcher {
    transport: Arc<dyn SourceTransport>,
    policy: RetryPolicy,
}

impl SourceFetcher {
    pub fn new(transport: Arc<dyn SourceTransport>, policy: RetryPolicy) -> Self {
        Self { transport, policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn transport_name(&self) -> &str {
        self.transport.name()
    }

    /// Fetch `path`, retrying transient failures.
    pub async fn fetch(&self, path: &str) -> Result<String, FetchError> {
        let attempts = self.policy.max_retries.max(1);
        let mut last_error = None;

        for attempt in 1..=attempts {
            match self.attempt(path).await {
                Ok(text) => {
                    debug!(path, attempt, bytes = text.len(), "fetched");
                    return Ok(text);
                }
                Err(e) => {
                    warn!(path, attempt, max = attempts, error = %e, "fetch attempt failed");
                    last_error = Some(e);
                }
            }

            if attempt < attempts {
                tokio::time::sleep(self.policy.delay_after(attempt)).await;
            }
        }

        let last_cause = last_error.unwrap_or(FetchError::ContentTooShort {
            path: path.to_string(),
            len: 0,
            min: self.policy.min_content_len,
        });
        Err(FetchError::Exhausted {
            path: path.to_string(),
            attempts,
            last_cause: Box::new(last_cause),
        })
    }

    async fn attempt(&self, path: &str) -> Result<String, FetchError> {
        let text = self.transport.get(path).await?;
        let len = text.trim().len();
        if len == 0 || len < self.policy.min_content_len {
            return Err(FetchError::ContentTooShort {
                path: path.to_string(),
                len,
                min: self.policy.min_content_len,
            });
        }
        Ok(text)
    }
}
