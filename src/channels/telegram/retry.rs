//! Retry with exponential backoff for Telegram Bot API calls

use std::time::Duration;

/// Retry policy for Telegram Bot API calls
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of retry attempts
    pub max_retries: u32,
    /// Base delay between retries (doubles each attempt)
    pub base_delay: Duration,
    /// Maximum delay cap
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// Delay before retry attempt number `attempt` (zero-based).
    ///
    /// A `retry_after` from a 429 response takes precedence over the
    /// exponential schedule; both are capped at `max_delay`.
    #[must_use]
    pub fn delay(&self, attempt: u32, retry_after: Option<Duration>) -> Duration {
        if let Some(ra) = retry_after {
            return ra.min(self.max_delay);
        }

        self.base_delay
            .saturating_mul(2u32.saturating_pow(attempt))
            .min(self.max_delay)
    }
}

/// Whether an HTTP status indicates a recoverable Telegram API error.
///
/// Rate limits (429) and server errors (5xx) are worth retrying; client
/// errors are not.
#[must_use]
pub fn is_recoverable(status: u16) -> bool {
    status == 429 || (500..600).contains(&status)
}

/// Extract the `retry_after` duration from a Telegram error body.
///
/// Telegram encodes the value in seconds at `parameters.retry_after`.
#[must_use]
pub fn parse_retry_after(body: &str) -> Option<Duration> {
    let v: serde_json::Value = serde_json::from_str(body).ok()?;
    let secs = v.get("parameters")?.get("retry_after")?.as_u64()?;

    Some(Duration::from_secs(secs))
}
