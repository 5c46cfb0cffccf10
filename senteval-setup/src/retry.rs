//! Retry Module
//!
//! Retries network-bound bootstrap commands with exponential backoff.

use std::thread;
use std::time::Duration;

use rand::Rng;
use tracing::warn;

use crate::error::{Result, SetupError};

/// curl exit codes for DNS, connect, partial transfer, timeout, empty reply and recv failures.
const CURL_TRANSIENT_CODES: &[i32] = &[6, 7, 18, 28, 52, 56];

const TRANSIENT_MARKERS: &[&str] = &[
    "could not resolve host",
    "timed out",
    "connection reset",
    "connection refused",
    "early eof",
    "rpc failed",
    "temporary failure",
    "service unavailable",
    "bad gateway",
    "gateway timeout",
    "too many requests",
];

/// HTTP statuses worth retrying. Only matched in anchored forms so curl's
/// progress meter (byte counts, rates) cannot trigger a retry.
const TRANSIENT_STATUSES: &[u16] = &[429, 502, 503, 504];

/// Configuration for retry behavior.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts
    pub max_retries: u32,
    /// Initial delay before first retry (in milliseconds)
    pub initial_delay_ms: u64,
    /// Maximum delay between retries (in milliseconds)
    pub max_delay_ms: u64,
    /// Multiplier for exponential backoff
    pub backoff_multiplier: f64,
    /// Add up to 25% random jitter to each delay
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay_ms: 1_000,
            max_delay_ms: 30_000,
            backoff_multiplier: 2.0,
            jitter: true,
        }
    }
}

impl RetryConfig {
    pub fn with_max_retries(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Default::default()
        }
    }

    /// Disable retries.
    pub fn none() -> Self {
        Self::with_max_retries(0)
    }

    fn calculate_delay(&self, attempt: u32) -> Duration {
        let base_delay =
            self.initial_delay_ms as f64 * self.backoff_multiplier.powi(attempt as i32);
        let capped_delay = base_delay.min(self.max_delay_ms as f64);

        let final_delay = if self.jitter {
            capped_delay * rand::thread_rng().gen_range(1.0..1.25)
        } else {
            capped_delay
        };

        Duration::from_millis(final_delay as u64)
    }
}

/// Whether a failed step is worth running again.
pub fn is_retryable(error: &SetupError) -> bool {
    match error {
        SetupError::CommandFailed {
            program,
            code,
            stderr,
            ..
        } => {
            if program == "curl" && code.is_some_and(|c| CURL_TRANSIENT_CODES.contains(&c)) {
                return true;
            }
            let stderr = stderr.to_lowercase();
            TRANSIENT_MARKERS.iter().any(|marker| stderr.contains(marker))
                || TRANSIENT_STATUSES.iter().any(|status| {
                    stderr.contains(&format!("returned error: {status}"))
                        || stderr.contains(&format!("http {status}"))
                        || stderr.contains(&format!("http/1.1 {status}"))
                        || stderr.contains(&format!("http/2 {status}"))
                })
        }
        SetupError::Io(e) => matches!(
            e.kind(),
            std::io::ErrorKind::ConnectionReset
                | std::io::ErrorKind::ConnectionAborted
                | std::io::ErrorKind::TimedOut
                | std::io::ErrorKind::Interrupted
        ),
        SetupError::Spawn { .. } => false,
        SetupError::Config(_) => false,
        SetupError::InvalidConfig(_) => false,
        SetupError::MissingArtifact { .. } => false,
    }
}

/// Run `operation`, retrying transient failures up to `config.max_retries` times.
pub fn with_retry<F, T>(config: &RetryConfig, mut operation: F) -> Result<T>
where
    F: FnMut() -> Result<T>,
{
    let mut attempt = 0;
    loop {
        match operation() {
            Ok(result) => return Ok(result),
            Err(e) if attempt < config.max_retries && is_retryable(&e) => {
                let delay = config.calculate_delay(attempt);
                warn!(
                    attempt = attempt + 1,
                    max_retries = config.max_retries,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "transient failure, retrying"
                );
                thread::sleep(delay);
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
