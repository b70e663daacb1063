use std::future::Future;
use std::time::Duration;

use backoff::backoff::Backoff;
use backoff::{ExponentialBackoff, ExponentialBackoffBuilder};
use tracing::{info, warn};

use crate::ClientError;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(1);
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(5);

/// How many times a request is sent and how long to wait in between.
///
/// The wait after attempt `n` is `base_delay * 2^(n - 1)`, capped at
/// `max_delay`, with no jitter. Errors for which
/// [`ClientError::is_retryable`] is false end the loop at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: DEFAULT_BASE_DELAY,
            max_delay: DEFAULT_MAX_DELAY,
        }
    }
}

impl RetryPolicy {
    /// Sends every request exactly once.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// The delays between attempts. Attempts are bounded by count, not by
    /// elapsed time.
    pub fn backoff(&self) -> ExponentialBackoff {
        ExponentialBackoffBuilder::new()
            .with_initial_interval(self.base_delay)
            .with_multiplier(2.0)
            .with_randomization_factor(0.0)
            .with_max_interval(self.max_delay)
            .with_max_elapsed_time(None)
            .build()
    }

    /// Runs `call` until it succeeds, fails with a final error, or runs out
    /// of attempts. The last error is returned.
    pub async fn run<T, F, Fut>(&self, operation: &str, mut call: F) -> Result<T, ClientError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ClientError>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 0;

        let result = backoff::future::retry_notify(
            self.backoff(),
            || {
                attempt += 1;
                let current = attempt;
                let request = call();
                async move {
                    request.await.map_err(|err| {
                        warn!(
                            operation,
                            attempt = current,
                            max_attempts,
                            error = %err,
                            "Request failed"
                        );
                        if err.is_retryable() && current < max_attempts {
                            backoff::Error::transient(err)
                        } else {
                            backoff::Error::permanent(err)
                        }
                    })
                }
            },
            |_: ClientError, delay: Duration| {
                info!(operation, delay_ms = delay.as_millis() as u64, "Retrying");
            },
        )
        .await;

        if result.is_ok() && attempt > 1 {
            info!(operation, attempt, "Request succeeded after retrying");
        }
        result
    }
}
