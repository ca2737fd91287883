use anyhow::Result;
use log::warn;
use std::{future::Future, time::Duration};

/// How many times a transport-level operation is attempted and how long
/// to wait between attempts.
///
/// Only errors returned by the operation are retried; an HTTP response of
/// any status is a success at this level.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    /// Delay before the next attempt, given the 1-based attempt that failed
    pub backoff: fn(u32) -> Duration,
}

fn linear_seconds(attempt: u32) -> Duration {
    Duration::from_secs(u64::from(attempt))
}

fn no_delay(_: u32) -> Duration {
    Duration::ZERO
}

impl RetryPolicy {
    /// Three attempts, waiting 1s then 2s.
    pub const fn linear() -> Self {
        RetryPolicy {
            max_attempts: 3,
            backoff: linear_seconds,
        }
    }

    /// One attempt, used for reachability probes.
    pub const fn once() -> Self {
        RetryPolicy {
            max_attempts: 1,
            backoff: no_delay,
        }
    }

    pub const fn immediate(max_attempts: u32) -> Self {
        RetryPolicy {
            max_attempts,
            backoff: no_delay,
        }
    }

    /// Run `op` until it succeeds or attempts are exhausted; the last error
    /// is returned unchanged.
    pub async fn run<T, F, Fut>(&self, what: &str, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let max = self.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match op().await {
                Ok(v) => return Ok(v),
                Err(e) if attempt < max => {
                    let wait = (self.backoff)(attempt);
                    warn!(
                        "{} failed (attempt {}/{}): {:#}; retrying in {:?}",
                        what, attempt, max, e, wait
                    );
                    tokio::time::sleep(wait).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::linear()
    }
}
