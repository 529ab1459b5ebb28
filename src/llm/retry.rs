//! Bounded exponential retry for model calls.

use std::future::Future;
use std::time::Duration;

/// Retry schedule for transient model failures.
///
/// Every failure is treated as transient. The delay after failed attempt `n`
/// (1-based) is `min_delay * multiplier^(n-1)`, capped at `max_delay`.
/// There is no jitter.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    /// Delay after the first failure.
    pub min_delay: Duration,
    /// Upper bound for any single delay.
    pub max_delay: Duration,
    /// Growth factor per consecutive failure (typically 2.0).
    pub multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            min_delay: Duration::from_secs(4),
            max_delay: Duration::from_secs(10),
            multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    /// A policy that retries without sleeping.
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            min_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            multiplier: 1.0,
        }
    }

    /// Attempts actually made before giving up (never less than one).
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Delay to wait after failed attempt `attempt` (1-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1) as i32;
        let delay_secs = self.min_delay.as_secs_f64() * self.multiplier.powi(exponent);
        let capped = delay_secs.min(self.max_delay.as_secs_f64());
        Duration::from_secs_f64(capped.max(0.0))
    }

    /// Run `op` until it succeeds or the attempt budget is spent.
    ///
    /// `op` receives the 1-based attempt number. The last error is returned
    /// unchanged when every attempt fails.
    pub async fn run<T, F, Fut>(&self, mut op: F) -> anyhow::Result<T>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = anyhow::Result<T>>,
    {
        let attempts = self.attempts();
        let mut attempt = 0u32;

        loop {
            attempt += 1;
            match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(e) if attempt >= attempts => return Err(e),
                Err(e) => {
                    let delay = self.delay_for(attempt);
                    tracing::warn!(
                        attempt,
                        max_attempts = attempts,
                        delay_secs = delay.as_secs_f64(),
                        "Model call failed, retrying: {:#}",
                        e
                    );
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn default_schedule_starts_at_floor_and_caps() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(1), Duration::from_secs(4));
        assert_eq!(policy.delay_for(2), Duration::from_secs(8));
        assert_eq!(policy.delay_for(3), Duration::from_secs(10));
        assert_eq!(policy.delay_for(10), Duration::from_secs(10));
    }

    #[tokio::test]
    async fn succeeds_on_third_attempt() {
        let calls = AtomicU32::new(0);
        let result = RetryPolicy::immediate(3)
            .run(|attempt| {
                calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if attempt < 3 {
                        anyhow::bail!("overloaded");
                    }
                    Ok(attempt)
                }
            })
            .await;

        assert_eq!(result.expect("third attempt succeeds"), 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn surfaces_last_error_after_budget() {
        let calls = AtomicU32::new(0);
        let result: anyhow::Result<()> = RetryPolicy::immediate(3)
            .run(|attempt| {
                calls.fetch_add(1, Ordering::SeqCst);
                async move { anyhow::bail!("failure {}", attempt) }
            })
            .await;

        let err = result.expect_err("all attempts fail");
        assert_eq!(err.to_string(), "failure 3");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn zero_attempts_still_tries_once() {
        let calls = AtomicU32::new(0);
        let _ = RetryPolicy::immediate(0)
            .run(|_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { anyhow::Ok(()) }
            })
            .await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
