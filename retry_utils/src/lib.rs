use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, warn};

/// Classification of upstream failures for retry strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// HTTP 429 - retry after an exponentially growing delay
    RateLimited,
    /// Any other non-success response or transport failure - retry immediately
    Upstream,
}

/// Retry configuration shared by all upstream calls
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Maximum number of attempts, initial attempt included
    pub max_attempts: u32,
    /// Base backoff delay; attempt n waits base * 2^(n-1) on rate limits
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
        }
    }

    /// Backoff delay after a rate-limited attempt (1-based attempt number).
    /// Worst-case total backoff is base_delay * (2^max_attempts - 1).
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.base_delay.saturating_mul(factor)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 7,
            base_delay: Duration::from_millis(1000),
        }
    }
}

/// State of a retried operation.
///
/// Transitions:
/// * `Attempting {n}` + success -> `Succeeded`
/// * `Attempting {n}` + failure with n >= max_attempts -> `Exhausted {n}`
/// * `Attempting {n}` + rate limit -> `Backoff {n, base * 2^(n-1)}`
/// * `Attempting {n}` + other failure -> `Backoff {n, 0}` (immediate retry)
/// * `Backoff {n, _}` + resume -> `Attempting {n+1}`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryState {
    Attempting { attempt: u32 },
    Backoff { attempt: u32, delay: Duration },
    Succeeded,
    Exhausted { attempts: u32 },
}

/// Drives an operation through the retry state machine one attempt at a time.
#[derive(Debug, Clone)]
pub struct Retrier {
    policy: RetryPolicy,
    state: RetryState,
}

impl Retrier {
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            policy,
            state: RetryState::Attempting { attempt: 1 },
        }
    }

    pub fn state(&self) -> RetryState {
        self.state
    }

    /// Current 1-based attempt number
    pub fn attempt(&self) -> u32 {
        match self.state {
            RetryState::Attempting { attempt } | RetryState::Backoff { attempt, .. } => attempt,
            RetryState::Exhausted { attempts } => attempts,
            RetryState::Succeeded => 0,
        }
    }

    pub fn record_success(&mut self) {
        self.state = RetryState::Succeeded;
    }

    /// Record a failed attempt. Every failure consumes an attempt; rate limits
    /// differ from other upstream failures only in the backoff delay.
    pub fn record_failure(&mut self, class: ErrorClass) -> RetryState {
        if let RetryState::Attempting { attempt } = self.state {
            self.state = if attempt >= self.policy.max_attempts {
                RetryState::Exhausted { attempts: attempt }
            } else {
                let delay = match class {
                    ErrorClass::RateLimited => self.policy.backoff_delay(attempt),
                    ErrorClass::Upstream => Duration::ZERO,
                };
                RetryState::Backoff { attempt, delay }
            };
        }
        self.state
    }

    /// Leave the backoff state and start the next attempt
    pub fn resume(&mut self) -> RetryState {
        if let RetryState::Backoff { attempt, .. } = self.state {
            self.state = RetryState::Attempting {
                attempt: attempt + 1,
            };
        }
        self.state
    }
}

/// Terminal failure after the attempt cap, composed with the operation label
#[derive(Error, Debug)]
#[error("{label} failed after {attempts} attempts: {source}")]
pub struct RetriesExhausted<E>
where
    E: std::error::Error + 'static,
{
    pub label: String,
    pub attempts: u32,
    #[source]
    pub source: E,
}

/// Retry an async operation with exponential backoff on rate limits.
///
/// `operation` receives the 1-based attempt number; `classify_error` decides
/// the backoff class of each failure. Returns the first success, or a
/// [`RetriesExhausted`] wrapping the final error once the attempt cap is hit.
pub async fn retry_with_backoff<F, Fut, T, E>(
    policy: RetryPolicy,
    label: &str,
    mut operation: F,
    classify_error: impl Fn(&E) -> ErrorClass,
) -> Result<T, RetriesExhausted<E>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::error::Error + 'static,
{
    let mut retrier = Retrier::new(policy);

    loop {
        let attempt = retrier.attempt();
        debug!("{} attempt {}/{}", label, attempt, policy.max_attempts);

        match operation(attempt).await {
            Ok(result) => {
                retrier.record_success();
                if attempt > 1 {
                    debug!("{} succeeded after {} attempts", label, attempt);
                }
                return Ok(result);
            }
            Err(e) => {
                let class = classify_error(&e);
                match retrier.record_failure(class) {
                    RetryState::Exhausted { attempts } => {
                        error!("{} failed after {} attempts: {}", label, attempts, e);
                        return Err(RetriesExhausted {
                            label: label.to_string(),
                            attempts,
                            source: e,
                        });
                    }
                    RetryState::Backoff { delay, .. } => {
                        warn!(
                            "{} failed (attempt {}/{}): {} - retrying in {}ms",
                            label,
                            attempt,
                            policy.max_attempts,
                            e,
                            delay.as_millis()
                        );
                        if !delay.is_zero() {
                            tokio::time::sleep(delay).await;
                        }
                        retrier.resume();
                    }
                    // record_failure only transitions out of Attempting
                    state => unreachable!("unexpected retry state: {:?}", state),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Error, Debug)]
    #[error("TestError: {kind}")]
    struct TestError {
        kind: &'static str,
    }

    fn test_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy::new(max_attempts, Duration::from_millis(1))
    }

    #[test]
    fn backoff_delay_doubles_per_attempt() {
        let policy = RetryPolicy::new(7, Duration::from_millis(1000));
        assert_eq!(policy.backoff_delay(1), Duration::from_millis(1000));
        assert_eq!(policy.backoff_delay(2), Duration::from_millis(2000));
        assert_eq!(policy.backoff_delay(3), Duration::from_millis(4000));
        assert_eq!(policy.backoff_delay(7), Duration::from_millis(64000));
    }

    #[test]
    fn state_machine_walks_attempts_to_exhaustion() {
        let mut retrier = Retrier::new(test_policy(3));
        assert_eq!(retrier.state(), RetryState::Attempting { attempt: 1 });

        assert!(matches!(
            retrier.record_failure(ErrorClass::RateLimited),
            RetryState::Backoff { attempt: 1, .. }
        ));
        retrier.resume();
        assert_eq!(retrier.state(), RetryState::Attempting { attempt: 2 });

        retrier.record_failure(ErrorClass::Upstream);
        retrier.resume();
        assert_eq!(retrier.state(), RetryState::Attempting { attempt: 3 });

        // Final attempt fails terminally
        assert_eq!(
            retrier.record_failure(ErrorClass::RateLimited),
            RetryState::Exhausted { attempts: 3 }
        );
    }

    #[test]
    fn upstream_failures_retry_without_delay() {
        let mut retrier = Retrier::new(test_policy(3));
        assert_eq!(
            retrier.record_failure(ErrorClass::Upstream),
            RetryState::Backoff {
                attempt: 1,
                delay: Duration::ZERO
            }
        );
    }

    #[tokio::test]
    async fn immediate_success() {
        let result = retry_with_backoff(
            test_policy(3),
            "test call",
            |_| async { Ok::<_, TestError>(42) },
            |_| ErrorClass::Upstream,
        )
        .await;

        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test]
    async fn rate_limited_then_success_uses_one_extra_attempt_per_429() {
        let mut attempts = 0u32;
        let result = retry_with_backoff(
            test_policy(7),
            "test call",
            |_| {
                attempts += 1;
                let fail = attempts <= 2;
                async move {
                    if fail {
                        Err(TestError { kind: "429" })
                    } else {
                        Ok(42)
                    }
                }
            },
            |_| ErrorClass::RateLimited,
        )
        .await;

        // 429 twice then success: exactly 3 attempts made
        assert_eq!(result.unwrap(), 42);
        assert_eq!(attempts, 3);
    }

    #[tokio::test]
    async fn exhausted_retries_compose_label_and_attempt_count() {
        let mut attempts = 0u32;
        let result = retry_with_backoff(
            test_policy(4),
            "Wallet Transactions",
            |_| {
                attempts += 1;
                async { Err::<i32, _>(TestError { kind: "429" }) }
            },
            |_| ErrorClass::RateLimited,
        )
        .await;

        let err = result.unwrap_err();
        assert_eq!(attempts, 4);
        assert_eq!(err.attempts, 4);
        assert!(err.to_string().contains("Wallet Transactions"));
        assert!(err.to_string().contains("after 4 attempts"));
    }
}
