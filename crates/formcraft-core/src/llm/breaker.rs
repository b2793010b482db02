//! Process-wide circuit breaker for the outbound generative call.
//!
//! The state is a consecutive-failure counter and the time of the last
//! failure, both held in atomics so one breaker can be shared by reference
//! across concurrently handled requests. There is no explicit half-open
//! state: once the cool-down has elapsed, the next `is_open` check zeroes the
//! counter and the following call is simply attempted.
//!
//! Concurrent callers may race around the threshold and let one extra
//! attempt through. That is tolerated.

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::time::{Duration, Instant};

use formcraft_types::config::BreakerConfig;
use formcraft_types::llm::{BreakerState, BreakerStatus};

/// Failure-count circuit breaker.
#[derive(Debug)]
pub struct CircuitBreaker {
    failure_threshold: u32,
    cooldown: Duration,
    failures: AtomicU32,
    /// Milliseconds since `epoch` of the last failure, plus one. Zero means
    /// no failure has been recorded.
    last_failure: AtomicU64,
    epoch: Instant,
}

impl CircuitBreaker {
    pub fn new(failure_threshold: u32, cooldown: Duration) -> Self {
        Self {
            failure_threshold: failure_threshold.max(1),
            cooldown,
            failures: AtomicU32::new(0),
            last_failure: AtomicU64::new(0),
            epoch: Instant::now(),
        }
    }

    pub fn from_config(config: &BreakerConfig) -> Self {
        Self::new(
            config.failure_threshold,
            Duration::from_secs(config.cooldown_secs),
        )
    }

    /// Whether calls must be refused right now.
    ///
    /// Resets the failure counter when the breaker is over the threshold but
    /// the cool-down window has elapsed since the last failure.
    pub fn is_open(&self) -> bool {
        let failures = self.failures.load(Ordering::Acquire);
        if failures < self.failure_threshold {
            return false;
        }

        match self.since_last_failure() {
            Some(elapsed) if elapsed < self.cooldown => true,
            _ => {
                // A failure recorded concurrently keeps its increment.
                let _ = self.failures.compare_exchange(
                    failures,
                    0,
                    Ordering::AcqRel,
                    Ordering::Acquire,
                );
                tracing::info!(
                    cooldown_secs = self.cooldown.as_secs(),
                    "circuit breaker cool-down elapsed, closing"
                );
                false
            }
        }
    }

    /// Count one failed attempt.
    pub fn record_failure(&self) {
        let stamp = self.now_millis().saturating_add(1);
        self.last_failure.store(stamp, Ordering::Release);
        let failures = self.failures.fetch_add(1, Ordering::AcqRel) + 1;
        if failures == self.failure_threshold {
            tracing::warn!(
                failures,
                cooldown_secs = self.cooldown.as_secs(),
                "circuit breaker opened"
            );
        }
    }

    /// Reset the failure counter after a successful call.
    pub fn record_success(&self) {
        self.failures.store(0, Ordering::Release);
    }

    pub fn failure_count(&self) -> u32 {
        self.failures.load(Ordering::Acquire)
    }

    pub fn failure_threshold(&self) -> u32 {
        self.failure_threshold
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    /// Snapshot for health endpoints and CLI status output.
    ///
    /// Unlike [`is_open`](Self::is_open), this never mutates the counter.
    pub fn status(&self) -> BreakerStatus {
        let consecutive_failures = self.failure_count();
        let since = self.since_last_failure();
        let open = consecutive_failures >= self.failure_threshold
            && since.is_some_and(|elapsed| elapsed < self.cooldown);

        BreakerStatus {
            state: if open {
                BreakerState::Open
            } else {
                BreakerState::Closed
            },
            consecutive_failures,
            failure_threshold: self.failure_threshold,
            last_failure_secs_ago: since.map(|elapsed| elapsed.as_secs()),
        }
    }

    fn now_millis(&self) -> u64 {
        u64::try_from(self.epoch.elapsed().as_millis()).unwrap_or(u64::MAX - 1)
    }

    fn since_last_failure(&self) -> Option<Duration> {
        match self.last_failure.load(Ordering::Acquire) {
            0 => None,
            stamp => {
                let at = stamp - 1;
                Some(Duration::from_millis(self.now_millis().saturating_sub(at)))
            }
        }
    }
}

impl Default for CircuitBreaker {
    fn default() -> Self {
        Self::from_config(&BreakerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn test_default_thresholds() {
        let breaker = CircuitBreaker::default();
        assert_eq!(breaker.failure_threshold(), 3);
        assert_eq!(breaker.cooldown(), Duration::from_secs(60));
        assert!(!breaker.is_open());
        assert_eq!(breaker.status().state, BreakerState::Closed);
        assert!(breaker.status().last_failure_secs_ago.is_none());
    }

    #[test]
    fn test_opens_at_threshold() {
        let breaker = CircuitBreaker::new(3, Duration::from_secs(60));
        breaker.record_failure();
        breaker.record_failure();
        assert!(!breaker.is_open());

        breaker.record_failure();
        assert!(breaker.is_open());
        assert_eq!(breaker.status().state, BreakerState::Open);
        assert_eq!(breaker.status().consecutive_failures, 3);
    }

    #[test]
    fn test_success_resets_counter() {
        let breaker = CircuitBreaker::new(3, Duration::from_secs(60));
        breaker.record_failure();
        breaker.record_failure();
        breaker.record_success();
        assert_eq!(breaker.failure_count(), 0);
        breaker.record_failure();
        assert!(!breaker.is_open());
    }

    #[test]
    fn test_resets_after_cooldown() {
        let breaker = CircuitBreaker::new(2, Duration::from_millis(40));
        breaker.record_failure();
        breaker.record_failure();
        assert!(breaker.is_open());

        std::thread::sleep(Duration::from_millis(60));
        assert_eq!(breaker.status().state, BreakerState::Closed);
        assert!(!breaker.is_open());
        assert_eq!(breaker.failure_count(), 0);
    }

    #[test]
    fn test_status_does_not_reset() {
        let breaker = CircuitBreaker::new(1, Duration::from_millis(10));
        breaker.record_failure();
        std::thread::sleep(Duration::from_millis(20));
        let _ = breaker.status();
        assert_eq!(breaker.failure_count(), 1);
    }

    #[test]
    fn test_shared_across_threads() {
        let breaker = Arc::new(CircuitBreaker::new(8, Duration::from_secs(60)));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let breaker = Arc::clone(&breaker);
                std::thread::spawn(move || breaker.record_failure())
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(breaker.failure_count(), 8);
        assert!(breaker.is_open());
    }
}
