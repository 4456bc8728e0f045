//! The resilience governor: circuit breaker + retry + bulkhead around upstream rate queries.
//!
//! The original annotations-on-methods approach becomes one state-driven executor: [`Resilience::execute`]
//! runs a call under the named operation family's breaker, retry policy and permit pool, and reports failure
//! through [`GovernorError`] so the caller can substitute its cache-backed fallback. All tunables live in
//! [`ResilienceConfig`]; all state lives in this explicitly owned registry, shared by `Arc` — there are no
//! ambient statics.
mod breaker;

use std::{future::Future, sync::Arc, time::Duration};

use breaker::Breaker;
use dashmap::DashMap;
use log::*;
use thiserror::Error;
use tokio::sync::Semaphore;

use crate::traits::SourceError;

pub use breaker::CircuitState;

/// Operation family for exact-date rate lookups.
pub const FAMILY_RATE_FOR_DATE: &str = "rate_for_date";
/// Operation family for the available-currencies listing.
pub const FAMILY_AVAILABLE_CURRENCIES: &str = "available_currencies";
/// Operation family for most-recent-rate-in-range queries.
pub const FAMILY_RECENT_IN_RANGE: &str = "recent_in_range";

#[derive(Debug, Clone, Error)]
pub enum GovernorError {
    #[error("Circuit breaker for '{0}' is open")]
    CircuitOpen(&'static str),
    #[error("Concurrent-call limit for '{0}' reached")]
    BulkheadFull(&'static str),
    #[error(transparent)]
    Source(#[from] SourceError),
}

#[derive(Debug, Clone)]
pub struct ResilienceConfig {
    /// Rolling outcome window per operation family.
    pub window_size: usize,
    /// Share of failures in a full window that opens the circuit.
    pub failure_ratio: f64,
    /// How long an open circuit refuses calls before admitting a half-open trial.
    pub cool_down: Duration,
    /// Total attempts per governed call, first try included.
    pub max_attempts: u32,
    /// Delay before the first retry; doubles for each retry after that.
    pub backoff_base: Duration,
    /// Bulkhead permits per operation family. Callers that cannot get one immediately are rejected, not queued.
    pub max_concurrent_calls: usize,
}

impl Default for ResilienceConfig {
    fn default() -> Self {
        Self {
            window_size: 10,
            failure_ratio: 0.5,
            cool_down: Duration::from_secs(30),
            max_attempts: 3,
            backoff_base: Duration::from_millis(100),
            max_concurrent_calls: 10,
        }
    }
}

struct Family {
    breaker: Breaker,
    permits: Semaphore,
}

/// Per-operation-family registry of breaker state and bulkhead permits.
pub struct Resilience {
    config: ResilienceConfig,
    families: DashMap<&'static str, Arc<Family>>,
}

impl Resilience {
    pub fn new(config: ResilienceConfig) -> Self {
        Self { config, families: DashMap::new() }
    }

    pub fn with_defaults() -> Self {
        Self::new(ResilienceConfig::default())
    }

    /// Current breaker state for an operation family. Families spring into existence closed.
    pub fn circuit_state(&self, name: &'static str) -> CircuitState {
        self.family(name).breaker.state()
    }

    fn family(&self, name: &'static str) -> Arc<Family> {
        self.families
            .entry(name)
            .or_insert_with(|| {
                let breaker =
                    Breaker::new(name, self.config.window_size, self.config.failure_ratio, self.config.cool_down);
                Arc::new(Family { breaker, permits: Semaphore::new(self.config.max_concurrent_calls) })
            })
            .clone()
    }

    /// Run `call` under the named family's circuit breaker, retry policy and bulkhead.
    ///
    /// An error return means the governed call has conclusively failed for this request — the circuit was open,
    /// no bulkhead permit was free, or every attempt failed — and the caller should fall back. The breaker
    /// window records one outcome per governed call (bulkhead rejections included), not one per attempt.
    pub async fn execute<T, C, F>(&self, name: &'static str, mut call: C) -> Result<T, GovernorError>
    where
        C: FnMut() -> F,
        F: Future<Output = Result<T, SourceError>>,
    {
        let family = self.family(name);
        if !family.breaker.try_admit() {
            debug!("Circuit '{name}' is open. Short-circuiting without touching the network");
            return Err(GovernorError::CircuitOpen(name));
        }
        let permit = match family.permits.try_acquire() {
            Ok(permit) => permit,
            Err(_) => {
                warn!("No free bulkhead permit for '{name}'. Rejecting the call");
                family.breaker.record(false);
                return Err(GovernorError::BulkheadFull(name));
            },
        };
        let result = self.call_with_retry(name, &mut call).await;
        drop(permit);
        family.breaker.record(result.is_ok());
        result.map_err(GovernorError::from)
    }

    async fn call_with_retry<T, C, F>(&self, name: &str, call: &mut C) -> Result<T, SourceError>
    where
        C: FnMut() -> F,
        F: Future<Output = Result<T, SourceError>>,
    {
        let mut delay = self.config.backoff_base;
        let mut attempt = 1u32;
        loop {
            match call().await {
                Ok(value) => {
                    if attempt > 1 {
                        info!("'{name}' succeeded on attempt {attempt}");
                    }
                    return Ok(value);
                },
                Err(e) if attempt >= self.config.max_attempts => {
                    warn!("'{name}' failed after {attempt} attempts: {e}");
                    return Err(e);
                },
                Err(e) => {
                    debug!("'{name}' attempt {attempt} failed: {e}. Retrying in {delay:?}");
                    tokio::time::sleep(delay).await;
                    delay = delay.saturating_mul(2);
                    attempt += 1;
                },
            }
        }
    }
}

#[cfg(test)]
mod test {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn quick_config() -> ResilienceConfig {
        // a cool-down far longer than any test body, so an opened circuit stays open unless a test
        // opts into recovery with its own config
        ResilienceConfig {
            window_size: 4,
            cool_down: Duration::from_secs(60),
            backoff_base: Duration::from_millis(1),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn retries_up_to_the_attempt_budget() {
        let governor = Resilience::new(quick_config());
        let calls = AtomicUsize::new(0);
        let result: Result<(), GovernorError> = governor
            .execute("op", || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(SourceError::Network("boom".to_string())) }
            })
            .await;
        assert!(matches!(result, Err(GovernorError::Source(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn a_transient_failure_recovers_within_the_budget() {
        let governor = Resilience::new(quick_config());
        let calls = AtomicUsize::new(0);
        let result = governor
            .execute("op", || {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n == 0 {
                        Err(SourceError::Network("hiccup".to_string()))
                    } else {
                        Ok(42)
                    }
                }
            })
            .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn the_circuit_opens_and_short_circuits() {
        let governor = Resilience::new(quick_config());
        let calls = AtomicUsize::new(0);
        // window_size 4, each governed call records one failure
        for _ in 0..4 {
            let _ = governor
                .execute("op", || {
                    calls.fetch_add(1, Ordering::SeqCst);
                    async { Err::<(), _>(SourceError::Network("down".to_string())) }
                })
                .await;
        }
        assert_eq!(governor.circuit_state("op"), CircuitState::Open);
        let before = calls.load(Ordering::SeqCst);
        let result: Result<(), GovernorError> = governor
            .execute("op", || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok(()) }
            })
            .await;
        assert!(matches!(result, Err(GovernorError::CircuitOpen(_))));
        assert_eq!(calls.load(Ordering::SeqCst), before);
    }

    #[tokio::test]
    async fn a_successful_trial_closes_the_circuit_again() {
        let config = ResilienceConfig { cool_down: Duration::from_millis(100), ..quick_config() };
        let governor = Resilience::new(config);
        for _ in 0..4 {
            let _ = governor
                .execute("op", || async { Err::<(), _>(SourceError::Network("down".to_string())) })
                .await;
        }
        assert_eq!(governor.circuit_state("op"), CircuitState::Open);
        tokio::time::sleep(Duration::from_millis(150)).await;
        let result = governor.execute("op", || async { Ok(7) }).await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(governor.circuit_state("op"), CircuitState::Closed);
    }

    #[tokio::test]
    async fn bulkhead_rejections_are_immediate() {
        let config = ResilienceConfig { max_concurrent_calls: 1, ..quick_config() };
        let governor = Arc::new(Resilience::new(config));
        let gate = Arc::new(tokio::sync::Notify::new());

        let slow = {
            let governor = governor.clone();
            let gate = gate.clone();
            async move {
                governor
                    .execute("op", || {
                        let gate = gate.clone();
                        async move {
                            gate.notified().await;
                            Ok(1)
                        }
                    })
                    .await
            }
        };
        let slow = tokio::spawn(slow);
        // give the slow call time to take the only permit
        tokio::time::sleep(Duration::from_millis(50)).await;

        let rejected: Result<i32, GovernorError> = governor.execute("op", || async { Ok(2) }).await;
        assert!(matches!(rejected, Err(GovernorError::BulkheadFull(_))));

        gate.notify_one();
        let outcome = slow.await.unwrap();
        assert_eq!(outcome.unwrap(), 1);
    }

    #[tokio::test]
    async fn families_are_isolated() {
        let governor = Resilience::new(quick_config());
        for _ in 0..4 {
            let _ = governor
                .execute("flaky", || async { Err::<(), _>(SourceError::Network("down".to_string())) })
                .await;
        }
        assert_eq!(governor.circuit_state("flaky"), CircuitState::Open);
        assert_eq!(governor.circuit_state("healthy"), CircuitState::Closed);
        let result = governor.execute("healthy", || async { Ok("fine") }).await;
        assert_eq!(result.unwrap(), "fine");
    }
}
