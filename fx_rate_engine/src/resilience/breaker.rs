use std::{
    collections::VecDeque,
    sync::Mutex,
    time::{Duration, Instant},
};

use log::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    Closed,
    Open,
    HalfOpen,
}

/// Failure-tracking state machine guarding one upstream operation family.
///
/// Keeps a rolling window of the most recent call outcomes. Once the window is full and the failure share
/// reaches the threshold, the breaker opens and callers are refused admission until the cool-down has elapsed.
/// The first caller after the cool-down is admitted as a half-open trial; its outcome decides whether the
/// breaker closes again or reopens for another cool-down.
pub(crate) struct Breaker {
    name: &'static str,
    window_size: usize,
    failure_ratio: f64,
    cool_down: Duration,
    inner: Mutex<BreakerInner>,
}

struct BreakerInner {
    state: CircuitState,
    // true = success, newest at the back
    window: VecDeque<bool>,
    opened_at: Option<Instant>,
    trial_in_flight: bool,
}

impl Breaker {
    pub fn new(name: &'static str, window_size: usize, failure_ratio: f64, cool_down: Duration) -> Self {
        let inner =
            BreakerInner { state: CircuitState::Closed, window: VecDeque::new(), opened_at: None, trial_in_flight: false };
        Self { name, window_size, failure_ratio, cool_down, inner: Mutex::new(inner) }
    }

    pub fn state(&self) -> CircuitState {
        self.inner.lock().expect("breaker lock poisoned").state
    }

    /// Decide whether a call may proceed. An `Open` breaker whose cool-down has elapsed flips to `HalfOpen`
    /// here and admits the caller as the single trial; everyone else is refused until the trial reports back.
    pub fn try_admit(&self) -> bool {
        let mut inner = self.inner.lock().expect("breaker lock poisoned");
        match inner.state {
            CircuitState::Closed => true,
            CircuitState::Open => {
                let cooled_down = inner.opened_at.map(|t| t.elapsed() >= self.cool_down).unwrap_or(true);
                if cooled_down {
                    info!("Circuit '{}' cool-down elapsed. Going half-open and admitting a trial call", self.name);
                    inner.state = CircuitState::HalfOpen;
                    inner.trial_in_flight = true;
                    true
                } else {
                    false
                }
            },
            CircuitState::HalfOpen => {
                if inner.trial_in_flight {
                    false
                } else {
                    inner.trial_in_flight = true;
                    true
                }
            },
        }
    }

    /// Record the outcome of an admitted call (or of a bulkhead rejection, which counts as a failure).
    pub fn record(&self, success: bool) {
        let mut inner = self.inner.lock().expect("breaker lock poisoned");
        match inner.state {
            CircuitState::Closed => {
                inner.window.push_back(success);
                while inner.window.len() > self.window_size {
                    inner.window.pop_front();
                }
                if inner.window.len() == self.window_size {
                    let failures = inner.window.iter().filter(|ok| !**ok).count();
                    if failures as f64 >= self.failure_ratio * self.window_size as f64 {
                        warn!(
                            "Circuit '{}' opened: {failures} failures in the last {} calls",
                            self.name, self.window_size
                        );
                        inner.state = CircuitState::Open;
                        inner.opened_at = Some(Instant::now());
                        inner.window.clear();
                    }
                }
            },
            CircuitState::HalfOpen => {
                inner.trial_in_flight = false;
                if success {
                    info!("Circuit '{}' trial call succeeded. Closing", self.name);
                    inner.state = CircuitState::Closed;
                    inner.window.clear();
                    inner.opened_at = None;
                } else {
                    warn!("Circuit '{}' trial call failed. Reopening", self.name);
                    inner.state = CircuitState::Open;
                    inner.opened_at = Some(Instant::now());
                }
            },
            // A late outcome from a call admitted before the breaker opened carries no new information.
            CircuitState::Open => {},
        }
    }
}
