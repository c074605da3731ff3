//! Fixed-window request counting keyed by client identity.
//!
//! The counting service sits behind [`RateCounter`] so a deployment with
//! multiple instances can swap in a shared store; the in-process
//! [`InMemoryRateCounter`] covers the single-instance case. The contract is
//! the same either way: at most `budget` requests per `window` per key.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

/// A request budget over a fixed window. Each policy counts independently,
/// so the same client key can be tracked by several policies at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatePolicy {
    pub name: &'static str,
    pub window: Duration,
    pub budget: u32,
}

/// Outcome of registering one request against a policy.
#[derive(Debug, Clone, Copy)]
pub struct RateDecision {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    /// Time until the current window resets and the budget is restored.
    pub reset_after: Duration,
}

/// Counting service consulted before any handler logic runs.
pub trait RateCounter: Send + Sync {
    /// Register a request for `key` under `policy` and decide whether it is
    /// within budget. Counting must be increment-and-compare under a single
    /// lock; a read-then-write sequence would undercount concurrent requests.
    fn hit(&self, key: &str, policy: RatePolicy) -> RateDecision;
}

#[derive(Debug)]
struct Window {
    started: Instant,
    length: Duration,
    count: u32,
}

/// Process-local fixed-window counter. Counters are ephemeral: nothing is
/// persisted across restarts and nothing is shared across processes.
#[derive(Debug, Default)]
pub struct InMemoryRateCounter {
    windows: Mutex<HashMap<String, Window>>,
}

/// Above this many tracked windows, expired entries are dropped on the next
/// hit to bound memory on long-running processes.
const PURGE_THRESHOLD: usize = 4096;

impl InMemoryRateCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a hit at an explicit instant. Exposed so tests can cross
    /// window boundaries deterministically.
    pub fn hit_at(&self, key: &str, policy: RatePolicy, now: Instant) -> RateDecision {
        let mut windows = self
            .windows
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if windows.len() >= PURGE_THRESHOLD {
            windows.retain(|_, w| now.duration_since(w.started) < w.length);
        }

        let full_key = format!("{}:{}", policy.name, key);
        let window = windows
            .entry(full_key)
            .and_modify(|w| {
                if now.duration_since(w.started) >= w.length {
                    w.started = now;
                    w.count = 0;
                }
            })
            .or_insert(Window {
                started: now,
                length: policy.window,
                count: 0,
            });
        window.count += 1;

        let elapsed = now.duration_since(window.started);
        RateDecision {
            allowed: window.count <= policy.budget,
            limit: policy.budget,
            remaining: policy.budget.saturating_sub(window.count),
            reset_after: policy.window.saturating_sub(elapsed),
        }
    }
}

impl RateCounter for InMemoryRateCounter {
    fn hit(&self, key: &str, policy: RatePolicy) -> RateDecision {
        self.hit_at(key, policy, Instant::now())
    }
}
