//! In-memory rate limiting for logins and message sends.
//!
//! DESIGN
//! ======
//! Sliding-window counters backed by `HashMap<String, VecDeque<Instant>>`.
//! Keys are caller-chosen (a lowercased username for login attempts, a
//! user id for message sends). One limiter instance per concern.
//!
//! TRADE-OFFS
//! ==========
//! State is per-process and lost on restart. Idle keys are dropped once
//! their window empties so the map does not grow without bound.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::config::WindowLimit;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("rate limit exceeded (max {limit} requests/{window_secs}s)")]
pub struct RateLimitError {
    pub limit: usize,
    pub window_secs: u64,
}

#[derive(Clone)]
pub struct RateLimiter {
    inner: Arc<Mutex<HashMap<String, VecDeque<Instant>>>>,
    config: WindowLimit,
}

impl RateLimiter {
    #[must_use]
    pub fn new(config: WindowLimit) -> Self {
        Self { inner: Arc::new(Mutex::new(HashMap::new())), config }
    }

    /// Check the limit for `key`, then record the request.
    ///
    /// # Errors
    ///
    /// Returns `RateLimitError` if `key` already used its window.
    pub fn check_and_record(&self, key: &str) -> Result<(), RateLimitError> {
        self.check_and_record_at(key, Instant::now())
    }

    fn check_and_record_at(&self, key: &str, now: Instant) -> Result<(), RateLimitError> {
        let mut inner = self
            .inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let cfg = self.config;

        let deque = inner.entry(key.to_owned()).or_default();
        prune_window(deque, now, cfg.window);
        if deque.len() >= cfg.limit {
            return Err(RateLimitError { limit: cfg.limit, window_secs: cfg.window.as_secs() });
        }
        deque.push_back(now);
        Ok(())
    }

    /// Forget all history for `key` (e.g. after a successful login).
    pub fn reset(&self, key: &str) {
        self.inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .remove(key);
    }

    /// Drop keys whose windows have fully expired.
    pub fn prune_idle(&self) {
        self.prune_idle_at(Instant::now());
    }

    fn prune_idle_at(&self, now: Instant) {
        let window = self.config.window;
        let mut inner = self
            .inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        inner.retain(|_, deque| {
            prune_window(deque, now, window);
            !deque.is_empty()
        });
    }

    #[cfg(test)]
    fn tracked_keys(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }
}

fn prune_window(deque: &mut VecDeque<Instant>, now: Instant, window: Duration) {
    while let Some(&front) = deque.front() {
        if now.duration_since(front) >= window {
            deque.pop_front();
        } else {
            break;
        }
    }
}

#[cfg(test)]
#[path = "rate_limit_test.rs"]
mod tests;
