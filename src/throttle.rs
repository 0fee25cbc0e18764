//! Global admission control for the model-completion capability.
//!
//! Counting windows are keyed by prefix and shared by every concurrent run in
//! the process. All bucket access goes through one mutex; the agent loop uses
//! [`RateLimiter::acquire`] (check and record under a single lock) so two runs
//! cannot both pass a last-slot check. The split `check`/`record` pair is kept
//! for callers that need the original two-step contract.
//!
//! Window math uses the tokio clock so backoff behaves under
//! `tokio::time::pause` in tests. In a multi-instance deployment the bucket
//! map would be replaced by a shared external counter; nothing outside this
//! module depends on where the counts live.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};
use std::time::Duration;

use tokio::time::{self, Instant};

/// Settings for one throttled capability.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Bucket key; buckets are shared across all callers using the same prefix.
    pub key_prefix: String,
    pub max_requests_in_window: u32,
    pub window_duration_ms: u64,
    /// Bounded backoff attempts in [`RateLimiter::retry`].
    pub max_retries: usize,
}

/// Outcome of a rate-limit check.
#[derive(Debug, Clone)]
pub struct RateLimitDecision {
    pub allowed: bool,
    /// Slots left in the current window (0 when not allowed).
    pub remaining: u32,
    /// Requests recorded in the current window.
    pub total_hits: u32,
    /// Time until the current window rolls over.
    pub reset_in: Duration,
    /// Wall-clock rollover time, for operator-facing messages.
    pub reset_time: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug)]
struct WindowState {
    window_start: Instant,
    current_count: u32,
}

/// Process-wide windowed rate limiter.
///
/// Buckets are created lazily on first check and reset lazily when a check or
/// record lands past the window end; there is no background timer.
#[derive(Debug, Default)]
pub struct RateLimiter {
    buckets: Mutex<HashMap<String, WindowState>>,
}

static GLOBAL: OnceLock<RateLimiter> = OnceLock::new();

impl RateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// The shared process-wide limiter.
    pub fn global() -> &'static RateLimiter {
        GLOBAL.get_or_init(RateLimiter::new)
    }

    /// The counters stay meaningful even if a holder panicked mid-update,
    /// so a poisoned lock is recovered rather than propagated.
    fn buckets(&self) -> MutexGuard<'_, HashMap<String, WindowState>> {
        self.buckets.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Evaluate the current window without consuming a slot.
    pub fn check(&self, config: &RateLimitConfig) -> RateLimitDecision {
        let mut buckets = self.buckets();
        let state = rolled_over(&mut buckets, config);
        decision_for(state, config)
    }

    /// Consume one slot in the current window.
    pub fn record(&self, config: &RateLimitConfig) {
        let mut buckets = self.buckets();
        let state = rolled_over(&mut buckets, config);
        state.current_count = state.current_count.saturating_add(1);
    }

    /// Check and record atomically under one lock acquisition.
    ///
    /// Returns the decision as of before recording; the slot is consumed only
    /// when allowed.
    pub fn acquire(&self, config: &RateLimitConfig) -> RateLimitDecision {
        let mut buckets = self.buckets();
        let state = rolled_over(&mut buckets, config);
        let decision = decision_for(state, config);
        if decision.allowed {
            state.current_count = state.current_count.saturating_add(1);
        }
        decision
    }

    /// Bounded backoff: sleep until the window resets and re-check, up to
    /// `max_retries` times. Returns `true` the moment a check succeeds.
    pub async fn retry(&self, config: &RateLimitConfig) -> bool {
        for attempt in 1..=config.max_retries {
            let wait = self.check(config).reset_in;
            tracing::debug!(
                key = %config.key_prefix,
                attempt,
                wait_ms = wait.as_millis() as u64,
                "rate limit backoff"
            );
            time::sleep(wait).await;
            if self.check(config).allowed {
                return true;
            }
        }
        false
    }

    /// Acquire a slot, backing off through window rollovers when the window
    /// is full. Returns `false` once retries are exhausted.
    pub async fn acquire_with_retry(&self, config: &RateLimitConfig) -> bool {
        if self.acquire(config).allowed {
            return true;
        }
        for _ in 1..=config.max_retries {
            let wait = self.check(config).reset_in;
            time::sleep(wait).await;
            if self.acquire(config).allowed {
                return true;
            }
        }
        false
    }
}

fn rolled_over<'a>(
    buckets: &'a mut HashMap<String, WindowState>,
    config: &RateLimitConfig,
) -> &'a mut WindowState {
    let now = Instant::now();
    let window = Duration::from_millis(config.window_duration_ms);
    let state = buckets
        .entry(config.key_prefix.clone())
        .or_insert_with(|| WindowState {
            window_start: now,
            current_count: 0,
        });
    if now.duration_since(state.window_start) >= window {
        state.window_start = now;
        state.current_count = 0;
    }
    state
}

fn decision_for(state: &WindowState, config: &RateLimitConfig) -> RateLimitDecision {
    let allowed = state.current_count < config.max_requests_in_window;
    let remaining = config
        .max_requests_in_window
        .saturating_sub(state.current_count);
    let window = Duration::from_millis(config.window_duration_ms);
    let elapsed = Instant::now().duration_since(state.window_start);
    let reset_in = window.saturating_sub(elapsed);
    RateLimitDecision {
        allowed,
        remaining,
        total_hits: state.current_count,
        reset_in,
        reset_time: chrono::Utc::now()
            + chrono::Duration::from_std(reset_in).unwrap_or_else(|_| chrono::Duration::zero()),
    }
}

/// Check the shared global limiter. Does not consume a slot.
pub fn check_rate_limit(config: &RateLimitConfig) -> RateLimitDecision {
    RateLimiter::global().check(config)
}

/// Record one request against the shared global limiter.
pub fn record_rate_limit(config: &RateLimitConfig) {
    RateLimiter::global().record(config)
}
