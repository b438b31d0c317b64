//! [libs/core/rate-limiter/src/lib.rs]
//! APARATO: SLIDING WINDOW RATE LIMITER
//! CLASIFICACIÓN: CORE INFRASTRUCTURE (ESTRATO L1)
//! RESPONSABILIDAD: PRESUPUESTO DE SOLICITUDES BAJO UN ÚNICO CRÉDITO UPSTREAM
//!
//! Enforces two constraints on behalf of every outbound upstream call: no
//! more than R requests inside any W-duration sliding window, and at least
//! M between any two consecutive admitted requests. `acquire()` blocks the
//! caller (cooperatively, via `tokio::time::sleep`) until both hold, then
//! records the event. Safe for concurrent callers — internal state is
//! serialized behind a single async mutex, matching the short-critical-
//! section discipline the probabilistic shard locks use.

use std::collections::VecDeque;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, trace};

/// Extra buffer added atop the oldest in-window event's expiry to avoid a
/// thundering-herd retry the instant the window technically reopens.
const WAKE_BUFFER: Duration = Duration::from_millis(100);

#[derive(Debug, Error)]
pub enum RateLimiterError {
    #[error("acquire cancelled before a slot became available")]
    Cancelled,
}

#[derive(Debug, Clone, Copy)]
pub struct RateLimiterConfig {
    /// Maximum admitted requests within `window`.
    pub max_requests: usize,
    /// Sliding window duration.
    pub window: Duration,
    /// Minimum gap enforced between any two consecutive admitted requests.
    pub min_gap: Duration,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self {
            max_requests: 90,
            window: Duration::from_secs(120),
            min_gap: Duration::from_millis(50),
        }
    }
}

/// Pure decision function: given the current in-window event log and the
/// current instant, returns `None` if a request may be admitted right now,
/// or `Some(sleep_duration)` the caller must wait before retrying. Kept
/// free of async/mutex concerns so it can be exercised directly by
/// property tests.
fn next_wait(events: &VecDeque<Instant>, now: Instant, config: &RateLimiterConfig) -> Option<Duration> {
    let window_start = now.checked_sub(config.window).unwrap_or(now);
    let in_window = events.iter().filter(|&&t| t >= window_start).count();

    let gap_wait = events.back().and_then(|&last| {
        let earliest_next = last + config.min_gap;
        (earliest_next > now).then(|| earliest_next - now)
    });

    let window_wait = if in_window >= config.max_requests {
        events
            .iter()
            .find(|&&t| t >= window_start)
            .map(|&oldest_in_window| (oldest_in_window + config.window + WAKE_BUFFER).saturating_duration_since(now))
    } else {
        None
    };

    match (gap_wait, window_wait) {
        (None, None) => None,
        (Some(g), None) => Some(g),
        (None, Some(w)) => Some(w),
        (Some(g), Some(w)) => Some(g.max(w)),
    }
}

/// Sliding-window rate limiter for a single upstream credential. All
/// workers sharing that credential must acquire through the same instance.
pub struct RateLimiter {
    config: RateLimiterConfig,
    events: Mutex<VecDeque<Instant>>,
}

impl RateLimiter {
    pub fn new(config: RateLimiterConfig) -> Self {
        Self { config, events: Mutex::new(VecDeque::new()) }
    }

    /// Blocks until both constraints are satisfied, then records the
    /// current timestamp as a request event. Returns promptly without
    /// recording an event if `cancel` fires while waiting.
    #[instrument(skip(self, cancel))]
    pub async fn acquire(&self, cancel: &CancellationToken) -> Result<(), RateLimiterError> {
        loop {
            let wait = {
                let mut events = self.events.lock().await;
                let now = Instant::now();
                let window_start = now.checked_sub(self.config.window).unwrap_or(now);
                while let Some(&front) = events.front() {
                    if front < window_start {
                        events.pop_front();
                    } else {
                        break;
                    }
                }

                match next_wait(&events, now, &self.config) {
                    None => {
                        events.push_back(now);
                        trace!("rate limiter admitted request, {} in window", events.len());
                        return Ok(());
                    }
                    Some(duration) => duration,
                }
            };

            debug!(?wait, "rate limiter blocking caller");
            tokio::select! {
                _ = tokio::time::sleep(wait) => continue,
                _ = cancel.cancelled() => return Err(RateLimiterError::Cancelled),
            }
        }
    }
}
