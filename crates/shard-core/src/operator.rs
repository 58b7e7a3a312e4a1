//! Operator control state for the tick scheduler.
//!
//! Shared atomic state used by the tick scheduler task and the operator
//! HTTP surface. The operator can pause/resume the scheduler, adjust its
//! tick cadence, and trigger a clean shutdown -- all without restarting
//! the process.
//!
//! # Architecture
//!
//! All mutable control fields use [`std::sync::atomic`] types wrapped in
//! [`Arc`] so they can be shared between the scheduler task and the Axum
//! handler tasks without locks on the hot path.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Notify;

/// Shared operator control state.
///
/// This struct is wrapped in [`std::sync::Arc`] and shared between the
/// tick scheduler and operator HTTP handlers. Atomic fields are used for
/// lock-free reads on the scheduler's hot path.
#[derive(Debug)]
pub struct OperatorState {
    /// Whether the scheduler is currently paused.
    paused: AtomicBool,

    /// Notification used to wake the scheduler when resumed.
    resume_notify: Notify,

    /// Whether a clean stop has been requested.
    stop_requested: AtomicBool,

    /// Current tick interval in milliseconds (runtime-adjustable).
    tick_interval_ms: AtomicU64,

    /// Wall-clock time when the scheduler started.
    started_at: DateTime<Utc>,
}

/// Minimum tick interval the operator may set, in milliseconds.
const MIN_TICK_INTERVAL_MS: u64 = 100;

impl OperatorState {
    /// Create a new operator state with the given starting tick interval.
    #[must_use]
    pub fn new(tick_interval_ms: u64) -> Self {
        Self {
            paused: AtomicBool::new(false),
            resume_notify: Notify::new(),
            stop_requested: AtomicBool::new(false),
            tick_interval_ms: AtomicU64::new(tick_interval_ms),
            started_at: Utc::now(),
        }
    }

    // -----------------------------------------------------------------------
    // Pause / Resume
    // -----------------------------------------------------------------------

    /// Check whether the scheduler is paused.
    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Acquire)
    }

    /// Pause the scheduler. It will sleep until resumed.
    pub fn pause(&self) {
        self.paused.store(true, Ordering::Release);
    }

    /// Resume the scheduler and wake it if it was waiting.
    pub fn resume(&self) {
        self.paused.store(false, Ordering::Release);
        self.resume_notify.notify_one();
    }

    /// Wait until the scheduler is no longer paused.
    ///
    /// Returns immediately if not paused. Otherwise blocks until
    /// [`resume`](Self::resume) is called.
    pub async fn wait_if_paused(&self) {
        while self.paused.load(Ordering::Acquire) {
            self.resume_notify.notified().await;
        }
    }

    // -----------------------------------------------------------------------
    // Stop
    // -----------------------------------------------------------------------

    /// Request a clean scheduler stop.
    pub fn request_stop(&self) {
        self.stop_requested.store(true, Ordering::Release);
        // Wake a paused scheduler so it can observe the stop request.
        self.resume_notify.notify_one();
    }

    /// Check whether a stop has been requested.
    pub fn is_stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::Acquire)
    }

    // -----------------------------------------------------------------------
    // Tick Speed
    // -----------------------------------------------------------------------

    /// Get the current tick interval in milliseconds.
    pub fn tick_interval_ms(&self) -> u64 {
        self.tick_interval_ms.load(Ordering::Acquire)
    }

    /// Set the tick interval in milliseconds. Must be at least
    /// [`MIN_TICK_INTERVAL_MS`].
    ///
    /// Returns the previous interval on success, or `None` if the value
    /// was rejected.
    pub fn set_tick_interval_ms(&self, ms: u64) -> Option<u64> {
        if ms < MIN_TICK_INTERVAL_MS {
            return None;
        }
        let prev = self.tick_interval_ms.swap(ms, Ordering::AcqRel);
        Some(prev)
    }

    // -----------------------------------------------------------------------
    // Uptime
    // -----------------------------------------------------------------------

    /// Return the wall-clock start time.
    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Return elapsed seconds since the scheduler started.
    pub fn elapsed_seconds(&self) -> u64 {
        let elapsed = Utc::now().signed_duration_since(self.started_at).num_seconds();
        u64::try_from(elapsed.max(0)).unwrap_or(u64::MAX)
    }
}

/// JSON-serializable status of the scheduler for the operator surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShardStatus {
    /// Highest tick number reached across all instantiated zones.
    pub tick: u64,
    /// Whether the scheduler is paused.
    pub paused: bool,
    /// Whether a stop has been requested.
    pub stop_requested: bool,
    /// Current tick interval in milliseconds.
    pub tick_interval_ms: u64,
    /// Elapsed wall-clock seconds since start.
    pub elapsed_seconds: u64,
    /// Number of zones currently instantiated.
    pub zones_active: u64,
    /// ISO 8601 timestamp of when the scheduler started.
    pub started_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_state_is_not_paused() {
        let state = OperatorState::new(1000);
        assert!(!state.is_paused());
        assert!(!state.is_stop_requested());
    }

    #[test]
    fn pause_and_resume() {
        let state = OperatorState::new(1000);
        state.pause();
        assert!(state.is_paused());
        state.resume();
        assert!(!state.is_paused());
    }

    #[test]
    fn stop_request() {
        let state = OperatorState::new(1000);
        assert!(!state.is_stop_requested());
        state.request_stop();
        assert!(state.is_stop_requested());
    }

    #[test]
    fn set_tick_interval() {
        let state = OperatorState::new(1000);
        assert_eq!(state.tick_interval_ms(), 1000);
        let prev = state.set_tick_interval_ms(2000);
        assert_eq!(prev, Some(1000));
        assert_eq!(state.tick_interval_ms(), 2000);
    }

    #[test]
    fn reject_sub_min_interval() {
        let state = OperatorState::new(1000);
        let result = state.set_tick_interval_ms(50);
        assert!(result.is_none());
        assert_eq!(state.tick_interval_ms(), 1000);
    }

    #[tokio::test]
    async fn wait_if_paused_returns_immediately_when_not_paused() {
        let state = OperatorState::new(1000);
        tokio::time::timeout(std::time::Duration::from_millis(50), state.wait_if_paused())
            .await
            .expect("should not block");
    }

    #[tokio::test]
    async fn resume_wakes_a_waiting_scheduler() {
        let state = std::sync::Arc::new(OperatorState::new(1000));
        state.pause();
        let waiter = {
            let state = state.clone();
            tokio::spawn(async move {
                state.wait_if_paused().await;
            })
        };
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        state.resume();
        tokio::time::timeout(std::time::Duration::from_millis(200), waiter)
            .await
            .expect("resume should wake the waiter")
            .expect("task should not panic");
    }
}
