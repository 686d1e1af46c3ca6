//! Frame deferral while the terminal holds synchronized output (mode 2026).

use std::time::{Duration, Instant};

/// Defers frames while synchronized output is active, up to a timeout.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncOutputGate {
    timeout: Duration,
    started: Option<Instant>,
    /// Set by `cancel`; holds until the terminal leaves the mode
    bypass: bool,
}

impl SyncOutputGate {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            started: None,
            bypass: false,
        }
    }

    /// Whether the frame at `now` should be skipped.
    ///
    /// When the timeout elapses one frame is let through and the window
    /// restarts, so a terminal stuck in the mode still refreshes.
    pub fn should_defer(&mut self, active: bool, now: Instant) -> bool {
        if !active {
            self.started = None;
            self.bypass = false;
            return false;
        }
        if self.bypass {
            return false;
        }
        let started = *self.started.get_or_insert(now);
        if now.saturating_duration_since(started) >= self.timeout {
            log::debug!(
                "Synchronized output exceeded {}ms, rendering anyway",
                self.timeout.as_millis()
            );
            self.started = Some(now);
            return false;
        }
        true
    }

    /// Stop deferring until the current synchronized block ends.
    pub fn cancel(&mut self) {
        self.started = None;
        self.bypass = true;
    }

    pub fn is_pending(&self) -> bool {
        self.started.is_some()
    }
}
