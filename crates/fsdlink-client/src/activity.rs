//! Per-entity activity clock.
//!
//! Drives the Active → Inactive → TimedOut progression from wall-clock
//! time since the last telemetry. The `_at` variants take an explicit
//! [`Instant`] so the state machine is testable without sleeping; the
//! plain variants use `Instant::now()`.

use std::time::Instant;

use crate::config::ActivityConfig;

/// Outcome of one [`ActivityClock::refresh_at`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refresh {
    /// No state change since the previous refresh.
    Unchanged,
    /// The Active/Inactive boundary was crossed (in either direction).
    Crossed,
    /// The timeout threshold was reached. Terminal: the owner is
    /// expected to remove the entity.
    TimedOut,
}

/// Activity clock for one tracked entity.
#[derive(Debug, Clone)]
pub struct ActivityClock {
    config: ActivityConfig,
    last_wake: Instant,
    prev_inactive: bool,
}

impl ActivityClock {
    /// A freshly woken clock.
    pub fn new(config: ActivityConfig) -> Self {
        Self::new_at(config, Instant::now())
    }

    pub(crate) fn new_at(config: ActivityConfig, now: Instant) -> Self {
        Self {
            config,
            last_wake: now,
            prev_inactive: false,
        }
    }

    /// Record fresh telemetry: elapsed time drops back to zero.
    ///
    /// Deliberately leaves the recorded Inactive state alone — the next
    /// [`refresh_at`](Self::refresh_at) then reports the crossing back
    /// to Active exactly once.
    pub fn wake_up(&mut self) {
        self.wake_up_at(Instant::now());
    }

    pub(crate) fn wake_up_at(&mut self, now: Instant) {
        self.last_wake = now;
    }

    /// Whether the inactive threshold has elapsed without a wake-up.
    pub fn is_inactive(&self) -> bool {
        self.is_inactive_at(Instant::now())
    }

    pub(crate) fn is_inactive_at(&self, now: Instant) -> bool {
        now.duration_since(self.last_wake) >= self.config.inactive_after
    }

    /// Check the thresholds; called periodically by the registry sweep.
    pub fn refresh(&mut self) -> Refresh {
        self.refresh_at(Instant::now())
    }

    pub(crate) fn refresh_at(&mut self, now: Instant) -> Refresh {
        if now.duration_since(self.last_wake) >= self.config.timeout_after {
            return Refresh::TimedOut;
        }
        let inactive = self.is_inactive_at(now);
        if inactive != self.prev_inactive {
            self.prev_inactive = inactive;
            return Refresh::Crossed;
        }
        Refresh::Unchanged
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    #[test]
    fn progresses_active_inactive_timed_out() {
        let t0 = Instant::now();
        let mut clock = ActivityClock::new_at(ActivityConfig::default(), t0);

        assert_eq!(clock.refresh_at(t0 + secs(5)), Refresh::Unchanged);
        assert!(!clock.is_inactive_at(t0 + secs(5)));

        // Crossing into Inactive fires once, then settles.
        assert_eq!(clock.refresh_at(t0 + secs(15)), Refresh::Crossed);
        assert!(clock.is_inactive_at(t0 + secs(15)));
        assert_eq!(clock.refresh_at(t0 + secs(20)), Refresh::Unchanged);

        assert_eq!(clock.refresh_at(t0 + secs(61)), Refresh::TimedOut);
    }

    #[test]
    fn timed_out_is_terminal() {
        let t0 = Instant::now();
        let mut clock = ActivityClock::new_at(ActivityConfig::default(), t0);
        assert_eq!(clock.refresh_at(t0 + secs(60)), Refresh::TimedOut);
        // Never degrades to a mere boundary crossing afterwards.
        assert_eq!(clock.refresh_at(t0 + secs(90)), Refresh::TimedOut);
    }

    #[test]
    fn wake_up_while_inactive_crosses_back_once() {
        let t0 = Instant::now();
        let mut clock = ActivityClock::new_at(ActivityConfig::default(), t0);
        assert_eq!(clock.refresh_at(t0 + secs(15)), Refresh::Crossed);

        clock.wake_up_at(t0 + secs(16));
        assert!(!clock.is_inactive_at(t0 + secs(17)));
        // Exactly one crossing back to Active.
        assert_eq!(clock.refresh_at(t0 + secs(17)), Refresh::Crossed);
        assert_eq!(clock.refresh_at(t0 + secs(18)), Refresh::Unchanged);
    }

    #[test]
    fn boundary_values_are_inclusive() {
        let config = ActivityConfig {
            inactive_after: secs(10),
            timeout_after: secs(60),
        };
        let t0 = Instant::now();
        let mut clock = ActivityClock::new_at(config, t0);
        // Exactly at the inactive threshold counts as inactive.
        assert_eq!(clock.refresh_at(t0 + secs(10)), Refresh::Crossed);
        // Exactly at the timeout threshold counts as timed out.
        assert_eq!(clock.refresh_at(t0 + secs(60)), Refresh::TimedOut);
    }
}
