//! Impact countdown driven by an external, irregular clock.

use chrono::{DateTime, Utc};
use defense_core::time::format_countdown;

/// Display shown once the impact instant has been reached.
pub const IMPACT_DISPLAY: &str = "00:00:00:00";

/// Result of feeding one clock tick to the timer.
#[derive(Debug, Clone, PartialEq)]
pub enum TimerUpdate {
    /// Not armed, or already stopped after impact.
    Idle,
    Countdown {
        remaining_seconds: f64,
        display: String,
    },
    /// Emitted exactly once, on the first tick at or after the impact instant.
    Impact,
}

/// Countdown to an absolute impact instant.
///
/// Remaining time is always recomputed as `impact_time - now`; nothing is accumulated
/// between ticks, so uneven tick spacing cannot introduce drift.
#[derive(Debug, Clone, Default)]
pub struct TimerService {
    impact_time: Option<DateTime<Utc>>,
    impacted: bool,
    display: Option<String>,
}

impl TimerService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start counting down to `impact_time`, clearing any previous impact.
    pub fn arm(&mut self, impact_time: DateTime<Utc>) {
        self.impact_time = Some(impact_time);
        self.impacted = false;
        self.display = None;
    }

    pub fn disarm(&mut self) {
        *self = Self::default();
    }

    pub fn is_armed(&self) -> bool {
        self.impact_time.is_some()
    }

    pub fn has_impacted(&self) -> bool {
        self.impacted
    }

    pub fn impact_time(&self) -> Option<DateTime<Utc>> {
        self.impact_time
    }

    /// Last rendered countdown, if any tick has been processed since arming.
    pub fn display(&self) -> Option<&str> {
        self.display.as_deref()
    }

    /// Seconds between `now` and the impact instant (negative once passed).
    pub fn remaining_seconds(&self, now: DateTime<Utc>) -> Option<f64> {
        self.impact_time
            .map(|impact| (impact - now).num_milliseconds() as f64 / 1000.0)
    }

    pub fn tick(&mut self, now: DateTime<Utc>) -> TimerUpdate {
        if self.impacted {
            return TimerUpdate::Idle;
        }
        let Some(remaining_seconds) = self.remaining_seconds(now) else {
            return TimerUpdate::Idle;
        };
        if remaining_seconds <= 0.0 {
            self.impacted = true;
            self.display = Some(IMPACT_DISPLAY.to_string());
            return TimerUpdate::Impact;
        }
        let display = format_countdown(remaining_seconds);
        self.display = Some(display.clone());
        TimerUpdate::Countdown {
            remaining_seconds,
            display,
        }
    }
}
