//! Core units, constants, and shared primitives for the planetary defense workspace.

/// Physical and mission constants expressed in SI units (unless stated otherwise).
pub mod constants {
    /// Standard gravity at Earth's surface (m/s²).
    pub const G0: f64 = 9.80665;
    /// Seconds per day.
    pub const SECONDS_PER_DAY: f64 = 86_400.0;
    /// Seconds per hour.
    pub const SECONDS_PER_HOUR: f64 = 3_600.0;
    /// Intercept must complete this many days before impact.
    pub const TIMELINE_MARGIN_DAYS: f64 = 7.0;
    /// Mission budget without a characterization probe (billions).
    pub const BASE_BUDGET_B: f64 = 2.00;
    /// Mission budget after paying for a characterization probe (billions).
    pub const PROBE_BUDGET_B: f64 = 1.80;
    /// Simulated days consumed by the characterization probe.
    pub const PROBE_TIME_COST_DAYS: i64 = 30;
}

/// Basic unit conversion helpers.
pub mod units {
    /// Convert kilograms to metric tonnes.
    #[inline]
    pub fn kg_to_tonnes(v: f64) -> f64 {
        v / 1_000.0
    }

    /// Convert a 0–1 fraction to a percentage.
    #[inline]
    pub fn fraction_to_percent(v: f64) -> f64 {
        v * 100.0
    }
}

/// Lightweight time utilities shared across crates.
pub mod time {
    use super::constants::{SECONDS_PER_DAY, SECONDS_PER_HOUR};

    /// Convert days to seconds.
    #[inline]
    pub fn days_to_seconds(days: f64) -> f64 {
        days * SECONDS_PER_DAY
    }

    /// Convert seconds to days.
    #[inline]
    pub fn seconds_to_days(seconds: f64) -> f64 {
        seconds / SECONDS_PER_DAY
    }

    /// Split a non-negative duration into whole days, hours, minutes and seconds.
    ///
    /// Negative inputs are treated as zero.
    pub fn split_duration(seconds: f64) -> (u64, u64, u64, u64) {
        let total = seconds.max(0.0);
        let days = (total / SECONDS_PER_DAY).floor();
        let hours = ((total % SECONDS_PER_DAY) / SECONDS_PER_HOUR).floor();
        let minutes = ((total % SECONDS_PER_HOUR) / 60.0).floor();
        let secs = (total % 60.0).floor();
        (days as u64, hours as u64, minutes as u64, secs as u64)
    }

    /// Format a countdown as `DD:HH:MM:SS` with zero padding.
    pub fn format_countdown(seconds: f64) -> String {
        let (d, h, m, s) = split_duration(seconds);
        format!("{d:02}:{h:02}:{m:02}:{s:02}")
    }
}
