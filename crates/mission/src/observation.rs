//! Staged observation milestones shown while the threat orbit is refined.

use serde::Serialize;

/// Number of observations needed to confirm the impact.
pub const OBSERVATIONS_TO_CONFIRM: u8 = 3;

/// Output of one observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ObservationReport {
    pub count: u8,
    pub probability_percent: f64,
    pub status: &'static str,
    pub impact_confirmed: bool,
}

impl ObservationReport {
    /// Probability formatted the way the dashboard shows it, e.g. `87.5%`.
    pub fn probability_label(&self) -> String {
        format!("{:.1}%", self.probability_percent)
    }
}

/// Milestone for the `count`-th observation (1-based). Counts past the last milestone
/// repeat the confirmation.
pub fn milestone(count: u8) -> ObservationReport {
    let (probability_percent, status) = match count {
        0 | 1 => (35.0, "Orbit being refined..."),
        2 => (87.5, "Impact corridor narrowing..."),
        _ => (100.0, "IMPACT CONFIRMED."),
    };
    ObservationReport {
        count,
        probability_percent,
        status,
        impact_confirmed: count >= OBSERVATIONS_TO_CONFIRM,
    }
}
