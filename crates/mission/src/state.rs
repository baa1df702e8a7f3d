//! Mission phases and the per-run mission state.

use std::fmt;

use chrono::{DateTime, Utc};
use defense_core::constants::{BASE_BUDGET_B, PROBE_BUDGET_B};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    Drift,
    Observation,
    Decision,
    Design,
    Launched,
    Done,
}

impl Phase {
    /// True once the run can no longer change course.
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Launched | Phase::Done)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Drift => "DRIFT",
            Phase::Observation => "OBSERVATION",
            Phase::Decision => "DECISION",
            Phase::Design => "DESIGN",
            Phase::Launched => "LAUNCHED",
            Phase::Done => "DONE",
        };
        f.write_str(name)
    }
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MissionOutcome {
    /// Whether a mitigation mission was launched before impact.
    pub mitigation_launched: bool,
    pub ended_at: DateTime<Utc>,
}

/// Budget available for the mitigation mission after the probe decision.
pub fn starting_budget_for(probe_launched: bool) -> f64 {
    if probe_launched {
        PROBE_BUDGET_B
    } else {
        BASE_BUDGET_B
    }
}

/// State of one scenario run. Only the phase controller mutates it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissionState {
    pub phase: Phase,
    /// Billions available for equipment.
    pub starting_budget_b: f64,
    pub probe_launched: Option<bool>,
    /// Set once impact is confirmed by observation.
    pub impact_time: Option<DateTime<Utc>>,
    /// Latest simulated instant seen by the core.
    pub current_time: DateTime<Utc>,
    pub observation_count: u8,
    pub outcome: Option<MissionOutcome>,
}

impl MissionState {
    /// Pre-scenario state.
    pub fn drift(now: DateTime<Utc>) -> Self {
        Self {
            phase: Phase::Drift,
            starting_budget_b: BASE_BUDGET_B,
            probe_launched: None,
            impact_time: None,
            current_time: now,
            observation_count: 0,
            outcome: None,
        }
    }

    pub fn decision_committed(&self) -> bool {
        self.probe_launched.is_some()
    }

    /// Seconds left until impact at the current simulated time.
    pub fn remaining_seconds_to_impact(&self) -> Option<f64> {
        self.impact_time
            .map(|impact| (impact - self.current_time).num_milliseconds() as f64 / 1000.0)
    }
}
