//! Mission events emitted by the controller for the adapter to render and log.

use chrono::{DateTime, Utc};
use defense_feasibility::BlockingReason;
use serde::Serialize;

use crate::state::Phase;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum MissionEvent {
    ScenarioStarted {
        start_time: DateTime<Utc>,
        impact_time: DateTime<Utc>,
    },
    PhaseChanged {
        from: Phase,
        to: Phase,
    },
    ObservationLogged {
        count: u8,
        probability_percent: f64,
        status: String,
    },
    DecisionCommitted {
        request_id: u64,
        launch_probe: bool,
        starting_budget_b: f64,
    },
    ClockAdvanced {
        days: i64,
        now: DateTime<Utc>,
    },
    AuditConfirmed {
        request_id: u64,
        detail: Option<String>,
    },
    FeasibilityChanged {
        can_launch: bool,
        blocking_reason: Option<BlockingReason>,
    },
    Launched {
        at: DateTime<Utc>,
    },
    Impact {
        at: DateTime<Utc>,
        mitigation_launched: bool,
    },
    /// Non-blocking notice for the operator (failed audit, unreachable backend).
    Notice {
        message: String,
    },
}
