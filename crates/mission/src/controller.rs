//! Phase state machine for one scenario run.
//!
//! Every operation runs to completion within the external event that triggered it.
//! Invalid events are rejected with a [`PhaseError`] and leave the state untouched.

use chrono::{DateTime, Duration, Utc};
use defense_backend::{AuditOutcome, AuditStatus, DecisionAuditClient, DecisionRecord};
use defense_catalog::{CatalogError, TrajectoryCatalog};
use defense_core::constants::PROBE_TIME_COST_DAYS;
use defense_feasibility::{BlockingReason, FeasibilityInput, FeasibilityResult, evaluate};
use thiserror::Error;

use crate::design::DesignSelection;
use crate::events::MissionEvent;
use crate::observation::{OBSERVATIONS_TO_CONFIRM, ObservationReport, milestone};
use crate::state::{MissionOutcome, MissionState, Phase, starting_budget_for};
use crate::timer::{TimerService, TimerUpdate};

/// Clock bounds of the precomputed threat trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScenarioAsset {
    pub start_time: DateTime<Utc>,
    pub impact_time: DateTime<Utc>,
}

impl ScenarioAsset {
    pub fn new(start_time: DateTime<Utc>, impact_time: DateTime<Utc>) -> Self {
        Self {
            start_time,
            impact_time,
        }
    }

    /// Asset whose impact lies `days` after `start_time`.
    ///
    /// Fails when `days` is not positive or the impact instant is not representable.
    pub fn from_days(start_time: DateTime<Utc>, days: f64) -> Result<Self, PhaseError> {
        let millis = (days * 86_400_000.0).round();
        if !(millis.is_finite() && millis > 0.0 && millis < i64::MAX as f64) {
            return Err(PhaseError::ImpactOutOfRange(days));
        }
        let impact_time = Duration::try_milliseconds(millis as i64)
            .and_then(|offset| start_time.checked_add_signed(offset))
            .ok_or(PhaseError::ImpactOutOfRange(days))?;
        Ok(Self::new(start_time, impact_time))
    }
}

/// What the adapter needs to know after the probe decision.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionReport {
    pub request_id: u64,
    pub starting_budget_b: f64,
    /// Days the external clock must be moved forward, if any.
    pub clock_jump_days: Option<i64>,
    pub current_time: DateTime<Utc>,
}

#[derive(Debug, Error, PartialEq)]
pub enum PhaseError {
    #[error("{operation} is not allowed in phase {phase}")]
    InvalidPhase {
        operation: &'static str,
        phase: Phase,
    },
    #[error("time to impact of {0} days is outside the supported range")]
    ImpactOutOfRange(f64),
    #[error("impact already confirmed; no further observations are possible")]
    ObservationsComplete,
    #[error("the probe decision has already been made")]
    DecisionAlreadyMade,
    #[error("make the probe decision before continuing")]
    DecisionPending,
    #[error("configure the mission design before launching")]
    DesignNotEvaluated,
    #[error("launch blocked: {0}")]
    LaunchBlocked(BlockingReason),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Owns the mission state of one run and gates every transition.
pub struct PhaseController {
    state: MissionState,
    asset: Option<ScenarioAsset>,
    timer: TimerService,
    trajectories: TrajectoryCatalog,
    audit: Box<dyn DecisionAuditClient>,
    selection: Option<DesignSelection>,
    last_result: Option<FeasibilityResult>,
    next_request_id: u64,
    pending_audit: Option<u64>,
    events: Vec<MissionEvent>,
}

impl PhaseController {
    pub fn new(
        trajectories: TrajectoryCatalog,
        audit: Box<dyn DecisionAuditClient>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            state: MissionState::drift(now),
            asset: None,
            timer: TimerService::new(),
            trajectories,
            audit,
            selection: None,
            last_result: None,
            next_request_id: 1,
            pending_audit: None,
            events: Vec::new(),
        }
    }

    pub fn state(&self) -> &MissionState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn trajectories(&self) -> &TrajectoryCatalog {
        &self.trajectories
    }

    pub fn selection(&self) -> Option<&DesignSelection> {
        self.selection.as_ref()
    }

    pub fn last_result(&self) -> Option<&FeasibilityResult> {
        self.last_result.as_ref()
    }

    /// Latest `DD:HH:MM:SS` countdown, once the timer is armed.
    pub fn countdown(&self) -> Option<&str> {
        self.timer.display()
    }

    /// Request id of the decision still awaiting its audit outcome.
    pub fn pending_audit(&self) -> Option<u64> {
        self.pending_audit
    }

    /// Events produced since the previous call.
    pub fn drain_events(&mut self) -> Vec<MissionEvent> {
        std::mem::take(&mut self.events)
    }

    /// Reset the run and begin observing the threat described by `asset`.
    pub fn start_scenario(&mut self, asset: ScenarioAsset) {
        self.state = MissionState::drift(asset.start_time);
        self.asset = Some(asset);
        self.timer.disarm();
        self.selection = None;
        self.last_result = None;
        self.pending_audit = None;
        tracing::info!(impact = %asset.impact_time, "scenario started");
        self.events.push(MissionEvent::ScenarioStarted {
            start_time: asset.start_time,
            impact_time: asset.impact_time,
        });
        self.set_phase(Phase::Observation);
    }

    pub fn observe(&mut self) -> Result<ObservationReport, PhaseError> {
        if self.state.phase == Phase::Decision
            && self.state.observation_count >= OBSERVATIONS_TO_CONFIRM
        {
            return Err(PhaseError::ObservationsComplete);
        }
        self.require(Phase::Observation, "observe")?;

        self.state.observation_count += 1;
        let report = milestone(self.state.observation_count);
        self.events.push(MissionEvent::ObservationLogged {
            count: report.count,
            probability_percent: report.probability_percent,
            status: report.status.to_string(),
        });

        if report.impact_confirmed {
            if let Some(asset) = self.asset {
                self.state.impact_time = Some(asset.impact_time);
                self.timer.arm(asset.impact_time);
            }
            self.set_phase(Phase::Decision);
            let update = self.timer.tick(self.state.current_time);
            self.apply_timer_update(&update);
        }
        Ok(report)
    }

    /// Commit the probe decision locally and hand it to the audit client.
    pub fn decide(&mut self, launch_probe: bool) -> Result<DecisionReport, PhaseError> {
        self.require(Phase::Decision, "decide")?;
        if self.state.decision_committed() {
            return Err(PhaseError::DecisionAlreadyMade);
        }

        let starting_budget_b = starting_budget_for(launch_probe);
        self.state.probe_launched = Some(launch_probe);
        self.state.starting_budget_b = starting_budget_b;

        let request_id = self.next_request_id;
        self.next_request_id += 1;
        self.pending_audit = Some(request_id);
        tracing::info!(request_id, launch_probe, starting_budget_b, "decision committed");
        self.events.push(MissionEvent::DecisionCommitted {
            request_id,
            launch_probe,
            starting_budget_b,
        });
        self.audit.submit(DecisionRecord {
            request_id,
            launch_probe,
            decided_at: self.state.current_time,
        });

        let clock_jump_days = if launch_probe {
            self.state.current_time += Duration::days(PROBE_TIME_COST_DAYS);
            self.events.push(MissionEvent::ClockAdvanced {
                days: PROBE_TIME_COST_DAYS,
                now: self.state.current_time,
            });
            let update = self.timer.tick(self.state.current_time);
            self.apply_timer_update(&update);
            Some(PROBE_TIME_COST_DAYS)
        } else {
            None
        };

        Ok(DecisionReport {
            request_id,
            starting_budget_b,
            clock_jump_days,
            current_time: self.state.current_time,
        })
    }

    /// Operator confirmation to move on to mission design.
    pub fn confirm_transition(&mut self) -> Result<(), PhaseError> {
        self.require(Phase::Decision, "confirm_transition")?;
        if !self.state.decision_committed() {
            return Err(PhaseError::DecisionPending);
        }
        self.set_phase(Phase::Design);
        Ok(())
    }

    /// Apply a new equipment selection and evaluate it against the live timeline.
    pub fn configure_design(
        &mut self,
        selection: DesignSelection,
    ) -> Result<FeasibilityResult, PhaseError> {
        self.require(Phase::Design, "configure_design")?;
        let selection = selection.clamped();
        if let Some(id) = selection.trajectory_id.as_deref() {
            self.trajectories.get(id)?;
        }
        let result = self.evaluate(&selection);
        self.selection = Some(selection);
        self.record_result(result.clone());
        Ok(result)
    }

    /// Launch the mitigation mission. Irreversible for this run.
    pub fn launch(&mut self) -> Result<(), PhaseError> {
        self.require(Phase::Design, "launch")?;
        let result = self
            .last_result
            .as_ref()
            .ok_or(PhaseError::DesignNotEvaluated)?;
        if let Some(reason) = result.blocking_reason {
            return Err(PhaseError::LaunchBlocked(reason));
        }
        self.set_phase(Phase::Launched);
        self.events.push(MissionEvent::Launched {
            at: self.state.current_time,
        });
        Ok(())
    }

    /// Apply an external clock tick.
    pub fn tick(&mut self, now: DateTime<Utc>) -> TimerUpdate {
        if self.state.phase == Phase::Done {
            return TimerUpdate::Idle;
        }
        self.state.current_time = now;
        let update = self.timer.tick(now);
        if self.state.phase == Phase::Design {
            if let Some(selection) = self.selection.clone() {
                let result = self.evaluate(&selection);
                self.record_result(result);
            }
        }
        self.apply_timer_update(&update);
        update
    }

    /// Apply the late-arriving result of an audit submission.
    ///
    /// A rejection becomes a notice; the committed decision stands.
    pub fn apply_audit_outcome(&mut self, outcome: AuditOutcome) {
        if self.pending_audit == Some(outcome.request_id) {
            self.pending_audit = None;
        }
        match outcome.status {
            AuditStatus::Accepted { detail } => {
                tracing::info!(request_id = outcome.request_id, "decision audited");
                self.events.push(MissionEvent::AuditConfirmed {
                    request_id: outcome.request_id,
                    detail,
                });
            }
            AuditStatus::Rejected { reason } => {
                tracing::warn!(request_id = outcome.request_id, %reason, "decision audit rejected");
                let choice = if outcome.launch_probe {
                    "LAUNCH"
                } else {
                    "NOT LAUNCH"
                };
                self.events.push(MissionEvent::Notice {
                    message: format!(
                        "Decision to {choice} the probe stands but was not audited: {reason}"
                    ),
                });
            }
        }
    }

    fn require(&self, phase: Phase, operation: &'static str) -> Result<(), PhaseError> {
        if self.state.phase == phase {
            Ok(())
        } else {
            Err(PhaseError::InvalidPhase {
                operation,
                phase: self.state.phase,
            })
        }
    }

    fn set_phase(&mut self, to: Phase) {
        let from = self.state.phase;
        if from == to {
            return;
        }
        self.state.phase = to;
        tracing::info!(%from, %to, "phase transition");
        self.events.push(MissionEvent::PhaseChanged { from, to });
    }

    fn evaluate(&self, selection: &DesignSelection) -> FeasibilityResult {
        let trajectory = selection
            .trajectory_id
            .as_deref()
            .and_then(|id| self.trajectories.get(id).ok());
        evaluate(&FeasibilityInput {
            vehicle: selection.vehicle.spec(),
            propulsion: selection.propulsion.spec(),
            impactor_mass_kg: selection.impactor_mass_kg,
            trajectory,
            remaining_seconds_to_impact: self.state.remaining_seconds_to_impact().unwrap_or(0.0),
            starting_budget_b: self.state.starting_budget_b,
        })
    }

    fn record_result(&mut self, result: FeasibilityResult) {
        let changed = self.last_result.as_ref().is_none_or(|previous| {
            previous.can_launch != result.can_launch
                || previous.blocking_reason != result.blocking_reason
        });
        if changed {
            tracing::debug!(
                can_launch = result.can_launch,
                reason = ?result.blocking_reason,
                "feasibility verdict changed"
            );
            self.events.push(MissionEvent::FeasibilityChanged {
                can_launch: result.can_launch,
                blocking_reason: result.blocking_reason,
            });
        }
        self.last_result = Some(result);
    }

    fn apply_timer_update(&mut self, update: &TimerUpdate) {
        if *update != TimerUpdate::Impact {
            return;
        }
        let phase = self.state.phase;
        if !matches!(phase, Phase::Decision | Phase::Design | Phase::Launched) {
            return;
        }
        let mitigation_launched = phase == Phase::Launched;
        let at = self.timer.impact_time().unwrap_or(self.state.current_time);
        tracing::warn!(mitigation_launched, "impact time reached");
        self.state.outcome = Some(MissionOutcome {
            mitigation_launched,
            ended_at: at,
        });
        self.events.push(MissionEvent::Impact {
            at,
            mitigation_launched,
        });
        self.set_phase(Phase::Done);
    }
}
