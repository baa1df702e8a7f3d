//! Feasibility model for kinetic-impactor mitigation missions.
//!
//! [`evaluate`] is pure arithmetic over catalog entries and mission timing, cheap enough
//! to run on every selection change. It never fails: an unmet condition is reported as
//! `can_launch == false` together with the single highest-priority [`BlockingReason`].

pub mod sweep;

pub use sweep::{MAX_SWEEP_ROWS, MassSweep, SweepError, SweepRow, max_feasible_impactor_mass, sweep_impactor_mass};

use std::fmt;

use defense_catalog::{LaunchVehicle, PropulsionSystem, TrajectoryOption};
use defense_core::constants::{G0, TIMELINE_MARGIN_DAYS};
use defense_core::time::seconds_to_days;
use defense_core::units::kg_to_tonnes;
use serde::Serialize;

/// Inputs to a single feasibility evaluation.
#[derive(Debug, Clone, Copy)]
pub struct FeasibilityInput<'a> {
    pub vehicle: &'a LaunchVehicle,
    pub propulsion: &'a PropulsionSystem,
    pub impactor_mass_kg: f64,
    pub trajectory: Option<&'a TrajectoryOption>,
    pub remaining_seconds_to_impact: f64,
    pub starting_budget_b: f64,
}

/// Why a mission cannot launch. Variants are listed in display priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockingReason {
    NoTrajectorySelected,
    LaunchWindowClosed,
    InsufficientBudget,
    PayloadOverweight,
    InsufficientDeltaV,
}

impl BlockingReason {
    /// Operator-facing label shown on the disabled launch control.
    pub fn label(self) -> &'static str {
        match self {
            BlockingReason::NoTrajectorySelected => "Select a Trajectory",
            BlockingReason::LaunchWindowClosed => "Launch Window Closed",
            BlockingReason::InsufficientBudget => "Insufficient Budget",
            BlockingReason::PayloadOverweight => "Payload Exceeds Max Mass",
            BlockingReason::InsufficientDeltaV => "Insufficient Δv for Trajectory",
        }
    }
}

impl fmt::Display for BlockingReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Confidence band of the combined launch reliability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReliabilityBand {
    HighConfidence,
    AcceptableRisk,
    HighRisk,
}

impl ReliabilityBand {
    pub fn classify(reliability: f64) -> Self {
        if reliability > 0.97 {
            ReliabilityBand::HighConfidence
        } else if reliability > 0.92 {
            ReliabilityBand::AcceptableRisk
        } else {
            ReliabilityBand::HighRisk
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ReliabilityBand::HighConfidence => "high confidence",
            ReliabilityBand::AcceptableRisk => "acceptable risk",
            ReliabilityBand::HighRisk => "high risk",
        }
    }
}

/// Derived mission figures and the launch verdict.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeasibilityResult {
    pub total_cost_b: f64,
    pub remaining_budget_b: f64,
    pub spacecraft_dry_mass_kg: f64,
    pub is_overweight: bool,
    /// Propellant that fits in the remaining payload capacity; may be non-positive.
    pub propellant_mass_kg: f64,
    pub exhaust_velocity_ms: f64,
    pub delta_v_ms: f64,
    pub total_prep_days: f64,
    pub reliability: f64,
    pub reliability_band: ReliabilityBand,
    pub escape_burn_hours: f64,
    pub remaining_days: f64,
    /// Preparation plus transfer time; `None` until a trajectory is selected.
    pub total_mission_days: Option<f64>,
    pub can_launch: bool,
    pub blocking_reason: Option<BlockingReason>,
}

/// Rocket-equation delta-v for a stage with the given masses. Zero when no propellant fits.
pub fn rocket_delta_v(exhaust_velocity_ms: f64, dry_mass_kg: f64, propellant_mass_kg: f64) -> f64 {
    if propellant_mass_kg > 0.0 {
        let total_mass_kg = dry_mass_kg + propellant_mass_kg;
        exhaust_velocity_ms * (total_mass_kg / dry_mass_kg).ln()
    } else {
        0.0
    }
}

/// Evaluate budget, mass, delta-v and timeline for one equipment selection.
pub fn evaluate(input: &FeasibilityInput<'_>) -> FeasibilityResult {
    let vehicle = input.vehicle;
    let propulsion = input.propulsion;
    let impactor_mass_kg = input.impactor_mass_kg;

    let total_cost_b = vehicle.cost_b + propulsion.cost_b;
    let remaining_budget_b = input.starting_budget_b - total_cost_b;

    let spacecraft_dry_mass_kg = propulsion.mass_kg + impactor_mass_kg;
    let is_overweight = spacecraft_dry_mass_kg > vehicle.max_payload_kg;

    let propellant_mass_kg = vehicle.max_payload_kg - spacecraft_dry_mass_kg;
    let exhaust_velocity_ms = propulsion.isp_s * G0;
    let delta_v_ms = rocket_delta_v(exhaust_velocity_ms, spacecraft_dry_mass_kg, propellant_mass_kg);

    let base_prep_days = vehicle.construction_time_days + propulsion.construction_time_days;
    let mass_prep_penalty_days = kg_to_tonnes(impactor_mass_kg).powf(1.5) * 5.0;
    let total_prep_days = (base_prep_days + mass_prep_penalty_days).round();

    let reliability_penalty = (impactor_mass_kg / 10_000.0).powi(2) * 0.1;
    let reliability = vehicle.reliability * propulsion.reliability - reliability_penalty;

    let remaining_days = seconds_to_days(input.remaining_seconds_to_impact);
    let total_mission_days = input
        .trajectory
        .map(|trajectory| total_prep_days + trajectory.transfer_time_days);

    let blocking_reason = match input.trajectory {
        None => Some(BlockingReason::NoTrajectorySelected),
        Some(trajectory) => {
            let mission_days = total_prep_days + trajectory.transfer_time_days;
            if mission_days > remaining_days - TIMELINE_MARGIN_DAYS {
                Some(BlockingReason::LaunchWindowClosed)
            } else if remaining_budget_b < 0.0 {
                Some(BlockingReason::InsufficientBudget)
            } else if is_overweight {
                Some(BlockingReason::PayloadOverweight)
            } else if delta_v_ms < trajectory.required_delta_v_ms {
                Some(BlockingReason::InsufficientDeltaV)
            } else {
                None
            }
        }
    };

    FeasibilityResult {
        total_cost_b,
        remaining_budget_b,
        spacecraft_dry_mass_kg,
        is_overweight,
        propellant_mass_kg,
        exhaust_velocity_ms,
        delta_v_ms,
        total_prep_days,
        reliability,
        reliability_band: ReliabilityBand::classify(reliability),
        escape_burn_hours: vehicle.escape_burn_hours,
        remaining_days,
        total_mission_days,
        can_launch: blocking_reason.is_none(),
        blocking_reason,
    }
}
