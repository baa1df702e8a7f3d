//! Design-space sweep over impactor mass for a fixed equipment selection.

use serde::Serialize;
use thiserror::Error;

use crate::{FeasibilityInput, FeasibilityResult, evaluate};

/// Most rows a single sweep may produce.
pub const MAX_SWEEP_ROWS: usize = 100_000;

/// Inclusive mass range sampled at a fixed step.
#[derive(Debug, Clone, Copy)]
pub struct MassSweep {
    pub start_kg: f64,
    pub end_kg: f64,
    pub step_kg: f64,
}

#[derive(Debug, Error, PartialEq)]
pub enum SweepError {
    #[error("sweep step must be positive (got {0})")]
    NonPositiveStep(f64),
    #[error("sweep range is empty or non-finite ({start} .. {end})")]
    InvalidRange { start: f64, end: f64 },
    #[error("sweep would produce {requested} rows (limit {MAX_SWEEP_ROWS}); use a larger step")]
    TooManyRows { requested: f64 },
}

/// One sampled point of the sweep.
#[derive(Debug, Clone, Serialize)]
pub struct SweepRow {
    pub impactor_mass_kg: f64,
    pub result: FeasibilityResult,
}

/// Evaluate `base` at every mass in `sweep`, overriding only the impactor mass.
///
/// The end of the range is always sampled, even when it is not a multiple of the step.
pub fn sweep_impactor_mass(
    base: &FeasibilityInput<'_>,
    sweep: MassSweep,
) -> Result<Vec<SweepRow>, SweepError> {
    if !(sweep.step_kg.is_finite() && sweep.step_kg > 0.0) {
        return Err(SweepError::NonPositiveStep(sweep.step_kg));
    }
    if !(sweep.start_kg.is_finite() && sweep.end_kg.is_finite()) || sweep.end_kg < sweep.start_kg
    {
        return Err(SweepError::InvalidRange {
            start: sweep.start_kg,
            end: sweep.end_kg,
        });
    }

    let steps = ((sweep.end_kg - sweep.start_kg) / sweep.step_kg).floor();
    // One extra row for the start and one for an unaligned end.
    if !(steps + 2.0 <= MAX_SWEEP_ROWS as f64) {
        return Err(SweepError::TooManyRows {
            requested: steps + 1.0,
        });
    }
    let steps = steps as usize;
    let mut masses: Vec<f64> = (0..=steps)
        .map(|i| sweep.start_kg + sweep.step_kg * i as f64)
        .collect();
    if masses.last().is_some_and(|last| *last < sweep.end_kg) {
        masses.push(sweep.end_kg);
    }

    Ok(masses
        .into_iter()
        .map(|impactor_mass_kg| {
            let input = FeasibilityInput {
                impactor_mass_kg,
                ..*base
            };
            SweepRow {
                impactor_mass_kg,
                result: evaluate(&input),
            }
        })
        .collect())
}

/// Heaviest sampled impactor mass that can still launch.
pub fn max_feasible_impactor_mass(rows: &[SweepRow]) -> Option<f64> {
    rows.iter()
        .filter(|row| row.result.can_launch)
        .map(|row| row.impactor_mass_kg)
        .fold(None, |best, mass| match best {
            Some(current) if current >= mass => Some(current),
            _ => Some(mass),
        })
}
