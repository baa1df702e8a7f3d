//! Export helpers for CSV and JSON artifacts.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write export: {0}")]
    Io(#[from] io::Error),
    #[error("failed to encode CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Create a writer for the target path, handling stdout (`-`) by convention.
pub fn writer_for_path(path: &Path) -> io::Result<Box<dyn Write>> {
    if path == Path::new("-") {
        return Ok(Box::new(BufWriter::new(io::stdout())));
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(path)?;
    Ok(Box::new(BufWriter::new(file)))
}

pub mod sweep {
    use std::io::Write;

    use defense_feasibility::SweepRow;
    use serde::Serialize;

    use crate::ExportError;

    /// Flat CSV row emitted by the impactor mass sweep.
    #[derive(Debug, Serialize)]
    struct Record<'a> {
        impactor_mass_kg: f64,
        total_cost_b: f64,
        remaining_budget_b: f64,
        spacecraft_dry_mass_kg: f64,
        propellant_mass_kg: f64,
        delta_v_ms: f64,
        total_prep_days: f64,
        total_mission_days: Option<f64>,
        remaining_days: f64,
        reliability: f64,
        can_launch: bool,
        blocking_reason: &'a str,
    }

    impl<'a> From<&'a SweepRow> for Record<'a> {
        fn from(row: &'a SweepRow) -> Self {
            let result = &row.result;
            Self {
                impactor_mass_kg: row.impactor_mass_kg,
                total_cost_b: result.total_cost_b,
                remaining_budget_b: result.remaining_budget_b,
                spacecraft_dry_mass_kg: result.spacecraft_dry_mass_kg,
                propellant_mass_kg: result.propellant_mass_kg,
                delta_v_ms: result.delta_v_ms,
                total_prep_days: result.total_prep_days,
                total_mission_days: result.total_mission_days,
                remaining_days: result.remaining_days,
                reliability: result.reliability,
                can_launch: result.can_launch,
                blocking_reason: result.blocking_reason.map(|r| r.label()).unwrap_or(""),
            }
        }
    }

    /// Write the sweep as CSV with a header row. Returns the number of rows written.
    pub fn write_csv<W: Write>(writer: W, rows: &[SweepRow]) -> Result<usize, ExportError> {
        let mut out = csv::Writer::from_writer(writer);
        for row in rows {
            out.serialize(Record::from(row))?;
        }
        out.flush()?;
        Ok(rows.len())
    }
}

pub mod report {
    use std::io::Write;

    use chrono::{DateTime, Utc};
    use defense_feasibility::FeasibilityResult;
    use defense_mission::{DesignSelection, MissionEvent, MissionState, PhaseController};
    use serde::Serialize;
    use serde_json::to_writer_pretty;

    use crate::ExportError;

    /// Snapshot of one scenario run, written at the end of a console session.
    #[derive(Debug, Clone, Serialize)]
    pub struct MissionReport {
        pub generated_at: DateTime<Utc>,
        pub state: MissionState,
        pub countdown: Option<String>,
        pub selection: Option<DesignSelection>,
        pub feasibility: Option<FeasibilityResult>,
        pub events: Vec<MissionEvent>,
    }

    impl MissionReport {
        /// Capture the controller's current state alongside the events seen so far.
        pub fn capture(
            controller: &PhaseController,
            events: Vec<MissionEvent>,
            generated_at: DateTime<Utc>,
        ) -> Self {
            Self {
                generated_at,
                state: controller.state().clone(),
                countdown: controller.countdown().map(str::to_string),
                selection: controller.selection().cloned(),
                feasibility: controller.last_result().cloned(),
                events,
            }
        }
    }

    pub fn write_json<W: Write>(writer: W, report: &MissionReport) -> Result<(), ExportError> {
        to_writer_pretty(writer, report)?;
        Ok(())
    }
}
