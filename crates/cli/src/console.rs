//! Line-oriented console adapter.
//!
//! Each input line parses into a [`Command`]; the [`ConsoleSession`] maps it onto a
//! controller operation, owns the simulated clock, and renders the resulting
//! mission events as text.

use std::io::Write;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::Instant;

use chrono::{DateTime, Duration, Utc};
use defense_backend::AuditOutcome;
use defense_catalog::{CatalogError, MaterialKind, PropulsionKind, VehicleKind};
use defense_config::ScenarioConfig;
use defense_core::units::fraction_to_percent;
use defense_export::report::{MissionReport, write_json};
use defense_export::{ExportError, writer_for_path};
use defense_feasibility::FeasibilityResult;
use defense_mission::{
    DesignSelection, MissionEvent, OBSERVATIONS_TO_CONFIRM, PhaseController, PhaseError,
    ScenarioAsset, TimerUpdate,
};
use thiserror::Error;

const HELP: &str = "\
Commands:
  start                     begin a new scenario
  observe                   refine the threat orbit (3 observations confirm impact)
  decide launch|skip        commit the characterization probe decision
  confirm                   move on to mission design
  vehicle <name>            falcon_heavy | sls_block1
  propulsion <name>         hypergolic | electric
  material <name>           aluminum | tungsten
  mass <kg>                 impactor mass
  trajectory <id>           select a transfer option
  launch                    launch the mitigation mission
  wait <duration>           advance the clock, e.g. 12h, 3d, 90m
  status                    show mission state
  catalog                   list equipment and trajectories
  report <path|->           write a JSON mission report
  quit";

/// One operator command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Help,
    Start,
    Observe,
    Decide { launch_probe: bool },
    Confirm,
    Vehicle(VehicleKind),
    Propulsion(PropulsionKind),
    Material(MaterialKind),
    Mass(f64),
    Trajectory(String),
    Launch,
    Wait(Duration),
    Status,
    Catalog,
    Report(PathBuf),
    Quit,
}

#[derive(Debug, Error, PartialEq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command '{0}' (try 'help')")]
    Unknown(String),
    #[error("'{command}' expects {expected}")]
    BadArgument {
        command: &'static str,
        expected: &'static str,
    },
    #[error("invalid number '{0}'")]
    InvalidNumber(String),
    #[error("invalid duration '{0}' (use e.g. 12h, 3d or 90m)")]
    InvalidDuration(String),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut parts = line.split_whitespace();
        let Some(head) = parts.next() else {
            return Err(CommandError::Empty);
        };
        let arg = parts.collect::<Vec<_>>().join(" ");

        match head.to_ascii_lowercase().as_str() {
            "help" | "?" => Ok(Command::Help),
            "start" => Ok(Command::Start),
            "observe" | "obs" => Ok(Command::Observe),
            "decide" => {
                const EXPECTED: &str = "'launch' or 'skip'";
                let choice = required(&arg, "decide", EXPECTED)?;
                match choice.to_ascii_lowercase().as_str() {
                    "launch" | "yes" | "y" => Ok(Command::Decide { launch_probe: true }),
                    "skip" | "no" | "n" => Ok(Command::Decide {
                        launch_probe: false,
                    }),
                    _ => Err(CommandError::BadArgument {
                        command: "decide",
                        expected: EXPECTED,
                    }),
                }
            }
            "confirm" => Ok(Command::Confirm),
            "vehicle" => Ok(Command::Vehicle(
                required(&arg, "vehicle", "a launch vehicle")?.parse()?,
            )),
            "propulsion" | "engine" => Ok(Command::Propulsion(
                required(&arg, "propulsion", "a propulsion system")?.parse()?,
            )),
            "material" => Ok(Command::Material(
                required(&arg, "material", "an impactor material")?.parse()?,
            )),
            "mass" => {
                let raw = required(&arg, "mass", "a mass in kg")?;
                raw.parse::<f64>()
                    .map(Command::Mass)
                    .map_err(|_| CommandError::InvalidNumber(raw.to_string()))
            }
            "trajectory" | "traj" => Ok(Command::Trajectory(
                required(&arg, "trajectory", "a trajectory id")?.to_string(),
            )),
            "launch" => Ok(Command::Launch),
            "wait" => Ok(Command::Wait(parse_duration(required(
                &arg,
                "wait",
                "a duration such as 12h or 3d",
            )?)?)),
            "status" => Ok(Command::Status),
            "catalog" => Ok(Command::Catalog),
            "report" => Ok(Command::Report(PathBuf::from(required(
                &arg,
                "report",
                "an output path or '-'",
            )?))),
            "quit" | "exit" => Ok(Command::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

fn required<'a>(
    arg: &'a str,
    command: &'static str,
    expected: &'static str,
) -> Result<&'a str, CommandError> {
    if arg.is_empty() {
        Err(CommandError::BadArgument { command, expected })
    } else {
        Ok(arg)
    }
}

/// Parse `<number>[d|h|m]`; a bare number means hours.
pub fn parse_duration(raw: &str) -> Result<Duration, CommandError> {
    let raw = raw.trim();
    let (number, unit_ms) = if let Some(value) = raw.strip_suffix('d') {
        (value, 86_400_000.0)
    } else if let Some(value) = raw.strip_suffix('h') {
        (value, 3_600_000.0)
    } else if let Some(value) = raw.strip_suffix('m') {
        (value, 60_000.0)
    } else {
        (raw, 3_600_000.0)
    };
    let value: f64 = number
        .trim()
        .parse()
        .map_err(|_| CommandError::InvalidDuration(raw.to_string()))?;
    let millis = (value * unit_ms).round();
    if !(millis.is_finite() && millis > 0.0 && millis < i64::MAX as f64) {
        return Err(CommandError::InvalidDuration(raw.to_string()));
    }
    Duration::try_milliseconds(millis as i64)
        .ok_or_else(|| CommandError::InvalidDuration(raw.to_string()))
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Phase(#[from] PhaseError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot advance the clock by {0} past the supported calendar")]
    ClockOverflow(Duration),
}

/// Console adapter around one [`PhaseController`].
pub struct ConsoleSession {
    controller: PhaseController,
    outcomes: Receiver<AuditOutcome>,
    scenario: ScenarioConfig,
    clock: DateTime<Utc>,
    draft: DesignSelection,
    history: Vec<MissionEvent>,
}

impl ConsoleSession {
    pub fn new(
        controller: PhaseController,
        outcomes: Receiver<AuditOutcome>,
        scenario: ScenarioConfig,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            controller,
            outcomes,
            scenario,
            clock: now,
            draft: DesignSelection::default(),
            history: Vec::new(),
        }
    }

    pub fn controller(&self) -> &PhaseController {
        &self.controller
    }

    /// Simulated time as seen by the adapter.
    pub fn clock(&self) -> DateTime<Utc> {
        self.clock
    }

    /// Every event rendered so far in this session.
    pub fn history(&self) -> &[MissionEvent] {
        &self.history
    }

    /// Run one command and return the lines to print.
    pub fn execute(&mut self, command: Command) -> Result<Vec<String>, SessionError> {
        let mut lines = Vec::new();
        match command {
            Command::Help => lines.extend(HELP.lines().map(str::to_string)),
            Command::Start => {
                let asset = ScenarioAsset::from_config(&self.scenario, self.clock)?;
                self.clock = asset.start_time;
                self.draft = DesignSelection::default();
                self.controller.start_scenario(asset);
            }
            Command::Observe => {
                self.controller.observe()?;
            }
            Command::Decide { launch_probe } => {
                let report = self.controller.decide(launch_probe)?;
                self.clock = report.current_time;
                lines.push(format!(
                    "Mission budget: ${:.2}B",
                    report.starting_budget_b
                ));
            }
            Command::Confirm => self.controller.confirm_transition()?,
            Command::Vehicle(vehicle) => {
                let next = DesignSelection {
                    vehicle,
                    ..self.draft.clone()
                };
                lines.extend(self.apply_design(next)?);
            }
            Command::Propulsion(propulsion) => {
                let next = DesignSelection {
                    propulsion,
                    ..self.draft.clone()
                };
                lines.extend(self.apply_design(next)?);
            }
            Command::Material(material) => {
                let next = DesignSelection {
                    material,
                    ..self.draft.clone()
                };
                lines.extend(self.apply_design(next)?);
            }
            Command::Mass(impactor_mass_kg) => {
                let next = DesignSelection {
                    impactor_mass_kg,
                    ..self.draft.clone()
                };
                lines.extend(self.apply_design(next)?);
            }
            Command::Trajectory(id) => {
                let next = DesignSelection {
                    trajectory_id: Some(id),
                    ..self.draft.clone()
                };
                lines.extend(self.apply_design(next)?);
            }
            Command::Launch => self.controller.launch()?,
            Command::Wait(step) => {
                self.clock = self
                    .clock
                    .checked_add_signed(step)
                    .ok_or(SessionError::ClockOverflow(step))?;
                if let TimerUpdate::Countdown { display, .. } = self.controller.tick(self.clock) {
                    lines.push(format!("Time to impact: {display}"));
                }
            }
            Command::Status => lines.extend(self.status_lines()),
            Command::Catalog => lines.extend(self.catalog_lines()),
            Command::Report(path) => {
                let report = self.report(Utc::now());
                let mut writer = writer_for_path(&path)?;
                write_json(&mut writer, &report)?;
                writer.flush()?;
                lines.push(format!("Report written to {}", path.display()));
            }
            Command::Quit => {}
        }
        let mut out = self.flush_events();
        out.extend(lines);
        Ok(out)
    }

    /// Apply audit outcomes that arrived since the last poll.
    pub fn poll_audit(&mut self) -> Vec<String> {
        while let Ok(outcome) = self.outcomes.try_recv() {
            self.controller.apply_audit_outcome(outcome);
        }
        self.flush_events()
    }

    /// Wait up to `timeout` for an outstanding decision audit before the session ends.
    ///
    /// A submission still unresolved at the deadline is reported as abandoned.
    pub fn drain_audit(&mut self, timeout: std::time::Duration) -> Vec<String> {
        let deadline = Instant::now() + timeout;
        while self.controller.pending_audit().is_some() {
            let wait = deadline.saturating_duration_since(Instant::now());
            match self.outcomes.recv_timeout(wait) {
                Ok(outcome) => self.controller.apply_audit_outcome(outcome),
                Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => break,
            }
        }
        let mut lines = self.poll_audit();
        if let Some(request_id) = self.controller.pending_audit() {
            tracing::warn!(request_id, "decision audit abandoned at exit");
            lines.push(format!(
                "Decision #{request_id} was not confirmed by the audit ledger before exit."
            ));
        }
        lines
    }

    pub fn report(&self, generated_at: DateTime<Utc>) -> MissionReport {
        MissionReport::capture(&self.controller, self.history.clone(), generated_at)
    }

    fn apply_design(&mut self, next: DesignSelection) -> Result<Vec<String>, SessionError> {
        let result = self.controller.configure_design(next.clone())?;
        self.draft = self.controller.selection().cloned().unwrap_or(next);
        Ok(feasibility_lines(&result))
    }

    fn flush_events(&mut self) -> Vec<String> {
        let events = self.controller.drain_events();
        let lines = events.iter().map(render_event).collect();
        self.history.extend(events);
        lines
    }

    fn status_lines(&self) -> Vec<String> {
        let state = self.controller.state();
        let decision = match state.probe_launched {
            None => "pending",
            Some(true) => "probe launched",
            Some(false) => "no probe",
        };
        let mut lines = vec![
            format!("Phase          : {}", state.phase),
            format!("Clock          : {}", format_time(self.clock)),
            format!(
                "Time to impact : {}",
                self.controller.countdown().unwrap_or("--:--:--:--")
            ),
            format!(
                "Observations   : {}/{}",
                state.observation_count, OBSERVATIONS_TO_CONFIRM
            ),
            format!("Decision       : {decision}"),
            format!("Budget         : ${:.2}B", state.starting_budget_b),
        ];
        if let Some(request_id) = self.controller.pending_audit() {
            lines.push(format!("Audit          : decision #{request_id} awaiting ledger"));
        }
        let selection = &self.draft;
        lines.push(format!(
            "Design         : {} / {} / {} {:.0} kg / trajectory {}",
            selection.vehicle,
            selection.propulsion,
            selection.material,
            selection.impactor_mass_kg,
            selection.trajectory_id.as_deref().unwrap_or("none"),
        ));
        lines
    }

    fn catalog_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        for kind in VehicleKind::ALL {
            lines.push(format!("vehicle     {:<14}{} | {}", kind.key(), kind, kind.spec().spec));
        }
        for kind in PropulsionKind::ALL {
            lines.push(format!("propulsion  {:<14}{} | {}", kind.key(), kind, kind.spec().spec));
        }
        for kind in MaterialKind::ALL {
            lines.push(format!("material    {:<14}{} | {}", kind.key(), kind, kind.spec().spec));
        }
        for option in self.controller.trajectories().options() {
            lines.push(format!(
                "trajectory  {:<14}{} | {:.0} days, {:.0} m/s",
                option.id, option.label, option.transfer_time_days, option.required_delta_v_ms
            ));
        }
        lines
    }
}

/// Figures shown for one evaluated design.
pub fn feasibility_lines(result: &FeasibilityResult) -> Vec<String> {
    let mission = match result.total_mission_days {
        Some(days) => format!("{days:.0} days total"),
        None => "select a trajectory".to_string(),
    };
    let verdict = match result.blocking_reason {
        None => "READY TO LAUNCH".to_string(),
        Some(reason) => format!("BLOCKED: {reason}"),
    };
    vec![
        format!(
            "Cost           : ${:.2}B (remaining ${:.2}B)",
            result.total_cost_b, result.remaining_budget_b
        ),
        format!(
            "Spacecraft     : {:.0} kg dry, {:.0} kg propellant{}",
            result.spacecraft_dry_mass_kg,
            result.propellant_mass_kg.max(0.0),
            if result.is_overweight { " (OVERWEIGHT)" } else { "" }
        ),
        format!("Delta-v        : {:.0} m/s", result.delta_v_ms),
        format!("Preparation    : {:.0} days | {mission}", result.total_prep_days),
        format!("Time to impact : {:.1} days", result.remaining_days),
        format!(
            "Reliability    : {:.1}% ({})",
            fraction_to_percent(result.reliability),
            result.reliability_band.label()
        ),
        format!("Escape burn    : {:.0} h", result.escape_burn_hours),
        format!("Verdict        : {verdict}"),
    ]
}

pub fn render_event(event: &MissionEvent) -> String {
    match event {
        MissionEvent::ScenarioStarted {
            start_time,
            impact_time,
        } => format!(
            "Scenario started at {}; projected impact {}",
            format_time(*start_time),
            format_time(*impact_time)
        ),
        MissionEvent::PhaseChanged { from, to } => format!("Phase {from} -> {to}"),
        MissionEvent::ObservationLogged {
            count,
            probability_percent,
            status,
        } => format!(
            "Observation {count}: impact probability {probability_percent:.1}% | {status}"
        ),
        MissionEvent::DecisionCommitted {
            request_id,
            launch_probe,
            ..
        } => format!(
            "Decision #{request_id} committed: {} the probe (audit pending)",
            if *launch_probe { "LAUNCH" } else { "NOT LAUNCH" }
        ),
        MissionEvent::ClockAdvanced { days, now } => format!(
            "Probe mission consumed {days} days; clock now {}",
            format_time(*now)
        ),
        MissionEvent::AuditConfirmed { request_id, detail } => match detail {
            Some(detail) => format!("Decision #{request_id} audited: {detail}"),
            None => format!("Decision #{request_id} audited"),
        },
        MissionEvent::FeasibilityChanged {
            blocking_reason, ..
        } => match blocking_reason {
            None => "Mission feasible: READY TO LAUNCH".to_string(),
            Some(reason) => format!("Launch blocked: {reason}"),
        },
        MissionEvent::Launched { at } => {
            format!("Mitigation mission launched at {}", format_time(*at))
        }
        MissionEvent::Impact {
            at,
            mitigation_launched,
        } => {
            if *mitigation_launched {
                format!(
                    "Impact time reached at {}; mitigation mission en route",
                    format_time(*at)
                )
            } else {
                format!(
                    "IMPACT at {}; no mitigation mission was launched",
                    format_time(*at)
                )
            }
        }
        MissionEvent::Notice { message } => format!("NOTICE: {message}"),
    }
}

fn format_time(time: DateTime<Utc>) -> String {
    time.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}
