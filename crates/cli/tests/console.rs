use std::sync::mpsc::{self, Sender};
use std::thread;

use chrono::{Duration, TimeZone, Utc};
use defense_backend::{
    AuditOutcome, AuditStatus, DecisionAuditClient, DecisionRecord, LocalAuditLedger,
};
use defense_catalog::{CatalogError, TrajectoryCatalog, VehicleKind};
use defense_cli::{Command, CommandError, ConsoleSession, SessionError, parse_duration};
use defense_config::ScenarioConfig;
use defense_mission::{Phase, PhaseController, PhaseError};

fn session() -> ConsoleSession {
    let start = Utc.with_ymd_and_hms(2025, 10, 1, 0, 0, 0).unwrap();
    let (ledger, outcomes) = LocalAuditLedger::new();
    let controller = PhaseController::new(TrajectoryCatalog::default(), Box::new(ledger), start);
    ConsoleSession::new(controller, outcomes, ScenarioConfig::default(), start)
}

fn run(session: &mut ConsoleSession, line: &str) -> Vec<String> {
    let command: Command = line.parse().expect("command parses");
    session.execute(command).expect("command succeeds")
}

#[test]
fn commands_parse_with_arguments() {
    assert_eq!("observe".parse::<Command>(), Ok(Command::Observe));
    assert_eq!(
        "decide LAUNCH".parse::<Command>(),
        Ok(Command::Decide { launch_probe: true })
    );
    assert_eq!(
        "vehicle SLS Block 1".parse::<Command>(),
        Ok(Command::Vehicle(VehicleKind::SlsBlock1))
    );
    assert_eq!("mass 1500".parse::<Command>(), Ok(Command::Mass(1_500.0)));
    assert_eq!("wait 3d".parse::<Command>(), Ok(Command::Wait(Duration::days(3))));
    assert_eq!("".parse::<Command>(), Err(CommandError::Empty));
    assert_eq!(
        "mass heavy".parse::<Command>(),
        Err(CommandError::InvalidNumber("heavy".into()))
    );
    assert!(matches!(
        "decide maybe".parse::<Command>(),
        Err(CommandError::BadArgument { command: "decide", .. })
    ));
    assert_eq!(
        "vehicle saturn".parse::<Command>(),
        Err(CommandError::Catalog(CatalogError::UnknownVehicle("saturn".into())))
    );
    assert!(matches!(
        "warp 9".parse::<Command>(),
        Err(CommandError::Unknown(_))
    ));
}

#[test]
fn durations_default_to_hours() {
    assert_eq!(parse_duration("12"), Ok(Duration::hours(12)));
    assert_eq!(parse_duration("90m"), Ok(Duration::minutes(90)));
    assert_eq!(parse_duration("1.5d"), Ok(Duration::hours(36)));
    assert!(parse_duration("0h").is_err());
    assert!(parse_duration("soon").is_err());
}

#[test]
fn durations_beyond_the_clock_range_are_rejected() {
    assert_eq!(
        "wait 1e12d".parse::<Command>(),
        Err(CommandError::InvalidDuration("1e12d".into()))
    );
    assert!(parse_duration("1e300h").is_err());

    let mut session = session();
    run(&mut session, "start");
    let before = session.clock();
    let err = session
        .execute(Command::Wait(Duration::days(1_000_000_000)))
        .expect_err("clock overflow");
    assert!(matches!(err, SessionError::ClockOverflow(_)));
    assert_eq!(session.clock(), before);
    assert_eq!(session.controller().phase(), Phase::Observation);
}

#[test]
fn full_session_reaches_launch() {
    let mut session = session();
    let lines = run(&mut session, "start");
    assert!(lines.iter().any(|l| l.contains("Phase DRIFT -> OBSERVATION")));

    run(&mut session, "observe");
    run(&mut session, "observe");
    let lines = run(&mut session, "observe");
    assert!(lines.iter().any(|l| l.contains("IMPACT CONFIRMED.")));
    assert_eq!(session.controller().phase(), Phase::Decision);

    let lines = run(&mut session, "decide skip");
    assert!(lines.iter().any(|l| l.contains("Mission budget: $2.00B")));
    let audit = session.poll_audit();
    assert!(audit.iter().any(|l| l.contains("audited: recorded locally")));

    run(&mut session, "confirm");
    run(&mut session, "mass 1000");
    let lines = run(&mut session, "trajectory fast");
    assert!(lines.iter().any(|l| l.contains("READY TO LAUNCH")));

    let lines = run(&mut session, "launch");
    assert!(lines.iter().any(|l| l.contains("Mitigation mission launched")));
    assert_eq!(session.controller().phase(), Phase::Launched);
}

#[test]
fn probe_decision_moves_the_session_clock() {
    let mut session = session();
    let start = session.clock();
    run(&mut session, "start");
    for _ in 0..3 {
        run(&mut session, "observe");
    }
    run(&mut session, "decide launch");
    assert_eq!(session.clock(), start + Duration::days(30));

    let lines = run(&mut session, "wait 12h");
    assert!(lines.iter().any(|l| l == "Time to impact: 59:12:00:00"));
}

#[test]
fn rejected_commands_surface_phase_errors() {
    let mut session = session();
    let err = session
        .execute(Command::Launch)
        .expect_err("launch before start");
    assert!(matches!(
        err,
        SessionError::Phase(PhaseError::InvalidPhase { .. })
    ));
    assert_eq!(session.controller().phase(), Phase::Drift);
}

#[test]
fn waiting_past_impact_ends_the_run() {
    let mut session = session();
    run(&mut session, "start");
    for _ in 0..3 {
        run(&mut session, "observe");
    }
    let lines = run(&mut session, "wait 91d");
    assert!(lines.iter().any(|l| l.starts_with("IMPACT at")));
    assert_eq!(session.controller().phase(), Phase::Done);
}

#[test]
fn report_command_writes_json() {
    let mut session = session();
    run(&mut session, "start");
    run(&mut session, "observe");

    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("report.json");
    let lines = run(&mut session, &format!("report {}", path.display()));
    assert!(lines[0].starts_with("Report written to"));
    let contents = std::fs::read_to_string(&path).expect("report exists");
    assert!(contents.contains("\"observation_logged\""));
}

/// Audit client that answers from another thread after `delay`, or never.
struct SlowLedger {
    outcomes: Sender<AuditOutcome>,
    delay: Option<std::time::Duration>,
}

impl DecisionAuditClient for SlowLedger {
    fn submit(&self, record: DecisionRecord) {
        let Some(delay) = self.delay else {
            return;
        };
        let outcomes = self.outcomes.clone();
        thread::spawn(move || {
            thread::sleep(delay);
            let _ = outcomes.send(AuditOutcome {
                request_id: record.request_id,
                launch_probe: record.launch_probe,
                status: AuditStatus::Accepted { detail: None },
            });
        });
    }
}

fn decided_session(delay: Option<std::time::Duration>) -> ConsoleSession {
    let start = Utc.with_ymd_and_hms(2025, 10, 1, 0, 0, 0).unwrap();
    let (tx, outcomes) = mpsc::channel();
    let ledger = SlowLedger { outcomes: tx, delay };
    let controller = PhaseController::new(TrajectoryCatalog::default(), Box::new(ledger), start);
    let mut session = ConsoleSession::new(controller, outcomes, ScenarioConfig::default(), start);
    run(&mut session, "start");
    for _ in 0..3 {
        run(&mut session, "observe");
    }
    run(&mut session, "decide skip");
    session
}

#[test]
fn exit_waits_for_an_in_flight_audit() {
    let mut session = decided_session(Some(std::time::Duration::from_millis(50)));
    assert!(session.controller().pending_audit().is_some());

    let lines = session.drain_audit(std::time::Duration::from_secs(5));
    assert!(session.controller().pending_audit().is_none());
    assert!(!lines.iter().any(|l| l.contains("not confirmed")));
}

#[test]
fn exit_reports_an_abandoned_audit() {
    let mut session = decided_session(None);
    let request_id = session.controller().pending_audit().expect("pending");

    let lines = session.drain_audit(std::time::Duration::from_millis(20));
    assert!(lines.iter().any(|l| {
        l == &format!("Decision #{request_id} was not confirmed by the audit ledger before exit.")
    }));
    assert_eq!(session.controller().pending_audit(), Some(request_id));
}
