use chrono::{TimeZone, Utc};
use planetary_defense::backend::{
    AuditStatus, DecisionAuditClient, DecisionRecord, LocalAuditLedger,
};
use planetary_defense::catalog::TrajectoryCatalog;
use planetary_defense::mission::{MissionEvent, PhaseController, ScenarioAsset};

#[test]
fn local_ledger_records_and_accepts_immediately() {
    let (ledger, outcomes) = LocalAuditLedger::new();
    let decided_at = Utc.with_ymd_and_hms(2025, 10, 1, 12, 0, 0).unwrap();
    ledger.submit(DecisionRecord {
        request_id: 7,
        launch_probe: true,
        decided_at,
    });

    let outcome = outcomes.try_recv().expect("outcome queued");
    assert_eq!(outcome.request_id, 7);
    assert!(outcome.launch_probe);
    assert!(outcome.is_accepted());
    assert_eq!(
        outcome.status,
        AuditStatus::Accepted {
            detail: Some("recorded locally".into())
        }
    );
    assert_eq!(ledger.records()[0].decided_at, decided_at);
}

#[test]
fn accepted_outcome_is_applied_as_a_later_event() {
    let start = Utc.with_ymd_and_hms(2025, 10, 1, 0, 0, 0).unwrap();
    let (ledger, outcomes) = LocalAuditLedger::new();
    let mut controller =
        PhaseController::new(TrajectoryCatalog::default(), Box::new(ledger), start);
    controller.start_scenario(ScenarioAsset::from_days(start, 90.0).expect("asset"));
    for _ in 0..3 {
        controller.observe().expect("observation");
    }
    let report = controller.decide(false).expect("decision");
    assert_eq!(controller.pending_audit(), Some(report.request_id));
    controller.drain_events();

    let outcome = outcomes.try_recv().expect("outcome queued");
    controller.apply_audit_outcome(outcome);

    assert_eq!(controller.pending_audit(), None);
    assert_eq!(
        controller.drain_events(),
        vec![MissionEvent::AuditConfirmed {
            request_id: report.request_id,
            detail: Some("recorded locally".into()),
        }]
    );
}

#[test]
fn stale_outcome_leaves_newer_request_pending() {
    let start = Utc.with_ymd_and_hms(2025, 10, 1, 0, 0, 0).unwrap();
    let (ledger, outcomes) = LocalAuditLedger::new();
    let mut controller =
        PhaseController::new(TrajectoryCatalog::default(), Box::new(ledger), start);

    let run = |controller: &mut PhaseController| {
        controller.start_scenario(ScenarioAsset::from_days(start, 90.0).expect("asset"));
        for _ in 0..3 {
            controller.observe().expect("observation");
        }
        controller.decide(true).expect("decision").request_id
    };
    let first = run(&mut controller);
    let second = run(&mut controller);
    assert_ne!(first, second);

    let stale = outcomes.try_recv().expect("first outcome");
    assert_eq!(stale.request_id, first);
    controller.apply_audit_outcome(stale);
    assert_eq!(controller.pending_audit(), Some(second));
}
