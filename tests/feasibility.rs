use planetary_defense::catalog::{PropulsionKind, TrajectoryCatalog, TrajectoryOption, VehicleKind};
use planetary_defense::feasibility::{
    BlockingReason, FeasibilityInput, MassSweep, ReliabilityBand, evaluate,
    MAX_SWEEP_ROWS, SweepError, max_feasible_impactor_mass, rocket_delta_v, sweep_impactor_mass,
};

const DAY_S: f64 = 86_400.0;

fn falcon_hypergolic(
    impactor_mass_kg: f64,
    trajectory: Option<&TrajectoryOption>,
    remaining_days: f64,
) -> FeasibilityInput<'_> {
    FeasibilityInput {
        vehicle: VehicleKind::FalconHeavy.spec(),
        propulsion: PropulsionKind::Hypergolic.spec(),
        impactor_mass_kg,
        trajectory,
        remaining_seconds_to_impact: remaining_days * DAY_S,
        starting_budget_b: 2.0,
    }
}

#[test]
fn five_tonne_aluminum_impactor_on_falcon_heavy() {
    let result = evaluate(&falcon_hypergolic(5_000.0, None, 90.0));

    assert!((result.total_cost_b - 0.20).abs() < 1e-9);
    assert!((result.remaining_budget_b - 1.80).abs() < 1e-9);
    assert_eq!(result.spacecraft_dry_mass_kg, 5_500.0);
    assert!(!result.is_overweight);
    assert_eq!(result.propellant_mass_kg, 21_200.0);
    assert!((result.exhaust_velocity_ms - 3_138.128).abs() < 1e-3);
    let expected = 320.0 * 9.80665 * (26_700.0_f64 / 5_500.0).ln();
    assert!((result.delta_v_ms - expected).abs() < 1e-6);
    assert!((result.delta_v_ms - 4_958.0).abs() < 1.0, "got {}", result.delta_v_ms);
    assert_eq!(result.total_prep_days, 81.0);
    assert!((result.reliability - 0.9452).abs() < 1e-9);
    assert_eq!(result.reliability_band, ReliabilityBand::AcceptableRisk);
    assert_eq!(result.escape_burn_hours, 12.0);
    assert_eq!(result.total_mission_days, None);
    assert_eq!(
        result.blocking_reason,
        Some(BlockingReason::NoTrajectorySelected)
    );
    assert!(!result.can_launch);
}

#[test]
fn empty_impactor_maximises_delta_v() {
    let result = evaluate(&falcon_hypergolic(0.0, None, 90.0));
    assert_eq!(result.spacecraft_dry_mass_kg, 500.0);
    let expected = 320.0 * 9.80665 * (26_700.0_f64 / 500.0).ln();
    assert!((result.delta_v_ms - expected).abs() < 1e-6);
    assert!((result.delta_v_ms - 12_483.0).abs() < 1.0, "got {}", result.delta_v_ms);
    assert_eq!(result.total_prep_days, 25.0);
    assert_eq!(result.reliability_band, ReliabilityBand::HighConfidence);
}

#[test]
fn light_impactor_on_fast_transfer_can_launch() {
    let catalog = TrajectoryCatalog::default();
    let fast = catalog.get("fast").expect("fast trajectory");
    let result = evaluate(&falcon_hypergolic(1_000.0, Some(fast), 90.0));

    assert_eq!(result.total_prep_days, 30.0);
    assert_eq!(result.total_mission_days, Some(60.0));
    assert!(result.delta_v_ms > fast.required_delta_v_ms);
    assert!(result.can_launch);
    assert_eq!(result.blocking_reason, None);
}

#[test]
fn timeline_margin_is_checked_before_budget() {
    let catalog = TrajectoryCatalog::default();
    let fast = catalog.get("fast").expect("fast trajectory");
    let mut input = falcon_hypergolic(1_000.0, Some(fast), 66.9);
    input.starting_budget_b = 0.0;

    let result = evaluate(&input);
    assert_eq!(
        result.blocking_reason,
        Some(BlockingReason::LaunchWindowClosed)
    );

    // 60 mission days against 67 - 7 is exactly on the margin.
    input.remaining_seconds_to_impact = 67.0 * DAY_S;
    let result = evaluate(&input);
    assert_eq!(
        result.blocking_reason,
        Some(BlockingReason::InsufficientBudget)
    );
}

#[test]
fn sls_with_hypergolic_stage_exceeds_base_budget() {
    let catalog = TrajectoryCatalog::default();
    let fast = catalog.get("fast").expect("fast trajectory");
    let input = FeasibilityInput {
        vehicle: VehicleKind::SlsBlock1.spec(),
        ..falcon_hypergolic(1_000.0, Some(fast), 90.0)
    };
    let result = evaluate(&input);
    assert!(result.remaining_budget_b < 0.0);
    assert_eq!(result.total_mission_days, Some(80.0));
    assert_eq!(
        result.blocking_reason,
        Some(BlockingReason::InsufficientBudget)
    );
}

#[test]
fn overweight_payload_never_launches() {
    let generous = TrajectoryOption::new("slow", "Slow", 1.0, 0.0, 1);
    for remaining_days in [100.0, 10_000.0, 1.0e6] {
        let result = evaluate(&falcon_hypergolic(30_000.0, Some(&generous), remaining_days));
        assert!(result.is_overweight);
        assert!(!result.can_launch);
        assert_eq!(result.delta_v_ms, 0.0);
    }
    let result = evaluate(&falcon_hypergolic(30_000.0, Some(&generous), 1.0e6));
    assert_eq!(
        result.blocking_reason,
        Some(BlockingReason::PayloadOverweight)
    );
}

#[test]
fn heavy_impactor_lacks_delta_v_for_balanced_transfer() {
    let catalog = TrajectoryCatalog::default();
    let balanced = catalog.get("balanced").expect("balanced trajectory");
    let result = evaluate(&falcon_hypergolic(5_000.0, Some(balanced), 200.0));
    assert_eq!(result.total_mission_days, Some(126.0));
    assert_eq!(
        result.blocking_reason,
        Some(BlockingReason::InsufficientDeltaV)
    );
    assert_eq!(
        result.blocking_reason.map(|r| r.label()),
        Some("Insufficient Δv for Trajectory")
    );
}

#[test]
fn evaluation_is_pure() {
    let catalog = TrajectoryCatalog::default();
    let input = falcon_hypergolic(2_500.0, catalog.get("efficient").ok(), 75.0);
    assert_eq!(evaluate(&input), evaluate(&input));
}

#[test]
fn delta_v_falls_and_prep_time_grows_with_mass() {
    let mut previous: Option<(f64, f64)> = None;
    let mut mass = 0.0;
    while mass <= 30_000.0 {
        let result = evaluate(&falcon_hypergolic(mass, None, 90.0));
        if let Some((dv, prep)) = previous {
            assert!(result.delta_v_ms <= dv, "delta-v rose at {mass} kg");
            assert!(result.total_prep_days >= prep, "prep time fell at {mass} kg");
        }
        if result.spacecraft_dry_mass_kg >= 26_700.0 {
            assert_eq!(result.delta_v_ms, 0.0);
        }
        previous = Some((result.delta_v_ms, result.total_prep_days));
        mass += 250.0;
    }
}

#[test]
fn rocket_equation_without_propellant_is_zero() {
    assert_eq!(rocket_delta_v(3_000.0, 1_000.0, 0.0), 0.0);
    assert_eq!(rocket_delta_v(3_000.0, 1_000.0, -5.0), 0.0);
    let dv = rocket_delta_v(3_000.0, 1_000.0, 1_000.0);
    assert!((dv - 3_000.0 * 2.0_f64.ln()).abs() < 1e-9);
}

#[test]
fn reliability_bands_follow_thresholds() {
    assert_eq!(ReliabilityBand::classify(0.98), ReliabilityBand::HighConfidence);
    assert_eq!(ReliabilityBand::classify(0.97), ReliabilityBand::AcceptableRisk);
    assert_eq!(ReliabilityBand::classify(0.93), ReliabilityBand::AcceptableRisk);
    assert_eq!(ReliabilityBand::classify(0.92), ReliabilityBand::HighRisk);
}

#[test]
fn sweep_finds_heaviest_launchable_impactor() {
    let catalog = TrajectoryCatalog::default();
    let fast = catalog.get("fast").expect("fast trajectory");
    let base = falcon_hypergolic(0.0, Some(fast), 90.0);
    let rows = sweep_impactor_mass(
        &base,
        MassSweep {
            start_kg: 0.0,
            end_kg: 5_000.0,
            step_kg: 1_500.0,
        },
    )
    .expect("valid sweep");

    let masses: Vec<f64> = rows.iter().map(|row| row.impactor_mass_kg).collect();
    assert_eq!(masses, vec![0.0, 1_500.0, 3_000.0, 4_500.0, 5_000.0]);
    // Only the lightest two still clear the 8 km/s direct intercept.
    assert_eq!(max_feasible_impactor_mass(&rows), Some(1_500.0));
}

#[test]
fn sweep_rejects_bad_ranges() {
    let base = falcon_hypergolic(0.0, None, 90.0);
    let step = MassSweep {
        start_kg: 0.0,
        end_kg: 100.0,
        step_kg: 0.0,
    };
    assert!(sweep_impactor_mass(&base, step).is_err());
    let reversed = MassSweep {
        start_kg: 100.0,
        end_kg: 0.0,
        step_kg: 10.0,
    };
    assert!(sweep_impactor_mass(&base, reversed).is_err());
}

#[test]
fn sweep_refuses_oversized_row_counts() {
    let base = falcon_hypergolic(0.0, None, 90.0);
    let fine = MassSweep {
        start_kg: 0.0,
        end_kg: 20_000.0,
        step_kg: 1e-6,
    };
    assert!(matches!(
        sweep_impactor_mass(&base, fine),
        Err(SweepError::TooManyRows { .. })
    ));

    let at_limit = MassSweep {
        start_kg: 0.0,
        end_kg: (MAX_SWEEP_ROWS - 2) as f64,
        step_kg: 1.0,
    };
    let rows = sweep_impactor_mass(&base, at_limit).expect("within limit");
    assert_eq!(rows.len(), MAX_SWEEP_ROWS - 1);
}

#[test]
fn blocking_reason_follows_priority_when_several_checks_fail() {
    // 30 t of impactor is overweight on Falcon Heavy and leaves no usable delta-v.
    let steep = TrajectoryOption::new("steep", "Steep", 10.0, 100.0, 1);
    let impossible = TrajectoryOption::new("impossible", "Impossible", 10.0, 20_000.0, 1);
    let cases: [(&str, f64, Option<&TrajectoryOption>, f64, f64, BlockingReason); 6] = [
        ("no trajectory", 30_000.0, None, 2_000.0, 0.0, BlockingReason::NoTrajectorySelected),
        ("timeline", 30_000.0, Some(&steep), 30.0, 0.0, BlockingReason::LaunchWindowClosed),
        ("budget", 30_000.0, Some(&steep), 2_000.0, 0.0, BlockingReason::InsufficientBudget),
        ("overweight", 30_000.0, Some(&steep), 2_000.0, 2.0, BlockingReason::PayloadOverweight),
        ("delta-v", 5_000.0, Some(&impossible), 2_000.0, 2.0, BlockingReason::InsufficientDeltaV),
        ("delta-v under budget failure", 5_000.0, Some(&impossible), 2_000.0, 0.1, BlockingReason::InsufficientBudget),
    ];

    for (name, mass, trajectory, remaining_days, budget, expected) in cases {
        let input = FeasibilityInput {
            starting_budget_b: budget,
            ..falcon_hypergolic(mass, trajectory, remaining_days)
        };
        let result = evaluate(&input);
        assert_eq!(result.blocking_reason, Some(expected), "case {name}");
        assert!(!result.can_launch, "case {name}");
    }

    let overweight = evaluate(&FeasibilityInput {
        starting_budget_b: 2.0,
        ..falcon_hypergolic(30_000.0, Some(&steep), 2_000.0)
    });
    assert!(overweight.is_overweight);
    assert!(overweight.delta_v_ms < 100.0);
}
