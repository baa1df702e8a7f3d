use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use defense_catalog::{MaterialKind, PropulsionKind, VehicleKind};
use defense_cli::{feasibility_lines, init_logging};
use defense_config::load_or_default;
use defense_core::time::days_to_seconds;
use defense_export::sweep::write_csv;
use defense_export::writer_for_path;
use defense_feasibility::{
    FeasibilityInput, MassSweep, evaluate, max_feasible_impactor_mass, sweep_impactor_mass,
};
use defense_mission::{starting_budget_for, trajectory_catalog_from_config};

/// Evaluate one mitigation design, or sweep impactor mass and export the table as CSV.
#[derive(Parser, Debug)]
#[command(author, version, about = "Mission feasibility calculator")]
struct Cli {
    /// Launch vehicle (falcon_heavy | sls_block1)
    #[arg(long, default_value = "falcon_heavy")]
    vehicle: VehicleKind,

    /// Propulsion system (hypergolic | electric)
    #[arg(long, default_value = "hypergolic")]
    propulsion: PropulsionKind,

    /// Impactor material (aluminum | tungsten)
    #[arg(long, default_value = "aluminum")]
    material: MaterialKind,

    /// Impactor mass in kg (clamped to the material's bounds)
    #[arg(long, default_value_t = 0.0)]
    mass: f64,

    /// Trajectory option id
    #[arg(long)]
    trajectory: Option<String>,

    /// Days remaining until impact (defaults to the configured scenario length)
    #[arg(long)]
    days_remaining: Option<f64>,

    /// Budget after a characterization probe was launched
    #[arg(long, default_value_t = false)]
    probe: bool,

    /// Simulation config (TOML or YAML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the result as JSON
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Sweep impactor mass up to this value (kg) instead of a single evaluation
    #[arg(long)]
    sweep_end: Option<f64>,

    /// Sweep start mass in kg
    #[arg(long, default_value_t = 0.0)]
    sweep_start: f64,

    /// Sweep step in kg
    #[arg(long, default_value_t = 500.0)]
    sweep_step: f64,

    /// Sweep CSV output (use '-' for stdout)
    #[arg(long, default_value = "-")]
    output: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_or_default(cli.config.as_deref())?;
    init_logging(&config.logging);

    let trajectories = trajectory_catalog_from_config(&config.trajectories)?;
    let trajectory = cli
        .trajectory
        .as_deref()
        .map(|id| trajectories.get(id))
        .transpose()?;
    let material = cli.material.spec();
    let days = cli
        .days_remaining
        .unwrap_or(config.scenario.time_to_impact_days);

    let input = FeasibilityInput {
        vehicle: cli.vehicle.spec(),
        propulsion: cli.propulsion.spec(),
        impactor_mass_kg: material.clamp_mass(cli.mass),
        trajectory,
        remaining_seconds_to_impact: days_to_seconds(days),
        starting_budget_b: starting_budget_for(cli.probe),
    };

    if let Some(end) = cli.sweep_end {
        let sweep = MassSweep {
            start_kg: material.clamp_mass(cli.sweep_start),
            end_kg: material.clamp_mass(end),
            step_kg: cli.sweep_step,
        };
        let rows = sweep_impactor_mass(&input, sweep)?;
        let mut writer = writer_for_path(&cli.output)?;
        let written = write_csv(&mut writer, &rows)?;
        writer.flush()?;
        tracing::info!(rows = written, output = %cli.output.display(), "sweep written");
        match max_feasible_impactor_mass(&rows) {
            Some(kg) => eprintln!("Heaviest launchable impactor: {kg:.0} kg"),
            None => eprintln!("No sampled impactor mass can launch"),
        }
        return Ok(());
    }

    let result = evaluate(&input);
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        for line in feasibility_lines(&result) {
            println!("{line}");
        }
    }
    Ok(())
}
