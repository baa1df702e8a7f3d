use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use defense_cli::{Command, ConsoleSession, init_logging};
use defense_config::load_or_default;
use defense_mission::controller_from_config;

/// Interactive console for one planetary defense scenario.
#[derive(Parser, Debug)]
#[command(author, version, about = "Planetary defense mission console")]
struct Cli {
    /// Simulation config (TOML or YAML); built-in defaults are used when the file is absent
    #[arg(long, default_value = "configs/simulation.toml")]
    config: PathBuf,

    /// Record decisions locally instead of submitting them to the audit backend
    #[arg(long, default_value_t = false)]
    offline: bool,

    /// Start the scenario immediately instead of waiting for `start`
    #[arg(long, default_value_t = false)]
    autostart: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = load_or_default(Some(cli.config.as_path()))
        .with_context(|| format!("loading {}", cli.config.display()))?;
    if cli.offline {
        config.backend.audit_enabled = false;
    }
    init_logging(&config.logging);

    let now = Utc::now();
    let (controller, outcomes) = controller_from_config(&config, now)?;
    let mut session = ConsoleSession::new(controller, outcomes, config.scenario.clone(), now);

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "Planetary defense console. Type 'help' for commands.")?;
    if cli.autostart {
        print_lines(&mut stdout, &session.execute(Command::Start)?)?;
    }
    prompt(&mut stdout)?;

    for line in io::stdin().lock().lines() {
        let line = line?;
        print_lines(&mut stdout, &session.poll_audit())?;
        if !line.trim().is_empty() {
            match line.parse::<Command>() {
                Ok(Command::Quit) => break,
                Ok(command) => match session.execute(command) {
                    Ok(lines) => print_lines(&mut stdout, &lines)?,
                    Err(err) => writeln!(stdout, "error: {err}")?,
                },
                Err(err) => writeln!(stdout, "error: {err}")?,
            }
        }
        prompt(&mut stdout)?;
    }

    let grace = Duration::from_secs(config.backend.timeout_secs);
    print_lines(&mut stdout, &session.drain_audit(grace))?;
    Ok(())
}

fn print_lines(out: &mut impl Write, lines: &[String]) -> io::Result<()> {
    for line in lines {
        writeln!(out, "{line}")?;
    }
    Ok(())
}

fn prompt(out: &mut impl Write) -> io::Result<()> {
    write!(out, "> ")?;
    out.flush()
}
