use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDate;
use clap::Parser;
use defense_backend::{AuditQuery, BackendClient, filter_entries};
use defense_cli::init_logging;
use defense_config::load_or_default;

/// Print the public decision audit trail, or the curated threat catalog.
#[derive(Parser, Debug)]
#[command(author, version, about = "Decision audit trail viewer")]
struct Cli {
    /// Simulation config (TOML or YAML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Backend base URL (overrides config and environment)
    #[arg(long)]
    base_url: Option<String>,

    /// Only entries recorded on this UTC date (YYYY-MM-DD)
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Only entries whose message mentions this phase
    #[arg(long)]
    phase: Option<String>,

    /// List curated near-Earth objects instead of the audit trail
    #[arg(long, default_value_t = false)]
    neos: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = load_or_default(cli.config.as_deref())?;
    if let Some(url) = cli.base_url {
        config.backend.base_url = url;
    }
    init_logging(&config.logging);

    let client = BackendClient::new(
        &config.backend.base_url,
        Duration::from_secs(config.backend.timeout_secs),
    )?;

    if cli.neos {
        let curated = client.curated_neos_or_default();
        for neo in &curated.planet_killers {
            println!("PLANET_KILLER  {}", neo.name);
        }
        for neo in &curated.city_killers {
            println!("CITY_KILLER    {}", neo.name);
        }
        if curated.is_empty() {
            for neo in client.neo_list_or_default() {
                println!("{:<14} {}", neo.classification().label(), neo.name);
            }
        }
        return Ok(());
    }

    let query = AuditQuery {
        date: cli.date,
        phase: cli.phase,
    };
    let entries = client.fetch_audit_log(&query)?;
    let shown = filter_entries(&entries, &query);
    if shown.is_empty() {
        println!("No audit entries found.");
    }
    for entry in shown {
        let when = entry
            .consensus_time()
            .map(|t| t.format("%Y-%m-%d %H:%M:%S%.3f UTC").to_string())
            .unwrap_or_else(|| entry.consensus_timestamp.clone());
        let ms = entry
            .timestamp_ms()
            .map(|ms| format!("{ms:.0}"))
            .unwrap_or_else(|_| "-".to_string());
        println!("{ms:>14}  {when}  {}", entry.message());
    }
    Ok(())
}
