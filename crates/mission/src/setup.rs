//! Builds a ready-to-run controller from loaded configuration.

use std::sync::Arc;
use std::sync::mpsc::Receiver;
use std::time::Duration;

use chrono::{DateTime, Utc};
use defense_backend::{
    AuditOutcome, BackendClient, BackendError, DecisionAuditClient, HttpAuditClient,
    LocalAuditLedger,
};
use defense_catalog::{CatalogError, TrajectoryCatalog, TrajectoryOption};
use defense_config::{BackendConfig, ScenarioConfig, SimulationConfig, TrajectoryConfig};
use thiserror::Error;

use crate::controller::{PhaseController, PhaseError, ScenarioAsset};

#[derive(Debug, Error)]
pub enum SetupError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl ScenarioAsset {
    /// Asset starting at the configured epoch (or `now`) and impacting
    /// `time_to_impact_days` later.
    pub fn from_config(config: &ScenarioConfig, now: DateTime<Utc>) -> Result<Self, PhaseError> {
        let start = config.start_epoch.unwrap_or(now);
        Self::from_days(start, config.time_to_impact_days)
    }
}

/// Trajectory options from configuration, or the built-in set when none are listed.
pub fn trajectory_catalog_from_config(
    trajectories: &[TrajectoryConfig],
) -> Result<TrajectoryCatalog, CatalogError> {
    if trajectories.is_empty() {
        return Ok(TrajectoryCatalog::default());
    }
    let options = trajectories
        .iter()
        .map(|entry| {
            TrajectoryOption::new(
                &entry.id,
                entry.label.as_deref().unwrap_or(entry.id.as_str()),
                entry.transfer_time_days,
                entry.required_delta_v_ms,
                entry.profile,
            )
        })
        .collect();
    TrajectoryCatalog::new(options)
}

/// Audit client for the configured backend plus the channel its outcomes arrive on.
pub fn audit_client_from_config(
    config: &BackendConfig,
) -> Result<(Box<dyn DecisionAuditClient>, Receiver<AuditOutcome>), BackendError> {
    if !config.audit_enabled {
        tracing::info!("decision audit disabled; recording decisions locally");
        let (ledger, outcomes) = LocalAuditLedger::new();
        return Ok((Box::new(ledger), outcomes));
    }
    let client = BackendClient::new(&config.base_url, Duration::from_secs(config.timeout_secs))?;
    tracing::info!(base_url = client.base_url(), "decision audit enabled");
    let (audit, outcomes) = HttpAuditClient::new(Arc::new(client));
    Ok((Box::new(audit), outcomes))
}

/// Controller wired to the configured trajectories and audit client.
pub fn controller_from_config(
    config: &SimulationConfig,
    now: DateTime<Utc>,
) -> Result<(PhaseController, Receiver<AuditOutcome>), SetupError> {
    let trajectories = trajectory_catalog_from_config(&config.trajectories)?;
    let (audit, outcomes) = audit_client_from_config(&config.backend)?;
    Ok((PhaseController::new(trajectories, audit, now), outcomes))
}
