//! Configuration models and loaders for the planetary defense simulation.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

/// Environment variable that overrides `backend.base_url`.
pub const BACKEND_URL_ENV: &str = "DEFENSE_BACKEND_URL";

/// Longest scenario the simulated clock is configured for (one century).
pub const MAX_TIME_TO_IMPACT_DAYS: f64 = 36_525.0;

/// Top-level simulation settings.
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct SimulationConfig {
    pub backend: BackendConfig,
    pub scenario: ScenarioConfig,
    pub logging: LoggingConfig,
    /// Overrides the built-in trajectory options when non-empty.
    pub trajectories: Vec<TrajectoryConfig>,
}

/// Connection settings for the simulation backend.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct BackendConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    /// When false, decisions are committed locally without contacting the audit ledger.
    pub audit_enabled: bool,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8001".to_string(),
            timeout_secs: 5,
            audit_enabled: true,
        }
    }
}

/// Scenario timing used when the trajectory asset does not provide its own clock.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ScenarioConfig {
    pub time_to_impact_days: f64,
    /// Simulated start instant; the wall clock is used when absent.
    pub start_epoch: Option<DateTime<Utc>>,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            time_to_impact_days: 90.0,
            start_epoch: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Pretty,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Compact,
        }
    }
}

/// Trajectory option as written in configuration files.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct TrajectoryConfig {
    pub id: String,
    #[serde(default)]
    pub label: Option<String>,
    pub transfer_time_days: f64,
    pub required_delta_v_ms: f64,
    #[serde(default = "default_profile")]
    pub profile: u8,
}

fn default_profile() -> u8 {
    1
}

/// Errors that can occur while loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("unsupported config format: {0}")]
    UnsupportedFormat(String),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl SimulationConfig {
    /// Apply environment overrides using the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary key lookup.
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(BACKEND_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.backend.base_url = url.trim().to_string();
        }
    }

    /// Reject values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.backend.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("backend.base_url must not be empty".into()));
        }
        if self.backend.timeout_secs == 0 {
            return Err(ConfigError::Invalid("backend.timeout_secs must be positive".into()));
        }
        let days = self.scenario.time_to_impact_days;
        if !(days.is_finite() && days > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "scenario.time_to_impact_days must be positive (got {days})"
            )));
        }
        if days > MAX_TIME_TO_IMPACT_DAYS {
            return Err(ConfigError::Invalid(format!(
                "scenario.time_to_impact_days must not exceed {MAX_TIME_TO_IMPACT_DAYS} (got {days})"
            )));
        }
        Ok(())
    }
}

/// Load simulation settings from a TOML or YAML file, then apply environment overrides.
pub fn load_simulation_config<P: AsRef<Path>>(path: P) -> Result<SimulationConfig, ConfigError> {
    let mut config = parse_file(path.as_ref())?;
    config.apply_env_overrides();
    config.validate()?;
    Ok(config)
}

/// Like [`load_simulation_config`], but a missing path yields the defaults.
pub fn load_or_default(path: Option<&Path>) -> Result<SimulationConfig, ConfigError> {
    match path {
        Some(path) if path.exists() => load_simulation_config(path),
        _ => {
            let mut config = SimulationConfig::default();
            config.apply_env_overrides();
            config.validate()?;
            Ok(config)
        }
    }
}

fn parse_file(path: &Path) -> Result<SimulationConfig, ConfigError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());
    let contents = std::fs::read_to_string(path)?;
    match extension.as_deref() {
        Some("toml") => Ok(toml::from_str(&contents)?),
        Some("yaml") | Some("yml") => Ok(serde_yaml::from_str(&contents)?),
        _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
    }
}
