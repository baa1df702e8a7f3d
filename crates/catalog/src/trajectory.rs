//! Precomputed intercept trajectories offered for operator selection.

use serde::{Deserialize, Serialize};

use crate::CatalogError;

/// One precomputed transfer option (a porkchop-plot pick).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryOption {
    pub id: String,
    pub label: String,
    pub transfer_time_days: f64,
    pub required_delta_v_ms: f64,
    /// Ascent profile index consumed by the trajectory renderer.
    pub profile: u8,
}

impl TrajectoryOption {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        transfer_time_days: f64,
        required_delta_v_ms: f64,
        profile: u8,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            transfer_time_days,
            required_delta_v_ms,
            profile,
        }
    }
}

/// Ordered, immutable set of trajectory options with unique ids.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrajectoryCatalog {
    options: Vec<TrajectoryOption>,
}

impl TrajectoryCatalog {
    /// Build a catalog, rejecting empty sets, duplicate ids and non-physical values.
    pub fn new(options: Vec<TrajectoryOption>) -> Result<Self, CatalogError> {
        if options.is_empty() {
            return Err(CatalogError::EmptyTrajectoryCatalog);
        }
        for (idx, option) in options.iter().enumerate() {
            if !(option.transfer_time_days.is_finite() && option.transfer_time_days > 0.0) {
                return Err(CatalogError::InvalidTrajectory {
                    id: option.id.clone(),
                    reason: "transfer time must be positive",
                });
            }
            if !(option.required_delta_v_ms.is_finite() && option.required_delta_v_ms >= 0.0) {
                return Err(CatalogError::InvalidTrajectory {
                    id: option.id.clone(),
                    reason: "required delta-v must be non-negative",
                });
            }
            if options[..idx].iter().any(|other| other.id == option.id) {
                return Err(CatalogError::DuplicateTrajectory(option.id.clone()));
            }
        }
        Ok(Self { options })
    }

    pub fn options(&self) -> &[TrajectoryOption] {
        &self.options
    }

    /// Look up an option by id (case-insensitive).
    pub fn get(&self, id: &str) -> Result<&TrajectoryOption, CatalogError> {
        self.options
            .iter()
            .find(|opt| opt.id.eq_ignore_ascii_case(id.trim()))
            .ok_or_else(|| CatalogError::UnknownTrajectory(id.to_string()))
    }
}

impl Default for TrajectoryCatalog {
    /// The three transfer windows shipped with the Impactor 2025 scenario.
    fn default() -> Self {
        Self {
            options: vec![
                TrajectoryOption::new("fast", "Direct intercept", 30.0, 8_000.0, 1),
                TrajectoryOption::new("balanced", "Balanced transfer", 45.0, 5_000.0, 2),
                TrajectoryOption::new("efficient", "Low-energy transfer", 60.0, 3_500.0, 3),
            ],
        }
    }
}
