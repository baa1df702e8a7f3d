//! Equipment selection made during the design phase.

use defense_catalog::{MaterialKind, PropulsionKind, VehicleKind};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DesignSelection {
    pub vehicle: VehicleKind,
    pub propulsion: PropulsionKind,
    pub material: MaterialKind,
    /// Requested impactor mass; clamped to the material's bounds when applied.
    pub impactor_mass_kg: f64,
    /// Id of the selected trajectory option, if any.
    pub trajectory_id: Option<String>,
}

impl Default for DesignSelection {
    /// The first entry of every catalog, no impactor mass and no trajectory.
    fn default() -> Self {
        Self {
            vehicle: VehicleKind::FalconHeavy,
            propulsion: PropulsionKind::Hypergolic,
            material: MaterialKind::Aluminum,
            impactor_mass_kg: 0.0,
            trajectory_id: None,
        }
    }
}

impl DesignSelection {
    /// Copy of the selection with the impactor mass clamped to the material's bounds.
    pub fn clamped(&self) -> Self {
        Self {
            impactor_mass_kg: self.material.spec().clamp_mass(self.impactor_mass_kg),
            ..self.clone()
        }
    }
}
