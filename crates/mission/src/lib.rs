//! Mission phase controller for the planetary defense scenario.
//!
//! The controller is the single owner of [`MissionState`]. Adapters feed it operator
//! commands, clock ticks and audit outcomes, then drain the resulting
//! [`MissionEvent`]s to render.

pub mod controller;
pub mod design;
pub mod events;
pub mod observation;
pub mod setup;
pub mod state;
pub mod timer;

pub use controller::{DecisionReport, PhaseController, PhaseError, ScenarioAsset};
pub use design::DesignSelection;
pub use events::MissionEvent;
pub use observation::{OBSERVATIONS_TO_CONFIRM, ObservationReport, milestone};
pub use setup::{
    SetupError, audit_client_from_config, controller_from_config, trajectory_catalog_from_config,
};
pub use state::{MissionOutcome, MissionState, Phase, starting_budget_for};
pub use timer::{IMPACT_DISPLAY, TimerService, TimerUpdate};
