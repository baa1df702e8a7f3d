//! Static mission catalogs: launch vehicles, propulsion systems, impactor materials
//! and precomputed trajectory options.
//!
//! Equipment sets are closed enums so that an invalid selection cannot be expressed;
//! the numeric tables behind them are fixed and shared by every scenario run.

pub mod equipment;
pub mod trajectory;

pub use equipment::{
    ImpactorMaterial, LaunchVehicle, MaterialKind, PropulsionKind, PropulsionSystem, VehicleKind,
};
pub use trajectory::{TrajectoryCatalog, TrajectoryOption};

use thiserror::Error;

/// Errors surfaced when resolving catalog entries.
#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    #[error("launch vehicle '{0}' not found in catalog")]
    UnknownVehicle(String),
    #[error("propulsion system '{0}' not found in catalog")]
    UnknownPropulsion(String),
    #[error("impactor material '{0}' not found in catalog")]
    UnknownMaterial(String),
    #[error("trajectory option '{0}' not found in catalog")]
    UnknownTrajectory(String),
    #[error("trajectory catalog is empty")]
    EmptyTrajectoryCatalog,
    #[error("trajectory option '{0}' is listed more than once")]
    DuplicateTrajectory(String),
    #[error("trajectory option '{id}' is invalid: {reason}")]
    InvalidTrajectory { id: String, reason: &'static str },
}
