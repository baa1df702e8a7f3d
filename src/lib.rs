//! Planetary defense mission planning core.
//!
//! The logic lives in the workspace crates; this façade re-exports them so that
//! front-ends and integration tests can depend on a single package.

pub use defense_backend as backend;
pub use defense_catalog as catalog;
pub use defense_config as config;
pub use defense_core as primitives;
pub use defense_export as export;
pub use defense_feasibility as feasibility;
pub use defense_mission as mission;

/// Returns the version of the library for smoke tests.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
