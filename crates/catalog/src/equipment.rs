//! Fixed equipment tables: launch vehicles, propulsion systems and impactor materials.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::CatalogError;

/// Launch vehicle capabilities used by the feasibility model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LaunchVehicle {
    pub name: &'static str,
    /// Procurement cost in billions.
    pub cost_b: f64,
    pub max_payload_kg: f64,
    pub construction_time_days: f64,
    pub reliability: f64,
    pub escape_burn_hours: f64,
    pub spec: &'static str,
}

/// In-space propulsion stage carried with the impactor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropulsionSystem {
    pub name: &'static str,
    /// Procurement cost in billions.
    pub cost_b: f64,
    pub mass_kg: f64,
    pub isp_s: f64,
    pub construction_time_days: f64,
    pub reliability: f64,
    pub spec: &'static str,
}

/// Kinetic impactor material. `max_mass_kg` bounds the impactor mass selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImpactorMaterial {
    pub name: &'static str,
    pub density_kg_m3: f64,
    /// Momentum multiplication factor.
    pub beta: f64,
    pub max_mass_kg: f64,
    pub spec: &'static str,
}

impl ImpactorMaterial {
    /// Clamp a requested impactor mass into `[0, max_mass_kg]`. Non-finite requests map to zero.
    pub fn clamp_mass(&self, requested_kg: f64) -> f64 {
        if requested_kg.is_nan() {
            return 0.0;
        }
        requested_kg.clamp(0.0, self.max_mass_kg)
    }
}

static FALCON_HEAVY: LaunchVehicle = LaunchVehicle {
    name: "Falcon Heavy",
    cost_b: 0.15,
    max_payload_kg: 26_700.0,
    construction_time_days: 20.0,
    reliability: 0.98,
    escape_burn_hours: 12.0,
    spec: "Cost: $150M | Max Payload: 26,700 kg",
};

static SLS_BLOCK_1: LaunchVehicle = LaunchVehicle {
    name: "SLS Block 1",
    cost_b: 2.0,
    max_payload_kg: 95_000.0,
    construction_time_days: 40.0,
    reliability: 0.92,
    escape_burn_hours: 4.0,
    spec: "Cost: $2.0B | Max Payload: 95,000 kg",
};

static HYPERGOLIC: PropulsionSystem = PropulsionSystem {
    name: "Hypergolic Bipropellant",
    cost_b: 0.05,
    mass_kg: 500.0,
    isp_s: 320.0,
    construction_time_days: 5.0,
    reliability: 0.99,
    spec: "Isp: 320s | Mass: 500 kg",
};

static ION_DRIVE: PropulsionSystem = PropulsionSystem {
    name: "Ion Drive (NEXT-C)",
    cost_b: 0.10,
    mass_kg: 800.0,
    isp_s: 4_100.0,
    construction_time_days: 10.0,
    reliability: 0.95,
    spec: "Isp: 4,100s | Mass: 800 kg",
};

static ALUMINUM: ImpactorMaterial = ImpactorMaterial {
    name: "Aluminum",
    density_kg_m3: 2_700.0,
    beta: 1.2,
    max_mass_kg: 5_000.0,
    spec: "Low density, standard momentum transfer.",
};

static TUNGSTEN: ImpactorMaterial = ImpactorMaterial {
    name: "Tungsten",
    density_kg_m3: 19_300.0,
    beta: 2.5,
    max_mass_kg: 20_000.0,
    spec: "High density, high momentum transfer (Beta: 2.5).",
};

/// Closed set of launch vehicles on offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleKind {
    FalconHeavy,
    SlsBlock1,
}

impl VehicleKind {
    pub const ALL: [VehicleKind; 2] = [VehicleKind::FalconHeavy, VehicleKind::SlsBlock1];

    pub fn spec(self) -> &'static LaunchVehicle {
        match self {
            VehicleKind::FalconHeavy => &FALCON_HEAVY,
            VehicleKind::SlsBlock1 => &SLS_BLOCK_1,
        }
    }

    /// Stable selection key used by adapters.
    pub fn key(self) -> &'static str {
        match self {
            VehicleKind::FalconHeavy => "falcon_heavy",
            VehicleKind::SlsBlock1 => "sls_block1",
        }
    }
}

/// Closed set of propulsion systems on offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PropulsionKind {
    Hypergolic,
    Electric,
}

impl PropulsionKind {
    pub const ALL: [PropulsionKind; 2] = [PropulsionKind::Hypergolic, PropulsionKind::Electric];

    pub fn spec(self) -> &'static PropulsionSystem {
        match self {
            PropulsionKind::Hypergolic => &HYPERGOLIC,
            PropulsionKind::Electric => &ION_DRIVE,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            PropulsionKind::Hypergolic => "hypergolic",
            PropulsionKind::Electric => "electric",
        }
    }
}

/// Closed set of impactor materials on offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialKind {
    Aluminum,
    Tungsten,
}

impl MaterialKind {
    pub const ALL: [MaterialKind; 2] = [MaterialKind::Aluminum, MaterialKind::Tungsten];

    pub fn spec(self) -> &'static ImpactorMaterial {
        match self {
            MaterialKind::Aluminum => &ALUMINUM,
            MaterialKind::Tungsten => &TUNGSTEN,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            MaterialKind::Aluminum => "aluminum",
            MaterialKind::Tungsten => "tungsten",
        }
    }
}

macro_rules! keyed_enum_parsing {
    ($kind:ty, $err:ident) => {
        impl FromStr for $kind {
            type Err = CatalogError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim().to_ascii_lowercase();
                <$kind>::ALL
                    .into_iter()
                    .find(|kind| kind.key() == wanted || kind.spec().name.to_ascii_lowercase() == wanted)
                    .ok_or_else(|| CatalogError::$err(s.to_string()))
            }
        }

        impl fmt::Display for $kind {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.spec().name)
            }
        }
    };
}

keyed_enum_parsing!(VehicleKind, UnknownVehicle);
keyed_enum_parsing!(PropulsionKind, UnknownPropulsion);
keyed_enum_parsing!(MaterialKind, UnknownMaterial);
