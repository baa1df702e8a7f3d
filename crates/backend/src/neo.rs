//! Near-Earth object catalog payloads used by the scenario selection aid.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeoRef {
    pub spkid: serde_json::Value,
    pub name: String,
}

/// Reply of `GET /neos/curated_list`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CuratedNeoList {
    #[serde(default)]
    pub planet_killers: Vec<NeoRef>,
    #[serde(default)]
    pub city_killers: Vec<NeoRef>,
}

impl CuratedNeoList {
    pub fn is_empty(&self) -> bool {
        self.planet_killers.is_empty() && self.city_killers.is_empty()
    }
}

/// Element of `GET /neos/list`; only the name is interpreted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeoSummary {
    pub name: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl NeoSummary {
    /// Absolute magnitude, when the entry carries a numeric `h_mag`.
    pub fn h_mag(&self) -> Option<f64> {
        self.extra.get("h_mag").and_then(serde_json::Value::as_f64)
    }

    pub fn is_pha(&self) -> bool {
        self.extra
            .get("is_pha")
            .and_then(serde_json::Value::as_bool)
            .unwrap_or(false)
    }

    pub fn classification(&self) -> NeoClassification {
        classify_neo(self.h_mag(), self.is_pha())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NeoClassification {
    PlanetKiller,
    CityKiller,
    Pha,
    Regular,
}

impl NeoClassification {
    pub fn label(self) -> &'static str {
        match self {
            NeoClassification::PlanetKiller => "PLANET_KILLER",
            NeoClassification::CityKiller => "CITY_KILLER",
            NeoClassification::Pha => "PHA",
            NeoClassification::Regular => "REGULAR",
        }
    }
}

/// Classify an object by absolute magnitude, falling back to its hazard flag.
pub fn classify_neo(h_mag: Option<f64>, is_pha: bool) -> NeoClassification {
    if let Some(h) = h_mag {
        if h < 18.0 {
            return NeoClassification::PlanetKiller;
        }
        if h < 22.0 {
            return NeoClassification::CityKiller;
        }
    }
    if is_pha {
        NeoClassification::Pha
    } else {
        NeoClassification::Regular
    }
}
