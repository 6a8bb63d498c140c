//! Component type registry: cardinality, control zone, and input builder per type.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The seven kinds of component a microgrid system can contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentType {
    Demand,
    Solar,
    Battery,
    Generator,
    Converter,
    Controller,
    Grid,
}

/// Control zone of a component.
///
/// Serialized as the bare integer (`0`, `1`, `2`) in system documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Zone {
    /// No control: the component is a fixed profile.
    Passive,
    /// Dispatchable: must be attached to a controller before a run.
    Controllable,
    /// The utility connection.
    Grid,
}

/// How many instances of a type a single system may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    Single,
    Unbounded,
}

/// Derived time series a type needs before it can be simulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputBuilder {
    /// Hourly demand read from an uploaded CSV profile.
    DemandFile,
    /// Hourly generation synthesized by a solar resource model.
    SolarResource,
}

/// Static metadata attached to every [`ComponentType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub cardinality: Cardinality,
    pub zone: Zone,
    pub input_builder: Option<InputBuilder>,
}

impl ComponentType {
    /// Every component type, in registry order.
    pub const ALL: [ComponentType; 7] = [
        ComponentType::Demand,
        ComponentType::Solar,
        ComponentType::Battery,
        ComponentType::Generator,
        ComponentType::Converter,
        ComponentType::Controller,
        ComponentType::Grid,
    ];

    /// Returns the registry entry for this type.
    ///
    /// Battery is the only type a system may hold more than once.
    pub fn capabilities(self) -> Capabilities {
        use Cardinality::{Single, Unbounded};

        let (cardinality, zone, input_builder) = match self {
            ComponentType::Demand => (Single, Zone::Passive, Some(InputBuilder::DemandFile)),
            ComponentType::Solar => (Single, Zone::Passive, Some(InputBuilder::SolarResource)),
            ComponentType::Battery => (Unbounded, Zone::Controllable, None),
            ComponentType::Generator => (Single, Zone::Controllable, None),
            ComponentType::Converter => (Single, Zone::Controllable, None),
            ComponentType::Controller => (Single, Zone::Controllable, None),
            ComponentType::Grid => (Single, Zone::Grid, None),
        };
        Capabilities {
            cardinality,
            zone,
            input_builder,
        }
    }

    pub fn zone(self) -> Zone {
        self.capabilities().zone
    }

    pub fn is_single(self) -> bool {
        self.capabilities().cardinality == Cardinality::Single
    }

    /// Lowercase name used in documents and for naming components.
    pub fn as_str(self) -> &'static str {
        match self {
            ComponentType::Demand => "demand",
            ComponentType::Solar => "solar",
            ComponentType::Battery => "battery",
            ComponentType::Generator => "generator",
            ComponentType::Converter => "converter",
            ComponentType::Controller => "controller",
            ComponentType::Grid => "grid",
        }
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComponentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        ComponentType::ALL
            .into_iter()
            .find(|t| t.as_str() == lower)
            .ok_or_else(|| {
                let names: Vec<&str> = ComponentType::ALL.iter().map(|t| t.as_str()).collect();
                format!(
                    "unknown component type \"{s}\", expected one of: {}",
                    names.join(", ")
                )
            })
    }
}

impl From<Zone> for u8 {
    fn from(zone: Zone) -> Self {
        match zone {
            Zone::Passive => 0,
            Zone::Controllable => 1,
            Zone::Grid => 2,
        }
    }
}

impl TryFrom<u8> for Zone {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Zone::Passive),
            1 => Ok(Zone::Controllable),
            2 => Ok(Zone::Grid),
            other => Err(format!("zone must be 0, 1 or 2, got {other}")),
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", u8::from(*self))
    }
}
