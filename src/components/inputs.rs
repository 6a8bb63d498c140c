//! Typed input records stored alongside each component, and creation requests.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::types::ComponentType;

/// Key of the derived series inside demand and solar records.
pub const SERIES_FIELD: &str = "data";

/// Uploaded demand profile with its derived hourly series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandInput {
    /// Name of the uploaded file the series was read from.
    pub file: String,
    /// Hourly demand (kW) in file order.
    pub data: Vec<f64>,
}

/// Solar array parameters with the synthesized generation profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolarInput {
    /// Array capacity (kW).
    pub system_capacity: f64,
    /// Fixed installation cost.
    pub base_cost: f64,
    /// Cost per installed watt.
    pub perw_cost: f64,
    /// Hourly generation (kW).
    pub data: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BatteryInput {
    /// Usable energy capacity (kWh).
    pub energy_capacity: f64,
    /// Lower state-of-charge bound (0.0–1.0).
    pub soc_min: f64,
    /// Upper state-of-charge bound (0.0–1.0).
    pub soc_max: f64,
    pub base_cost: f64,
    /// Cost per kWh of capacity.
    pub energy_cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeneratorInput {
    /// Rated power (kW).
    pub power: f64,
    pub base_cost: f64,
    /// Fuel cost per kWh generated.
    pub fuel_cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConverterInput {
    /// Rated power (kW).
    pub power: f64,
    pub base_cost: f64,
    /// Cost per kW of rating.
    pub power_cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GridInput {
    /// Import tariff per kWh.
    pub energy_cost: f64,
    /// Whether exports are credited under net metering.
    pub nm_allowed: bool,
}

/// Input record of one component. Exactly one exists per component.
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentInput {
    Demand(DemandInput),
    Solar(SolarInput),
    Battery(BatteryInput),
    Generator(GeneratorInput),
    Converter(ConverterInput),
    Controller,
    Grid(GridInput),
}

impl ComponentInput {
    pub fn component_type(&self) -> ComponentType {
        match self {
            ComponentInput::Demand(_) => ComponentType::Demand,
            ComponentInput::Solar(_) => ComponentType::Solar,
            ComponentInput::Battery(_) => ComponentType::Battery,
            ComponentInput::Generator(_) => ComponentType::Generator,
            ComponentInput::Converter(_) => ComponentType::Converter,
            ComponentInput::Controller => ComponentType::Controller,
            ComponentInput::Grid(_) => ComponentType::Grid,
        }
    }

    /// Derived series, for the two types that have one.
    pub fn series(&self) -> Option<&[f64]> {
        match self {
            ComponentInput::Demand(d) => Some(&d.data),
            ComponentInput::Solar(s) => Some(&s.data),
            _ => None,
        }
    }

    /// Fields shown when a component is inspected, in display order.
    pub fn spec_fields(&self) -> Vec<(&'static str, String)> {
        match self {
            ComponentInput::Demand(_) | ComponentInput::Controller => Vec::new(),
            ComponentInput::Solar(s) => vec![
                ("system_capacity", s.system_capacity.to_string()),
                ("base_cost", s.base_cost.to_string()),
                ("perw_cost", s.perw_cost.to_string()),
            ],
            ComponentInput::Battery(b) => vec![
                ("energy_capacity", b.energy_capacity.to_string()),
                ("soc_min", b.soc_min.to_string()),
                ("soc_max", b.soc_max.to_string()),
                ("base_cost", b.base_cost.to_string()),
                ("energy_cost", b.energy_cost.to_string()),
            ],
            ComponentInput::Generator(g) => vec![
                ("power", g.power.to_string()),
                ("base_cost", g.base_cost.to_string()),
                ("fuel_cost", g.fuel_cost.to_string()),
            ],
            ComponentInput::Converter(c) => vec![
                ("power", c.power.to_string()),
                ("base_cost", c.base_cost.to_string()),
                ("power_cost", c.power_cost.to_string()),
            ],
            ComponentInput::Grid(g) => vec![
                ("energy_cost", g.energy_cost.to_string()),
                ("nm_allowed", g.nm_allowed.to_string()),
            ],
        }
    }

    /// All stored fields as a JSON object, derived series included.
    pub fn to_fields(&self) -> Result<Map<String, Value>, serde_json::Error> {
        let value = match self {
            ComponentInput::Demand(d) => serde_json::to_value(d)?,
            ComponentInput::Solar(s) => serde_json::to_value(s)?,
            ComponentInput::Battery(b) => serde_json::to_value(b)?,
            ComponentInput::Generator(g) => serde_json::to_value(g)?,
            ComponentInput::Converter(c) => serde_json::to_value(c)?,
            ComponentInput::Controller => Value::Object(Map::new()),
            ComponentInput::Grid(g) => serde_json::to_value(g)?,
        };
        match value {
            Value::Object(map) => Ok(map),
            _ => Ok(Map::new()),
        }
    }

    /// Fields echoed to the simulator: the stored record minus its derived series.
    pub fn document_fields(&self) -> Result<Map<String, Value>, serde_json::Error> {
        let mut fields = self.to_fields()?;
        if self.series().is_some() {
            fields.remove(SERIES_FIELD);
        }
        Ok(fields)
    }
}

/// Raw demand upload as received from the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct DemandUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Solar array parameters submitted by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SolarRequest {
    pub system_capacity: f64,
    pub base_cost: f64,
    pub perw_cost: f64,
}

/// A request to add one component to a system.
///
/// The variant decides the component type; demand and solar requests are
/// expanded into full inputs by their data generators.
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentRequest {
    Demand(DemandUpload),
    Solar(SolarRequest),
    Battery(BatteryInput),
    Generator(GeneratorInput),
    Converter(ConverterInput),
    Controller,
    Grid(GridInput),
}

impl ComponentRequest {
    pub fn component_type(&self) -> ComponentType {
        match self {
            ComponentRequest::Demand(_) => ComponentType::Demand,
            ComponentRequest::Solar(_) => ComponentType::Solar,
            ComponentRequest::Battery(_) => ComponentType::Battery,
            ComponentRequest::Generator(_) => ComponentType::Generator,
            ComponentRequest::Converter(_) => ComponentType::Converter,
            ComponentRequest::Controller => ComponentType::Controller,
            ComponentRequest::Grid(_) => ComponentType::Grid,
        }
    }
}
