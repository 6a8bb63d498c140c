//! Projection of simulation results onto named, chartable time series.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{AssemblyError, AssemblyResult};

/// Simulator output keyed by component name.
///
/// Only the `demand` and `soc` series are interpreted; everything else the
/// engine returns is kept as opaque JSON.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResultDocument {
    pub components: BTreeMap<String, ComponentResult>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentResult {
    pub comp_type: String,
    #[serde(default)]
    pub output: ComponentOutput,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ComponentOutput {
    /// Hourly power (kW).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demand: Option<Vec<f64>>,
    /// Hourly battery state of charge.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soc: Option<Vec<f64>>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl ResultDocument {
    /// Parses a result from its JSON value.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// Parses a result cached as JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`AssemblyError::ResultFormat`] if the text is not a result document.
    pub fn from_json_str(s: &str) -> AssemblyResult<Self> {
        serde_json::from_str(s).map_err(AssemblyError::ResultFormat)
    }
}

/// A labelled series, x implied by position (hour index).
#[derive(Debug, Clone, PartialEq)]
pub struct NamedSeries {
    pub name: String,
    pub series: Vec<f64>,
}

impl NamedSeries {
    /// Hour index of every point.
    pub fn hours(&self) -> Vec<f64> {
        (0..self.series.len()).map(|h| h as f64).collect()
    }
}

fn non_empty(series: Option<&Vec<f64>>) -> Option<Vec<f64>> {
    series.filter(|s| !s.is_empty()).cloned()
}

/// Demand series of every component that reports a non-empty one.
pub fn project_demand(result: &ResultDocument) -> Vec<NamedSeries> {
    result
        .components
        .iter()
        .filter_map(|(name, c)| {
            non_empty(c.output.demand.as_ref()).map(|series| NamedSeries {
                name: name.clone(),
                series,
            })
        })
        .collect()
}

/// State-of-charge series of every battery that reports a non-empty one.
pub fn project_state_of_charge(result: &ResultDocument) -> Vec<NamedSeries> {
    result
        .components
        .iter()
        .filter(|(_, c)| c.comp_type == "battery")
        .filter_map(|(name, c)| {
            non_empty(c.output.soc.as_ref()).map(|series| NamedSeries {
                name: name.clone(),
                series,
            })
        })
        .collect()
}

/// Anything that turns `(x, y, label)` triples into a renderable artifact.
pub trait ChartSink {
    type Artifact;

    fn plot(&mut self, xs: &[f64], ys: &[f64], label: &str) -> Self::Artifact;
}

/// Series sharing one pair of axes.
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub x_title: &'static str,
    pub y_title: &'static str,
    pub series: Vec<NamedSeries>,
}

impl Chart {
    /// Hourly demand of every component (kW).
    pub fn demand(result: &ResultDocument) -> Self {
        Self {
            x_title: "Hour",
            y_title: "kW",
            series: project_demand(result),
        }
    }

    /// Hourly state of charge of every battery.
    pub fn state_of_charge(result: &ResultDocument) -> Self {
        Self {
            x_title: "Hour",
            y_title: "soc",
            series: project_state_of_charge(result),
        }
    }

    /// Stored input profile of a single demand or solar component.
    pub fn component_profile(name: &str, series: &[f64]) -> Self {
        Self {
            x_title: "Hour",
            y_title: "kW",
            series: vec![NamedSeries {
                name: name.to_string(),
                series: series.to_vec(),
            }],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Feeds one triple per series to `sink`.
    pub fn render<S: ChartSink>(&self, sink: &mut S) -> Vec<S::Artifact> {
        self.series
            .iter()
            .map(|s| sink.plot(&s.hours(), &s.series, &s.name))
            .collect()
    }
}
