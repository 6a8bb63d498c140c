//! Declarative system plans read by the command-line tool.
//!
//! ```toml
//! name = "island"
//!
//! [[component]]
//! type = "demand"
//! file = "load.csv"
//!
//! [[component]]
//! type = "battery"
//! energy_capacity = 10.0
//! soc_min = 0.2
//! soc_max = 0.9
//! base_cost = 500.0
//! energy_cost = 300.0
//!
//! [[attach]]
//! component = "btt1"
//! controller = "cnt1"
//! mode = "dispatch"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::assembly::Assembler;
use crate::components::inputs::{BatteryInput, ConverterInput, GeneratorInput, GridInput};
use crate::components::{ComponentRequest, DemandUpload, SolarRequest};
use crate::error::AssemblyError;
use crate::store::{Store, SystemId};

#[derive(Error, Debug)]
pub enum PlanError {
    #[error("cannot read \"{path}\": {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid plan: {0}")]
    Parse(#[from] toml::de::Error),

    #[error(transparent)]
    Assembly(#[from] AssemblyError),
}

/// A system to assemble: its components in creation order, then attachments.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SystemPlan {
    pub name: String,
    #[serde(default, rename = "component")]
    pub components: Vec<PlannedComponent>,
    #[serde(default, rename = "attach")]
    pub attachments: Vec<PlannedAttachment>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PlannedComponent {
    /// Demand profile read from a CSV file relative to the plan.
    Demand { file: PathBuf },
    Solar(SolarRequest),
    Battery(BatteryInput),
    Generator(GeneratorInput),
    Converter(ConverterInput),
    Controller,
    Grid(GridInput),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlannedAttachment {
    pub component: String,
    pub controller: String,
    pub mode: String,
}

impl PlannedComponent {
    fn request(&self, base_dir: &Path) -> Result<ComponentRequest, PlanError> {
        Ok(match self {
            PlannedComponent::Demand { file } => {
                let path = base_dir.join(file);
                let bytes = fs::read(&path).map_err(|source| PlanError::Read {
                    path: path.clone(),
                    source,
                })?;
                let file_name = file
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| file.display().to_string());
                ComponentRequest::Demand(DemandUpload { file_name, bytes })
            }
            PlannedComponent::Solar(s) => ComponentRequest::Solar(*s),
            PlannedComponent::Battery(b) => ComponentRequest::Battery(b.clone()),
            PlannedComponent::Generator(g) => ComponentRequest::Generator(g.clone()),
            PlannedComponent::Converter(c) => ComponentRequest::Converter(c.clone()),
            PlannedComponent::Controller => ComponentRequest::Controller,
            PlannedComponent::Grid(g) => ComponentRequest::Grid(g.clone()),
        })
    }
}

impl SystemPlan {
    pub fn from_toml_str(s: &str) -> Result<Self, PlanError> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_toml_file(path: &Path) -> Result<Self, PlanError> {
        let content = fs::read_to_string(path).map_err(|source| PlanError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Creates the planned system and returns its id.
    ///
    /// Demand files are resolved against `base_dir`. Stops at the first
    /// failing step; components added before it stay in the system.
    pub fn apply<S: Store>(
        &self,
        assembler: &mut Assembler<S>,
        base_dir: &Path,
    ) -> Result<SystemId, PlanError> {
        let system = assembler.create_system(&self.name);
        for planned in &self.components {
            assembler.add_component(system, planned.request(base_dir)?)?;
        }
        for a in &self.attachments {
            assembler.attach(system, &a.component, &a.controller, &a.mode)?;
        }
        info!(
            %system,
            name = %self.name,
            components = self.components.len(),
            attachments = self.attachments.len(),
            "applied system plan"
        );
        Ok(system)
    }
}
