//! Component types, naming, inputs, and derived-series generators.

/// Demand profile parsing.
pub mod demand;
pub mod inputs;
pub mod naming;
/// Solar generation profiles.
pub mod solar;
pub mod types;

use serde::{Deserialize, Serialize};

use crate::store::SystemId;

pub use inputs::{ComponentInput, ComponentRequest, DemandUpload, SolarRequest};
pub use solar::{SolarResource, SyntheticSolarResource};
pub use types::{Capabilities, Cardinality, ComponentType, InputBuilder, Zone};

/// A component placed in a system.
///
/// `name` and `sequence` are assigned once at creation; `zone` is copied
/// from the type registry at the same time and never changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub system: SystemId,
    pub name: String,
    pub component_type: ComponentType,
    /// 1-based position among components of the same type.
    pub sequence: u32,
    pub zone: Zone,
}

impl Component {
    /// Builds a component with its registry zone and generated name.
    pub fn new(system: SystemId, component_type: ComponentType, sequence: u32) -> Self {
        Self {
            system,
            name: naming::component_name(component_type, sequence),
            component_type,
            sequence,
            zone: component_type.zone(),
        }
    }

    pub fn is_controllable(&self) -> bool {
        self.zone == Zone::Controllable
    }
}
