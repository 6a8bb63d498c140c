//! Serialization of a whole system into one simulator input document.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::components::{ComponentType, Zone};
use crate::error::{AssemblyError, AssemblyResult};
use crate::store::{AttachmentStore, ComponentStore, ControllerAttachment, InputStore, SystemId};

/// Simulator input: every component of a system keyed by name.
///
/// Serializes as `{"components": {"<name>": {"type", "zone", "input", "configure"}}}`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SystemDocument {
    pub components: BTreeMap<String, ComponentEntry>,
}

/// One component inside a [`SystemDocument`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentEntry {
    #[serde(rename = "type")]
    pub component_type: ComponentType,
    pub zone: Zone,
    /// Static input fields; derived series are not echoed.
    pub input: Map<String, Value>,
    /// Controller configuration, `{}` when the component has none.
    pub configure: Map<String, Value>,
}

impl SystemDocument {
    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&ComponentEntry> {
        self.components.get(name)
    }

    pub fn to_value(&self) -> AssemblyResult<Value> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn to_json(&self) -> AssemblyResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> AssemblyResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(s: &str) -> AssemblyResult<Self> {
        Ok(serde_json::from_str(s)?)
    }
}

/// Controller block of a component as echoed to the simulator.
fn configure_block(attachment: Option<ControllerAttachment>) -> Map<String, Value> {
    let mut block = Map::new();
    if let Some(attachment) = attachment {
        block.insert("mode".to_string(), Value::String(attachment.mode));
    }
    block
}

/// Builds the simulator document from the current state of `system`.
///
/// Read-only over the store. Every stored component appears in the output.
///
/// # Errors
///
/// Returns [`AssemblyError::MissingInput`] if any component lacks its input
/// record; no partial document is produced.
pub fn build<S>(store: &S, system: SystemId) -> AssemblyResult<SystemDocument>
where
    S: ComponentStore + InputStore + AttachmentStore + ?Sized,
{
    let mut components = BTreeMap::new();
    for component in store.components(system)? {
        let input = store
            .input(system, &component.name)
            .filter(|i| i.component_type() == component.component_type)
            .ok_or_else(|| AssemblyError::MissingInput {
                name: component.name.clone(),
                component_type: component.component_type,
            })?;

        let entry = ComponentEntry {
            component_type: component.component_type,
            zone: component.zone,
            input: input.document_fields()?,
            configure: configure_block(store.attachment(system, &component.name)),
        };
        components.insert(component.name, entry);
    }
    debug!(%system, components = components.len(), "built system document");
    Ok(SystemDocument { components })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::assembly::membership;
    use crate::components::inputs::{BatteryInput, GridInput, SolarInput};
    use crate::components::{Component, ComponentInput};
    use crate::store::{MemoryStore, SystemStore};

    fn add(store: &mut MemoryStore, sys: SystemId, t: ComponentType, input: ComponentInput) {
        let c = Component::new(sys, t, 1);
        assert!(store.insert_component(c.clone()).is_ok());
        assert!(store.put_input(sys, &c.name, input).is_ok());
        assert!(membership::register(store, &c, "nc").is_ok());
    }

    fn sample() -> (MemoryStore, SystemId) {
        let mut store = MemoryStore::new();
        let sys = store.create_system("S1");
        add(
            &mut store,
            sys,
            ComponentType::Grid,
            ComponentInput::Grid(GridInput {
                energy_cost: 0.12,
                nm_allowed: false,
            }),
        );
        add(
            &mut store,
            sys,
            ComponentType::Solar,
            ComponentInput::Solar(SolarInput {
                system_capacity: 5.0,
                base_cost: 1000.0,
                perw_cost: 0.5,
                data: vec![0.0, 2.0, 0.0],
            }),
        );
        add(
            &mut store,
            sys,
            ComponentType::Battery,
            ComponentInput::Battery(BatteryInput {
                energy_capacity: 10.0,
                soc_min: 0.2,
                soc_max: 0.9,
                base_cost: 500.0,
                energy_cost: 300.0,
            }),
        );
        (store, sys)
    }

    #[test]
    fn configure_blocks_follow_attachments() {
        let (mut store, sys) = sample();
        let attached = membership::attach(&mut store, sys, "btt1", "cnt1", "dispatch");
        assert!(attached.is_ok());

        let doc = build(&store, sys).unwrap_or_default();
        assert_eq!(doc.len(), 3);
        let configure = |name: &str| doc.get(name).map(|e| Value::Object(e.configure.clone()));
        assert_eq!(configure("grd1"), Some(json!({})));
        assert_eq!(configure("slr1"), Some(json!({})));
        assert_eq!(configure("btt1"), Some(json!({"mode": "dispatch"})));
    }

    #[test]
    fn unconfigured_member_echoes_default_mode() {
        let (store, sys) = sample();
        let doc = build(&store, sys).unwrap_or_default();
        let block = doc.get("btt1").map(|e| Value::Object(e.configure.clone()));
        assert_eq!(block, Some(json!({"mode": "nc"})));
    }

    #[test]
    fn series_is_not_echoed() {
        let (store, sys) = sample();
        let doc = build(&store, sys).unwrap_or_default();
        let solar = doc.get("slr1").map(|e| Value::Object(e.input.clone()));
        assert_eq!(
            solar,
            Some(json!({"system_capacity": 5.0, "base_cost": 1000.0, "perw_cost": 0.5}))
        );
    }

    #[test]
    fn entries_carry_type_and_zone_without_sequence() {
        let (store, sys) = sample();
        let value = build(&store, sys).and_then(|d| d.to_value()).ok();
        let grid = value.as_ref().map(|v| &v["components"]["grd1"]);
        assert_eq!(grid.map(|g| &g["type"]), Some(&json!("grid")));
        assert_eq!(grid.map(|g| &g["zone"]), Some(&json!(2)));
        assert_eq!(grid.and_then(|g| g.get("sequence")), None);
    }

    #[test]
    fn missing_input_aborts_the_build() {
        let (mut store, sys) = sample();
        store.remove_input(sys, "slr1");
        match build(&store, sys) {
            Err(AssemblyError::MissingInput { name, component_type }) => {
                assert_eq!(name, "slr1");
                assert_eq!(component_type, ComponentType::Solar);
            }
            other => panic!("expected MissingInput, got {other:?}"),
        }
    }

    #[test]
    fn mismatched_input_counts_as_missing() {
        let (mut store, sys) = sample();
        assert!(store.put_input(sys, "grd1", ComponentInput::Controller).is_ok());
        assert!(matches!(
            build(&store, sys),
            Err(AssemblyError::MissingInput { .. })
        ));
    }

    #[test]
    fn json_text_round_trips() {
        let (store, sys) = sample();
        let doc = build(&store, sys).unwrap_or_default();
        let text = doc.to_json().unwrap_or_default();
        let back = SystemDocument::from_json(&text).ok();
        assert_eq!(back.as_ref(), Some(&doc));
    }

    #[test]
    fn empty_system_builds_empty_document() {
        let mut store = MemoryStore::new();
        let sys = store.create_system("empty");
        let doc = build(&store, sys).ok();
        assert_eq!(doc.map(|d| d.is_empty()), Some(true));
    }
}
