use std::collections::{BTreeMap, HashMap};

use super::{
    AttachmentStore, ComponentStore, ControllerAttachment, InputStore, System, SystemId,
    SystemStore,
};
use crate::components::{Component, ComponentInput};
use crate::error::StoreError;

type Key = (SystemId, String);

/// In-process store holding everything in maps.
///
/// Components keep their insertion order per system.
#[derive(Debug, Default)]
pub struct MemoryStore {
    systems: BTreeMap<SystemId, System>,
    components: Vec<Component>,
    inputs: HashMap<Key, ComponentInput>,
    attachments: HashMap<Key, ControllerAttachment>,
    next_id: u64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_system(&self, id: SystemId) -> Result<(), StoreError> {
        if self.systems.contains_key(&id) {
            Ok(())
        } else {
            Err(StoreError::UnknownSystem(id))
        }
    }
}

fn key(system: SystemId, component: &str) -> Key {
    (system, component.to_string())
}

impl SystemStore for MemoryStore {
    fn create_system(&mut self, name: &str) -> SystemId {
        self.next_id += 1;
        let id = SystemId(self.next_id);
        self.systems.insert(
            id,
            System {
                id,
                name: name.to_string(),
                result: None,
            },
        );
        id
    }

    fn system(&self, id: SystemId) -> Result<System, StoreError> {
        self.systems
            .get(&id)
            .cloned()
            .ok_or(StoreError::UnknownSystem(id))
    }

    fn set_result(&mut self, id: SystemId, result: String) -> Result<(), StoreError> {
        let system = self
            .systems
            .get_mut(&id)
            .ok_or(StoreError::UnknownSystem(id))?;
        system.result = Some(result);
        Ok(())
    }
}

impl ComponentStore for MemoryStore {
    fn insert_component(&mut self, component: Component) -> Result<(), StoreError> {
        self.ensure_system(component.system)?;
        let taken = self
            .components
            .iter()
            .any(|c| c.system == component.system && c.name == component.name);
        if taken {
            return Err(StoreError::DuplicateComponent {
                system: component.system,
                name: component.name,
            });
        }
        self.components.push(component);
        Ok(())
    }

    fn components(&self, system: SystemId) -> Result<Vec<Component>, StoreError> {
        self.ensure_system(system)?;
        Ok(self
            .components
            .iter()
            .filter(|c| c.system == system)
            .cloned()
            .collect())
    }

    fn delete_component(&mut self, system: SystemId, name: &str) -> Result<Component, StoreError> {
        self.ensure_system(system)?;
        let idx = self
            .components
            .iter()
            .position(|c| c.system == system && c.name == name)
            .ok_or_else(|| StoreError::UnknownComponent {
                system,
                name: name.to_string(),
            })?;
        Ok(self.components.remove(idx))
    }
}

impl InputStore for MemoryStore {
    fn input(&self, system: SystemId, component: &str) -> Option<ComponentInput> {
        self.inputs.get(&key(system, component)).cloned()
    }

    fn put_input(
        &mut self,
        system: SystemId,
        component: &str,
        input: ComponentInput,
    ) -> Result<(), StoreError> {
        self.ensure_system(system)?;
        self.inputs.insert(key(system, component), input);
        Ok(())
    }

    fn remove_input(&mut self, system: SystemId, component: &str) {
        self.inputs.remove(&key(system, component));
    }
}

impl AttachmentStore for MemoryStore {
    fn attachment(&self, system: SystemId, component: &str) -> Option<ControllerAttachment> {
        self.attachments.get(&key(system, component)).cloned()
    }

    fn create_attachment(
        &mut self,
        system: SystemId,
        component: &str,
        mode: &str,
    ) -> Result<(), StoreError> {
        self.ensure_system(system)?;
        self.attachments
            .entry(key(system, component))
            .or_insert_with(|| ControllerAttachment {
                system,
                component: component.to_string(),
                controller: None,
                mode: mode.to_string(),
                configured: false,
            });
        Ok(())
    }

    fn update_attachment(
        &mut self,
        system: SystemId,
        component: &str,
        controller: Option<String>,
        mode: &str,
        configured: bool,
    ) -> Result<(), StoreError> {
        let attachment = self
            .attachments
            .get_mut(&key(system, component))
            .ok_or_else(|| StoreError::UnknownComponent {
                system,
                name: component.to_string(),
            })?;
        attachment.controller = controller;
        attachment.mode = mode.to_string();
        attachment.configured = configured;
        Ok(())
    }

    fn remove_attachment(&mut self, system: SystemId, component: &str) {
        self.attachments.remove(&key(system, component));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::ComponentType;

    #[test]
    fn systems_get_distinct_ids() {
        let mut store = MemoryStore::new();
        let a = store.create_system("A");
        let b = store.create_system("B");
        assert_ne!(a, b);
        assert_eq!(store.system(a).map(|s| s.name).ok().as_deref(), Some("A"));
    }

    #[test]
    fn duplicate_names_rejected_per_system() {
        let mut store = MemoryStore::new();
        let a = store.create_system("A");
        let b = store.create_system("B");
        assert!(store.insert_component(Component::new(a, ComponentType::Grid, 1)).is_ok());
        assert!(store.insert_component(Component::new(a, ComponentType::Grid, 1)).is_err());
        assert!(store.insert_component(Component::new(b, ComponentType::Grid, 1)).is_ok());
    }

    #[test]
    fn components_are_scoped_and_ordered() {
        let mut store = MemoryStore::new();
        let a = store.create_system("A");
        let b = store.create_system("B");
        for (sys, t, n) in [
            (a, ComponentType::Battery, 1),
            (b, ComponentType::Solar, 1),
            (a, ComponentType::Grid, 1),
            (a, ComponentType::Battery, 2),
        ] {
            assert!(store.insert_component(Component::new(sys, t, n)).is_ok());
        }
        let names: Vec<String> = store
            .components(a)
            .unwrap_or_default()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, ["btt1", "grd1", "btt2"]);
        let batteries = store.components_of_type(a, ComponentType::Battery);
        assert_eq!(batteries.map(|v| v.len()).ok(), Some(2));
    }

    #[test]
    fn unknown_system_is_an_error() {
        let store = MemoryStore::new();
        assert_eq!(
            store.components(SystemId(9)),
            Err(StoreError::UnknownSystem(SystemId(9)))
        );
    }

    #[test]
    fn create_attachment_keeps_existing() {
        let mut store = MemoryStore::new();
        let a = store.create_system("A");
        assert!(store.create_attachment(a, "btt1", "nc").is_ok());
        assert!(
            store
                .update_attachment(a, "btt1", Some("cnt1".into()), "dispatch", true)
                .is_ok()
        );
        assert!(store.create_attachment(a, "btt1", "nc").is_ok());
        let att = store.attachment(a, "btt1");
        assert_eq!(att.map(|x| (x.mode, x.configured)), Some(("dispatch".into(), true)));
    }
}
