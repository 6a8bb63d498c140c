//! Persistence seams for systems, components, inputs, and controller attachments.
//!
//! The assembler only talks to these traits. [`MemoryStore`] is the bundled
//! implementation; a relational store keyed by `(system, name)` fits the same
//! contracts.

mod memory;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::components::{Component, ComponentInput, ComponentType};
use crate::error::StoreError;

pub use memory::MemoryStore;

/// Identifier of a microgrid system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SystemId(pub u64);

impl fmt::Display for SystemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A microgrid system and the cache of its last simulation result.
#[derive(Debug, Clone, PartialEq)]
pub struct System {
    pub id: SystemId,
    pub name: String,
    /// JSON text of the last successful simulation result.
    pub result: Option<String>,
}

/// Controller membership of a zone-1 component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerAttachment {
    pub system: SystemId,
    pub component: String,
    /// Controller the component was attached to, once configured.
    pub controller: Option<String>,
    pub mode: String,
    pub configured: bool,
}

pub trait SystemStore {
    fn create_system(&mut self, name: &str) -> SystemId;

    /// # Errors
    ///
    /// Returns [`StoreError::UnknownSystem`] if `id` does not exist.
    fn system(&self, id: SystemId) -> Result<System, StoreError>;

    /// Replaces the cached simulation result of a system.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UnknownSystem`] if `id` does not exist.
    fn set_result(&mut self, id: SystemId, result: String) -> Result<(), StoreError>;
}

pub trait ComponentStore {
    /// Persists a new component.
    ///
    /// # Errors
    ///
    /// Fails if the system is unknown or the name is already taken in it.
    fn insert_component(&mut self, component: Component) -> Result<(), StoreError>;

    /// All components of a system in creation order.
    fn components(&self, system: SystemId) -> Result<Vec<Component>, StoreError>;

    fn components_of_type(
        &self,
        system: SystemId,
        component_type: ComponentType,
    ) -> Result<Vec<Component>, StoreError> {
        Ok(self
            .components(system)?
            .into_iter()
            .filter(|c| c.component_type == component_type)
            .collect())
    }

    fn component(&self, system: SystemId, name: &str) -> Result<Component, StoreError> {
        self.components(system)?
            .into_iter()
            .find(|c| c.name == name)
            .ok_or_else(|| StoreError::UnknownComponent {
                system,
                name: name.to_string(),
            })
    }

    /// Removes a component and returns it.
    fn delete_component(&mut self, system: SystemId, name: &str) -> Result<Component, StoreError>;
}

pub trait InputStore {
    fn input(&self, system: SystemId, component: &str) -> Option<ComponentInput>;

    fn put_input(
        &mut self,
        system: SystemId,
        component: &str,
        input: ComponentInput,
    ) -> Result<(), StoreError>;

    fn remove_input(&mut self, system: SystemId, component: &str);
}

pub trait AttachmentStore {
    fn attachment(&self, system: SystemId, component: &str) -> Option<ControllerAttachment>;

    /// Creates an unconfigured attachment; an existing one is left as is.
    fn create_attachment(
        &mut self,
        system: SystemId,
        component: &str,
        mode: &str,
    ) -> Result<(), StoreError>;

    /// # Errors
    ///
    /// Returns [`StoreError::UnknownComponent`] if no attachment exists.
    fn update_attachment(
        &mut self,
        system: SystemId,
        component: &str,
        controller: Option<String>,
        mode: &str,
        configured: bool,
    ) -> Result<(), StoreError>;

    fn remove_attachment(&mut self, system: SystemId, component: &str);
}

/// Everything the assembler needs from persistence.
pub trait Store: SystemStore + ComponentStore + InputStore + AttachmentStore {}

impl<T> Store for T where T: SystemStore + ComponentStore + InputStore + AttachmentStore {}
