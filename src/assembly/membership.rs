//! Controller membership of controllable (zone-1) components.
//!
//! Every zone-1 component owns exactly one [`ControllerAttachment`] from the
//! moment it is created. It starts unconfigured and becomes configured only
//! through [`attach`]; changing the mode afterwards goes through
//! [`reconfigure`]. Attachments never touch component names or identity.

use tracing::{debug, info};

use crate::components::Component;
use crate::error::{AssemblyError, AssemblyResult};
use crate::store::{AttachmentStore, ComponentStore, ControllerAttachment, SystemId};

/// Creates the unconfigured attachment of a freshly created component.
///
/// Components outside zone 1 are ignored.
pub fn register<S: AttachmentStore + ?Sized>(
    store: &mut S,
    component: &Component,
    default_mode: &str,
) -> AssemblyResult<()> {
    if !component.is_controllable() {
        return Ok(());
    }
    store.create_attachment(component.system, &component.name, default_mode)?;
    debug!(system = %component.system, component = %component.name, "registered with controller");
    Ok(())
}

/// Zone-1 components with their attachment, in creation order.
fn memberships<S: ComponentStore + AttachmentStore + ?Sized>(
    store: &S,
    system: SystemId,
) -> AssemblyResult<Vec<(Component, Option<ControllerAttachment>)>> {
    Ok(store
        .components(system)?
        .into_iter()
        .filter(Component::is_controllable)
        .map(|c| {
            let attachment = store.attachment(system, &c.name);
            (c, attachment)
        })
        .collect())
}

/// Zone-1 components not yet attached to a controller.
pub fn list_unconfigured<S: ComponentStore + AttachmentStore + ?Sized>(
    store: &S,
    system: SystemId,
) -> AssemblyResult<Vec<Component>> {
    Ok(memberships(store, system)?
        .into_iter()
        .filter(|(_, a)| !a.as_ref().is_some_and(|a| a.configured))
        .map(|(c, _)| c)
        .collect())
}

/// Zone-1 components attached to a controller.
pub fn list_configured<S: ComponentStore + AttachmentStore + ?Sized>(
    store: &S,
    system: SystemId,
) -> AssemblyResult<Vec<Component>> {
    Ok(memberships(store, system)?
        .into_iter()
        .filter(|(_, a)| a.as_ref().is_some_and(|a| a.configured))
        .map(|(c, _)| c)
        .collect())
}

/// Names of the zone-1 components still waiting for attachment.
pub fn unconfigured_names<S: ComponentStore + AttachmentStore + ?Sized>(
    store: &S,
    system: SystemId,
) -> AssemblyResult<Vec<String>> {
    Ok(list_unconfigured(store, system)?
        .into_iter()
        .map(|c| c.name)
        .collect())
}

fn controllable<S: ComponentStore + ?Sized>(
    store: &S,
    system: SystemId,
    name: &str,
) -> AssemblyResult<Component> {
    let component = store.component(system, name)?;
    if !component.is_controllable() {
        return Err(AssemblyError::NotControllable {
            name: component.name,
            component_type: component.component_type,
        });
    }
    Ok(component)
}

/// Attaches a component to `controller` with the given mode.
///
/// # Errors
///
/// * [`AssemblyError::NotControllable`] for zone 0 and zone 2 components.
/// * [`AssemblyError::AlreadyAttached`] if the component is already configured.
pub fn attach<S: ComponentStore + AttachmentStore + ?Sized>(
    store: &mut S,
    system: SystemId,
    name: &str,
    controller: &str,
    mode: &str,
) -> AssemblyResult<ControllerAttachment> {
    let component = controllable(&*store, system, name)?;
    let existing = store.attachment(system, &component.name);
    if existing.as_ref().is_some_and(|a| a.configured) {
        return Err(AssemblyError::AlreadyAttached(component.name));
    }
    if existing.is_none() {
        // Components created before membership tracking have no row yet.
        store.create_attachment(system, &component.name, mode)?;
    }
    store.update_attachment(system, &component.name, Some(controller.to_string()), mode, true)?;
    info!(%system, component = %component.name, controller, mode, "attached to controller");
    fetch(&*store, system, &component.name)
}

/// Changes the mode of an attached component.
///
/// # Errors
///
/// Returns [`AssemblyError::NotAttached`] if the component is not configured.
pub fn reconfigure<S: ComponentStore + AttachmentStore + ?Sized>(
    store: &mut S,
    system: SystemId,
    name: &str,
    mode: &str,
) -> AssemblyResult<ControllerAttachment> {
    let component = controllable(&*store, system, name)?;
    let current = store
        .attachment(system, &component.name)
        .filter(|a| a.configured)
        .ok_or_else(|| AssemblyError::NotAttached(component.name.clone()))?;
    store.update_attachment(system, &component.name, current.controller, mode, true)?;
    info!(%system, component = %component.name, mode, "controller mode changed");
    fetch(&*store, system, &component.name)
}

/// Returns an attached component to the unconfigured state.
pub fn detach<S: ComponentStore + AttachmentStore + ?Sized>(
    store: &mut S,
    system: SystemId,
    name: &str,
    default_mode: &str,
) -> AssemblyResult<ControllerAttachment> {
    let component = controllable(&*store, system, name)?;
    if store.attachment(system, &component.name).is_none() {
        store.create_attachment(system, &component.name, default_mode)?;
    }
    store.update_attachment(system, &component.name, None, default_mode, false)?;
    info!(%system, component = %component.name, "detached from controller");
    fetch(&*store, system, &component.name)
}

fn fetch<S: AttachmentStore + ?Sized>(
    store: &S,
    system: SystemId,
    name: &str,
) -> AssemblyResult<ControllerAttachment> {
    store
        .attachment(system, name)
        .ok_or_else(|| AssemblyError::NotAttached(name.to_string()))
}
