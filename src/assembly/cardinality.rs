//! Per-system instance limits of component types.

use crate::components::ComponentType;
use crate::error::{AssemblyError, AssemblyResult};
use crate::store::{ComponentStore, SystemId};

/// Outcome of a passed cardinality check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardinalityVerdict {
    pub component_type: ComponentType,
    /// Components of the type already in the system.
    pub existing: usize,
}

/// Checks whether one more component of `component_type` may be added.
///
/// Read-only; calling it twice without an intervening creation returns the
/// same verdict.
///
/// # Errors
///
/// Returns [`AssemblyError::SingleComponent`] if the type is limited to one
/// instance and the system already has it.
pub fn check<S: ComponentStore + ?Sized>(
    store: &S,
    system: SystemId,
    component_type: ComponentType,
) -> AssemblyResult<CardinalityVerdict> {
    let existing = store.components_of_type(system, component_type)?.len();
    if component_type.is_single() && existing >= 1 {
        return Err(AssemblyError::SingleComponent(component_type));
    }
    Ok(CardinalityVerdict {
        component_type,
        existing,
    })
}
