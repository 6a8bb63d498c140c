//! Error types for component assembly, persistence, and gateway calls.

use thiserror::Error;

use crate::components::ComponentType;
use crate::store::SystemId;

/// Errors raised while assembling a system or running it.
#[derive(Error, Debug)]
pub enum AssemblyError {
    /// A second instance of a single-instance component type was requested.
    #[error(
        "only one {0} allowed per system. To change {0}, delete the existing component \
         from the system view and add a new {0}"
    )]
    SingleComponent(ComponentType),

    /// The component is already attached to a controller.
    #[error("component `{0}` is already attached to a controller; reconfigure it instead")]
    AlreadyAttached(String),

    /// Reconfiguration was requested for a component that was never attached.
    #[error("component `{0}` is not attached to a controller")]
    NotAttached(String),

    /// Only zone-1 components can be attached to a controller.
    #[error("component `{name}` is a {component_type} and cannot be attached to a controller")]
    NotControllable {
        name: String,
        component_type: ComponentType,
    },

    /// The uploaded demand profile could not be parsed.
    #[error("malformed demand file at row {row}: {reason}")]
    MalformedDemandFile { row: usize, reason: String },

    /// A component exists without its typed input record.
    #[error("component `{name}` ({component_type}) has no stored input")]
    MissingInput {
        name: String,
        component_type: ComponentType,
    },

    /// Controllable components still waiting for a controller attachment.
    #[error("components not attached to a controller: {}", .0.join(", "))]
    Unconfigured(Vec<String>),

    /// The solar resource model failed to produce a profile.
    #[error("solar resource error: {0}")]
    SolarResource(String),

    /// The system has never been simulated.
    #[error("system {0} has no simulation result")]
    NoResult(SystemId),

    /// The cached simulation result is not a valid result document.
    #[error("stored simulation result is invalid: {0}")]
    ResultFormat(serde_json::Error),

    /// A document could not be serialized.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Convenience alias for results carrying an [`AssemblyError`].
pub type AssemblyResult<T> = Result<T, AssemblyError>;

/// Failures of the external simulation call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GatewayError {
    /// The engine could not be reached or reported a retryable fault.
    #[error("simulation gateway unavailable: {0}")]
    Transient(String),

    /// The engine rejected the document or crashed.
    #[error("simulation gateway failed: {0}")]
    Failed(String),

    /// No answer arrived within the caller's deadline.
    #[error("simulation gateway timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// The engine answered with something that is not a result document.
    #[error("simulation gateway returned an unparseable document: {0}")]
    Unparseable(String),
}

impl GatewayError {
    /// Whether a second attempt may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, GatewayError::Transient(_))
    }
}

/// Errors reported by a persistent store.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("unknown system {0}")]
    UnknownSystem(SystemId),

    #[error("system {system} has no component `{name}`")]
    UnknownComponent { system: SystemId, name: String },

    #[error("system {system} already has a component `{name}`")]
    DuplicateComponent { system: SystemId, name: String },
}
