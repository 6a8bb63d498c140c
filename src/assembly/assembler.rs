use std::sync::Arc;

use tracing::{debug, info, warn};

use super::cardinality::{self, CardinalityVerdict};
use super::document::{self, SystemDocument};
use super::membership;
use crate::components::demand::demand_series;
use crate::components::inputs::{DemandInput, SolarInput};
use crate::components::{
    Component, ComponentInput, ComponentRequest, ComponentType, SolarResource,
};
use crate::config::BuilderConfig;
use crate::error::{AssemblyError, AssemblyResult, GatewayError};
use crate::gateway::{self, GatewayPolicy, SimulationGateway};
use crate::projection::{Chart, ResultDocument};
use crate::store::{ControllerAttachment, Store, SystemId};

/// Runtime knobs of an [`Assembler`].
#[derive(Debug, Clone, PartialEq)]
pub struct AssemblerSettings {
    /// Mode recorded on unconfigured attachments.
    pub default_mode: String,
    /// Refuse to run while a zone-1 component is unattached.
    pub require_configured: bool,
    pub policy: GatewayPolicy,
}

impl Default for AssemblerSettings {
    fn default() -> Self {
        Self {
            default_mode: "nc".to_string(),
            require_configured: true,
            policy: GatewayPolicy::default(),
        }
    }
}

impl From<&BuilderConfig> for AssemblerSettings {
    fn from(config: &BuilderConfig) -> Self {
        Self {
            default_mode: config.controller.default_mode.clone(),
            require_configured: config.controller.require_configured,
            policy: config.gateway_policy(),
        }
    }
}

/// Everything shown when a single component is inspected.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentDetails {
    pub component: Component,
    /// Static input fields in display order.
    pub spec_fields: Vec<(&'static str, String)>,
    /// Derived demand or solar series.
    pub series: Option<Vec<f64>>,
}

/// Builds microgrid systems on top of a [`Store`].
///
/// Each operation takes the system it applies to and holds the store
/// exclusively for its whole duration, so a cardinality check and the
/// creation it guards cannot interleave with another creation.
pub struct Assembler<S: Store> {
    store: S,
    solar: Box<dyn SolarResource>,
    settings: AssemblerSettings,
}

impl<S: Store> Assembler<S> {
    pub fn new(store: S, solar: impl SolarResource + 'static) -> Self {
        Self {
            store,
            solar: Box::new(solar),
            settings: AssemblerSettings::default(),
        }
    }

    /// Assembler using the solar model and settings of `config`.
    ///
    /// # Errors
    ///
    /// Returns [`AssemblyError::SolarResource`] if the `[solar]` section
    /// does not describe a usable model.
    pub fn from_config(store: S, config: &BuilderConfig) -> AssemblyResult<Self> {
        Ok(Self::new(store, config.solar_resource()?).with_settings(config.into()))
    }

    pub fn with_settings(mut self, settings: AssemblerSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> &AssemblerSettings {
        &self.settings
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn create_system(&mut self, name: &str) -> SystemId {
        let id = self.store.create_system(name);
        info!(system = %id, name, "created system");
        id
    }

    /// Whether one more component of `component_type` may be added.
    pub fn can_add(
        &self,
        system: SystemId,
        component_type: ComponentType,
    ) -> AssemblyResult<CardinalityVerdict> {
        cardinality::check(&self.store, system, component_type)
    }

    /// Adds a component built from `request` and returns it.
    ///
    /// The derived series is produced before anything is written, so a
    /// malformed upload or a failing solar model leaves the system as it was.
    ///
    /// # Errors
    ///
    /// * [`AssemblyError::SingleComponent`] if the type is already present and
    ///   limited to one instance.
    /// * [`AssemblyError::MalformedDemandFile`] or
    ///   [`AssemblyError::SolarResource`] if the series cannot be produced.
    pub fn add_component(
        &mut self,
        system: SystemId,
        request: ComponentRequest,
    ) -> AssemblyResult<Component> {
        let component_type = request.component_type();
        self.can_add(system, component_type)?;

        let input = self.expand(request)?;
        let sequence = self.next_sequence(system, component_type)?;
        let component = Component::new(system, component_type, sequence);

        self.store.insert_component(component.clone())?;
        let stored = match self.store.put_input(system, &component.name, input) {
            Ok(()) => membership::register(&mut self.store, &component, &self.settings.default_mode),
            Err(e) => Err(e.into()),
        };
        if let Err(e) = stored {
            warn!(%system, component = %component.name, error = %e, "component write failed, rolling back");
            self.rollback(&component);
            return Err(e);
        }

        info!(%system, component = %component.name, %component_type, "added component");
        Ok(component)
    }

    /// Removes every row written for a half-created component.
    fn rollback(&mut self, component: &Component) {
        self.store.remove_attachment(component.system, &component.name);
        self.store.remove_input(component.system, &component.name);
        if let Err(e) = self.store.delete_component(component.system, &component.name) {
            warn!(system = %component.system, component = %component.name, error = %e, "rollback could not delete component");
        }
    }

    fn expand(&self, request: ComponentRequest) -> AssemblyResult<ComponentInput> {
        Ok(match request {
            ComponentRequest::Demand(upload) => {
                let data = demand_series(upload.bytes.as_slice())?;
                debug!(file = %upload.file_name, rows = data.len(), "parsed demand upload");
                ComponentInput::Demand(DemandInput {
                    file: upload.file_name,
                    data,
                })
            }
            ComponentRequest::Solar(req) => {
                let data = self.solar.hourly_profile(&req)?;
                debug!(steps = data.len(), capacity = req.system_capacity, "generated solar profile");
                ComponentInput::Solar(SolarInput {
                    system_capacity: req.system_capacity,
                    base_cost: req.base_cost,
                    perw_cost: req.perw_cost,
                    data,
                })
            }
            ComponentRequest::Battery(b) => ComponentInput::Battery(b),
            ComponentRequest::Generator(g) => ComponentInput::Generator(g),
            ComponentRequest::Converter(c) => ComponentInput::Converter(c),
            ComponentRequest::Controller => ComponentInput::Controller,
            ComponentRequest::Grid(g) => ComponentInput::Grid(g),
        })
    }

    /// One past the highest sequence in use for the type.
    fn next_sequence(&self, system: SystemId, component_type: ComponentType) -> AssemblyResult<u32> {
        let highest = self
            .store
            .components_of_type(system, component_type)?
            .iter()
            .map(|c| c.sequence)
            .max()
            .unwrap_or(0);
        Ok(highest + 1)
    }

    /// Removes a component together with its input and attachment.
    pub fn delete_component(&mut self, system: SystemId, name: &str) -> AssemblyResult<Component> {
        let component = self.store.delete_component(system, name)?;
        self.store.remove_input(system, name);
        self.store.remove_attachment(system, name);
        info!(%system, component = name, "deleted component");
        Ok(component)
    }

    /// Components of a system in creation order.
    pub fn components(&self, system: SystemId) -> AssemblyResult<Vec<Component>> {
        Ok(self.store.components(system)?)
    }

    pub fn component_details(&self, system: SystemId, name: &str) -> AssemblyResult<ComponentDetails> {
        let component = self.store.component(system, name)?;
        let input = self
            .store
            .input(system, name)
            .ok_or_else(|| AssemblyError::MissingInput {
                name: component.name.clone(),
                component_type: component.component_type,
            })?;
        Ok(ComponentDetails {
            spec_fields: input.spec_fields(),
            series: input.series().map(<[f64]>::to_vec),
            component,
        })
    }

    /// One chart per stored demand or solar input profile, in creation order.
    pub fn input_charts(&self, system: SystemId) -> AssemblyResult<Vec<Chart>> {
        let mut charts = Vec::new();
        for component in self.store.components(system)? {
            if let Some(series) = self.store.input(system, &component.name).as_ref().and_then(|i| i.series()) {
                charts.push(Chart::component_profile(&component.name, series));
            }
        }
        Ok(charts)
    }

    pub fn attach(
        &mut self,
        system: SystemId,
        name: &str,
        controller: &str,
        mode: &str,
    ) -> AssemblyResult<ControllerAttachment> {
        membership::attach(&mut self.store, system, name, controller, mode)
    }

    pub fn reconfigure(
        &mut self,
        system: SystemId,
        name: &str,
        mode: &str,
    ) -> AssemblyResult<ControllerAttachment> {
        membership::reconfigure(&mut self.store, system, name, mode)
    }

    pub fn detach(&mut self, system: SystemId, name: &str) -> AssemblyResult<ControllerAttachment> {
        membership::detach(&mut self.store, system, name, &self.settings.default_mode)
    }

    pub fn list_configured(&self, system: SystemId) -> AssemblyResult<Vec<Component>> {
        membership::list_configured(&self.store, system)
    }

    pub fn list_unconfigured(&self, system: SystemId) -> AssemblyResult<Vec<Component>> {
        membership::list_unconfigured(&self.store, system)
    }

    pub fn build_document(&self, system: SystemId) -> AssemblyResult<SystemDocument> {
        document::build(&self.store, system)
    }

    /// Simulates a system and caches the result on it.
    ///
    /// The cached result is replaced only after the engine answered with a
    /// valid result document; any failure leaves the previous one in place.
    ///
    /// # Errors
    ///
    /// * [`AssemblyError::Unconfigured`] if attachments are required and a
    ///   zone-1 component has none.
    /// * [`AssemblyError::MissingInput`] if the document cannot be built.
    /// * [`AssemblyError::Gateway`] if the engine fails, times out, or answers
    ///   with something that is not a result document.
    pub fn run(
        &mut self,
        system: SystemId,
        gateway: &Arc<dyn SimulationGateway>,
    ) -> AssemblyResult<ResultDocument> {
        self.store.system(system)?;
        if self.settings.require_configured {
            let waiting = membership::unconfigured_names(&self.store, system)?;
            if !waiting.is_empty() {
                return Err(AssemblyError::Unconfigured(waiting));
            }
        }

        let document = self.build_document(system)?.to_value()?;
        info!(%system, "running simulation");
        let value = gateway::call(gateway, &document, &self.settings.policy)?;

        let result = ResultDocument::from_value(value.clone())
            .map_err(|e| GatewayError::Unparseable(e.to_string()))?;
        self.store.set_result(system, serde_json::to_string(&value)?)?;
        info!(%system, components = result.components.len(), "simulation result stored");
        Ok(result)
    }

    /// The cached result of the last successful run.
    pub fn last_result(&self, system: SystemId) -> AssemblyResult<ResultDocument> {
        let text = self
            .store
            .system(system)?
            .result
            .ok_or(AssemblyError::NoResult(system))?;
        ResultDocument::from_json_str(&text)
    }
}
