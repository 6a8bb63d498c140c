//! Shared test fixtures for integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use mgrid_builder::assembly::Assembler;
use mgrid_builder::components::inputs::{BatteryInput, ConverterInput, GeneratorInput, GridInput};
use mgrid_builder::components::{ComponentRequest, DemandUpload, SolarRequest};
use mgrid_builder::error::{AssemblyResult, GatewayError};
use mgrid_builder::gateway::{FnGateway, SimulationGateway};
use mgrid_builder::store::{MemoryStore, SystemId};
use serde_json::Value;

/// Solar model returning a fixed three-step profile scaled by capacity.
pub fn flat_solar(req: &SolarRequest) -> AssemblyResult<Vec<f64>> {
    Ok(vec![0.0, req.system_capacity, 0.0])
}

/// Fresh assembler over an empty in-memory store with one system.
pub fn assembler_with_system(name: &str) -> (Assembler<MemoryStore>, SystemId) {
    let mut asm = Assembler::new(MemoryStore::new(), flat_solar);
    let sys = asm.create_system(name);
    (asm, sys)
}

/// Demand upload with one value per line.
pub fn demand(rows: &[&str]) -> ComponentRequest {
    ComponentRequest::Demand(DemandUpload {
        file_name: "demand.csv".to_string(),
        bytes: rows.join("\n").into_bytes(),
    })
}

/// Solar array of 5 kW at 1000 base and 0.5 per watt.
pub fn solar() -> ComponentRequest {
    ComponentRequest::Solar(SolarRequest {
        system_capacity: 5.0,
        base_cost: 1000.0,
        perw_cost: 0.5,
    })
}

pub fn battery() -> ComponentRequest {
    ComponentRequest::Battery(BatteryInput {
        energy_capacity: 10.0,
        soc_min: 0.2,
        soc_max: 0.9,
        base_cost: 500.0,
        energy_cost: 300.0,
    })
}

pub fn generator() -> ComponentRequest {
    ComponentRequest::Generator(GeneratorInput {
        power: 8.0,
        base_cost: 2000.0,
        fuel_cost: 0.3,
    })
}

pub fn converter() -> ComponentRequest {
    ComponentRequest::Converter(ConverterInput {
        power: 6.0,
        base_cost: 400.0,
        power_cost: 150.0,
    })
}

pub fn grid() -> ComponentRequest {
    ComponentRequest::Grid(GridInput {
        energy_cost: 0.12,
        nm_allowed: false,
    })
}

/// Gateway that always answers with `answer`.
pub fn answering(answer: Value) -> Arc<dyn SimulationGateway> {
    Arc::new(FnGateway(move |_: &Value| Ok(answer.clone())))
}

/// Gateway that always fails with `error`.
pub fn failing(error: GatewayError) -> Arc<dyn SimulationGateway> {
    Arc::new(FnGateway(move |_: &Value| Err(error.clone())))
}
