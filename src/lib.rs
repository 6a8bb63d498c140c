//! Microgrid component assembly and serialization.
//!
//! Components are added to a system one request at a time, named
//! `<abbreviation><sequence>`, limited per type, and grouped under a
//! controller. A whole system serializes into one JSON document for an
//! external simulation engine, whose result is projected onto charts.

/// Building systems: cardinality, controller membership, and documents.
pub mod assembly;
pub mod cli;
/// Component types, inputs, and series generators.
pub mod components;
pub mod config;
pub mod error;
pub mod gateway;
pub mod io;
pub mod plan;
pub mod projection;
/// Persistence traits and the in-memory store.
pub mod store;
pub mod telemetry;

pub use assembly::{Assembler, SystemDocument};
pub use error::{AssemblyError, AssemblyResult, GatewayError, StoreError};
