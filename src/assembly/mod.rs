//! Turning component requests into a consistent, simulatable system.

pub mod assembler;
pub mod cardinality;
pub mod document;
pub mod membership;

pub use assembler::{Assembler, AssemblerSettings, ComponentDetails};
pub use cardinality::CardinalityVerdict;
pub use document::{ComponentEntry, SystemDocument};
