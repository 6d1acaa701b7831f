//! Schematic representation and topology extraction.
//!
//! This module provides the solver-facing view of a schematic: the
//! [`Schematic`] container with its components and wires, the identifier
//! types, and node identification.

mod schematic;
pub mod topology;
mod types;
mod validate;

pub use schematic::Schematic;
pub use topology::{find_islands, identify_nodes, Islands, NodePartition};
pub use types::*;
pub use validate::{validate_schematic, Diagnostic};
