//! # Ohmlab Core
//!
//! A DC steady-state solver for classroom circuit schematics.
//!
//! This library provides:
//! - A text netlist format for bench schematics
//! - Node identification from wire lists
//! - Modified Nodal Analysis (MNA) assembly and a dense LU solve
//! - Per-component voltage and current results with meter readings
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`dsl`] - Parser for the netlist format
//! - [`circuit`] - Schematic representation, node identification and checks
//! - [`components`] - Component kinds, parameters and the resistance table
//! - [`solver`] - MNA assembly, numerical solving and the bench session
//!
//! ## Usage
//!
//! ### Native CLI
//!
//! ```bash
//! ohmlab divider.net --supply 9 --set R2.r=4.7k
//! ```
//!
//! ### Library
//!
//! ```no_run
//! use ohmlab_core::Workbench;
//!
//! let mut bench = Workbench::from_netlist("V1 top 0 9\nR1 top 0 1k\n")?;
//! bench.start(None)?;
//! let r1 = bench.component("R1")?;
//! println!("{} V, {} A", r1.voltage, r1.current);
//! # Ok::<(), ohmlab_core::OhmlabError>(())
//! ```
//!
//! ## Solution Method
//!
//! Every solve starts from scratch:
//!
//! 1. Group terminals joined by wires into nodes
//! 2. Reduce each element to a resistance (or a source constraint)
//! 3. Assemble the system matrix A and source vector z
//! 4. Solve Ax = z for node potentials and source branch currents
//! 5. Write every component's voltage and current, or nothing on failure

pub mod circuit;
pub mod components;
pub mod dsl;
pub mod error;
pub mod solver;

// Re-export main types for convenience
pub use circuit::Schematic;
pub use error::{OhmlabError, Result};
pub use solver::{DcSolver, SolveReport, SolverConfig, Workbench};

// WASM bindings
#[cfg(feature = "wasm")]
mod wasm;

#[cfg(feature = "wasm")]
pub use wasm::WasmWorkbench;
