//! MNA (Modified Nodal Analysis) solver.
//!
//! This module provides the numerical engine for DC schematic solving.
//!
//! ## Modified Nodal Analysis
//!
//! MNA assembles a system of equations Ax = z where:
//! - x contains node potentials and voltage-source branch currents
//! - A is the conductance/coefficient matrix
//! - z is the source vector
//!
//! The matrix structure is:
//! ```text
//! [ G   B ] [ v ]   [ 0 ]
//! [ C   0 ] [ j ] = [ e ]
//! ```
//!
//! where:
//! - G is the conductance matrix (node equations)
//! - B, C = Bᵀ connect voltage sources to nodes
//! - v is the vector of non-reference node potentials
//! - j is the vector of voltage source currents
//! - e is the vector of source voltages
//!
//! There are no current sources, so the node half of z is zero.

mod assemble;
mod dc;
mod mna;
mod readout;
mod workbench;

pub use assemble::{assemble, IndexMap, LinearSystem, Unknown};
pub use dc::{solve, DcSolver, SolveReport, SolverConfig, DEFAULT_PIVOT_TOLERANCE};
pub use mna::MnaMatrix;
pub use readout::{MeterKind, Reading};
pub use workbench::Workbench;
