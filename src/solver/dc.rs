//! DC operating point solver.

use tracing::{debug, info_span};

use crate::circuit::{identify_nodes, Connection, NodeId, NodePartition, Schematic, Terminal};
use crate::components::{Component, ModelConfig, Resistance};
use crate::error::{OhmlabError, Result};

use super::assemble::assemble;
use super::readout::{collect_readings, Reading};

/// Default absolute pivot tolerance for the LU factorization.
pub const DEFAULT_PIVOT_TOLERANCE: f64 = 1e-15;

/// Configuration for the solver.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverConfig {
    /// Constants for wires, switches and meters.
    pub model: ModelConfig,
    /// Pivots smaller than this in magnitude mark the system singular.
    pub pivot_tolerance: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            model: ModelConfig::default(),
            pivot_tolerance: DEFAULT_PIVOT_TOLERANCE,
        }
    }
}

impl SolverConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_model(mut self, model: ModelConfig) -> Self {
        self.model = model;
        self
    }

    /// Set the pivot tolerance.
    ///
    /// Raising it makes near-contradictory source arrangements fail instead of
    /// producing huge currents.
    pub fn with_pivot_tolerance(mut self, tolerance: f64) -> Self {
        self.pivot_tolerance = tolerance;
        self
    }
}

/// Everything a successful solve learned besides the component outputs.
#[derive(Debug, Clone)]
pub struct SolveReport {
    /// Potential of every node, indexed by node id
    pub node_potentials: Vec<f64>,
    pub partition: NodePartition,
    /// Number of conducting islands (1 for a fully connected schematic)
    pub islands: usize,
    /// Meter readings in component order
    pub readings: Vec<Reading>,
}

impl SolveReport {
    /// Potential of the node a terminal sits on, or `None` for a terminal
    /// this solve never saw.
    pub fn potential(&self, terminal: Terminal) -> Option<f64> {
        let node = self.partition.get(terminal)?;
        self.node_potentials.get(node.0).copied()
    }

    pub fn reading(&self, component: &str) -> Option<&Reading> {
        self.readings.iter().find(|r| r.component == component)
    }
}

/// The DC solver.
///
/// Holds configuration only; no state survives between calls.
#[derive(Debug, Clone, Default)]
pub struct DcSolver {
    config: SolverConfig,
}

impl DcSolver {
    /// Create a solver with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Solve for the DC steady state and write every component's
    /// `voltage`/`current`.
    ///
    /// Component `i` must carry id `i`. `supply` replaces the voltage of every
    /// source for this call. On error no component is modified.
    pub fn solve(
        &self,
        components: &mut [Component],
        connections: &[Connection],
        reference: Option<Terminal>,
        supply: Option<f64>,
    ) -> Result<SolveReport> {
        let span = info_span!(
            "dc_solve",
            components = components.len(),
            connections = connections.len()
        );
        let _enter = span.enter();

        self.check_inputs(components, supply)?;

        let partition = identify_nodes(components.len(), connections, reference)?;
        let mut system = assemble(components, &partition, &self.config.model, supply)?;
        system.matrix.factor(self.config.pivot_tolerance)?;
        system.matrix.solve()?;

        let node_potentials: Vec<f64> = (0..partition.num_nodes())
            .map(|n| system.matrix.voltage(system.index.node_row(NodeId(n))))
            .collect();
        let difference = |c: &Component| {
            node_potentials[partition.node_of(c.terminal_a()).0] - node_potentials[partition.node_of(c.terminal_b()).0]
        };

        // Compute everything before touching the components
        let outputs: Vec<(f64, f64)> = components
            .iter()
            .zip(&system.resistances)
            .map(|(c, resistance)| {
                let dv = difference(c);
                let voltage = dv.abs();
                let current = match resistance {
                    None => system.index.branch_row(c.id).map_or(0.0, |br| system.matrix.x[br]),
                    Some(_) if c.kind.is_meter() => 0.0,
                    Some(Resistance::Open) => 0.0,
                    Some(Resistance::Finite(r)) => {
                        let sign = if dv >= 0.0 { 1.0 } else { -1.0 };
                        sign * voltage / r
                    }
                };
                (voltage, current)
            })
            .collect();

        let readings = collect_readings(components, &self.config.model, difference);
        let islands = system.islands.len();

        for (component, (voltage, current)) in components.iter_mut().zip(outputs) {
            component.voltage = voltage;
            component.current = current;
        }

        debug!(
            nodes = partition.num_nodes(),
            islands,
            meters = readings.len(),
            "solve committed"
        );

        Ok(SolveReport {
            node_potentials,
            partition,
            islands,
            readings,
        })
    }

    /// Solve a schematic in place, using its own reference terminal.
    pub fn solve_schematic(&self, schematic: &mut Schematic, supply: Option<f64>) -> Result<SolveReport> {
        let reference = schematic.reference();
        let (components, connections) = schematic.parts_mut();
        self.solve(components, connections, reference, supply)
    }

    fn check_inputs(&self, components: &[Component], supply: Option<f64>) -> Result<()> {
        if let Some(v) = supply {
            if !v.is_finite() {
                return Err(OhmlabError::InvalidSolveParam {
                    message: format!("supply voltage must be finite, got {}", v),
                });
            }
        }
        if !(self.config.pivot_tolerance >= 0.0 && self.config.pivot_tolerance.is_finite()) {
            return Err(OhmlabError::InvalidSolveParam {
                message: format!("pivot tolerance must be finite and non-negative, got {}", self.config.pivot_tolerance),
            });
        }
        if let Some((i, c)) = components.iter().enumerate().find(|(i, c)| c.id.0 != *i) {
            return Err(OhmlabError::InvalidSolveParam {
                message: format!("component '{}' has id {} but sits at position {}", c.name, c.id, i),
            });
        }
        Ok(())
    }
}

/// Solve with the default configuration.
pub fn solve(
    components: &mut [Component],
    connections: &[Connection],
    reference: Option<Terminal>,
    supply: Option<f64>,
) -> Result<SolveReport> {
    DcSolver::new().solve(components, connections, reference, supply)
}
