//! MNA system assembly.
//!
//! Rows `0..n` hold the potentials of non-reference nodes in node id order;
//! rows `n..n+m` hold the branch currents of voltage sources in component
//! order. Each island of nodes joined by conducting elements contributes one
//! reference node, the ground node being the reference of island 0.

use tracing::{debug, warn};

use crate::circuit::{find_islands, ComponentId, Islands, NodeId, NodePartition};
use crate::components::{Component, ModelConfig, Resistance};
use crate::error::{OhmlabError, Result};

use super::mna::MnaMatrix;

/// An unknown of the MNA system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unknown {
    /// Node potential
    Potential(NodeId),
    /// Branch current of a voltage source
    BranchCurrent(ComponentId),
}

/// Mapping from unknowns to matrix rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexMap {
    /// Row of each node; `None` for island references
    node_rows: Vec<Option<usize>>,
    /// Row of each component's branch current; `None` for non-sources
    branch_rows: Vec<Option<usize>>,
    num_node_rows: usize,
    num_branch_rows: usize,
}

impl IndexMap {
    pub fn node_row(&self, node: NodeId) -> Option<usize> {
        self.node_rows[node.0]
    }

    pub fn branch_row(&self, component: ComponentId) -> Option<usize> {
        self.branch_rows[component.0]
    }

    pub fn row(&self, unknown: Unknown) -> Option<usize> {
        match unknown {
            Unknown::Potential(node) => self.node_row(node),
            Unknown::BranchCurrent(component) => self.branch_row(component),
        }
    }

    pub fn num_node_rows(&self) -> usize {
        self.num_node_rows
    }

    pub fn num_branch_rows(&self) -> usize {
        self.num_branch_rows
    }

    /// Matrix dimension.
    pub fn size(&self) -> usize {
        self.num_node_rows + self.num_branch_rows
    }
}

/// The assembled system for one solve.
#[derive(Debug, Clone)]
pub struct LinearSystem {
    pub matrix: MnaMatrix,
    pub index: IndexMap,
    pub islands: Islands,
    /// Effective resistance of each component (`None` for sources)
    pub resistances: Vec<Option<Resistance>>,
}

/// Build `A`, `z` and the index map for `components` on `partition`.
///
/// `supply` replaces the `voltage` parameter of every voltage source.
pub fn assemble(
    components: &[Component],
    partition: &NodePartition,
    model: &ModelConfig,
    supply: Option<f64>,
) -> Result<LinearSystem> {
    let resistances = components
        .iter()
        .map(|c| c.effective_resistance(model))
        .collect::<Result<Vec<_>>>()?;

    let mut source_voltages = Vec::new();
    for component in components.iter().filter(|c| c.is_ideal_voltage_source()) {
        let pos = partition.node_of(component.terminal_a());
        let neg = partition.node_of(component.terminal_b());
        if pos == neg {
            warn!(source = %component.name, node = %pos, "voltage source shorted to itself");
            return Err(OhmlabError::SingularSystem);
        }
        let voltage = match supply {
            Some(v) => v,
            None => component.source_voltage()?,
        };
        source_voltages.push((component.id, pos, neg, voltage));
    }

    let links = components.iter().zip(&resistances).filter_map(|(c, r)| match r {
        Some(Resistance::Open) => None,
        _ => Some((partition.node_of(c.terminal_a()), partition.node_of(c.terminal_b()))),
    });
    let islands = find_islands(partition.num_nodes(), links);
    if islands.len() > 1 {
        warn!(
            islands = islands.len(),
            "schematic has parts with no conducting path to ground; solving them against local references"
        );
    }

    let mut node_rows = Vec::with_capacity(partition.num_nodes());
    let mut next_row = 0usize;
    for node in (0..partition.num_nodes()).map(NodeId) {
        if islands.is_reference(node) {
            node_rows.push(None);
        } else {
            node_rows.push(Some(next_row));
            next_row += 1;
        }
    }
    let num_node_rows = next_row;

    if num_node_rows == 0 {
        return Err(OhmlabError::NoTopology);
    }

    let mut branch_rows = vec![None; components.len()];
    for (id, ..) in &source_voltages {
        branch_rows[id.0] = Some(next_row);
        next_row += 1;
    }

    let index = IndexMap {
        node_rows,
        branch_rows,
        num_node_rows,
        num_branch_rows: source_voltages.len(),
    };

    debug!(
        nodes = partition.num_nodes(),
        unknown_potentials = index.num_node_rows(),
        sources = index.num_branch_rows(),
        "assembling MNA system"
    );

    let mut matrix = MnaMatrix::new(index.size());

    for (component, resistance) in components.iter().zip(&resistances) {
        if let Some(Resistance::Finite(r)) = resistance {
            let n1 = index.node_row(partition.node_of(component.terminal_a()));
            let n2 = index.node_row(partition.node_of(component.terminal_b()));
            matrix.stamp_conductance(n1, n2, 1.0 / r);
        }
    }

    for (id, pos, neg, voltage) in source_voltages {
        let br = index.branch_row(id).ok_or(OhmlabError::SingularSystem)?;
        matrix.stamp_voltage_source(index.node_row(pos), index.node_row(neg), br, voltage);
    }

    Ok(LinearSystem {
        matrix,
        index,
        islands,
        resistances,
    })
}
