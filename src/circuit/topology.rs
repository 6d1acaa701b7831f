//! Node identification.
//!
//! Terminals joined by connections collapse into nodes. Nodes joined by
//! conducting elements collapse into islands; every island needs its own
//! reference potential for the MNA system to be well-posed.

use std::collections::VecDeque;

use tracing::debug;

use super::types::{Connection, NodeId, Terminal};
use crate::error::{OhmlabError, Result};

/// Terminal → node assignment for one solve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodePartition {
    /// Node of each terminal, indexed by [`Terminal::index`]
    terminal_nodes: Vec<NodeId>,
    /// Number of distinct nodes (including the reference)
    num_nodes: usize,
}

impl NodePartition {
    pub fn node_of(&self, terminal: Terminal) -> NodeId {
        self.terminal_nodes[terminal.index()]
    }

    /// Node of a terminal, or `None` if it is outside this partition.
    pub fn get(&self, terminal: Terminal) -> Option<NodeId> {
        self.terminal_nodes.get(terminal.index()).copied()
    }

    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    pub fn num_terminals(&self) -> usize {
        self.terminal_nodes.len()
    }

    /// Terminals grouped by node, each group in terminal index order.
    pub fn members(&self) -> Vec<Vec<Terminal>> {
        let mut groups = vec![Vec::new(); self.num_nodes];
        for (index, node) in self.terminal_nodes.iter().enumerate() {
            groups[node.0].push(Terminal::from_index(index));
        }
        groups
    }
}

fn check_terminal(terminal: Terminal, component_count: usize) -> Result<usize> {
    if terminal.component.0 < component_count {
        Ok(terminal.index())
    } else {
        Err(OhmlabError::UnknownTerminal {
            terminal: terminal.to_string(),
            component_count,
        })
    }
}

/// Partition every terminal of `component_count` two-terminal components into
/// nodes.
///
/// Traversal starts at `reference` when given, so its node is always
/// [`NodeId::GROUND`]; otherwise node 0 is the node of the first terminal.
pub fn identify_nodes(
    component_count: usize,
    connections: &[Connection],
    reference: Option<Terminal>,
) -> Result<NodePartition> {
    let num_terminals = component_count * 2;
    let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); num_terminals];

    for Connection(a, b) in connections {
        let ia = check_terminal(*a, component_count)?;
        let ib = check_terminal(*b, component_count)?;
        adjacency[ia].push(ib);
        adjacency[ib].push(ia);
    }

    let start = match reference {
        Some(t) => Some(check_terminal(t, component_count)?),
        None => None,
    };

    const UNVISITED: usize = usize::MAX;
    let mut assigned = vec![UNVISITED; num_terminals];
    let mut next_node = 0usize;
    let mut queue = VecDeque::new();

    for seed in start.into_iter().chain(0..num_terminals) {
        if assigned[seed] != UNVISITED {
            continue;
        }

        // BFS flood fill along wires
        let node = next_node;
        next_node += 1;
        assigned[seed] = node;
        queue.push_back(seed);

        while let Some(t) = queue.pop_front() {
            for &neighbor in &adjacency[t] {
                if assigned[neighbor] == UNVISITED {
                    assigned[neighbor] = node;
                    queue.push_back(neighbor);
                }
            }
        }
    }

    debug!(
        terminals = num_terminals,
        connections = connections.len(),
        nodes = next_node,
        "identified nodes"
    );

    Ok(NodePartition {
        terminal_nodes: assigned.into_iter().map(NodeId).collect(),
        num_nodes: next_node,
    })
}

/// Groups of nodes linked by conducting elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Islands {
    /// Island index of each node
    island_of: Vec<usize>,
    /// Lowest node id of each island; used as that island's reference
    references: Vec<NodeId>,
}

impl Islands {
    pub fn island_of(&self, node: NodeId) -> usize {
        self.island_of[node.0]
    }

    /// Reference node of every island. Island 0 always holds node 0.
    pub fn references(&self) -> &[NodeId] {
        &self.references
    }

    pub fn len(&self) -> usize {
        self.references.len()
    }

    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }

    pub fn is_reference(&self, node: NodeId) -> bool {
        self.references[self.island_of(node)] == node
    }
}

/// Find islands of `num_nodes` nodes joined by `links`.
///
/// Nodes are visited in id order, so each island's first-visited node is its
/// lowest id and island 0 is the one containing the ground node.
pub fn find_islands(num_nodes: usize, links: impl IntoIterator<Item = (NodeId, NodeId)>) -> Islands {
    let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); num_nodes];
    for (a, b) in links {
        if a != b {
            adjacency[a.0].push(b.0);
            adjacency[b.0].push(a.0);
        }
    }

    let mut island_of = vec![usize::MAX; num_nodes];
    let mut references = Vec::new();
    let mut queue = VecDeque::new();

    for seed in 0..num_nodes {
        if island_of[seed] != usize::MAX {
            continue;
        }
        let island = references.len();
        references.push(NodeId(seed));
        island_of[seed] = island;
        queue.push_back(seed);

        while let Some(n) = queue.pop_front() {
            for &neighbor in &adjacency[n] {
                if island_of[neighbor] == usize::MAX {
                    island_of[neighbor] = island;
                    queue.push_back(neighbor);
                }
            }
        }
    }

    Islands {
        island_of,
        references,
    }
}
