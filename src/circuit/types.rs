//! Core identifier types for schematic representation.

use std::fmt;

/// A unique identifier for a component: its index in the component list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(pub usize);

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "C{}", self.0)
    }
}

/// Which end of a two-terminal component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Side {
    /// First terminal (positive terminal of a source or meter)
    A,
    /// Second terminal
    B,
}

/// One endpoint of one component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Terminal {
    pub component: ComponentId,
    pub side: Side,
}

impl Terminal {
    /// Terminal A of a component.
    pub fn a(component: ComponentId) -> Self {
        Self {
            component,
            side: Side::A,
        }
    }

    /// Terminal B of a component.
    pub fn b(component: ComponentId) -> Self {
        Self {
            component,
            side: Side::B,
        }
    }

    /// Dense index of this terminal: `2 * component + side`.
    pub fn index(&self) -> usize {
        2 * self.component.0
            + match self.side {
                Side::A => 0,
                Side::B => 1,
            }
    }

    /// Inverse of [`Terminal::index`].
    pub fn from_index(index: usize) -> Self {
        Self {
            component: ComponentId(index / 2),
            side: if index % 2 == 0 { Side::A } else { Side::B },
        }
    }
}

impl fmt::Display for Terminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.side {
            Side::A => write!(f, "{}.a", self.component),
            Side::B => write!(f, "{}.b", self.component),
        }
    }
}

/// A wire: two terminals declared electrically identical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Connection(pub Terminal, pub Terminal);

impl Connection {
    pub fn new(a: Terminal, b: Terminal) -> Self {
        Self(a, b)
    }
}

/// A node: an equivalence class of connected terminals.
/// Node 0 is always the reference (ground).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The reference node (always index 0).
    pub const GROUND: NodeId = NodeId(0);

    /// Check if this is the reference node.
    pub fn is_ground(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_ground() {
            write!(f, "GND")
        } else {
            write!(f, "N{}", self.0)
        }
    }
}
