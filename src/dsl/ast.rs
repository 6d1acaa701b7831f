//! Abstract Syntax Tree types for the netlist format.

use std::collections::HashMap;

use crate::components::ComponentKind;

/// Complete AST representation of a parsed netlist.
#[derive(Debug, Clone, Default)]
pub struct SchematicAst {
    /// All component instances, in file order
    pub components: Vec<ComponentDef>,
    /// Net named by `.ground`, if any
    pub ground_net: Option<String>,
    /// Supply voltage from `.supply`, if any
    pub supply: Option<f64>,
}

impl SchematicAst {
    /// Create a new empty AST.
    pub fn new() -> Self {
        Self::default()
    }
}

/// A component line from the netlist.
#[derive(Debug, Clone)]
pub struct ComponentDef {
    /// Element kind
    pub kind: ComponentKind,
    /// Unique component name
    pub name: String,
    /// Net names of terminal A and terminal B
    pub nets: Vec<String>,
    /// Positional numeric values, in order
    pub values: Vec<f64>,
    /// Named parameters (`key=value`), keys lower-cased
    pub params: HashMap<String, f64>,
    /// Switch state keyword (`open`/`closed`/`on`/`off`)
    pub state: Option<bool>,
    /// Source line number for error reporting
    pub line: usize,
}

impl ComponentDef {
    /// Named parameter under any of `keys`, else the positional value at `position`.
    pub fn value(&self, keys: &[&str], position: usize) -> Option<f64> {
        keys.iter()
            .find_map(|k| self.params.get(*k).copied())
            .or_else(|| self.values.get(position).copied())
    }
}

/// Net names that always denote ground.
pub fn is_ground_net(name: &str) -> bool {
    name == "0" || name.eq_ignore_ascii_case("GND")
}
