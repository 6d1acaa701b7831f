//! Schematic structure: components, wires and the reference terminal.

use std::collections::HashMap;

use tracing::debug;

use super::types::{ComponentId, Connection, Terminal};
use crate::components::params::{CLOSED, MAX_RESISTANCE, RESISTANCE, SLIDER_POSITION, VOLTAGE};
use crate::components::{Component, ComponentKind, Parameters};
use crate::dsl::{is_ground_net, ComponentDef, SchematicAst};
use crate::error::{OhmlabError, Result};

/// A schematic ready for solving.
#[derive(Debug, Clone, Default)]
pub struct Schematic {
    /// All components; a component's id is its index here
    components: Vec<Component>,
    /// Wires between terminals
    connections: Vec<Connection>,
    /// Terminal whose node is ground, if chosen
    reference: Option<Terminal>,
    /// Mapping from component names to ids
    names: HashMap<String, ComponentId>,
    /// Supply voltage override carried by the netlist
    pub supply: Option<f64>,
}

impl Schematic {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a component. Names must be unique.
    pub fn add_component(&mut self, name: impl Into<String>, kind: ComponentKind, params: Parameters) -> Result<ComponentId> {
        let name = name.into();
        if self.names.contains_key(&name) {
            return Err(OhmlabError::DuplicateComponent { name });
        }
        let id = ComponentId(self.components.len());
        self.names.insert(name.clone(), id);
        self.components.push(Component::new(id, name, kind, params));
        Ok(id)
    }

    /// Wire two terminals together.
    pub fn connect(&mut self, a: Terminal, b: Terminal) -> Result<()> {
        self.check_terminal(a)?;
        self.check_terminal(b)?;
        self.connections.push(Connection::new(a, b));
        Ok(())
    }

    /// Choose the terminal whose node is ground.
    pub fn set_reference(&mut self, terminal: Terminal) -> Result<()> {
        self.check_terminal(terminal)?;
        self.reference = Some(terminal);
        Ok(())
    }

    fn check_terminal(&self, terminal: Terminal) -> Result<()> {
        if terminal.component.0 < self.components.len() {
            Ok(())
        } else {
            Err(OhmlabError::UnknownTerminal {
                terminal: terminal.to_string(),
                component_count: self.components.len(),
            })
        }
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn reference(&self) -> Option<Terminal> {
        self.reference
    }

    pub fn component(&self, id: ComponentId) -> Option<&Component> {
        self.components.get(id.0)
    }

    /// Find a component ID by name.
    pub fn find(&self, name: &str) -> Option<ComponentId> {
        self.names.get(name).copied()
    }

    pub fn component_by_name(&self, name: &str) -> Result<&Component> {
        let id = self.find(name).ok_or_else(|| OhmlabError::ComponentNotFound { name: name.to_string() })?;
        Ok(&self.components[id.0])
    }

    pub fn component_by_name_mut(&mut self, name: &str) -> Result<&mut Component> {
        let id = self.find(name).ok_or_else(|| OhmlabError::ComponentNotFound { name: name.to_string() })?;
        Ok(&mut self.components[id.0])
    }

    /// Split borrow for the solver: outputs are written into the components
    /// while the connection list stays shared.
    pub fn parts_mut(&mut self) -> (&mut [Component], &[Connection]) {
        (&mut self.components, &self.connections)
    }

    /// Zero every component's solver outputs.
    pub fn clear_outputs(&mut self) {
        self.components.iter_mut().for_each(Component::clear_outputs);
    }

    /// Build a schematic from a parsed netlist.
    ///
    /// Every net becomes a star of wires from the first terminal seen on it.
    /// The first terminal on the ground net is the reference.
    pub fn from_ast(ast: SchematicAst) -> Result<Self> {
        let mut schematic = Schematic::new();
        schematic.supply = ast.supply;

        let mut net_heads: HashMap<String, Terminal> = HashMap::new();
        let mut ground_terminal = None;

        for def in &ast.components {
            let params = params_from_def(def)?;
            let id = schematic.add_component(def.name.clone(), def.kind, params)?;

            for (net, terminal) in def.nets.iter().zip([Terminal::a(id), Terminal::b(id)]) {
                let is_ground = match &ast.ground_net {
                    Some(g) => net == g || (is_ground_net(net) && is_ground_net(g)),
                    None => is_ground_net(net),
                };
                let key = if is_ground_net(net) { "0".to_string() } else { net.clone() };

                if is_ground && ground_terminal.is_none() {
                    ground_terminal = Some(terminal);
                }

                match net_heads.get(&key) {
                    Some(&head) => schematic.connections.push(Connection::new(head, terminal)),
                    None => {
                        net_heads.insert(key, terminal);
                    }
                }
            }
        }

        if let Some(g) = &ast.ground_net {
            let key = if is_ground_net(g) { "0" } else { g.as_str() };
            if !net_heads.contains_key(key) {
                return Err(OhmlabError::parse(0, format!("ground net '{}' is not used by any component", g)));
            }
        }

        schematic.reference = ground_terminal;

        debug!(
            components = schematic.components.len(),
            nets = net_heads.len(),
            wires = schematic.connections.len(),
            "built schematic from netlist"
        );

        Ok(schematic)
    }
}

/// Translate a netlist line into named parameters for its kind.
fn params_from_def(def: &ComponentDef) -> Result<Parameters> {
    let mut params = Parameters::new();
    let max_values = match def.kind {
        ComponentKind::VoltageSource => {
            if let Some(v) = def.value(&["v", VOLTAGE], 0) {
                params.set(VOLTAGE, v);
            }
            1
        }
        ComponentKind::Resistor => {
            if let Some(r) = def.value(&["r", RESISTANCE], 0) {
                params.set(RESISTANCE, r);
            }
            1
        }
        ComponentKind::Potentiometer => {
            if let Some(max) = def.value(&["max", MAX_RESISTANCE], 0) {
                params.set(MAX_RESISTANCE, max);
            }
            if let Some(pos) = def.value(&["pos", "position", SLIDER_POSITION], 1) {
                params.set(SLIDER_POSITION, pos);
            }
            2
        }
        ComponentKind::Switch => {
            let closed = def
                .state
                .or_else(|| def.value(&["state", CLOSED], 0).map(|v| v > 0.5));
            if let Some(closed) = closed {
                params.set(CLOSED, closed);
            }
            1
        }
        ComponentKind::Wire | ComponentKind::Ammeter | ComponentKind::Voltmeter => 0,
    };

    if def.values.len() > max_values {
        return Err(OhmlabError::invalid_component(
            &def.name,
            def.line,
            format!("{} takes at most {} value(s), got {}", def.kind, max_values, def.values.len()),
        ));
    }

    Ok(params)
}
