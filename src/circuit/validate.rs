//! Schematic checks.
//!
//! None of these stop a solve; they are hints the caller can show to the user
//! alongside (or instead of) a solve failure.

use std::fmt;

use tracing::warn;

use super::topology::identify_nodes;
use super::{Schematic, Side};
use crate::error::Result;

/// A suspicious but solvable feature of a schematic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// The schematic has no components
    Empty,
    /// No ground was chosen; node 0 is picked by construction order
    NoReference,
    /// A terminal shares its node with no other terminal
    DanglingTerminal { component: String, side: Side },
    /// A voltage source has both terminals on one node
    ShortedSource { component: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::Empty => write!(f, "schematic has no components"),
            Diagnostic::NoReference => write!(f, "no ground chosen; using the first node"),
            Diagnostic::DanglingTerminal { component, side } => {
                let side = match side {
                    Side::A => "a",
                    Side::B => "b",
                };
                write!(f, "terminal {}.{} is not connected to anything", component, side)
            }
            Diagnostic::ShortedSource { component } => {
                write!(f, "source {} is shorted by its own wiring", component)
            }
        }
    }
}

/// Check a schematic for features that usually indicate a wiring mistake.
pub fn validate_schematic(schematic: &Schematic) -> Result<Vec<Diagnostic>> {
    let mut diagnostics = Vec::new();

    if schematic.components().is_empty() {
        diagnostics.push(Diagnostic::Empty);
        return Ok(diagnostics);
    }

    if schematic.reference().is_none() {
        diagnostics.push(Diagnostic::NoReference);
    }

    let partition = identify_nodes(
        schematic.components().len(),
        schematic.connections(),
        schematic.reference(),
    )?;
    let members = partition.members();

    for component in schematic.components() {
        let a = partition.node_of(component.terminal_a());
        let b = partition.node_of(component.terminal_b());

        if component.is_ideal_voltage_source() && a == b {
            diagnostics.push(Diagnostic::ShortedSource {
                component: component.name.clone(),
            });
        }

        for (node, side) in [(a, Side::A), (b, Side::B)] {
            if members[node.0].len() == 1 {
                diagnostics.push(Diagnostic::DanglingTerminal {
                    component: component.name.clone(),
                    side,
                });
            }
        }
    }

    for d in &diagnostics {
        warn!(diagnostic = %d, "schematic check");
    }

    Ok(diagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::Terminal;
    use crate::components::{ComponentKind, Parameters};

    #[test]
    fn test_empty_schematic() {
        let diags = validate_schematic(&Schematic::new()).unwrap();
        assert_eq!(diags, vec![Diagnostic::Empty]);
    }

    #[test]
    fn test_dangling_resistor_reported() {
        let mut s = Schematic::new();
        s.add_component("R1", ComponentKind::Resistor, Parameters::new()).unwrap();
        let diags = validate_schematic(&s).unwrap();
        assert!(diags.contains(&Diagnostic::NoReference));
        assert!(diags.contains(&Diagnostic::DanglingTerminal {
            component: "R1".into(),
            side: Side::A
        }));
        assert!(diags.contains(&Diagnostic::DanglingTerminal {
            component: "R1".into(),
            side: Side::B
        }));
    }

    #[test]
    fn test_shorted_source_reported() {
        let mut s = Schematic::new();
        let v = s.add_component("V1", ComponentKind::VoltageSource, Parameters::new()).unwrap();
        s.connect(Terminal::a(v), Terminal::b(v)).unwrap();
        s.set_reference(Terminal::b(v)).unwrap();
        let diags = validate_schematic(&s).unwrap();
        assert_eq!(diags, vec![Diagnostic::ShortedSource { component: "V1".into() }]);
    }
}
