//! Component models for schematic solving.
//!
//! This module provides the single two-terminal [`Component`] record and the
//! closed set of element kinds it can take:
//! - Sources: ideal DC voltage source
//! - Passive: Resistor, Potentiometer
//! - Controls: Switch, Wire
//! - Meters: Ammeter, Voltmeter
//!
//! Behavior is selected by matching on [`ComponentKind`]; the resistance table
//! lives in [`model`].

pub mod model;
pub mod params;

pub use model::{ModelConfig, Resistance};
pub use params::{ParamValue, Parameters};

use std::fmt;

use crate::circuit::{ComponentId, Terminal};
use crate::error::{OhmlabError, Result};

/// Element kinds supported by the solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    /// Ideal DC voltage source; terminal A is positive
    VoltageSource,
    /// Fixed resistor
    Resistor,
    /// Two-terminal rheostat (slider between the ends)
    Potentiometer,
    /// Open or closed switch
    Switch,
    /// Ideal wire segment
    Wire,
    /// Ideal ammeter (series)
    Ammeter,
    /// Ideal voltmeter (parallel)
    Voltmeter,
}

impl ComponentKind {
    /// Parse a kind from its netlist keyword.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.to_ascii_uppercase().as_str() {
            "V" | "SOURCE" => Some(Self::VoltageSource),
            "R" | "RESISTOR" => Some(Self::Resistor),
            "POT" | "POTENTIOMETER" => Some(Self::Potentiometer),
            "SW" | "SWITCH" => Some(Self::Switch),
            "W" | "WIRE" => Some(Self::Wire),
            "A" | "AM" | "AMMETER" => Some(Self::Ammeter),
            "VM" | "VOLTMETER" => Some(Self::Voltmeter),
            _ => None,
        }
    }

    /// Whether this kind is an ideal meter.
    pub fn is_meter(&self) -> bool {
        matches!(self, Self::Ammeter | Self::Voltmeter)
    }

    /// Parameter keys this kind reads.
    pub fn parameter_keys(&self) -> &'static [&'static str] {
        match self {
            Self::VoltageSource => &[params::VOLTAGE],
            Self::Resistor => &[params::RESISTANCE],
            Self::Potentiometer => &[params::MAX_RESISTANCE, params::SLIDER_POSITION],
            Self::Switch => &[params::CLOSED],
            Self::Wire | Self::Ammeter | Self::Voltmeter => &[],
        }
    }

    /// Resolve a parameter key, or its netlist shorthand, to the key this
    /// kind stores.
    pub fn canonical_key(&self, key: &str) -> Option<&'static str> {
        let key = key.to_ascii_lowercase();
        self.parameter_keys()
            .iter()
            .copied()
            .find(|k| *k == key || params::shorthands(k).contains(&key.as_str()))
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::VoltageSource => "source",
            Self::Resistor => "resistor",
            Self::Potentiometer => "potentiometer",
            Self::Switch => "switch",
            Self::Wire => "wire",
            Self::Ammeter => "ammeter",
            Self::Voltmeter => "voltmeter",
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// A two-terminal circuit element.
///
/// `voltage` and `current` are outputs: only a successful solve writes them.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    pub id: ComponentId,
    pub name: String,
    pub kind: ComponentKind,
    pub params: Parameters,
    /// Magnitude of the potential difference across the terminals (volts)
    pub voltage: f64,
    /// Signed current (amperes); positive flows from terminal A to terminal B
    pub current: f64,
}

impl Component {
    /// Create a new component with zeroed outputs.
    pub fn new(id: ComponentId, name: impl Into<String>, kind: ComponentKind, params: Parameters) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            params,
            voltage: 0.0,
            current: 0.0,
        }
    }

    pub fn terminal_a(&self) -> Terminal {
        Terminal::a(self.id)
    }

    pub fn terminal_b(&self) -> Terminal {
        Terminal::b(self.id)
    }

    pub fn is_ideal_voltage_source(&self) -> bool {
        self.kind == ComponentKind::VoltageSource
    }

    /// Effective DC resistance, or `None` for a voltage source.
    pub fn effective_resistance(&self, model: &ModelConfig) -> Result<Option<Resistance>> {
        model::resistance(self.kind, &self.params, model)
            .map_err(|fault| OhmlabError::malformed(&self.name, fault.message()))
    }

    /// Source voltage for a voltage source (the `voltage` parameter).
    pub fn source_voltage(&self) -> Result<f64> {
        model::source_voltage(&self.params).map_err(|fault| OhmlabError::malformed(&self.name, fault.message()))
    }

    /// Whether the element links its two terminals electrically.
    pub fn conducts(&self, model: &ModelConfig) -> Result<bool> {
        Ok(match self.effective_resistance(model)? {
            None => true,
            Some(r) => !r.is_open(),
        })
    }

    /// Zero the solver outputs.
    pub fn clear_outputs(&mut self) {
        self.voltage = 0.0;
        self.current = 0.0;
    }
}
