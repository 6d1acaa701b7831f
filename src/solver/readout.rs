//! Meter readings.

use std::fmt;

use crate::components::{Component, ComponentKind, ModelConfig};

/// What a meter measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeterKind {
    /// Current through the shunt, amperes
    Ammeter,
    /// Potential difference, volts
    Voltmeter,
}

/// A single meter's value after a solve.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub component: String,
    pub meter: MeterKind,
    /// Signed value; positive means terminal A is the higher side
    pub value: f64,
}

impl Reading {
    pub fn unit(&self) -> &'static str {
        match self.meter {
            MeterKind::Ammeter => "A",
            MeterKind::Voltmeter => "V",
        }
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let small = match self.meter {
            MeterKind::Ammeter => 0.01,
            MeterKind::Voltmeter => 0.1,
        };
        // Show an exact zero unsigned
        let value = if self.value == 0.0 { 0.0 } else { self.value };
        if value.abs() < small {
            write!(f, "{:.1}m{}", value * 1e3, self.unit())
        } else {
            write!(f, "{:.2}{}", value, self.unit())
        }
    }
}

/// Build the readings of every meter in component order.
///
/// `difference` yields `V(A) - V(B)` for a component.
pub(crate) fn collect_readings<F>(components: &[Component], model: &ModelConfig, difference: F) -> Vec<Reading>
where
    F: Fn(&Component) -> f64,
{
    components
        .iter()
        .filter_map(|c| {
            let (meter, value) = match c.kind {
                ComponentKind::Ammeter => (MeterKind::Ammeter, difference(c) / model.ammeter_resistance),
                ComponentKind::Voltmeter => (MeterKind::Voltmeter, difference(c)),
                _ => return None,
            };
            Some(Reading {
                component: c.name.clone(),
                meter,
                value,
            })
        })
        .collect()
}
