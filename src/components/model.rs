//! Resistance table and model constants.
//!
//! Every two-terminal element except the voltage source is reduced to a single
//! DC resistance before assembly. Out-of-range parameters are clamped here so
//! the assembler never sees a zero or negative resistance.

use super::params::{ParamFault, Parameters, CLOSED, MAX_RESISTANCE, RESISTANCE, SLIDER_POSITION, VOLTAGE};
use super::ComponentKind;

/// Default resistor value (ohms).
pub const DEFAULT_RESISTANCE: f64 = 100.0;
/// Default potentiometer end-to-end resistance (ohms).
pub const DEFAULT_MAX_RESISTANCE: f64 = 20.0;
/// Default potentiometer slider position.
pub const DEFAULT_SLIDER_POSITION: f64 = 0.5;
/// Default source voltage (volts).
pub const DEFAULT_VOLTAGE: f64 = 12.0;

/// DC resistance of an element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resistance {
    /// A finite, strictly positive resistance in ohms
    Finite(f64),
    /// No conduction at all (open switch)
    Open,
}

impl Resistance {
    /// Conductance in siemens; zero when open.
    pub fn conductance(&self) -> f64 {
        match self {
            Resistance::Finite(r) => 1.0 / r,
            Resistance::Open => 0.0,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, Resistance::Open)
    }
}

/// Constants for the idealized elements.
///
/// Meters and shorts are approximated by finite resistances so the matrix
/// stays well-posed. With the defaults, inserting a meter shifts loop currents
/// of ordinary (1 Ω to 100 kΩ) circuits by well under 1e-4 relative.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelConfig {
    /// Resistance of wires and closed switches; also the floor for resistors
    /// and potentiometers.
    pub short_resistance: f64,
    /// Shunt resistance of an ammeter.
    pub ammeter_resistance: f64,
    /// Input resistance of a voltmeter.
    pub voltmeter_resistance: f64,
    /// Floor for a potentiometer's end-to-end resistance.
    pub min_max_resistance: f64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            short_resistance: 1e-3,
            ammeter_resistance: 1e-3,
            voltmeter_resistance: 1e9,
            min_max_resistance: 0.1,
        }
    }
}

impl ModelConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_short_resistance(mut self, ohms: f64) -> Self {
        self.short_resistance = ohms;
        self
    }

    pub fn with_ammeter_resistance(mut self, ohms: f64) -> Self {
        self.ammeter_resistance = ohms;
        self
    }

    pub fn with_voltmeter_resistance(mut self, ohms: f64) -> Self {
        self.voltmeter_resistance = ohms;
        self
    }

    pub fn with_min_max_resistance(mut self, ohms: f64) -> Self {
        self.min_max_resistance = ohms;
        self
    }
}

/// A parameter that could not be interpreted.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelFault {
    pub param: &'static str,
    pub fault: ParamFault,
}

impl ModelFault {
    pub fn message(&self) -> String {
        match self.fault {
            ParamFault::NotANumber => format!("parameter '{}' must be a number", self.param),
            ParamFault::Nan => format!("parameter '{}' is NaN", self.param),
            ParamFault::NotFinite => format!("parameter '{}' must be finite", self.param),
        }
    }
}

fn read(params: &Parameters, key: &'static str, default: f64) -> Result<f64, ModelFault> {
    params
        .number_or(key, default)
        .map_err(|fault| ModelFault { param: key, fault })
}

/// Effective DC resistance for a kind and its parameters.
///
/// Returns `Ok(None)` for voltage sources, which are stamped as constraints.
pub fn resistance(
    kind: ComponentKind,
    params: &Parameters,
    model: &ModelConfig,
) -> Result<Option<Resistance>, ModelFault> {
    let r = match kind {
        ComponentKind::VoltageSource => return Ok(None),
        ComponentKind::Resistor => {
            let r = read(params, RESISTANCE, DEFAULT_RESISTANCE)?;
            if r == f64::INFINITY {
                Resistance::Open
            } else if r == f64::NEG_INFINITY {
                return Err(ModelFault {
                    param: RESISTANCE,
                    fault: ParamFault::NotFinite,
                });
            } else {
                Resistance::Finite(r.max(model.short_resistance))
            }
        }
        ComponentKind::Potentiometer => {
            let max = read(params, MAX_RESISTANCE, DEFAULT_MAX_RESISTANCE)?;
            let position = read(params, SLIDER_POSITION, DEFAULT_SLIDER_POSITION)?;
            if !max.is_finite() {
                return Err(ModelFault {
                    param: MAX_RESISTANCE,
                    fault: ParamFault::NotFinite,
                });
            }
            let max = max.max(model.min_max_resistance);
            let position = position.clamp(0.0, 1.0);
            Resistance::Finite((max * position).max(model.short_resistance))
        }
        ComponentKind::Switch => {
            let closed = params
                .flag_or(CLOSED, false)
                .map_err(|fault| ModelFault { param: CLOSED, fault })?;
            if closed {
                Resistance::Finite(model.short_resistance)
            } else {
                Resistance::Open
            }
        }
        ComponentKind::Wire => Resistance::Finite(model.short_resistance),
        ComponentKind::Ammeter => Resistance::Finite(model.ammeter_resistance),
        ComponentKind::Voltmeter => Resistance::Finite(model.voltmeter_resistance),
    };
    Ok(Some(r))
}

/// Source voltage parameter of a voltage source.
pub fn source_voltage(params: &Parameters) -> Result<f64, ModelFault> {
    let v = read(params, VOLTAGE, DEFAULT_VOLTAGE)?;
    if v.is_finite() {
        Ok(v)
    } else {
        Err(ModelFault {
            param: VOLTAGE,
            fault: ParamFault::NotFinite,
        })
    }
}
