//! Named component parameters.

use std::collections::BTreeMap;
use std::fmt;

/// Parameter key: resistor value in ohms.
pub const RESISTANCE: &str = "resistance";
/// Parameter key: potentiometer end-to-end resistance in ohms.
pub const MAX_RESISTANCE: &str = "max_resistance";
/// Parameter key: potentiometer slider position, 0.0 to 1.0.
pub const SLIDER_POSITION: &str = "slider_position";
/// Parameter key: switch state.
pub const CLOSED: &str = "closed";
/// Parameter key: source voltage in volts.
pub const VOLTAGE: &str = "voltage";

/// Short spellings accepted for a key in netlists and edits.
pub fn shorthands(key: &str) -> &'static [&'static str] {
    match key {
        RESISTANCE => &["r"],
        MAX_RESISTANCE => &["max"],
        SLIDER_POSITION => &["pos", "position"],
        CLOSED => &["state"],
        VOLTAGE => &["v"],
        _ => &[],
    }
}

/// A parameter value: either a magnitude or a flag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamValue {
    Number(f64),
    Flag(bool),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Number(v) => write!(f, "{}", v),
            ParamValue::Flag(b) => write!(f, "{}", b),
        }
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Number(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Flag(value)
    }
}

/// Why a parameter could not be read as the requested type.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamFault {
    /// A flag was stored where a magnitude is required
    NotANumber,
    /// The stored number is NaN
    Nan,
    /// The stored number is infinite where a finite value is required
    NotFinite,
}

/// Ordered map of named parameters.
///
/// Ordered so that iteration (display, export) is deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parameters {
    values: BTreeMap<String, ParamValue>,
}

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: &str, value: impl Into<ParamValue>) -> Self {
        self.set(key, value);
        self
    }

    /// Set a parameter, replacing any previous value.
    pub fn set(&mut self, key: &str, value: impl Into<ParamValue>) {
        self.values.insert(key.to_string(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<ParamValue> {
        self.values.get(key).copied()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, ParamValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Read a magnitude, falling back to `default` when absent.
    ///
    /// Infinities are passed through; the caller decides what they mean.
    pub fn number_or(&self, key: &str, default: f64) -> Result<f64, ParamFault> {
        match self.get(key) {
            None => Ok(default),
            Some(ParamValue::Number(v)) if v.is_nan() => Err(ParamFault::Nan),
            Some(ParamValue::Number(v)) => Ok(v),
            Some(ParamValue::Flag(_)) => Err(ParamFault::NotANumber),
        }
    }

    /// Read a flag, falling back to `default` when absent.
    ///
    /// Numbers are accepted: anything above 0.5 is `true`.
    pub fn flag_or(&self, key: &str, default: bool) -> Result<bool, ParamFault> {
        match self.get(key) {
            None => Ok(default),
            Some(ParamValue::Flag(b)) => Ok(b),
            Some(ParamValue::Number(v)) if v.is_nan() => Err(ParamFault::Nan),
            Some(ParamValue::Number(v)) => Ok(v > 0.5),
        }
    }
}
