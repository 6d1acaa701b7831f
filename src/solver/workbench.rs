//! Interactive bench session.

use tracing::{info, warn};

use crate::circuit::Schematic;
use crate::components::params::CLOSED;
use crate::components::{Component, ComponentKind, ParamValue};
use crate::dsl;
use crate::error::{OhmlabError, Result};

use super::dc::{DcSolver, SolveReport, SolverConfig};
use super::readout::Reading;

/// A schematic on the bench with its power switch.
///
/// While running, every edit is followed by a fresh solve. A failed solve
/// keeps the edit but leaves the previous outputs and report in place.
pub struct Workbench {
    /// The schematic being edited
    schematic: Schematic,
    solver: DcSolver,
    /// Supply override passed to every solve
    supply: Option<f64>,
    running: bool,
    last_report: Option<SolveReport>,
}

impl Workbench {
    /// Put a schematic on the bench with default configuration.
    pub fn new(schematic: Schematic) -> Self {
        Self::with_config(schematic, SolverConfig::default())
    }

    /// Put a schematic on the bench with custom solver configuration.
    pub fn with_config(schematic: Schematic, config: SolverConfig) -> Self {
        let supply = schematic.supply;
        Self {
            schematic,
            solver: DcSolver::with_config(config),
            supply,
            running: false,
            last_report: None,
        }
    }

    /// Parse a netlist and put it on the bench.
    pub fn from_netlist(source: &str) -> Result<Self> {
        let ast = dsl::parse(source)?;
        Ok(Self::new(Schematic::from_ast(ast)?))
    }

    /// Switch the bench on and solve.
    ///
    /// `supply` replaces the current override when given.
    pub fn start(&mut self, supply: Option<f64>) -> Result<&SolveReport> {
        if let Some(v) = supply {
            check_supply(v)?;
            self.supply = Some(v);
        }
        self.running = true;
        info!(supply = ?self.supply, "bench started");
        self.resolve()
    }

    /// Switch the bench off, keeping the last values on display.
    pub fn stop(&mut self) {
        self.running = false;
        info!("bench stopped");
    }

    /// Switch the bench off and zero every output.
    pub fn reset(&mut self) {
        self.running = false;
        self.last_report = None;
        self.schematic.clear_outputs();
        info!("bench reset");
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Set a component parameter. Shorthand keys (`r`, `pos`, ...) are accepted.
    pub fn set_parameter(&mut self, name: &str, key: &str, value: impl Into<ParamValue>) -> Result<()> {
        let component = self.schematic.component_by_name_mut(name)?;
        let canonical = component
            .kind
            .canonical_key(key)
            .ok_or_else(|| OhmlabError::InvalidParameter {
                component: name.to_string(),
                param: key.to_string(),
                message: format!("a {} has no such parameter", component.kind),
            })?;
        component.params.set(canonical, value);
        self.resolve_if_running()
    }

    /// Flip a switch and return its new state (`true` = closed).
    pub fn toggle_switch(&mut self, name: &str) -> Result<bool> {
        let component = self.schematic.component_by_name_mut(name)?;
        if component.kind != ComponentKind::Switch {
            return Err(OhmlabError::InvalidParameter {
                component: name.to_string(),
                param: CLOSED.to_string(),
                message: format!("a {} cannot be toggled", component.kind),
            });
        }
        // An unreadable state is overwritten, treated as open
        let closed = !component.params.flag_or(CLOSED, false).unwrap_or(false);
        component.params.set(CLOSED, closed);
        self.resolve_if_running()?;
        Ok(closed)
    }

    /// Change the supply override for every source.
    pub fn set_supply(&mut self, volts: f64) -> Result<()> {
        check_supply(volts)?;
        self.supply = Some(volts);
        self.resolve_if_running()
    }

    pub fn supply(&self) -> Option<f64> {
        self.supply
    }

    pub fn last_report(&self) -> Option<&SolveReport> {
        self.last_report.as_ref()
    }

    /// Meter readings from the last successful solve.
    pub fn readings(&self) -> &[Reading] {
        match &self.last_report {
            Some(report) => &report.readings,
            None => &[],
        }
    }

    pub fn schematic(&self) -> &Schematic {
        &self.schematic
    }

    pub fn component(&self, name: &str) -> Result<&Component> {
        self.schematic.component_by_name(name)
    }

    fn resolve_if_running(&mut self) -> Result<()> {
        if self.running {
            self.resolve().map(|_| ())
        } else {
            Ok(())
        }
    }

    fn resolve(&mut self) -> Result<&SolveReport> {
        match self.solver.solve_schematic(&mut self.schematic, self.supply) {
            Ok(report) => Ok(self.last_report.insert(report)),
            Err(e) => {
                warn!(error = %e, "solve failed; keeping previous values");
                Err(e)
            }
        }
    }
}

fn check_supply(volts: f64) -> Result<()> {
    if volts.is_finite() {
        Ok(())
    } else {
        Err(OhmlabError::InvalidSolveParam {
            message: format!("supply voltage must be finite, got {}", volts),
        })
    }
}
