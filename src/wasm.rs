//! WASM bindings for Ohmlab Core.
//!
//! This module provides JavaScript-friendly bindings for a browser schematic
//! editor.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { WasmWorkbench } from 'ohmlab_core';
//!
//! await init();
//!
//! const netlist = `
//!   V1 top 0 9
//!   SW1 top a open
//!   R1 a 0 1k
//!   AM1 top b
//!   R2 b 0 2k
//! `;
//!
//! const bench = new WasmWorkbench(netlist);
//! bench.start();
//! bench.toggle_switch("SW1");
//! console.log(bench.current("R1"), bench.reading_text("AM1"));
//! ```

use wasm_bindgen::prelude::*;

use crate::error::OhmlabError;
use crate::solver::Workbench;

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

fn to_js(e: OhmlabError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// WASM-compatible bench session.
///
/// This struct wraps the native [`Workbench`] and exposes a JavaScript-friendly
/// API. Errors surface as exceptions carrying the error text.
#[wasm_bindgen]
pub struct WasmWorkbench {
    bench: Workbench,
}

#[wasm_bindgen]
impl WasmWorkbench {
    /// Create a bench from netlist text.
    ///
    /// # Example
    /// ```javascript
    /// const bench = new WasmWorkbench(netlist);
    /// ```
    #[wasm_bindgen(constructor)]
    pub fn new(netlist: &str) -> Result<WasmWorkbench, JsValue> {
        let bench = Workbench::from_netlist(netlist).map_err(to_js)?;
        Ok(WasmWorkbench { bench })
    }

    /// Switch on and solve with the netlist's own supply setting.
    #[wasm_bindgen]
    pub fn start(&mut self) -> Result<(), JsValue> {
        self.bench.start(None).map(|_| ()).map_err(to_js)
    }

    /// Switch on and solve with every source set to `volts`.
    #[wasm_bindgen]
    pub fn start_with_supply(&mut self, volts: f64) -> Result<(), JsValue> {
        self.bench.start(Some(volts)).map(|_| ()).map_err(to_js)
    }

    #[wasm_bindgen]
    pub fn stop(&mut self) {
        self.bench.stop();
    }

    #[wasm_bindgen]
    pub fn reset(&mut self) {
        self.bench.reset();
    }

    #[wasm_bindgen(getter)]
    pub fn running(&self) -> bool {
        self.bench.is_running()
    }

    /// Set a numeric parameter, e.g. `set_parameter("R1", "r", 470)`.
    #[wasm_bindgen]
    pub fn set_parameter(&mut self, name: &str, key: &str, value: f64) -> Result<(), JsValue> {
        self.bench.set_parameter(name, key, value).map_err(to_js)
    }

    /// Flip a switch; returns `true` when it is now closed.
    #[wasm_bindgen]
    pub fn toggle_switch(&mut self, name: &str) -> Result<bool, JsValue> {
        self.bench.toggle_switch(name).map_err(to_js)
    }

    #[wasm_bindgen]
    pub fn set_supply(&mut self, volts: f64) -> Result<(), JsValue> {
        self.bench.set_supply(volts).map_err(to_js)
    }

    /// Voltage across a component, or `undefined` if it doesn't exist.
    #[wasm_bindgen]
    pub fn voltage(&self, name: &str) -> Option<f64> {
        self.bench.component(name).ok().map(|c| c.voltage)
    }

    /// Current through a component, or `undefined` if it doesn't exist.
    #[wasm_bindgen]
    pub fn current(&self, name: &str) -> Option<f64> {
        self.bench.component(name).ok().map(|c| c.current)
    }

    /// Raw meter value from the last solve.
    #[wasm_bindgen]
    pub fn reading(&self, name: &str) -> Option<f64> {
        self.bench.last_report()?.reading(name).map(|r| r.value)
    }

    /// Meter value formatted for the panel ("12.5mA", "4.50V").
    #[wasm_bindgen]
    pub fn reading_text(&self, name: &str) -> Option<String> {
        self.bench.last_report()?.reading(name).map(|r| r.to_string())
    }

    /// Names of all components in netlist order.
    #[wasm_bindgen]
    pub fn component_names(&self) -> Vec<String> {
        self.bench
            .schematic()
            .components()
            .iter()
            .map(|c| c.name.clone())
            .collect()
    }
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
