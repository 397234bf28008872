//! WASM bindings for Linspice Core.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { WasmNetlistSim } from 'linspice_core';
//!
//! await init();
//!
//! const netlist = `RC low-pass
//!   V1 in 0 AC 1
//!   R1 in out 1k
//!   C1 out 0 100n
//!   .ac dec 10 10 100k
//!   .print Vmag(out)
//! `;
//!
//! const sim = new WasmNetlistSim(netlist);
//! const table = sim.run();
//! ```

use wasm_bindgen::prelude::*;

use crate::analysis::SweepPolicy;
use crate::circuit::Circuit;
use crate::error::{Result, SpiceError};
use crate::netlist::{self, Netlist};
use crate::report;

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

fn to_js(err: SpiceError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

enum Input {
    Spice(Netlist),
    Legacy(Circuit),
}

/// A parsed netlist that can be solved from JavaScript.
#[wasm_bindgen]
pub struct WasmNetlistSim {
    input: Input,
    keep_going: bool,
}

#[wasm_bindgen]
impl WasmNetlistSim {
    /// Parse a SPICE-style netlist.
    ///
    /// # Example
    /// ```javascript
    /// const sim = new WasmNetlistSim(netlistText);
    /// ```
    #[wasm_bindgen(constructor)]
    pub fn new(netlist_text: &str) -> std::result::Result<WasmNetlistSim, JsValue> {
        let netlist = netlist::parse(netlist_text).map_err(to_js)?;
        Ok(WasmNetlistSim {
            input: Input::Spice(netlist),
            keep_going: false,
        })
    }

    /// Parse a legacy `<T> <n1> <n2> <value>` netlist.
    #[wasm_bindgen]
    pub fn from_legacy(netlist_text: &str) -> std::result::Result<WasmNetlistSim, JsValue> {
        let circuit = netlist::parse_legacy(netlist_text).map_err(to_js)?;
        Ok(WasmNetlistSim {
            input: Input::Legacy(circuit),
            keep_going: false,
        })
    }

    /// Keep sweeping after a failed frequency point.
    #[wasm_bindgen(setter)]
    pub fn set_keep_going(&mut self, keep_going: bool) {
        self.keep_going = keep_going;
    }

    /// Netlist title, empty for legacy input.
    #[wasm_bindgen(getter)]
    pub fn title(&self) -> String {
        match &self.input {
            Input::Spice(netlist) => netlist.title.clone(),
            Input::Legacy(_) => String::new(),
        }
    }

    /// Run the requested analysis and return the report text.
    #[wasm_bindgen]
    pub fn run(&self) -> std::result::Result<String, JsValue> {
        self.report().map_err(to_js)
    }
}

impl WasmNetlistSim {
    fn report(&self) -> Result<String> {
        let mut buffer = Vec::new();
        match &self.input {
            Input::Spice(netlist) => {
                let policy = if self.keep_going {
                    SweepPolicy::Continue
                } else {
                    SweepPolicy::Abort
                };
                report::run_netlist(&mut buffer, netlist.clone(), policy)?;
            }
            Input::Legacy(circuit) => report::run_legacy(&mut buffer, circuit.clone())?,
        }
        String::from_utf8(buffer).map_err(|e| SpiceError::WasmError {
            message: e.to_string(),
        })
    }
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
