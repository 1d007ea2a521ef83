//! WASM bindings for PvSim Core.
//!
//! This module provides JavaScript-friendly bindings for running the
//! simulation in a browser.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { WasmPvSim } from 'pvsim_core';
//!
//! await init();
//!
//! const moduleJson = JSON.stringify({
//!   Marca: "Jinko", Referencia: "JKM410M-72H-V",
//!   Isc: "10.6", Voc: "50.4", Gop: "1000", Top: "25", Alpha_i: "0.048",
//!   Acelda: "0.0126", Ns: "144", Np: "1", n: "0.9273",
//!   Rs: "0.004", Rsh: "500", Pmax: "410", Modelo: "sdm",
//! });
//!
//! const sim = new WasmPvSim(moduleJson);
//! plot(sim.voltage(), sim.current(), sim.power());
//! ```

use wasm_bindgen::prelude::*;

use crate::error::PvError;
use crate::export::to_csv_string;
use crate::module::{parse_module_json, ModuleParameters};
use crate::solver::{simulate, SimulationResult};

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

fn to_js(err: PvError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// A finished simulation, exposed to JavaScript.
#[wasm_bindgen]
pub struct WasmPvSim {
    params: ModuleParameters,
    result: SimulationResult,
}

#[wasm_bindgen]
impl WasmPvSim {
    /// Simulate the first module of a JSON module definition.
    ///
    /// Returns an error string if the definition is malformed or the
    /// parameters are invalid.
    #[wasm_bindgen(constructor)]
    pub fn new(module_json: &str) -> Result<WasmPvSim, JsValue> {
        let modules = parse_module_json(module_json).map_err(to_js)?;
        let module = modules.first().ok_or_else(|| {
            to_js(PvError::WasmError {
                message: "no module definition given".to_string(),
            })
        })?;
        let params = module.to_parameters().map_err(to_js)?;
        let result = simulate(&params).map_err(to_js)?;
        Ok(WasmPvSim { params, result })
    }

    /// Voltage samples (V).
    #[wasm_bindgen]
    pub fn voltage(&self) -> Vec<f64> {
        self.result.voltage.clone()
    }

    /// Current samples (A).
    #[wasm_bindgen]
    pub fn current(&self) -> Vec<f64> {
        self.result.current.clone()
    }

    /// Power samples (W).
    #[wasm_bindgen]
    pub fn power(&self) -> Vec<f64> {
        self.result.power.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn vmpp(&self) -> f64 {
        self.result.vmpp
    }

    #[wasm_bindgen(getter)]
    pub fn impp(&self) -> f64 {
        self.result.impp
    }

    #[wasm_bindgen(getter)]
    pub fn pmax(&self) -> f64 {
        self.result.pmax_calc
    }

    #[wasm_bindgen(getter)]
    pub fn fill_factor(&self) -> f64 {
        self.result.fill_factor
    }

    #[wasm_bindgen(getter)]
    pub fn efficiency(&self) -> f64 {
        self.result.efficiency
    }

    /// Deviation from the rated power (%), `undefined` without a rating.
    #[wasm_bindgen(getter)]
    pub fn error_percent(&self) -> Option<f64> {
        self.result.error_percent
    }

    #[wasm_bindgen(getter)]
    pub fn model_name(&self) -> String {
        self.result.model_name.clone()
    }

    /// The full result as a JSON string.
    #[wasm_bindgen]
    pub fn to_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.result).map_err(|e| to_js(e.into()))
    }

    /// The curve as CSV text.
    #[wasm_bindgen]
    pub fn to_csv(&self) -> Result<String, JsValue> {
        to_csv_string(&self.result, &self.params).map_err(to_js)
    }
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
