//! # PvSim Core
//!
//! Photovoltaic module simulation from datasheet parameters.
//!
//! This library provides:
//! - Thermal and irradiance correction of the equivalent circuit
//! - Single-, double- and triple-diode Newton-Raphson solvers
//! - An explicit single-diode solver based on the Lambert W function
//! - I-V / P-V curve assembly, maximum power point and figures of merit
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`module`] - Module parameters, model selection, presets and validation
//! - [`physics`] - Physical constants, Lambert W, operating-point correction
//! - [`solver`] - Diode-model solvers and the curve simulator
//! - [`export`] - CSV and chart-point export of results
//!
//! ## Usage
//!
//! ### Native CLI
//!
//! ```bash
//! pvsim --preset JKM410M-72H-V --model sdm > curve.csv
//! ```
//!
//! ### Library
//!
//! ```no_run
//! use pvsim_core::{module::find_preset, simulate, DiodeModel};
//!
//! let params = find_preset("JKM410M-72H-V")?.with_model(DiodeModel::Tdm);
//! let result = simulate(&params)?;
//! println!("Pmax = {:.1} W at {:.2} V", result.pmax_calc, result.vmpp);
//! # Ok::<(), pvsim_core::PvError>(())
//! ```
//!
//! ## Simulation Method
//!
//! For each run:
//!
//! 1. Validate the module parameters
//! 2. Correct Iph, I0 and Rsh from STC to the operating irradiance and temperature
//! 3. Sweep 201 voltages from 0 to 1.05 × the temperature-corrected Voc
//! 4. Solve the selected diode model for the current at each voltage
//! 5. Locate the maximum power point by linear scan and derive FF,
//!    efficiency, current density and deviation from the rated power
//!
//! Every run is a pure function of its parameters.

pub mod error;
pub mod export;
pub mod module;
pub mod physics;
pub mod solver;

// Re-export main types for convenience
pub use error::{PvError, Result};
pub use module::{DiodeModel, ModuleParameters};
pub use solver::{simulate, SimulationResult, Simulator, SimulatorConfig};

// WASM bindings
#[cfg(feature = "wasm")]
mod wasm;

#[cfg(feature = "wasm")]
pub use wasm::WasmPvSim;
