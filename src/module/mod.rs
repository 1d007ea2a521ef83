//! Photovoltaic module description and validation.
//!
//! This module provides the input side of a simulation: the
//! [`ModuleParameters`] record, the [`DiodeModel`] selection, the
//! string-encoded preset format used for module files, and the
//! validation run before any numeric work.

mod preset;
mod types;
mod validate;

pub use preset::{
    find_preset, lenient_count, lenient_f64, load_module_file, parse_module_json, presets,
    to_module_json, PresetModule,
};
pub use types::{DiodeModel, ModuleParameters};
pub use validate::validate_module;
