//! Module parameter validation.

use crate::error::{PvError, Result};

use super::ModuleParameters;

/// Validate module parameters before any numeric work.
///
/// Checks:
/// - The module reference is not empty
/// - Isc and Voc are positive
/// - Cell counts are positive
/// - Irradiance, ideality factor and shunt resistance are positive
/// - Series resistance is not negative
/// - Voc stays positive at the operating temperature
pub fn validate_module(params: &ModuleParameters) -> Result<()> {
    if params.reference.trim().is_empty() {
        return Err(PvError::invalid_input("module reference is empty"));
    }

    if !(params.isc > 0.0) || !(params.voc > 0.0) {
        return Err(PvError::invalid_input(format!(
            "Isc and Voc must be positive (Isc = {}, Voc = {})",
            params.isc, params.voc
        )));
    }

    if params.ns == 0 || params.np == 0 {
        return Err(PvError::invalid_input(format!(
            "cell counts must be greater than zero (Ns = {}, Np = {})",
            params.ns, params.np
        )));
    }

    // The corrector divides by each of these
    if !(params.gop > 0.0) {
        return Err(PvError::invalid_input(format!(
            "operating irradiance must be positive (Gop = {})",
            params.gop
        )));
    }

    if !(params.n > 0.0) {
        return Err(PvError::invalid_input(format!(
            "ideality factor must be positive (n = {})",
            params.n
        )));
    }

    if !(params.rsh > 0.0) {
        return Err(PvError::invalid_input(format!(
            "shunt resistance must be positive (Rsh = {})",
            params.rsh
        )));
    }

    if params.rs < 0.0 {
        return Err(PvError::invalid_input(format!(
            "series resistance cannot be negative (Rs = {})",
            params.rs
        )));
    }

    // The sweep runs from 0 to a multiple of this voltage
    let voc_op = params.operating_voc();
    if !(voc_op > 0.0) {
        return Err(PvError::invalid_input(format!(
            "open-circuit voltage at {} °C is not positive (Voc = {})",
            params.top, voc_op
        )));
    }

    Ok(())
}
