//! Thermal and irradiance correction of the equivalent circuit.
//!
//! Datasheet ratings are given at STC. The single-diode parameters at the
//! operating point follow Abbassi et al. (2017):
//!
//! ```text
//! Io_ref  = Isc / (exp(Voc / (n·Ns·Vt_stc)) − 1)
//! Iph_ref = Isc·(1 + Rs/Rsh) + Io_ref·(exp(Rs·Isc / (n·Ns·Vt_stc)) − 1)
//! Iph     = (G/G_stc)·(Iph_ref + α·Isc·(T − T_stc))
//! I0      = Io_ref·(T/T_stc)³·exp((Eg·q / (n·k))·(1/T_stc − 1/T))
//! Rsh_op  = Rsh·G_stc/G
//! ```

use super::{celsius_to_kelvin, thermal_voltage, EG_SILICON, G_STC, K, Q, T_STC_C};
use crate::module::ModuleParameters;

/// Equivalent-circuit parameters at the operating point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OperatingPoint {
    /// Photogenerated current (A)
    pub iph: f64,
    /// Diode saturation current (A)
    pub i0: f64,
    /// Series resistance (Ω)
    pub rs: f64,
    /// Shunt resistance (Ω)
    pub rsh: f64,
    /// Cell temperature (K)
    pub t_kelvin: f64,
}

impl OperatingPoint {
    /// Correct the STC ratings of a module to its operating conditions.
    ///
    /// The parameters must have passed validation: `isc`, `voc`, `n`,
    /// `rsh` and `gop` positive and `ns > 0`.
    pub fn from_module(params: &ModuleParameters) -> Self {
        let t_op = celsius_to_kelvin(params.top);
        let t_stc = celsius_to_kelvin(T_STC_C);
        let a_stc = params.n * params.ns as f64 * thermal_voltage(t_stc);

        let io_ref = params.isc / ((params.voc / a_stc).exp() - 1.0);
        let iph_ref = params.isc * (1.0 + params.rs / params.rsh)
            + io_ref * ((params.rs * params.isc / a_stc).exp() - 1.0);

        let alpha = params.alpha_i / 100.0;
        let iph = (params.gop / G_STC) * (iph_ref + alpha * params.isc * (params.top - T_STC_C));

        let i0 = io_ref
            * (t_op / t_stc).powi(3)
            * ((EG_SILICON * Q / (params.n * K)) * (1.0 / t_stc - 1.0 / t_op)).exp();

        let point = Self {
            iph,
            i0,
            rs: params.rs,
            rsh: params.rsh * (G_STC / params.gop),
            t_kelvin: t_op,
        };

        tracing::debug!(
            iph = point.iph,
            i0 = point.i0,
            rs = point.rs,
            rsh = point.rsh,
            t_kelvin = point.t_kelvin,
            "operating point corrected"
        );

        point
    }

    /// Thermal voltage kT/q at the operating temperature (V).
    pub fn thermal_voltage(&self) -> f64 {
        thermal_voltage(self.t_kelvin)
    }
}
