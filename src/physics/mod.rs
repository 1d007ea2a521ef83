//! Physical constants and device physics.
//!
//! This module provides:
//! - Fixed physical constants and Standard Test Conditions (STC)
//! - The Barry et al. (2000) approximation of the Lambert W function
//! - The thermal/irradiance corrector that maps datasheet ratings to
//!   equivalent-circuit parameters at the operating point

mod lambert;
mod thermal;

pub use lambert::lambert_w0;
pub use thermal::OperatingPoint;

/// Elementary charge (C).
pub const Q: f64 = 1.602176634e-19;

/// Boltzmann constant (J/K).
pub const K: f64 = 1.380649e-23;

/// Silicon bandgap energy (eV).
pub const EG_SILICON: f64 = 1.12;

/// Irradiance at Standard Test Conditions (W/m²).
pub const G_STC: f64 = 1000.0;

/// Cell temperature at Standard Test Conditions (°C).
pub const T_STC_C: f64 = 25.0;

/// Offset between Celsius and Kelvin.
pub const KELVIN_OFFSET: f64 = 273.15;

/// Convert a temperature from °C to K.
pub fn celsius_to_kelvin(t_c: f64) -> f64 {
    t_c + KELVIN_OFFSET
}

/// Thermal voltage kT/q (V) at a temperature in kelvin.
pub fn thermal_voltage(t_k: f64) -> f64 {
    K * t_k / Q
}
