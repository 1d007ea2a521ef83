//! Simulation output.

use serde::{Deserialize, Serialize};

use crate::module::DiodeModel;

/// One point of the characteristic curves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveSample {
    /// Terminal voltage (V)
    pub voltage: f64,
    /// Terminal current (A)
    pub current: f64,
    /// Output power (W)
    pub power: f64,
}

/// I-V / P-V curves and figures of merit of one simulation run.
///
/// The three curve vectors have equal length and are ordered by
/// increasing voltage. Every current is non-negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    /// Voltage grid (V)
    pub voltage: Vec<f64>,
    /// Current at each voltage (A)
    pub current: Vec<f64>,
    /// Power at each voltage (W)
    pub power: Vec<f64>,

    /// Voltage at the maximum power point (V)
    pub vmpp: f64,
    /// Current at the maximum power point (A)
    pub impp: f64,
    /// Simulated maximum power (W)
    pub pmax_calc: f64,

    /// `vmpp·impp / (Voc·Isc)`
    pub fill_factor: f64,
    /// Conversion efficiency (%)
    pub efficiency: f64,
    /// Deviation of `pmax_calc` from the rated power (%), `None` when the
    /// module gives neither Pmax nor Vm·Im
    pub error_percent: Option<f64>,

    /// Photogenerated current at the operating point (A)
    pub iph: f64,
    /// Saturation current at the operating point (A)
    pub i0: f64,
    /// Short-circuit current density (mA/cm²)
    pub jsc: f64,
    /// Total cell area (m²)
    pub total_area: f64,

    /// Rated short-circuit current (A), for axis scaling
    pub isc: f64,
    /// Rated open-circuit voltage (V), for axis scaling
    pub voc: f64,

    /// Irradiance at STC (W/m²)
    pub g_stc: f64,
    /// Temperature at STC (°C)
    pub t_stc_c: f64,
    /// Bandgap energy used (eV)
    pub eg: f64,
    /// Elementary charge used (C)
    pub q: f64,
    /// Boltzmann constant used (J/K)
    pub k: f64,

    /// Model that produced the curve
    pub model: DiodeModel,
    /// Human-readable model name
    pub model_name: String,
}

impl SimulationResult {
    /// Number of samples on the curve.
    pub fn len(&self) -> usize {
        self.voltage.len()
    }

    /// Whether the curve has no samples.
    pub fn is_empty(&self) -> bool {
        self.voltage.is_empty()
    }

    /// Sample at `index`, if any.
    pub fn sample(&self, index: usize) -> Option<CurveSample> {
        Some(CurveSample {
            voltage: *self.voltage.get(index)?,
            current: *self.current.get(index)?,
            power: *self.power.get(index)?,
        })
    }

    /// Iterate over the curve in voltage order.
    pub fn samples(&self) -> impl Iterator<Item = CurveSample> + '_ {
        self.voltage
            .iter()
            .zip(&self.current)
            .zip(&self.power)
            .map(|((&voltage, &current), &power)| CurveSample {
                voltage,
                current,
                power,
            })
    }

    /// The maximum power point as a sample.
    pub fn mpp(&self) -> CurveSample {
        CurveSample {
            voltage: self.vmpp,
            current: self.impp,
            power: self.pmax_calc,
        }
    }

    /// Every `step`-th sample, always ending on the last one.
    ///
    /// Used to thin the curve for vector plots. A `step` of 0 or 1 keeps
    /// every sample.
    pub fn decimated(&self, step: usize) -> Vec<CurveSample> {
        let step = step.max(1);
        let last = self.len().saturating_sub(1);
        self.samples()
            .enumerate()
            .filter(|(i, _)| i % step == 0 || *i == last)
            .map(|(_, s)| s)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result_with(n: usize) -> SimulationResult {
        let voltage: Vec<f64> = (0..n).map(|i| i as f64).collect();
        let current = vec![1.0; n];
        let power = voltage.clone();
        SimulationResult {
            voltage,
            current,
            power,
            vmpp: 0.0,
            impp: 0.0,
            pmax_calc: 0.0,
            fill_factor: 0.0,
            efficiency: 0.0,
            error_percent: None,
            iph: 0.0,
            i0: 0.0,
            jsc: 0.0,
            total_area: 0.0,
            isc: 0.0,
            voc: 0.0,
            g_stc: 0.0,
            t_stc_c: 0.0,
            eg: 0.0,
            q: 0.0,
            k: 0.0,
            model: DiodeModel::Sdm,
            model_name: String::new(),
        }
    }

    #[test]
    fn test_decimation_keeps_endpoints() {
        let result = result_with(201);
        let thinned = result.decimated(4);
        assert_eq!(thinned.len(), 51);
        assert_eq!(thinned.first().unwrap().voltage, 0.0);
        assert_eq!(thinned.last().unwrap().voltage, 200.0);

        let thinned = result.decimated(7);
        assert_eq!(thinned.last().unwrap().voltage, 200.0);
        assert_eq!(thinned.len(), 30);
    }

    #[test]
    fn test_decimation_step_zero_keeps_all() {
        assert_eq!(result_with(10).decimated(0).len(), 10);
    }

    #[test]
    fn test_sample_access() {
        let result = result_with(3);
        assert_eq!(result.samples().count(), 3);
        assert_eq!(result.sample(2).unwrap().power, 2.0);
        assert!(result.sample(3).is_none());
    }
}
