//! Main simulator interface.

use crate::error::Result;
use crate::module::{validate_module, DiodeModel, ModuleParameters};
use crate::physics::{OperatingPoint, EG_SILICON, G_STC, K, Q, T_STC_C};

use super::newton::{DiodeEquation, NewtonRaphson};
use super::result::SimulationResult;
use super::{
    solve_lambert, CONVERGENCE_TOLERANCE, DDM_MULTIPLIERS, EXP_OVERFLOW_LIMIT, GRID_OVERSHOOT,
    GRID_POINTS, LAMBERT_MIN_RS, LINEAR_W_THRESHOLD, MAX_ITERATIONS, SINGULAR_DERIVATIVE,
    TDM_MULTIPLIERS,
};

/// Configuration for the simulator.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatorConfig {
    /// Maximum Newton-Raphson iterations per voltage sample.
    pub max_iterations: usize,
    /// Convergence tolerance for Newton-Raphson (amperes).
    pub tolerance: f64,
    /// Derivative magnitude at which a Newton step is abandoned.
    pub singular_derivative: f64,
    /// Series resistance below which the Lambert model falls back to
    /// Newton-Raphson (ohms).
    pub lambert_min_rs: f64,
    /// Largest exponent evaluated by the Lambert model.
    pub exp_overflow_limit: f64,
    /// Lambert argument below which `W(x) ≈ x`.
    pub linear_w_threshold: f64,
    /// Number of voltage samples, including both ends.
    pub grid_points: usize,
    /// Sweep end as a multiple of the corrected open-circuit voltage.
    pub grid_overshoot: f64,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            max_iterations: MAX_ITERATIONS,
            tolerance: CONVERGENCE_TOLERANCE,
            singular_derivative: SINGULAR_DERIVATIVE,
            lambert_min_rs: LAMBERT_MIN_RS,
            exp_overflow_limit: EXP_OVERFLOW_LIMIT,
            linear_w_threshold: LINEAR_W_THRESHOLD,
            grid_points: GRID_POINTS,
            grid_overshoot: GRID_OVERSHOOT,
        }
    }
}

impl SimulatorConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum Newton-Raphson iterations.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the convergence tolerance (in amperes).
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set the near-singular derivative guard.
    pub fn with_singular_derivative(mut self, singular_derivative: f64) -> Self {
        self.singular_derivative = singular_derivative;
        self
    }

    /// Set the series resistance below which the Lambert model uses
    /// Newton-Raphson.
    pub fn with_lambert_min_rs(mut self, lambert_min_rs: f64) -> Self {
        self.lambert_min_rs = lambert_min_rs;
        self
    }

    /// Set the Lambert exponent overflow limit.
    pub fn with_exp_overflow_limit(mut self, exp_overflow_limit: f64) -> Self {
        self.exp_overflow_limit = exp_overflow_limit;
        self
    }

    /// Set the argument below which the Lambert model uses `W(x) ≈ x`.
    pub fn with_linear_w_threshold(mut self, linear_w_threshold: f64) -> Self {
        self.linear_w_threshold = linear_w_threshold;
        self
    }

    /// Set the number of voltage samples (at least 2).
    pub fn with_grid_points(mut self, grid_points: usize) -> Self {
        self.grid_points = grid_points.max(2);
        self
    }

    /// Newton-Raphson solver carrying this configuration's policy.
    pub fn newton(&self) -> NewtonRaphson {
        NewtonRaphson::with_config(self.max_iterations, self.tolerance, self.singular_derivative)
    }
}

/// The module simulator.
///
/// Holds only configuration; every [`Simulator::run`] is independent.
#[derive(Debug, Clone, Default)]
pub struct Simulator {
    config: SimulatorConfig,
}

impl Simulator {
    /// Create a new simulator with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new simulator with custom configuration.
    pub fn with_config(config: SimulatorConfig) -> Self {
        Self { config }
    }

    /// Get the configuration.
    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Simulate the I-V and P-V curves of a module.
    pub fn run(&self, params: &ModuleParameters) -> Result<SimulationResult> {
        validate_module(params)?;

        let op = OperatingPoint::from_module(params);

        let voc_op = params.operating_voc();
        let voltage = self.voltage_grid(voc_op);

        let current = self.solve(params, &op, &voltage);
        let power: Vec<f64> = voltage.iter().zip(&current).map(|(v, i)| v * i).collect();

        let mpp = max_power_index(&power);
        let vmpp = voltage[mpp];
        let impp = current[mpp];
        let pmax_calc = power[mpp];

        let fill_factor = (vmpp * impp) / (params.voc * params.isc);
        let total_area = params.total_area();
        let efficiency = pmax_calc / (params.gop * total_area) * 100.0;

        let cell_area_cm2 = params.cell_area * 10_000.0;
        let jsc = (params.isc * 1000.0) / (cell_area_cm2 * params.ns as f64 * params.np as f64);

        let reference_power = params.reference_power();
        let error_percent = (reference_power > 0.0)
            .then(|| ((pmax_calc - reference_power) / reference_power).abs() * 100.0);
        if error_percent.is_none() {
            tracing::debug!("no rated power given, skipping the datasheet deviation");
        }

        tracing::debug!(
            model = %params.model,
            vmpp,
            impp,
            pmax_calc,
            fill_factor,
            "simulation finished"
        );

        Ok(SimulationResult {
            voltage,
            current,
            power,
            vmpp,
            impp,
            pmax_calc,
            fill_factor,
            efficiency,
            error_percent,
            iph: op.iph,
            i0: op.i0,
            jsc,
            total_area,
            isc: params.isc,
            voc: params.voc,
            g_stc: G_STC,
            t_stc_c: T_STC_C,
            eg: EG_SILICON,
            q: Q,
            k: K,
            model: params.model,
            model_name: params.model.display_name().to_string(),
        })
    }

    /// Evenly spaced sweep from 0 to `grid_overshoot·voc_op`.
    fn voltage_grid(&self, voc_op: f64) -> Vec<f64> {
        let points = self.config.grid_points.max(2);
        let v_end = voc_op * self.config.grid_overshoot;
        let steps = (points - 1) as f64;
        (0..points)
            .map(|i| v_end * i as f64 / steps)
            .collect()
    }

    /// Dispatch the selected model over the grid.
    fn solve(&self, params: &ModuleParameters, op: &OperatingPoint, grid: &[f64]) -> Vec<f64> {
        let newton = self.config.newton();
        match params.model {
            DiodeModel::Sdm => {
                newton.solve_grid(&DiodeEquation::single_diode(op, params.n, params.ns), grid)
            }
            DiodeModel::Ddm => newton.solve_grid(
                &DiodeEquation::multi_diode(op, &DDM_MULTIPLIERS, params.ns),
                grid,
            ),
            DiodeModel::Tdm => newton.solve_grid(
                &DiodeEquation::multi_diode(op, &TDM_MULTIPLIERS, params.ns),
                grid,
            ),
            DiodeModel::Lambert => solve_lambert(op, params.n, params.ns, grid, &self.config),
        }
    }
}

/// Index of the first strictly greatest power, 0 if no power is positive.
fn max_power_index(power: &[f64]) -> usize {
    let mut best = 0;
    let mut max_power = 0.0;
    for (i, &p) in power.iter().enumerate() {
        if p > max_power {
            max_power = p;
            best = i;
        }
    }
    best
}

/// Simulate a module with the default configuration.
pub fn simulate(params: &ModuleParameters) -> Result<SimulationResult> {
    Simulator::new().run(params)
}
