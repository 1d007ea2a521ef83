//! Diode-model solvers and curve assembly.
//!
//! This module provides the numerical engine of the simulator.
//!
//! ## Equivalent circuit
//!
//! Every model solves the implicit circuit equation for the terminal
//! current `I` at a terminal voltage `V`:
//!
//! ```text
//! f(I) = Iph − I0·Σₖ(exp(Vd / aₖ) − 1) − Vd/Rsh − I = 0,   Vd = V + I·Rs
//! ```
//!
//! where `aₖ = Aₖ·Ns·Vt` is the modified ideality voltage of each
//! recombination path:
//!
//! | Model | Paths | Aₖ |
//! |-------|-------|----|
//! | SDM | 1 | n |
//! | DDM | 2 | 1.0, 2.0 |
//! | TDM | 3 | 1.0, 1.2, 2.5 |
//!
//! SDM/DDM/TDM iterate Newton-Raphson per voltage sample. The Lambert W
//! model evaluates the explicit single-diode solution instead.

mod lambert;
mod newton;
mod result;
mod simulator;

pub use lambert::solve_lambert;
pub use newton::{DiodeEquation, NewtonRaphson, PointSolution};
pub use result::{CurveSample, SimulationResult};
pub use simulator::{simulate, Simulator, SimulatorConfig};

/// Convergence tolerance on the current update (A).
pub const CONVERGENCE_TOLERANCE: f64 = 1e-9;

/// Maximum Newton-Raphson iterations per voltage sample.
pub const MAX_ITERATIONS: usize = 100;

/// Derivative magnitude below which the Newton step is abandoned.
pub const SINGULAR_DERIVATIVE: f64 = 1e-15;

/// Series resistance below which the Lambert W solution is replaced by
/// the Newton single-diode solver (Ω). The explicit form divides by Rs.
pub const LAMBERT_MIN_RS: f64 = 0.01;

/// Exponent above which `exp` is not evaluated in the Lambert solution.
pub const EXP_OVERFLOW_LIMIT: f64 = 700.0;

/// Lambert argument below which `W(x) ≈ x` is used directly.
pub const LINEAR_W_THRESHOLD: f64 = 1e-10;

/// Number of voltage samples on the curve.
pub const GRID_POINTS: usize = 201;

/// Sweep end relative to the corrected open-circuit voltage.
pub const GRID_OVERSHOOT: f64 = 1.05;

/// Ideality multipliers of the double-diode model.
pub const DDM_MULTIPLIERS: [f64; 2] = [1.0, 2.0];

/// Ideality multipliers of the triple-diode model (Olayiwola et al. 2024).
pub const TDM_MULTIPLIERS: [f64; 3] = [1.0, 1.2, 2.5];

/// Apply a per-sample solve across the voltage grid.
///
/// Samples are independent; with the `parallel` feature they are solved
/// on the rayon pool. Output order always follows the grid.
pub(crate) fn map_grid<T, F>(grid: &[f64], solve: F) -> Vec<T>
where
    T: Send,
    F: Fn(f64) -> T + Sync + Send,
{
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        grid.par_iter().map(|&v| solve(v)).collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        grid.iter().map(|&v| solve(v)).collect()
    }
}
