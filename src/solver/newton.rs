//! Newton-Raphson iteration for the multi-diode circuit equation.

use crate::physics::OperatingPoint;

use super::{map_grid, CONVERGENCE_TOLERANCE, MAX_ITERATIONS, SINGULAR_DERIVATIVE};

/// Implicit circuit equation of a one-, two- or three-diode model.
#[derive(Debug, Clone)]
pub struct DiodeEquation {
    /// Photogenerated current (A)
    pub iph: f64,
    /// Saturation current shared by every diode path (A)
    pub i0: f64,
    /// Series resistance (Ω)
    pub rs: f64,
    /// Shunt resistance (Ω)
    pub rsh: f64,
    /// Modified ideality voltage `A·Ns·Vt` of each path (V)
    pub ideality_voltages: Vec<f64>,
    /// Cap the initial guess at `Iph`
    pub cap_guess: bool,
}

impl DiodeEquation {
    /// Single-diode equation with ideality factor `n`.
    pub fn single_diode(op: &OperatingPoint, n: f64, ns: u32) -> Self {
        Self {
            iph: op.iph,
            i0: op.i0,
            rs: op.rs,
            rsh: op.rsh,
            ideality_voltages: vec![n * ns as f64 * op.thermal_voltage()],
            cap_guess: false,
        }
    }

    /// Multi-diode equation with fixed ideality multipliers per path.
    pub fn multi_diode(op: &OperatingPoint, multipliers: &[f64], ns: u32) -> Self {
        let vt = op.thermal_voltage();
        Self {
            iph: op.iph,
            i0: op.i0,
            rs: op.rs,
            rsh: op.rsh,
            ideality_voltages: multipliers.iter().map(|a| a * ns as f64 * vt).collect(),
            cap_guess: true,
        }
    }

    /// Starting current at terminal voltage `v`: the photocurrent less the
    /// shunt loss, floored at 0.
    pub fn initial_guess(&self, v: f64) -> f64 {
        let guess = self.iph - v / self.rsh;
        if self.cap_guess {
            guess.min(self.iph).max(0.0)
        } else {
            guess.max(0.0)
        }
    }

    /// Residual `f(I)` and derivative `f'(I)` at terminal voltage `v`.
    pub fn evaluate(&self, v: f64, i: f64) -> (f64, f64) {
        let vd = v + i * self.rs;
        let paths = self.ideality_voltages.len() as f64;

        let mut exp_sum = 0.0;
        let mut d_exp_sum = 0.0;
        for &a in &self.ideality_voltages {
            let e = (vd / a).exp();
            exp_sum += e;
            d_exp_sum += (self.i0 * self.rs / a) * e;
        }

        let f = self.iph - self.i0 * (exp_sum - paths) - vd / self.rsh - i;
        let df = -d_exp_sum - self.rs / self.rsh - 1.0;
        (f, df)
    }
}

/// Outcome of one per-sample Newton solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointSolution {
    /// Terminal current, clamped at 0 (A)
    pub current: f64,
    /// Newton steps taken
    pub iterations: usize,
    /// Whether the step size fell below the tolerance
    pub converged: bool,
}

/// Bounded Newton-Raphson solver for [`DiodeEquation`].
#[derive(Debug, Clone)]
pub struct NewtonRaphson {
    /// Maximum iterations
    pub max_iterations: usize,
    /// Convergence tolerance on the current update (A)
    pub tolerance: f64,
    /// Derivative magnitude treated as singular
    pub singular_derivative: f64,
}

impl Default for NewtonRaphson {
    fn default() -> Self {
        Self::new()
    }
}

impl NewtonRaphson {
    /// Create a solver with the default iteration policy.
    pub fn new() -> Self {
        Self::with_config(MAX_ITERATIONS, CONVERGENCE_TOLERANCE, SINGULAR_DERIVATIVE)
    }

    /// Create a solver with a custom iteration policy.
    pub fn with_config(max_iterations: usize, tolerance: f64, singular_derivative: f64) -> Self {
        Self {
            max_iterations,
            tolerance,
            singular_derivative,
        }
    }

    /// Solve for the terminal current at a single voltage.
    ///
    /// Running out of iterations or hitting a near-singular derivative is
    /// not an error: the last iterate is returned.
    pub fn solve_point(&self, eq: &DiodeEquation, v: f64) -> PointSolution {
        let mut current = eq.initial_guess(v);
        let mut iterations = 0;
        let mut converged = false;

        while iterations < self.max_iterations {
            let (f, df) = eq.evaluate(v, current);
            if df.abs() < self.singular_derivative {
                break;
            }

            let next = current - f / df;
            iterations += 1;

            if (next - current).abs() < self.tolerance {
                current = next;
                converged = true;
                break;
            }
            current = next;
        }

        PointSolution {
            current: current.max(0.0),
            iterations,
            converged,
        }
    }

    /// Solve every sample of a voltage grid.
    pub fn solve_grid(&self, eq: &DiodeEquation, grid: &[f64]) -> Vec<f64> {
        let solutions = map_grid(grid, |v| self.solve_point(eq, v));

        let unconverged = solutions.iter().filter(|s| !s.converged).count();
        if unconverged > 0 {
            tracing::debug!(
                unconverged,
                samples = grid.len(),
                "Newton-Raphson accepted last iterate on some samples"
            );
        }

        solutions.into_iter().map(|s| s.current).collect()
    }
}
