//! Explicit single-diode solution through the Lambert W function.
//!
//! With `a = n·Ns·Vt` the single-diode equation has the closed form
//!
//! ```text
//! I = (Rsh·(Iph + I0) − V)/(Rs + Rsh) − (a/Rs)·W(x)
//! x = (Rs·I0/a)·Rsh/(Rs + Rsh) · exp(((Rs·(Iph + I0) + V)/a)·Rsh/(Rs + Rsh))
//! ```

use crate::physics::{lambert_w0, OperatingPoint};

use super::newton::DiodeEquation;
use super::simulator::SimulatorConfig;
use super::map_grid;

/// Solve the single-diode model over a voltage grid in closed form.
///
/// When `Rs` is below `config.lambert_min_rs` the explicit form is
/// ill-conditioned and the grid is solved by Newton-Raphson instead.
pub fn solve_lambert(
    op: &OperatingPoint,
    n: f64,
    ns: u32,
    grid: &[f64],
    config: &SimulatorConfig,
) -> Vec<f64> {
    if op.rs < config.lambert_min_rs {
        tracing::warn!(
            rs = op.rs,
            threshold = config.lambert_min_rs,
            "series resistance too small for the Lambert W solution, using Newton-Raphson"
        );
        let eq = DiodeEquation::single_diode(op, n, ns);
        return config.newton().solve_grid(&eq, grid);
    }

    let a = n * ns as f64 * op.thermal_voltage();
    map_grid(grid, |v| lambert_current(op, a, v, config))
}

fn lambert_current(op: &OperatingPoint, a: f64, v: f64, config: &SimulatorConfig) -> f64 {
    let rs = op.rs;
    let rsh = op.rsh;

    let rsh_eff = rsh / (rs + rsh);
    let coef = (rs * op.i0 / a) * rsh_eff;
    let exp_arg = ((rs * (op.iph + op.i0) + v) / a) * rsh_eff;

    // Near and past open circuit the current is 0
    if exp_arg > config.exp_overflow_limit {
        return 0.0;
    }

    let arg = coef * exp_arg.exp();
    let w = if arg < config.linear_w_threshold {
        arg
    } else {
        lambert_w0(arg)
    };

    let current = (rsh * (op.iph + op.i0) - v) / (rs + rsh) - (a / rs) * w;
    current.max(0.0)
}
