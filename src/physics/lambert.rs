//! Lambert W function, principal branch.
//!
//! Analytical approximation of Barry et al. (2000), "Analytical
//! approximations for real values of the Lambert W-function",
//! Mathematics and Computers in Simulation 53, with a maximum relative
//! error of about 0.2 % on `x ≥ 0`.
//!
//! For `x ≥ 0` two expansions are blended:
//!
//! ```text
//! W1 = ln(2x / ln(1 + 2x))
//! W2 = ln((6/5)x / ln((12/5)x / ln(1 + (12/5)x)))
//! W  = (1 + ε)·W2 − ε·W1,   ε = 0.4586887
//! ```
//!
//! For `−1/e ≤ x < 0` a rational expression in `√(2 + 2e·x)` is used.

use std::f64::consts::{E, SQRT_2};

/// Interpolation weight between the two positive-branch expansions.
const EPSILON: f64 = 0.4586887;

/// Floor applied to the argument and to each inner logarithm.
const LOG_FLOOR: f64 = 1e-300;

/// Below this argument the Taylor series is used instead of the
/// logarithmic expansion, whose nested logarithms lose all significant
/// digits as `x → 0`.
const SERIES_THRESHOLD: f64 = 1e-6;

/// Branch point of W0.
const BRANCH_POINT: f64 = -1.0 / E;

/// Approximate the principal branch W0(x), the solution of `W·e^W = x`.
///
/// Arguments below the branch point `−1/e` have no real solution; the
/// function returns 0 for them and emits a warning.
pub fn lambert_w0(x: f64) -> f64 {
    if x >= 0.0 {
        if x < SERIES_THRESHOLD {
            // W(x) = x − x² + (3/2)x³ + O(x⁴)
            return x - x * x + 1.5 * x * x * x;
        }
        positive_branch(x)
    } else if x >= BRANCH_POINT {
        negative_branch(x)
    } else {
        tracing::warn!(
            x,
            "Lambert W argument below -1/e, outside the real principal branch; returning 0"
        );
        0.0
    }
}

fn positive_branch(x: f64) -> f64 {
    let x = x.max(LOG_FLOOR);

    let denom1 = (2.0 * x).ln_1p().max(LOG_FLOOR);
    let w1 = (2.0 * x / denom1).ln();

    let inner = (12.0 / 5.0 * x).ln_1p().max(LOG_FLOOR);
    let denom2 = (12.0 / 5.0 * x / inner).ln().max(LOG_FLOOR);
    let w2 = (6.0 / 5.0 * x / denom2).ln();

    (1.0 + EPSILON) * w2 - EPSILON * w1
}

fn negative_branch(x: f64) -> f64 {
    let eta = (2.0 + 2.0 * E * x).max(0.0);
    let sqrt_eta = eta.sqrt();

    let n2 = 3.0 * SQRT_2 + 6.0;
    let n1 = (1.0 - 1.0 / SQRT_2) * (n2 + SQRT_2);

    -1.0 + sqrt_eta / (1.0 + n1 * sqrt_eta / (n2 + sqrt_eta))
}
