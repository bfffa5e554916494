//! Binary cross-entropy and its derivative with respect to the activation.
//!
//! Neither function clamps its input: a prediction of exactly 0 or 1 yields
//! non-finite values, which are propagated to the caller unchanged.

use ndarray::{Array1, ArrayView1, Zip};

/// Negative mean binary cross-entropy over `m` samples.
pub fn cost(m: usize, labels: ArrayView1<f64>, output: ArrayView1<f64>) -> f64 {
    let total: f64 = Zip::from(&labels)
        .and(&output)
        .fold(0.0, |acc, &y, &p| acc + y * p.ln() + (1.0 - y) * (1.0 - p).ln());

    -(1.0 / m as f64) * total
}

/// Elementwise derivative of [`cost`] with respect to `output`.
pub fn cost_derivative(m: usize, labels: ArrayView1<f64>, output: ArrayView1<f64>) -> Array1<f64> {
    let scale = -1.0 / m as f64;

    Zip::from(&labels)
        .and(&output)
        .map_collect(|&y, &p| scale * (y / p + (y - 1.0) * (1.0 / (1.0 - p))))
}
