//! Positive-definiteness checks and nearest positive-definite repair.
//!
//! The repair symmetrizes the input, averages it with the symmetric polar
//! factor from its SVD, then shifts the diagonal by `-min_eig * k^2 + eps`
//! until every eigenvalue is strictly positive. The shift loop is bounded by
//! [`RepairConfig::max_iterations`].

use nalgebra::{DMatrix, SymmetricEigen};
use tracing::{debug, warn};

use crate::core::config::RepairConfig;
use crate::core::error::{RaptorError, Result};
use crate::core::types::CorrelationMatrix;

fn symmetrize(matrix: &DMatrix<f64>) -> DMatrix<f64> {
    (matrix + matrix.transpose()) * 0.5
}

/// Distance from `x` to the next larger representable magnitude.
fn spacing(x: f64) -> f64 {
    let x = x.abs();
    if x == 0.0 {
        return f64::from_bits(1);
    }
    f64::from_bits(x.to_bits() + 1) - x
}

/// Smallest eigenvalue of the symmetric part of `matrix`.
///
/// Returns `None` for empty or non-square input.
pub fn min_eigenvalue(matrix: &DMatrix<f64>) -> Option<f64> {
    if matrix.is_empty() || !matrix.is_square() {
        return None;
    }
    let eigen = SymmetricEigen::new(symmetrize(matrix));
    Some(eigen.eigenvalues.iter().copied().fold(f64::INFINITY, f64::min))
}

/// True iff every eigenvalue is strictly positive.
///
/// Non-symmetric input is judged by its symmetric part, which has the same
/// quadratic form.
pub fn is_positive_definite(matrix: &DMatrix<f64>) -> bool {
    matches!(min_eigenvalue(matrix), Some(min) if min > 0.0)
}

/// Rescale to a unit diagonal (`D^-1/2 A D^-1/2`).
///
/// A congruence with a positive diagonal keeps positive definiteness.
/// Matrices with a non-positive diagonal entry are returned unchanged.
fn normalize_diagonal(matrix: &DMatrix<f64>) -> DMatrix<f64> {
    let n = matrix.nrows();
    let scale: Vec<f64> = (0..n).map(|i| matrix[(i, i)]).collect();
    if scale.iter().any(|&d| !(d > 0.0)) {
        return matrix.clone();
    }
    let scale: Vec<f64> = scale.into_iter().map(f64::sqrt).collect();

    DMatrix::from_fn(n, n, |i, j| {
        if i == j {
            1.0
        } else {
            matrix[(i, j)] / (scale[i] * scale[j])
        }
    })
}

/// Nearest positive-definite matrix with the default [`RepairConfig`].
pub fn repair_to_positive_definite(matrix: &CorrelationMatrix) -> Result<CorrelationMatrix> {
    repair_with_config(matrix, &RepairConfig::default())
}

/// Nearest positive-definite matrix.
///
/// Positive-definite input is returned as is (rescaled to a unit diagonal
/// when `normalize_diagonal` is set).
///
/// # Errors
/// * `EmptyData` / `DimensionMismatch` for empty or non-square input
/// * `InvalidParameter` for non-finite entries
/// * `UnrepairableMatrix` when `max_iterations` diagonal shifts do not
///   produce a positive-definite matrix
pub fn repair_with_config(
    matrix: &CorrelationMatrix,
    config: &RepairConfig,
) -> Result<CorrelationMatrix> {
    if matrix.is_empty() {
        return Err(RaptorError::empty_data("correlation matrix"));
    }
    if !matrix.is_square() {
        let n = matrix.nrows();
        return Err(RaptorError::dimension_mismatch((n, n), matrix.shape()));
    }
    if matrix.iter().any(|v| !v.is_finite()) {
        return Err(RaptorError::invalid_parameter(
            "correlation matrix contains non-finite values",
        ));
    }

    let n = matrix.nrows();
    let b = symmetrize(matrix);
    if is_positive_definite(&b) {
        if config.normalize_diagonal {
            let normalized = normalize_diagonal(&b);
            if is_positive_definite(&normalized) {
                return Ok(normalized);
            }
        }
        return Ok(b);
    }

    let svd = b.clone().svd(false, true);
    let v_t = svd
        .v_t
        .ok_or_else(|| RaptorError::invalid_parameter("SVD did not converge"))?;
    let h = v_t.transpose() * DMatrix::from_diagonal(&svd.singular_values) * &v_t;
    let a2 = (&b + h) * 0.5;
    let mut a3 = symmetrize(&a2);

    let eps = spacing(matrix.norm());

    let mut k = 0;
    loop {
        let candidate = if config.normalize_diagonal {
            normalize_diagonal(&a3)
        } else {
            a3.clone()
        };

        let candidate_min = min_eigenvalue(&candidate).unwrap_or(f64::NAN);
        if candidate_min > 0.0 {
            if k > 0 {
                warn!(iterations = k, n, "correlation matrix needed diagonal shifts");
            }
            return Ok(candidate);
        }
        if k >= config.max_iterations {
            return Err(RaptorError::UnrepairableMatrix {
                iterations: config.max_iterations,
                min_eigenvalue: candidate_min,
            });
        }

        k += 1;
        // Normalization can push a barely-positive spectrum below zero, so
        // the shift uses the magnitude of the unnormalized minimum.
        let min_eig = min_eigenvalue(&a3).unwrap_or(0.0);
        let shift = min_eig.abs() * (k * k) as f64 + eps;
        for i in 0..n {
            a3[(i, i)] += shift;
        }
        debug!(k, min_eig, shift, "shifted diagonal");
    }
}
