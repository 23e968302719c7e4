//! Diversification risk of an equal-weight portfolio.

use nalgebra::{Cholesky, DMatrix};
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};

use crate::core::config::ensure_positive_count;
use crate::core::error::{RaptorError, Result};
use crate::core::types::TRADING_DAYS_PER_YEAR;
use crate::correlation::{build_uniform_correlation, min_eigenvalue};
use crate::metrics::ReturnStats;

/// Lower-triangular `L` with `L * L^T = matrix`.
pub fn cholesky_factor(matrix: &DMatrix<f64>) -> Result<DMatrix<f64>> {
    if !matrix.is_square() {
        let n = matrix.nrows();
        return Err(RaptorError::dimension_mismatch((n, n), matrix.shape()));
    }
    match Cholesky::new(matrix.clone()) {
        Some(chol) => Ok(chol.l()),
        None => Err(RaptorError::NotPositiveSemidefinite {
            min_eigenvalue: min_eigenvalue(matrix).unwrap_or(f64::NAN),
        }),
    }
}

/// Average daily volatility of an equal-weight portfolio of unit-variance
/// assets sharing one pairwise `correlation`.
///
/// Each simulation draws a year of independent standard normals, correlates
/// them through the Cholesky factor, averages across assets per day and
/// takes the population standard deviation of that series.
pub fn simulate_portfolio_risk<R: Rng + ?Sized>(
    rng: &mut R,
    num_assets: usize,
    correlation: f64,
    num_simulations: usize,
) -> Result<f64> {
    ensure_positive_count("num_simulations", num_simulations)?;
    let corr = build_uniform_correlation(num_assets, correlation)?;
    let chol = cholesky_factor(&corr)?;

    let days = TRADING_DAYS_PER_YEAR;
    let mut total = 0.0;

    for _ in 0..num_simulations {
        let z = DMatrix::<f64>::from_fn(num_assets, days, |_, _| StandardNormal.sample(rng));
        let correlated = &chol * z;

        let mut stats = ReturnStats::new();
        for day in correlated.column_iter() {
            stats.update(day.mean());
        }
        total += stats.variance_population().sqrt();
    }

    Ok(total / num_simulations as f64)
}
