//! Correlated multi-asset price simulation.
//!
//! Daily log-returns are drawn from a multivariate normal with covariance
//! `D * C * D` (D = diag of daily volatilities, C = correlation) and mean
//! `mu - sigma^2 / 2`, then integrated into price paths starting at 100.

use nalgebra::{DMatrix, DVector, SymmetricEigen};
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};
use tracing::debug;

use crate::core::config::{ensure_finite, ensure_positive_count};
use crate::core::error::{RaptorError, Result};
use crate::core::types::{CorrelationMatrix, PricePaths, INITIAL_PRICE};

/// Relative tolerance below which negative eigenvalues count as zero.
const PSD_TOLERANCE: f64 = 1e-8;

/// Covariance `diag(vol) * corr * diag(vol)`.
pub fn covariance_matrix(corr: &CorrelationMatrix, vol: &[f64]) -> Result<DMatrix<f64>> {
    let n = vol.len();
    if corr.shape() != (n, n) {
        return Err(RaptorError::dimension_mismatch((n, n), corr.shape()));
    }
    Ok(DMatrix::from_fn(n, n, |i, j| vol[i] * corr[(i, j)] * vol[j]))
}

/// Factor `A` with `A * A^T = cov`, from the symmetric eigendecomposition.
///
/// Accepts positive-semidefinite input; eigenvalues within tolerance of
/// zero are clamped.
pub fn covariance_factor(cov: &DMatrix<f64>) -> Result<DMatrix<f64>> {
    let sym = (cov + cov.transpose()) * 0.5;
    let eigen = SymmetricEigen::new(sym);

    let max_abs = eigen.eigenvalues.iter().fold(0.0f64, |a, &b| a.max(b.abs()));
    let min_eig = eigen.eigenvalues.iter().copied().fold(f64::INFINITY, f64::min);
    if min_eig < -PSD_TOLERANCE * max_abs {
        return Err(RaptorError::NotPositiveSemidefinite {
            min_eigenvalue: min_eig,
        });
    }

    let sqrt_eig = eigen.eigenvalues.map(|v| v.max(0.0).sqrt());
    Ok(eigen.eigenvectors * DMatrix::from_diagonal(&sqrt_eig))
}

fn validate(
    num_assets: usize,
    corr: &CorrelationMatrix,
    mean: &[f64],
    vol: &[f64],
    trading_days: usize,
) -> Result<()> {
    ensure_positive_count("num_assets", num_assets)?;
    ensure_positive_count("trading_days", trading_days)?;
    if corr.shape() != (num_assets, num_assets) {
        return Err(RaptorError::dimension_mismatch(
            (num_assets, num_assets),
            corr.shape(),
        ));
    }
    if mean.len() != num_assets {
        return Err(RaptorError::length_mismatch(num_assets, mean.len()));
    }
    if vol.len() != num_assets {
        return Err(RaptorError::length_mismatch(num_assets, vol.len()));
    }
    for &m in mean {
        ensure_finite("mean", m)?;
    }
    for &v in vol {
        ensure_finite("volatility", v)?;
        if v < 0.0 {
            return Err(RaptorError::invalid_parameter(format!(
                "volatility must be >= 0, got {}",
                v
            )));
        }
    }
    if corr.iter().any(|c| !c.is_finite()) {
        return Err(RaptorError::invalid_parameter(
            "correlation matrix contains non-finite values",
        ));
    }
    Ok(())
}

/// Draw `trading_days` correlated log-returns and integrate them to prices.
///
/// # Arguments
/// * `rng` - Random source
/// * `num_assets` - Number of assets
/// * `corr` - Positive-semidefinite correlation matrix (num_assets x num_assets)
/// * `mean` - Daily mean return per asset
/// * `vol` - Daily volatility per asset
/// * `trading_days` - Path length
///
/// # Returns
/// Price paths and the (trading_days x num_assets) log-return matrix
pub fn simulate_correlated_prices<R: Rng + ?Sized>(
    rng: &mut R,
    num_assets: usize,
    corr: &CorrelationMatrix,
    mean: &[f64],
    vol: &[f64],
    trading_days: usize,
) -> Result<(PricePaths, DMatrix<f64>)> {
    validate(num_assets, corr, mean, vol, trading_days)?;
    debug!(num_assets, trading_days, "simulating correlated prices");

    let cov = covariance_matrix(corr, vol)?;
    let factor = covariance_factor(&cov)?;

    // Ito correction keeps exp(log-return) unbiased.
    let drift = DVector::from_fn(num_assets, |i, _| mean[i] - 0.5 * vol[i] * vol[i]);

    let mut log_returns = DMatrix::<f64>::zeros(trading_days, num_assets);
    for day in 0..trading_days {
        let z: DVector<f64> = DVector::from_fn(num_assets, |_, _| StandardNormal.sample(rng));
        let sample = &drift + &factor * z;
        log_returns.set_row(day, &sample.transpose());
    }

    let paths = integrate_prices(&log_returns);
    Ok((paths, log_returns))
}

/// Price paths `100 * exp(cumsum(log_returns))` plus the row-mean portfolio.
pub fn integrate_prices(log_returns: &DMatrix<f64>) -> PricePaths {
    let (days, n) = log_returns.shape();
    let mut assets = DMatrix::<f64>::zeros(days, n);

    for j in 0..n {
        let mut cumulative = 0.0;
        for t in 0..days {
            cumulative += log_returns[(t, j)];
            assets[(t, j)] = INITIAL_PRICE * cumulative.exp();
        }
    }

    let portfolio = assets
        .row_iter()
        .map(|row| if n == 0 { 0.0 } else { row.iter().sum::<f64>() / n as f64 })
        .collect();

    PricePaths { assets, portfolio }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rng::seeded_rng;
    use crate::correlation::build_uniform_correlation;

    #[test]
    fn test_factor_reconstructs_covariance() {
        let cov = DMatrix::from_row_slice(2, 2, &[0.04, 0.01, 0.01, 0.09]);
        let a = covariance_factor(&cov).unwrap();
        let rebuilt = &a * a.transpose();
        assert!((rebuilt - cov).abs().max() < 1e-12);
    }

    #[test]
    fn test_factor_accepts_singular() {
        let cov = DMatrix::from_element(3, 3, 0.25);
        assert!(covariance_factor(&cov).is_ok());
    }

    #[test]
    fn test_factor_rejects_indefinite() {
        let cov = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 2.0, 1.0]);
        assert!(matches!(
            covariance_factor(&cov),
            Err(RaptorError::NotPositiveSemidefinite { .. })
        ));
    }

    #[test]
    fn test_shapes_and_start() {
        let mut rng = seeded_rng(42);
        let corr = build_uniform_correlation(3, 0.4).unwrap();
        let (paths, log_returns) =
            simulate_correlated_prices(&mut rng, 3, &corr, &[0.0004; 3], &[0.0126; 3], 100)
                .unwrap();
        assert_eq!(log_returns.shape(), (100, 3));
        assert_eq!(paths.assets.shape(), (100, 3));
        assert_eq!(paths.portfolio.len(), 100);

        for j in 0..3 {
            let expected = INITIAL_PRICE * log_returns[(0, j)].exp();
            assert!((paths.assets[(0, j)] - expected).abs() < 1e-9);
        }
        let row_mean = paths.assets.row(50).iter().sum::<f64>() / 3.0;
        assert!((paths.portfolio[50] - row_mean).abs() < 1e-9);
    }

    #[test]
    fn test_zero_volatility_is_deterministic_drift() {
        let mut rng = seeded_rng(1);
        let corr = build_uniform_correlation(2, 0.0).unwrap();
        let (_, log_returns) =
            simulate_correlated_prices(&mut rng, 2, &corr, &[0.001, 0.002], &[0.0, 0.0], 10)
                .unwrap();
        for t in 0..10 {
            assert!((log_returns[(t, 0)] - 0.001).abs() < 1e-15);
            assert!((log_returns[(t, 1)] - 0.002).abs() < 1e-15);
        }
    }

    #[test]
    fn test_rejects_mismatched_inputs() {
        let mut rng = seeded_rng(1);
        let corr = build_uniform_correlation(2, 0.0).unwrap();
        assert!(matches!(
            simulate_correlated_prices(&mut rng, 3, &corr, &[0.0; 3], &[0.01; 3], 10),
            Err(RaptorError::DimensionMismatch { .. })
        ));
        assert!(matches!(
            simulate_correlated_prices(&mut rng, 2, &corr, &[0.0; 1], &[0.01; 2], 10),
            Err(RaptorError::LengthMismatch { .. })
        ));
        assert!(simulate_correlated_prices(&mut rng, 0, &corr, &[], &[], 10).is_err());
        assert!(simulate_correlated_prices(&mut rng, 2, &corr, &[0.0; 2], &[-0.01; 2], 10).is_err());
    }
}
