//! Asset-correlation workflow: matrix, price paths, metrics and sweep.

use nalgebra::DMatrix;
use rand::Rng;
use tracing::{info, warn};

use crate::core::config::{AssetSimulationConfig, CorrelationSpec, RepairConfig};
use crate::core::error::{RaptorError, Result};
use crate::core::rng::seeded_rng;
use crate::core::types::{CorrelationMatrix, LabeledMetrics, PricePaths};
use crate::correlation::{build_correlation, is_positive_definite, min_eigenvalue, repair_with_config};
use crate::metrics::metrics_table;
use crate::portfolio::{
    correlation_sweep, default_correlation_grid, simulate_correlated_prices, CorrelationSweep,
    SweepInputs,
};

/// Everything the asset-correlation view displays.
#[derive(Debug, Clone)]
pub struct AssetSimulationReport {
    pub correlation_matrix: CorrelationMatrix,
    /// Daily mean return per asset.
    pub mean_vector: Vec<f64>,
    /// Daily volatility per asset.
    pub volatility_vector: Vec<f64>,
    pub paths: PricePaths,
    /// Daily log-returns, one row per day and one column per asset.
    pub log_returns: DMatrix<f64>,
    /// Per-asset metrics followed by the portfolio.
    pub metrics: Vec<LabeledMetrics>,
    pub sweep: CorrelationSweep,
}

/// Build the matrix for `spec`.
///
/// A uniform matrix is used as given and must already be positive definite.
/// A random range matrix is repaired.
fn correlation_for<R: Rng + ?Sized>(
    rng: &mut R,
    num_assets: usize,
    spec: &CorrelationSpec,
    repair: &RepairConfig,
) -> Result<CorrelationMatrix> {
    let matrix = build_correlation(rng, num_assets, spec)?;
    match *spec {
        CorrelationSpec::Uniform { correlation } => {
            if !is_positive_definite(&matrix) {
                let min = min_eigenvalue(&matrix).unwrap_or(f64::NAN);
                warn!(correlation, num_assets, min, "uniform correlation not positive definite");
                return Err(RaptorError::NotPositiveSemidefinite { min_eigenvalue: min });
            }
            Ok(matrix)
        }
        CorrelationSpec::Range { .. } => repair_with_config(&matrix, repair),
    }
}

/// Run the full asset-correlation workflow for `config`.
pub fn run_asset_simulation(config: &AssetSimulationConfig) -> Result<AssetSimulationReport> {
    config.validate()?;

    let mut rng = seeded_rng(config.seed);
    let repair = RepairConfig::default();
    let num_years = config.num_years as f64;
    let trading_days = config.trading_days();

    let (mean_vector, volatility_vector) = config.asset_vectors(&mut rng);
    let correlation_matrix =
        correlation_for(&mut rng, config.num_assets, &config.correlation, &repair)?;

    let (paths, log_returns) = simulate_correlated_prices(
        &mut rng,
        config.num_assets,
        &correlation_matrix,
        &mean_vector,
        &volatility_vector,
        trading_days,
    )?;
    let metrics = metrics_table(&paths, &log_returns, num_years, config.risk_free_rate)?;

    let inputs = SweepInputs {
        spec: &config.correlation,
        mean: &mean_vector,
        vol: &volatility_vector,
        trading_days,
        num_years,
        risk_free_rate: config.risk_free_rate,
        repair: &repair,
    };
    let sweep = correlation_sweep(&inputs, &default_correlation_grid(), config.seed)?;

    info!(
        num_assets = config.num_assets,
        trading_days,
        sweep_points = sweep.points.len(),
        "asset simulation complete"
    );

    Ok(AssetSimulationReport {
        correlation_matrix,
        mean_vector,
        volatility_vector,
        paths,
        log_returns,
        metrics,
        sweep,
    })
}
