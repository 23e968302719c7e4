//! Portfolio behaviour across a grid of pairwise correlations.

use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, warn};

use super::monte_carlo::simulate_correlated_prices;
use crate::core::config::{CorrelationSpec, RepairConfig};
use crate::core::error::{RaptorError, Result};
use crate::core::rng::stream_rng;
use crate::core::types::PerformanceMetrics;
use crate::correlation::{
    build_random_correlation, build_uniform_correlation, is_positive_definite, repair_with_config,
};
use crate::metrics::{compute_metrics, portfolio_returns};

/// Correlations -1.0, -0.8, ..., 1.0.
pub fn default_correlation_grid() -> Vec<f64> {
    (0..=10).map(|i| (2 * i - 10) as f64 / 10.0).collect()
}

/// One retained sweep value.
#[derive(Debug, Clone, Serialize)]
pub struct CorrelationSweepPoint {
    pub correlation: f64,
    /// Equal-weight portfolio price path.
    pub portfolio: Vec<f64>,
    pub metrics: PerformanceMetrics,
}

/// Sweep output. Values whose matrix was not positive definite are listed
/// in `skipped` instead of `points`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CorrelationSweep {
    pub points: Vec<CorrelationSweepPoint>,
    pub skipped: Vec<f64>,
}

/// Shared inputs of every sweep point.
#[derive(Debug, Clone)]
pub struct SweepInputs<'a> {
    pub spec: &'a CorrelationSpec,
    pub mean: &'a [f64],
    pub vol: &'a [f64],
    pub trading_days: usize,
    pub num_years: f64,
    pub risk_free_rate: f64,
    pub repair: &'a RepairConfig,
}

/// Simulate the portfolio once per correlation value.
///
/// A uniform spec builds the uniform matrix at each value. A range spec
/// ignores the value and draws a fresh random matrix, then repairs it.
/// Each point draws from its own stream of `seed`.
pub fn correlation_sweep(
    inputs: &SweepInputs<'_>,
    correlations: &[f64],
    seed: u64,
) -> Result<CorrelationSweep> {
    inputs.spec.validate()?;
    let num_assets = inputs.mean.len();

    let outcomes: Vec<Result<Option<CorrelationSweepPoint>>> = correlations
        .par_iter()
        .enumerate()
        .map(|(idx, &correlation)| {
            let mut rng = stream_rng(seed, idx as u64 + 1);

            let matrix = match inputs.spec {
                CorrelationSpec::Uniform { .. } => {
                    build_uniform_correlation(num_assets, correlation)?
                }
                CorrelationSpec::Range { min, max } => {
                    let raw = build_random_correlation(&mut rng, num_assets, *min, *max)?;
                    match repair_with_config(&raw, inputs.repair) {
                        Ok(repaired) => repaired,
                        Err(RaptorError::UnrepairableMatrix { .. }) => return Ok(None),
                        Err(e) => return Err(e),
                    }
                }
            };
            if !is_positive_definite(&matrix) {
                return Ok(None);
            }

            let (paths, log_returns) = simulate_correlated_prices(
                &mut rng,
                num_assets,
                &matrix,
                inputs.mean,
                inputs.vol,
                inputs.trading_days,
            )?;
            let metrics = compute_metrics(
                &paths.portfolio,
                &portfolio_returns(&log_returns),
                inputs.num_years,
                inputs.risk_free_rate,
            )?;

            Ok(Some(CorrelationSweepPoint {
                correlation,
                portfolio: paths.portfolio,
                metrics,
            }))
        })
        .collect();

    let mut sweep = CorrelationSweep::default();
    for (outcome, &correlation) in outcomes.into_iter().zip(correlations) {
        match outcome? {
            Some(point) => sweep.points.push(point),
            None => sweep.skipped.push(correlation),
        }
    }

    if !sweep.skipped.is_empty() {
        warn!(skipped = ?sweep.skipped, "correlations skipped, matrix not positive definite");
    }
    info!(
        retained = sweep.points.len(),
        skipped = sweep.skipped.len(),
        "correlation sweep complete"
    );

    Ok(sweep)
}
