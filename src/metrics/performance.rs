//! Return and risk ratios for a price series.

use nalgebra::DMatrix;

use super::drawdown::{calmar_ratio, max_drawdown};
use super::streaming::ReturnStats;
use crate::core::config::ensure_finite;
use crate::core::error::{RaptorError, Result};
use crate::core::types::{
    asset_label, LabeledMetrics, PerformanceMetrics, PricePaths, PORTFOLIO_LABEL,
    TRADING_DAYS_PER_YEAR,
};

/// Compute the performance record of one series.
///
/// # Arguments
/// * `prices` - Price path, first value is the starting price
/// * `returns` - Period returns matching the path (NaN values are skipped)
/// * `num_years` - Length of the path in years
/// * `risk_free_rate` - Annual risk-free rate as a fraction
pub fn compute_metrics(
    prices: &[f64],
    returns: &[f64],
    num_years: f64,
    risk_free_rate: f64,
) -> Result<PerformanceMetrics> {
    let (first, last) = match (prices.first(), prices.last()) {
        (Some(&first), Some(&last)) => (first, last),
        _ => return Err(RaptorError::empty_data("prices")),
    };
    if returns.is_empty() {
        return Err(RaptorError::empty_data("returns"));
    }
    if !(num_years > 0.0) || !num_years.is_finite() {
        return Err(RaptorError::invalid_parameter(format!(
            "num_years must be positive, got {}",
            num_years
        )));
    }
    ensure_finite("risk_free_rate", risk_free_rate)?;
    if first == 0.0 || !first.is_finite() {
        return Err(RaptorError::invalid_parameter(format!(
            "starting price must be finite and non-zero, got {}",
            first
        )));
    }

    let periods = TRADING_DAYS_PER_YEAR as f64;
    let stats = ReturnStats::from_returns(returns);

    let total_return = last / first - 1.0;
    let annualized_return = (1.0 + total_return).powf(1.0 / num_years) - 1.0;
    let annualized_volatility = stats.std_dev() * periods.sqrt();
    let max_drawdown = max_drawdown(prices);
    let excess_return = annualized_return - risk_free_rate;

    let sharpe = if annualized_volatility > 0.0 && annualized_volatility.is_finite() {
        Some(excess_return / annualized_volatility)
    } else {
        None
    };

    let sortino = stats
        .downside_deviation()
        .map(|dd| dd * periods.sqrt())
        .filter(|&dd| dd > 0.0)
        .map(|dd| excess_return / dd);

    let calmar = calmar_ratio(annualized_return, max_drawdown);

    Ok(PerformanceMetrics {
        total_return,
        annualized_return,
        annualized_volatility,
        max_drawdown,
        sharpe,
        sortino,
        calmar,
    })
}

/// Row-wise mean of a (days x assets) return matrix.
pub fn portfolio_returns(log_returns: &DMatrix<f64>) -> Vec<f64> {
    let n_assets = log_returns.ncols().max(1) as f64;
    log_returns
        .row_iter()
        .map(|row| row.iter().sum::<f64>() / n_assets)
        .collect()
}

/// Metrics for every asset column followed by the portfolio.
///
/// The portfolio return series is the row-wise mean of the asset log-returns.
pub fn metrics_table(
    paths: &PricePaths,
    log_returns: &DMatrix<f64>,
    num_years: f64,
    risk_free_rate: f64,
) -> Result<Vec<LabeledMetrics>> {
    if log_returns.shape() != paths.assets.shape() {
        return Err(RaptorError::dimension_mismatch(
            paths.assets.shape(),
            log_returns.shape(),
        ));
    }

    let mut table = Vec::with_capacity(paths.num_assets() + 1);
    for i in 0..paths.num_assets() {
        let prices = paths.asset(i);
        let returns: Vec<f64> = log_returns.column(i).iter().copied().collect();
        table.push(LabeledMetrics {
            label: asset_label(i),
            metrics: compute_metrics(&prices, &returns, num_years, risk_free_rate)?,
        });
    }

    table.push(LabeledMetrics {
        label: PORTFOLIO_LABEL.to_string(),
        metrics: compute_metrics(
            &paths.portfolio,
            &portfolio_returns(log_returns),
            num_years,
            risk_free_rate,
        )?,
    });

    Ok(table)
}
