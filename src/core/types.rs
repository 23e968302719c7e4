//! Core data types for RaptorRisk.

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

/// Trading days used to annualize daily figures.
pub const TRADING_DAYS_PER_YEAR: usize = 252;

/// Starting price for every simulated asset path.
pub const INITIAL_PRICE: f64 = 100.0;

/// Square correlation (or covariance) matrix.
pub type CorrelationMatrix = DMatrix<f64>;

/// Label of the equal-weight portfolio column.
pub const PORTFOLIO_LABEL: &str = "Portfolio";

/// Label of asset column `index` (zero-based), e.g. `"Asset 1"`.
pub fn asset_label(index: usize) -> String {
    format!("Asset {}", index + 1)
}

/// Return and risk figures for one price series.
///
/// Ratios that cannot be computed (zero volatility, no downside returns,
/// zero drawdown) are `None`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    /// Cumulative return over the whole series, as a fraction.
    pub total_return: f64,
    /// Geometric annualized return.
    pub annualized_return: f64,
    /// Sample standard deviation of returns scaled by sqrt(252).
    pub annualized_volatility: f64,
    /// Largest peak-to-trough decline, as a fraction of the peak.
    pub max_drawdown: f64,
    /// Sharpe ratio.
    pub sharpe: Option<f64>,
    /// Sortino ratio.
    pub sortino: Option<f64>,
    /// Calmar ratio.
    pub calmar: Option<f64>,
}

impl PerformanceMetrics {
    /// Sharpe ratio with NaN standing in for an undefined value.
    #[inline]
    pub fn sharpe_or_nan(&self) -> f64 {
        self.sharpe.unwrap_or(f64::NAN)
    }

    /// Sortino ratio with NaN standing in for an undefined value.
    #[inline]
    pub fn sortino_or_nan(&self) -> f64 {
        self.sortino.unwrap_or(f64::NAN)
    }

    /// Calmar ratio with NaN standing in for an undefined value.
    #[inline]
    pub fn calmar_or_nan(&self) -> f64 {
        self.calmar.unwrap_or(f64::NAN)
    }

    /// Named fields in display order.
    pub fn fields(&self) -> [(&'static str, Option<f64>); 7] {
        [
            ("Total Cumulative Return", Some(self.total_return)),
            ("Annualized Return", Some(self.annualized_return)),
            ("Annualized Volatility", Some(self.annualized_volatility)),
            ("Maximum Drawdown", Some(self.max_drawdown)),
            ("Sharpe Ratio", self.sharpe),
            ("Sortino Ratio", self.sortino),
            ("Calmar Ratio", self.calmar),
        ]
    }
}

/// Format a metric value, rendering undefined values as `"N/A"`.
pub fn format_metric(value: Option<f64>, precision: usize) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:.*}", precision, v),
        _ => "N/A".to_string(),
    }
}

/// Metrics for one labelled column ("Asset 3", "Portfolio", ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledMetrics {
    pub label: String,
    pub metrics: PerformanceMetrics,
}

/// Simulated price paths.
#[derive(Debug, Clone)]
pub struct PricePaths {
    /// Asset prices, one row per trading day and one column per asset.
    pub assets: DMatrix<f64>,
    /// Row-wise mean of the asset prices.
    pub portfolio: Vec<f64>,
}

impl PricePaths {
    /// Number of trading days.
    #[inline]
    pub fn len(&self) -> usize {
        self.assets.nrows()
    }

    /// Check if empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.assets.nrows() == 0
    }

    /// Number of assets (excluding the portfolio column).
    #[inline]
    pub fn num_assets(&self) -> usize {
        self.assets.ncols()
    }

    /// Price path of one asset.
    pub fn asset(&self, index: usize) -> Vec<f64> {
        self.assets.column(index).iter().copied().collect()
    }

    /// Column labels, portfolio last.
    pub fn labels(&self) -> Vec<String> {
        let mut labels: Vec<String> = (0..self.num_assets()).map(asset_label).collect();
        labels.push(PORTFOLIO_LABEL.to_string());
        labels
    }
}

/// Outcome of one point in a parameter sweep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepPoint {
    /// Swept parameter value.
    pub parameter: f64,
    /// Mean terminal return across trials, in percent.
    pub mean_return_pct: f64,
}
